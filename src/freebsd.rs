use std::os::fd::RawFd;

use libc::{c_int, c_ulong};

use crate::errors::{DeviceIoError, TocOp, TocResult};
use crate::port::{AddressFormat, EntryRequest, TocPort};
use crate::{TocHeader, TrackAddress};

// <sys/ioccom.h> request-code encoding: direction, argument length,
// group character, command number.
const IOC_OUT: c_ulong = 0x4000_0000;
const IOC_IN: c_ulong = 0x8000_0000;
const IOC_INOUT: c_ulong = IOC_IN | IOC_OUT;
const IOCPARM_MASK: c_ulong = (1 << 13) - 1;

const fn ioc(inout: c_ulong, group: u8, num: u8, len: usize) -> c_ulong {
    inout | ((len as c_ulong & IOCPARM_MASK) << 16) | ((group as c_ulong) << 8) | num as c_ulong
}

// Request codes and struct layouts from <sys/cdio.h>.
// _IOR('c', 4, struct ioc_toc_header)
const CDIOREADTOCHEADER: c_ulong = ioc(IOC_OUT, b'c', 4, size_of::<IocTocHeader>());
// _IOWR('c', 6, struct ioc_read_toc_single_entry)
const CDIOREADTOCENTRY: c_ulong = ioc(IOC_INOUT, b'c', 6, size_of::<IocReadTocSingleEntry>());

// address_format value selecting minute/second/frame addressing
const CD_MSF_FORMAT: u8 = 2;
// The header names no leadout constant; 0xAA is the reserved leadout track
// number from the CD spec.
const CD_LEADOUT: u8 = 0xAA;

#[repr(C)]
struct IocTocHeader {
    len: u16,
    starting_track: u8,
    ending_track: u8,
}

#[repr(C)]
#[derive(Clone, Copy)]
struct CdMsf {
    unused: u8,
    minute: u8,
    second: u8,
    frame: u8,
}

#[repr(C)]
#[derive(Clone, Copy)]
union MsfLba {
    msf: CdMsf,
    lba: c_int, // network byte order
}

// struct cd_toc_entry; the leading two bytes are the header's reserved and
// control/addr_type bitfields, which the compiler packs ahead of `track`.
#[repr(C)]
struct CdTocEntry {
    reserved: u8,
    control_addr_type: u8,
    track: u8,
    _pad: u8,
    addr: MsfLba,
}

#[repr(C)]
struct IocReadTocSingleEntry {
    address_format: u8,
    track: u8,
    // padded to the int-aligned entry
    _pad: [u8; 2],
    entry: CdTocEntry,
}

pub(crate) struct OsPort;

impl TocPort for OsPort {
    fn toc_header(&self, fd: RawFd) -> TocResult<TocHeader> {
        let mut hdr = IocTocHeader {
            len: 0,
            starting_track: 0,
            ending_track: 0,
        };

        log::trace!("CDIOREADTOCHEADER on fd {fd}");
        let rc = unsafe { libc::ioctl(fd, CDIOREADTOCHEADER, &mut hdr as *mut IocTocHeader) };
        if rc < 0 {
            return Err(DeviceIoError::last_os_error(TocOp::TocHeader));
        }

        Ok(TocHeader {
            first_track: hdr.starting_track,
            last_track: hdr.ending_track,
        })
    }

    fn toc_entry(&self, fd: RawFd, request: EntryRequest) -> TocResult<TrackAddress> {
        let mut single = IocReadTocSingleEntry {
            address_format: match request.format {
                AddressFormat::Msf => CD_MSF_FORMAT,
            },
            track: request.track,
            _pad: [0; 2],
            entry: CdTocEntry {
                reserved: 0,
                control_addr_type: 0,
                track: 0,
                _pad: 0,
                addr: MsfLba { lba: 0 },
            },
        };

        log::trace!("CDIOREADTOCENTRY for track {} on fd {fd}", request.track);
        let rc = unsafe {
            libc::ioctl(fd, CDIOREADTOCENTRY, &mut single as *mut IocReadTocSingleEntry)
        };
        if rc < 0 {
            return Err(DeviceIoError::last_os_error(TocOp::TocEntry));
        }

        // The driver filled the union in the format we asked for (MSF).
        let msf = unsafe { single.entry.addr.msf };
        Ok(TrackAddress {
            minute: msf.minute,
            second: msf.second,
            frame: msf.frame,
        })
    }

    fn leadout_track(&self) -> u8 {
        CD_LEADOUT
    }
}

#[cfg(test)]
mod tests {
    use std::mem::{align_of, size_of};

    use super::{CDIOREADTOCENTRY, CDIOREADTOCHEADER, CdTocEntry, IocReadTocSingleEntry, IocTocHeader};

    #[test]
    fn structs_match_kernel_abi() {
        assert_eq!(size_of::<IocTocHeader>(), 4);
        assert_eq!(size_of::<CdTocEntry>(), 8);
        assert_eq!(size_of::<IocReadTocSingleEntry>(), 12);
        assert_eq!(align_of::<IocReadTocSingleEntry>(), 4);
    }

    #[test]
    fn request_codes_match_header_values() {
        assert_eq!(CDIOREADTOCHEADER, 0x4004_6304);
        assert_eq!(CDIOREADTOCENTRY, 0xC00C_6306);
    }
}
