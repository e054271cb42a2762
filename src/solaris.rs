use std::os::fd::RawFd;

use libc::c_int;

use crate::errors::{DeviceIoError, TocOp, TocResult};
use crate::port::{AddressFormat, EntryRequest, TocPort};
use crate::{TocHeader, TrackAddress};

// Request codes and struct layouts from <sys/cdio.h> (SunOS/illumos). The
// struct layouts are the same as Linux's <linux/cdrom.h>; only the request
// codes differ.
const CDIOC: c_int = 0x04 << 8;
const CDROMREADTOCHDR: c_int = CDIOC | 155;
const CDROMREADTOCENTRY: c_int = CDIOC | 156;

// cdte_format value selecting minute/second/frame addressing
const CDROM_MSF: u8 = 0x02;
// reserved track number addressing the leadout
const CDROM_LEADOUT: u8 = 0xAA;

#[repr(C)]
struct CdromTochdr {
    cdth_trk0: u8, // start track
    cdth_trk1: u8, // end track
}

#[repr(C)]
#[derive(Clone, Copy)]
struct CdromMsf0 {
    minute: u8,
    second: u8,
    frame: u8,
}

#[repr(C)]
#[derive(Clone, Copy)]
union CdromAddr {
    msf: CdromMsf0,
    lba: c_int,
}

#[repr(C)]
struct CdromTocentry {
    cdte_track: u8,
    cdte_adr_ctrl: u8, // adr in the low nibble, ctrl in the high
    cdte_format: u8,
    cdte_addr: CdromAddr,
    cdte_datamode: u8,
}

pub(crate) struct OsPort;

impl TocPort for OsPort {
    fn toc_header(&self, fd: RawFd) -> TocResult<TocHeader> {
        let mut hdr = CdromTochdr {
            cdth_trk0: 0,
            cdth_trk1: 0,
        };

        log::trace!("CDROMREADTOCHDR on fd {fd}");
        let rc = unsafe { libc::ioctl(fd, CDROMREADTOCHDR, &mut hdr as *mut CdromTochdr) };
        if rc < 0 {
            return Err(DeviceIoError::last_os_error(TocOp::TocHeader));
        }

        Ok(TocHeader {
            first_track: hdr.cdth_trk0,
            last_track: hdr.cdth_trk1,
        })
    }

    fn toc_entry(&self, fd: RawFd, request: EntryRequest) -> TocResult<TrackAddress> {
        let mut entry = CdromTocentry {
            cdte_track: request.track,
            cdte_adr_ctrl: 0,
            cdte_format: match request.format {
                AddressFormat::Msf => CDROM_MSF,
            },
            cdte_addr: CdromAddr { lba: 0 },
            cdte_datamode: 0,
        };

        log::trace!("CDROMREADTOCENTRY for track {} on fd {fd}", request.track);
        let rc = unsafe { libc::ioctl(fd, CDROMREADTOCENTRY, &mut entry as *mut CdromTocentry) };
        if rc < 0 {
            return Err(DeviceIoError::last_os_error(TocOp::TocEntry));
        }

        let msf = unsafe { entry.cdte_addr.msf };
        Ok(TrackAddress {
            minute: msf.minute,
            second: msf.second,
            frame: msf.frame,
        })
    }

    fn leadout_track(&self) -> u8 {
        CDROM_LEADOUT
    }
}

#[cfg(test)]
mod tests {
    use std::mem::{align_of, size_of};

    use super::{CdromTochdr, CdromTocentry};

    #[test]
    fn structs_match_kernel_abi() {
        assert_eq!(size_of::<CdromTochdr>(), 2);
        assert_eq!(size_of::<CdromTocentry>(), 12);
        assert_eq!(align_of::<CdromTocentry>(), 4);
    }
}
