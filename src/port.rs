//! Seam between the public queries and the per-OS ioctl adapters.
//!
//! Every public operation goes through the generic functions below with the
//! compile-time-selected [`TocPort`]; tests drive the same path with a fake
//! backend that records what was requested.

use std::os::fd::RawFd;

use crate::errors::TocResult;
use crate::{TocHeader, TrackAddress};

/// Address format requested from the drive.
///
/// The crate always asks for MSF; the enum only exists so the request handed
/// to a backend spells the format out instead of implying it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AddressFormat {
    Msf,
}

/// One "read TOC entry" request as handed to a platform backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct EntryRequest {
    pub track: u8,
    pub format: AddressFormat,
}

/// Uniform interface over one platform's TOC ioctls.
pub(crate) trait TocPort {
    fn toc_header(&self, fd: RawFd) -> TocResult<TocHeader>;
    fn toc_entry(&self, fd: RawFd, request: EntryRequest) -> TocResult<TrackAddress>;
    /// The platform's reserved leadout track number.
    fn leadout_track(&self) -> u8;
}

pub(crate) fn header_with<P: TocPort>(port: &P, fd: RawFd) -> TocResult<TocHeader> {
    port.toc_header(fd)
}

pub(crate) fn entry_with<P: TocPort>(port: &P, fd: RawFd, track: u8) -> TocResult<TrackAddress> {
    port.toc_entry(
        fd,
        EntryRequest {
            track,
            format: AddressFormat::Msf,
        },
    )
}

pub(crate) fn leadout_with<P: TocPort>(port: &P, fd: RawFd) -> TocResult<TrackAddress> {
    let track = port.leadout_track();
    port.toc_entry(
        fd,
        EntryRequest {
            track,
            format: AddressFormat::Msf,
        },
    )
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::io;
    use std::os::fd::RawFd;

    use super::{AddressFormat, EntryRequest, TocPort, entry_with, header_with, leadout_with};
    use crate::errors::{DeviceIoError, TocOp, TocResult};
    use crate::{TocHeader, TrackAddress};

    const LEADOUT: u8 = 0xAA;

    struct FakePort {
        header: TocHeader,
        entries: Vec<(u8, TrackAddress)>,
        // errno every call fails with, when set
        fail_errno: Option<i32>,
        requests: RefCell<Vec<EntryRequest>>,
    }

    impl FakePort {
        fn with_entries(entries: Vec<(u8, TrackAddress)>) -> Self {
            Self {
                header: TocHeader {
                    first_track: 1,
                    last_track: 10,
                },
                entries,
                fail_errno: None,
                requests: RefCell::new(vec![]),
            }
        }

        fn failing(errno: i32) -> Self {
            let mut port = Self::with_entries(vec![]);
            port.fail_errno = Some(errno);
            port
        }
    }

    impl TocPort for FakePort {
        fn toc_header(&self, _fd: RawFd) -> TocResult<TocHeader> {
            if let Some(errno) = self.fail_errno {
                return Err(DeviceIoError {
                    op: TocOp::TocHeader,
                    source: io::Error::from_raw_os_error(errno),
                });
            }
            Ok(self.header)
        }

        fn toc_entry(&self, _fd: RawFd, request: EntryRequest) -> TocResult<TrackAddress> {
            self.requests.borrow_mut().push(request);
            let fail = |errno| DeviceIoError {
                op: TocOp::TocEntry,
                source: io::Error::from_raw_os_error(errno),
            };
            if let Some(errno) = self.fail_errno {
                return Err(fail(errno));
            }
            self.entries
                .iter()
                .find(|(track, _)| *track == request.track)
                .map(|(_, address)| *address)
                .ok_or_else(|| fail(libc::EINVAL))
        }

        fn leadout_track(&self) -> u8 {
            LEADOUT
        }
    }

    #[test]
    fn header_returns_firmware_values_verbatim() {
        let port = FakePort::with_entries(vec![]);
        let header = header_with(&port, 0).unwrap();

        assert_eq!(
            header,
            TocHeader {
                first_track: 1,
                last_track: 10
            }
        );
    }

    #[test]
    fn header_is_idempotent() {
        let port = FakePort::with_entries(vec![]);

        let first = header_with(&port, 0).unwrap();
        let second = header_with(&port, 0).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn entry_returns_msf_for_requested_track() {
        let address = TrackAddress {
            minute: 2,
            second: 15,
            frame: 30,
        };
        let port = FakePort::with_entries(vec![(3, address)]);

        assert_eq!(entry_with(&port, 0, 3).unwrap(), address);
        assert_eq!(
            port.requests.borrow().as_slice(),
            &[EntryRequest {
                track: 3,
                format: AddressFormat::Msf,
            }]
        );
    }

    #[test]
    fn leadout_requests_sentinel_track_in_msf() {
        let address = TrackAddress {
            minute: 52,
            second: 40,
            frame: 12,
        };
        let port = FakePort::with_entries(vec![(LEADOUT, address)]);

        assert_eq!(leadout_with(&port, 0).unwrap(), address);
        assert_eq!(
            port.requests.borrow().as_slice(),
            &[EntryRequest {
                track: LEADOUT,
                format: AddressFormat::Msf,
            }]
        );
    }

    #[test]
    fn failures_surface_the_os_error_code_unchanged() {
        let port = FakePort::failing(libc::ENXIO);

        let header_err = header_with(&port, 0).unwrap_err();
        let entry_err = entry_with(&port, 0, 1).unwrap_err();
        let leadout_err = leadout_with(&port, 0).unwrap_err();

        assert_eq!(header_err.raw_os_error(), Some(libc::ENXIO));
        assert_eq!(header_err.op, TocOp::TocHeader);
        assert_eq!(entry_err.raw_os_error(), Some(libc::ENXIO));
        assert_eq!(entry_err.op, TocOp::TocEntry);
        assert_eq!(leadout_err.raw_os_error(), Some(libc::ENXIO));
    }

    #[test]
    fn out_of_range_tracks_pass_through_unvalidated() {
        // The backend decides what is a valid track; the query layer forwards
        // 0 and 255 untouched and reports the backend's verdict.
        let port = FakePort::with_entries(vec![]);

        let low = entry_with(&port, 0, 0).unwrap_err();
        let high = entry_with(&port, 0, 255).unwrap_err();

        assert_eq!(low.raw_os_error(), Some(libc::EINVAL));
        assert_eq!(high.raw_os_error(), Some(libc::EINVAL));
        let tracks: Vec<u8> = port.requests.borrow().iter().map(|r| r.track).collect();
        assert_eq!(tracks, vec![0, 255]);
    }
}
