//! Query the table of contents of an audio CD directly from the drive.
//!
//! The caller opens the block device (for example `/dev/sr0`) and lends the
//! open handle to the three queries here; this crate never opens, closes, or
//! duplicates the descriptor. Each query maps to a single blocking TOC ioctl
//! against the drive and surfaces the OS error code untouched on failure.
//!
//! Track addresses are reported in the Red Book minute/second/frame format,
//! exactly as the firmware returns them (75 frames per second).

mod errors;
mod port;

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "linux")]
use linux as os;

#[cfg(any(target_os = "solaris", target_os = "illumos"))]
mod solaris;
#[cfg(any(target_os = "solaris", target_os = "illumos"))]
use solaris as os;

#[cfg(target_os = "freebsd")]
mod freebsd;
#[cfg(target_os = "freebsd")]
use freebsd as os;

#[cfg(not(any(
    target_os = "linux",
    target_os = "solaris",
    target_os = "illumos",
    target_os = "freebsd",
)))]
compile_error!("cdrom-toc supports Linux, Solaris/illumos, and FreeBSD");

use std::os::fd::AsRawFd;

pub use errors::{DeviceIoError, TocOp, TocResult};

/// Range of playable track numbers on the disc, leadout excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TocHeader {
    pub first_track: u8,
    pub last_track: u8,
}

/// Minute-second-frame address of a track start (or of the leadout).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackAddress {
    pub minute: u8,
    pub second: u8,
    /// 0-74; 75 frames per second.
    pub frame: u8,
}

/// Read the first/last track numbers from the disc's TOC.
///
/// `device` is a borrowed open handle to the CD-ROM block device; values are
/// returned exactly as the firmware reports them.
pub fn read_toc_header<D: AsRawFd>(device: &D) -> TocResult<TocHeader> {
    port::header_with(&os::OsPort, device.as_raw_fd())
}

/// Read the MSF start address of one track.
///
/// The track number is handed to the driver unvalidated; the ioctl fails for
/// tracks that are not on the disc and that failure is returned as-is.
pub fn read_toc_entry<D: AsRawFd>(device: &D, track: u8) -> TocResult<TrackAddress> {
    port::entry_with(&os::OsPort, device.as_raw_fd(), track)
}

/// Read the MSF address of the leadout, i.e. the end of the last track.
///
/// Needed to compute the duration of the final track, since the TOC only
/// stores start addresses.
pub fn read_leadout<D: AsRawFd>(device: &D) -> TocResult<TrackAddress> {
    port::leadout_with(&os::OsPort, device.as_raw_fd())
}
