use std::fmt;
use std::io;

use thiserror::Error;

/// Which TOC query the failed ioctl belonged to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TocOp {
    TocHeader,
    TocEntry,
}

impl fmt::Display for TocOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TocHeader => write!(f, "read TOC header"),
            Self::TocEntry => write!(f, "read TOC entry"),
        }
    }
}

/// A TOC ioctl failed; carries the OS error code untouched.
#[derive(Debug, Error)]
#[error("{op} ioctl failed: {source}")]
pub struct DeviceIoError {
    pub op: TocOp,
    #[source]
    pub source: io::Error,
}

impl DeviceIoError {
    pub(crate) fn last_os_error(op: TocOp) -> Self {
        Self {
            op,
            source: io::Error::last_os_error(),
        }
    }

    /// Raw errno reported by the failed system call, when the OS provided one.
    pub fn raw_os_error(&self) -> Option<i32> {
        self.source.raw_os_error()
    }
}

pub type TocResult<T> = Result<T, DeviceIoError>;
