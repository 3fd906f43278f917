//! Byte sources consumed by the rewindable reader.
//!
//! - [`ByteSource`] - Minimal "read some bytes" capability
//! - [`ReadStatus`] - Result of a single source read
//! - [`IoSource`] - Adapter for any [`std::io::Read`]

mod io;

pub use io::IoSource;

use crate::error::RewindError;

/// Outcome of a single read attempt.
///
/// `Read(0)` means the source has no data right now but is not exhausted.
/// It is a success value and callers are expected to retry later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadStatus {
    /// The given number of bytes were transferred into the destination.
    Read(usize),
    /// The source is exhausted.
    Eof,
}

impl ReadStatus {
    /// Returns the number of bytes transferred, `0` for [`ReadStatus::Eof`].
    pub fn bytes(self) -> usize {
        match self {
            ReadStatus::Read(n) => n,
            ReadStatus::Eof => 0,
        }
    }

    /// Returns `true` if the source reported end of data.
    pub fn is_eof(self) -> bool {
        matches!(self, ReadStatus::Eof)
    }
}

/// A sequential byte source.
///
/// A read may transfer fewer bytes than `dst` can hold even when more data
/// will eventually be available, and may transfer none without signaling end
/// of data. Only [`ReadStatus::Eof`] means the source is exhausted.
pub trait ByteSource {
    /// Attempts to fill `dst`, returning how many bytes were transferred.
    fn read(&mut self, dst: &mut [u8]) -> Result<ReadStatus, RewindError>;

    /// Releases the source. Subsequent reads must fail.
    fn close(&mut self) -> Result<(), RewindError>;

    /// Returns whether the source is still open.
    fn is_open(&self) -> bool;
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read(&mut self, dst: &mut [u8]) -> Result<ReadStatus, RewindError> {
        (**self).read(dst)
    }

    fn close(&mut self) -> Result<(), RewindError> {
        (**self).close()
    }

    fn is_open(&self) -> bool {
        (**self).is_open()
    }
}

impl<S: ByteSource + ?Sized> ByteSource for Box<S> {
    fn read(&mut self, dst: &mut [u8]) -> Result<ReadStatus, RewindError> {
        (**self).read(dst)
    }

    fn close(&mut self) -> Result<(), RewindError> {
        (**self).close()
    }

    fn is_open(&self) -> bool {
        (**self).is_open()
    }
}
