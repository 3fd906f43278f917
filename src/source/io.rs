//! Adapter from [`std::io::Read`] to [`ByteSource`].

use std::io::{ErrorKind, Read};

use super::{ByteSource, ReadStatus};
use crate::error::RewindError;

/// A [`ByteSource`] over any [`std::io::Read`].
///
/// `Ok(0)` for a non-empty buffer is end of data. `WouldBlock` and
/// `Interrupted` become `ReadStatus::Read(0)`, so non-blocking readers
/// surface "no data right now" instead of an error.
///
/// # Example
///
/// ```
/// use rewindrs::{ByteSource, IoSource, ReadStatus};
///
/// let mut source = IoSource::new(&b"hello"[..]);
/// let mut buf = [0u8; 16];
/// assert_eq!(source.read(&mut buf)?, ReadStatus::Read(5));
/// assert_eq!(source.read(&mut buf)?, ReadStatus::Eof);
/// # Ok::<(), rewindrs::RewindError>(())
/// ```
#[derive(Debug)]
pub struct IoSource<R> {
    inner: R,
    open: bool,
}

impl<R: Read> IoSource<R> {
    /// Wraps a reader.
    pub fn new(inner: R) -> Self {
        Self { inner, open: true }
    }

    /// Returns a reference to the wrapped reader.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Unwraps the reader.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> ByteSource for IoSource<R> {
    fn read(&mut self, dst: &mut [u8]) -> Result<ReadStatus, RewindError> {
        if !self.open {
            return Err(RewindError::ClosedChannel);
        }
        if dst.is_empty() {
            return Ok(ReadStatus::Read(0));
        }

        match self.inner.read(dst) {
            Ok(0) => Ok(ReadStatus::Eof),
            Ok(n) => Ok(ReadStatus::Read(n)),
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::Interrupted) => {
                Ok(ReadStatus::Read(0))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn close(&mut self) -> Result<(), RewindError> {
        self.open = false;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open
    }
}
