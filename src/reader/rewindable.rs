//! The rewindable reader state machine.
//!
//! Every byte fetched from the source while rewinding is enabled is appended
//! to an arena. A read first drains arena bytes the current pass has not seen
//! yet, then makes at most one attempt on the source. The source's own
//! partial-read and "no data right now" results are passed through as-is; the
//! reader never loops internally waiting for data.
//!
//! # Example
//!
//! ```
//! use rewindrs::{IoSource, ReadStatus, RewindableReader};
//!
//! let mut reader = RewindableReader::new(IoSource::new(&b"MAGIC payload"[..]));
//!
//! let mut header = [0u8; 5];
//! assert_eq!(reader.read(&mut header)?, ReadStatus::Read(5));
//! assert_eq!(&header, b"MAGIC");
//!
//! // Not what we hoped for: go back and hand the whole stream on.
//! reader.rewind()?;
//! reader.disable_rewinding();
//!
//! let mut all = [0u8; 32];
//! assert_eq!(reader.read(&mut all)?, ReadStatus::Read(13));
//! assert_eq!(&all[..13], b"MAGIC payload");
//! # Ok::<(), rewindrs::RewindError>(())
//! ```

use std::io;

use log::{debug, trace};

use super::State;
use crate::buffer::{DstBuf, Retained};
use crate::config::RewindConfig;
use crate::error::RewindError;
use crate::source::{ByteSource, ReadStatus};

/// A reader that can return to the start of the stream until told otherwise.
///
/// `RewindableReader` wraps a [`ByteSource`] and exposes the same read / close /
/// is-open contract, so it can stand in for the source anywhere. While
/// rewinding is enabled it keeps a copy of every byte it has fetched;
/// [`rewind`](Self::rewind) replays them from the beginning before any new
/// source data. Call [`disable_rewinding`](Self::disable_rewinding) once replay
/// is no longer needed to release that memory.
///
/// A read may return fewer bytes than requested, including `Read(0)` when the
/// source has nothing right now. Callers loop exactly as they would against
/// the source directly.
///
/// The reader is not meant to be shared between threads without external
/// synchronization; every operation takes `&mut self`.
#[derive(Debug)]
pub struct RewindableReader<S> {
    source: S,
    retained: Retained,
    state: State,
    config: RewindConfig,
}

impl<S: ByteSource> RewindableReader<S> {
    /// Wraps an open source with the default configuration.
    pub fn new(source: S) -> Self {
        Self {
            source,
            retained: Retained::default(),
            state: State::Rewindable,
            config: RewindConfig::default(),
        }
    }

    /// Wraps an open source with the given configuration.
    ///
    /// Returns error if the configuration is invalid.
    pub fn with_config(source: S, config: RewindConfig) -> Result<Self, RewindError> {
        config.validate()?;
        Ok(Self {
            source,
            retained: Retained::with_capacity(config.initial_capacity()),
            state: State::Rewindable,
            config,
        })
    }

    /// Reads into `dst`, replaying retained bytes before touching the source.
    ///
    /// Returns [`ReadStatus::Read`] with the number of bytes copied (possibly
    /// zero when the source has no data right now) or [`ReadStatus::Eof`] when
    /// nothing was replayed and the source is exhausted.
    ///
    /// # Errors
    ///
    /// - [`RewindError::ClosedChannel`] after [`close`](Self::close)
    /// - [`RewindError::RetainLimitExceeded`] when fresh bytes are needed but
    ///   the configured retention limit is reached
    /// - any error from the source, in which case bytes replayed by this call
    ///   are handed out again by the next one
    pub fn read(&mut self, dst: &mut [u8]) -> Result<ReadStatus, RewindError> {
        if dst.is_empty() {
            return Ok(ReadStatus::Read(0));
        }

        match self.state {
            State::Closed => Err(RewindError::ClosedChannel),
            State::Disabled if self.retained.available() == 0 => self.source.read(dst),
            State::Disabled => self.read_draining(dst),
            State::Rewindable => self.read_retaining(dst),
        }
    }

    /// Reads into the unfilled region of `buf` and advances its fill position.
    pub fn read_buf(&mut self, buf: &mut DstBuf<'_>) -> Result<ReadStatus, RewindError> {
        let status = self.read(buf.unfilled_mut())?;
        buf.advance(status.bytes());
        Ok(status)
    }

    /// Moves back to the point where retention began.
    ///
    /// The next reads replay every retained byte before any new source data.
    ///
    /// # Errors
    ///
    /// [`RewindError::IllegalState`] if the reader is closed or rewinding has
    /// been disabled. The reader is unchanged in either case.
    pub fn rewind(&mut self) -> Result<(), RewindError> {
        self.state.check_rewind()?;
        debug!("rewinding over {} retained bytes", self.retained.len());
        self.retained.rewind();
        Ok(())
    }

    /// Permanently gives up rewinding and releases the retained bytes.
    ///
    /// Bytes that were retained but not yet delivered in the current pass are
    /// still handed out by the following reads; after that every read goes
    /// straight to the source. Calling this again, or after close, does nothing.
    pub fn disable_rewinding(&mut self) {
        if self.state != State::Rewindable {
            return;
        }
        debug!(
            "disabling rewind: releasing {} bytes, {} still pending",
            self.retained.offset(),
            self.retained.available()
        );
        self.state = State::Disabled;
        self.retained.discard_delivered();
    }

    /// Closes the source and releases retained bytes.
    ///
    /// Closing an already closed reader is a no-op. An error from the source
    /// is returned, but the reader is closed regardless.
    pub fn close(&mut self) -> Result<(), RewindError> {
        if self.state == State::Closed {
            return Ok(());
        }
        debug!("closing reader, releasing {} bytes", self.retained.len());
        self.state = State::Closed;
        self.retained.release();
        self.source.close()
    }

    /// Returns whether both the reader and its source are open.
    pub fn is_open(&self) -> bool {
        self.state != State::Closed && self.source.is_open()
    }

    /// Returns whether [`rewind`](Self::rewind) can still succeed.
    pub fn is_rewindable(&self) -> bool {
        self.state == State::Rewindable
    }

    /// Number of bytes currently held in the arena.
    pub fn retained_len(&self) -> usize {
        self.retained.len()
    }

    /// Position of the replay cursor within the arena.
    pub fn replay_offset(&self) -> usize {
        self.retained.offset()
    }

    /// Returns a reference to the wrapped source.
    pub fn get_ref(&self) -> &S {
        &self.source
    }

    /// Returns the configuration in use.
    pub fn config(&self) -> &RewindConfig {
        &self.config
    }

    fn read_retaining(&mut self, dst: &mut [u8]) -> Result<ReadStatus, RewindError> {
        let replayed = self.retained.replay_into(dst);
        if replayed == dst.len() {
            trace!("served {} bytes from replay", replayed);
            return Ok(ReadStatus::Read(replayed));
        }

        let budget = self.fetch_budget(dst.len() - replayed);
        if budget == 0 {
            if replayed > 0 {
                return Ok(ReadStatus::Read(replayed));
            }
            let limit = self.config.max_retained().unwrap_or_default();
            return Err(RewindError::RetainLimitExceeded { limit });
        }

        let fresh = &mut dst[replayed..replayed + budget];
        let status = match self.source.read(fresh) {
            Ok(status) => status,
            Err(e) => {
                self.retained.unread(replayed);
                return Err(e);
            }
        };

        match status {
            ReadStatus::Read(n) if n > 0 => {
                self.retained.append_delivered(&fresh[..n]);
                trace!(
                    "served {} replayed + {} fresh bytes, {} retained",
                    replayed,
                    n,
                    self.retained.len()
                );
                Ok(ReadStatus::Read(replayed + n))
            }
            _ if replayed > 0 => Ok(ReadStatus::Read(replayed)),
            status => Ok(status),
        }
    }

    fn read_draining(&mut self, dst: &mut [u8]) -> Result<ReadStatus, RewindError> {
        let replayed = self.retained.replay_into(dst);
        let status = if replayed == dst.len() {
            ReadStatus::Read(0)
        } else {
            match self.source.read(&mut dst[replayed..]) {
                Ok(status) => status,
                Err(e) => {
                    self.retained.unread(replayed);
                    return Err(e);
                }
            }
        };

        if self.retained.available() == 0 {
            trace!("pending bytes drained, reading directly from source");
            self.retained.release();
        }
        Ok(ReadStatus::Read(replayed + status.bytes()))
    }

    /// How many fresh bytes may be fetched without exceeding the retention limit.
    fn fetch_budget(&self, want: usize) -> usize {
        match self.config.max_retained() {
            Some(limit) => want.min(limit.saturating_sub(self.retained.len())),
            None => want,
        }
    }
}

impl<S: ByteSource> ByteSource for RewindableReader<S> {
    fn read(&mut self, dst: &mut [u8]) -> Result<ReadStatus, RewindError> {
        RewindableReader::read(self, dst)
    }

    fn close(&mut self) -> Result<(), RewindError> {
        RewindableReader::close(self)
    }

    fn is_open(&self) -> bool {
        RewindableReader::is_open(self)
    }
}

/// `Eof` maps to `Ok(0)`; "no data right now" maps to [`io::ErrorKind::WouldBlock`].
impl<S: ByteSource> io::Read for RewindableReader<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match RewindableReader::read(self, buf)? {
            ReadStatus::Eof => Ok(0),
            ReadStatus::Read(0) if !buf.is_empty() => Err(io::ErrorKind::WouldBlock.into()),
            ReadStatus::Read(n) => Ok(n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::IoSource;

    const INPUT: &[u8] = b"The quick brown fox jumps over the lazy dog.";

    /// Serves scripted results, recording how often it was asked.
    struct Scripted {
        steps: Vec<Result<&'static [u8], io::ErrorKind>>,
        calls: usize,
        open: bool,
    }

    impl Scripted {
        fn new(steps: Vec<Result<&'static [u8], io::ErrorKind>>) -> Self {
            Self {
                steps,
                calls: 0,
                open: true,
            }
        }
    }

    impl ByteSource for Scripted {
        fn read(&mut self, dst: &mut [u8]) -> Result<ReadStatus, RewindError> {
            let step = self.steps.get(self.calls).cloned();
            self.calls += 1;
            match step {
                None => Ok(ReadStatus::Eof),
                Some(Err(kind)) => Err(io::Error::from(kind).into()),
                Some(Ok(bytes)) => {
                    assert!(bytes.len() <= dst.len(), "script step larger than request");
                    dst[..bytes.len()].copy_from_slice(bytes);
                    Ok(ReadStatus::Read(bytes.len()))
                }
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

    #[test]
    fn test_empty_destination_never_touches_source() {
        let mut reader = RewindableReader::new(Scripted::new(vec![Ok(&b"abc"[..])]));
        assert_eq!(reader.read(&mut []).unwrap(), ReadStatus::Read(0));
        assert_eq!(reader.get_ref().calls, 0);
        assert_eq!(reader.retained_len(), 0);
    }

    #[test]
    fn test_steady_state_retains_everything() {
        let mut reader = RewindableReader::new(IoSource::new(INPUT));
        let mut buf = [0u8; 10];
        assert_eq!(reader.read(&mut buf).unwrap(), ReadStatus::Read(10));
        assert_eq!(reader.retained_len(), 10);
        assert_eq!(reader.replay_offset(), 10);
    }

    #[test]
    fn test_full_replay_skips_source() {
        let mut reader = RewindableReader::new(Scripted::new(vec![Ok(&b"abcdef"[..])]));
        let mut buf = [0u8; 6];
        reader.read(&mut buf).unwrap();
        reader.rewind().unwrap();

        let mut short = [0u8; 4];
        assert_eq!(reader.read(&mut short).unwrap(), ReadStatus::Read(4));
        assert_eq!(&short, b"abcd");
        assert_eq!(reader.get_ref().calls, 1);
    }

    #[test]
    fn test_replay_then_no_data_returns_replayed_count() {
        let mut reader = RewindableReader::new(Scripted::new(vec![
            Ok(&b"abc"[..]),
            Ok(&b""[..]),
            Ok(&b"def"[..]),
        ]));
        let mut buf = [0u8; 3];
        reader.read(&mut buf).unwrap();
        reader.rewind().unwrap();

        let mut big = [0u8; 6];
        assert_eq!(reader.read(&mut big).unwrap(), ReadStatus::Read(3));
        assert_eq!(reader.read(&mut big[3..]).unwrap(), ReadStatus::Read(3));
        assert_eq!(&big, b"abcdef");
        assert_eq!(reader.retained_len(), 6);
    }

    #[test]
    fn test_replay_then_eof_returns_replayed_count() {
        let mut reader = RewindableReader::new(Scripted::new(vec![Ok(&b"abc"[..])]));
        let mut buf = [0u8; 3];
        reader.read(&mut buf).unwrap();
        reader.rewind().unwrap();

        let mut big = [0u8; 8];
        assert_eq!(reader.read(&mut big).unwrap(), ReadStatus::Read(3));
        assert_eq!(reader.read(&mut big).unwrap(), ReadStatus::Eof);
    }

    #[test]
    fn test_source_error_after_replay_is_not_lossy() {
        let mut reader = RewindableReader::new(Scripted::new(vec![
            Ok(&b"abc"[..]),
            Err(io::ErrorKind::ConnectionReset),
            Ok(&b"de"[..]),
        ]));
        let mut buf = [0u8; 3];
        reader.read(&mut buf).unwrap();
        reader.rewind().unwrap();

        let mut big = [0u8; 5];
        match reader.read(&mut big) {
            Err(RewindError::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::ConnectionReset),
            other => panic!("unexpected: {:?}", other),
        }
        assert_eq!(reader.replay_offset(), 0);

        assert_eq!(reader.read(&mut big).unwrap(), ReadStatus::Read(5));
        assert_eq!(&big, b"abcde");
    }

    #[test]
    fn test_source_error_without_replay_leaves_state() {
        let mut reader = RewindableReader::new(Scripted::new(vec![Err(
            io::ErrorKind::UnexpectedEof,
        )]));
        let mut buf = [0u8; 4];
        assert!(matches!(reader.read(&mut buf), Err(RewindError::Io(_))));
        assert_eq!(reader.retained_len(), 0);
        assert_eq!(reader.replay_offset(), 0);
    }

    #[test]
    fn test_disable_keeps_pending_bytes() {
        let mut reader = RewindableReader::new(IoSource::new(INPUT));
        let mut buf = [0u8; 20];
        reader.read(&mut buf).unwrap();
        reader.rewind().unwrap();
        let mut head = [0u8; 5];
        reader.read(&mut head).unwrap();

        reader.disable_rewinding();
        assert!(!reader.is_rewindable());
        assert_eq!(reader.retained_len(), 15);

        let mut rest = [0u8; 64];
        assert_eq!(reader.read(&mut rest).unwrap(), ReadStatus::Read(INPUT.len() - 5));
        assert_eq!(&rest[..INPUT.len() - 5], &INPUT[5..]);
        assert_eq!(reader.retained_len(), 0);
        assert_eq!(reader.read(&mut rest).unwrap(), ReadStatus::Eof);
    }

    #[test]
    fn test_disable_in_steady_state_releases_everything() {
        let mut reader = RewindableReader::new(IoSource::new(INPUT));
        let mut buf = [0u8; 20];
        reader.read(&mut buf).unwrap();
        reader.disable_rewinding();
        assert_eq!(reader.retained_len(), 0);

        let mut next = [0u8; 5];
        assert_eq!(reader.read(&mut next).unwrap(), ReadStatus::Read(5));
        assert_eq!(&next, &INPUT[20..25]);
        assert_eq!(reader.retained_len(), 0);
    }

    #[test]
    fn test_disable_is_idempotent() {
        let mut reader = RewindableReader::new(IoSource::new(INPUT));
        reader.disable_rewinding();
        reader.disable_rewinding();
        assert!(matches!(
            reader.rewind(),
            Err(RewindError::IllegalState(msg)) if msg.starts_with("cannot rewind")
        ));
    }

    #[test]
    fn test_retain_limit_caps_fetch() {
        let config = RewindConfig::default().with_max_retained(Some(8));
        let mut reader = RewindableReader::with_config(IoSource::new(INPUT), config).unwrap();

        let mut buf = [0u8; 20];
        assert_eq!(reader.read(&mut buf).unwrap(), ReadStatus::Read(8));
        assert_eq!(reader.retained_len(), 8);

        assert!(matches!(
            reader.read(&mut buf),
            Err(RewindError::RetainLimitExceeded { limit: 8 })
        ));

        reader.rewind().unwrap();
        assert_eq!(reader.read(&mut buf).unwrap(), ReadStatus::Read(8));
        assert_eq!(&buf[..8], &INPUT[..8]);

        reader.disable_rewinding();
        assert_eq!(reader.read(&mut buf).unwrap(), ReadStatus::Read(20));
        assert_eq!(&buf, &INPUT[8..28]);
    }

    #[test]
    fn test_with_config_rejects_invalid() {
        let config = RewindConfig::default()
            .with_initial_capacity(64)
            .with_max_retained(Some(8));
        assert!(RewindableReader::with_config(IoSource::new(INPUT), config).is_err());
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut reader = RewindableReader::new(Scripted::new(vec![Ok(&b"abc"[..])]));
        reader.close().unwrap();
        reader.close().unwrap();
        assert!(!reader.is_open());
        assert!(!reader.get_ref().open);
        assert_eq!(reader.retained_len(), 0);
    }

    #[test]
    fn test_rewind_after_disable_then_close() {
        let mut reader = RewindableReader::new(IoSource::new(INPUT));
        reader.disable_rewinding();
        reader.close().unwrap();
        assert!(matches!(reader.rewind(), Err(RewindError::IllegalState(_))));
    }

    #[test]
    fn test_read_buf_advances() {
        let mut reader = RewindableReader::new(IoSource::new(INPUT));
        let mut storage = [0u8; 12];
        let mut buf = DstBuf::new(&mut storage);
        buf.set_limit(4);
        assert_eq!(reader.read_buf(&mut buf).unwrap(), ReadStatus::Read(4));
        buf.set_limit(12);
        assert_eq!(reader.read_buf(&mut buf).unwrap(), ReadStatus::Read(8));
        assert_eq!(buf.filled(), &INPUT[..12]);
    }

    #[test]
    fn test_io_read_maps_no_data_to_would_block() {
        use std::io::Read;

        let mut reader = RewindableReader::new(Scripted::new(vec![Ok(&b""[..]), Ok(&b"xy"[..])]));
        let mut buf = [0u8; 4];
        let err = Read::read(&mut reader, &mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::WouldBlock);
        assert_eq!(Read::read(&mut reader, &mut buf).unwrap(), 2);
        assert_eq!(Read::read(&mut reader, &mut buf).unwrap(), 0);
    }

    #[test]
    fn test_io_read_after_close() {
        use std::io::Read;

        let mut reader = RewindableReader::new(IoSource::new(INPUT));
        reader.close().unwrap();
        let mut buf = [0u8; 4];
        let err = Read::read(&mut reader, &mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotConnected);
    }

    #[test]
    fn test_read_to_end_through_io_read() {
        use std::io::Read;

        let mut reader = RewindableReader::new(IoSource::new(INPUT));
        let mut head = [0u8; 9];
        reader.read_exact(&mut head).unwrap();
        reader.rewind().unwrap();

        let mut all = Vec::new();
        reader.read_to_end(&mut all).unwrap();
        assert_eq!(all, INPUT);
    }
}
