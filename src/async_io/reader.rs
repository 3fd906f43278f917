//! Async rewindable reader.
//!
//! The replay state machine of [`RewindableReader`](crate::RewindableReader)
//! in poll form. `Poll::Pending` from the inner reader plays the role of
//! "no data right now": when replayed bytes are already in the buffer the
//! poll completes with them instead of waiting.
//!
//! # Example
//!
//! ```ignore
//! use futures_util::io::AsyncReadExt;
//! use rewindrs::AsyncRewindableReader;
//!
//! async fn sniff<R: futures_io::AsyncRead + Unpin>(inner: R) -> std::io::Result<Vec<u8>> {
//!     let mut reader = AsyncRewindableReader::new(inner);
//!     let mut magic = [0u8; 4];
//!     reader.read_exact(&mut magic).await?;
//!     reader.rewind()?;
//!     reader.disable_rewinding();
//!
//!     let mut all = Vec::new();
//!     reader.read_to_end(&mut all).await?;
//!     Ok(all)
//! }
//! ```

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_io::AsyncRead;
use log::{debug, trace};
use pin_project_lite::pin_project;

use crate::buffer::Retained;
use crate::config::RewindConfig;
use crate::error::RewindError;
use crate::reader::State;

pin_project! {
    /// An async reader that can return to the start of the stream until told otherwise.
    ///
    /// This uses `futures_io::AsyncRead` which is runtime-agnostic.
    /// `Ready(Ok(0))` for a non-empty buffer means end of data, as for any
    /// `AsyncRead`.
    #[derive(Debug)]
    pub struct AsyncRewindableReader<R> {
        #[pin]
        reader: R,
        retained: Retained,
        state: State,
        config: RewindConfig,
    }
}

impl<R: AsyncRead> AsyncRewindableReader<R> {
    /// Wraps an async reader with the default configuration.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            retained: Retained::default(),
            state: State::Rewindable,
            config: RewindConfig::default(),
        }
    }

    /// Wraps an async reader with the given configuration.
    pub fn with_config(reader: R, config: RewindConfig) -> Result<Self, RewindError> {
        config.validate()?;
        Ok(Self {
            reader,
            retained: Retained::with_capacity(config.initial_capacity()),
            state: State::Rewindable,
            config,
        })
    }
}

impl<R> AsyncRewindableReader<R> {
    /// Moves back to the point where retention began.
    ///
    /// Fails with [`RewindError::IllegalState`] if closed or if rewinding has
    /// been disabled.
    pub fn rewind(&mut self) -> Result<(), RewindError> {
        self.state.check_rewind()?;
        debug!("rewinding over {} retained bytes", self.retained.len());
        self.retained.rewind();
        Ok(())
    }

    /// Permanently gives up rewinding. Pending bytes are still delivered.
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

    /// Marks the reader closed and releases retained bytes.
    ///
    /// The inner reader is dropped with `self`; use
    /// [`into_inner`](Self::into_inner) to recover it instead.
    pub fn close(&mut self) {
        if self.state == State::Closed {
            return;
        }
        debug!("closing reader, releasing {} bytes", self.retained.len());
        self.state = State::Closed;
        self.retained.release();
    }

    /// Returns whether the reader is still open.
    pub fn is_open(&self) -> bool {
        self.state != State::Closed
    }

    /// Returns whether [`rewind`](Self::rewind) can still succeed.
    pub fn is_rewindable(&self) -> bool {
        self.state == State::Rewindable
    }

    /// Number of bytes currently held in the arena.
    pub fn retained_len(&self) -> usize {
        self.retained.len()
    }

    /// Returns a reference to the wrapped reader.
    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    /// Unwraps the reader, discarding retained bytes.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: AsyncRead> AsyncRead for AsyncRewindableReader<R> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut [u8],
    ) -> Poll<io::Result<usize>> {
        let this = self.project();

        if buf.is_empty() {
            return Poll::Ready(Ok(0));
        }

        let retain = match *this.state {
            State::Closed => return Poll::Ready(Err(RewindError::ClosedChannel.into())),
            State::Disabled if this.retained.available() == 0 => {
                return this.reader.poll_read(cx, buf);
            }
            State::Disabled => false,
            State::Rewindable => true,
        };

        let replayed = this.retained.replay_into(buf);
        if replayed == buf.len() {
            if !retain && this.retained.available() == 0 {
                this.retained.release();
            }
            return Poll::Ready(Ok(replayed));
        }

        let want = buf.len() - replayed;
        let budget = match this.config.max_retained() {
            Some(limit) if retain => want.min(limit.saturating_sub(this.retained.len())),
            _ => want,
        };
        if budget == 0 {
            if replayed > 0 {
                return Poll::Ready(Ok(replayed));
            }
            let limit = this.config.max_retained().unwrap_or_default();
            return Poll::Ready(Err(RewindError::RetainLimitExceeded { limit }.into()));
        }

        let fresh = &mut buf[replayed..replayed + budget];
        let n = match this.reader.poll_read(cx, fresh) {
            Poll::Pending if replayed == 0 => return Poll::Pending,
            Poll::Pending => 0,
            Poll::Ready(Err(e)) => {
                this.retained.unread(replayed);
                return Poll::Ready(Err(e));
            }
            Poll::Ready(Ok(n)) => n,
        };

        if retain {
            if n > 0 {
                this.retained.append_delivered(&fresh[..n]);
            }
        } else if this.retained.available() == 0 {
            this.retained.release();
        }
        trace!("polled {} replayed + {} fresh bytes", replayed, n);
        Poll::Ready(Ok(replayed + n))
    }
}
