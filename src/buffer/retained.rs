//! Append-only arena of fetched bytes with a replay cursor.

use bytes::{Buf, BytesMut};

use super::copy_available;

/// Bytes fetched from a source since retention began.
///
/// `[0, offset)` has been delivered in the current pass and can be replayed.
/// `[offset, len)` is retained but not yet delivered.
#[derive(Debug, Default)]
pub(crate) struct Retained {
    data: BytesMut,
    offset: usize,
}

impl Retained {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            data: BytesMut::with_capacity(capacity),
            offset: 0,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub(crate) fn offset(&self) -> usize {
        self.offset
    }

    /// Bytes retained but not yet delivered in this pass.
    #[inline]
    pub(crate) fn available(&self) -> usize {
        self.data.len() - self.offset
    }

    pub(crate) fn rewind(&mut self) {
        self.offset = 0;
    }

    /// Copies pending bytes into `dst` and moves the cursor past them.
    pub(crate) fn replay_into(&mut self, dst: &mut [u8]) -> usize {
        let n = copy_available(&self.data[self.offset..], dst);
        self.offset += n;
        n
    }

    /// Moves the cursor back over `n` bytes handed out by a call that then failed.
    pub(crate) fn unread(&mut self, n: usize) {
        debug_assert!(n <= self.offset);
        self.offset -= n;
    }

    /// Appends freshly fetched bytes that were already handed to the caller.
    ///
    /// Only valid while nothing is pending, so the cursor stays at the end.
    pub(crate) fn append_delivered(&mut self, fresh: &[u8]) {
        debug_assert_eq!(self.available(), 0);
        self.data.extend_from_slice(fresh);
        self.offset = self.data.len();
    }

    /// Drops the replayable prefix, keeping only pending bytes.
    pub(crate) fn discard_delivered(&mut self) {
        self.data.advance(self.offset);
        self.offset = 0;
        if self.data.is_empty() {
            self.release();
        }
    }

    /// Frees the arena.
    pub(crate) fn release(&mut self) {
        self.data = BytesMut::new();
        self.offset = 0;
    }

    #[cfg(test)]
    pub(crate) fn capacity(&self) -> usize {
        self.data.capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_then_replay() {
        let mut retained = Retained::default();
        retained.append_delivered(b"hello");
        assert_eq!(retained.len(), 5);
        assert_eq!(retained.offset(), 5);
        assert_eq!(retained.available(), 0);

        retained.rewind();
        assert_eq!(retained.available(), 5);

        let mut dst = [0u8; 3];
        assert_eq!(retained.replay_into(&mut dst), 3);
        assert_eq!(&dst, b"hel");
        assert_eq!(retained.replay_into(&mut dst), 2);
        assert_eq!(&dst[..2], b"lo");
        assert_eq!(retained.replay_into(&mut dst), 0);
    }

    #[test]
    fn test_discard_delivered_keeps_pending() {
        let mut retained = Retained::default();
        retained.append_delivered(b"abcdef");
        retained.rewind();
        let mut dst = [0u8; 2];
        retained.replay_into(&mut dst);

        retained.discard_delivered();
        assert_eq!(retained.offset(), 0);
        assert_eq!(retained.len(), 4);

        let mut rest = [0u8; 8];
        assert_eq!(retained.replay_into(&mut rest), 4);
        assert_eq!(&rest[..4], b"cdef");
    }

    #[test]
    fn test_discard_delivered_releases_when_drained() {
        let mut retained = Retained::with_capacity(1024);
        retained.append_delivered(b"abc");
        retained.discard_delivered();
        assert_eq!(retained.len(), 0);
        assert_eq!(retained.capacity(), 0);
    }

    #[test]
    fn test_release() {
        let mut retained = Retained::with_capacity(64);
        assert!(retained.capacity() >= 64);
        retained.append_delivered(b"xyz");
        retained.release();
        assert_eq!(retained.len(), 0);
        assert_eq!(retained.offset(), 0);
        assert_eq!(retained.capacity(), 0);
    }
}
