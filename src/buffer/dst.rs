//! Destination-buffer cursor and copy helpers.

/// Copies as many bytes as fit from `src` into `dst`, returning the count.
#[inline]
pub(crate) fn copy_available(src: &[u8], dst: &mut [u8]) -> usize {
    let n = src.len().min(dst.len());
    dst[..n].copy_from_slice(&src[..n]);
    n
}

/// A caller-owned destination buffer that is filled across several reads.
///
/// The region `[0, filled)` holds bytes already delivered; reads write into
/// `[filled, limit)`. Lowering the limit restricts how much the next read may
/// transfer without reallocating.
///
/// # Example
///
/// ```
/// use rewindrs::DstBuf;
///
/// let mut storage = [0u8; 8];
/// let mut buf = DstBuf::new(&mut storage);
/// buf.set_limit(3);
/// assert_eq!(buf.put_slice(b"hello"), 3);
/// assert_eq!(buf.filled(), b"hel");
/// assert_eq!(buf.remaining(), 0);
/// ```
#[derive(Debug)]
pub struct DstBuf<'a> {
    buf: &'a mut [u8],
    filled: usize,
    limit: usize,
}

impl<'a> DstBuf<'a> {
    /// Wraps `buf` with nothing filled and the limit at full capacity.
    pub fn new(buf: &'a mut [u8]) -> Self {
        let limit = buf.len();
        Self {
            buf,
            filled: 0,
            limit,
        }
    }

    /// Total size of the underlying buffer.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Current limit.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Sets the limit, clamped to the capacity.
    ///
    /// If the new limit is below the fill position the fill position is moved
    /// back to it.
    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit.min(self.buf.len());
        self.filled = self.filled.min(self.limit);
    }

    /// Bytes filled so far.
    pub fn filled(&self) -> &[u8] {
        &self.buf[..self.filled]
    }

    /// Number of bytes filled so far.
    pub fn filled_len(&self) -> usize {
        self.filled
    }

    /// Space left before the limit.
    pub fn remaining(&self) -> usize {
        self.limit - self.filled
    }

    /// The writable region `[filled, limit)`.
    pub fn unfilled_mut(&mut self) -> &mut [u8] {
        &mut self.buf[self.filled..self.limit]
    }

    /// Marks `n` more bytes as filled.
    ///
    /// # Panics
    ///
    /// Panics if `n` exceeds [`remaining`](Self::remaining).
    pub fn advance(&mut self, n: usize) {
        assert!(
            n <= self.remaining(),
            "advance out of range: {} > {}",
            n,
            self.remaining()
        );
        self.filled += n;
    }

    /// Copies as much of `src` as fits and returns the number of bytes copied.
    pub fn put_slice(&mut self, src: &[u8]) -> usize {
        let n = copy_available(src, self.unfilled_mut());
        self.filled += n;
        n
    }

    /// Resets the fill position and restores the limit to full capacity.
    pub fn clear(&mut self) {
        self.filled = 0;
        self.limit = self.buf.len();
    }
}
