//! Grow-only byte buffer reused across invocations.
//!
//! Each call resets the length but keeps the allocation, so repeated calls on
//! similarly sized blocks stop allocating after the first one.

/// Reusable output buffer for serialized headers.
#[derive(Debug, Default)]
pub(crate) struct HeaderBuffer {
    /// The underlying storage.
    buf: Vec<u8>,
    /// Largest length ever written, for diagnostics.
    peak_len: usize,
}

impl HeaderBuffer {
    /// Reset the length to zero, keeping capacity.
    #[inline]
    pub(crate) fn reset(&mut self) {
        self.peak_len = self.peak_len.max(self.buf.len());
        self.buf.clear();
    }

    /// Ensure room for at least `additional` more bytes. Never shrinks.
    #[inline]
    pub(crate) fn reserve(&mut self, additional: usize) {
        self.buf.reserve(additional);
    }

    /// Whether the buffer has never been allocated.
    #[inline]
    pub(crate) fn is_unallocated(&self) -> bool {
        self.buf.capacity() == 0
    }

    /// Mutable access for writers that append to a `Vec<u8>`.
    #[inline]
    pub(crate) fn as_vec_mut(&mut self) -> &mut Vec<u8> {
        &mut self.buf
    }

    /// Bytes written since the last reset.
    #[inline]
    pub(crate) fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    #[inline]
    pub(crate) fn peak_len(&self) -> usize {
        self.peak_len.max(self.buf.len())
    }
}
