//! Fixed-capacity sample ring buffer for the real-time input path.

use crate::core::types::Sample;

/// Fixed-capacity circular sample store.
///
/// Never allocates after construction and never shifts memory; all
/// operations have deterministic upper bounds, which keeps the buffer
/// safe to use inside a render callback.
#[derive(Debug, Clone)]
pub struct RingBuffer {
    data: Vec<Sample>,
    read: usize,
    write: usize,
    len: usize,
}

impl RingBuffer {
    /// Creates a ring buffer with fixed capacity.
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            data: vec![0.0; cap],
            read: 0,
            write: 0,
            len: 0,
        }
    }

    /// Returns the number of samples currently stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns the fixed capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Returns available free space.
    #[inline]
    pub fn available(&self) -> usize {
        self.capacity() - self.len
    }

    /// Returns true when no samples are stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drops all stored samples and rewinds the cursors.
    #[inline]
    pub fn clear(&mut self) {
        self.read = 0;
        self.write = 0;
        self.len = 0;
    }

    /// Appends as many samples as fit from `input`.
    ///
    /// Returns the number of samples written.
    pub fn push_slice(&mut self, input: &[Sample]) -> usize {
        let cap = self.capacity();
        if cap == 0 {
            return 0;
        }
        let to_push = input.len().min(self.available());
        if to_push == 0 {
            return 0;
        }
        let first = to_push.min(cap - self.write);
        self.data[self.write..self.write + first].copy_from_slice(&input[..first]);
        let second = to_push - first;
        if second > 0 {
            self.data[..second].copy_from_slice(&input[first..to_push]);
        }
        self.write = (self.write + to_push) % cap;
        self.len += to_push;
        to_push
    }

    /// Copies samples from the front into `out` without removing them.
    ///
    /// Returns the number of samples copied.
    pub fn peek_slice(&self, out: &mut [Sample]) -> usize {
        let cap = self.capacity();
        let to_copy = out.len().min(self.len);
        if to_copy == 0 {
            return 0;
        }
        let first = to_copy.min(cap - self.read);
        out[..first].copy_from_slice(&self.data[self.read..self.read + first]);
        let second = to_copy - first;
        if second > 0 {
            out[first..to_copy].copy_from_slice(&self.data[..second]);
        }
        to_copy
    }

    /// Discards up to `n` samples from the front.
    ///
    /// Returns the number of samples discarded.
    pub fn discard(&mut self, n: usize) -> usize {
        let cap = self.capacity();
        let to_drop = n.min(self.len);
        if to_drop == 0 {
            return 0;
        }
        self.read = (self.read + to_drop) % cap;
        self.len -= to_drop;
        to_drop
    }
}
