//! Fixed-capacity FIFO for the far-end reference signal.
//!
//! The engine buffers loudspeaker samples here ahead of near-end
//! processing. Unlike a general ring buffer, writes never fail: when the
//! buffer is full the oldest samples are flushed to make room, since stale
//! reference data is useless once the matching near-end audio has passed.

/// FIFO of far-end samples with flush-oldest overflow behavior.
///
/// # Invariants
///
/// - `read_pos` and `write_pos` are in `0..capacity`
/// - `len` is the number of buffered samples, in `0..=capacity`
#[derive(Debug, Clone)]
pub(crate) struct FarendBuffer {
    data: Vec<i16>,
    read_pos: usize,
    write_pos: usize,
    len: usize,
}

impl FarendBuffer {
    /// Creates a buffer holding up to `capacity` samples.
    pub(crate) fn new(capacity: usize) -> Self {
        debug_assert!(capacity > 0);
        Self {
            data: vec![0; capacity],
            read_pos: 0,
            write_pos: 0,
            len: 0,
        }
    }

    /// Resets the buffer to its initial empty state.
    pub(crate) fn clear(&mut self) {
        self.read_pos = 0;
        self.write_pos = 0;
        self.len = 0;
        self.data.fill(0);
    }

    /// Number of buffered samples.
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Appends `samples`, flushing the oldest buffered samples first if
    /// there is not enough free space.
    ///
    /// Returns the number of samples flushed (0 in the common case).
    pub(crate) fn write(&mut self, samples: &[i16]) -> usize {
        let capacity = self.data.len();
        debug_assert!(samples.len() <= capacity);

        let free = capacity - self.len;
        let flushed = samples.len().saturating_sub(free);
        if flushed > 0 {
            self.discard(flushed);
        }

        let margin = capacity - self.write_pos;
        if samples.len() > margin {
            self.data[self.write_pos..].copy_from_slice(&samples[..margin]);
            self.data[..samples.len() - margin].copy_from_slice(&samples[margin..]);
            self.write_pos = samples.len() - margin;
        } else {
            self.data[self.write_pos..self.write_pos + samples.len()].copy_from_slice(samples);
            self.write_pos = (self.write_pos + samples.len()) % capacity;
        }
        self.len += samples.len();

        flushed
    }

    /// Consumes up to `output.len()` of the oldest samples into `output`,
    /// zero-filling whatever the buffer could not provide.
    ///
    /// Returns the number of real samples read.
    pub(crate) fn read(&mut self, output: &mut [i16]) -> usize {
        let capacity = self.data.len();
        let count = output.len().min(self.len);

        let margin = capacity - self.read_pos;
        if count > margin {
            output[..margin].copy_from_slice(&self.data[self.read_pos..]);
            output[margin..count].copy_from_slice(&self.data[..count - margin]);
        } else {
            output[..count].copy_from_slice(&self.data[self.read_pos..self.read_pos + count]);
        }
        output[count..].fill(0);

        self.read_pos = (self.read_pos + count) % capacity;
        self.len -= count;
        count
    }

    /// Drops the `count` oldest samples (clamped to the buffered amount).
    ///
    /// Returns the number of samples actually discarded.
    pub(crate) fn discard(&mut self, count: usize) -> usize {
        let discarded = count.min(self.len);
        self.read_pos = (self.read_pos + discarded) % self.data.len();
        self.len -= discarded;
        discarded
    }
}
