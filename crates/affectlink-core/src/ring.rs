//! Fixed-capacity circular sample buffers
//!
//! Each signal channel owns one [`SampleRing`] sized to a full statistics
//! window (capacity = window duration × sample rate). Pushes are O(1) and
//! overwrite the oldest entry once the ring has wrapped; there is no growth,
//! no shrink, and no allocation.

/// Circular buffer over a const-generic backing array.
///
/// The write cursor always stays in `[0, N)`. Storage is zero-initialized,
/// and statistics run over the full backing array from the first cycle, so
/// slots that have not been written since power-on contribute zeros until
/// the ring warms up (one full window of pushes); [`SampleRing::is_warm`]
/// reports when that has happened.
#[derive(Clone, Debug)]
pub struct SampleRing<T, const N: usize> {
    buffer: [T; N],
    write: usize,
    filled: bool,
}

impl<T: Copy + Default, const N: usize> SampleRing<T, N> {
    /// Create an empty ring with zeroed (default-valued) storage.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer: [T::default(); N],
            write: 0,
            filled: false,
        }
    }

    /// Push a sample, overwriting the oldest entry once the ring is full.
    ///
    /// Never fails and never blocks; the cursor advances modulo capacity.
    #[inline]
    pub fn push(&mut self, value: T) {
        self.buffer[self.write] = value;
        self.write += 1;
        if self.write == N {
            self.write = 0;
            self.filled = true;
        }
    }

    /// Snapshot of the full backing storage, in storage order.
    ///
    /// Always `N` elements; before warm-up the unwritten tail still holds
    /// default values.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.buffer
    }

    /// Iterate over the full window oldest-to-newest.
    ///
    /// The element the cursor points at is the oldest (next to be
    /// overwritten); iteration wraps from there through the whole storage.
    pub fn iter_ordered(&self) -> impl Iterator<Item = T> + '_ {
        self.buffer[self.write..]
            .iter()
            .chain(self.buffer[..self.write].iter())
            .copied()
    }

    /// Whether a full window has been written since power-on
    #[inline]
    #[must_use]
    pub fn is_warm(&self) -> bool {
        self.filled
    }

    /// Fixed capacity of the ring
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<T: Copy + Default, const N: usize> Default for SampleRing<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::vec::Vec;

    use super::*;

    #[test]
    fn test_starts_cold_and_zeroed() {
        let ring: SampleRing<u16, 8> = SampleRing::new();
        assert!(!ring.is_warm());
        assert_eq!(ring.capacity(), 8);
        assert!(ring.as_slice().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_warms_after_exactly_capacity_pushes() {
        let mut ring: SampleRing<u16, 8> = SampleRing::new();
        for i in 0..7 {
            ring.push(i);
            assert!(!ring.is_warm());
        }
        ring.push(7);
        assert!(ring.is_warm());
    }

    #[test]
    fn test_wraparound_keeps_last_capacity_values_in_order() {
        // capacity + k pushes must leave exactly the last `capacity` values,
        // oldest-to-newest, whatever was in the ring before.
        let mut ring: SampleRing<u16, 8> = SampleRing::new();
        for v in 0..20u16 {
            ring.push(v);
        }

        let ordered: Vec<u16> = ring.iter_ordered().collect();
        let expected: Vec<u16> = (12..20).collect();
        assert_eq!(ordered, expected);
    }

    #[test]
    fn test_wraparound_multiple_times() {
        let mut ring: SampleRing<u16, 4> = SampleRing::new();
        for v in 0..4003u16 {
            ring.push(v);
        }

        let ordered: Vec<u16> = ring.iter_ordered().collect();
        assert_eq!(ordered, [3999, 4000, 4001, 4002]);
    }

    #[test]
    fn test_snapshot_always_full_length() {
        let mut ring: SampleRing<u16, 8> = SampleRing::new();
        ring.push(5);
        ring.push(6);

        let snap = ring.as_slice();
        assert_eq!(snap.len(), 8);
        assert_eq!(snap[0], 5);
        assert_eq!(snap[1], 6);
        assert!(snap[2..].iter().all(|&v| v == 0));
    }

    #[test]
    fn test_ordered_view_before_warm_yields_zero_prefix() {
        let mut ring: SampleRing<u16, 4> = SampleRing::new();
        ring.push(9);

        // Oldest-first view counts the unwritten zero slots as oldest.
        let ordered: Vec<u16> = ring.iter_ordered().collect();
        assert_eq!(ordered, [0, 0, 0, 9]);
    }
}
