/*
    Encoder Sample Ring
*/

/// One encoder observation: accumulated tick count and capture time.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sample {
    pub count: i32,
    pub timestamp_us: u64,
}

/// Fixed-depth circular buffer of the most recent `N` encoder samples.
///
/// The depth is the smoothing window of the mean speed estimate. The ring
/// never grows and never allocates; once full it recycles the oldest slot.
/// Slots that were never written are not readable, so the estimators see
/// only valid samples during warm-up.
pub struct SampleRing<const N: usize> {
    buffer: [Sample; N],
    idx: usize,
    filled: usize,
}

impl<const N: usize> SampleRing<N> {
    pub const fn new() -> Self {
        Self {
            buffer: [Sample {
                count: 0,
                timestamp_us: 0,
            }; N],
            idx: 0,
            filled: 0,
        }
    }

    /// Circular append. Overwrites the oldest slot once the ring is full.
    pub fn record(&mut self, count: i32, timestamp_us: u64) {
        self.buffer[self.idx] = Sample {
            count,
            timestamp_us,
        };
        self.idx = (self.idx + 1) % N;
        if self.filled < N {
            self.filled += 1;
        }
    }

    /// Drops all samples and rewinds the write cursor.
    pub fn clear(&mut self) {
        self.idx = 0;
        self.filled = 0;
    }

    pub fn len(&self) -> usize {
        self.filled
    }

    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }

    /// Most recent sample.
    pub fn newest(&self) -> Option<Sample> {
        self.nth_back(0)
    }

    /// Second most recent sample.
    pub fn previous(&self) -> Option<Sample> {
        self.nth_back(1)
    }

    /// Oldest sample still held. Together with `newest()` this spans the
    /// full smoothing window once the ring has warmed up.
    pub fn oldest(&self) -> Option<Sample> {
        if self.filled == 0 {
            return None;
        }
        self.nth_back(self.filled - 1)
    }

    fn nth_back(&self, n: usize) -> Option<Sample> {
        if n >= self.filled {
            return None;
        }
        Some(self.buffer[(self.idx + N - 1 - n) % N])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEPTH: usize = 4;

    fn filled_ring(writes: usize) -> SampleRing<DEPTH> {
        let mut ring = SampleRing::new();
        for i in 0..writes {
            ring.record(i as i32, 10 * i as u64);
        }
        ring
    }

    #[test]
    fn empty_ring_has_no_samples() {
        let ring: SampleRing<DEPTH> = SampleRing::new();
        assert!(ring.is_empty());
        assert_eq!(ring.newest(), None);
        assert_eq!(ring.previous(), None);
        assert_eq!(ring.oldest(), None);
    }

    #[test]
    fn single_sample_has_no_previous() {
        let ring = filled_ring(1);
        assert_eq!(ring.newest().unwrap().count, 0);
        assert_eq!(ring.oldest().unwrap().count, 0);
        assert_eq!(ring.previous(), None);
    }

    #[test]
    fn partial_fill_spans_written_slots_only() {
        let ring = filled_ring(3);
        assert_eq!(ring.len(), 3);
        assert_eq!(ring.newest().unwrap().count, 2);
        assert_eq!(ring.previous().unwrap().count, 1);
        assert_eq!(ring.oldest().unwrap().count, 0);
    }

    #[test]
    fn overwrite_recycles_oldest_slot() {
        // After DEPTH + k writes the oldest survivor is write k.
        for k in 1..=3 {
            let ring = filled_ring(DEPTH + k);
            assert_eq!(ring.len(), DEPTH);
            assert_eq!(ring.oldest().unwrap().count, k as i32);
            assert_eq!(ring.newest().unwrap().count, (DEPTH + k - 1) as i32);
        }
    }

    #[test]
    fn clear_rewinds_to_empty() {
        let mut ring = filled_ring(DEPTH + 2);
        ring.clear();
        assert!(ring.is_empty());
        assert_eq!(ring.newest(), None);
        ring.record(7, 70);
        assert_eq!(ring.newest().unwrap().count, 7);
        assert_eq!(ring.len(), 1);
    }
}
