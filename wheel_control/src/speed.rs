/*
    Speed Estimation
*/

use crate::sample_ring::SampleRing;

const US_PER_SEC: f32 = 1_000_000.0;

/// Derives wheel speed in counts/s from the sample ring.
///
/// The short-baseline estimate (two freshest samples) feeds the control
/// loop; the full-window estimate is smoother but lags and is only meant
/// for display and telemetry.
pub struct SpeedEstimator {
    speed: f32,
}

impl SpeedEstimator {
    pub const fn new() -> Self {
        Self { speed: 0.0 }
    }

    pub fn reset(&mut self) {
        self.speed = 0.0;
    }

    /// Latest short-baseline estimate without recomputing.
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Recomputes the instantaneous speed from the two most recent ring
    /// entries. A zero or backwards elapsed time holds the previous value
    /// instead of dividing; fewer than two samples reads as standstill.
    pub fn refresh<const N: usize>(&mut self, ring: &SampleRing<N>) -> f32 {
        if let (Some(newest), Some(previous)) = (ring.newest(), ring.previous()) {
            if newest.timestamp_us > previous.timestamp_us {
                let dt_us = (newest.timestamp_us - previous.timestamp_us) as f32;
                let delta = newest.count.wrapping_sub(previous.count) as f32;
                self.speed = delta * US_PER_SEC / dt_us;
            }
        }
        self.speed
    }

    /// Mean speed over the full ring span. Zero until two samples with
    /// distinct timestamps exist.
    pub fn windowed<const N: usize>(ring: &SampleRing<N>) -> f32 {
        match (ring.newest(), ring.oldest()) {
            (Some(newest), Some(oldest)) if newest.timestamp_us > oldest.timestamp_us => {
                let dt_us = (newest.timestamp_us - oldest.timestamp_us) as f32;
                newest.count.wrapping_sub(oldest.count) as f32 * US_PER_SEC / dt_us
            }
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEC: u64 = 1_000_000;

    #[test]
    fn two_samples_give_count_rate() {
        let mut ring: SampleRing<8> = SampleRing::new();
        ring.record(0, 0);
        ring.record(10, 5 * SEC);

        let mut estimator = SpeedEstimator::new();
        assert_eq!(estimator.refresh(&ring), 2.0);
    }

    #[test]
    fn warm_up_reads_as_standstill() {
        let mut ring: SampleRing<8> = SampleRing::new();
        let mut estimator = SpeedEstimator::new();
        assert_eq!(estimator.refresh(&ring), 0.0);

        ring.record(5, SEC);
        assert_eq!(estimator.refresh(&ring), 0.0);
        assert_eq!(SpeedEstimator::windowed(&ring), 0.0);
    }

    #[test]
    fn zero_elapsed_time_holds_previous_value() {
        let mut ring: SampleRing<8> = SampleRing::new();
        ring.record(0, 0);
        ring.record(10, 5 * SEC);

        let mut estimator = SpeedEstimator::new();
        estimator.refresh(&ring);

        // Duplicate timestamp: no division, previous estimate survives.
        ring.record(50, 5 * SEC);
        assert_eq!(estimator.refresh(&ring), 2.0);
    }

    #[test]
    fn reverse_motion_gives_negative_speed() {
        let mut ring: SampleRing<8> = SampleRing::new();
        ring.record(0, 0);
        ring.record(-4, 2 * SEC);

        let mut estimator = SpeedEstimator::new();
        assert_eq!(estimator.refresh(&ring), -2.0);
    }

    #[test]
    fn windowed_spans_the_whole_ring() {
        let mut ring: SampleRing<4> = SampleRing::new();
        // Bursty arrivals: instantaneous and windowed estimates diverge.
        ring.record(0, 0);
        ring.record(2, SEC);
        ring.record(4, 2 * SEC);
        ring.record(24, 4 * SEC);

        let mut estimator = SpeedEstimator::new();
        assert_eq!(estimator.refresh(&ring), 10.0);
        assert_eq!(SpeedEstimator::windowed(&ring), 6.0);
    }
}
