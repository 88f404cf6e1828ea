/*
    Wheel Motor State Machine
*/

use crate::pid::{Pid, PidGains};
use crate::sample_ring::SampleRing;
use crate::speed::SpeedEstimator;

const US_PER_SEC: f32 = 1_000_000.0;

/// No encoder edge for this long reads as standstill. Without it the last
/// estimate would survive a stall forever, since a stopped wheel emits no
/// edges to correct it.
const STALL_TIMEOUT_US: u64 = 200_000;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RunMode {
    Stopped,
    Running,
}

/// Quadrature phase ordering resolved to a count direction.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EdgeDirection {
    Forward,
    Reverse,
}

/// One closed speed loop for a single wheel.
///
/// Encoder edges arrive through [`on_encoder_edge`](Self::on_encoder_edge)
/// and control ticks through [`update`](Self::update); the caller schedules
/// both. `N` is the sample ring depth (the smoothing window).
///
/// The instance is owned by exactly one task, which keeps every field
/// single-writer; anything another context needs is copied out through the
/// read accessors after each tick.
pub struct WheelMotor<const N: usize> {
    id: u8,
    count: i32,
    ring: SampleRing<N>,
    estimator: SpeedEstimator,
    mean_speed: f32,
    target_speed: f32,
    drive_level: i16,
    max_drive: i16,
    pid: Pid,
    mode: RunMode,
    prev_event_ts: Option<u64>,
    prev_step_ts: Option<u64>,
}

impl<const N: usize> WheelMotor<N> {
    pub fn new(id: u8, gains: PidGains, max_drive: i16) -> Self {
        Self {
            id,
            count: 0,
            ring: SampleRing::new(),
            estimator: SpeedEstimator::new(),
            mean_speed: 0.0,
            target_speed: 0.0,
            drive_level: 0,
            max_drive,
            pid: Pid::new(gains, max_drive as f32),
            mode: RunMode::Stopped,
            prev_event_ts: None,
            prev_step_ts: None,
        }
    }

    /// Stopped -> Running. Clears the PID memory and the sample ring so a
    /// restart never acts on stale history.
    pub fn start(&mut self) {
        self.ring.clear();
        self.estimator.reset();
        self.pid.reset();
        self.mean_speed = 0.0;
        self.prev_event_ts = None;
        self.prev_step_ts = None;
        self.mode = RunMode::Running;
    }

    /// Forces the output to zero and holds the integral at zero. Safe to
    /// call in any state; calling it twice is the same as calling it once.
    pub fn stop(&mut self) {
        self.mode = RunMode::Stopped;
        self.drive_level = 0;
        self.pid.reset();
    }

    pub fn is_running(&self) -> bool {
        self.mode == RunMode::Running
    }

    pub fn set_target_speed(&mut self, counts_per_sec: f32) {
        self.target_speed = counts_per_sec;
    }

    /// Retune and restart the control history, as a live gain change with
    /// an integral accumulated under the old gains would kick the output.
    pub fn set_gains(&mut self, gains: PidGains) {
        self.pid.set_gains(gains);
        self.pid.reset();
    }

    pub fn gains(&self) -> PidGains {
        self.pid.gains()
    }

    /// Encoder path. One call per quadrature edge, at whatever instant the
    /// hardware reports it.
    pub fn on_encoder_edge(&mut self, direction: EdgeDirection, timestamp_us: u64) {
        match direction {
            EdgeDirection::Forward => self.count = self.count.saturating_add(1),
            EdgeDirection::Reverse => self.count = self.count.saturating_sub(1),
        }
        self.ring.record(self.count, timestamp_us);
        self.estimator.refresh(&self.ring);
        self.prev_event_ts = Some(timestamp_us);
    }

    /// Control path, invoked once per control period by the scheduler.
    ///
    /// While running: refresh both speed estimates, run the PID against the
    /// target and latch the clamped drive level. While stopped: no-op, the
    /// drive level is forced to zero.
    pub fn update(&mut self, now_us: u64) -> i16 {
        if self.mode == RunMode::Stopped {
            self.drive_level = 0;
            return 0;
        }

        let speed = match self.prev_event_ts {
            Some(last) if now_us.saturating_sub(last) <= STALL_TIMEOUT_US => {
                self.estimator.refresh(&self.ring)
            }
            _ => {
                self.estimator.reset();
                0.0
            }
        };
        self.mean_speed = SpeedEstimator::windowed(&self.ring);

        // First tick after start() has no baseline; the PID treats dt == 0
        // as a stale tick and keeps its previous (zero) output.
        let dt = match self.prev_step_ts {
            Some(prev) if now_us > prev => (now_us - prev) as f32 / US_PER_SEC,
            _ => 0.0,
        };
        self.prev_step_ts = Some(now_us);

        let output = self.pid.compute(self.target_speed, speed, dt);
        self.drive_level = output as i16;
        self.drive_level
    }

    pub fn id(&self) -> u8 {
        self.id
    }

    /// Total accumulated encoder ticks, signed by direction.
    pub fn count(&self) -> i32 {
        self.count
    }

    /// Short-baseline estimate driving the control loop, counts/s.
    pub fn speed(&self) -> f32 {
        self.estimator.speed()
    }

    /// Full-window estimate for display and telemetry only; feeding it back
    /// into the PID would double-filter and add loop lag.
    pub fn mean_speed(&self) -> f32 {
        self.mean_speed
    }

    pub fn target_speed(&self) -> f32 {
        self.target_speed
    }

    /// Signed command for the PWM stage, within `[-max_drive, max_drive]`.
    pub fn drive_level(&self) -> i16 {
        self.drive_level
    }

    pub fn max_drive(&self) -> i16 {
        self.max_drive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEPTH: usize = 8;
    const MAX_DRIVE: i16 = 1000;
    const SEC: u64 = 1_000_000;
    const TICK_US: u64 = 5_000;

    fn motor() -> WheelMotor<DEPTH> {
        WheelMotor::new(
            0,
            PidGains {
                kp: 0.3,
                ki: 0.05,
                kd: 0.0,
            },
            MAX_DRIVE,
        )
    }

    fn spin(motor: &mut WheelMotor<DEPTH>, start_us: u64, edges: u32, step_us: u64) -> u64 {
        let mut now = start_us;
        for _ in 0..edges {
            now += step_us;
            motor.on_encoder_edge(EdgeDirection::Forward, now);
        }
        now
    }

    #[test]
    fn initial_state_is_stopped() {
        let m = motor();
        assert!(!m.is_running());
        assert_eq!(m.drive_level(), 0);
        assert_eq!(m.count(), 0);
    }

    #[test]
    fn update_while_stopped_is_a_no_op() {
        let mut m = motor();
        m.set_target_speed(500.0);
        assert_eq!(m.update(TICK_US), 0);
        assert_eq!(m.update(2 * TICK_US), 0);
        assert!(!m.is_running());
    }

    #[test]
    fn running_motor_drives_toward_target() {
        let mut m = motor();
        m.set_target_speed(400.0);
        m.start();
        assert!(m.is_running());

        // Baseline tick: no dt yet, output stays zero.
        assert_eq!(m.update(TICK_US), 0);

        // Wheel is measurably slower than target: positive correction.
        let now = spin(&mut m, TICK_US, 4, 10_000);
        let level = m.update(now);
        assert!(level > 0);
        assert_eq!(level, m.drive_level());
    }

    #[test]
    fn overspeed_produces_negative_correction() {
        let mut m = motor();
        m.set_target_speed(10.0);
        m.start();
        m.update(TICK_US);

        // 1000 counts/s, far above the 10 counts/s target.
        let now = spin(&mut m, TICK_US, 10, 1_000);
        assert!(m.update(now) < 0);
    }

    #[test]
    fn encoder_edges_move_the_count_both_ways() {
        let mut m = motor();
        m.on_encoder_edge(EdgeDirection::Forward, 100);
        m.on_encoder_edge(EdgeDirection::Forward, 200);
        m.on_encoder_edge(EdgeDirection::Reverse, 300);
        assert_eq!(m.count(), 1);
    }

    #[test]
    fn speed_updates_on_encoder_events_without_a_tick() {
        let mut m = motor();
        m.on_encoder_edge(EdgeDirection::Forward, SEC);
        assert_eq!(m.speed(), 0.0);
        m.on_encoder_edge(EdgeDirection::Forward, 2 * SEC);
        assert_eq!(m.speed(), 1.0);
    }

    #[test]
    fn stop_is_idempotent() {
        let mut m = motor();
        m.set_target_speed(400.0);
        m.start();
        m.update(TICK_US);
        let now = spin(&mut m, TICK_US, 4, 10_000);
        m.update(now);

        m.stop();
        let drive_once = m.drive_level();
        let running_once = m.is_running();
        m.stop();
        assert_eq!(m.drive_level(), drive_once);
        assert_eq!(m.is_running(), running_once);
        assert_eq!(drive_once, 0);
    }

    #[test]
    fn restart_forgets_control_history() {
        let mut m = motor();
        m.set_target_speed(800.0);
        m.start();
        m.update(TICK_US);
        let now = spin(&mut m, TICK_US, 6, 20_000);
        assert!(m.update(now) > 0);

        m.stop();
        m.start();

        // Fresh ring, fresh integral: a tick with no error and no history
        // must produce zero drive.
        m.set_target_speed(0.0);
        m.update(now + TICK_US);
        assert_eq!(m.update(now + 2 * TICK_US), 0);
    }

    #[test]
    fn drive_level_is_bounded() {
        let mut m = WheelMotor::<DEPTH>::new(
            1,
            PidGains {
                kp: 1000.0,
                ki: 0.0,
                kd: 0.0,
            },
            MAX_DRIVE,
        );
        m.set_target_speed(1e6);
        m.start();
        m.update(TICK_US);
        assert_eq!(m.update(2 * TICK_US), MAX_DRIVE);

        m.set_target_speed(-1e6);
        assert_eq!(m.update(3 * TICK_US), -MAX_DRIVE);
    }

    #[test]
    fn duplicate_tick_timestamp_keeps_previous_output() {
        let mut m = motor();
        m.set_target_speed(400.0);
        m.start();
        m.update(TICK_US);
        let now = spin(&mut m, TICK_US, 4, 10_000);
        let level = m.update(now);
        assert_eq!(m.update(now), level);
    }

    #[test]
    fn stalled_wheel_reads_as_standstill() {
        let mut m = motor();
        m.set_target_speed(200.0);
        m.start();
        m.update(TICK_US);
        let now = spin(&mut m, TICK_US, 4, 10_000);
        m.update(now);
        assert!(m.speed() > 0.0);

        // Long silence on the encoder: the estimate must decay to zero
        // rather than hold the pre-stall value.
        m.update(now + STALL_TIMEOUT_US + 1);
        assert_eq!(m.speed(), 0.0);
    }

    #[test]
    fn mean_speed_tracks_the_full_window() {
        let mut m = motor();
        m.start();
        m.update(TICK_US);
        let now = spin(&mut m, 0, 4, SEC);
        m.update(now);
        assert_eq!(m.mean_speed(), 1.0);
    }
}
