/*
    PID Control
*/

use libm::fabsf;

#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PidGains {
    pub kp: f32,
    pub ki: f32,
    pub kd: f32,
}

/// Discrete PID controller with output clamping and integral anti-windup.
///
/// The integral term is bounded so that `ki * sum_error` alone can never
/// exceed the output range: accumulating past that point only delays the
/// recovery once the error changes sign.
pub struct Pid {
    kp: f32,
    ki: f32,
    kd: f32,
    sum_error: f32,
    prev_error: f32,
    prev_output: f32,
    output_limit: f32,
}

impl Pid {
    pub fn new(gains: PidGains, output_limit: f32) -> Self {
        Self {
            kp: gains.kp,
            ki: gains.ki,
            kd: gains.kd,
            sum_error: 0.0,
            prev_error: 0.0,
            prev_output: 0.0,
            output_limit,
        }
    }

    /// Gains are runtime configuration to support tuning over USB.
    pub fn set_gains(&mut self, gains: PidGains) {
        self.kp = gains.kp;
        self.ki = gains.ki;
        self.kd = gains.kd;
    }

    pub fn gains(&self) -> PidGains {
        PidGains {
            kp: self.kp,
            ki: self.ki,
            kd: self.kd,
        }
    }

    pub fn reset(&mut self) {
        self.sum_error = 0.0;
        self.prev_error = 0.0;
        self.prev_output = 0.0;
    }

    /// One control cycle. `dt` is the elapsed time in seconds since the
    /// previous cycle; a zero or negative `dt` is a stale tick and returns
    /// the previous output with no state update.
    pub fn compute(&mut self, target: f32, measured: f32, dt: f32) -> f32 {
        if dt <= 0.0 {
            return self.prev_output;
        }

        let error = target - measured;

        self.sum_error += error * dt;
        if self.ki != 0.0 {
            let windup_bound = self.output_limit / fabsf(self.ki);
            self.sum_error = self.sum_error.clamp(-windup_bound, windup_bound);
        }

        let derivative = (error - self.prev_error) / dt;

        let output = (self.kp * error + self.ki * self.sum_error + self.kd * derivative)
            .clamp(-self.output_limit, self.output_limit);

        self.prev_error = error;
        self.prev_output = output;
        output
    }
}
