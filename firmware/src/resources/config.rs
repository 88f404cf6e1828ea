/*
*  Default Firmware Config
*
*  Drive Train Properties
*  - DC Motor Gearbox Ratio 1:4.4
*  - Encoder PPR = 11
*  - Overall PPR = 48.4 PPR or 484 Pulse per 10 Rotation
*/

use wheel_control::pid::PidGains;

pub const N_MOTOR: usize = 2;

/* --------------------------- Speed Loop Config -------------------------- */
pub const FILTER_DEPTH: usize = 8; // Smoothing window of the mean speed estimate
pub const CONTROL_PERIOD_US: u64 = 5000; // Control loop at 200 Hz

pub const DEFAULT_SPEED_GAINS: PidGains = PidGains {
    kp: 2.0,
    ki: 0.8,
    kd: 10.0,
};

/* --------------------------- Motor PWM Config -------------------------- */
pub const PWM_PERIOD_TICKS: u16 = 4999; // 25kHz Period = (125_000_000 (Pico clock)/25_000(Frequency)) -1
pub const MAX_DRIVE_LEVEL: i16 = 4999; // Full PWM Range

/* --------------------------- Display Panel (static data) -------------------------- */
pub const DISPLAY_SPI_FREQ: u32 = 32_000_000;
