//! Per-wheel speed control core.
//!
//! Everything here is allocation-free and HAL-independent so the firmware
//! can run it next to the encoder path and the tests can run on the host.

#![cfg_attr(not(test), no_std)]

pub mod clip;
pub mod motor;
pub mod pid;
pub mod sample_ring;
pub mod speed;

pub use motor::{EdgeDirection, RunMode, WheelMotor};
pub use pid::{Pid, PidGains};
pub use sample_ring::{Sample, SampleRing};
pub use speed::SpeedEstimator;
