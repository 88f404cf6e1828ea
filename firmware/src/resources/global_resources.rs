/*
* Global Resources
*/

// Library
use defmt_rtt as _;
use panic_probe as _;
use core::sync::atomic::AtomicBool;
use core::sync::atomic::AtomicI32;
use core::sync::atomic::AtomicU32;
use core::sync::atomic::Ordering;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use wheel_control::pid::PidGains;

/* --------------------------- Variables -------------------------- */
pub const COMMAND_CHANNEL_SIZE: usize = 16;

pub const MOTOR_LEFT_ID: u8 = 0;
pub const MOTOR_RIGHT_ID: u8 = 1;

/* --------------------------- Handlers -------------------------- */
pub static MOTOR_LEFT: MotorHub = MotorHub::new(MOTOR_LEFT_ID);
pub static MOTOR_RIGHT: MotorHub = MotorHub::new(MOTOR_RIGHT_ID);
pub static LOGGER: TelemetryHub = TelemetryHub::new();

/* --------------------------- ENUM -------------------------- */
#[derive(Clone, Copy, PartialEq)]
pub enum WheelCommand {
    Start(f32),
    SetSpeed(f32),
    SetGains(PidGains),
    Stop,
}

/* --------------------------- Struct -------------------------- */
/// Mailbox between the wheel task that owns a motor and every other
/// context (USB commands, telemetry logger).
///
/// Commands travel through the channel and are applied on the next control
/// tick. Telemetry fields are single-writer (the wheel task) and exposed as
/// hardware-width atomics so readers always get a tear-free snapshot
/// without a lock. f32 values cross as raw bits.
pub struct MotorHub {
    count: AtomicI32,
    speed_bits: AtomicU32,
    mean_speed_bits: AtomicU32,
    target_bits: AtomicU32,
    drive_level: AtomicI32,
    running: AtomicBool,
    kp_bits: AtomicU32,
    ki_bits: AtomicU32,
    kd_bits: AtomicU32,
    commands: Channel<CriticalSectionRawMutex, WheelCommand, COMMAND_CHANNEL_SIZE>,
    pub id: u8,
}

pub struct TelemetryHub {
    logger_status: AtomicBool,
    logger_time_sampling_ms: AtomicU32,
}

/* --------------------------- Struct Implementation -------------------------- */
impl MotorHub {
    pub const fn new(id: u8) -> Self {
        Self {
            count: AtomicI32::new(0),
            speed_bits: AtomicU32::new(0),
            mean_speed_bits: AtomicU32::new(0),
            target_bits: AtomicU32::new(0),
            drive_level: AtomicI32::new(0),
            running: AtomicBool::new(false),
            kp_bits: AtomicU32::new(0),
            ki_bits: AtomicU32::new(0),
            kd_bits: AtomicU32::new(0),
            commands: Channel::new(),
            id,
        }
    }

    pub fn send_command(&self, command: WheelCommand) {
        let _ = self.commands.try_send(command);
    }

    pub fn take_command(&self) -> Option<WheelCommand> {
        self.commands.try_receive().ok()
    }

    pub fn set_count(&self, count: i32) {
        self.count.store(count, Ordering::Relaxed);
    }

    pub fn get_count(&self) -> i32 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn set_speed(&self, speed: f32) {
        self.speed_bits.store(speed.to_bits(), Ordering::Relaxed);
    }

    pub fn get_speed(&self) -> f32 {
        f32::from_bits(self.speed_bits.load(Ordering::Relaxed))
    }

    pub fn set_mean_speed(&self, speed: f32) {
        self.mean_speed_bits.store(speed.to_bits(), Ordering::Relaxed);
    }

    pub fn get_mean_speed(&self) -> f32 {
        f32::from_bits(self.mean_speed_bits.load(Ordering::Relaxed))
    }

    pub fn set_target_speed(&self, target: f32) {
        self.target_bits.store(target.to_bits(), Ordering::Relaxed);
    }

    pub fn get_target_speed(&self) -> f32 {
        f32::from_bits(self.target_bits.load(Ordering::Relaxed))
    }

    pub fn set_drive_level(&self, level: i16) {
        self.drive_level.store(level as i32, Ordering::Relaxed);
    }

    pub fn get_drive_level(&self) -> i16 {
        self.drive_level.load(Ordering::Relaxed) as i16
    }

    pub fn set_running(&self, running: bool) {
        self.running.store(running, Ordering::Relaxed);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    pub fn set_gains(&self, gains: PidGains) {
        self.kp_bits.store(gains.kp.to_bits(), Ordering::Relaxed);
        self.ki_bits.store(gains.ki.to_bits(), Ordering::Relaxed);
        self.kd_bits.store(gains.kd.to_bits(), Ordering::Relaxed);
    }

    pub fn get_gains(&self) -> PidGains {
        PidGains {
            kp: f32::from_bits(self.kp_bits.load(Ordering::Relaxed)),
            ki: f32::from_bits(self.ki_bits.load(Ordering::Relaxed)),
            kd: f32::from_bits(self.kd_bits.load(Ordering::Relaxed)),
        }
    }
}

impl TelemetryHub {
    pub const fn new() -> Self {
        Self {
            logger_status: AtomicBool::new(false),
            logger_time_sampling_ms: AtomicU32::new(10),
        }
    }

    pub fn set_logging_state(&self, state: bool) {
        self.logger_status.store(state, Ordering::Relaxed);
    }

    pub fn is_logging_active(&self) -> bool {
        self.logger_status.load(Ordering::Relaxed)
    }

    pub fn set_logging_time_sampling(&self, time_sampling_ms: u64) {
        self.logger_time_sampling_ms
            .store(time_sampling_ms as u32, Ordering::Relaxed);
    }

    pub fn get_logging_time_sampling(&self) -> u64 {
        self.logger_time_sampling_ms.load(Ordering::Relaxed) as u64
    }
}
