/*
* USB Command Handler
* Available Commands:
    - motor <left/right> start <speed_cps>
    - motor <left/right> speed <speed_cps>
    - motor <left/right> stop
    - motor_pid <left/right> set <kp> <ki> <kd>
    - motor_pid <left/right> get
    - log start <time_sampling_ms>
    - log stop
    - status
*/

use {
    crate::resources::global_resources::{
        MotorHub, WheelCommand, LOGGER, MOTOR_LEFT, MOTOR_RIGHT,
    },
    core::str,
    embassy_rp::{peripherals::USB, usb::Driver},
    embassy_usb_logger::ReceiverHandler,
    heapless::Vec,
    wheel_control::pid::PidGains,
    {defmt_rtt as _, panic_probe as _},
};

pub struct UsbCommandHandler;

impl ReceiverHandler for UsbCommandHandler {
    async fn handle_data(&self, raw_data: &[u8]) {
        if let Ok(raw_data) = str::from_utf8(raw_data) {
            let parts: Vec<&str, 8> = raw_data.split_whitespace().collect();

            if !parts.is_empty() {
                match parts[0] {
                    "motor" => handle_motor(&parts),
                    "motor_pid" => handle_motor_pid(&parts),
                    "log" => handle_logger(&parts),
                    "status" => handle_status(),
                    _ => log::info!("Command not found"),
                }
            }
        }
    }

    fn new() -> Self {
        Self
    }
}

fn wheel_by_name(name: &str) -> Option<&'static MotorHub> {
    match name {
        "left" => Some(&MOTOR_LEFT),
        "right" => Some(&MOTOR_RIGHT),
        _ => {
            log::info!("Unknown wheel: {}", name);
            None
        }
    }
}

fn parse_speed(raw: &str) -> Option<f32> {
    match raw.parse::<f32>() {
        Ok(speed) => Some(speed),
        Err(e) => {
            log::info!("Invalid speed {:?}", e);
            None
        }
    }
}

fn handle_motor(parts: &[&str]) {
    if parts.len() < 3 {
        log::info!("Insufficient Parameter: motor <left/right> <start/speed/stop>");
        return;
    }

    let Some(hub) = wheel_by_name(parts[1]) else {
        return;
    };

    match parts[2] {
        "start" => {
            if parts.len() < 4 {
                log::info!("Insufficient Parameter: motor <left/right> start <speed_cps>");
                return;
            }
            if let Some(speed) = parse_speed(parts[3]) {
                hub.send_command(WheelCommand::Start(speed));
            }
        }
        "speed" => {
            if parts.len() < 4 {
                log::info!("Insufficient Parameter: motor <left/right> speed <speed_cps>");
                return;
            }
            if let Some(speed) = parse_speed(parts[3]) {
                hub.send_command(WheelCommand::SetSpeed(speed));
            }
        }
        "stop" => {
            hub.send_command(WheelCommand::Stop);
        }
        _ => {
            log::info!("Invalid Parameter: motor <left/right> <start/speed/stop>");
        }
    }
}

fn handle_motor_pid(parts: &[&str]) {
    if parts.len() < 3 {
        log::info!("Insufficient Parameter: motor_pid <left/right> <get/set>");
        return;
    }

    let Some(hub) = wheel_by_name(parts[1]) else {
        return;
    };

    match parts[2] {
        "set" => {
            if parts.len() < 6 {
                log::info!("Insufficient Parameter: motor_pid <left/right> set <kp> <ki> <kd>");
                return;
            }

            match (
                parts[3].parse::<f32>(),
                parts[4].parse::<f32>(),
                parts[5].parse::<f32>(),
            ) {
                (Ok(kp), Ok(ki), Ok(kd)) => {
                    hub.send_command(WheelCommand::SetGains(PidGains { kp, ki, kd }));
                }
                _ => {
                    log::info!("Invalid gain value(s)");
                }
            }
        }
        "get" => {
            let gains = hub.get_gains();
            log::info!("kp:{} ki:{} kd:{}", gains.kp, gains.ki, gains.kd);
        }
        _ => {
            log::info!("Invalid Parameter: motor_pid <left/right> <get/set>");
        }
    }
}

fn handle_logger(parts: &[&str]) {
    if parts.len() < 2 {
        log::info!("Insufficient Parameter: log <start/stop>");
        return;
    }

    match parts[1] {
        "start" => {
            if parts.len() < 3 {
                log::info!("Insufficient Parameter: log start <time_sampling_ms>");
                return;
            }
            match parts[2].parse::<u64>() {
                Ok(time_sampling_ms) => {
                    LOGGER.set_logging_time_sampling(time_sampling_ms);
                    LOGGER.set_logging_state(true);
                }
                Err(e) => {
                    log::info!("Invalid Time Sampling {:?}", e);
                }
            }
        }
        "stop" => {
            LOGGER.set_logging_state(false);
        }
        _ => {
            log::info!("Invalid Parameter: log <start/stop>");
        }
    }
}

fn handle_status() {
    for hub in [&MOTOR_LEFT, &MOTOR_RIGHT] {
        log::info!(
            "motor {}: running:{} count:{} speed:{} mean:{} drive:{}",
            hub.id,
            hub.is_running(),
            hub.get_count(),
            hub.get_speed(),
            hub.get_mean_speed(),
            hub.get_drive_level(),
        );
    }
}

#[embassy_executor::task]
pub async fn usb_logger_task(driver: Driver<'static, USB>) {
    embassy_usb_logger::run!(1024, log::LevelFilter::Info, driver, UsbCommandHandler);
}
