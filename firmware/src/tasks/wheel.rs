/*
* Wheel Control Task
*  - One instance per wheel, owning the motor state machine, its encoder
*    and its PWM pair. Encoder edges and control ticks are multiplexed
*    with select(), so every motor field has a single writer.
*/

use {
    crate::resources::{
        config::{CONTROL_PERIOD_US, DEFAULT_SPEED_GAINS, FILTER_DEPTH, MAX_DRIVE_LEVEL},
        global_resources::{MotorHub, WheelCommand},
    },
    embassy_futures::select::{select, Either},
    embassy_rp::{
        peripherals::{PIO0, PIO1},
        pio::Instance,
        pio_programs::rotary_encoder::{Direction, PioEncoder},
        pwm::{PwmOutput, SetDutyCycle},
    },
    embassy_time::{Duration, Instant, Ticker},
    wheel_control::motor::{EdgeDirection, WheelMotor},
    {defmt_rtt as _, panic_probe as _},
};

pub struct WheelDrive<'d, T: Instance, const SM: usize> {
    pwm_cw: PwmOutput<'d>,
    pwm_ccw: PwmOutput<'d>,
    encoder: PioEncoder<'d, T, SM>,
    motor: WheelMotor<FILTER_DEPTH>,
    hub: &'static MotorHub,
}

impl<'d, T: Instance, const SM: usize> WheelDrive<'d, T, SM> {
    pub fn new(
        pwm_cw: PwmOutput<'d>,
        pwm_ccw: PwmOutput<'d>,
        encoder: PioEncoder<'d, T, SM>,
        hub: &'static MotorHub,
    ) -> Self {
        hub.set_gains(DEFAULT_SPEED_GAINS);
        Self {
            pwm_cw,
            pwm_ccw,
            encoder,
            motor: WheelMotor::new(hub.id, DEFAULT_SPEED_GAINS, MAX_DRIVE_LEVEL),
            hub,
        }
    }

    fn apply_drive(&mut self, level: i16) {
        if level > 0 {
            let _ = self.pwm_cw.set_duty_cycle(level as u16);
            let _ = self.pwm_ccw.set_duty_cycle_fully_off();
        } else {
            let _ = self.pwm_cw.set_duty_cycle_fully_off();
            let _ = self.pwm_ccw.set_duty_cycle(level.unsigned_abs());
        }
    }

    fn handle_command(&mut self, command: WheelCommand) {
        match command {
            WheelCommand::Start(target) => {
                self.motor.set_target_speed(target);
                if !self.motor.is_running() {
                    self.motor.start();
                }
            }
            WheelCommand::SetSpeed(target) => {
                self.motor.set_target_speed(target);
            }
            WheelCommand::SetGains(gains) => {
                self.motor.set_gains(gains);
                self.hub.set_gains(gains);
            }
            WheelCommand::Stop => {
                self.motor.stop();
            }
        }
    }

    fn publish_telemetry(&self) {
        self.hub.set_speed(self.motor.speed());
        self.hub.set_mean_speed(self.motor.mean_speed());
        self.hub.set_target_speed(self.motor.target_speed());
        self.hub.set_drive_level(self.motor.drive_level());
        self.hub.set_running(self.motor.is_running());
    }

    pub async fn run(&mut self) {
        let mut ticker = Ticker::every(Duration::from_micros(CONTROL_PERIOD_US));

        loop {
            match select(self.encoder.read(), ticker.next()).await {
                Either::First(direction) => {
                    let edge = match direction {
                        Direction::Clockwise => EdgeDirection::Forward,
                        Direction::CounterClockwise => EdgeDirection::Reverse,
                    };
                    self.motor.on_encoder_edge(edge, Instant::now().as_micros());
                    self.hub.set_count(self.motor.count());
                }
                Either::Second(_) => {
                    while let Some(command) = self.hub.take_command() {
                        self.handle_command(command);
                    }

                    let level = self.motor.update(Instant::now().as_micros());
                    self.apply_drive(level);
                    self.publish_telemetry();
                }
            }
        }
    }
}

#[embassy_executor::task]
pub async fn wheel_left_task(mut drive: WheelDrive<'static, PIO0, 0>) {
    drive.run().await;
}

#[embassy_executor::task]
pub async fn wheel_right_task(mut drive: WheelDrive<'static, PIO1, 0>) {
    drive.run().await;
}
