//! Two-wheel closed-loop speed control firmware
//!
//! Each wheel runs an independent speed loop: PIO quadrature decoding
//! feeds the sample ring, a 200 Hz tick runs the PID, and the resulting
//! drive level lands on a CW/CCW hardware PWM pair.

#![no_std]
#![no_main]

// Mod
mod resources;
mod tasks;

// Resources
use crate::resources::config::PWM_PERIOD_TICKS;
use crate::resources::global_resources::MOTOR_LEFT;
use crate::resources::global_resources::MOTOR_RIGHT;
use crate::resources::AssignedResources;
use crate::resources::DisplayResources;
use crate::resources::Irqs;
use crate::resources::WheelLeftResources;
use crate::resources::WheelRightResources;

// Tasks
use crate::tasks::logger::telemetry_logger_task;
use crate::tasks::usb_handler::usb_logger_task;
use crate::tasks::wheel::wheel_left_task;
use crate::tasks::wheel::wheel_right_task;
use crate::tasks::wheel::WheelDrive;

// Library
use defmt_rtt as _;
use panic_probe as _;

use embassy_executor::Spawner;
use embassy_rp::pio::Pio;
use embassy_rp::pio_programs::rotary_encoder::{PioEncoder, PioEncoderProgram};
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_rp::usb::Driver;

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let ph = embassy_rp::init(Default::default());
    let r = split_resources!(ph);
    let usb_driver = Driver::new(ph.USB, Irqs);

    let mut pwm_config = PwmConfig::default();
    pwm_config.top = PWM_PERIOD_TICKS;

    let Pio {
        common: mut common0,
        sm0: sm_left,
        ..
    } = Pio::new(ph.PIO0, Irqs);

    let enc_prg0 = PioEncoderProgram::new(&mut common0);
    let encoder_left = PioEncoder::new(
        &mut common0,
        sm_left,
        r.wheel_left.ENCODER_PIN_A,
        r.wheel_left.ENCODER_PIN_B,
        &enc_prg0,
    );

    let (ccw_left, cw_left) = Pwm::new_output_ab(
        r.wheel_left.PWM_SLICE,
        r.wheel_left.PWM_CCW_PIN,
        r.wheel_left.PWM_CW_PIN,
        pwm_config.clone(),
    )
    .split();

    let drive_left = WheelDrive::new(
        defmt::unwrap!(cw_left),
        defmt::unwrap!(ccw_left),
        encoder_left,
        &MOTOR_LEFT,
    );

    let Pio {
        common: mut common1,
        sm0: sm_right,
        ..
    } = Pio::new(ph.PIO1, Irqs);

    let enc_prg1 = PioEncoderProgram::new(&mut common1);
    let encoder_right = PioEncoder::new(
        &mut common1,
        sm_right,
        r.wheel_right.ENCODER_PIN_A,
        r.wheel_right.ENCODER_PIN_B,
        &enc_prg1,
    );

    let (ccw_right, cw_right) = Pwm::new_output_ab(
        r.wheel_right.PWM_SLICE,
        r.wheel_right.PWM_CCW_PIN,
        r.wheel_right.PWM_CW_PIN,
        pwm_config.clone(),
    )
    .split();

    let drive_right = WheelDrive::new(
        defmt::unwrap!(cw_right),
        defmt::unwrap!(ccw_right),
        encoder_right,
        &MOTOR_RIGHT,
    );

    spawner.must_spawn(usb_logger_task(usb_driver));
    spawner.must_spawn(wheel_left_task(drive_left));
    spawner.must_spawn(wheel_right_task(drive_right));
    spawner.must_spawn(telemetry_logger_task());
}
