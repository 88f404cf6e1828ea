/*
    Resource Allocation Module
*/

use assign_resources::assign_resources;
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals;
use embassy_rp::pio::InterruptHandler as PioInterruptHandler;
use embassy_rp::usb::InterruptHandler as UsbInterruptHandler;

assign_resources! {
    wheel_left: WheelLeftResources {
        PWM_CW_PIN: PIN_15,
        PWM_CCW_PIN: PIN_14,
        PWM_SLICE: PWM_SLICE7,
        ENCODER_PIN_A: PIN_6,
        ENCODER_PIN_B: PIN_7,
    },

    wheel_right: WheelRightResources {
        PWM_CW_PIN: PIN_3,
        PWM_CCW_PIN: PIN_2,
        PWM_SLICE: PWM_SLICE1,
        ENCODER_PIN_A: PIN_4,
        ENCODER_PIN_B: PIN_5,
    },

    // TFT panel wiring, consumed by the display layer at init only.
    display: DisplayResources {
        CS_PIN: PIN_10,
        DC_PIN: PIN_11,
        TE_PIN: PIN_12,
        SDCS_PIN: PIN_13,
    },
}

bind_interrupts!(pub struct Irqs {
    PIO0_IRQ_0 => PioInterruptHandler<peripherals::PIO0>;
    PIO1_IRQ_0 => PioInterruptHandler<peripherals::PIO1>;
    USBCTRL_IRQ => UsbInterruptHandler<peripherals::USB>;
});
