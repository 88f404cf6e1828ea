/*
* Telemetry Logger Task
*  - Reports the windowed mean speed, not the control estimate: the
*    display value trades lag for a steady readout.
*/

use {
    crate::resources::global_resources::{MotorHub, LOGGER, MOTOR_LEFT, MOTOR_RIGHT},
    embassy_time::{Duration, Instant, Ticker, Timer},
    {defmt_rtt as _, panic_probe as _},
};

fn log_wheel(dt_ms: u64, name: &str, hub: &MotorHub) {
    log::info!(
        "{} {} mean:{} target:{} drive:{}",
        dt_ms,
        name,
        hub.get_mean_speed(),
        hub.get_target_speed(),
        hub.get_drive_level(),
    );
}

#[embassy_executor::task]
pub async fn telemetry_logger_task() {
    let mut ticker = Ticker::every(Duration::from_millis(10));
    let mut start = Instant::now();

    loop {
        if LOGGER.is_logging_active() {
            let dt_ms = start.elapsed().as_millis();
            log_wheel(dt_ms, "L", &MOTOR_LEFT);
            log_wheel(dt_ms, "R", &MOTOR_RIGHT);
            ticker.next().await;
        } else {
            Timer::after(Duration::from_millis(200)).await;
            start = Instant::now();
            let new_time_sampling = LOGGER.get_logging_time_sampling();
            ticker = Ticker::every(Duration::from_millis(new_time_sampling));
            ticker.reset();
        }
    }
}
