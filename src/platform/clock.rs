use embassy_time::{Duration, Instant, Timer};
use esp_hal::{peripherals::TIMG0, timer::timg::TimerGroup};

use crate::firmware::capability::MonotonicClock;

/// Monotonic time from the embassy time driver started by `esp_rtos::start`.
#[derive(Clone, Copy, Default)]
pub struct EmbassyClock;

impl EmbassyClock {
    /// Starts the scheduler and its time driver on TIMG0 timer 0. Call once,
    /// right after `esp_hal::init`.
    pub fn start(timg0: TIMG0<'static>) -> Self {
        let timg0 = TimerGroup::new(timg0);
        esp_rtos::start(timg0.timer0);
        Self
    }
}

impl MonotonicClock for EmbassyClock {
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }

    async fn delay_ms(&mut self, millis: u32) {
        Timer::after(Duration::from_millis(u64::from(millis))).await;
    }
}
