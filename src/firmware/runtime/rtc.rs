use super::super::capability::{MonotonicClock, RtcClock};

/// Wall clock before the host or mesh sets the time (2024-05-15).
pub const RTC_EPOCH_DEFAULT: u32 = 1_715_770_351;

/// RAM-only wall clock in seconds. Lost on reset.
pub struct VolatileRtc<K> {
    clock: K,
    seconds: u32,
    last_ms: u64,
    carry_ms: u64,
}

impl<K: MonotonicClock> VolatileRtc<K> {
    pub fn new(clock: K) -> Self {
        Self::with_epoch(clock, RTC_EPOCH_DEFAULT)
    }

    pub fn with_epoch(clock: K, seconds: u32) -> Self {
        let last_ms = clock.now_ms();
        Self {
            clock,
            seconds,
            last_ms,
            carry_ms: 0,
        }
    }

    pub fn set_current_time(&mut self, seconds: u32) {
        self.seconds = seconds;
        self.last_ms = self.clock.now_ms();
        self.carry_ms = 0;
    }
}

impl<K: MonotonicClock> RtcClock for VolatileRtc<K> {
    fn tick(&mut self) {
        let now_ms = self.clock.now_ms();
        let elapsed_ms = now_ms.saturating_sub(self.last_ms) + self.carry_ms;
        self.last_ms = now_ms;
        self.carry_ms = elapsed_ms % 1_000;
        let whole = (elapsed_ms / 1_000).min(u64::from(u32::MAX)) as u32;
        self.seconds = self.seconds.wrapping_add(whole);
    }

    fn current_time(&self) -> u32 {
        self.seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::firmware::testkit::FakeClock;

    #[test]
    fn starts_at_default_epoch() {
        let rtc = VolatileRtc::new(FakeClock::new());

        assert_eq!(rtc.current_time(), RTC_EPOCH_DEFAULT);
    }

    #[test]
    fn sub_second_ticks_are_carried() {
        let clock = FakeClock::new();
        let mut rtc = VolatileRtc::with_epoch(clock.clone(), 100);

        for _ in 0..3 {
            clock.advance(400);
            rtc.tick();
        }

        assert_eq!(rtc.current_time(), 101);
        clock.advance(800);
        rtc.tick();
        assert_eq!(rtc.current_time(), 102);
    }

    #[test]
    fn setting_time_drops_pending_carry() {
        let clock = FakeClock::new();
        let mut rtc = VolatileRtc::with_epoch(clock.clone(), 0);
        clock.advance(900);
        rtc.tick();

        rtc.set_current_time(5_000);
        clock.advance(200);
        rtc.tick();

        assert_eq!(rtc.current_time(), 5_000);
    }
}
