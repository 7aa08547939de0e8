//! Polled tick timer on the embassy time driver
//!
//! Ticks are deadlines on the monotonic clock rather than interrupts: each
//! tick is scheduled exactly one period after the previous one, so a slow
//! tick handler does not accumulate drift.

use embassy_time::{block_for, Duration, Instant};
use latchkey_hal::TickTimer;

/// Tick timer driven by `embassy_time::Instant`
pub struct InstantTicker {
    period: Option<Duration>,
    next: Instant,
}

impl Default for InstantTicker {
    fn default() -> Self {
        Self::new()
    }
}

impl InstantTicker {
    /// Create a stopped ticker
    pub fn new() -> Self {
        Self {
            period: None,
            next: Instant::now(),
        }
    }
}

impl TickTimer for InstantTicker {
    fn start(&mut self, period_ms: u32) {
        let period = Duration::from_millis(period_ms as u64);
        self.period = Some(period);
        self.next = Instant::now() + period;
    }

    fn stop(&mut self) {
        self.period = None;
    }

    fn is_running(&self) -> bool {
        self.period.is_some()
    }

    fn wait_tick(&mut self) {
        let Some(period) = self.period else {
            return;
        };

        let now = Instant::now();
        if self.next > now {
            block_for(self.next - now);
        }
        self.next += period;
    }
}
