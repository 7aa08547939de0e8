//! Periodic tick source
//!
//! Actuation sequences advance one phase per timer tick. The timer is
//! modelled as a polled clock: the caller programs a period and then waits
//! for each tick in turn, so ticks are delivered strictly in order and never
//! overlap the code that handles them.

/// Periodic tick timer
pub trait TickTimer {
    /// Program the tick period and (re)start counting from now
    ///
    /// Calling this while running replaces the period; the next tick is one
    /// new period after the call.
    fn start(&mut self, period_ms: u32);

    /// Deactivate the timer
    fn stop(&mut self);

    /// Check whether a period is programmed
    fn is_running(&self) -> bool;

    /// Block until the next tick
    ///
    /// Returns immediately when the timer is stopped.
    fn wait_tick(&mut self);
}

impl<T: TickTimer + ?Sized> TickTimer for &mut T {
    fn start(&mut self, period_ms: u32) {
        (**self).start(period_ms)
    }

    fn stop(&mut self) {
        (**self).stop()
    }

    fn is_running(&self) -> bool {
        (**self).is_running()
    }

    fn wait_tick(&mut self) {
        (**self).wait_tick()
    }
}
