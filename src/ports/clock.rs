//! Clock port: Monotonic time source for response latency.
//!
//! The engine only reads time to stamp question presentation and submission.
//! Countdown progress is driven by ticks, never by this clock.

/// Monotonic millisecond clock.
pub trait Clock: Send {
    /// Milliseconds since an arbitrary fixed origin. Never decreases.
    fn now_ms(&self) -> u64;
}

impl<C: Clock + Sync> Clock for std::sync::Arc<C> {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}
