//! Background ticker driving the per-question countdown.
//!
//! A dedicated thread emits one [`Tick`] per interval over a channel so the
//! TUI main loop never blocks on the timer. The thread waits on a stop
//! channel between ticks; dropping the handle closes that channel and joins
//! the thread, so no tick can outlive the session that requested it.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Interval between countdown ticks.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// One elapsed interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick;

/// Handle to a running ticker thread. Cancels on drop.
pub struct TickerHandle {
    /// Receiver for ticks
    tick_rx: Receiver<Tick>,
    /// Dropping this wakes and stops the thread
    stop_tx: Option<Sender<()>>,
    /// Thread handle (for joining)
    handle: Option<JoinHandle<()>>,
}

impl TickerHandle {
    /// Take every tick delivered so far (non-blocking).
    pub fn drain(&self) -> usize {
        let mut count = 0;
        while let Ok(Tick) = self.tick_rx.try_recv() {
            count += 1;
        }
        count
    }

    /// Whether the ticker thread has exited (cancelled or died).
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Stop the thread and wait for it to exit. Idempotent.
    pub fn cancel(&mut self) {
        self.stop_tx.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!("Ticker thread panicked");
            }
        }
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Spawns ticker threads.
pub struct Ticker;

impl Ticker {
    /// Start emitting a tick every `interval`.
    #[must_use]
    pub fn spawn(interval: Duration) -> TickerHandle {
        let (tick_tx, tick_rx) = mpsc::channel();
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || Self::run(interval, &tick_tx, &stop_rx));

        TickerHandle {
            tick_rx,
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        }
    }

    fn run(interval: Duration, tick_tx: &Sender<Tick>, stop_rx: &Receiver<()>) {
        loop {
            match stop_rx.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => {
                    if tick_tx.send(Tick).is_err() {
                        break;
                    }
                }
                // Explicit stop or the handle went away
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn wait_for_ticks(handle: &TickerHandle) -> usize {
        let deadline = Instant::now() + Duration::from_secs(2);
        loop {
            let count = handle.drain();
            if count > 0 || Instant::now() >= deadline {
                return count;
            }
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn test_ticker_delivers_ticks() {
        let handle = Ticker::spawn(Duration::from_millis(5));
        assert!(wait_for_ticks(&handle) > 0);
        assert!(!handle.is_finished());
    }

    #[test]
    fn test_cancel_stops_thread() {
        let mut handle = Ticker::spawn(Duration::from_millis(5));
        assert!(wait_for_ticks(&handle) > 0);

        handle.cancel();
        handle.drain();
        assert!(handle.is_finished());
        assert_eq!(handle.drain(), 0);

        // Second cancel is a no-op
        handle.cancel();
    }

    #[test]
    fn test_cancel_before_first_tick() {
        let mut handle = Ticker::spawn(Duration::from_secs(60));
        handle.cancel();
        assert_eq!(handle.drain(), 0);
        assert!(handle.is_finished());
    }
}
