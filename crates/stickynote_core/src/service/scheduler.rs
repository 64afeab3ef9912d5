//! Auto-save timing.
//!
//! # Responsibility
//! - Abstract the time source so auto-save can be driven deterministically.
//! - Track one recurring auto-save deadline (`AutoSaveTimer`).
//! - Drive a mutex-guarded target from a background thread (`AutoSaveDriver`).
//!
//! # Invariants
//! - At most one deadline exists; restarting replaces it, never adds one.
//! - Missed deadlines coalesce into a single tick; ticks are never queued.
//! - The driver only touches its target through the shared mutex, so ticks
//!   never interleave with other operations on the target.

use log::{debug, error, info};
use std::io;
use std::sync::mpsc::{channel, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Monotonic time source.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall clock backed by `Instant::now`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Single recurring deadline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AutoSaveTimer {
    period: Option<Duration>,
    next_due: Option<Instant>,
}

impl AutoSaveTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts, or restarts with a new period, counting from `now`.
    pub fn start(&mut self, period: Duration, now: Instant) {
        self.period = Some(period);
        self.next_due = Some(now + period);
    }

    pub fn stop(&mut self) {
        self.period = None;
        self.next_due = None;
    }

    pub fn is_running(&self) -> bool {
        self.period.is_some()
    }

    pub fn period(&self) -> Option<Duration> {
        self.period
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.next_due
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.next_due.is_some_and(|due| now >= due)
    }

    /// Schedules the next deadline one period after `now`.
    ///
    /// Called after a save pass completes, so a slow pass pushes the next
    /// tick back instead of queueing extra ones.
    pub fn rearm(&mut self, now: Instant) {
        if let Some(period) = self.period {
            self.next_due = Some(now + period);
        }
    }
}

/// Target driven by `AutoSaveDriver`.
pub trait AutoSaveTick: Send + 'static {
    /// Runs one poll; implementations decide whether a save pass is due.
    fn auto_save_tick(&mut self);
}

/// Background thread that polls a shared target at a fixed cadence.
///
/// Stops and joins on drop.
pub struct AutoSaveDriver {
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl AutoSaveDriver {
    /// Spawns the polling thread.
    ///
    /// `poll_every` is the polling granularity, not the auto-save period;
    /// the target's own timer decides when a pass is due.
    pub fn spawn<T: AutoSaveTick>(target: Arc<Mutex<T>>, poll_every: Duration) -> io::Result<Self> {
        let (stop_tx, stop_rx) = channel::<()>();
        let handle = thread::Builder::new()
            .name("stickynote-autosave".to_string())
            .spawn(move || {
                info!("event=autosave_driver module=scheduler status=start");
                loop {
                    match stop_rx.recv_timeout(poll_every) {
                        Err(RecvTimeoutError::Timeout) => {
                            let mut guard = target.lock().unwrap_or_else(|poisoned| {
                                error!(
                                    "event=autosave_driver module=scheduler status=degraded error_code=lock_poisoned"
                                );
                                poisoned.into_inner()
                            });
                            guard.auto_save_tick();
                        }
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                info!("event=autosave_driver module=scheduler status=stop");
            })?;
        Ok(Self {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        })
    }

    /// Signals the thread to exit and waits for it.
    pub fn stop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("event=autosave_driver module=scheduler status=error error_code=thread_panicked");
            }
        }
        debug!("event=autosave_driver module=scheduler status=joined");
    }
}

impl Drop for AutoSaveDriver {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_fires_once_per_period_and_restart_replaces_deadline() {
        let clock = ManualClock::new();
        let mut timer = AutoSaveTimer::new();
        assert!(!timer.is_due(clock.now()));

        timer.start(Duration::from_secs(5), clock.now());
        clock.advance(Duration::from_secs(4));
        assert!(!timer.is_due(clock.now()));
        clock.advance(Duration::from_secs(1));
        assert!(timer.is_due(clock.now()));

        timer.rearm(clock.now());
        assert!(!timer.is_due(clock.now()));

        timer.start(Duration::from_secs(10), clock.now());
        clock.advance(Duration::from_secs(5));
        assert!(!timer.is_due(clock.now()));
        assert_eq!(timer.period(), Some(Duration::from_secs(10)));
    }

    #[test]
    fn missed_periods_coalesce_into_one_tick() {
        let clock = ManualClock::new();
        let mut timer = AutoSaveTimer::new();
        timer.start(Duration::from_secs(5), clock.now());
        clock.advance(Duration::from_secs(60));
        assert!(timer.is_due(clock.now()));
        timer.rearm(clock.now());
        assert!(!timer.is_due(clock.now()));
    }

    #[test]
    fn stopped_timer_is_never_due() {
        let clock = ManualClock::new();
        let mut timer = AutoSaveTimer::new();
        timer.start(Duration::from_secs(5), clock.now());
        timer.stop();
        clock.advance(Duration::from_secs(100));
        assert!(!timer.is_due(clock.now()));
        timer.rearm(clock.now());
        assert!(!timer.is_running());
    }

    struct Counter(usize);

    impl AutoSaveTick for Counter {
        fn auto_save_tick(&mut self) {
            self.0 += 1;
        }
    }

    #[test]
    fn driver_ticks_target_until_stopped() {
        let target = Arc::new(Mutex::new(Counter(0)));
        let mut driver =
            AutoSaveDriver::spawn(Arc::clone(&target), Duration::from_millis(5)).unwrap();
        let deadline = Instant::now() + Duration::from_secs(5);
        while target.lock().unwrap().0 < 2 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        driver.stop();
        let ticks = target.lock().unwrap().0;
        assert!(ticks >= 2);

        thread::sleep(Duration::from_millis(30));
        assert_eq!(target.lock().unwrap().0, ticks);
    }
}
