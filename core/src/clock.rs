use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use web_time::Instant;

/// Monotonic time source for the game clock.
pub trait Clock {
    /// Time since an arbitrary, fixed origin.
    fn now(&self) -> Duration;
}

/// Wall clock backed by [`web_time::Instant`], usable both natively and in the browser.
#[derive(Copy, Clone, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn advance_secs(&self, secs: u64) {
        self.advance(Duration::from_secs(secs));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Start and stop stamps of one game, elapsed time is derived from them.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Stopwatch {
    started_at: Option<Duration>,
    stopped_at: Option<Duration>,
}

impl Stopwatch {
    pub fn start(&mut self, now: Duration) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    /// Freezes the elapsed time. Stopping an unstarted or stopped watch does nothing.
    pub fn stop(&mut self, now: Duration) {
        if self.started_at.is_some() && self.stopped_at.is_none() {
            self.stopped_at = Some(now);
        }
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some() && self.stopped_at.is_none()
    }

    /// Whole seconds between start and stop (or `now` while running), 0 before the start.
    pub fn elapsed_secs(&self, now: Duration) -> u32 {
        let Some(started_at) = self.started_at else {
            return 0;
        };
        let end = self.stopped_at.unwrap_or(now);
        let secs = end.saturating_sub(started_at).as_secs();
        u32::try_from(secs).unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new();
        let other = clock.clone();
        clock.advance_secs(5);
        assert_eq!(other.now(), Duration::from_secs(5));
    }

    #[test]
    fn stopwatch_counts_whole_seconds_and_freezes() {
        let mut watch = Stopwatch::default();
        assert_eq!(watch.elapsed_secs(Duration::from_secs(10)), 0);

        watch.start(Duration::from_secs(10));
        assert!(watch.is_running());
        assert_eq!(watch.elapsed_secs(Duration::from_millis(12_900)), 2);

        watch.stop(Duration::from_secs(15));
        assert!(!watch.is_running());
        assert_eq!(watch.elapsed_secs(Duration::from_secs(100)), 5);

        watch.stop(Duration::from_secs(50));
        watch.start(Duration::from_secs(60));
        assert_eq!(watch.elapsed_secs(Duration::from_secs(100)), 5);
    }
}
