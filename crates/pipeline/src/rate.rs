use std::{
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

/// Time source for the rate reporter.
pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Instant>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Arc::new(Mutex::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut now) = self.now.lock() {
            *now += by;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        match self.now.lock() {
            Ok(now) => *now,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

/// Completed frames per second, sampled once per interval.
///
/// Purely diagnostic; nothing in the scheduler reads it back.
#[derive(Debug)]
pub struct RateReporter<C: Clock = SystemClock> {
    clock: C,
    interval: Duration,
    count: u64,
    since: Instant,
    last_rate: Option<f32>,
}

impl RateReporter<SystemClock> {
    pub fn new(interval: Duration) -> Self {
        Self::with_clock(SystemClock, interval)
    }
}

impl<C: Clock> RateReporter<C> {
    pub fn with_clock(clock: C, interval: Duration) -> Self {
        let since = clock.now();
        Self {
            clock,
            interval,
            count: 0,
            since,
            last_rate: None,
        }
    }

    pub fn record(&mut self) {
        self.count += 1;
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn last_rate(&self) -> Option<f32> {
        self.last_rate
    }

    /// Once at least one interval has passed, return `count * 1000 / elapsed_ms`
    /// and start counting again.
    pub fn poll(&mut self) -> Option<f32> {
        let now = self.clock.now();
        let elapsed = now.saturating_duration_since(self.since);
        if elapsed < self.interval || elapsed.is_zero() {
            return None;
        }
        let rate = (self.count as f64 * 1000.0 / elapsed.as_millis().max(1) as f64) as f32;
        self.count = 0;
        self.since = now;
        self.last_rate = Some(rate);
        Some(rate)
    }
}
