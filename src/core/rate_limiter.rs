//! Reactive call throttling
//!
//! The limiter only knows how long the previous call took. Assuming calls
//! are issued back to back, sleeping `interval - last_duration` before the
//! next one keeps the start-to-start spacing at or above `interval`.

use std::time::Duration;
use tokio::sync::{Mutex, MutexGuard};
use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::core::config::TranslatorConfig;

/// Duration of the most recent call attempt; zero means no call yet
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateLimitState {
    /// How long the last attempt took
    pub last_call_duration: Duration,
}

impl RateLimitState {
    /// Store a completed attempt's duration.
    ///
    /// Zero is stored as one millisecond so a completed attempt is never
    /// read back as "no call yet".
    fn record(&mut self, duration: Duration) {
        let duration = duration.max(Duration::from_millis(1));
        self.last_call_duration = duration;
        debug!("Recorded call duration {:?}", duration);
    }

    /// Delay owed before the next call, if any
    fn pending_delay(&self, interval: Duration, margin: Duration) -> Option<Duration> {
        let last = self.last_call_duration;
        if last.is_zero() || last >= interval {
            return None;
        }
        Some(interval - last + margin)
    }
}

/// Keeps the call rate against the provider at or below a fixed ceiling
#[derive(Debug)]
pub struct RateLimiter {
    /// Minimum start-to-start spacing
    interval: Duration,
    /// Jitter allowance added to each wait
    margin: Duration,
    /// Shared duration register
    state: Mutex<RateLimitState>,
}

impl RateLimiter {
    /// Create a limiter for `qps` calls per second
    pub fn new(qps: f64, margin: Duration) -> Self {
        Self::with_interval(Duration::from_millis((1000.0 / qps) as u64), margin)
    }

    /// Create a limiter with an explicit interval
    pub fn with_interval(interval: Duration, margin: Duration) -> Self {
        Self {
            interval,
            margin,
            state: Mutex::new(RateLimitState::default()),
        }
    }

    /// Create a limiter from configuration
    pub fn from_config(config: &TranslatorConfig) -> Self {
        Self::with_interval(config.interval(), config.throttle_margin())
    }

    /// Minimum start-to-start spacing between calls
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Extra delay added on top of the computed wait
    pub fn margin(&self) -> Duration {
        self.margin
    }

    /// Store how long the most recent call took
    pub async fn record_duration(&self, duration: Duration) {
        let mut state = self.state.lock().await;
        state.record(duration);
    }

    /// Sleep if the previous call finished faster than the interval
    pub async fn wait_if_needed(&self) {
        let delay = {
            let state = self.state.lock().await;
            state.pending_delay(self.interval, self.margin)
        };

        if let Some(delay) = delay {
            debug!("Throttling for {:?}", delay);
            sleep(delay).await;
        }
    }

    /// Last recorded call duration
    pub async fn last_call_duration(&self) -> Duration {
        self.state.lock().await.last_call_duration
    }

    /// Take exclusive ownership of the limiter state for one call attempt.
    ///
    /// Callers holding a permit are serialized, so concurrent attempts can
    /// never observe a stale duration and skip throttling together.
    pub async fn acquire(&self) -> RateLimitPermit<'_> {
        RateLimitPermit {
            state: self.state.lock().await,
            interval: self.interval,
            margin: self.margin,
            call_started: None,
        }
    }
}

/// Exclusive access to the limiter for the duration of one call attempt.
///
/// Once [`wait`](Self::wait) has returned, the attempt counts as started and
/// its elapsed time is recorded when the permit is dropped, whatever the exit
/// path: normal return, early error, a dropped future, or a panic. A permit
/// dropped before or during the wait records nothing.
#[derive(Debug)]
pub struct RateLimitPermit<'a> {
    /// Held for the whole attempt
    state: MutexGuard<'a, RateLimitState>,
    /// Copied from the limiter
    interval: Duration,
    /// Copied from the limiter
    margin: Duration,
    /// Set once the wait has finished
    call_started: Option<Instant>,
}

impl RateLimitPermit<'_> {
    /// Sleep if the previous call finished faster than the interval, then
    /// mark the call as started
    pub async fn wait(&mut self) {
        if let Some(delay) = self.state.pending_delay(self.interval, self.margin) {
            debug!("Throttling for {:?}", delay);
            sleep(delay).await;
        }
        self.call_started = Some(Instant::now());
    }

    /// Record an explicit duration and release the limiter
    pub fn record_duration(mut self, duration: Duration) {
        self.call_started = None;
        self.state.record(duration);
    }
}

impl Drop for RateLimitPermit<'_> {
    fn drop(&mut self) {
        if let Some(start) = self.call_started.take() {
            self.state.record(start.elapsed());
        }
    }
}
