//! Per-client sliding-window rate limiter.

use dashmap::DashMap;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    start: Instant,
    elapsed: Mutex<Duration>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            elapsed: Mutex::new(Duration::ZERO),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut elapsed = self.elapsed.lock().unwrap_or_else(|e| e.into_inner());
        *elapsed += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let elapsed = self.elapsed.lock().unwrap_or_else(|e| e.into_inner());
        self.start + *elapsed
    }
}

/// Outcome of a rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed,
    /// Rejected; the oldest counted request leaves the window after
    /// `retry_after`.
    Limited { retry_after: Duration },
}

impl RateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateDecision::Allowed)
    }
}

/// Allows at most `max_requests` per client within any `window`.
///
/// Rejected requests are not counted.
pub struct RateLimiter {
    window: Duration,
    max_requests: usize,
    clock: Arc<dyn Clock>,
    requests: DashMap<String, VecDeque<Instant>>,
}

/// Shortest window the limiter runs with.
pub const MIN_WINDOW: Duration = Duration::from_secs(1);

impl RateLimiter {
    /// A quota below one or a window shorter than [`MIN_WINDOW`] is raised
    /// to that minimum.
    pub fn new(max_requests: usize, window: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            window: window.max(MIN_WINDOW),
            max_requests: max_requests.max(1),
            clock,
            requests: DashMap::new(),
        }
    }

    /// Limiter on the wall clock.
    pub fn system(max_requests: usize, window: Duration) -> Self {
        Self::new(max_requests, window, Arc::new(SystemClock))
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn max_requests(&self) -> usize {
        self.max_requests
    }

    /// Count a request from `client` if the client is under its quota.
    pub fn check(&self, client: &str) -> RateDecision {
        let now = self.clock.now();
        let mut history = self.requests.entry(client.to_string()).or_default();
        self.expire(&mut history, now);

        if history.len() >= self.max_requests {
            let retry_after = history
                .front()
                .map(|&oldest| (oldest + self.window).saturating_duration_since(now))
                .unwrap_or(self.window);
            return RateDecision::Limited { retry_after };
        }

        history.push_back(now);
        RateDecision::Allowed
    }

    /// Forget clients with no requests in the current window. Returns how
    /// many were removed.
    pub fn prune(&self) -> usize {
        let now = self.clock.now();
        let before = self.requests.len();
        self.requests.retain(|_, history| {
            self.expire(history, now);
            !history.is_empty()
        });
        before.saturating_sub(self.requests.len())
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.requests.len()
    }

    fn expire(&self, history: &mut VecDeque<Instant>, now: Instant) {
        while let Some(&oldest) = history.front() {
            if now.saturating_duration_since(oldest) >= self.window {
                history.pop_front();
            } else {
                break;
            }
        }
    }
}
