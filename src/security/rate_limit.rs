//! Per-client fixed-window rate limiting for feedback submissions.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::config::RateLimitConfig;

/// Advisory returned with every rejected submission.
pub const RATE_LIMIT_MESSAGE: &str = "Too many requests, please try again after 24 hours";

/// Counter for one client within its current window.
struct Window {
    count: u32,
    started: Instant,
}

impl Window {
    fn new(now: Instant) -> Self {
        Self { count: 0, started: now }
    }

    fn expired(&self, now: Instant, length: Duration) -> bool {
        now.duration_since(self.started) >= length
    }
}

/// Outcome of a rate limit check, with enough detail to set `RateLimit-*` headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quota {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    /// Time until the client's window resets.
    pub reset_after: Duration,
}

/// Fixed-window limiter keyed by client address.
///
/// A window opens on a client's first request and is discarded wholesale once
/// it has lasted `window`; counts are never carried over.
pub struct RateLimiter {
    windows: Mutex<HashMap<IpAddr, Window>>,
    window: Duration,
    max_requests: u32,
}

impl RateLimiter {
    pub fn new(window: Duration, max_requests: u32) -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
            window,
            max_requests,
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(Duration::from_secs(config.window_secs), config.max_requests)
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Count a request from `client` and decide whether it may proceed.
    pub fn check(&self, client: IpAddr) -> Quota {
        self.check_at(client, Instant::now())
    }

    /// Clock-injected form of [`RateLimiter::check`].
    pub fn check_at(&self, client: IpAddr, now: Instant) -> Quota {
        let mut windows = self.windows.lock().expect("rate limiter mutex poisoned");
        let entry = windows.entry(client).or_insert_with(|| Window::new(now));

        if entry.expired(now, self.window) {
            *entry = Window::new(now);
        }

        let reset_after = self.window.saturating_sub(now.duration_since(entry.started));

        if entry.count >= self.max_requests {
            return Quota {
                allowed: false,
                limit: self.max_requests,
                remaining: 0,
                reset_after,
            };
        }

        entry.count += 1;
        Quota {
            allowed: true,
            limit: self.max_requests,
            remaining: self.max_requests - entry.count,
            reset_after,
        }
    }

    /// Drop windows that have already expired. Returns how many were removed.
    pub fn prune(&self) -> usize {
        self.prune_at(Instant::now())
    }

    pub fn prune_at(&self, now: Instant) -> usize {
        let mut windows = self.windows.lock().expect("rate limiter mutex poisoned");
        let before = windows.len();
        windows.retain(|_, w| !w.expired(now, self.window));
        before - windows.len()
    }

    #[cfg(test)]
    fn tracked_clients(&self) -> usize {
        self.windows.lock().expect("rate limiter mutex poisoned").len()
    }
}
