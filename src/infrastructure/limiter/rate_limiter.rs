use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use dashmap::DashMap;
use parking_lot::Mutex;

/// Per-key fixed-window counter. The window restarts (count = 1) on the first
/// request after the window elapses.
#[derive(Debug)]
struct RateLimitEntry {
    count: u32,
    window_start: Instant,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RateLimitDecision {
    Allowed { remaining: u32 },
    Denied { retry_after_secs: u64 },
}

impl RateLimitDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitDecision::Allowed { .. })
    }
}

/// Fixed-window rate limiter keyed by an arbitrary client identifier.
/// Entries are created lazily and live for the life of the process; state is
/// not shared across instances, so this is best-effort protection only.
#[derive(Clone)]
pub struct FixedWindowLimiter {
    entries: Arc<DashMap<String, Arc<Mutex<RateLimitEntry>>>>,
    max_requests: u32,
    window: Duration,
}

impl FixedWindowLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        FixedWindowLimiter {
            entries: Arc::new(DashMap::new()),
            max_requests,
            window,
        }
    }

    pub fn check(&self, key: &str) -> RateLimitDecision {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> RateLimitDecision {
        let entry = self.get_entry(key, now);
        let mut entry = entry.lock();

        let elapsed = now.saturating_duration_since(entry.window_start);
        if elapsed >= self.window {
            entry.count = 0;
            entry.window_start = now;
        }

        if entry.count < self.max_requests {
            entry.count += 1;
            RateLimitDecision::Allowed {
                remaining: self.max_requests - entry.count,
            }
        } else {
            let remaining_window = self
                .window
                .saturating_sub(now.saturating_duration_since(entry.window_start));
            RateLimitDecision::Denied {
                retry_after_secs: remaining_window.as_secs().max(1),
            }
        }
    }

    fn get_entry(&self, key: &str, now: Instant) -> Arc<Mutex<RateLimitEntry>> {
        if let Some(existing) = self.entries.get(key) {
            return existing.clone();
        }
        self.entries
            .entry(key.to_string())
            .or_insert_with(|| {
                Arc::new(Mutex::new(RateLimitEntry {
                    count: 0,
                    window_start: now,
                }))
            })
            .clone()
    }
}
