//! Sliding-window rate limiter keyed by sender.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

/// Remembers the timestamps of accepted actions per key and refuses new ones
/// once `capacity` of them fall inside the trailing window.
#[derive(Debug)]
pub struct RateLimiter<K> {
    capacity: usize,
    window_ms: i64,
    history: HashMap<K, VecDeque<i64>>,
}

impl<K: Hash + Eq> RateLimiter<K> {
    pub fn new(capacity: usize, window_ms: i64) -> Self {
        Self {
            capacity,
            window_ms,
            history: HashMap::new(),
        }
    }

    /// Whether `key` may act at `now`. Prunes entries that left the window.
    pub fn allows(&mut self, key: &K, now: i64) -> bool {
        let Some(stamps) = self.history.get_mut(key) else {
            return self.capacity > 0;
        };
        while stamps.front().is_some_and(|&t| now - t >= self.window_ms) {
            stamps.pop_front();
        }
        stamps.len() < self.capacity
    }

    pub fn record(&mut self, key: K, now: i64) {
        self.history.entry(key).or_default().push_back(now);
    }

    pub fn forget(&mut self, key: &K) {
        self.history.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refuses_once_window_is_full_and_recovers_after_it() {
        let mut limiter = RateLimiter::new(3, 1_000);
        for t in [0, 10, 20] {
            assert!(limiter.allows(&"aria", t));
            limiter.record("aria", t);
        }
        assert!(!limiter.allows(&"aria", 999));
        assert!(limiter.allows(&"aria", 1_000));
        assert!(limiter.allows(&"brom", 999));
    }

    #[test]
    fn forget_clears_history() {
        let mut limiter = RateLimiter::new(1, 1_000);
        limiter.record(7u32, 0);
        assert!(!limiter.allows(&7, 1));
        limiter.forget(&7);
        assert!(limiter.allows(&7, 1));
    }
}
