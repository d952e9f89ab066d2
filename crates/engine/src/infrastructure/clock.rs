//! Clock and random implementations.

use crate::infrastructure::ports::{ClockPort, RandomPort};
use chrono::{DateTime, Utc};

/// System clock - uses real time.
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockPort for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// System random - uses real randomness.
pub struct SystemRandom;

impl SystemRandom {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomPort for SystemRandom {
    fn gen_f32(&self, min: f32, max: f32) -> f32 {
        use rand::Rng;
        if max <= min {
            return min;
        }
        rand::thread_rng().gen_range(min..=max)
    }

    fn gen_range(&self, min: u64, max: u64) -> u64 {
        use rand::Rng;
        if max <= min {
            return min;
        }
        rand::thread_rng().gen_range(min..=max)
    }

    fn gen_index(&self, len: usize) -> usize {
        use rand::Rng;
        rand::thread_rng().gen_range(0..len.max(1))
    }
}

/// Manually advanced clock for testing.
#[cfg(test)]
pub struct ManualClock(std::sync::atomic::AtomicI64);

#[cfg(test)]
impl ManualClock {
    pub fn at_millis(ms: i64) -> Self {
        Self(std::sync::atomic::AtomicI64::new(ms))
    }

    pub fn advance(&self, ms: i64) {
        self.0.fetch_add(ms, std::sync::atomic::Ordering::SeqCst);
    }

    pub fn set(&self, ms: i64) {
        self.0.store(ms, std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(test)]
impl ClockPort for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.now_millis()).unwrap_or_default()
    }

    fn now_millis(&self) -> i64 {
        self.0.load(std::sync::atomic::Ordering::SeqCst)
    }
}

/// Fixed random for testing. `unit` in `[0, 1]` picks the same relative point
/// in every requested range.
#[cfg(test)]
pub struct FixedRandom(pub f32);

#[cfg(test)]
impl FixedRandom {
    /// Always the middle of the range (damage factor 1.0).
    pub fn midpoint() -> Self {
        Self(0.5)
    }
}

#[cfg(test)]
impl RandomPort for FixedRandom {
    fn gen_f32(&self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.0
    }

    fn gen_range(&self, min: u64, max: u64) -> u64 {
        min + ((max.saturating_sub(min)) as f32 * self.0).round() as u64
    }

    fn gen_index(&self, len: usize) -> usize {
        ((len as f32 * self.0) as usize).min(len.saturating_sub(1))
    }
}
