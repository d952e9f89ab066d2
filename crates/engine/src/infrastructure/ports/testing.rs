//! Testability ports for injecting time and randomness.

use chrono::{DateTime, Utc};

// =============================================================================
// Testability Ports
// =============================================================================

pub trait ClockPort: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Current time as epoch milliseconds, the unit every simulation timestamp uses.
    fn now_millis(&self) -> i64 {
        self.now().timestamp_millis()
    }
}

pub trait RandomPort: Send + Sync {
    /// Uniform float in `[min, max]`.
    fn gen_f32(&self, min: f32, max: f32) -> f32;
    /// Uniform integer in `[min, max]`.
    fn gen_range(&self, min: u64, max: u64) -> u64;
    /// Uniform index in `[0, len)`; `len` must be non-zero.
    fn gen_index(&self, len: usize) -> usize;
}
