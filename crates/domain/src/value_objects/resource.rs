//! Clamped resource pool for hit points and mana.
//!
//! `current` can never leave `[0, max]`: every mutation goes through a
//! saturating method, and deserialization re-validates the pair.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A bounded resource such as hp or mp.
///
/// # Invariants
///
/// - `0 <= current <= max`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPool", into = "RawPool")]
pub struct ResourcePool {
    current: u32,
    max: u32,
}

#[derive(Serialize, Deserialize)]
struct RawPool {
    current: u32,
    max: u32,
}

impl TryFrom<RawPool> for ResourcePool {
    type Error = DomainError;

    fn try_from(raw: RawPool) -> Result<Self, Self::Error> {
        Self::with_current(raw.current, raw.max)
    }
}

impl From<ResourcePool> for RawPool {
    fn from(pool: ResourcePool) -> Self {
        RawPool {
            current: pool.current,
            max: pool.max,
        }
    }
}

impl ResourcePool {
    /// A full pool.
    pub fn full(max: u32) -> Self {
        Self { current: max, max }
    }

    /// A pool at an explicit value.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` when `current > max`.
    pub fn with_current(current: u32, max: u32) -> Result<Self, DomainError> {
        if current > max {
            return Err(DomainError::validation(format!(
                "resource value {current} exceeds maximum {max}"
            )));
        }
        Ok(Self { current, max })
    }

    #[inline]
    pub fn current(&self) -> u32 {
        self.current
    }

    #[inline]
    pub fn max(&self) -> u32 {
        self.max
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.current == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.current == self.max
    }

    /// Removes up to `amount`, returning how much was actually removed.
    pub fn drain(&mut self, amount: u32) -> u32 {
        let removed = amount.min(self.current);
        self.current -= removed;
        removed
    }

    /// Adds up to `amount` without exceeding `max`, returning how much was added.
    pub fn restore(&mut self, amount: u32) -> u32 {
        let added = amount.min(self.max - self.current);
        self.current += added;
        added
    }

    pub fn refill(&mut self) {
        self.current = self.max;
    }

    /// Raises the ceiling; the current value is kept.
    pub fn grow_max(&mut self, amount: u32) {
        self.max = self.max.saturating_add(amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_saturates_at_zero() {
        let mut hp = ResourcePool::full(30);
        assert_eq!(hp.drain(50), 30);
        assert_eq!(hp.current(), 0);
        assert!(hp.is_empty());
    }

    #[test]
    fn restore_saturates_at_max() {
        let mut mp = ResourcePool::with_current(10, 40).unwrap();
        assert_eq!(mp.restore(100), 30);
        assert!(mp.is_full());
    }

    #[test]
    fn rejects_current_above_max() {
        assert!(ResourcePool::with_current(11, 10).is_err());
    }

    #[test]
    fn deserialization_revalidates() {
        let ok: ResourcePool = serde_json::from_str(r#"{"current":5,"max":10}"#).unwrap();
        assert_eq!(ok.current(), 5);
        let bad = serde_json::from_str::<ResourcePool>(r#"{"current":15,"max":10}"#);
        assert!(bad.is_err());
    }
}
