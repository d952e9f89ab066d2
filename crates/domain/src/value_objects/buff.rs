//! Timed buffs.

use serde::{Deserialize, Serialize};

/// A timed modifier on a player. Expires at `expires_at` (epoch ms).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Buff {
    pub name: String,
    /// Multiplicative damage bonus, e.g. 0.2 for +20%.
    #[serde(default)]
    pub damage_bonus: f32,
    pub expires_at: i64,
}

impl Buff {
    pub fn is_expired(&self, now: i64) -> bool {
        now >= self.expires_at
    }
}
