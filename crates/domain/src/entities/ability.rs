//! Ability definitions (static content).

use serde::{Deserialize, Serialize};

use super::CharacterClass;
use crate::ids::AbilityId;

/// Who an ability is aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbilityTarget {
    /// Needs a hostile target in range.
    Enemy,
    /// Affects only the caster; never takes a target.
    SelfOnly,
}

/// Optional side effect applied to the caster on a successful cast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AbilityEffect {
    /// Restores `power + level` hp.
    Heal,
    /// Applies a timed buff.
    Buff {
        name: String,
        duration_ms: i64,
        #[serde(default)]
        damage_bonus: f32,
    },
}

/// An ability. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ability {
    pub id: AbilityId,
    pub name: String,
    /// `None` means any class may use it.
    #[serde(default)]
    pub class: Option<CharacterClass>,
    /// Global cooldown triggered by this ability, in seconds.
    pub gcd: f32,
    /// This ability's own cooldown, in seconds.
    pub cooldown: f32,
    pub cost: u32,
    pub range: f32,
    pub power: u32,
    pub target: AbilityTarget,
    #[serde(default)]
    pub effect: Option<AbilityEffect>,
}

impl Ability {
    pub fn gcd_ms(&self) -> i64 {
        (self.gcd * 1000.0).round() as i64
    }

    pub fn cooldown_ms(&self) -> i64 {
        (self.cooldown * 1000.0).round() as i64
    }

    pub fn usable_by(&self, class: CharacterClass) -> bool {
        self.class.is_none_or(|required| required == class)
    }
}
