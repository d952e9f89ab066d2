//! Player classes and their per-class tuning.

use serde::{Deserialize, Serialize};

/// Playable class. Determines starting pools and the damage multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharacterClass {
    Warrior,
    Ranger,
    Mage,
}

impl CharacterClass {
    /// Fixed scalar applied to every damage roll.
    pub fn damage_multiplier(self) -> f32 {
        match self {
            Self::Warrior => 1.1,
            Self::Ranger => 1.0,
            Self::Mage => 1.2,
        }
    }

    /// Level-1 (max hp, max mp).
    pub fn base_pools(self) -> (u32, u32) {
        match self {
            Self::Warrior => (120, 40),
            Self::Ranger => (100, 60),
            Self::Mage => (80, 100),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Warrior => "warrior",
            Self::Ranger => "ranger",
            Self::Mage => "mage",
        }
    }
}

impl std::fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CharacterClass {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "warrior" => Ok(Self::Warrior),
            "ranger" => Ok(Self::Ranger),
            "mage" => Ok(Self::Mage),
            _ => Err(()),
        }
    }
}
