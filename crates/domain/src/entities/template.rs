//! Entity templates: the static stat blocks mobs and NPCs are spawned from.

use serde::{Deserialize, Serialize};

use super::EntityKind;
use crate::ids::{ItemId, TemplateId};

/// One roll on a loot table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootEntry {
    pub item: ItemId,
    pub quantity: u32,
    /// Probability in `[0, 1]`.
    pub chance: f32,
}

fn default_leash() -> f32 {
    10.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityTemplate {
    pub id: TemplateId,
    pub name: String,
    pub kind: EntityKind,
    pub level: u32,
    pub max_hp: u32,
    /// Damage per melee swing.
    #[serde(default)]
    pub swing_damage: u32,
    #[serde(default)]
    pub xp: u64,
    #[serde(default)]
    pub gold_min: u64,
    #[serde(default)]
    pub gold_max: u64,
    #[serde(default)]
    pub loot: Vec<LootEntry>,
    /// Delay before a dead entity returns (fields and hubs only).
    #[serde(default)]
    pub respawn_ms: i64,
    #[serde(default = "default_leash")]
    pub leash_distance: f32,
}
