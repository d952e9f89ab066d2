//! Zones and the doors that connect them (static content).

use serde::{Deserialize, Serialize};

use crate::ids::{DoorId, QuestId, TemplateId, ZoneId};
use crate::value_objects::Vec3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneCategory {
    Hub,
    Field,
    Dungeon,
}

/// A one-way transition point from `from` to `to`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Door {
    pub id: DoorId,
    pub from: ZoneId,
    pub to: ZoneId,
    pub position: Vec3,
    /// Quest that must be completed before the door opens.
    #[serde(default)]
    pub required_quest: Option<QuestId>,
}

/// Where a mob is placed when the room initializes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MobPlacement {
    pub template: TemplateId,
    pub position: Vec3,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: ZoneId,
    pub name: String,
    pub category: ZoneCategory,
    pub max_players: usize,
    #[serde(default)]
    pub doors: Vec<Door>,
    pub spawn_points: Vec<Vec3>,
    #[serde(default)]
    pub mob_spawns: Vec<MobPlacement>,
    #[serde(default)]
    pub has_vendor: bool,
}
