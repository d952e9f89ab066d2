//! Room state snapshots broadcast to every client in a room.

use serde::{Deserialize, Serialize};

use emberfall_domain::{
    AiState, CharacterClass, DropId, EntityId, EntityKind, ItemId, PlayerId, Vec3, ZoneId,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
    pub class: CharacterClass,
    pub position: Vec3,
    pub facing: f32,
    pub animation: String,
    pub hp: u32,
    pub max_hp: u32,
    pub mp: u32,
    pub max_mp: u32,
    pub level: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityView {
    pub id: EntityId,
    pub name: String,
    pub kind: EntityKind,
    pub position: Vec3,
    pub hp: u32,
    pub max_hp: u32,
    pub level: u32,
    pub state: AiState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropView {
    pub id: DropId,
    pub position: Vec3,
    pub item_id: Option<ItemId>,
    pub quantity: u32,
}

/// Everything a client needs to render the room at one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSnapshot {
    pub zone: ZoneId,
    pub tick: u64,
    /// Epoch milliseconds of the tick that produced this snapshot.
    pub at: i64,
    pub players: Vec<PlayerView>,
    pub entities: Vec<EntityView>,
    pub drops: Vec<DropView>,
}
