//! Transfer payload: the value that carries a player from one room to another.
//!
//! The payload is a full copy. The source room deletes its record once the
//! payload is built and the destination rebuilds a fresh record from it, so no
//! two rooms ever share a live player.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use emberfall_domain::{
    AbilityId, Buff, CharacterClass, Inventory, PetRoster, PlayerId, PlayerName, QuestLog, ZoneId,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferPayload {
    pub player_id: PlayerId,
    pub name: PlayerName,
    pub class: CharacterClass,
    pub level: u32,
    pub xp: u64,
    pub hp: u32,
    pub max_hp: u32,
    pub mp: u32,
    pub max_mp: u32,
    pub gold: u64,
    pub buffs: Vec<Buff>,
    pub last_global_cooldown: Option<i64>,
    pub cooldowns: HashMap<AbilityId, i64>,
    #[serde(default)]
    pub inventory: Inventory,
    #[serde(default)]
    pub quests: QuestLog,
    #[serde(default)]
    pub pets: PetRoster,
    /// Zone the player left; `None` for records loaded from storage.
    #[serde(default)]
    pub source_zone: Option<ZoneId>,
}
