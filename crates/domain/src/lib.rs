//! Emberfall domain: identities, value objects, and game entities shared by
//! the simulation engine and the wire protocol.

extern crate self as emberfall_domain;

pub mod entities;
pub mod error;
pub mod ids;
pub mod value_objects;

pub use entities::{
    xp_for_next_level, Ability, AbilityEffect, AbilityTarget, AiState, AiStatus, CharacterClass,
    Door, Drop, Entity, EntityKind, EntityTemplate, ItemDef, LootEntry, MobPlacement, Pet,
    PetKind, PetRoster, Player, QuestDef, QuestLog, QuestObjective, Zone, ZoneCategory,
    HP_PER_LEVEL, MAX_PETS, MP_PER_LEVEL,
};
pub use error::DomainError;
pub use ids::{
    AbilityId, DoorId, DropId, EntityId, ItemId, PetKindId, PlayerId, QuestId, RoomId,
    TemplateId, ZoneId,
};
pub use value_objects::{
    Buff, Direction, Inventory, InventorySlot, PlayerName, ResourcePool, Vec3,
    DEFAULT_INVENTORY_SLOTS,
};
