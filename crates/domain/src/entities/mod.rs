//! Domain entities - core game objects with identity, plus the static
//! content definitions they are built from.

mod ability;
mod class;
mod drop;
mod entity;
mod item;
mod pet;
mod player;
mod quest;
mod template;
mod zone;

pub use ability::{Ability, AbilityEffect, AbilityTarget};
pub use class::CharacterClass;
pub use drop::Drop;
pub use entity::{AiState, AiStatus, Entity, EntityKind};
pub use item::ItemDef;
pub use pet::{Pet, PetKind, PetRoster, MAX_PETS};
pub use player::{xp_for_next_level, Player, HP_PER_LEVEL, MP_PER_LEVEL};
pub use quest::{QuestDef, QuestLog, QuestObjective};
pub use template::{EntityTemplate, LootEntry};
pub use zone::{Door, MobPlacement, Zone, ZoneCategory};
