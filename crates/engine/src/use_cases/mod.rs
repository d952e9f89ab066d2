//! Use cases - the game rules the room applies to its state.
//!
//! Each module is a set of plain functions over owned domain values. The room
//! orchestrator calls them; none of them know about channels or sockets.

pub mod ai;
pub mod combat;
pub mod commands;
pub mod loot;
pub mod movement;
pub mod pets;
pub mod quests;
pub mod transfer;
pub mod vendor;

pub use ai::{update_entity, AiParams, AiTarget, AiUpdate};
pub use combat::{apply_damage, try_cast, CastOutcome, CastRejection, DamageResult};
pub use commands::{Command, CommandParser, ParseError, PetAction, QuestAction};
pub use movement::MovementParams;
pub use transfer::{
    create_transfer_payload, player_from_payload, validate_transfer_request, TransferError,
};
