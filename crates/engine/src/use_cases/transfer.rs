//! Zone transfer: door validation and the player payload that crosses rooms.
//!
//! A transfer is remove-then-recreate. The source room turns its player into a
//! `TransferPayload` and drops it; the destination builds a brand new `Player`
//! from the payload.

use std::collections::BTreeSet;

use emberfall_domain::{
    Door, DomainError, Player, PlayerName, QuestId, ResourcePool, Vec3, ZoneId,
};
use emberfall_shared::TransferPayload;

use crate::entities::{DoorAccessError, ZoneRegistry};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransferError {
    #[error("You are not close enough to a door leading to {zone}.")]
    TooFarFromDoor { zone: ZoneId },

    #[error("The door is sealed until you complete the quest {quest}.")]
    QuestRequirementNotMet { quest: QuestId },

    #[error("There is no zone called {0}.")]
    TargetZoneNotFound(ZoneId),

    #[error("{0} is full. Try again later.")]
    ZoneFull(ZoneId),
}

impl TransferError {
    /// Stable machine-readable reason sent with `ZoneSwapFailed`.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::TooFarFromDoor { .. } => "TooFarFromDoor",
            Self::QuestRequirementNotMet { .. } => "QuestRequirementNotMet",
            Self::TargetZoneNotFound(_) => "TargetZoneNotFound",
            Self::ZoneFull(_) => "ZoneFull",
        }
    }
}

/// Checks that a player standing at `position` in `from` may pass to `to`.
///
/// Returns the door they will use.
pub fn validate_transfer_request(
    zones: &ZoneRegistry,
    from: &ZoneId,
    to: &ZoneId,
    position: Vec3,
    max_door_distance: f32,
    completed_quests: &BTreeSet<QuestId>,
) -> Result<Door, TransferError> {
    let door = zones
        .nearest_door(from, position, max_door_distance, Some(to))
        .ok_or_else(|| TransferError::TooFarFromDoor { zone: to.clone() })?;
    zones
        .validate_door_access(door, position, max_door_distance, completed_quests)
        .map_err(|err| match err {
            DoorAccessError::TooFar { .. } => TransferError::TooFarFromDoor { zone: to.clone() },
            DoorAccessError::QuestRequired { quest } => {
                TransferError::QuestRequirementNotMet { quest }
            }
        })?;
    if !zones.contains(to) {
        return Err(TransferError::TargetZoneNotFound(to.clone()));
    }
    Ok(door.clone())
}

/// Snapshots everything about a player that must survive a zone change.
pub fn create_transfer_payload(player: &Player, source_zone: Option<&ZoneId>) -> TransferPayload {
    TransferPayload {
        player_id: player.id,
        name: player.name.clone(),
        class: player.class,
        level: player.level,
        xp: player.xp,
        hp: player.hp.current(),
        max_hp: player.hp.max(),
        mp: player.mp.current(),
        max_mp: player.mp.max(),
        gold: player.gold,
        buffs: player.buffs.clone(),
        last_global_cooldown: player.last_global_cooldown,
        cooldowns: player.cooldowns.clone(),
        inventory: player.inventory.clone(),
        quests: player.quests.clone(),
        pets: player.pets.clone(),
        source_zone: source_zone.cloned(),
    }
}

/// Rebuilds a player from a payload at `position`.
///
/// # Errors
///
/// `DomainError::Validation` when the payload's pools are inconsistent.
pub fn player_from_payload(payload: &TransferPayload, position: Vec3) -> Result<Player, DomainError> {
    let name = PlayerName::new(payload.name.as_str())?;
    let mut player = Player::new(payload.player_id, name, payload.class, position);
    player.level = payload.level.max(1);
    player.xp = payload.xp;
    player.hp = ResourcePool::with_current(payload.hp, payload.max_hp)?;
    player.mp = ResourcePool::with_current(payload.mp, payload.max_mp)?;
    player.gold = payload.gold;
    player.buffs = payload.buffs.clone();
    player.last_global_cooldown = payload.last_global_cooldown;
    player.cooldowns = payload.cooldowns.clone();
    player.inventory = payload.inventory.clone();
    player.quests = payload.quests.clone();
    player.pets = payload.pets.clone();
    // A defeated player never arrives dead.
    if player.hp.is_empty() {
        player.hp.refill();
    }
    Ok(player)
}
