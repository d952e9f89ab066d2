//! Player record owned by the room currently hosting the player.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{CharacterClass, PetRoster, QuestLog};
use crate::error::DomainError;
use crate::ids::{AbilityId, PlayerId};
use crate::value_objects::{Buff, Inventory, PlayerName, ResourcePool, Vec3};

/// XP needed to go from `level` to `level + 1`.
pub fn xp_for_next_level(level: u32) -> u64 {
    u64::from(level) * 100
}

/// Max hp gained per level.
pub const HP_PER_LEVEL: u32 = 10;
/// Max mp gained per level.
pub const MP_PER_LEVEL: u32 = 5;

/// A connected player.
///
/// # Invariants
///
/// - `hp` and `mp` stay within `[0, max]` (enforced by `ResourcePool`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: PlayerName,
    pub class: CharacterClass,
    pub position: Vec3,
    pub velocity: Vec3,
    /// Heading in radians about the Y axis.
    pub facing: f32,
    pub animation: String,
    pub hp: ResourcePool,
    pub mp: ResourcePool,
    pub gold: u64,
    pub level: u32,
    pub xp: u64,
    pub buffs: Vec<Buff>,
    /// Epoch ms of the last cast that triggered the global cooldown.
    pub last_global_cooldown: Option<i64>,
    /// Ability id -> epoch ms of its last cast.
    pub cooldowns: HashMap<AbilityId, i64>,
    pub inventory: Inventory,
    pub quests: QuestLog,
    pub pets: PetRoster,
}

impl Player {
    /// A level-1 character with full class pools.
    pub fn new(id: PlayerId, name: PlayerName, class: CharacterClass, position: Vec3) -> Self {
        let (max_hp, max_mp) = class.base_pools();
        Self {
            id,
            name,
            class,
            position,
            velocity: Vec3::ZERO,
            facing: 0.0,
            animation: "idle".to_string(),
            hp: ResourcePool::full(max_hp),
            mp: ResourcePool::full(max_mp),
            gold: 0,
            level: 1,
            xp: 0,
            buffs: Vec::new(),
            last_global_cooldown: None,
            cooldowns: HashMap::new(),
            inventory: Inventory::default(),
            quests: QuestLog::default(),
            pets: PetRoster::default(),
        }
    }

    pub fn with_gold(mut self, gold: u64) -> Self {
        self.gold = gold;
        self
    }

    pub fn is_alive(&self) -> bool {
        !self.hp.is_empty()
    }

    /// Combined multiplicative damage bonus from active buffs.
    pub fn damage_bonus(&self) -> f32 {
        self.buffs
            .iter()
            .fold(1.0, |acc, buff| acc * (1.0 + buff.damage_bonus))
    }

    /// Replaces any buff with the same name.
    pub fn apply_buff(&mut self, buff: Buff) {
        self.buffs.retain(|existing| existing.name != buff.name);
        self.buffs.push(buff);
    }

    /// Drops expired buffs and returns them.
    pub fn expire_buffs(&mut self, now: i64) -> Vec<Buff> {
        let (expired, active): (Vec<Buff>, Vec<Buff>) = std::mem::take(&mut self.buffs)
            .into_iter()
            .partition(|buff| buff.is_expired(now));
        self.buffs = active;
        expired
    }

    /// # Errors
    ///
    /// `DomainError::InsufficientGold` when the player cannot afford `amount`.
    pub fn spend_gold(&mut self, amount: u64) -> Result<(), DomainError> {
        if self.gold < amount {
            return Err(DomainError::insufficient_gold(amount, self.gold));
        }
        self.gold -= amount;
        Ok(())
    }

    pub fn earn_gold(&mut self, amount: u64) {
        self.gold = self.gold.saturating_add(amount);
    }

    /// Adds XP and applies any level-ups. Returns the number of levels gained.
    pub fn grant_xp(&mut self, amount: u64) -> u32 {
        self.xp = self.xp.saturating_add(amount);
        let mut gained = 0;
        while self.xp >= xp_for_next_level(self.level) {
            self.xp -= xp_for_next_level(self.level);
            self.level += 1;
            self.hp.grow_max(HP_PER_LEVEL);
            self.mp.grow_max(MP_PER_LEVEL);
            gained += 1;
        }
        if gained > 0 {
            self.hp.refill();
            self.mp.refill();
        }
        gained
    }

    /// Returns a defeated player to life at `position`.
    pub fn revive_at(&mut self, position: Vec3) {
        self.position = position;
        self.velocity = Vec3::ZERO;
        self.animation = "idle".to_string();
        self.hp.refill();
    }
}
