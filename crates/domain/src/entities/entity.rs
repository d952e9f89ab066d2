//! Non-player entities (mobs and NPCs) and their AI status.

use serde::{Deserialize, Serialize};

use crate::ids::{EntityId, TemplateId};
use crate::value_objects::{ResourcePool, Vec3};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// Hostile; driven by the AI state machine.
    Mob,
    /// Friendly; stays idle.
    Npc,
}

/// AI state machine states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiState {
    Idle,
    Alert,
    Chase,
    Attack,
    Reset,
}

impl AiState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Alert => "alert",
            Self::Chase => "chase",
            Self::Attack => "attack",
            Self::Reset => "reset",
        }
    }
}

impl std::fmt::Display for AiState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current AI state and when it was entered (epoch ms).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiStatus {
    pub state: AiState,
    pub since: i64,
}

impl AiStatus {
    pub fn idle(now: i64) -> Self {
        Self {
            state: AiState::Idle,
            since: now,
        }
    }

    /// Moves to `state`, restamping `since` only on an actual change.
    pub fn transition(&mut self, state: AiState, now: i64) -> bool {
        if self.state == state {
            return false;
        }
        self.state = state;
        self.since = now;
        true
    }
}

/// A mob or NPC living in a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub template: TemplateId,
    pub name: String,
    pub kind: EntityKind,
    pub position: Vec3,
    pub velocity: Vec3,
    pub hp: ResourcePool,
    pub level: u32,
    pub ai: AiStatus,
    pub spawn_position: Vec3,
    pub leash_distance: f32,
    /// Last melee swing (epoch ms).
    pub last_swing_at: Option<i64>,
}

impl Entity {
    pub fn is_alive(&self) -> bool {
        !self.hp.is_empty()
    }

    pub fn distance_from_spawn(&self) -> f32 {
        self.position.ground_distance(self.spawn_position)
    }
}
