//! Mob AI: a five-state machine with leashing.
//!
//! `Idle -> Alert -> Chase/Attack`, and `Reset` back to the spawn point when
//! the mob strays past its leash or loses every target.

use emberfall_domain::{AiState, Entity, EntityKind, PlayerId, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AiParams {
    pub aggro_radius: f32,
    pub melee_range: f32,
    /// Units per second while chasing or resetting.
    pub move_speed: f32,
    /// A resetting mob counts as home within this distance of its spawn.
    pub reset_radius: f32,
    pub swing_interval_ms: i64,
}

impl Default for AiParams {
    fn default() -> Self {
        Self {
            aggro_radius: 8.0,
            melee_range: 2.0,
            move_speed: 3.0,
            reset_radius: 0.5,
            swing_interval_ms: 1_500,
        }
    }
}

/// A living player as the AI sees it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AiTarget {
    pub id: PlayerId,
    pub position: Vec3,
}

/// What one update did to a mob.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AiUpdate {
    /// `(from, to)` when the state changed.
    pub transition: Option<(AiState, AiState)>,
    /// Player hit by a melee swing this update.
    pub swing_at: Option<PlayerId>,
}

/// Advances one entity by one tick. Dead entities and NPCs are left alone.
pub fn update_entity(
    entity: &mut Entity,
    targets: &[AiTarget],
    now: i64,
    dt: f32,
    params: &AiParams,
) -> AiUpdate {
    let mut update = AiUpdate::default();
    if !entity.is_alive() || entity.kind == EntityKind::Npc {
        return update;
    }
    let from = entity.ai.state;

    let nearest = targets
        .iter()
        .map(|t| (t, entity.position.ground_distance(t.position)))
        .min_by(|a, b| a.1.total_cmp(&b.1));

    if from != AiState::Reset {
        let lost_targets = nearest.is_none() && from != AiState::Idle;
        if lost_targets || entity.distance_from_spawn() > entity.leash_distance {
            entity.ai.transition(AiState::Reset, now);
        }
    }

    if entity.ai.state == AiState::Reset {
        let step = params.move_speed * dt;
        entity.position = entity.position.step_toward(entity.spawn_position, step);
        if entity.distance_from_spawn() <= params.reset_radius {
            entity.hp.refill();
            entity.ai.transition(AiState::Idle, now);
        }
    } else if let Some((target, distance)) = nearest {
        let next = match entity.ai.state {
            AiState::Idle if distance <= params.aggro_radius => AiState::Alert,
            AiState::Alert if distance <= params.melee_range => AiState::Attack,
            AiState::Alert if distance <= params.aggro_radius => AiState::Chase,
            AiState::Alert => AiState::Idle,
            AiState::Chase if distance <= params.melee_range => AiState::Attack,
            AiState::Chase if distance > params.aggro_radius => AiState::Idle,
            AiState::Chase => {
                let step = params.move_speed * dt;
                entity.position = entity.position.step_toward(target.position, step);
                AiState::Chase
            }
            AiState::Attack if distance > params.melee_range => AiState::Chase,
            AiState::Attack => {
                let ready = entity
                    .last_swing_at
                    .is_none_or(|last| now - last >= params.swing_interval_ms);
                if ready {
                    entity.last_swing_at = Some(now);
                    update.swing_at = Some(target.id);
                }
                AiState::Attack
            }
            state => state,
        };
        entity.ai.transition(next, now);
    }

    if entity.ai.state != from {
        update.transition = Some((from, entity.ai.state));
    }
    update
}
