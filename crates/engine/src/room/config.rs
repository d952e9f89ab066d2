//! Per-room configuration.

use std::time::Duration;

use emberfall_domain::Zone;

use crate::infrastructure::settings::EngineSettings;
use crate::use_cases::{AiParams, MovementParams};

/// Starting gold for brand new characters.
pub const STARTING_GOLD: u64 = 20;

/// Everything a room needs to know about its zone and its tuning.
#[derive(Debug, Clone)]
pub struct RoomConfig {
    pub zone: Zone,
    pub tick_rate: u32,
    pub snapshot_every: u32,
    pub rate_limit: usize,
    pub rate_window_ms: i64,
    pub movement: MovementParams,
    pub ai: AiParams,
    pub max_door_distance: f32,
    pub drop_ttl_ms: i64,
    /// Mana restored to each living player per regen interval.
    pub mana_regen: u32,
    pub mana_regen_interval_ms: i64,
}

impl RoomConfig {
    pub fn new(zone: Zone) -> Self {
        Self::from_settings(zone, &EngineSettings::default())
    }

    pub fn from_settings(zone: Zone, settings: &EngineSettings) -> Self {
        Self {
            zone,
            tick_rate: settings.tick_rate,
            snapshot_every: settings.snapshot_every,
            rate_limit: settings.rate_limit,
            rate_window_ms: settings.rate_window_ms,
            movement: MovementParams {
                friction: settings.friction,
                max_speed: settings.max_speed,
                bound: settings.world_bound,
            },
            ai: AiParams::default(),
            max_door_distance: settings.max_door_distance,
            drop_ttl_ms: settings.drop_ttl_ms,
            mana_regen: settings.mana_regen,
            mana_regen_interval_ms: 1_000,
        }
    }

    /// Fixed step in seconds.
    pub fn tick_delta(&self) -> f32 {
        1.0 / self.tick_rate.max(1) as f32
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_micros(1_000_000 / u64::from(self.tick_rate.max(1)))
    }
}
