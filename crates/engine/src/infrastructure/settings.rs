//! Engine settings loaded from the environment.
//!
//! `main` loads `.env` through dotenvy first, so every key below can live in
//! either the process environment or the repo-root `.env` file.

use std::path::PathBuf;
use std::str::FromStr;

/// Errors raised while reading settings.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SettingsError {
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("{key} must be {requirement}")]
    OutOfRange {
        key: &'static str,
        requirement: &'static str,
    },
}

/// Process-wide settings. Room-level knobs are copied into each room's config.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub server_host: String,
    pub server_port: u16,
    /// Simulation ticks per second.
    pub tick_rate: u32,
    /// Broadcast a state snapshot every N ticks.
    pub snapshot_every: u32,
    /// Commands accepted per sender per window.
    pub rate_limit: usize,
    pub rate_window_ms: i64,
    pub max_speed: f32,
    pub friction: f32,
    /// Half-extent of every zone on each axis.
    pub world_bound: f32,
    pub max_door_distance: f32,
    pub drop_ttl_ms: i64,
    /// Mana restored per second to living players.
    pub mana_regen: u32,
    /// Static content file; built-in content is used when unset.
    pub content_path: Option<PathBuf>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            server_host: "0.0.0.0".to_string(),
            server_port: 3000,
            tick_rate: 60,
            snapshot_every: 3,
            rate_limit: 10,
            rate_window_ms: 1_000,
            max_speed: 5.0,
            friction: 0.95,
            world_bound: 50.0,
            max_door_distance: 3.0,
            drop_ttl_ms: 60_000,
            mana_regen: 2,
            content_path: None,
        }
    }
}

impl EngineSettings {
    /// Reads settings from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through an arbitrary key lookup (used by tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SettingsError> {
        let defaults = Self::default();
        let settings = Self {
            server_host: lookup("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: parse_or(&lookup, "SERVER_PORT", defaults.server_port)?,
            tick_rate: parse_or(&lookup, "EMBERFALL_TICK_RATE", defaults.tick_rate)?,
            snapshot_every: parse_or(&lookup, "EMBERFALL_SNAPSHOT_EVERY", defaults.snapshot_every)?,
            rate_limit: parse_or(&lookup, "EMBERFALL_RATE_LIMIT", defaults.rate_limit)?,
            rate_window_ms: parse_or(&lookup, "EMBERFALL_RATE_WINDOW_MS", defaults.rate_window_ms)?,
            max_speed: parse_or(&lookup, "EMBERFALL_MAX_SPEED", defaults.max_speed)?,
            friction: parse_or(&lookup, "EMBERFALL_FRICTION", defaults.friction)?,
            world_bound: parse_or(&lookup, "EMBERFALL_WORLD_BOUND", defaults.world_bound)?,
            max_door_distance: parse_or(
                &lookup,
                "EMBERFALL_MAX_DOOR_DISTANCE",
                defaults.max_door_distance,
            )?,
            drop_ttl_ms: parse_or(&lookup, "EMBERFALL_DROP_TTL_MS", defaults.drop_ttl_ms)?,
            mana_regen: parse_or(&lookup, "EMBERFALL_MANA_REGEN", defaults.mana_regen)?,
            content_path: lookup("EMBERFALL_CONTENT_PATH").map(PathBuf::from),
        };
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.tick_rate == 0 || self.tick_rate > 240 {
            return Err(SettingsError::OutOfRange {
                key: "EMBERFALL_TICK_RATE",
                requirement: "between 1 and 240",
            });
        }
        if self.snapshot_every == 0 {
            return Err(SettingsError::OutOfRange {
                key: "EMBERFALL_SNAPSHOT_EVERY",
                requirement: "at least 1",
            });
        }
        if self.rate_limit == 0 || self.rate_window_ms <= 0 {
            return Err(SettingsError::OutOfRange {
                key: "EMBERFALL_RATE_LIMIT",
                requirement: "positive, with a positive window",
            });
        }
        if !(0.0..=1.0).contains(&self.friction) {
            return Err(SettingsError::OutOfRange {
                key: "EMBERFALL_FRICTION",
                requirement: "between 0 and 1",
            });
        }
        for (key, value) in [
            ("EMBERFALL_MAX_SPEED", self.max_speed),
            ("EMBERFALL_WORLD_BOUND", self.world_bound),
            ("EMBERFALL_MAX_DOOR_DISTANCE", self.max_door_distance),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(SettingsError::OutOfRange {
                    key,
                    requirement: "a positive finite number",
                });
            }
        }
        Ok(())
    }

    /// Fixed simulation step in seconds.
    pub fn tick_delta(&self) -> f32 {
        1.0 / self.tick_rate as f32
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, SettingsError> {
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| SettingsError::InvalidValue { key, value: raw }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let settings = EngineSettings::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(settings, EngineSettings::default());
        assert_eq!(settings.tick_rate, 60);
        assert_eq!(settings.rate_limit, 10);
    }

    #[test]
    fn overrides_are_parsed() {
        let settings = EngineSettings::from_lookup(lookup_from(&[
            ("EMBERFALL_TICK_RATE", "20"),
            ("EMBERFALL_MAX_SPEED", "4.0"),
            ("EMBERFALL_CONTENT_PATH", "content.json"),
        ]))
        .unwrap();
        assert_eq!(settings.tick_rate, 20);
        assert!((settings.max_speed - 4.0).abs() < f32::EPSILON);
        assert_eq!(settings.content_path, Some(PathBuf::from("content.json")));
    }

    #[test]
    fn invalid_numbers_are_reported_with_their_key() {
        let err = EngineSettings::from_lookup(lookup_from(&[("SERVER_PORT", "http")])).unwrap_err();
        assert_eq!(
            err,
            SettingsError::InvalidValue {
                key: "SERVER_PORT",
                value: "http".into()
            }
        );
    }

    #[test]
    fn zero_tick_rate_is_rejected() {
        let err =
            EngineSettings::from_lookup(lookup_from(&[("EMBERFALL_TICK_RATE", "0")])).unwrap_err();
        assert!(matches!(err, SettingsError::OutOfRange { .. }));
    }

    #[test]
    fn non_finite_distances_are_rejected() {
        for (key, raw) in [
            ("EMBERFALL_MAX_SPEED", "NaN"),
            ("EMBERFALL_WORLD_BOUND", "nan"),
            ("EMBERFALL_WORLD_BOUND", "inf"),
            ("EMBERFALL_MAX_DOOR_DISTANCE", "NaN"),
        ] {
            let err = EngineSettings::from_lookup(lookup_from(&[(key, raw)])).unwrap_err();
            assert!(
                matches!(err, SettingsError::OutOfRange { key: k, .. } if k == key),
                "{key}={raw} gave {err:?}"
            );
        }
    }
}
