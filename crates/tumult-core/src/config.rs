//! Session tuning. Every field has a default, so a partial JSON file is enough
//! to override a handful of values.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::*;

/// Errors raised while loading tuning from disk.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// All tunable parameters of a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub player: PlayerTuning,
    pub vehicle: VehicleTuning,
    pub wanted: WantedTuning,
    pub world: WorldTuning,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub speed: f32,
    pub rotation_speed: f32,
    pub collision_radius: f32,
    pub max_health: i32,
    pub attack_duration: f32,
    pub attack_cooldown: f32,
    pub attack_power: i32,
    pub attack_radius: f32,
    pub interact_radius: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleTuning {
    pub max_speed: f32,
    pub acceleration: f32,
    pub deceleration: f32,
    pub turn_speed: f32,
    pub min_turn_speed: f32,
    pub max_health: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WantedTuning {
    pub max_level: u8,
    pub decay_delay_secs: f32,
    /// Levels shed per second once decay has begun.
    pub decay_rate: f32,
    pub pursuit_threshold: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldTuning {
    pub building_count: usize,
    pub scatter_half_extent: f32,
    pub day_duration_secs: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            speed: PLAYER_SPEED,
            rotation_speed: PLAYER_ROTATION_SPEED,
            collision_radius: PLAYER_COLLISION_RADIUS,
            max_health: PLAYER_MAX_HEALTH,
            attack_duration: ATTACK_DURATION,
            attack_cooldown: ATTACK_COOLDOWN,
            attack_power: ATTACK_POWER,
            attack_radius: ATTACK_RADIUS,
            interact_radius: INTERACT_RADIUS,
        }
    }
}

impl Default for VehicleTuning {
    fn default() -> Self {
        Self {
            max_speed: VEHICLE_MAX_SPEED,
            acceleration: VEHICLE_ACCELERATION,
            deceleration: VEHICLE_DECELERATION,
            turn_speed: VEHICLE_TURN_SPEED,
            min_turn_speed: VEHICLE_MIN_TURN_SPEED,
            max_health: VEHICLE_MAX_HEALTH,
        }
    }
}

impl Default for WantedTuning {
    fn default() -> Self {
        Self {
            max_level: MAX_WANTED_LEVEL,
            decay_delay_secs: WANTED_DECAY_DELAY,
            decay_rate: WANTED_DECAY_RATE,
            pursuit_threshold: PURSUIT_THRESHOLD,
        }
    }
}

impl Default for WorldTuning {
    fn default() -> Self {
        Self {
            building_count: BUILDING_COUNT,
            scatter_half_extent: BUILDING_SCATTER_HALF_EXTENT,
            day_duration_secs: DAY_DURATION_SECS,
        }
    }
}

impl WantedTuning {
    /// Seconds between successive one-level decrements once decaying.
    pub fn decay_step_secs(&self) -> f32 {
        if self.decay_rate > 0.0 {
            1.0 / self.decay_rate
        } else {
            f32::INFINITY
        }
    }
}

impl Tuning {
    /// Parse tuning from a JSON document. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load tuning from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }
}
