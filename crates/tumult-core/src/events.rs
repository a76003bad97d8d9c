//! Events emitted by the simulation for audio and UI feedback.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::enums::*;

/// Playback options attached to a sound request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SoundOptions {
    #[serde(default)]
    pub looped: bool,
    /// Relative volume in `0..=1`; `None` plays at the channel volume.
    #[serde(default)]
    pub volume: Option<f32>,
}

/// Fire-and-forget request for the audio backend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoundRequest {
    pub id: SoundId,
    pub position: Vec3,
    pub options: SoundOptions,
}

/// Things that happened during a tick, for UI feedback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// A prop was destroyed by the player.
    PropDestroyed {
        kind: DestructibleKind,
        position: Vec3,
        score: u32,
        wanted_delta: f32,
    },
    VehicleEntered { kind: VehicleKind },
    VehicleExited { kind: VehicleKind },
    /// A vehicle was wrecked (health reached zero).
    VehicleWrecked { kind: VehicleKind },
    WantedLevelChanged { level: u8 },
    PursuitStarted { level: u8 },
    PursuitEnded,
}

/// Alert for the UI alert queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub level: AlertLevel,
    pub message: String,
    pub tick: u64,
}

impl SoundRequest {
    pub fn at(id: SoundId, position: Vec3) -> Self {
        Self {
            id,
            position,
            options: SoundOptions::default(),
        }
    }
}
