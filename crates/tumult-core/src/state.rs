//! Game state snapshot: the complete visible state handed to the host each tick.
//!
//! Everything here is a read-only copy. Presentation never writes back.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::{Alert, GameEvent, SoundRequest};
use crate::types::{RenderableHandle, SimTime};

/// Complete game state produced after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: SessionPhase,
    pub hud: HudView,
    pub player: Option<PlayerView>,
    pub props: Vec<PropView>,
    pub vehicles: Vec<VehicleView>,
    pub renderables: Vec<RenderableView>,
    pub camera: CameraView,
    pub lighting: LightingView,
    pub pursuit: PursuitView,
    /// Absent until a player exists.
    pub audio: Option<AudioView>,
    pub sound_requests: Vec<SoundRequest>,
    pub events: Vec<GameEvent>,
    pub alerts: Vec<Alert>,
}

/// Per-frame HUD read: the only values the HUD displays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HudView {
    pub score: u32,
    /// Player health in `0..=100`.
    pub health_percent: f32,
    /// Wanted level in `0..=5`.
    pub wanted_level: u8,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlayerView {
    pub position: Vec3,
    pub yaw: f32,
    pub health: i32,
    pub in_vehicle: bool,
    pub attacking: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropView {
    pub kind: DestructibleKind,
    pub position: Vec3,
    pub health: i32,
    pub max_health: i32,
    pub destroyed: bool,
    /// Live debris particles (zero once the batch is released).
    pub debris_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleView {
    pub kind: VehicleKind,
    pub position: Vec3,
    pub yaw: f32,
    pub speed: f32,
    pub speed_percent: f32,
    pub health_percent: f32,
    pub occupied: bool,
}

/// One drawable, positioned in world space.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderableView {
    pub handle: RenderableHandle,
    pub position: Vec3,
    pub yaw: f32,
    /// Uniform scale multiplier (damage feedback, attack swing).
    pub scale: f32,
    pub visible: bool,
    /// World-space debris particle positions, if any.
    pub particles: Vec<Vec3>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CameraView {
    /// Point the camera rig is centred on.
    pub target: Vec3,
    pub height: f32,
    pub aspect: f32,
}

/// Cosmetic lighting parameters derived from the time of day.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct LightingView {
    /// `0..1`; 0 = midnight, 0.25 = sunrise, 0.5 = noon, 0.75 = sunset.
    pub time_of_day: f32,
    pub sun_position: Vec3,
    pub sun_intensity: f32,
    pub ambient_intensity: f32,
    pub hemisphere_intensity: f32,
    pub sky_color: [f32; 3],
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PursuitView {
    pub state: WantedState,
    pub active: bool,
    /// `wanted_level / max_level`.
    pub intensity: f32,
    pub alert_radius: f32,
    pub decay_timer_secs: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioView {
    pub muted: bool,
    pub music_playing: bool,
    pub sfx_volume: f32,
    pub music_volume: f32,
}
