//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Destructible prop variety. Drives base stats and visuals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DestructibleKind {
    Barrel,
    Stall,
    Crate,
    Pot,
    Fence,
}

/// Drivable vehicle variety.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleKind {
    #[default]
    Chariot,
    Cart,
}

/// Wanted-level band as observed by the wanted system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WantedState {
    /// Wanted level is zero.
    #[default]
    Calm,
    /// Wanted, but below the pursuit threshold.
    Wanted,
    /// At or above the pursuit threshold; authorities are (nominally) chasing.
    Pursued,
}

/// Logical input actions. Raw device events are mapped onto these and
/// nothing else reaches the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputAction {
    Forward,
    Backward,
    Left,
    Right,
    Attack,
    Interact,
    Mute,
}

/// Session lifecycle (top-level state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// No world has been set up yet.
    #[default]
    Idle,
    Running,
    Paused,
}

/// Sound effects the simulation can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundId {
    Attack,
    VehicleEnter,
    VehicleExit,
    VehicleDrive,
    Destruction,
    Wanted,
}

/// Alert severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AlertLevel {
    Info,
    Warning,
    Critical,
}

impl InputAction {
    /// Map a key name (as reported by the host) to an action.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "w" | "W" | "ArrowUp" => Some(Self::Forward),
            "s" | "S" | "ArrowDown" => Some(Self::Backward),
            "a" | "A" | "ArrowLeft" => Some(Self::Left),
            "d" | "D" | "ArrowRight" => Some(Self::Right),
            " " | "Space" => Some(Self::Attack),
            "e" | "E" => Some(Self::Interact),
            "m" | "M" => Some(Self::Mute),
            _ => None,
        }
    }
}

impl SoundId {
    /// Asset identifier used by the audio backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Attack => "attack",
            Self::VehicleEnter => "vehicle_enter",
            Self::VehicleExit => "vehicle_exit",
            Self::VehicleDrive => "vehicle_drive",
            Self::Destruction => "destruction",
            Self::Wanted => "wanted",
        }
    }

    pub const ALL: [SoundId; 6] = [
        Self::Attack,
        Self::VehicleEnter,
        Self::VehicleExit,
        Self::VehicleDrive,
        Self::Destruction,
        Self::Wanted,
    ];
}
