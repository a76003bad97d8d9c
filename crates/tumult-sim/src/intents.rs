//! Intents emitted by the player and resolved by the dispatch system.
//!
//! The player never touches another entity. It describes what it wants to
//! happen and the world decides what that hits.

use glam::Vec3;

/// A swing at whatever is in front of the player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackIntent {
    pub origin: Vec3,
    /// Unit ground-plane facing.
    pub facing: Vec3,
    pub power: i32,
    pub radius: f32,
}

/// Interact key pressed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteractIntent {
    /// Look for a free vehicle within `radius` of `origin`.
    Board { origin: Vec3, radius: f32 },
    /// Leave the vehicle currently occupied.
    Exit { vehicle: hecs::Entity },
}

/// Controls for the occupied vehicle this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveIntent {
    pub vehicle: hecs::Entity,
    pub accelerate: bool,
    pub brake: bool,
    /// +1 left, -1 right, 0 straight.
    pub steer: f32,
}

/// Everything the player asked for in one update.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerIntents {
    pub attack: Option<AttackIntent>,
    pub interact: Option<InteractIntent>,
    pub drive: Option<DriveIntent>,
}

impl PlayerIntents {
    pub fn is_empty(&self) -> bool {
        self.attack.is_none() && self.interact.is_none() && self.drive.is_none()
    }
}
