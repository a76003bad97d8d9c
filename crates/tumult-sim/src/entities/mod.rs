//! Gameplay entities.
//!
//! Each entity owns its internal state and its renderable handle; the
//! `Transform` is a sibling hecs component passed in by the systems that
//! drive it. Cross-entity effects go through intents resolved by the
//! dispatch system, never through direct calls between entities.

pub mod destructible;
pub mod player;
pub mod vehicle;

use tumult_core::types::{RenderableHandle, Transform};

pub use destructible::{Debris, Destructible};
pub use player::Player;
pub use vehicle::Vehicle;

/// Visual state an entity exposes to the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Visual {
    pub visible: bool,
    pub scale: f32,
}

impl Default for Visual {
    fn default() -> Self {
        Self {
            visible: true,
            scale: 1.0,
        }
    }
}

/// Per-frame behaviour shared by self-updating entities.
pub trait Entity {
    fn update(&mut self, transform: &mut Transform, dt: f32);

    fn renderable(&self) -> RenderableHandle;

    fn visual(&self) -> Visual {
        Visual::default()
    }
}

/// Marker for static scenery (buildings, ground, grid).
#[derive(Debug, Clone, Copy, Default)]
pub struct Scenery;
