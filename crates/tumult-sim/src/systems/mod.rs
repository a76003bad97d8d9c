//! Systems run by the engine each tick.
//!
//! Systems are free functions over `&mut World` plus whatever subsystem
//! state they need. They do not own state of their own.

pub mod broad_phase;
pub mod dispatch;
pub mod environment;
pub mod physics;
pub mod player;
pub mod snapshot;
pub mod wanted;

use glam::Vec3;

use tumult_core::enums::{AlertLevel, SoundId};
use tumult_core::events::{Alert, GameEvent, SoundRequest};

/// Side outputs accumulated during one tick.
#[derive(Debug, Clone, Default)]
pub struct TickOutput {
    pub tick: u64,
    pub sounds: Vec<SoundRequest>,
    pub events: Vec<GameEvent>,
    pub alerts: Vec<Alert>,
}

impl TickOutput {
    pub fn new(tick: u64) -> Self {
        Self {
            tick,
            ..Self::default()
        }
    }

    pub fn sound(&mut self, id: SoundId, position: Vec3) {
        self.sounds.push(SoundRequest::at(id, position));
    }

    pub fn alert(&mut self, level: AlertLevel, message: impl Into<String>) {
        self.alerts.push(Alert {
            level,
            message: message.into(),
            tick: self.tick,
        });
    }
}
