//! Commands sent from the host to the simulation.
//!
//! Commands are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::enums::InputAction;

/// All possible host/player requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Input ---
    /// An action key went down.
    KeyDown { action: InputAction },
    /// An action key was released.
    KeyUp { action: InputAction },

    // --- Session control ---
    /// Build the world and start simulating.
    StartSession,
    /// Tear down the current world and start a fresh one.
    Reset,
    Pause,
    Resume,
    /// Set time scale (1.0 = normal, 0.0 = frozen).
    SetTimeScale { scale: f32 },
    /// The presentation surface changed size.
    Resize { width: u32, height: u32 },

    // --- Audio ---
    /// Set effects and/or music volume in `0..=1`; `None` leaves it as is.
    SetVolume {
        sfx: Option<f32>,
        music: Option<f32>,
    },
}

impl PlayerCommand {
    /// Translate a raw key event into a command, if the key is mapped.
    pub fn from_key_event(key: &str, pressed: bool) -> Option<Self> {
        let action = InputAction::from_key(key)?;
        Some(if pressed {
            Self::KeyDown { action }
        } else {
            Self::KeyUp { action }
        })
    }
}
