//! Audio boundary. Playback is best effort: failures are logged and the
//! frame goes on.

use std::collections::HashSet;

use thiserror::Error;
use tracing::{debug, warn};

use tumult_core::events::SoundRequest;
use tumult_core::state::AudioView;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no clip loaded for sound {0}")]
    Missing(String),
    #[error("playback failed: {0}")]
    Playback(String),
}

pub trait AudioBackend {
    /// Register the bytes of a clip under an id.
    fn load(&mut self, id: &str, bytes: &[u8]) -> Result<(), AudioError>;

    fn play(&mut self, request: &SoundRequest) -> Result<(), AudioError>;

    /// Start or stop the background track.
    fn set_music(&mut self, playing: bool, volume: f32) -> Result<(), AudioError>;
}

/// Play a frame's requests, swallowing failures. Returns how many played.
pub fn play_all(backend: &mut dyn AudioBackend, requests: &[SoundRequest]) -> usize {
    requests
        .iter()
        .filter(|request| match backend.play(request) {
            Ok(()) => true,
            Err(err) => {
                warn!(id = request.id.as_str(), error = %err, "sound playback failed");
                false
            }
        })
        .count()
}

/// Follow the simulation's music flag, touching the backend only on change.
#[derive(Debug, Default)]
pub struct MusicSync {
    playing: bool,
}

impl MusicSync {
    pub fn apply(&mut self, backend: &mut dyn AudioBackend, view: Option<AudioView>) {
        let (wanted, volume) = view.map_or((false, 0.0), |v| (v.music_playing, v.music_volume));
        if wanted == self.playing {
            return;
        }
        match backend.set_music(wanted, volume) {
            Ok(()) => self.playing = wanted,
            Err(err) => warn!(error = %err, "music toggle failed"),
        }
    }
}

/// Backend that logs instead of making noise.
///
/// Permissive by default. A strict instance refuses ids that were never
/// loaded, like a real mixer missing its clip.
#[derive(Debug, Default)]
pub struct LogAudio {
    strict: bool,
    loaded: HashSet<String>,
    played: usize,
    music: bool,
}

impl LogAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }

    pub fn played(&self) -> usize {
        self.played
    }

    pub fn music_playing(&self) -> bool {
        self.music
    }
}

impl AudioBackend for LogAudio {
    fn load(&mut self, id: &str, bytes: &[u8]) -> Result<(), AudioError> {
        if bytes.is_empty() {
            return Err(AudioError::Playback(format!("clip {id} has no data")));
        }
        self.loaded.insert(id.to_string());
        Ok(())
    }

    fn play(&mut self, request: &SoundRequest) -> Result<(), AudioError> {
        let id = request.id.as_str();
        if self.strict && !self.loaded.contains(id) {
            return Err(AudioError::Missing(id.to_string()));
        }
        debug!(
            id,
            volume = request.options.volume.unwrap_or(1.0),
            looped = request.options.looped,
            "play sound"
        );
        self.played += 1;
        Ok(())
    }

    fn set_music(&mut self, playing: bool, volume: f32) -> Result<(), AudioError> {
        debug!(playing, volume, "background music");
        self.music = playing;
        Ok(())
    }
}
