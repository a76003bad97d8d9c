//! Sound request routing.
//!
//! The simulation only asks for sounds; the host's audio backend plays
//! them. This subsystem applies the mute switch and volume scaling and
//! tracks whether background music should be running.

use tracing::{debug, info};

use tumult_core::events::SoundRequest;
use tumult_core::state::AudioView;

const DEFAULT_SFX_VOLUME: f32 = 0.7;
const DEFAULT_MUSIC_VOLUME: f32 = 0.5;

#[derive(Debug, Clone)]
pub struct SoundSystem {
    muted: bool,
    music_playing: bool,
    sfx_volume: f32,
    music_volume: f32,
    queue: Vec<SoundRequest>,
}

impl Default for SoundSystem {
    fn default() -> Self {
        Self {
            muted: false,
            music_playing: false,
            sfx_volume: DEFAULT_SFX_VOLUME,
            music_volume: DEFAULT_MUSIC_VOLUME,
            queue: Vec::new(),
        }
    }
}

impl SoundSystem {
    /// Queue a request for the host, scaled by the effects volume. Dropped
    /// while muted.
    pub fn request(&mut self, mut request: SoundRequest) {
        if self.muted {
            debug!(id = request.id.as_str(), "sound dropped while muted");
            return;
        }
        let volume = request.options.volume.unwrap_or(1.0) * self.sfx_volume;
        request.options.volume = Some(volume);
        self.queue.push(request);
    }

    pub fn start_music(&mut self) {
        if !self.muted {
            self.music_playing = true;
        }
    }

    pub fn stop_music(&mut self) {
        self.music_playing = false;
    }

    /// Flip mute. Muting stops the music; unmuting resumes it.
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.music_playing = !self.muted;
        if self.muted {
            self.queue.clear();
        }
        info!(muted = self.muted, "audio mute toggled");
        self.muted
    }

    pub fn set_sfx_volume(&mut self, volume: f32) {
        self.sfx_volume = volume.clamp(0.0, 1.0);
    }

    pub fn set_music_volume(&mut self, volume: f32) {
        self.music_volume = volume.clamp(0.0, 1.0);
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Requests accumulated since the last drain.
    pub fn drain(&mut self) -> Vec<SoundRequest> {
        std::mem::take(&mut self.queue)
    }

    pub fn view(&self) -> AudioView {
        AudioView {
            muted: self.muted,
            music_playing: self.music_playing,
            sfx_volume: self.sfx_volume,
            music_volume: self.music_volume,
        }
    }
}
