//! Game loop thread. Runs the simulation once per display frame and hands
//! each snapshot to the renderer, the audio backend and shared state.
//!
//! The engine is created inside the thread so it never crosses a thread
//! boundary. Commands arrive over an `mpsc` channel and are applied at the
//! next frame.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use tumult_core::commands::PlayerCommand;
use tumult_core::constants::{MAX_FRAME_DT, TARGET_FPS};
use tumult_core::state::GameStateSnapshot;
use tumult_sim::engine::{SimConfig, SimulationEngine};

use crate::assets::{AssetDefinition, AssetKind, AssetLoader, PendingLoad};
use crate::audio::{play_all, AudioBackend, MusicSync};
use crate::demo::{ScriptPlayer, ScriptedCommand};
use crate::error::AppError;
use crate::render::Renderer;
use crate::state::{AppState, GameLoopCommand};

/// Everything the loop thread needs, moved into it at spawn.
pub struct LoopConfig {
    pub sim: SimConfig,
    /// Target frame rate. `0` runs unpaced.
    pub fps: u32,
    /// Stop after this many frames.
    pub max_frames: Option<u64>,
    pub script: Vec<ScriptedCommand>,
    /// Assets to (re)load for every new session.
    pub assets: Option<(AssetLoader, Vec<AssetDefinition>)>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            sim: SimConfig::default(),
            fps: TARGET_FPS,
            max_frames: None,
            script: Vec::new(),
            assets: None,
        }
    }
}

/// Summary handed back when the loop exits.
#[derive(Debug, Clone, Default)]
pub struct LoopReport {
    pub frames: u64,
    pub sounds_played: usize,
    pub final_snapshot: Option<GameStateSnapshot>,
}

pub fn frame_duration(fps: u32) -> Option<Duration> {
    (fps > 0).then(|| Duration::from_nanos(1_000_000_000 / fps as u64))
}

/// Spawn the loop thread and register its command channel in `state`.
pub fn spawn_game_loop(
    state: &AppState,
    config: LoopConfig,
    audio: Box<dyn AudioBackend + Send>,
    renderer: Box<dyn Renderer + Send>,
) -> Result<JoinHandle<LoopReport>, AppError> {
    if state
        .running
        .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        .is_err()
    {
        return Err(AppError::AlreadyRunning);
    }
    let guard = RunningGuard {
        running: Arc::clone(&state.running),
        command_tx: Arc::clone(&state.command_tx),
    };

    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();
    *state.command_tx.lock().map_err(|_| AppError::Poisoned)? = Some(cmd_tx);

    let shared = Shared {
        latest_snapshot: Arc::clone(&state.latest_snapshot),
        generation: Arc::clone(&state.generation),
    };
    std::thread::Builder::new()
        .name("tumult-game-loop".into())
        .spawn(move || {
            let _guard = guard;
            run_game_loop(config, cmd_rx, shared, audio, renderer)
        })
        .map_err(AppError::Spawn)
}

struct Shared {
    latest_snapshot: Arc<Mutex<Option<GameStateSnapshot>>>,
    generation: Arc<AtomicU64>,
}

/// Releases the host's handle on the loop when the thread ends, panics
/// included, so a new loop can be spawned.
struct RunningGuard {
    running: Arc<AtomicBool>,
    command_tx: Arc<Mutex<Option<mpsc::Sender<GameLoopCommand>>>>,
}

impl Drop for RunningGuard {
    fn drop(&mut self) {
        if let Ok(mut tx) = self.command_tx.lock() {
            *tx = None;
        }
        self.running.store(false, Ordering::Release);
    }
}

/// Per-session asset reloading. Loads requested for an older session are
/// discarded when they complete.
struct SessionAssets {
    loader: AssetLoader,
    manifest: Vec<AssetDefinition>,
    requested_for: u64,
    pending: Vec<PendingLoad>,
}

impl SessionAssets {
    fn poll(&mut self, generation: u64, audio: &mut dyn AudioBackend) {
        if generation != self.requested_for && generation > 0 {
            debug!(
                root = %self.loader.root().display(),
                generation,
                "loading session assets"
            );
            match self
                .loader
                .load_in_background(self.manifest.clone(), generation)
            {
                Ok(pending) => self.pending.push(pending),
                Err(err) => warn!(error = %err, "could not start asset load"),
            }
            self.requested_for = generation;
        }

        let (done, waiting): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(PendingLoad::is_finished);
        self.pending = waiting;
        for pending in done {
            match self.loader.finish(pending, generation) {
                Ok(true) => self.register_audio(audio),
                Ok(false) => {}
                Err(err) => {
                    warn!(error = %err, "continuing with missing assets");
                    self.register_audio(audio);
                }
            }
        }
    }

    fn register_audio(&self, audio: &mut dyn AudioBackend) {
        for (id, asset) in self.loader.of_kind(AssetKind::Audio) {
            if let Err(err) = audio.load(id, &asset.bytes) {
                warn!(id, error = %err, "audio clip rejected");
            }
        }
    }
}

/// The loop. Runs until `Shutdown`, channel disconnect or the frame limit.
fn run_game_loop(
    config: LoopConfig,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    shared: Shared,
    mut audio: Box<dyn AudioBackend + Send>,
    mut renderer: Box<dyn Renderer + Send>,
) -> LoopReport {
    let mut engine = SimulationEngine::new(config.sim);
    let mut script = ScriptPlayer::new(config.script);
    let mut assets = config.assets.map(|(loader, manifest)| SessionAssets {
        loader,
        manifest,
        requested_for: 0,
        pending: Vec::new(),
    });
    let mut music = MusicSync::default();
    let mut report = LoopReport::default();

    let frame = frame_duration(config.fps);
    let mut last_frame = Instant::now();
    let mut next_frame = last_frame;
    info!(fps = config.fps, "game loop started");

    'frames: loop {
        // 1. Drain host commands, then anything the script has due
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::Player(command)) => {
                    if let PlayerCommand::Resize { width, height } = command {
                        renderer.resize(width, height);
                    }
                    engine.queue_command(command);
                }
                Ok(GameLoopCommand::Shutdown) => break 'frames,
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => break 'frames,
            }
        }
        engine.queue_commands(script.due(report.frames));

        // 2. Tick with the measured frame time
        let now = Instant::now();
        let dt = (now - last_frame).as_secs_f32().min(MAX_FRAME_DT);
        last_frame = now;
        let snapshot = engine.tick(dt);
        shared
            .generation
            .store(engine.session_generation(), Ordering::Release);

        // 3. Present
        if let Some(assets) = assets.as_mut() {
            assets.poll(engine.session_generation(), audio.as_mut());
        }
        report.sounds_played += play_all(audio.as_mut(), &snapshot.sound_requests);
        music.apply(audio.as_mut(), snapshot.audio);
        renderer.render(&snapshot.renderables, &snapshot.camera);
        for alert in &snapshot.alerts {
            debug!(level = ?alert.level, message = %alert.message, "alert");
        }

        // 4. Publish for polling
        if let Ok(mut lock) = shared.latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        report.frames += 1;
        if config.max_frames.is_some_and(|max| report.frames >= max) {
            break;
        }

        // 5. Sleep until the next frame
        if let Some(frame) = frame {
            next_frame += frame;
            let now = Instant::now();
            if next_frame > now {
                std::thread::sleep(next_frame - now);
            } else if now - next_frame > frame * 2 {
                // Too far behind; don't try to catch up
                next_frame = now;
            }
        }
    }

    renderer.release_resources();
    report.final_snapshot = shared.latest_snapshot.lock().ok().and_then(|s| s.clone());
    info!(frames = report.frames, "game loop stopped");
    report
}
