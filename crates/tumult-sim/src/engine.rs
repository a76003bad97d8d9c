//! Simulation engine: the core of the game.
//!
//! `SimulationEngine` owns the hecs ECS world, processes queued commands,
//! runs every system in a fixed order and produces `GameStateSnapshot`s.
//! Completely headless, so whole sessions can be driven from tests.

use std::collections::VecDeque;

use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, trace};

use tumult_core::commands::PlayerCommand;
use tumult_core::config::Tuning;
use tumult_core::constants::{MAX_FRAME_DT, SPATIAL_CELL_SIZE};
use tumult_core::enums::{InputAction, SessionPhase};
use tumult_core::state::GameStateSnapshot;
use tumult_core::types::{SimTime, Transform};
use tumult_wanted::pursuit::{PursuitHook, StubPursuit};
use tumult_wanted::WantedSystem;

use crate::entities::Player;
use crate::renderables::HandleAllocator;
use crate::sound::SoundSystem;
use crate::spatial::SpatialIndex;
use crate::systems;
use crate::systems::environment::CameraRig;
use crate::systems::snapshot::SnapshotContext;
use crate::systems::TickOutput;
use crate::world_setup;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed and inputs, same session.
    pub seed: u64,
    /// Initial time scale (1.0 = normal).
    pub time_scale: f32,
    pub tuning: Tuning,
    /// Spawn a player. Without one the wanted and sound subsystems stay
    /// absent.
    pub spawn_player: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            time_scale: 1.0,
            tuning: Tuning::default(),
            spawn_player: true,
        }
    }
}

/// The simulation engine. Owns the ECS world and all session state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    phase: SessionPhase,
    time_scale: f32,
    seed: u64,
    rng: ChaCha8Rng,
    tuning: Tuning,
    spawn_player: bool,
    command_queue: VecDeque<PlayerCommand>,
    handles: HandleAllocator,
    index: SpatialIndex,
    player: Option<hecs::Entity>,
    wanted: Option<WantedSystem>,
    pursuit: Box<dyn PursuitHook + Send>,
    sound: Option<SoundSystem>,
    camera: CameraRig,
    /// Bumped on every session start; lets the host drop stale async work.
    session_generation: u64,
    /// Outputs produced between ticks (e.g. by direct damage calls).
    pending: TickOutput,
}

impl SimulationEngine {
    pub fn new(config: SimConfig) -> Self {
        Self {
            world: World::new(),
            time: SimTime::default(),
            phase: SessionPhase::default(),
            time_scale: config.time_scale.clamp(0.0, 4.0),
            seed: config.seed,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            tuning: config.tuning,
            spawn_player: config.spawn_player,
            command_queue: VecDeque::new(),
            handles: HandleAllocator::default(),
            index: SpatialIndex::new(SPATIAL_CELL_SIZE),
            player: None,
            wanted: None,
            pursuit: Box::new(StubPursuit::default()),
            sound: None,
            camera: CameraRig::default(),
            session_generation: 0,
            pending: TickOutput::default(),
        }
    }

    /// Replace the pursuit side-effect hook.
    pub fn with_pursuit_hook(mut self, hook: Box<dyn PursuitHook + Send>) -> Self {
        self.pursuit = hook;
        self
    }

    /// Queue a command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by `dt` seconds of wall time and return the
    /// resulting snapshot.
    pub fn tick(&mut self, dt: f32) -> GameStateSnapshot {
        self.process_commands();

        let mut out = std::mem::take(&mut self.pending);
        out.tick = self.time.tick;

        if self.phase == SessionPhase::Running {
            let dt = dt.clamp(0.0, MAX_FRAME_DT) * self.time_scale;
            if dt > 0.0 {
                self.run_systems(dt, &mut out);
            }
            self.time.advance(dt);
        }

        let sounds = std::mem::take(&mut out.sounds);
        out.sounds = match self.sound.as_mut() {
            Some(sound) => {
                for request in sounds {
                    sound.request(request);
                }
                sound.drain()
            }
            None => Vec::new(),
        };

        let ctx = SnapshotContext {
            time: self.time,
            phase: self.phase,
            player: self.player,
            camera: self.camera.view(),
            lighting: systems::environment::lighting(
                self.time.elapsed_secs,
                self.tuning.world.day_duration_secs,
            ),
            pursuit: self
                .wanted
                .as_ref()
                .map(systems::wanted::view)
                .unwrap_or_default(),
            audio: self.sound.as_ref().map(SoundSystem::view),
        };
        systems::snapshot::build_snapshot(&self.world, ctx, out)
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn player(&self) -> Option<hecs::Entity> {
        self.player
    }

    pub fn wanted(&self) -> Option<&WantedSystem> {
        self.wanted.as_ref()
    }

    pub fn sound(&self) -> Option<&SoundSystem> {
        self.sound.as_ref()
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn session_generation(&self) -> u64 {
        self.session_generation
    }

    /// Damage a vehicle outside of player intents. Effects show up in the
    /// next snapshot.
    pub fn damage_vehicle(&mut self, vehicle: hecs::Entity, amount: i32) {
        systems::dispatch::apply_vehicle_damage(&mut self.world, vehicle, amount, &mut self.pending);
    }

    pub fn damage_player(&mut self, amount: i32) {
        if let Some(mut player) = self.player_mut() {
            player.damage(amount);
        }
    }

    pub fn heal_player(&mut self, amount: i32) {
        if let Some(mut player) = self.player_mut() {
            player.heal(amount);
        }
    }

    fn player_mut(&mut self) -> Option<hecs::RefMut<'_, Player>> {
        let entity = self.player?;
        self.world.get::<&mut Player>(entity).ok()
    }

    #[cfg(test)]
    pub(crate) fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::KeyDown {
                action: InputAction::Mute,
            } => {
                if let Some(sound) = self.sound.as_mut() {
                    sound.toggle_mute();
                }
            }
            PlayerCommand::KeyDown { action } => {
                if let Some(mut player) = self.player_mut() {
                    player.key_down(action);
                }
            }
            PlayerCommand::KeyUp { action } => {
                if let Some(mut player) = self.player_mut() {
                    player.key_up(action);
                }
            }
            PlayerCommand::StartSession => {
                if self.phase == SessionPhase::Idle {
                    self.start_session();
                }
            }
            PlayerCommand::Reset => {
                if self.phase != SessionPhase::Idle {
                    info!(generation = self.session_generation, "resetting session");
                    self.start_session();
                }
            }
            PlayerCommand::Pause => {
                if self.phase == SessionPhase::Running {
                    self.phase = SessionPhase::Paused;
                    if let Some(sound) = self.sound.as_mut() {
                        sound.stop_music();
                    }
                }
            }
            PlayerCommand::Resume => {
                if self.phase == SessionPhase::Paused {
                    self.phase = SessionPhase::Running;
                    if let Some(sound) = self.sound.as_mut() {
                        sound.start_music();
                    }
                }
            }
            PlayerCommand::SetTimeScale { scale } => {
                self.time_scale = scale.clamp(0.0, 4.0);
            }
            PlayerCommand::Resize { width, height } => {
                self.camera.resize(width, height);
            }
            PlayerCommand::SetVolume { sfx, music } => {
                if let Some(sound) = self.sound.as_mut() {
                    if let Some(volume) = sfx {
                        sound.set_sfx_volume(volume);
                    }
                    if let Some(volume) = music {
                        sound.set_music_volume(volume);
                    }
                }
            }
        }
    }

    /// Tear down whatever exists and build a fresh world from the seed.
    fn start_session(&mut self) {
        self.world.clear();
        self.index.clear();
        self.handles = HandleAllocator::default();
        self.rng = ChaCha8Rng::seed_from_u64(self.seed);
        self.time = SimTime::default();
        self.pending = TickOutput::default();
        self.session_generation += 1;

        self.player = world_setup::setup_session(
            &mut self.world,
            &mut self.rng,
            &mut self.handles,
            &self.tuning,
            self.spawn_player,
        );
        self.wanted = self
            .player
            .map(|_| WantedSystem::new(self.tuning.wanted, 0));
        // Volume settings survive a reset; mute does not.
        let volumes = self.sound.as_ref().map(SoundSystem::view);
        self.sound = self.player.map(|_| {
            let mut sound = SoundSystem::default();
            if let Some(previous) = volumes {
                sound.set_sfx_volume(previous.sfx_volume);
                sound.set_music_volume(previous.music_volume);
            }
            sound.start_music();
            sound
        });

        let focus = self
            .player
            .and_then(|p| self.world.get::<&Transform>(p).ok().map(|t| t.position))
            .unwrap_or_default();
        self.camera.snap(focus);

        self.phase = SessionPhase::Running;
        info!(
            generation = self.session_generation,
            player = self.player.is_some(),
            "session started"
        );
    }

    /// Run all systems in order.
    fn run_systems(&mut self, dt: f32, out: &mut TickOutput) {
        // 1. Broad phase
        systems::broad_phase::run(&self.world, &mut self.index);

        if let Some(player) = self.player {
            // 2. Player update
            let intents = systems::player::run(&mut self.world, player, &self.index, dt);
            // 3. Intent dispatch and the entity mutations it causes
            if !intents.is_empty() {
                systems::dispatch::run(&mut self.world, player, intents, &mut self.rng, dt, out);
            }
            // 4. Wanted level decay and pursuit edges
            if let Some(wanted) = self.wanted.as_mut() {
                systems::wanted::run(
                    &mut self.world,
                    player,
                    wanted,
                    self.pursuit.as_mut(),
                    dt,
                    out,
                );
            }
        } else {
            trace!("no player; skipping player, dispatch and wanted systems");
        }

        // 5. Vehicles, debris, seated player
        systems::physics::run(&mut self.world, self.player, dt);

        // 6. Camera follow
        if let Some(position) = self
            .player
            .and_then(|p| self.world.get::<&Transform>(p).ok().map(|t| t.position))
        {
            self.camera.follow(position, dt);
        }
    }
}
