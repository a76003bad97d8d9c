//! `tumult`: runs a headless TUMULT session from the command line.

use std::path::PathBuf;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tumult_app::assets::{default_manifest, AssetLoader};
use tumult_app::audio::LogAudio;
use tumult_app::demo::demo_script;
use tumult_app::game_loop::{spawn_game_loop, LoopConfig};
use tumult_app::render::HeadlessRenderer;
use tumult_app::state::AppState;
use tumult_app::AppError;
use tumult_core::commands::PlayerCommand;
use tumult_core::config::Tuning;
use tumult_core::constants::TARGET_FPS;
use tumult_sim::engine::SimConfig;

#[derive(Parser, Debug)]
#[command(name = "tumult")]
#[command(about = "Run a headless TUMULT market-brawl session", long_about = None)]
struct Args {
    /// RNG seed for the world layout and debris
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Stop after this many frames
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// JSON tuning file; missing fields keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Target frame rate (0 = as fast as possible)
    #[arg(long, default_value_t = TARGET_FPS)]
    fps: u32,

    /// Drive the player with a scripted demo
    #[arg(long)]
    demo: bool,

    /// Build the world without a player
    #[arg(long)]
    headless_world: bool,

    /// Directory holding `sounds/*.mp3`
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Sound effect volume (0.0 - 1.0)
    #[arg(long)]
    sfx_volume: Option<f32>,

    /// Music volume (0.0 - 1.0)
    #[arg(long)]
    music_volume: Option<f32>,

    /// Print the final snapshot as JSON
    #[arg(long)]
    dump: bool,
}

fn main() -> Result<(), AppError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let tuning = match &args.config {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };

    let config = LoopConfig {
        sim: SimConfig {
            seed: args.seed,
            tuning,
            spawn_player: !args.headless_world,
            ..Default::default()
        },
        fps: args.fps,
        max_frames: Some(args.frames),
        script: if args.demo { demo_script() } else { Vec::new() },
        assets: args
            .assets
            .map(|root| (AssetLoader::new(root), default_manifest())),
    };

    let state = AppState::new();
    let handle = spawn_game_loop(
        &state,
        config,
        Box::new(LogAudio::new()),
        Box::new(HeadlessRenderer::new()),
    )?;
    state.send(PlayerCommand::StartSession)?;
    if args.sfx_volume.is_some() || args.music_volume.is_some() {
        state.send(PlayerCommand::SetVolume {
            sfx: args.sfx_volume,
            music: args.music_volume,
        })?;
    }

    let report = handle.join().map_err(|_| AppError::LoopPanicked)?;
    let Some(snapshot) = report.final_snapshot else {
        warn!("the loop stopped before producing a frame");
        return Ok(());
    };

    info!(
        frames = report.frames,
        sounds = report.sounds_played,
        score = snapshot.hud.score,
        wanted = snapshot.hud.wanted_level,
        health = snapshot.hud.health_percent,
        destroyed = snapshot.props.iter().filter(|p| p.destroyed).count(),
        "session finished"
    );
    if args.dump {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    }
    Ok(())
}
