//! State shared between the host thread and the game loop thread.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use tumult_core::commands::PlayerCommand;
use tumult_core::state::GameStateSnapshot;

use crate::error::AppError;

/// Messages from the host to the game loop thread.
#[derive(Debug, Clone)]
pub enum GameLoopCommand {
    /// Forward to the simulation engine.
    Player(PlayerCommand),
    /// Stop the loop after the current frame.
    Shutdown,
}

/// Shared application state.
///
/// `mpsc::Sender` is not `Sync`, so it sits behind a `Mutex`; the latest
/// snapshot and session generation are written by the loop thread. The loop
/// thread clears `command_tx` and `running` when it exits.
pub struct AppState {
    /// `None` unless a loop is running.
    pub command_tx: Arc<Mutex<Option<mpsc::Sender<GameLoopCommand>>>>,
    pub latest_snapshot: Arc<Mutex<Option<GameStateSnapshot>>>,
    /// Session generation the loop last observed.
    pub generation: Arc<AtomicU64>,
    pub running: Arc<AtomicBool>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            command_tx: Arc::new(Mutex::new(None)),
            latest_snapshot: Arc::new(Mutex::new(None)),
            generation: Arc::new(AtomicU64::new(0)),
            running: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Send a command to the running loop.
    pub fn send(&self, command: PlayerCommand) -> Result<(), AppError> {
        self.send_raw(GameLoopCommand::Player(command))
    }

    pub fn shutdown(&self) -> Result<(), AppError> {
        self.send_raw(GameLoopCommand::Shutdown)
    }

    fn send_raw(&self, command: GameLoopCommand) -> Result<(), AppError> {
        let tx = self.command_tx.lock().map_err(|_| AppError::Poisoned)?;
        match tx.as_ref() {
            Some(tx) => tx.send(command).map_err(|_| AppError::LoopClosed),
            None => Err(AppError::LoopClosed),
        }
    }

    /// Copy of the most recent snapshot, if any frame has run.
    pub fn latest(&self) -> Result<Option<GameStateSnapshot>, AppError> {
        let lock = self.latest_snapshot.lock().map_err(|_| AppError::Poisoned)?;
        Ok(lock.clone())
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}
