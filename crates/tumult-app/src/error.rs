//! Host-level errors. The simulation itself never fails; these cover the
//! process around it.

use thiserror::Error;

use tumult_core::config::ConfigError;

use crate::assets::AssetError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Assets(#[from] AssetError),
    #[error("failed to spawn the game loop thread: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("the game loop is already running")]
    AlreadyRunning,
    #[error("the game loop is not running")]
    LoopClosed,
    #[error("the game loop thread panicked")]
    LoopPanicked,
    #[error("shared state lock poisoned")]
    Poisoned,
    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),
}
