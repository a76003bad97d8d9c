//! TUMULT host application.
//!
//! Wires the headless simulation to the outside world: a frame-paced game
//! loop thread, the command channel feeding it, and the asset, audio and
//! renderer boundaries.

pub mod assets;
pub mod audio;
pub mod demo;
pub mod error;
pub mod game_loop;
pub mod render;
pub mod state;

pub use error::AppError;
pub use tumult_core as core;
