//! Simulation engine for TUMULT.
//!
//! Owns the hecs ECS world, runs the per-frame tick in a fixed system order
//! and produces `GameStateSnapshot`s for the host.

pub mod collision;
pub mod engine;
pub mod entities;
pub mod intents;
pub mod renderables;
pub mod sound;
pub mod spatial;
pub mod systems;
pub mod world_setup;

pub use engine::{SimConfig, SimulationEngine};
pub use tumult_core as core;

#[cfg(test)]
mod tests;
