//! Core types and definitions for the TUMULT simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! geometry, commands, intents, events, state snapshots, tuning and constants.
//! It has no dependency on the ECS, the host loop or any presentation layer.

pub mod commands;
pub mod config;
pub mod constants;
pub mod enums;
pub mod events;
pub mod state;
pub mod types;
