//! Wanted-level state machine for TUMULT.
//!
//! Observes the player's wanted level, schedules decay and edge-triggers
//! pursuit start/end. It never grants wanted level itself.

pub mod fsm;
pub mod pursuit;

pub use tumult_core as core;
pub use fsm::{PursuitEdge, WantedSystem, WantedUpdate};
