//! Pursuit side effects.
//!
//! Chasers are not simulated; the hook is the seam where they would be
//! spawned, steered and removed.

use tracing::{debug, info};

use crate::fsm::PursuitEdge;

/// Receiver of pursuit transitions and per-tick pursuit updates.
pub trait PursuitHook {
    fn pursuit_started(&mut self, level: u8);
    fn pursuit_ended(&mut self);
    /// Called every tick while a pursuit is active.
    fn pursuit_tick(&mut self, intensity: f32, alert_radius: f32, dt: f32);
}

/// Route an edge to the matching hook method.
pub fn dispatch_edge(hook: &mut dyn PursuitHook, edge: PursuitEdge) {
    match edge {
        PursuitEdge::Started { level } => hook.pursuit_started(level),
        PursuitEdge::Ended => hook.pursuit_ended(),
    }
}

/// Stub pursuit: records how often it was triggered and logs.
#[derive(Debug, Default, Clone)]
pub struct StubPursuit {
    pub starts: u32,
    pub ends: u32,
    /// Seconds spent in the current pursuit.
    pub elapsed_secs: f32,
}

impl PursuitHook for StubPursuit {
    fn pursuit_started(&mut self, level: u8) {
        self.starts += 1;
        self.elapsed_secs = 0.0;
        info!(level, "pursuit started (no chasers spawned)");
    }

    fn pursuit_ended(&mut self) {
        self.ends += 1;
        info!(duration_secs = self.elapsed_secs, "pursuit ended");
    }

    fn pursuit_tick(&mut self, intensity: f32, alert_radius: f32, dt: f32) {
        self.elapsed_secs += dt;
        debug!(intensity, alert_radius, "pursuit tick");
    }
}
