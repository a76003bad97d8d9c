//! Destructible props: damage, destruction, and the debris they leave.

use glam::Vec3;
use rand::Rng;
use tracing::debug;

use tumult_core::constants::*;
use tumult_core::enums::DestructibleKind;
use tumult_core::types::{RenderableHandle, Transform};

use super::{Entity, Visual};
use crate::renderables::Bounds;

/// Base stats of a prop variety.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DestructibleStats {
    pub max_health: i32,
    pub score_value: u32,
    /// Attention drawn by destroying it.
    pub wanted_delta: f32,
    pub particle_size: f32,
}

impl DestructibleStats {
    pub fn for_kind(kind: DestructibleKind) -> Self {
        let (max_health, score_value, wanted_delta) = match kind {
            DestructibleKind::Barrel => (50, 10, DEFAULT_WANTED_DELTA),
            DestructibleKind::Stall => (120, 50, STALL_WANTED_DELTA),
            DestructibleKind::Crate => (30, 5, DEFAULT_WANTED_DELTA),
            DestructibleKind::Pot => (10, 2, DEFAULT_WANTED_DELTA),
            DestructibleKind::Fence => (80, 15, DEFAULT_WANTED_DELTA),
        };
        Self {
            max_health,
            score_value,
            wanted_delta,
            particle_size: if kind == DestructibleKind::Stall {
                0.2
            } else {
                0.05
            },
        }
    }
}

/// Particle batch left behind by a destroyed prop. Positions are in the
/// prop's local frame.
#[derive(Debug, Clone)]
pub struct Debris {
    pub positions: Vec<Vec3>,
    velocities: Vec<Vec3>,
    pub particle_size: f32,
}

impl Debris {
    /// Scatter `count` particles inside `bounds` with upward-biased
    /// velocities.
    pub fn spawn(rng: &mut impl Rng, bounds: Bounds, count: usize, particle_size: f32) -> Self {
        let size = bounds.max - bounds.min;
        let mut positions = Vec::with_capacity(count);
        let mut velocities = Vec::with_capacity(count);
        for _ in 0..count {
            positions.push(
                bounds.min
                    + Vec3::new(
                        rng.gen::<f32>() * size.x,
                        rng.gen::<f32>() * size.y,
                        rng.gen::<f32>() * size.z,
                    ),
            );
            velocities.push(Vec3::new(
                (rng.gen::<f32>() - 0.5) * 2.0 * DEBRIS_MAX_SIDE_SPEED,
                rng.gen::<f32>() * DEBRIS_MAX_UP_SPEED,
                (rng.gen::<f32>() - 0.5) * 2.0 * DEBRIS_MAX_SIDE_SPEED,
            ));
        }
        Self {
            positions,
            velocities,
            particle_size,
        }
    }

    /// Integrate one step. Returns `true` once every particle has fallen
    /// below the release floor.
    pub fn step(&mut self, dt: f32) -> bool {
        for (position, velocity) in self.positions.iter_mut().zip(&mut self.velocities) {
            velocity.y -= GRAVITY * dt;
            *position += *velocity * dt;
        }
        self.positions.iter().all(|p| p.y < DEBRIS_FLOOR)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// A prop that can be smashed once.
#[derive(Debug, Clone)]
pub struct Destructible {
    pub kind: DestructibleKind,
    stats: DestructibleStats,
    health: i32,
    destroyed: bool,
    /// Uniform scale feedback, shrinking as health drops.
    feedback_scale: f32,
    bounds: Bounds,
    debris: Option<Debris>,
    handle: RenderableHandle,
}

impl Destructible {
    pub fn new(kind: DestructibleKind, handle: RenderableHandle, bounds: Bounds) -> Self {
        let stats = DestructibleStats::for_kind(kind);
        Self {
            kind,
            stats,
            health: stats.max_health,
            destroyed: false,
            feedback_scale: 1.0,
            bounds,
            debris: None,
            handle,
        }
    }

    /// Apply a hit. Returns the score value on the lethal hit and 0
    /// otherwise, including every hit after destruction.
    pub fn damage(&mut self, amount: i32, rng: &mut impl Rng) -> u32 {
        if self.destroyed {
            return 0;
        }
        self.health -= amount.max(0);
        let ratio = self.health.max(0) as f32 / self.stats.max_health as f32;
        self.feedback_scale = 0.9 + 0.1 * ratio;

        if self.health <= 0 {
            self.destroy(rng);
            return self.stats.score_value;
        }
        0
    }

    fn destroy(&mut self, rng: &mut impl Rng) {
        self.destroyed = true;
        let count = rng.gen_range(DEBRIS_MIN_PARTICLES..DEBRIS_MAX_PARTICLES);
        self.debris = Some(Debris::spawn(
            rng,
            self.bounds,
            count,
            self.stats.particle_size,
        ));
        debug!(kind = ?self.kind, particles = count, "prop destroyed");
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn max_health(&self) -> i32 {
        self.stats.max_health
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn score_value(&self) -> u32 {
        self.stats.score_value
    }

    pub fn wanted_delta(&self) -> f32 {
        self.stats.wanted_delta
    }

    pub fn debris(&self) -> Option<&Debris> {
        self.debris.as_ref()
    }
}

impl Entity for Destructible {
    fn update(&mut self, _transform: &mut Transform, dt: f32) {
        let released = match self.debris.as_mut() {
            Some(debris) => debris.step(dt),
            None => return,
        };
        if released {
            self.debris = None;
            debug!(kind = ?self.kind, "debris released");
        }
    }

    fn renderable(&self) -> RenderableHandle {
        self.handle
    }

    fn visual(&self) -> Visual {
        Visual {
            visible: !self.destroyed,
            scale: self.feedback_scale,
        }
    }
}
