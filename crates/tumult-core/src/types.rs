//! Fundamental geometric and simulation types.
//!
//! World space is y-up. Yaw is a rotation about +Y in radians; yaw 0 faces +Z.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use std::f32::consts::{PI, TAU};

/// World-space placement of an entity. Owned exclusively by that entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    /// Heading about +Y (radians).
    pub yaw: f32,
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

/// Opaque handle to a renderable owned by an entity.
///
/// The renderer only ever receives copies; releasing the handle is the
/// owning entity's business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RenderableHandle(pub u32);

impl Transform {
    pub fn new(position: Vec3, yaw: f32) -> Self {
        Self { position, yaw }
    }

    pub fn at(x: f32, y: f32, z: f32) -> Self {
        Self::new(Vec3::new(x, y, z), 0.0)
    }

    /// Unit vector the entity is facing, on the ground plane.
    pub fn forward(&self) -> Vec3 {
        heading_vector(self.yaw)
    }

    /// Transform a point from this entity's local frame into world space.
    pub fn local_to_world(&self, local: Vec3) -> Vec3 {
        let (sin, cos) = self.yaw.sin_cos();
        self.position
            + Vec3::new(
                local.x * cos + local.z * sin,
                local.y,
                -local.x * sin + local.z * cos,
            )
    }

    /// Transform a world-space point into this entity's local frame.
    pub fn world_to_local(&self, world: Vec3) -> Vec3 {
        let d = world - self.position;
        let (sin, cos) = self.yaw.sin_cos();
        Vec3::new(d.x * cos - d.z * sin, d.y, d.x * sin + d.z * cos)
    }

    /// Horizontal (XZ) distance to another point.
    pub fn ground_distance_to(&self, other: Vec3) -> f32 {
        let d = other - self.position;
        (d.x * d.x + d.z * d.z).sqrt()
    }
}

impl SimTime {
    /// Advance by one tick of `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        self.tick += 1;
        self.elapsed_secs += dt as f64;
    }
}

/// Ground-plane unit vector for a yaw angle (yaw 0 = +Z).
pub fn heading_vector(yaw: f32) -> Vec3 {
    let (sin, cos) = yaw.sin_cos();
    Vec3::new(sin, 0.0, cos)
}

/// Yaw of a ground-plane direction (inverse of [`heading_vector`]).
pub fn heading_of(direction: Vec3) -> f32 {
    direction.x.atan2(direction.z)
}

/// Wrap an angle into `[-PI, PI)`.
pub fn wrap_angle(angle: f32) -> f32 {
    (angle + PI).rem_euclid(TAU) - PI
}
