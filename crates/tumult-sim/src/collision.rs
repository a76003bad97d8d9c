//! Player movement collision: ray tests, axis sliding and push-back.
//!
//! The body is a point at head height casting short horizontal rays. Every
//! candidate, the full step included, needs a clear path ray and the eight
//! probe rays around it clear, so no committed position sits inside probe
//! range of an obstacle.

use glam::Vec3;

use tumult_core::constants::{
    MOVE_RAY_OVERSHOOT, PLAYER_RAY_HEIGHT, PROBE_RADIUS_FACTOR, PUSH_BACK_FACTOR,
    SLIDE_STEP_FRACTIONS,
};

use crate::spatial::SpatialIndex;

const PROBE_DIRECTIONS: [Vec3; 8] = [
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(-1.0, 0.0, 0.0),
    Vec3::new(0.0, 0.0, 1.0),
    Vec3::new(0.0, 0.0, -1.0),
    Vec3::new(
        std::f32::consts::FRAC_1_SQRT_2,
        0.0,
        std::f32::consts::FRAC_1_SQRT_2,
    ),
    Vec3::new(
        -std::f32::consts::FRAC_1_SQRT_2,
        0.0,
        std::f32::consts::FRAC_1_SQRT_2,
    ),
    Vec3::new(
        std::f32::consts::FRAC_1_SQRT_2,
        0.0,
        -std::f32::consts::FRAC_1_SQRT_2,
    ),
    Vec3::new(
        -std::f32::consts::FRAC_1_SQRT_2,
        0.0,
        -std::f32::consts::FRAC_1_SQRT_2,
    ),
];

/// How a movement attempt was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Direct,
    SlideX,
    SlideZ,
    /// A reduced step was taken.
    Partial,
    PushBack,
    Blocked,
}

/// Obstacle queries for one moving body.
#[derive(Debug, Clone, Copy)]
pub struct MoveContext<'a> {
    pub index: &'a SpatialIndex,
    /// Entity whose footprint this body ignores (its own vehicle).
    pub exclude: Option<hecs::Entity>,
    pub radius: f32,
}

impl<'a> MoveContext<'a> {
    pub fn new(index: &'a SpatialIndex, exclude: Option<hecs::Entity>, radius: f32) -> Self {
        Self {
            index,
            exclude,
            radius,
        }
    }

    fn head(at: Vec3) -> Vec3 {
        at + Vec3::new(0.0, PLAYER_RAY_HEIGHT, 0.0)
    }

    /// The path ray toward `to`: length `radius + |to - from| * 1.1`.
    pub fn path_blocked(&self, from: Vec3, to: Vec3) -> bool {
        let displacement = to - from;
        let length = displacement.length();
        if length <= f32::EPSILON {
            return false;
        }
        let max = self.radius + length * MOVE_RAY_OVERSHOOT;
        self.index
            .raycast(Self::head(from), displacement, max, self.exclude)
            .is_some()
    }

    /// Eight short probes (cardinal and diagonal) around `at`.
    pub fn probe_blocked(&self, at: Vec3) -> bool {
        let max = self.radius * PROBE_RADIUS_FACTOR;
        PROBE_DIRECTIONS.iter().any(|dir| {
            self.index
                .raycast(Self::head(at), *dir, max, self.exclude)
                .is_some()
        })
    }

    pub fn is_clear(&self, from: Vec3, to: Vec3) -> bool {
        !self.path_blocked(from, to) && !self.probe_blocked(to)
    }

    /// Resolve a desired displacement into the position to commit.
    pub fn resolve(&self, from: Vec3, displacement: Vec3) -> (Vec3, MoveOutcome) {
        let target = from + displacement;
        if self.is_clear(from, target) {
            return (target, MoveOutcome::Direct);
        }

        let slide_x = from + Vec3::new(displacement.x, 0.0, 0.0);
        if displacement.x != 0.0 && self.is_clear(from, slide_x) {
            return (slide_x, MoveOutcome::SlideX);
        }
        let slide_z = from + Vec3::new(0.0, 0.0, displacement.z);
        if displacement.z != 0.0 && self.is_clear(from, slide_z) {
            return (slide_z, MoveOutcome::SlideZ);
        }

        for fraction in SLIDE_STEP_FRACTIONS {
            let step = displacement * fraction;
            let candidates = [
                from + Vec3::new(step.x, 0.0, 0.0),
                from + Vec3::new(0.0, 0.0, step.z),
                from + Vec3::new(step.x, 0.0, step.z),
            ];
            for candidate in candidates {
                if candidate != from && self.is_clear(from, candidate) {
                    return (candidate, MoveOutcome::Partial);
                }
            }
        }

        if let Some(nearest) = self.index.nearest(from, self.exclude) {
            let away = Vec3::new(from.x - nearest.origin.x, 0.0, from.z - nearest.origin.z);
            if let Some(away) = away.try_normalize() {
                let candidate = from + away * self.radius * PUSH_BACK_FACTOR;
                if self.is_clear(from, candidate) {
                    return (candidate, MoveOutcome::PushBack);
                }
            }
        }

        (from, MoveOutcome::Blocked)
    }
}
