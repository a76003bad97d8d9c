//! Broad-phase spatial index and ray queries against obstacle footprints.
//!
//! Obstacles are flattened to ground-plane footprints (oriented rectangles
//! and circles) and bucketed into a uniform hash grid. Rays are horizontal,
//! so only the footprint matters once a part is known to overlap the body
//! column.
//!
//! Only entering hits count: a ray starting inside a footprint does not hit
//! it, which lets an overlapping body walk back out.

use std::collections::HashMap;

use glam::{Vec2, Vec3};

use tumult_core::types::Transform;

use crate::renderables::{Footprint, RenderableDescriptor};

/// What kind of thing an obstacle is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleKind {
    Building,
    Vehicle,
    Prop,
}

/// Component: the blocking footprints of an entity, in its local frame.
#[derive(Debug, Clone)]
pub struct Collider {
    pub kind: ObstacleKind,
    pub footprints: Vec<Footprint>,
}

impl Collider {
    /// Derive a collider from a descriptor's solid parts that reach into the
    /// body column.
    pub fn from_descriptor(
        kind: ObstacleKind,
        descriptor: &RenderableDescriptor,
        body_height: f32,
    ) -> Self {
        Self {
            kind,
            footprints: descriptor.footprints(body_height),
        }
    }
}

/// An indexed obstacle with world-space footprints.
#[derive(Debug, Clone)]
pub struct Collidable {
    pub entity: hecs::Entity,
    pub kind: ObstacleKind,
    /// Origin of the owning entity.
    pub origin: Vec3,
    /// Radius around `origin` that contains every footprint.
    pub reach: f32,
    footprints: Vec<Footprint>,
}

/// Uniform hash grid over the XZ plane.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    cell_size: f32,
    cells: HashMap<(i32, i32), Vec<usize>>,
    entries: Vec<Collidable>,
}

impl SpatialIndex {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size: cell_size.max(f32::EPSILON),
            cells: HashMap::new(),
            entries: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.cells.clear();
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index an entity's collider at its current transform.
    pub fn insert(&mut self, entity: hecs::Entity, transform: &Transform, collider: &Collider) {
        if collider.footprints.is_empty() {
            return;
        }
        let footprints: Vec<Footprint> = collider
            .footprints
            .iter()
            .map(|fp| to_world(fp, transform))
            .collect();
        let origin2 = ground(transform.position);
        let reach = footprints
            .iter()
            .map(|fp| match *fp {
                Footprint::Rect { center, half, .. } => (center - origin2).length() + half.length(),
                Footprint::Circle { center, radius } => (center - origin2).length() + radius,
            })
            .fold(0.0_f32, f32::max);

        let index = self.entries.len();
        self.entries.push(Collidable {
            entity,
            kind: collider.kind,
            origin: transform.position,
            reach,
            footprints,
        });

        let (min, max) = self.cell_range(origin2, reach);
        for cx in min.0..=max.0 {
            for cz in min.1..=max.1 {
                self.cells.entry((cx, cz)).or_default().push(index);
            }
        }
    }

    /// Obstacles whose reach overlaps a circle around `position`, in
    /// insertion order.
    pub fn nearby(&self, position: Vec3, radius: f32) -> Vec<&Collidable> {
        let center = ground(position);
        let (min, max) = self.cell_range(center, radius);
        let mut indices = Vec::new();
        for cx in min.0..=max.0 {
            for cz in min.1..=max.1 {
                if let Some(bucket) = self.cells.get(&(cx, cz)) {
                    indices.extend_from_slice(bucket);
                }
            }
        }
        indices.sort_unstable();
        indices.dedup();
        indices
            .into_iter()
            .map(|i| &self.entries[i])
            .filter(|c| (ground(c.origin) - center).length() <= radius + c.reach)
            .collect()
    }

    /// Distance to the first obstacle entered by a horizontal ray, if any
    /// within `max_distance`.
    pub fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        exclude: Option<hecs::Entity>,
    ) -> Option<f32> {
        let dir = ground(direction);
        if dir.length_squared() <= f32::EPSILON || max_distance <= 0.0 {
            return None;
        }
        let dir = dir.normalize();
        let start = ground(origin);

        self.nearby(origin, max_distance)
            .into_iter()
            .filter(|c| Some(c.entity) != exclude)
            .flat_map(|c| c.footprints.iter())
            .filter_map(|fp| match *fp {
                Footprint::Rect { center, half, yaw } => ray_rect(start, dir, center, half, yaw),
                Footprint::Circle { center, radius } => ray_circle(start, dir, center, radius),
            })
            .filter(|t| *t <= max_distance)
            .min_by(f32::total_cmp)
    }

    /// Obstacle whose origin is closest to `position`.
    pub fn nearest(&self, position: Vec3, exclude: Option<hecs::Entity>) -> Option<&Collidable> {
        let p = ground(position);
        self.entries
            .iter()
            .filter(|c| Some(c.entity) != exclude)
            .min_by(|a, b| {
                let da = (ground(a.origin) - p).length_squared();
                let db = (ground(b.origin) - p).length_squared();
                da.total_cmp(&db)
            })
    }

    fn cell_of(&self, p: Vec2) -> (i32, i32) {
        (
            (p.x / self.cell_size).floor() as i32,
            (p.y / self.cell_size).floor() as i32,
        )
    }

    fn cell_range(&self, center: Vec2, radius: f32) -> ((i32, i32), (i32, i32)) {
        let r = Vec2::splat(radius.max(0.0));
        (self.cell_of(center - r), self.cell_of(center + r))
    }
}

fn ground(v: Vec3) -> Vec2 {
    Vec2::new(v.x, v.z)
}

/// Rotate a ground-plane vector by `yaw`, matching `Transform::local_to_world`.
fn rotate(v: Vec2, yaw: f32) -> Vec2 {
    let (sin, cos) = yaw.sin_cos();
    Vec2::new(v.x * cos + v.y * sin, -v.x * sin + v.y * cos)
}

fn to_world(footprint: &Footprint, transform: &Transform) -> Footprint {
    let origin = ground(transform.position);
    match *footprint {
        Footprint::Rect { center, half, yaw } => Footprint::Rect {
            center: origin + rotate(center, transform.yaw),
            half,
            yaw: yaw + transform.yaw,
        },
        Footprint::Circle { center, radius } => Footprint::Circle {
            center: origin + rotate(center, transform.yaw),
            radius,
        },
    }
}

/// Slab test against an oriented rectangle. Returns the entry distance.
fn ray_rect(origin: Vec2, dir: Vec2, center: Vec2, half: Vec2, yaw: f32) -> Option<f32> {
    let o = rotate(origin - center, -yaw);
    let d = rotate(dir, -yaw);

    let mut t_min = f32::NEG_INFINITY;
    let mut t_max = f32::INFINITY;
    for (o, d, h) in [(o.x, d.x, half.x), (o.y, d.y, half.y)] {
        if d.abs() < 1e-8 {
            if o < -h || o > h {
                return None;
            }
            continue;
        }
        let inv = 1.0 / d;
        let mut t1 = (-h - o) * inv;
        let mut t2 = (h - o) * inv;
        if t1 > t2 {
            std::mem::swap(&mut t1, &mut t2);
        }
        t_min = t_min.max(t1);
        t_max = t_max.min(t2);
        if t_min > t_max {
            return None;
        }
    }

    (t_min >= 0.0).then_some(t_min)
}

/// Entry distance into a circle, ignoring rays that start inside it.
fn ray_circle(origin: Vec2, dir: Vec2, center: Vec2, radius: f32) -> Option<f32> {
    let m = origin - center;
    let c = m.length_squared() - radius * radius;
    if c < 0.0 {
        return None;
    }
    let b = m.dot(dir);
    if b > 0.0 {
        return None;
    }
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    Some((-b - disc.sqrt()).max(0.0))
}
