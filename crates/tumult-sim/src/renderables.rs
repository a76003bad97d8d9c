//! Renderable descriptors.
//!
//! The simulation never talks to a graphics API. Each drawable entity is
//! spawned with a [`RenderableDescriptor`]: a list of primitive parts in the
//! entity's local frame that the host's renderer turns into meshes once, and
//! that the collision layer reads footprints from.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use tumult_core::enums::{DestructibleKind, VehicleKind};
use tumult_core::types::RenderableHandle;

/// Axis a cylinder's height runs along, in the part's local frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CylinderAxis {
    #[default]
    Y,
    /// Lying on its side, e.g. a wheel.
    X,
}

/// Primitive shape of one part.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape")]
pub enum MeshShape {
    Box {
        size: Vec3,
    },
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        axis: CylinderAxis,
    },
    /// Ring lying flat in the XZ plane.
    Torus {
        radius: f32,
        tube: f32,
    },
    Plane {
        width: f32,
        depth: f32,
    },
    Grid {
        size: f32,
        divisions: u32,
    },
}

/// One primitive placed in the owning entity's frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeshPart {
    pub shape: MeshShape,
    /// Centre of the part relative to the entity origin.
    pub offset: Vec3,
    /// Extra rotation about +Y relative to the entity.
    pub yaw: f32,
    /// 0xRRGGBB.
    pub color: u32,
}

/// Everything a renderer needs to build an entity's meshes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderableDescriptor {
    pub parts: Vec<MeshPart>,
    /// Point size of debris particles, for props that shatter.
    pub particle_size: Option<f32>,
}

/// Horizontal footprint of a part, in the owning entity's frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Footprint {
    /// Oriented rectangle.
    Rect { center: Vec2, half: Vec2, yaw: f32 },
    Circle { center: Vec2, radius: f32 },
}

/// Local-frame axis aligned bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

/// Component attaching a descriptor to an entity.
#[derive(Debug, Clone)]
pub struct Renderable {
    pub handle: RenderableHandle,
    pub descriptor: RenderableDescriptor,
}

/// Hands out unique renderable handles.
#[derive(Debug, Clone, Default)]
pub struct HandleAllocator {
    next: u32,
}

impl HandleAllocator {
    pub fn allocate(&mut self) -> RenderableHandle {
        let handle = RenderableHandle(self.next);
        self.next += 1;
        handle
    }
}

impl MeshShape {
    /// Half extents of the shape's bounding box in its own frame.
    pub fn half_extents(&self) -> Vec3 {
        match *self {
            MeshShape::Box { size } => size * 0.5,
            MeshShape::Cylinder {
                radius_top,
                radius_bottom,
                height,
                axis,
            } => {
                let r = radius_top.max(radius_bottom);
                match axis {
                    CylinderAxis::Y => Vec3::new(r, height * 0.5, r),
                    CylinderAxis::X => Vec3::new(height * 0.5, r, r),
                }
            }
            MeshShape::Torus { radius, tube } => {
                Vec3::new(radius + tube, tube, radius + tube)
            }
            MeshShape::Plane { width, depth } => Vec3::new(width * 0.5, 0.0, depth * 0.5),
            MeshShape::Grid { size, .. } => Vec3::new(size * 0.5, 0.0, size * 0.5),
        }
    }

    /// Whether this shape can block movement. Ground planes and grid
    /// overlays never do.
    pub fn is_solid(&self) -> bool {
        matches!(
            self,
            MeshShape::Box { .. } | MeshShape::Cylinder { .. } | MeshShape::Torus { .. }
        )
    }
}

impl MeshPart {
    fn new(shape: MeshShape, offset: Vec3, color: u32) -> Self {
        Self {
            shape,
            offset,
            yaw: 0.0,
            color,
        }
    }

    /// Vertical extent `(bottom, top)` relative to the entity origin.
    pub fn vertical_span(&self) -> (f32, f32) {
        let h = self.shape.half_extents().y;
        (self.offset.y - h, self.offset.y + h)
    }

    /// Ground-plane footprint, if the part is solid.
    pub fn footprint(&self) -> Option<Footprint> {
        if !self.shape.is_solid() {
            return None;
        }
        let center = Vec2::new(self.offset.x, self.offset.z);
        Some(match self.shape {
            MeshShape::Cylinder {
                axis: CylinderAxis::Y,
                ..
            }
            | MeshShape::Torus { .. } => Footprint::Circle {
                center,
                radius: self.shape.half_extents().x,
            },
            _ => {
                let half = self.shape.half_extents();
                Footprint::Rect {
                    center,
                    half: Vec2::new(half.x, half.z),
                    yaw: self.yaw,
                }
            }
        })
    }
}

impl RenderableDescriptor {
    fn from_parts(parts: Vec<MeshPart>) -> Self {
        Self {
            parts,
            particle_size: None,
        }
    }

    /// Bounding box of all parts, ignoring per-part yaw beyond a
    /// conservative square extent.
    pub fn bounds(&self) -> Bounds {
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        for part in &self.parts {
            let mut half = part.shape.half_extents();
            if part.yaw != 0.0 {
                let r = half.x.max(half.z);
                half = Vec3::new(r, half.y, r);
            }
            min = min.min(part.offset - half);
            max = max.max(part.offset + half);
        }
        if self.parts.is_empty() {
            return Bounds {
                min: Vec3::ZERO,
                max: Vec3::ZERO,
            };
        }
        Bounds { min, max }
    }

    /// Footprints of the solid parts whose vertical span overlaps
    /// `[0, body_height]` above the entity origin.
    pub fn footprints(&self, body_height: f32) -> Vec<Footprint> {
        self.parts
            .iter()
            .filter(|part| {
                let (bottom, top) = part.vertical_span();
                bottom < body_height && top > 0.0
            })
            .filter_map(MeshPart::footprint)
            .collect()
    }
}

const WOOD: u32 = 0x8b_45_13;
const SIENNA: u32 = 0xa0_52_2d;
const DARK_WOOD: u32 = 0x65_43_21;

/// Descriptor for a destructible prop.
pub fn destructible(kind: DestructibleKind) -> RenderableDescriptor {
    let cylinder = |radius_top, radius_bottom, height| MeshShape::Cylinder {
        radius_top,
        radius_bottom,
        height,
        axis: CylinderAxis::Y,
    };
    let parts = match kind {
        DestructibleKind::Barrel => {
            let band = MeshShape::Torus {
                radius: 0.41,
                tube: 0.05,
            };
            vec![
                MeshPart::new(cylinder(0.4, 0.4, 1.0), Vec3::new(0.0, 0.5, 0.0), WOOD),
                MeshPart::new(band, Vec3::new(0.0, 0.8, 0.0), 0x4a_35_20),
                MeshPart::new(band, Vec3::new(0.0, 0.2, 0.0), 0x4a_35_20),
            ]
        }
        DestructibleKind::Stall => vec![
            MeshPart::new(
                MeshShape::Box {
                    size: Vec3::new(3.0, 0.1, 2.0),
                },
                Vec3::new(0.0, 0.05, 0.0),
                WOOD,
            ),
            MeshPart::new(
                MeshShape::Box {
                    size: Vec3::new(3.0, 0.6, 0.6),
                },
                Vec3::new(0.0, 0.3, 0.7),
                SIENNA,
            ),
            MeshPart::new(
                MeshShape::Box {
                    size: Vec3::new(3.2, 0.05, 2.2),
                },
                Vec3::new(0.0, 2.0, 0.0),
                0xf5_f5_dc,
            ),
            MeshPart::new(cylinder(0.05, 0.05, 2.0), Vec3::new(-1.4, 1.0, -0.9), WOOD),
            MeshPart::new(cylinder(0.05, 0.05, 2.0), Vec3::new(1.4, 1.0, -0.9), WOOD),
        ],
        DestructibleKind::Crate => vec![MeshPart::new(
            MeshShape::Box {
                size: Vec3::splat(0.8),
            },
            Vec3::new(0.0, 0.4, 0.0),
            SIENNA,
        )],
        DestructibleKind::Pot => vec![MeshPart::new(
            cylinder(0.2, 0.3, 0.6),
            Vec3::new(0.0, 0.3, 0.0),
            0xcd_85_3f,
        )],
        DestructibleKind::Fence => {
            let post = MeshShape::Box {
                size: Vec3::new(0.1, 1.0, 0.1),
            };
            let plank = MeshShape::Box {
                size: Vec3::new(2.0, 0.15, 0.05),
            };
            vec![
                MeshPart::new(post, Vec3::new(-1.0, 0.5, 0.0), WOOD),
                MeshPart::new(post, Vec3::new(1.0, 0.5, 0.0), WOOD),
                MeshPart::new(plank, Vec3::new(0.0, 0.8, 0.0), SIENNA),
                MeshPart::new(plank, Vec3::new(0.0, 0.5, 0.0), SIENNA),
                MeshPart::new(plank, Vec3::new(0.0, 0.2, 0.0), SIENNA),
            ]
        }
    };
    RenderableDescriptor {
        parts,
        particle_size: Some(if kind == DestructibleKind::Stall {
            0.2
        } else {
            0.05
        }),
    }
}

/// Descriptor for a vehicle. The front of every vehicle is local +Z.
pub fn vehicle(kind: VehicleKind) -> RenderableDescriptor {
    let wheel = |radius| MeshShape::Cylinder {
        radius_top: radius,
        radius_bottom: radius,
        height: 0.3,
        axis: CylinderAxis::X,
    };
    let mut parts = Vec::new();
    match kind {
        VehicleKind::Chariot => {
            parts.push(MeshPart::new(
                MeshShape::Box {
                    size: Vec3::new(2.0, 0.5, 3.0),
                },
                Vec3::new(0.0, 0.5, 0.0),
                WOOD,
            ));
            parts.push(MeshPart::new(
                MeshShape::Box {
                    size: Vec3::new(1.8, 0.4, 0.2),
                },
                Vec3::new(0.0, 1.0, 1.4),
                0xb8_86_0b,
            ));
            for x in [-1.2, 1.2] {
                parts.push(MeshPart::new(wheel(0.6), Vec3::new(x, 0.6, 0.0), DARK_WOOD));
            }
        }
        VehicleKind::Cart => {
            parts.push(MeshPart::new(
                MeshShape::Box {
                    size: Vec3::new(2.2, 0.6, 4.0),
                },
                Vec3::new(0.0, 0.7, 0.0),
                WOOD,
            ));
            parts.push(MeshPart::new(
                MeshShape::Box {
                    size: Vec3::new(2.0, 1.0, 3.0),
                },
                Vec3::new(0.0, 1.5, -0.2),
                SIENNA,
            ));
            for z in [1.2, -1.2] {
                for x in [-1.4, 1.4] {
                    parts.push(MeshPart::new(wheel(0.8), Vec3::new(x, 0.8, z), DARK_WOOD));
                }
            }
        }
    }
    RenderableDescriptor::from_parts(parts)
}

/// The player's body: a capsule-ish cylinder standing on the origin.
pub fn player() -> RenderableDescriptor {
    RenderableDescriptor::from_parts(vec![MeshPart::new(
        MeshShape::Cylinder {
            radius_top: 0.5,
            radius_bottom: 0.5,
            height: 1.8,
            axis: CylinderAxis::Y,
        },
        Vec3::new(0.0, 0.9, 0.0),
        0xf5_d2_64,
    )])
}

/// A plain box building resting on the ground.
pub fn building(width: f32, height: f32, depth: f32) -> RenderableDescriptor {
    RenderableDescriptor::from_parts(vec![MeshPart::new(
        MeshShape::Box {
            size: Vec3::new(width, height, depth),
        },
        Vec3::new(0.0, height * 0.5, 0.0),
        0xe8_d8_c0,
    )])
}

pub fn ground(size: f32) -> RenderableDescriptor {
    RenderableDescriptor::from_parts(vec![MeshPart::new(
        MeshShape::Plane {
            width: size,
            depth: size,
        },
        Vec3::ZERO,
        0x91_81_4d,
    )])
}

pub fn grid(size: f32, divisions: u32) -> RenderableDescriptor {
    RenderableDescriptor::from_parts(vec![MeshPart::new(
        MeshShape::Grid { size, divisions },
        Vec3::new(0.0, 0.01, 0.0),
        0x00_00_00,
    )])
}
