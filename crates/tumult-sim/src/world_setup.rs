//! Entity spawn factories and the starting layout of a session.
//!
//! Every random choice draws from the session RNG, so a seed fixes the
//! whole layout.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, FRAC_PI_6, PI, TAU};

use glam::Vec3;
use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use tumult_core::config::Tuning;
use tumult_core::constants::{GROUND_SIZE, PLAYER_HEIGHT};
use tumult_core::enums::{DestructibleKind, VehicleKind};
use tumult_core::types::Transform;

use crate::entities::{Destructible, Player, Scenery, Vehicle};
use crate::renderables::{self, HandleAllocator, Renderable};
use crate::spatial::{Collider, ObstacleKind};

/// Buildings stay out of this central square so the market and the spawn
/// point are reachable.
const MARKET_HALF_EXTENT: f32 = 35.0;
const BUILDING_PLACEMENT_ATTEMPTS: usize = 32;
const GRID_DIVISIONS: u32 = 100;

/// Build the starting world. Returns the player entity when one is
/// spawned.
pub fn setup_session(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    handles: &mut HandleAllocator,
    tuning: &Tuning,
    spawn_player_entity: bool,
) -> Option<hecs::Entity> {
    spawn_scenery(world, handles);
    spawn_buildings(world, rng, handles, tuning);
    spawn_vehicles(world, handles, tuning);
    spawn_props(world, rng, handles);

    let player = spawn_player_entity
        .then(|| spawn_player(world, handles, tuning, Transform::default()));
    debug!(entities = world.len(), "session world built");
    player
}

pub fn spawn_scenery(world: &mut World, handles: &mut HandleAllocator) {
    for descriptor in [
        renderables::ground(GROUND_SIZE),
        renderables::grid(GROUND_SIZE, GRID_DIVISIONS),
    ] {
        world.spawn((
            Scenery,
            Transform::default(),
            Renderable {
                handle: handles.allocate(),
                descriptor,
            },
        ));
    }
}

/// Scatter box buildings of random size over the world.
pub fn spawn_buildings(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    handles: &mut HandleAllocator,
    tuning: &Tuning,
) {
    let extent = tuning.world.scatter_half_extent.max(1.0);
    for _ in 0..tuning.world.building_count {
        let width = rng.gen_range(5.0..15.0);
        let depth = rng.gen_range(5.0..15.0);
        let height = rng.gen_range(3.0..15.0);

        let mut position = Vec3::ZERO;
        for _ in 0..BUILDING_PLACEMENT_ATTEMPTS {
            position = Vec3::new(
                rng.gen_range(-extent..extent),
                0.0,
                rng.gen_range(-extent..extent),
            );
            let clear = position.x.abs() > MARKET_HALF_EXTENT + width * 0.5
                || position.z.abs() > MARKET_HALF_EXTENT + depth * 0.5;
            if clear {
                break;
            }
        }
        spawn_building(world, handles, Transform::new(position, 0.0), width, height, depth);
    }
}

pub fn spawn_building(
    world: &mut World,
    handles: &mut HandleAllocator,
    transform: Transform,
    width: f32,
    height: f32,
    depth: f32,
) -> hecs::Entity {
    let descriptor = renderables::building(width, height, depth);
    let collider = Collider::from_descriptor(ObstacleKind::Building, &descriptor, PLAYER_HEIGHT);
    world.spawn((
        Scenery,
        transform,
        collider,
        Renderable {
            handle: handles.allocate(),
            descriptor,
        },
    ))
}

pub fn spawn_vehicles(world: &mut World, handles: &mut HandleAllocator, tuning: &Tuning) {
    let layout = [
        (VehicleKind::Chariot, Vec3::new(5.0, 0.0, 5.0), FRAC_PI_4),
        (VehicleKind::Cart, Vec3::new(-15.0, 0.0, 20.0), -FRAC_PI_6),
        (VehicleKind::Chariot, Vec3::new(30.0, 0.0, -10.0), PI),
    ];
    for (kind, position, yaw) in layout {
        spawn_vehicle(world, handles, tuning, kind, Transform::new(position, yaw));
    }
}

pub fn spawn_vehicle(
    world: &mut World,
    handles: &mut HandleAllocator,
    tuning: &Tuning,
    kind: VehicleKind,
    transform: Transform,
) -> hecs::Entity {
    let handle = handles.allocate();
    let descriptor = renderables::vehicle(kind);
    let collider = Collider::from_descriptor(ObstacleKind::Vehicle, &descriptor, PLAYER_HEIGHT);
    world.spawn((
        Vehicle::new(kind, tuning.vehicle, handle),
        transform,
        collider,
        Renderable { handle, descriptor },
    ))
}

/// The market: barrel and crate clusters, stalls, pots and two fence rows.
pub fn spawn_props(world: &mut World, rng: &mut ChaCha8Rng, handles: &mut HandleAllocator) {
    spawn_cluster(world, rng, handles, DestructibleKind::Barrel, Vec3::new(12.0, 0.0, 8.0), 5, 2.0);
    spawn_cluster(world, rng, handles, DestructibleKind::Crate, Vec3::new(-8.0, 0.0, -10.0), 8, 3.0);

    for (x, z) in [(20.0, 15.0), (25.0, 15.0), (20.0, 20.0), (25.0, 20.0)] {
        spawn_destructible(world, handles, DestructibleKind::Stall, Transform::at(x, 0.0, z));
    }
    for (x, z) in [
        (22.0, 10.0),
        (23.0, 10.0),
        (22.0, 25.0),
        (23.0, 25.0),
        (18.0, 17.0),
        (27.0, 17.0),
    ] {
        spawn_destructible(world, handles, DestructibleKind::Pot, Transform::at(x, 0.0, z));
    }

    for i in 0..5 {
        let step = i as f32 * 2.2;
        spawn_destructible(
            world,
            handles,
            DestructibleKind::Fence,
            Transform::at(-15.0 + step, 0.0, -15.0),
        );
        spawn_destructible(
            world,
            handles,
            DestructibleKind::Fence,
            Transform::new(Vec3::new(-15.0, 0.0, -15.0 + step), FRAC_PI_2),
        );
    }
}

/// Scatter `count` props of one kind within `radius` of `center`, each
/// with a random heading.
pub fn spawn_cluster(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    handles: &mut HandleAllocator,
    kind: DestructibleKind,
    center: Vec3,
    count: usize,
    radius: f32,
) {
    for _ in 0..count {
        let angle = rng.gen::<f32>() * TAU;
        let distance = rng.gen::<f32>() * radius;
        let position = center + Vec3::new(angle.cos() * distance, 0.0, angle.sin() * distance);
        let yaw = rng.gen::<f32>() * TAU;
        spawn_destructible(world, handles, kind, Transform::new(position, yaw));
    }
}

pub fn spawn_destructible(
    world: &mut World,
    handles: &mut HandleAllocator,
    kind: DestructibleKind,
    transform: Transform,
) -> hecs::Entity {
    let handle = handles.allocate();
    let descriptor = renderables::destructible(kind);
    let collider = Collider::from_descriptor(ObstacleKind::Prop, &descriptor, PLAYER_HEIGHT);
    world.spawn((
        Destructible::new(kind, handle, descriptor.bounds()),
        transform,
        collider,
        Renderable { handle, descriptor },
    ))
}

pub fn spawn_player(
    world: &mut World,
    handles: &mut HandleAllocator,
    tuning: &Tuning,
    transform: Transform,
) -> hecs::Entity {
    let handle = handles.allocate();
    world.spawn((
        Player::new(tuning.player, tuning.wanted.max_level, handle),
        transform,
        Renderable {
            handle,
            descriptor: renderables::player(),
        },
    ))
}
