//! Tests for entities, collision, intent dispatch and whole engine sessions.

use glam::Vec3;
use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use tumult_core::commands::PlayerCommand;
use tumult_core::config::Tuning;
use tumult_core::constants::{PLAYER_COLLISION_RADIUS, PLAYER_HEIGHT, SPATIAL_CELL_SIZE};
use tumult_core::enums::*;
use tumult_core::events::GameEvent;
use tumult_core::state::GameStateSnapshot;
use tumult_core::types::{RenderableHandle, Transform};

use crate::collision::{MoveContext, MoveOutcome};
use crate::engine::{SimConfig, SimulationEngine};
use crate::entities::{Destructible, Entity, Player, Vehicle};
use crate::intents::InteractIntent;
use crate::renderables::{self, HandleAllocator};
use crate::sound::SoundSystem;
use crate::spatial::{Collider, ObstacleKind, SpatialIndex};
use crate::systems::environment::{lighting, CameraRig};
use crate::systems::{broad_phase, dispatch, TickOutput};
use crate::world_setup;

const DT: f32 = 1.0 / 60.0;

fn prop(kind: DestructibleKind) -> Destructible {
    Destructible::new(
        kind,
        RenderableHandle(0),
        renderables::destructible(kind).bounds(),
    )
}

fn rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(7)
}

fn started_engine(config: SimConfig) -> SimulationEngine {
    let mut engine = SimulationEngine::new(config);
    engine.queue_command(PlayerCommand::StartSession);
    engine.tick(DT);
    engine
}

fn run_ticks(engine: &mut SimulationEngine, ticks: usize) -> Vec<GameStateSnapshot> {
    (0..ticks).map(|_| engine.tick(DT)).collect()
}

fn key(engine: &mut SimulationEngine, action: InputAction, pressed: bool) {
    engine.queue_command(if pressed {
        PlayerCommand::KeyDown { action }
    } else {
        PlayerCommand::KeyUp { action }
    });
}

// ---- Destructibles ----

#[test]
fn test_pot_single_lethal_hit_then_nothing() {
    let mut pot = prop(DestructibleKind::Pot);
    let mut rng = rng();

    assert_eq!(pot.damage(20, &mut rng), 2);
    assert!(pot.is_destroyed());
    assert_eq!(pot.damage(5, &mut rng), 0);
    assert!(pot.health() <= 0);
    assert_eq!(pot.health(), -10);
}

#[test]
fn test_damage_accumulates_until_destroyed() {
    let mut barrel = prop(DestructibleKind::Barrel);
    let mut rng = rng();

    assert_eq!(barrel.damage(20, &mut rng), 0);
    assert_eq!(barrel.health(), 30);
    assert_eq!(barrel.damage(20, &mut rng), 0);
    assert_eq!(barrel.health(), 10);
    assert!(!barrel.is_destroyed());
    assert_eq!(barrel.damage(20, &mut rng), 10);
    assert_eq!(barrel.health(), -10);
}

#[test]
fn test_score_awarded_exactly_once() {
    let mut stall = prop(DestructibleKind::Stall);
    let mut rng = rng();
    let total: u32 = (0..20).map(|_| stall.damage(40, &mut rng)).sum();
    assert_eq!(total, 50);
    assert_eq!(stall.health(), 0);
}

#[test]
fn test_base_stats_per_kind() {
    let expected = [
        (DestructibleKind::Barrel, 50, 10),
        (DestructibleKind::Stall, 120, 50),
        (DestructibleKind::Crate, 30, 5),
        (DestructibleKind::Pot, 10, 2),
        (DestructibleKind::Fence, 80, 15),
    ];
    for (kind, health, score) in expected {
        let p = prop(kind);
        assert_eq!(p.max_health(), health, "{kind:?}");
        assert_eq!(p.score_value(), score, "{kind:?}");
    }
    assert!(prop(DestructibleKind::Stall).wanted_delta() > prop(DestructibleKind::Pot).wanted_delta());
}

#[test]
fn test_feedback_scale_and_hidden_when_destroyed() {
    let mut barrel = prop(DestructibleKind::Barrel);
    let mut rng = rng();
    barrel.damage(25, &mut rng);
    assert!((barrel.visual().scale - 0.95).abs() < 1e-6);
    assert!(barrel.visual().visible);

    barrel.damage(25, &mut rng);
    assert!(!barrel.visual().visible);
}

#[test]
fn test_negative_damage_is_ignored() {
    let mut crate_prop = prop(DestructibleKind::Crate);
    assert_eq!(crate_prop.damage(-50, &mut rng()), 0);
    assert_eq!(crate_prop.health(), 30);
}

#[test]
fn test_debris_spawns_in_range_and_is_released() {
    let mut barrel = prop(DestructibleKind::Barrel);
    barrel.damage(100, &mut rng());

    let count = barrel.debris().map(|d| d.len()).unwrap_or(0);
    assert!((20..40).contains(&count), "debris count {count}");

    let mut transform = Transform::default();
    barrel.update(&mut transform, DT);
    assert!(barrel.debris().is_some());

    for _ in 0..(3.0 / DT) as usize {
        barrel.update(&mut transform, DT);
    }
    assert!(barrel.debris().is_none(), "debris should fall below the floor within 3s");
}

// ---- Vehicles ----

fn chariot() -> Vehicle {
    Vehicle::new(
        VehicleKind::Chariot,
        Tuning::default().vehicle,
        RenderableHandle(1),
    )
}

#[test]
fn test_vehicle_occupancy_invariant() {
    let mut world = World::new();
    let a = world.spawn(());
    let b = world.spawn(());
    let mut vehicle = chariot();

    assert!(!vehicle.is_occupied());
    assert!(vehicle.enter(a));
    assert!(vehicle.is_occupied());
    assert!(!vehicle.enter(b));
    assert_eq!(vehicle.driver(), Some(a));
}

#[test]
fn test_vehicle_exit_places_driver_beside() {
    let mut world = World::new();
    let driver = world.spawn(());
    let mut vehicle = chariot();
    let transform = Transform::at(3.0, 0.0, 4.0);

    assert!(vehicle.exit(&transform).is_none());
    vehicle.enter(driver);
    let (who, position) = vehicle.exit(&transform).unwrap();
    assert_eq!(who, driver);
    assert!((position - Vec3::new(5.0, 0.0, 4.0)).length() < 1e-5);
    assert!(!vehicle.is_occupied());
}

#[test]
fn test_vehicle_speed_limits() {
    let mut vehicle = chariot();
    for _ in 0..600 {
        vehicle.accelerate(DT);
    }
    assert!((vehicle.speed() - 15.0).abs() < 1e-4);
    assert!((vehicle.speed_percent() - 100.0).abs() < 1e-3);

    for _ in 0..600 {
        vehicle.brake(DT);
    }
    assert!((vehicle.speed() + 7.5).abs() < 1e-4);
}

#[test]
fn test_vehicle_friction_stops_it() {
    let mut vehicle = chariot();
    let mut transform = Transform::default();
    for _ in 0..60 {
        vehicle.accelerate(DT);
        vehicle.update(&mut transform, DT);
    }
    assert!(vehicle.speed() > 4.9);
    assert!(transform.position.z > 2.0, "chariot drives along local +Z");

    for _ in 0..60 {
        vehicle.update(&mut transform, DT);
    }
    assert_eq!(vehicle.speed(), 0.0);
    assert!(vehicle.wheel_spin() > 0.0);
}

#[test]
fn test_vehicle_turn_needs_speed() {
    let mut vehicle = chariot();
    let mut transform = Transform::default();
    vehicle.turn(&mut transform, 1.0, 0.1);
    assert_eq!(transform.yaw, 0.0);

    for _ in 0..60 {
        vehicle.accelerate(DT);
    }
    vehicle.turn(&mut transform, 1.0, 0.1);
    // 1.5 rad/s * 0.1 s * (5 / 15)
    assert!((transform.yaw - 0.05).abs() < 1e-3);
}

#[test]
fn test_vehicle_damage_and_repair() {
    let mut vehicle = chariot();
    let transform = Transform::default();
    let hit = vehicle.damage(60, &transform);
    assert!(!hit.wrecked);
    assert!((vehicle.health_percent() - 40.0).abs() < 1e-4);

    vehicle.repair(500);
    assert_eq!(vehicle.health(), 100);

    let hit = vehicle.damage(150, &transform);
    assert!(hit.wrecked);
    assert!(vehicle.is_wrecked());
    assert_eq!(vehicle.health(), 0);
}

// ---- Player ----

fn player() -> Player {
    let tuning = Tuning::default();
    Player::new(tuning.player, tuning.wanted.max_level, RenderableHandle(2))
}

#[test]
fn test_wanted_level_clamps() {
    let mut p = player();
    p.increase_wanted_level(3);
    p.increase_wanted_level(4);
    assert_eq!(p.wanted_level(), 5);
    p.decrease_wanted_level(9);
    assert_eq!(p.wanted_level(), 0);
}

#[test]
fn test_health_clamps() {
    let mut p = player();
    p.damage(30);
    assert_eq!(p.health(), 70);
    assert!((p.health_percent() - 70.0).abs() < 1e-4);
    p.heal(500);
    assert_eq!(p.health(), 100);
    p.damage(1000);
    assert_eq!(p.health(), 0);
}

#[test]
fn test_attack_respects_cooldown() {
    let index = SpatialIndex::new(SPATIAL_CELL_SIZE);
    let obstacles = MoveContext::new(&index, None, PLAYER_COLLISION_RADIUS);
    let mut p = player();
    let mut transform = Transform::default();

    p.key_down(InputAction::Attack);
    let first = p.update(&mut transform, DT, &obstacles);
    assert!(first.attack.is_some());
    assert!(p.is_attacking());

    p.key_down(InputAction::Attack);
    let second = p.update(&mut transform, DT, &obstacles);
    assert!(second.attack.is_none(), "still cooling down");

    for _ in 0..40 {
        p.update(&mut transform, DT, &obstacles);
    }
    assert!(!p.is_attacking());
    p.key_down(InputAction::Attack);
    assert!(p.update(&mut transform, DT, &obstacles).attack.is_some());
}

#[test]
fn test_seated_player_cannot_attack_and_drives() {
    let mut world = World::new();
    let vehicle = world.spawn(());
    let index = SpatialIndex::new(SPATIAL_CELL_SIZE);
    let obstacles = MoveContext::new(&index, Some(vehicle), PLAYER_COLLISION_RADIUS);
    let mut p = player();
    let mut transform = Transform::default();
    p.board(vehicle);

    p.key_down(InputAction::Attack);
    p.key_down(InputAction::Forward);
    p.key_down(InputAction::Right);
    let intents = p.update(&mut transform, DT, &obstacles);
    assert!(intents.attack.is_none());
    let drive = intents.drive.unwrap();
    assert!(drive.accelerate);
    assert_eq!(drive.steer, -1.0);
    assert_eq!(transform.position, Vec3::ZERO, "seated player does not walk");

    p.key_down(InputAction::Interact);
    let intents = p.update(&mut transform, DT, &obstacles);
    assert_eq!(intents.interact, Some(InteractIntent::Exit { vehicle }));
    assert!(intents.drive.is_none());
}

#[test]
fn test_player_turns_toward_movement() {
    let index = SpatialIndex::new(SPATIAL_CELL_SIZE);
    let obstacles = MoveContext::new(&index, None, PLAYER_COLLISION_RADIUS);
    let mut p = player();
    let mut transform = Transform::default();

    p.key_down(InputAction::Right);
    for _ in 0..300 {
        p.update(&mut transform, DT, &obstacles);
    }
    assert!(transform.position.x > 40.0);
    assert!((transform.yaw - std::f32::consts::FRAC_PI_2).abs() < 0.01);
    assert!((transform.forward() - Vec3::X).length() < 0.02);
}

// ---- Collision ----

fn walled_world() -> (World, SpatialIndex) {
    let mut world = World::new();
    let mut handles = HandleAllocator::default();
    world_setup::spawn_building(
        &mut world,
        &mut handles,
        Transform::at(0.0, 0.0, -5.0),
        40.0,
        3.0,
        1.0,
    );
    let mut index = SpatialIndex::new(SPATIAL_CELL_SIZE);
    broad_phase::run(&world, &mut index);
    (world, index)
}

#[test]
fn test_walking_into_wall_stops_before_it() {
    let (_world, index) = walled_world();
    let ctx = MoveContext::new(&index, None, PLAYER_COLLISION_RADIUS);
    let mut position = Vec3::ZERO;
    let step = Vec3::new(0.0, 0.0, -10.0 * DT);

    for _ in 0..120 {
        let (next, _) = ctx.resolve(position, step);
        assert!(!ctx.path_blocked(position, next), "committed a blocked position");
        position = next;
    }
    assert!(position.z > -4.5, "walked through the wall: {position:?}");
    assert!(position.z < -3.5, "stopped too early: {position:?}");
}

#[test]
fn test_diagonal_into_wall_slides_along_it() {
    let (_world, index) = walled_world();
    let ctx = MoveContext::new(&index, None, PLAYER_COLLISION_RADIUS);
    let mut position = Vec3::ZERO;
    let step = Vec3::new(1.0, 0.0, -1.0).normalize() * 10.0 * DT;

    let mut slid = false;
    for _ in 0..120 {
        let (next, outcome) = ctx.resolve(position, step);
        assert!(!ctx.path_blocked(position, next));
        assert!(!ctx.probe_blocked(next), "parked inside probe range: {next:?}");
        slid |= outcome == MoveOutcome::SlideX;
        position = next;
    }
    assert!(slid);
    assert!(position.x > 5.0, "should keep moving along the wall: {position:?}");
    assert!(position.z > -4.5 && position.z < -3.5, "{position:?}");
}

/// Index of 3 m tall walls given as `(center, width, depth)`.
fn walls(layout: &[(Vec3, f32, f32)]) -> (World, SpatialIndex) {
    let mut world = World::new();
    let mut handles = HandleAllocator::default();
    for &(center, width, depth) in layout {
        world_setup::spawn_building(
            &mut world,
            &mut handles,
            Transform::new(center, 0.0),
            width,
            3.0,
            depth,
        );
    }
    let mut index = SpatialIndex::new(SPATIAL_CELL_SIZE);
    broad_phase::run(&world, &mut index);
    (world, index)
}

#[test]
fn test_tight_gap_takes_a_reduced_step() {
    // Wall face 1.3 ahead: the full and 3/4 steps overshoot, half a step fits.
    let (_world, index) = walls(&[(Vec3::new(1.8, 0.0, 0.0), 1.0, 40.0)]);
    let ctx = MoveContext::new(&index, None, PLAYER_COLLISION_RADIUS);

    let (next, outcome) = ctx.resolve(Vec3::ZERO, Vec3::X);
    assert_eq!(outcome, MoveOutcome::Partial);
    assert!((next - Vec3::new(0.5, 0.0, 0.0)).length() < 1e-6, "{next:?}");
    assert!(!ctx.path_blocked(Vec3::ZERO, next));
    assert!(!ctx.probe_blocked(next));
}

#[test]
fn test_corner_pushes_back_from_nearest_wall() {
    // Faces at x = 0.6 and z = 0.65; heading into the corner.
    let (_world, index) = walls(&[
        (Vec3::new(1.1, 0.0, 0.0), 1.0, 10.0),
        (Vec3::new(-2.2, 0.0, 1.15), 5.6, 1.0),
    ]);
    let ctx = MoveContext::new(&index, None, PLAYER_COLLISION_RADIUS);

    let (next, outcome) = ctx.resolve(Vec3::ZERO, Vec3::new(1.0, 0.0, 1.0).normalize());
    assert_eq!(outcome, MoveOutcome::PushBack);
    assert!((next - Vec3::new(-0.1, 0.0, 0.0)).length() < 1e-5, "{next:?}");
    assert!(!ctx.path_blocked(Vec3::ZERO, next));
}

#[test]
fn test_boxed_in_body_stays_put() {
    let (_world, index) = walls(&[
        (Vec3::new(1.0, 0.0, 0.0), 1.0, 2.0),
        (Vec3::new(-1.0, 0.0, 0.0), 1.0, 2.0),
        (Vec3::new(0.0, 0.0, 1.0), 2.0, 1.0),
        (Vec3::new(0.0, 0.0, -1.0), 2.0, 1.0),
    ]);
    let ctx = MoveContext::new(&index, None, PLAYER_COLLISION_RADIUS);

    for direction in [Vec3::X, Vec3::NEG_Z] {
        let (next, outcome) = ctx.resolve(Vec3::ZERO, direction * 10.0 * DT);
        assert_eq!(outcome, MoveOutcome::Blocked, "{direction:?}");
        assert_eq!(next, Vec3::ZERO);
        assert!(!ctx.path_blocked(Vec3::ZERO, next));
    }
}

#[test]
fn test_own_vehicle_is_not_an_obstacle() {
    let mut world = World::new();
    let mut handles = HandleAllocator::default();
    let tuning = Tuning::default();
    let cart = world_setup::spawn_vehicle(
        &mut world,
        &mut handles,
        &tuning,
        VehicleKind::Cart,
        Transform::at(0.0, 0.0, -2.0),
    );
    let mut index = SpatialIndex::new(SPATIAL_CELL_SIZE);
    broad_phase::run(&world, &mut index);

    let from = Vec3::new(0.0, 0.0, 1.0);
    let to = Vec3::new(0.0, 0.0, 0.5);
    assert!(MoveContext::new(&index, None, 0.5).path_blocked(from, to));
    assert!(!MoveContext::new(&index, Some(cart), 0.5).path_blocked(from, to));
}

#[test]
fn test_destroyed_props_stop_blocking() {
    let mut world = World::new();
    let mut handles = HandleAllocator::default();
    let barrel = world_setup::spawn_destructible(
        &mut world,
        &mut handles,
        DestructibleKind::Barrel,
        Transform::at(0.0, 0.0, 1.0),
    );
    let mut index = SpatialIndex::new(SPATIAL_CELL_SIZE);
    broad_phase::run(&world, &mut index);
    assert_eq!(index.len(), 1);

    world
        .get::<&mut Destructible>(barrel)
        .unwrap()
        .damage(100, &mut rng());
    broad_phase::run(&world, &mut index);
    assert!(index.is_empty());
}

#[test]
fn test_scenery_and_canopies_never_block() {
    let stall = Collider::from_descriptor(
        ObstacleKind::Prop,
        &renderables::destructible(DestructibleKind::Stall),
        PLAYER_HEIGHT,
    );
    // base, counter and two poles; the canopy is overhead
    assert_eq!(stall.footprints.len(), 4);

    let ground = renderables::ground(1000.0);
    assert!(ground.footprints(PLAYER_HEIGHT).is_empty());
    assert!(renderables::grid(1000.0, 100).footprints(PLAYER_HEIGHT).is_empty());
}

#[test]
fn test_spatial_index_queries() {
    let mut world = World::new();
    let mut handles = HandleAllocator::default();
    let near = world_setup::spawn_destructible(
        &mut world,
        &mut handles,
        DestructibleKind::Crate,
        Transform::at(2.0, 0.0, 0.0),
    );
    let far = world_setup::spawn_destructible(
        &mut world,
        &mut handles,
        DestructibleKind::Crate,
        Transform::at(40.0, 0.0, 0.0),
    );
    let mut index = SpatialIndex::new(SPATIAL_CELL_SIZE);
    broad_phase::run(&world, &mut index);

    let nearby: Vec<_> = index.nearby(Vec3::ZERO, 5.0).iter().map(|c| c.entity).collect();
    assert_eq!(nearby, vec![near]);
    assert_eq!(index.nearest(Vec3::ZERO, None).map(|c| c.entity), Some(near));
    assert_eq!(index.nearest(Vec3::ZERO, Some(near)).map(|c| c.entity), Some(far));

    let hit = index.raycast(Vec3::ZERO, Vec3::X, 5.0, None).unwrap();
    assert!((hit - 1.6).abs() < 1e-3);
    assert!(index.raycast(Vec3::ZERO, -Vec3::X, 5.0, None).is_none());
}

// ---- Dispatch ----

struct Arena {
    world: World,
    handles: HandleAllocator,
    tuning: Tuning,
    player: hecs::Entity,
}

fn arena() -> Arena {
    let mut world = World::new();
    let mut handles = HandleAllocator::default();
    let tuning = Tuning::default();
    let player = world_setup::spawn_player(&mut world, &mut handles, &tuning, Transform::default());
    Arena {
        world,
        handles,
        tuning,
        player,
    }
}

#[test]
fn test_attack_hits_only_props_in_cone_and_range() {
    let mut a = arena();
    let ahead = world_setup::spawn_destructible(
        &mut a.world,
        &mut a.handles,
        DestructibleKind::Pot,
        Transform::at(0.0, 0.0, 1.0),
    );
    let behind = world_setup::spawn_destructible(
        &mut a.world,
        &mut a.handles,
        DestructibleKind::Pot,
        Transform::at(0.0, 0.0, -1.0),
    );
    let out_of_reach = world_setup::spawn_destructible(
        &mut a.world,
        &mut a.handles,
        DestructibleKind::Pot,
        Transform::at(0.0, 0.0, 3.0),
    );

    let attack = {
        let mut query = a
            .world
            .query_one::<(&mut Player, &Transform)>(a.player)
            .unwrap();
        let (player, transform) = query.get().unwrap();
        player.attack(transform).unwrap()
    };
    let mut out = TickOutput::new(0);
    dispatch::resolve_attack(&mut a.world, a.player, &attack, &mut rng(), &mut out);

    let destroyed = |e| a.world.get::<&Destructible>(e).unwrap().is_destroyed();
    assert!(destroyed(ahead));
    assert!(!destroyed(behind));
    assert!(!destroyed(out_of_reach));

    let player = a.world.get::<&Player>(a.player).unwrap();
    assert_eq!(player.score(), 2);
    assert_eq!(player.wanted_level(), 1);

    let ids: Vec<_> = out.sounds.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![SoundId::Attack, SoundId::Destruction]);
    assert!(matches!(
        out.events[..],
        [GameEvent::PropDestroyed {
            kind: DestructibleKind::Pot,
            score: 2,
            ..
        }]
    ));
}

#[test]
fn test_non_lethal_attack_awards_nothing() {
    let mut a = arena();
    let stall = world_setup::spawn_destructible(
        &mut a.world,
        &mut a.handles,
        DestructibleKind::Stall,
        Transform::at(0.0, 0.0, 1.5),
    );
    let attack = crate::intents::AttackIntent {
        origin: Vec3::ZERO,
        facing: Vec3::Z,
        power: 20,
        radius: 2.0,
    };
    let mut out = TickOutput::new(0);
    dispatch::resolve_attack(&mut a.world, a.player, &attack, &mut rng(), &mut out);

    assert_eq!(a.world.get::<&Destructible>(stall).unwrap().health(), 100);
    let player = a.world.get::<&Player>(a.player).unwrap();
    assert_eq!(player.score(), 0);
    assert_eq!(player.wanted_level(), 0);
    assert!(out.events.is_empty());
}

#[test]
fn test_interact_boards_nearest_free_vehicle_and_exits() {
    let mut a = arena();
    let taken = world_setup::spawn_vehicle(
        &mut a.world,
        &mut a.handles,
        &a.tuning,
        VehicleKind::Chariot,
        Transform::at(0.5, 0.0, 0.0),
    );
    let free = world_setup::spawn_vehicle(
        &mut a.world,
        &mut a.handles,
        &a.tuning,
        VehicleKind::Cart,
        Transform::at(0.0, 0.0, 1.5),
    );
    let stranger = a.world.spawn(());
    a.world.get::<&mut Vehicle>(taken).unwrap().enter(stranger);

    let mut out = TickOutput::new(0);
    dispatch::resolve_interact(
        &mut a.world,
        a.player,
        InteractIntent::Board {
            origin: Vec3::ZERO,
            radius: 2.0,
        },
        &mut out,
    );
    assert_eq!(a.world.get::<&Player>(a.player).unwrap().vehicle(), Some(free));
    assert_eq!(a.world.get::<&Vehicle>(free).unwrap().driver(), Some(a.player));
    assert_eq!(out.events, vec![GameEvent::VehicleEntered {
        kind: VehicleKind::Cart
    }]);

    dispatch::resolve_interact(
        &mut a.world,
        a.player,
        InteractIntent::Exit { vehicle: free },
        &mut out,
    );
    assert!(!a.world.get::<&Player>(a.player).unwrap().is_in_vehicle());
    assert!(!a.world.get::<&Vehicle>(free).unwrap().is_occupied());
    let position = a.world.get::<&Transform>(a.player).unwrap().position;
    assert!((position - Vec3::new(2.0, 0.0, 1.5)).length() < 1e-5);
}

#[test]
fn test_interact_with_nothing_in_reach() {
    let mut a = arena();
    world_setup::spawn_vehicle(
        &mut a.world,
        &mut a.handles,
        &a.tuning,
        VehicleKind::Chariot,
        Transform::at(5.0, 0.0, 0.0),
    );
    let mut out = TickOutput::new(0);
    dispatch::resolve_interact(
        &mut a.world,
        a.player,
        InteractIntent::Board {
            origin: Vec3::ZERO,
            radius: 2.0,
        },
        &mut out,
    );
    assert!(!a.world.get::<&Player>(a.player).unwrap().is_in_vehicle());
    assert!(out.events.is_empty());
}

#[test]
fn test_wreck_ejects_driver() {
    let mut a = arena();
    let chariot = world_setup::spawn_vehicle(
        &mut a.world,
        &mut a.handles,
        &a.tuning,
        VehicleKind::Chariot,
        Transform::at(10.0, 0.0, 0.0),
    );
    a.world.get::<&mut Vehicle>(chariot).unwrap().enter(a.player);
    a.world.get::<&mut Player>(a.player).unwrap().board(chariot);

    let mut out = TickOutput::new(0);
    dispatch::apply_vehicle_damage(&mut a.world, chariot, 500, &mut out);

    assert!(!a.world.get::<&Player>(a.player).unwrap().is_in_vehicle());
    let position = a.world.get::<&Transform>(a.player).unwrap().position;
    assert!((position - Vec3::new(12.0, 0.0, 0.0)).length() < 1e-5);
    assert!(out
        .events
        .contains(&GameEvent::VehicleWrecked {
            kind: VehicleKind::Chariot
        }));
}

// ---- Environment ----

#[test]
fn test_day_night_cycle() {
    let midnight = lighting(0.0, 300.0);
    assert_eq!(midnight.time_of_day, 0.0);
    assert!((midnight.sun_intensity - 0.5).abs() < 1e-5);
    assert!((midnight.ambient_intensity - 0.2).abs() < 1e-5);

    let noon = lighting(150.0, 300.0);
    assert!((noon.time_of_day - 0.5).abs() < 1e-6);
    assert!((noon.sun_intensity - 1.0).abs() < 1e-5);
    assert!((noon.sky_color[0] - 0.33).abs() < 1e-4);

    let next_day = lighting(450.0, 300.0);
    assert!((next_day.time_of_day - 0.5).abs() < 1e-6);
}

#[test]
fn test_camera_follow_is_frame_rate_independent() {
    let target = Vec3::new(10.0, 0.0, 0.0);
    let mut fine = CameraRig::default();
    for _ in 0..60 {
        fine.follow(target, DT);
    }
    let mut coarse = CameraRig::default();
    for _ in 0..10 {
        coarse.follow(target, 0.1);
    }
    assert!((fine.view().target.x - 9.0).abs() < 1e-3);
    assert!((coarse.view().target.x - 9.0).abs() < 1e-3);

    fine.set_height(100.0);
    assert_eq!(fine.view().height, 25.0);
}

#[test]
fn test_sound_system_mute_and_volume() {
    let mut sound = SoundSystem::default();
    sound.start_music();
    sound.request(tumult_core::events::SoundRequest::at(SoundId::Attack, Vec3::ZERO));
    let queued = sound.drain();
    assert_eq!(queued.len(), 1);
    assert_eq!(queued[0].options.volume, Some(0.7));

    assert!(sound.toggle_mute());
    assert!(!sound.view().music_playing);
    sound.request(tumult_core::events::SoundRequest::at(SoundId::Attack, Vec3::ZERO));
    assert!(sound.drain().is_empty());

    assert!(!sound.toggle_mute());
    assert!(sound.view().music_playing);
}

// ---- Engine ----

#[test]
fn test_session_start_builds_the_market() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let idle = engine.tick(DT);
    assert_eq!(idle.phase, SessionPhase::Idle);
    assert!(idle.props.is_empty());

    engine.queue_command(PlayerCommand::StartSession);
    let snap = engine.tick(DT);
    assert_eq!(snap.phase, SessionPhase::Running);
    assert_eq!(snap.props.len(), 5 + 8 + 4 + 6 + 10);
    assert_eq!(snap.vehicles.len(), 3);
    assert!(snap.player.is_some());
    assert!(snap.audio.is_some_and(|a| a.music_playing));
    assert_eq!(snap.hud.health_percent, 100.0);
    assert_eq!(snap.hud.wanted_level, 0);
    // ground + grid + 10 buildings + 3 vehicles + 33 props + player
    assert_eq!(snap.renderables.len(), 2 + 10 + 3 + 33 + 1);
}

#[test]
fn test_headless_world_skips_optional_subsystems() {
    let mut engine = started_engine(SimConfig {
        spawn_player: false,
        ..Default::default()
    });
    assert!(engine.wanted().is_none());
    assert!(engine.sound().is_none());

    key(&mut engine, InputAction::Attack, true);
    key(&mut engine, InputAction::Mute, true);
    let snaps = run_ticks(&mut engine, 120);
    let last = snaps.last().unwrap();
    assert!(last.player.is_none());
    assert!(last.audio.is_none());
    assert_eq!(last.hud.score, 0);
    assert!(!last.pursuit.active);
    assert!(snaps.iter().all(|s| s.sound_requests.is_empty()));
}

#[test]
fn test_determinism_same_seed() {
    let script = |engine: &mut SimulationEngine, i: usize| match i {
        10 => key(engine, InputAction::Forward, true),
        40 => key(engine, InputAction::Attack, true),
        50 => key(engine, InputAction::Left, true),
        90 => key(engine, InputAction::Forward, false),
        _ => {}
    };
    let mut engine_a = started_engine(SimConfig {
        seed: 12345,
        ..Default::default()
    });
    let mut engine_b = started_engine(SimConfig {
        seed: 12345,
        ..Default::default()
    });

    for i in 0..200 {
        script(&mut engine_a, i);
        script(&mut engine_b, i);
        let json_a = serde_json::to_string(&engine_a.tick(DT)).unwrap();
        let json_b = serde_json::to_string(&engine_b.tick(DT)).unwrap();
        assert_eq!(json_a, json_b, "snapshots diverged at tick {i}");
    }
}

#[test]
fn test_different_seeds_differ() {
    let a = started_engine(SimConfig {
        seed: 1,
        ..Default::default()
    })
    .tick(DT);
    let b = started_engine(SimConfig {
        seed: 2,
        ..Default::default()
    })
    .tick(DT);
    let positions = |s: &GameStateSnapshot| s.props.iter().map(|p| p.position).collect::<Vec<_>>();
    assert_ne!(positions(&a), positions(&b));
}

#[test]
fn test_player_walks_and_camera_follows() {
    let mut engine = started_engine(SimConfig::default());
    key(&mut engine, InputAction::Forward, true);
    let snaps = run_ticks(&mut engine, 30);
    let last = snaps.last().unwrap();
    let player = last.player.unwrap();
    assert!(player.position.z < -4.0, "{:?}", player.position);
    assert!(last.camera.target.z < 0.0);
}

#[test]
fn test_wanted_pursuit_and_decay_through_engine() {
    let mut engine = started_engine(SimConfig::default());
    let player = engine.player().unwrap();
    engine
        .world_mut()
        .get::<&mut Player>(player)
        .unwrap()
        .increase_wanted_level(2);

    let snaps = run_ticks(&mut engine, 1900);
    let events: Vec<_> = snaps.iter().flat_map(|s| s.events.clone()).collect();
    let starts = events
        .iter()
        .filter(|e| matches!(e, GameEvent::PursuitStarted { level: 2 }))
        .count();
    let ends = events
        .iter()
        .filter(|e| matches!(e, GameEvent::PursuitEnded))
        .count();
    assert_eq!(starts, 1);
    assert_eq!(ends, 1);
    assert!(snaps[0].pursuit.active);
    assert!(snaps[0]
        .sound_requests
        .iter()
        .any(|s| s.id == SoundId::Wanted));

    let last = snaps.last().unwrap();
    assert_eq!(last.hud.wanted_level, 1);
    assert!(!last.pursuit.active);
    assert_eq!(last.pursuit.state, WantedState::Wanted);
}

#[test]
fn test_calm_player_never_decays() {
    let mut engine = started_engine(SimConfig::default());
    let snaps = run_ticks(&mut engine, 6000);
    assert!(snaps
        .iter()
        .all(|s| s.hud.wanted_level == 0 && s.pursuit.decay_timer_secs == 0.0));
}

#[test]
fn test_board_drive_and_exit_vehicle() {
    let mut engine = started_engine(SimConfig::default());
    let player = engine.player().unwrap();
    // Step up beside the first chariot at (5, 0, 5).
    engine
        .world_mut()
        .get::<&mut Transform>(player)
        .unwrap()
        .position = Vec3::new(5.0, 0.0, 3.5);

    key(&mut engine, InputAction::Interact, true);
    let snap = engine.tick(DT);
    assert!(snap.player.unwrap().in_vehicle);
    assert!(snap
        .sound_requests
        .iter()
        .any(|s| s.id == SoundId::VehicleEnter));

    key(&mut engine, InputAction::Forward, true);
    let snaps = run_ticks(&mut engine, 60);
    let last = snaps.last().unwrap();
    let chariot = last.vehicles.iter().find(|v| v.occupied).unwrap();
    assert!(chariot.speed > 4.0);
    assert!((last.player.unwrap().position - chariot.position).length() < 1e-5);
    assert!((chariot.position - Vec3::new(5.0, 0.0, 5.0)).length() > 1.0);

    key(&mut engine, InputAction::Forward, false);
    key(&mut engine, InputAction::Interact, true);
    let snap = engine.tick(DT);
    assert!(!snap.player.unwrap().in_vehicle);
    assert!(snap.vehicles.iter().all(|v| !v.occupied));
}

#[test]
fn test_attack_sound_is_scaled_and_muted() {
    let mut engine = started_engine(SimConfig::default());
    key(&mut engine, InputAction::Attack, true);
    let snap = engine.tick(DT);
    let attack = snap
        .sound_requests
        .iter()
        .find(|s| s.id == SoundId::Attack)
        .unwrap();
    assert_eq!(attack.options.volume, Some(0.7));

    key(&mut engine, InputAction::Mute, true);
    run_ticks(&mut engine, 60);
    key(&mut engine, InputAction::Attack, true);
    let snap = engine.tick(DT);
    assert!(snap.audio.unwrap().muted);
    assert!(snap.sound_requests.is_empty());
}

#[test]
fn test_pause_freezes_time_and_reset_rebuilds() {
    let mut engine = started_engine(SimConfig::default());
    let first = engine.tick(DT);
    run_ticks(&mut engine, 10);

    engine.queue_command(PlayerCommand::Pause);
    let paused = engine.tick(DT);
    let still = engine.tick(DT);
    assert_eq!(paused.phase, SessionPhase::Paused);
    assert_eq!(paused.time.tick, still.time.tick);

    engine.queue_command(PlayerCommand::Resume);
    assert_eq!(engine.tick(DT).phase, SessionPhase::Running);

    let generation = engine.session_generation();
    engine.queue_command(PlayerCommand::Reset);
    let reset = engine.tick(DT);
    assert_eq!(engine.session_generation(), generation + 1);
    assert_eq!(reset.time.tick, 1);
    let positions = |s: &GameStateSnapshot| s.props.iter().map(|p| p.position).collect::<Vec<_>>();
    assert_eq!(positions(&first), positions(&reset));
}

#[test]
fn test_time_scale_and_long_frames() {
    let mut engine = started_engine(SimConfig::default());
    let before = engine.time().elapsed_secs;
    engine.tick(5.0);
    let clamped = engine.time().elapsed_secs - before;
    assert!((clamped - 0.1).abs() < 1e-6);

    engine.queue_command(PlayerCommand::SetTimeScale { scale: 0.0 });
    key(&mut engine, InputAction::Forward, true);
    let frozen = run_ticks(&mut engine, 30);
    assert_eq!(frozen.last().unwrap().player.unwrap().position, Vec3::ZERO);
}

#[test]
fn test_resize_updates_camera_aspect() {
    let mut engine = started_engine(SimConfig::default());
    engine.queue_command(PlayerCommand::Resize {
        width: 800,
        height: 400,
    });
    assert_eq!(engine.tick(DT).camera.aspect, 2.0);
}

#[derive(Clone, Default)]
struct CountingPursuit {
    starts: std::sync::Arc<std::sync::atomic::AtomicU32>,
    ends: std::sync::Arc<std::sync::atomic::AtomicU32>,
    ticks: std::sync::Arc<std::sync::atomic::AtomicU32>,
}

impl tumult_wanted::pursuit::PursuitHook for CountingPursuit {
    fn pursuit_started(&mut self, _level: u8) {
        self.starts.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
    }

    fn pursuit_ended(&mut self) {
        self.ends.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
    }

    fn pursuit_tick(&mut self, _intensity: f32, _alert_radius: f32, _dt: f32) {
        self.ticks.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
    }
}

#[test]
fn test_custom_pursuit_hook_sees_every_edge() {
    use std::sync::atomic::Ordering;

    let hook = CountingPursuit::default();
    let mut engine =
        SimulationEngine::new(SimConfig::default()).with_pursuit_hook(Box::new(hook.clone()));
    engine.queue_command(PlayerCommand::StartSession);
    engine.tick(DT);
    let player = engine.player().unwrap();
    engine
        .world_mut()
        .get::<&mut Player>(player)
        .unwrap()
        .increase_wanted_level(2);

    run_ticks(&mut engine, 1900);
    assert_eq!(hook.starts.load(Ordering::Relaxed), 1);
    assert_eq!(hook.ends.load(Ordering::Relaxed), 1);
    // Active from the first tick until the decay at 30 s.
    let ticks = hook.ticks.load(Ordering::Relaxed);
    assert!((1700..1900).contains(&ticks), "{ticks}");
}

#[test]
fn test_player_damage_and_heal_show_in_hud() {
    let mut engine = started_engine(SimConfig::default());
    engine.damage_player(30);
    assert!((engine.tick(DT).hud.health_percent - 70.0).abs() < 1e-4);

    engine.heal_player(50);
    assert_eq!(engine.tick(DT).hud.health_percent, 100.0);

    engine.damage_player(500);
    let snap = engine.tick(DT);
    assert_eq!(snap.hud.health_percent, 0.0);
    assert_eq!(snap.player.unwrap().health, 0);
}

#[test]
fn test_wrecking_the_driven_vehicle_ejects_the_player() {
    let mut engine = started_engine(SimConfig::default());
    let player = engine.player().unwrap();
    engine
        .world_mut()
        .get::<&mut Transform>(player)
        .unwrap()
        .position = Vec3::new(5.0, 0.0, 3.5);
    key(&mut engine, InputAction::Interact, true);
    assert!(engine.tick(DT).player.unwrap().in_vehicle);

    let chariot = engine
        .world()
        .query::<&Vehicle>()
        .iter()
        .find(|(_, vehicle)| vehicle.is_occupied())
        .map(|(entity, _)| entity)
        .unwrap();
    engine.damage_vehicle(chariot, 1000);
    let snap = engine.tick(DT);

    assert!(!snap.player.unwrap().in_vehicle);
    assert!(snap.events.contains(&GameEvent::VehicleWrecked {
        kind: VehicleKind::Chariot
    }));
    assert!(snap.events.contains(&GameEvent::VehicleExited {
        kind: VehicleKind::Chariot
    }));
    assert!(snap.vehicles.iter().any(|v| v.health_percent == 0.0));
}

#[test]
fn test_volume_survives_reset_and_pause_stops_music() {
    let mut engine = started_engine(SimConfig::default());
    engine.queue_command(PlayerCommand::SetVolume {
        sfx: Some(0.5),
        music: Some(2.0),
    });
    engine.queue_command(PlayerCommand::Reset);
    key(&mut engine, InputAction::Attack, true);
    let snap = engine.tick(DT);
    let audio = snap.audio.unwrap();
    assert_eq!(audio.sfx_volume, 0.5);
    assert_eq!(audio.music_volume, 1.0);
    let attack = snap
        .sound_requests
        .iter()
        .find(|s| s.id == SoundId::Attack)
        .unwrap();
    assert_eq!(attack.options.volume, Some(0.5));

    engine.queue_command(PlayerCommand::Pause);
    assert!(!engine.tick(DT).audio.unwrap().music_playing);
    engine.queue_command(PlayerCommand::Resume);
    assert!(engine.tick(DT).audio.unwrap().music_playing);
}
