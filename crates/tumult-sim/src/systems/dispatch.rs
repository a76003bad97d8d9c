//! Intent dispatch: resolve what the player asked for against the world.
//!
//! This is the only place where one entity's action changes another
//! entity's state.

use hecs::World;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use tumult_core::constants::ATTACK_CONE_DOT;
use tumult_core::enums::{AlertLevel, SoundId};
use tumult_core::events::GameEvent;
use tumult_core::types::Transform;

use super::TickOutput;
use crate::entities::{Destructible, Player, Vehicle};
use crate::intents::{AttackIntent, DriveIntent, InteractIntent, PlayerIntents};

/// Resolve one tick's intents in a fixed order: drive, attack, interact.
pub fn run(
    world: &mut World,
    player: hecs::Entity,
    intents: PlayerIntents,
    rng: &mut ChaCha8Rng,
    dt: f32,
    out: &mut TickOutput,
) {
    if let Some(drive) = intents.drive {
        resolve_drive(world, drive, dt);
    }
    if let Some(attack) = intents.attack {
        resolve_attack(world, player, &attack, rng, out);
    }
    if let Some(interact) = intents.interact {
        resolve_interact(world, player, interact, out);
    }
}

/// Apply the seated player's controls to their vehicle.
pub fn resolve_drive(world: &mut World, drive: DriveIntent, dt: f32) {
    let Ok((vehicle, transform)) =
        world.query_one_mut::<(&mut Vehicle, &mut Transform)>(drive.vehicle)
    else {
        debug!("drive intent for a missing vehicle ignored");
        return;
    };
    if drive.accelerate {
        vehicle.accelerate(dt);
    }
    if drive.brake {
        vehicle.brake(dt);
    }
    if drive.steer != 0.0 {
        vehicle.turn(transform, drive.steer, dt);
    }
}

/// Damage every intact prop inside the attack cone. Each destruction pays
/// its score and one wanted level to the player.
pub fn resolve_attack(
    world: &mut World,
    player: hecs::Entity,
    attack: &AttackIntent,
    rng: &mut ChaCha8Rng,
    out: &mut TickOutput,
) {
    out.sound(SoundId::Attack, attack.origin);

    let mut destroyed = Vec::new();
    for (_entity, (destructible, transform)) in
        world.query_mut::<(&mut Destructible, &Transform)>()
    {
        if destructible.is_destroyed() {
            continue;
        }
        let offset = transform.position - attack.origin;
        if offset.length() >= attack.radius {
            continue;
        }
        let direction = offset.normalize_or_zero();
        if direction.dot(attack.facing) <= ATTACK_CONE_DOT {
            continue;
        }
        let score = destructible.damage(attack.power, rng);
        if destructible.is_destroyed() {
            destroyed.push((
                destructible.kind,
                transform.position,
                score,
                destructible.wanted_delta(),
            ));
        }
    }

    if destroyed.is_empty() {
        return;
    }
    let Ok(player) = world.query_one_mut::<&mut Player>(player) else {
        return;
    };
    for (kind, position, score, wanted_delta) in destroyed {
        player.add_score(score);
        player.increase_wanted_level(1);
        info!(?kind, score, total = player.score(), "prop destroyed");
        out.sound(SoundId::Destruction, position);
        out.events.push(GameEvent::PropDestroyed {
            kind,
            position,
            score,
            wanted_delta,
        });
        out.alert(AlertLevel::Info, format!("{kind:?} destroyed (+{score})"));
    }
}

/// Board the nearest free vehicle in reach, or step out of the current one.
pub fn resolve_interact(
    world: &mut World,
    player: hecs::Entity,
    interact: InteractIntent,
    out: &mut TickOutput,
) {
    match interact {
        InteractIntent::Board { origin, radius } => {
            let nearest = world
                .query::<(&Vehicle, &Transform)>()
                .iter()
                .filter(|(_, (vehicle, _))| !vehicle.is_occupied())
                .map(|(entity, (_, transform))| (entity, transform.ground_distance_to(origin)))
                .filter(|(_, distance)| *distance < radius)
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(entity, _)| entity);
            let Some(target) = nearest else {
                debug!("nothing to interact with");
                return;
            };
            let Ok((vehicle, transform)) = world.query_one_mut::<(&mut Vehicle, &Transform)>(target)
            else {
                return;
            };
            if !vehicle.enter(player) {
                return;
            }
            let (kind, position) = (vehicle.kind, transform.position);
            if let Ok(player) = world.query_one_mut::<&mut Player>(player) {
                player.board(target);
            }
            out.sound(SoundId::VehicleEnter, position);
            out.events.push(GameEvent::VehicleEntered { kind });
        }
        InteractIntent::Exit { vehicle } => {
            let Ok((seat, transform)) = world.query_one_mut::<(&mut Vehicle, &Transform)>(vehicle)
            else {
                // The vehicle is gone; the player is on foot either way.
                if let Ok(player) = world.query_one_mut::<&mut Player>(player) {
                    player.leave_vehicle();
                }
                return;
            };
            let kind = seat.kind;
            let Some((driver, position)) = seat.exit(transform) else {
                return;
            };
            place_on_foot(world, driver, position);
            out.sound(SoundId::VehicleExit, position);
            out.events.push(GameEvent::VehicleExited { kind });
        }
    }
}

/// Damage a vehicle. A wreck throws its driver out beside it.
pub fn apply_vehicle_damage(
    world: &mut World,
    vehicle: hecs::Entity,
    amount: i32,
    out: &mut TickOutput,
) {
    let Ok((seat, transform)) = world.query_one_mut::<(&mut Vehicle, &Transform)>(vehicle) else {
        return;
    };
    let kind = seat.kind;
    let result = seat.damage(amount, transform);
    if let Some((driver, position)) = result.ejected {
        place_on_foot(world, driver, position);
        out.sound(SoundId::VehicleExit, position);
        out.events.push(GameEvent::VehicleExited { kind });
    }
    if result.wrecked {
        out.events.push(GameEvent::VehicleWrecked { kind });
        out.alert(AlertLevel::Warning, format!("{kind:?} wrecked"));
    }
}

fn place_on_foot(world: &mut World, driver: hecs::Entity, position: glam::Vec3) {
    if let Ok((player, transform)) = world.query_one_mut::<(&mut Player, &mut Transform)>(driver) {
        player.leave_vehicle();
        transform.position = position;
    }
}
