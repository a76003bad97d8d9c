//! Entity physics step: vehicle motion, debris, and the seated player.

use hecs::World;

use tumult_core::types::Transform;

use crate::entities::{Destructible, Entity, Player, Vehicle};

/// Update every self-driven entity, then carry the seated player along with
/// their vehicle.
pub fn run(world: &mut World, player: Option<hecs::Entity>, dt: f32) {
    for (_entity, (vehicle, transform)) in world.query_mut::<(&mut Vehicle, &mut Transform)>() {
        vehicle.update(transform, dt);
    }
    for (_entity, (destructible, transform)) in
        world.query_mut::<(&mut Destructible, &mut Transform)>()
    {
        destructible.update(transform, dt);
    }

    if let Some(player) = player {
        sync_seated(world, player);
    }
}

fn sync_seated(world: &mut World, player: hecs::Entity) {
    let vehicle = match world.get::<&Player>(player) {
        Ok(player) => player.vehicle(),
        Err(_) => return,
    };
    let Some(vehicle) = vehicle else {
        return;
    };
    let seat = match world.get::<&Transform>(vehicle) {
        Ok(transform) => *transform,
        Err(_) => return,
    };
    if let Ok(mut transform) = world.get::<&mut Transform>(player) {
        *transform = seat;
    }
}
