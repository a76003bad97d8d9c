//! Player update: input to movement and intents.

use hecs::World;
use tracing::warn;

use tumult_core::types::Transform;

use crate::collision::MoveContext;
use crate::entities::Player;
use crate::intents::PlayerIntents;
use crate::spatial::SpatialIndex;

/// Run the player's update against the current collision index. The
/// occupied vehicle never blocks its own driver.
pub fn run(world: &mut World, player: hecs::Entity, index: &SpatialIndex, dt: f32) -> PlayerIntents {
    let Ok((player, transform)) = world.query_one_mut::<(&mut Player, &mut Transform)>(player)
    else {
        warn!("player entity missing");
        return PlayerIntents::default();
    };
    let obstacles = MoveContext::new(index, player.vehicle(), player.collision_radius());
    player.update(transform, dt, &obstacles)
}

