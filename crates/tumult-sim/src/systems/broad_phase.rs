//! Rebuild the collision index from the world's colliders.

use hecs::World;

use tumult_core::types::Transform;

use crate::entities::Destructible;
use crate::spatial::{Collider, SpatialIndex};

/// Re-index every collider. Destroyed props stop blocking.
pub fn run(world: &World, index: &mut SpatialIndex) {
    index.clear();
    for (entity, (transform, collider, destructible)) in world
        .query::<(&Transform, &Collider, Option<&Destructible>)>()
        .iter()
    {
        if destructible.is_some_and(Destructible::is_destroyed) {
            continue;
        }
        index.insert(entity, transform, collider);
    }
}
