//! Snapshot system: reads the world and builds a `GameStateSnapshot`.
//!
//! Read-only. Nothing here modifies the world.

use hecs::World;

use tumult_core::enums::SessionPhase;
use tumult_core::state::*;
use tumult_core::types::{SimTime, Transform};

use super::TickOutput;
use crate::entities::{Destructible, Entity, Player, Vehicle, Visual};
use crate::renderables::Renderable;

/// Session-level inputs to a snapshot besides the world itself.
#[derive(Debug, Clone, Copy)]
pub struct SnapshotContext {
    pub time: SimTime,
    pub phase: SessionPhase,
    pub player: Option<hecs::Entity>,
    pub camera: CameraView,
    pub lighting: LightingView,
    pub pursuit: PursuitView,
    pub audio: Option<AudioView>,
}

pub fn build_snapshot(world: &World, ctx: SnapshotContext, output: TickOutput) -> GameStateSnapshot {
    let player = ctx.player.and_then(|entity| build_player(world, entity));
    let hud = ctx
        .player
        .and_then(|entity| world.get::<&Player>(entity).ok().map(|p| build_hud(&p)))
        .unwrap_or_default();

    GameStateSnapshot {
        time: ctx.time,
        phase: ctx.phase,
        hud,
        player,
        props: build_props(world),
        vehicles: build_vehicles(world),
        renderables: build_renderables(world),
        camera: ctx.camera,
        lighting: ctx.lighting,
        pursuit: ctx.pursuit,
        audio: ctx.audio,
        sound_requests: output.sounds,
        events: output.events,
        alerts: output.alerts,
    }
}

fn build_hud(player: &Player) -> HudView {
    HudView {
        score: player.score(),
        health_percent: player.health_percent(),
        wanted_level: player.wanted_level(),
    }
}

fn build_player(world: &World, entity: hecs::Entity) -> Option<PlayerView> {
    let mut query = world.query_one::<(&Player, &Transform)>(entity).ok()?;
    let (player, transform) = query.get()?;
    Some(PlayerView {
        position: transform.position,
        yaw: transform.yaw,
        health: player.health(),
        in_vehicle: player.is_in_vehicle(),
        attacking: player.is_attacking(),
    })
}

fn build_props(world: &World) -> Vec<PropView> {
    world
        .query::<(&Destructible, &Transform)>()
        .iter()
        .map(|(_, (prop, transform))| PropView {
            kind: prop.kind,
            position: transform.position,
            health: prop.health(),
            max_health: prop.max_health(),
            destroyed: prop.is_destroyed(),
            debris_count: prop.debris().map_or(0, |d| d.len()),
        })
        .collect()
}

fn build_vehicles(world: &World) -> Vec<VehicleView> {
    world
        .query::<(&Vehicle, &Transform)>()
        .iter()
        .map(|(_, (vehicle, transform))| VehicleView {
            kind: vehicle.kind,
            position: transform.position,
            yaw: transform.yaw,
            speed: vehicle.speed(),
            speed_percent: vehicle.speed_percent(),
            health_percent: vehicle.health_percent(),
            occupied: vehicle.is_occupied(),
        })
        .collect()
}

/// One view per renderable. Debris particles ride on their prop's
/// renderable, converted to world space.
fn build_renderables(world: &World) -> Vec<RenderableView> {
    world
        .query::<(
            &Renderable,
            &Transform,
            Option<&Destructible>,
            Option<&Player>,
            Option<&Vehicle>,
        )>()
        .iter()
        .map(|(_, (renderable, transform, prop, player, vehicle))| {
            let visual = match (prop, player, vehicle) {
                (Some(prop), _, _) => prop.visual(),
                (_, Some(player), _) => player.visual(),
                (_, _, Some(vehicle)) => vehicle.visual(),
                _ => Visual::default(),
            };
            let particles = prop
                .and_then(Destructible::debris)
                .map(|debris| {
                    debris
                        .positions
                        .iter()
                        .map(|p| transform.local_to_world(*p))
                        .collect()
                })
                .unwrap_or_default();
            RenderableView {
                handle: renderable.handle,
                position: transform.position,
                yaw: transform.yaw,
                scale: visual.scale,
                visible: visual.visible,
                particles,
            }
        })
        .collect()
}
