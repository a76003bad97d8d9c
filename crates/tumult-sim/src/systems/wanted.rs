//! Glue between the player's wanted level and the wanted state machine.

use hecs::World;

use tumult_core::enums::{AlertLevel, SoundId};
use tumult_core::events::GameEvent;
use tumult_core::state::PursuitView;
use tumult_core::types::Transform;
use tumult_wanted::pursuit::{dispatch_edge, PursuitHook};
use tumult_wanted::{PursuitEdge, WantedSystem};

use super::TickOutput;
use crate::entities::Player;

/// Feed the player's level to the state machine and apply its decay
/// through the player's own mutator.
pub fn run(
    world: &mut World,
    player: hecs::Entity,
    wanted: &mut WantedSystem,
    hook: &mut dyn PursuitHook,
    dt: f32,
    out: &mut TickOutput,
) {
    let Ok((player, transform)) = world.query_one_mut::<(&mut Player, &Transform)>(player) else {
        return;
    };
    let observed = player.wanted_level();
    if observed != wanted.last_observed_level() {
        out.events.push(GameEvent::WantedLevelChanged { level: observed });
    }

    let update = wanted.update(dt, observed);
    if update.levels_to_shed > 0 {
        player.decrease_wanted_level(update.levels_to_shed);
        out.events.push(GameEvent::WantedLevelChanged {
            level: player.wanted_level(),
        });
    }

    if let Some(edge) = update.pursuit {
        dispatch_edge(hook, edge);
        match edge {
            PursuitEdge::Started { level } => {
                out.sound(SoundId::Wanted, transform.position);
                out.events.push(GameEvent::PursuitStarted { level });
                out.alert(AlertLevel::Critical, "The authorities are after you");
            }
            PursuitEdge::Ended => {
                out.events.push(GameEvent::PursuitEnded);
                out.alert(AlertLevel::Info, "The authorities lost your trail");
            }
        }
    }
    if wanted.is_pursuit_active() {
        hook.pursuit_tick(wanted.intensity(), wanted.alert_radius(), dt);
    }
}

/// Snapshot view of the state machine.
pub fn view(wanted: &WantedSystem) -> PursuitView {
    PursuitView {
        state: wanted.state(),
        active: wanted.is_pursuit_active(),
        intensity: wanted.intensity(),
        alert_radius: wanted.alert_radius(),
        decay_timer_secs: wanted.decay_timer(),
    }
}
