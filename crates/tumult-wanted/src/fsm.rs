//! Wanted decay / pursuit finite state machine.
//!
//! Plain data in, plain data out: the caller feeds the observed wanted level
//! every tick and applies the returned decrement through the player's own
//! mutator. No ECS dependency.

use tracing::{debug, info};

use tumult_core::config::WantedTuning;
use tumult_core::constants::BASE_ALERT_RADIUS;
use tumult_core::enums::WantedState;

/// Pursuit transition produced by a single update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PursuitEdge {
    Started { level: u8 },
    Ended,
}

/// Output of one [`WantedSystem::update`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WantedUpdate {
    /// Wanted levels the caller should remove from the player this tick.
    pub levels_to_shed: u8,
    /// Pursuit edge crossed this tick, if any.
    pub pursuit: Option<PursuitEdge>,
    /// Band of the wanted level after applying `levels_to_shed`.
    pub state: WantedState,
}

/// Observer of the player's wanted level. Derived state only: the player
/// owns the authoritative value.
#[derive(Debug, Clone)]
pub struct WantedSystem {
    tuning: WantedTuning,
    decay_timer: f32,
    /// Timer value at which the next decrement is due.
    next_decay_at: f32,
    pursuit_active: bool,
    last_observed_level: u8,
    alert_radius: f32,
}

impl WantedSystem {
    pub fn new(tuning: WantedTuning, initial_level: u8) -> Self {
        let next_decay_at = tuning.decay_delay_secs;
        Self {
            tuning,
            decay_timer: 0.0,
            next_decay_at,
            pursuit_active: false,
            last_observed_level: initial_level,
            alert_radius: BASE_ALERT_RADIUS,
        }
    }

    /// Advance the machine by `dt` seconds given the player's current level.
    pub fn update(&mut self, dt: f32, observed_level: u8) -> WantedUpdate {
        let mut pursuit = None;

        if observed_level > self.last_observed_level {
            self.decay_timer = 0.0;
            self.next_decay_at = self.tuning.decay_delay_secs;
            debug!(
                from = self.last_observed_level,
                to = observed_level,
                "wanted level rose, decay timer reset"
            );
            if observed_level >= self.tuning.pursuit_threshold && !self.pursuit_active {
                self.pursuit_active = true;
                info!(level = observed_level, "authorities are now pursuing the player");
                pursuit = Some(PursuitEdge::Started {
                    level: observed_level,
                });
            }
        }
        self.last_observed_level = observed_level;

        let mut level = observed_level;
        let mut levels_to_shed = 0;

        if level > 0 {
            self.decay_timer += dt;
            if self.decay_timer >= self.next_decay_at && !self.is_recently_active() {
                levels_to_shed = 1;
                level -= 1;
                self.next_decay_at += self.tuning.decay_step_secs();
                self.last_observed_level = level;
                debug!(level, "wanted level decayed");
            }
        } else {
            self.decay_timer = 0.0;
            self.next_decay_at = self.tuning.decay_delay_secs;
        }

        if self.pursuit_active && level < self.tuning.pursuit_threshold && pursuit.is_none() {
            self.pursuit_active = false;
            info!("the pursuit has ended");
            pursuit = Some(PursuitEdge::Ended);
        }

        if self.pursuit_active {
            self.alert_radius = BASE_ALERT_RADIUS * (1.0 + self.intensity_for(level));
        }

        WantedUpdate {
            levels_to_shed,
            pursuit,
            state: classify(level, self.tuning.pursuit_threshold),
        }
    }

    /// Stand-in for "the player is still committing crimes": purely gated on
    /// quiet time since the last increase.
    fn is_recently_active(&self) -> bool {
        self.decay_timer < self.tuning.decay_delay_secs
    }

    fn intensity_for(&self, level: u8) -> f32 {
        if self.tuning.max_level == 0 {
            return 0.0;
        }
        level as f32 / self.tuning.max_level as f32
    }

    pub fn is_pursuit_active(&self) -> bool {
        self.pursuit_active
    }

    pub fn decay_timer(&self) -> f32 {
        self.decay_timer
    }

    pub fn last_observed_level(&self) -> u8 {
        self.last_observed_level
    }

    /// Pursuit intensity in `0..=1` for the last observed level.
    pub fn intensity(&self) -> f32 {
        self.intensity_for(self.last_observed_level)
    }

    /// Distance at which authorities notice the player.
    pub fn alert_radius(&self) -> f32 {
        self.alert_radius
    }

    pub fn state(&self) -> WantedState {
        classify(self.last_observed_level, self.tuning.pursuit_threshold)
    }
}

/// Band a wanted level against the pursuit threshold.
pub fn classify(level: u8, pursuit_threshold: u8) -> WantedState {
    if level == 0 {
        WantedState::Calm
    } else if level < pursuit_threshold {
        WantedState::Wanted
    } else {
        WantedState::Pursued
    }
}
