//! The player avatar.
//!
//! Holds input flags, health, score and wanted level. On foot it walks with
//! ray collision; seated it turns its input into vehicle controls. Attacks
//! and interactions leave as intents.

use glam::Vec3;
use tracing::{debug, info};

use tumult_core::config::PlayerTuning;
use tumult_core::constants::ATTACK_SWING_SCALE;
use tumult_core::enums::InputAction;
use tumult_core::types::{heading_of, wrap_angle, RenderableHandle, Transform};

use super::Visual;
use crate::collision::{MoveContext, MoveOutcome};
use crate::intents::{AttackIntent, DriveIntent, InteractIntent, PlayerIntents};

/// Held directional keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

impl InputState {
    /// Ground-plane walking direction, screen-relative: forward is -Z and
    /// right is +X. Zero when nothing (or opposing keys) is held.
    pub fn walk_direction(&self) -> Vec3 {
        let mut dir = Vec3::ZERO;
        if self.forward {
            dir.z -= 1.0;
        }
        if self.backward {
            dir.z += 1.0;
        }
        if self.left {
            dir.x -= 1.0;
        }
        if self.right {
            dir.x += 1.0;
        }
        dir.normalize_or_zero()
    }

    /// Steering for a vehicle: +1 left, -1 right.
    pub fn steer(&self) -> f32 {
        let mut steer = 0.0;
        if self.left {
            steer += 1.0;
        }
        if self.right {
            steer -= 1.0;
        }
        steer
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    tuning: PlayerTuning,
    max_wanted_level: u8,
    health: i32,
    score: u32,
    wanted_level: u8,
    attack_cooldown: f32,
    swing_remaining: f32,
    vehicle: Option<hecs::Entity>,
    input: InputState,
    pending_attack: bool,
    pending_interact: bool,
    last_move: Option<MoveOutcome>,
    handle: RenderableHandle,
}

impl Player {
    pub fn new(tuning: PlayerTuning, max_wanted_level: u8, handle: RenderableHandle) -> Self {
        Self {
            health: tuning.max_health,
            tuning,
            max_wanted_level,
            score: 0,
            wanted_level: 0,
            attack_cooldown: 0.0,
            swing_remaining: 0.0,
            vehicle: None,
            input: InputState::default(),
            pending_attack: false,
            pending_interact: false,
            last_move: None,
            handle,
        }
    }

    pub fn key_down(&mut self, action: InputAction) {
        match action {
            InputAction::Forward => self.input.forward = true,
            InputAction::Backward => self.input.backward = true,
            InputAction::Left => self.input.left = true,
            InputAction::Right => self.input.right = true,
            InputAction::Attack => self.pending_attack = true,
            InputAction::Interact => self.pending_interact = true,
            InputAction::Mute => {}
        }
    }

    pub fn key_up(&mut self, action: InputAction) {
        match action {
            InputAction::Forward => self.input.forward = false,
            InputAction::Backward => self.input.backward = false,
            InputAction::Left => self.input.left = false,
            InputAction::Right => self.input.right = false,
            InputAction::Attack | InputAction::Interact | InputAction::Mute => {}
        }
    }

    /// Advance one tick: fire latched actions, then walk or drive, then
    /// run down the attack timers.
    pub fn update(
        &mut self,
        transform: &mut Transform,
        dt: f32,
        obstacles: &MoveContext<'_>,
    ) -> PlayerIntents {
        let mut intents = PlayerIntents::default();

        if std::mem::take(&mut self.pending_attack) {
            intents.attack = self.attack(transform);
        }
        if std::mem::take(&mut self.pending_interact) {
            intents.interact = Some(self.interact(transform));
        }

        match self.vehicle {
            Some(vehicle) => {
                let leaving = matches!(intents.interact, Some(InteractIntent::Exit { .. }));
                if !leaving {
                    intents.drive = Some(DriveIntent {
                        vehicle,
                        accelerate: self.input.forward,
                        brake: self.input.backward,
                        steer: self.input.steer(),
                    });
                }
            }
            None => self.walk(transform, dt, obstacles),
        }

        if self.attack_cooldown > 0.0 {
            self.attack_cooldown = (self.attack_cooldown - dt).max(0.0);
        }
        if self.swing_remaining > 0.0 {
            self.swing_remaining = (self.swing_remaining - dt).max(0.0);
        }

        intents
    }

    fn walk(&mut self, transform: &mut Transform, dt: f32, obstacles: &MoveContext<'_>) {
        let direction = self.input.walk_direction();
        if direction == Vec3::ZERO {
            self.last_move = None;
            return;
        }

        let displacement = direction * self.tuning.speed * dt;
        let (position, outcome) = obstacles.resolve(transform.position, displacement);
        transform.position = position;
        self.last_move = Some(outcome);
        if outcome == MoveOutcome::Blocked {
            debug!(?position, "movement blocked");
        }

        let diff = wrap_angle(heading_of(direction) - transform.yaw);
        let step = (self.tuning.rotation_speed * dt).min(1.0);
        transform.yaw = wrap_angle(transform.yaw + diff * step);
    }

    /// Start a swing. No-op while cooling down or seated.
    pub fn attack(&mut self, transform: &Transform) -> Option<AttackIntent> {
        if self.attack_cooldown > 0.0 || self.vehicle.is_some() {
            return None;
        }
        self.attack_cooldown = self.tuning.attack_cooldown;
        self.swing_remaining = self.tuning.attack_duration;
        debug!("player attacked");
        Some(AttackIntent {
            origin: transform.position,
            facing: transform.forward(),
            power: self.tuning.attack_power,
            radius: self.tuning.attack_radius,
        })
    }

    /// Exit the occupied vehicle, or look for one to board.
    pub fn interact(&mut self, transform: &Transform) -> InteractIntent {
        match self.vehicle {
            Some(vehicle) => InteractIntent::Exit { vehicle },
            None => InteractIntent::Board {
                origin: transform.position,
                radius: self.tuning.interact_radius,
            },
        }
    }

    /// Record a successful boarding.
    pub fn board(&mut self, vehicle: hecs::Entity) {
        self.vehicle = Some(vehicle);
        self.last_move = None;
    }

    pub fn leave_vehicle(&mut self) {
        self.vehicle = None;
    }

    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    pub fn increase_wanted_level(&mut self, amount: u8) {
        let before = self.wanted_level;
        self.wanted_level = self
            .wanted_level
            .saturating_add(amount)
            .min(self.max_wanted_level);
        if self.wanted_level != before {
            info!(level = self.wanted_level, "wanted level increased");
        }
    }

    pub fn decrease_wanted_level(&mut self, amount: u8) {
        let before = self.wanted_level;
        self.wanted_level = self.wanted_level.saturating_sub(amount);
        if self.wanted_level != before {
            info!(level = self.wanted_level, "wanted level decreased");
        }
    }

    pub fn damage(&mut self, amount: i32) {
        self.health = (self.health - amount.max(0)).max(0);
    }

    pub fn heal(&mut self, amount: i32) {
        self.health = (self.health + amount.max(0)).min(self.tuning.max_health);
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn health_percent(&self) -> f32 {
        self.health as f32 / self.tuning.max_health as f32 * 100.0
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn wanted_level(&self) -> u8 {
        self.wanted_level
    }

    pub fn collision_radius(&self) -> f32 {
        self.tuning.collision_radius
    }

    pub fn is_attacking(&self) -> bool {
        self.swing_remaining > 0.0
    }

    pub fn vehicle(&self) -> Option<hecs::Entity> {
        self.vehicle
    }

    pub fn is_in_vehicle(&self) -> bool {
        self.vehicle.is_some()
    }

    pub fn input(&self) -> InputState {
        self.input
    }

    /// How the most recent walking step was resolved.
    pub fn last_move(&self) -> Option<MoveOutcome> {
        self.last_move
    }

    pub fn renderable(&self) -> RenderableHandle {
        self.handle
    }

    /// Hidden while seated, widened during a swing.
    pub fn visual(&self) -> Visual {
        Visual {
            visible: self.vehicle.is_none(),
            scale: if self.is_attacking() {
                ATTACK_SWING_SCALE
            } else {
                1.0
            },
        }
    }
}
