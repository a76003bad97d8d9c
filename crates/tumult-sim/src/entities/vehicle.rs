//! Drivable vehicles.
//!
//! Speed is a signed scalar along the vehicle's forward axis (local +Z).
//! A vehicle has one seat; the seated entity is recorded by id only.

use glam::Vec3;
use tracing::{info, trace};

use tumult_core::config::VehicleTuning;
use tumult_core::constants::{VEHICLE_EXIT_OFFSET, WHEEL_SPIN_FACTOR};
use tumult_core::enums::VehicleKind;
use tumult_core::types::{wrap_angle, RenderableHandle, Transform};

use super::Entity;

/// Result of damaging a vehicle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleDamage {
    /// The hit took the vehicle to zero health.
    pub wrecked: bool,
    /// Driver thrown out by the wreck, with their new position.
    pub ejected: Option<(hecs::Entity, Vec3)>,
}

#[derive(Debug, Clone)]
pub struct Vehicle {
    pub kind: VehicleKind,
    tuning: VehicleTuning,
    speed: f32,
    health: i32,
    driver: Option<hecs::Entity>,
    /// Accumulated wheel rotation (radians).
    wheel_spin: f32,
    /// Set by accelerate/brake, cleared each update. Friction only applies
    /// on ticks without throttle.
    throttle: bool,
    handle: RenderableHandle,
}

impl Vehicle {
    pub fn new(kind: VehicleKind, tuning: VehicleTuning, handle: RenderableHandle) -> Self {
        Self {
            kind,
            health: tuning.max_health,
            tuning,
            speed: 0.0,
            driver: None,
            wheel_spin: 0.0,
            throttle: false,
            handle,
        }
    }

    pub fn accelerate(&mut self, dt: f32) {
        self.speed = (self.speed + self.tuning.acceleration * dt).min(self.tuning.max_speed);
        self.throttle = true;
    }

    /// Brake, then reverse down to half the top speed.
    pub fn brake(&mut self, dt: f32) {
        self.speed =
            (self.speed - self.tuning.acceleration * 2.0 * dt).max(-self.tuning.max_speed / 2.0);
        self.throttle = true;
    }

    /// Steer. `direction` +1 turns left (yaw increases), -1 right. Has no
    /// effect at crawling speed and is scaled by the speed fraction.
    pub fn turn(&mut self, transform: &mut Transform, direction: f32, dt: f32) {
        if self.speed.abs() <= self.tuning.min_turn_speed {
            return;
        }
        let amount =
            direction * self.tuning.turn_speed * dt * (self.speed / self.tuning.max_speed);
        transform.yaw = wrap_angle(transform.yaw + amount);
    }

    /// Seat `entity`. Fails when the seat is taken.
    pub fn enter(&mut self, entity: hecs::Entity) -> bool {
        if self.driver.is_some() {
            return false;
        }
        self.driver = Some(entity);
        info!(kind = ?self.kind, "vehicle entered");
        true
    }

    /// Free the seat. Returns the departing entity and where it should
    /// stand: a fixed offset to the vehicle's side.
    pub fn exit(&mut self, transform: &Transform) -> Option<(hecs::Entity, Vec3)> {
        let driver = self.driver.take()?;
        let position = transform.local_to_world(Vec3::from_array(VEHICLE_EXIT_OFFSET));
        info!(kind = ?self.kind, "vehicle exited");
        Some((driver, position))
    }

    pub fn damage(&mut self, amount: i32, transform: &Transform) -> VehicleDamage {
        if self.health <= 0 {
            return VehicleDamage {
                wrecked: false,
                ejected: None,
            };
        }
        self.health = (self.health - amount.max(0)).max(0);
        if self.health > 0 {
            return VehicleDamage {
                wrecked: false,
                ejected: None,
            };
        }
        info!(kind = ?self.kind, "vehicle wrecked");
        VehicleDamage {
            wrecked: true,
            ejected: self.exit(transform),
        }
    }

    pub fn repair(&mut self, amount: i32) {
        self.health = (self.health + amount.max(0)).min(self.tuning.max_health);
    }

    pub fn is_occupied(&self) -> bool {
        self.driver.is_some()
    }

    pub fn driver(&self) -> Option<hecs::Entity> {
        self.driver
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn is_wrecked(&self) -> bool {
        self.health <= 0
    }

    pub fn health_percent(&self) -> f32 {
        self.health as f32 / self.tuning.max_health as f32 * 100.0
    }

    pub fn speed_percent(&self) -> f32 {
        self.speed.abs() / self.tuning.max_speed * 100.0
    }

    pub fn wheel_spin(&self) -> f32 {
        self.wheel_spin
    }
}

impl Entity for Vehicle {
    fn update(&mut self, transform: &mut Transform, dt: f32) {
        if !self.throttle {
            let friction = self.tuning.deceleration * dt;
            self.speed = if self.speed > 0.0 {
                (self.speed - friction).max(0.0)
            } else {
                (self.speed + friction).min(0.0)
            };
        }
        self.throttle = false;

        let distance = self.speed * dt;
        if distance != 0.0 {
            transform.position += transform.forward() * distance;
            trace!(kind = ?self.kind, speed = self.speed, "vehicle moved");
        }
        self.wheel_spin += distance * WHEEL_SPIN_FACTOR;
    }

    fn renderable(&self) -> RenderableHandle {
        self.handle
    }
}
