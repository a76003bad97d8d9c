//! Simulation constants and tuning defaults.
//!
//! Values that a session may override live in [`crate::config::Tuning`];
//! the constants here are its defaults plus fixed rules of the world.

/// Target display frame rate the host paces ticks at (Hz).
pub const TARGET_FPS: u32 = 60;

/// Largest dt a single tick may consume (seconds). Longer stalls are clamped.
pub const MAX_FRAME_DT: f32 = 0.1;

/// Downward acceleration applied to debris (m/s²).
pub const GRAVITY: f32 = 9.8;

// --- Player ---

/// Walking speed (units/s).
pub const PLAYER_SPEED: f32 = 10.0;

/// Rotation easing rate toward the movement heading (1/s).
pub const PLAYER_ROTATION_SPEED: f32 = 2.0;

/// Radius used by the collision ray set.
pub const PLAYER_COLLISION_RADIUS: f32 = 0.5;

/// Height above the player's feet at which collision rays are cast.
pub const PLAYER_RAY_HEIGHT: f32 = 0.9;

/// Height of the body column. Obstacle parts entirely above it (canopies)
/// or below the ground never block.
pub const PLAYER_HEIGHT: f32 = 1.8;

pub const PLAYER_MAX_HEALTH: i32 = 100;

/// Length of the swing animation window (seconds).
pub const ATTACK_DURATION: f32 = 0.3;

/// Cooldown between attacks (seconds).
pub const ATTACK_COOLDOWN: f32 = 0.5;

/// Damage dealt by one attack.
pub const ATTACK_POWER: i32 = 20;

/// Reach of an attack (units).
pub const ATTACK_RADIUS: f32 = 2.0;

/// Minimum dot product between facing and direction-to-target (~60° half-angle).
pub const ATTACK_CONE_DOT: f32 = 0.5;

/// Radius within which an interact can board a vehicle.
pub const INTERACT_RADIUS: f32 = 2.0;

/// Scale of the player mesh while swinging.
pub const ATTACK_SWING_SCALE: f32 = 1.2;

// --- Collision ---

/// Ray length along the movement direction is `radius + |displacement| * this`.
pub const MOVE_RAY_OVERSHOOT: f32 = 1.1;

/// Probe ray length as a fraction of the collision radius.
pub const PROBE_RADIUS_FACTOR: f32 = 0.9;

/// Fallback step fractions tried when both axis slides are blocked.
pub const SLIDE_STEP_FRACTIONS: [f32; 3] = [0.75, 0.5, 0.25];

/// Push-back magnitude as a fraction of the collision radius.
pub const PUSH_BACK_FACTOR: f32 = 0.2;

/// Cell size of the collision broad-phase grid (units).
pub const SPATIAL_CELL_SIZE: f32 = 8.0;

// --- Vehicles ---

pub const VEHICLE_MAX_SPEED: f32 = 15.0;
pub const VEHICLE_ACCELERATION: f32 = 5.0;
/// Friction applied when nothing is pushing the vehicle (units/s²).
pub const VEHICLE_DECELERATION: f32 = 8.0;
/// Base turn rate at full speed (rad/s).
pub const VEHICLE_TURN_SPEED: f32 = 1.5;
/// Below this absolute speed steering has no effect.
pub const VEHICLE_MIN_TURN_SPEED: f32 = 0.5;
pub const VEHICLE_MAX_HEALTH: i32 = 100;
/// Wheel spin per unit travelled (radians).
pub const WHEEL_SPIN_FACTOR: f32 = 0.5;

/// Seat exit point in the vehicle's local frame.
pub const VEHICLE_EXIT_OFFSET: [f32; 3] = [2.0, 0.0, 0.0];

// --- Destructibles ---

/// Score and wanted contribution for most props.
pub const DEFAULT_WANTED_DELTA: f32 = 0.2;
/// Market stalls draw more attention.
pub const STALL_WANTED_DELTA: f32 = 0.5;

/// Debris batch size range (inclusive min, exclusive max).
pub const DEBRIS_MIN_PARTICLES: usize = 20;
pub const DEBRIS_MAX_PARTICLES: usize = 40;

/// Debris is released once every particle is below this height.
pub const DEBRIS_FLOOR: f32 = -5.0;

/// Maximum upward launch speed of a debris particle.
pub const DEBRIS_MAX_UP_SPEED: f32 = 5.0;

/// Half-range of horizontal debris launch speed.
pub const DEBRIS_MAX_SIDE_SPEED: f32 = 1.0;

// --- Wanted level ---

pub const MAX_WANTED_LEVEL: u8 = 5;

/// Quiet time before the wanted level starts to decay (seconds).
pub const WANTED_DECAY_DELAY: f32 = 30.0;

/// Wanted levels shed per second once decaying.
pub const WANTED_DECAY_RATE: f32 = 0.1;

/// Wanted level at which pursuit begins.
pub const PURSUIT_THRESHOLD: u8 = 2;

/// Alert radius of authorities at zero pursuit intensity.
pub const BASE_ALERT_RADIUS: f32 = 100.0;

// --- World ---

/// Length of a full day/night cycle (seconds).
pub const DAY_DURATION_SECS: f32 = 300.0;

/// Half-extent of the square area buildings are scattered over.
pub const BUILDING_SCATTER_HALF_EXTENT: f32 = 100.0;

pub const BUILDING_COUNT: usize = 10;

/// Ground plane and grid overlay size.
pub const GROUND_SIZE: f32 = 1000.0;

// --- Camera ---

pub const CAMERA_DEFAULT_HEIGHT: f32 = 15.0;
pub const CAMERA_MIN_HEIGHT: f32 = 8.0;
pub const CAMERA_MAX_HEIGHT: f32 = 25.0;
/// Fraction of the remaining distance left after one second of following.
pub const CAMERA_FOLLOW_RETAIN: f32 = 0.1;
