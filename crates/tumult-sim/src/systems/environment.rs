//! Cosmetic world state: the follow camera and the day/night cycle.
//!
//! Neither feeds back into gameplay; both only fill snapshot views.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, TAU};

use glam::Vec3;

use tumult_core::constants::{
    CAMERA_DEFAULT_HEIGHT, CAMERA_FOLLOW_RETAIN, CAMERA_MAX_HEIGHT, CAMERA_MIN_HEIGHT,
};
use tumult_core::state::{CameraView, LightingView};

const SUN_DISTANCE: f32 = 100.0;

/// Top-down camera that eases toward its target.
#[derive(Debug, Clone, Copy)]
pub struct CameraRig {
    target: Vec3,
    height: f32,
    aspect: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            height: CAMERA_DEFAULT_HEIGHT,
            aspect: 16.0 / 9.0,
        }
    }
}

impl CameraRig {
    /// Ease toward `target`, frame-rate independently: after one second
    /// only `CAMERA_FOLLOW_RETAIN` of the gap remains.
    pub fn follow(&mut self, target: Vec3, dt: f32) {
        let factor = 1.0 - CAMERA_FOLLOW_RETAIN.powf(dt);
        self.target = self.target.lerp(target, factor);
    }

    /// Jump straight to `target`.
    pub fn snap(&mut self, target: Vec3) {
        self.target = target;
    }

    pub fn set_height(&mut self, height: f32) {
        self.height = height.clamp(CAMERA_MIN_HEIGHT, CAMERA_MAX_HEIGHT);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn view(&self) -> CameraView {
        CameraView {
            target: self.target,
            height: self.height,
            aspect: self.aspect,
        }
    }
}

/// Lighting for a point in the day. 0 is midnight, 0.5 noon.
pub fn lighting(elapsed_secs: f64, day_duration_secs: f32) -> LightingView {
    let day = day_duration_secs.max(f32::EPSILON) as f64;
    let time_of_day = (elapsed_secs.rem_euclid(day) / day) as f32;

    let sun_angle = time_of_day * TAU - FRAC_PI_2;
    let sun_height = sun_angle.sin();
    let daylight = sun_height.max(0.0);

    let sky_color = if sun_height > 0.0 {
        [
            0.53 - sun_height * 0.2,
            0.81 - sun_height * 0.1,
            0.92 + sun_height * 0.08,
        ]
    } else {
        let night = sun_height.abs();
        [0.05, 0.05 + (1.0 - night) * 0.1, 0.2 + (1.0 - night) * 0.2]
    };

    LightingView {
        time_of_day,
        sun_position: Vec3::new(
            sun_angle.cos() * SUN_DISTANCE,
            daylight * 70.0 + 10.0,
            (sun_angle + FRAC_PI_4).sin() * SUN_DISTANCE,
        ),
        sun_intensity: 0.5 + daylight * 0.5,
        ambient_intensity: 0.2 + daylight * 0.3,
        hemisphere_intensity: 0.3 + daylight * 0.3,
        sky_color,
    }
}
