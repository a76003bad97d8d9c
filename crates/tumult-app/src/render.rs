//! Renderer boundary.

use tracing::{debug, info};

use tumult_core::state::{CameraView, RenderableView};

pub trait Renderer {
    /// Draw one frame of the scene from the camera.
    fn render(&mut self, scene: &[RenderableView], camera: &CameraView);

    fn resize(&mut self, width: u32, height: u32);

    /// Free GPU-side resources. Called once when the loop stops.
    fn release_resources(&mut self);
}

/// Renderer without a surface. Counts what it would have drawn.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    frames: u64,
    last_visible: usize,
    last_particles: usize,
    size: (u32, u32),
    released: bool,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn last_visible(&self) -> usize {
        self.last_visible
    }

    pub fn last_particles(&self) -> usize {
        self.last_particles
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl Renderer for HeadlessRenderer {
    fn render(&mut self, scene: &[RenderableView], camera: &CameraView) {
        let visible = scene.iter().filter(|r| r.visible);
        self.last_visible = visible.clone().count();
        self.last_particles = visible.map(|r| r.particles.len()).sum();
        self.frames += 1;
        if self.frames % 600 == 0 {
            debug!(
                frames = self.frames,
                visible = self.last_visible,
                target = ?camera.target,
                "headless frame"
            );
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    fn release_resources(&mut self) {
        if !self.released {
            info!(frames = self.frames, "renderer released");
            self.released = true;
        }
    }
}
