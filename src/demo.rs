//! Autopilot for headless rounds
//!
//! Produces an accelerometer sample that steers the ball toward the gap of
//! the nearest strip pair below it, or back to the middle when none is.

use crate::sim::{AccelSample, Scene};

/// Proportional tilt controller
#[derive(Debug, Clone, Copy)]
pub struct Autopilot {
    /// Horizontal error (scene units) that maps to full tilt
    pub full_tilt_error: f32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            full_tilt_error: 40.0,
        }
    }
}

impl Autopilot {
    /// Horizontal position the ball should head for
    pub fn target_x(&self, scene: &Scene) -> f32 {
        let ball = scene.ball_position();
        scene
            .spawner()
            .pairs()
            .iter()
            .filter(|p| p.strip_y() < ball.y)
            .max_by(|a, b| a.strip_y().total_cmp(&b.strip_y()))
            .map(|p| p.gap_center())
            .unwrap_or(scene.settings().scene_width * 0.5)
    }

    pub fn sample(&self, scene: &Scene) -> AccelSample {
        let error = self.target_x(scene) - scene.ball_position().x;
        AccelSample::tilt((error / self.full_tilt_error).clamp(-1.0, 1.0))
    }
}
