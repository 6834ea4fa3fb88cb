//! Accelerometer input mapping

use serde::{Deserialize, Serialize};

/// Raw accelerometer reading in g
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AccelSample {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl AccelSample {
    pub fn tilt(x: f32) -> Self {
        Self { x, y: 0.0, z: -1.0 }
    }
}

/// Maps tilt to horizontal ball velocity, no smoothing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiltInput {
    pub sensitivity: f32,
}

impl TiltInput {
    pub fn new(sensitivity: f32) -> Self {
        Self { sensitivity }
    }

    pub fn horizontal_velocity(&self, sample: AccelSample) -> f32 {
        sample.x * self.sensitivity
    }
}
