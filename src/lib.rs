//! Tilt Gap - a tilt-controlled falling ball arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, clock, scene)
//! - `settings`: Data-driven tuning and configuration
//! - `results`: Win/loss destination payload and fetch contract
//! - `host`: Glue between the scene, the result fetch and navigation
//! - `demo`: Autopilot input for headless runs

pub mod demo;
pub mod host;
pub mod results;
pub mod settings;
pub mod sim;

pub use host::GameHost;
pub use results::{Destinations, FetchError, Navigator, ResultSource};
pub use settings::{Settings, SettingsError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (100 Hz, matches the gap oscillation tick)
    pub const SIM_DT: f32 = 0.01;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 10;

    /// Scene dimensions (portrait phone)
    pub const SCENE_WIDTH: f32 = 390.0;
    pub const SCENE_HEIGHT: f32 = 844.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 20.0;
    /// Constant downward speed of the ball (units/s)
    pub const BALL_FALL_SPEED: f32 = 1000.0;
    /// Accelerometer x to horizontal velocity
    pub const TILT_SENSITIVITY: f32 = 750.0;

    /// Strip defaults
    pub const STRIP_HEIGHT: f32 = 5.0;
    pub const GAP_WIDTH: f32 = 50.0;
    /// Seconds between strip pairs
    pub const SPAWN_PERIOD: f32 = 3.0;
    /// Seconds between gap oscillation steps
    pub const OSCILLATION_INTERVAL: f32 = 0.01;
    /// Units the gap shifts per oscillation step
    pub const OSCILLATION_STEP: f32 = 1.0;
    /// Strip rise speed relative to the ball fall speed
    pub const MOVEMENT_COEFFICIENT: f32 = 1.0 / 25.0;

    /// Star defaults
    pub const STAR_SIZE: f32 = 40.0;
    pub const FLOOR_STAR_SPIKES: u32 = 10;
    pub const MOUNTED_STAR_SPIKES: u32 = 8;

    /// Round length in whole seconds
    pub const WIN_SECONDS: u32 = 30;
    /// Seconds per elapsed-counter tick
    pub const CLOCK_INTERVAL: f32 = 1.0;

    /// Start button size
    pub const BUTTON_WIDTH: f32 = 150.0;
    pub const BUTTON_HEIGHT: f32 = 50.0;

    /// Remote endpoint serving the winner/loser URLs
    pub const RESULT_ENDPOINT: &str = "https://2llctw8ia5.execute-api.us-west-1.amazonaws.com/prod";
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Number of whole simulation ticks covering `secs` (at least one)
#[inline]
pub fn secs_to_ticks(secs: f32) -> u32 {
    ((secs / consts::SIM_DT).round() as u32).max(1)
}
