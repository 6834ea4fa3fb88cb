//! Game settings and tuning
//!
//! Defaults reproduce the shipped game. A JSON file can override any subset of
//! fields; missing fields keep their defaults.

use std::fmt;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::physics::EdgeLoop;

/// Environment variable naming an optional settings JSON file
pub const SETTINGS_ENV: &str = "TILT_GAP_SETTINGS";

/// Errors raised while loading settings
#[derive(Debug)]
pub enum SettingsError {
    /// Settings file could not be read
    Io(std::io::Error),
    /// Settings JSON was malformed
    Parse(serde_json::Error),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io(e) => write!(f, "failed to read settings: {}", e),
            SettingsError::Parse(e) => write!(f, "failed to parse settings: {}", e),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Io(e) => Some(e),
            SettingsError::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(e: std::io::Error) -> Self {
        SettingsError::Io(e)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        SettingsError::Parse(e)
    }
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Scene ===
    pub scene_width: f32,
    pub scene_height: f32,
    /// Inset from the top edge reserved by the device (notch/status bar)
    pub safe_area_top: f32,
    /// Which sides of the scene frame hold the ball in
    pub edge_loop: EdgeLoop,
    /// World gravity applied to gravity-affected bodies
    pub gravity: Vec2,

    // === Ball ===
    pub ball_radius: f32,
    pub ball_fall_speed: f32,
    pub tilt_sensitivity: f32,

    // === Strips ===
    pub strip_height: f32,
    pub gap_width: f32,
    pub spawn_period: f32,
    pub oscillation_interval: f32,
    pub oscillation_step: f32,
    pub movement_coefficient: f32,

    // === Stars ===
    pub star_size: f32,
    pub floor_star_spikes: u32,
    pub mounted_star_spikes: u32,

    // === Round ===
    pub win_seconds: u32,
    pub clock_interval: f32,
    /// Seed for strip placement
    pub seed: u64,

    // === Results ===
    pub result_endpoint: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scene_width: SCENE_WIDTH,
            scene_height: SCENE_HEIGHT,
            safe_area_top: 0.0,
            edge_loop: EdgeLoop::SidesOnly,
            gravity: Vec2::ZERO,

            ball_radius: BALL_RADIUS,
            ball_fall_speed: BALL_FALL_SPEED,
            tilt_sensitivity: TILT_SENSITIVITY,

            strip_height: STRIP_HEIGHT,
            gap_width: GAP_WIDTH,
            spawn_period: SPAWN_PERIOD,
            oscillation_interval: OSCILLATION_INTERVAL,
            oscillation_step: OSCILLATION_STEP,
            movement_coefficient: MOVEMENT_COEFFICIENT,

            star_size: STAR_SIZE,
            floor_star_spikes: FLOOR_STAR_SPIKES,
            mounted_star_spikes: MOUNTED_STAR_SPIKES,

            win_seconds: WIN_SECONDS,
            clock_interval: CLOCK_INTERVAL,
            seed: 0x7417_6a90,

            result_endpoint: RESULT_ENDPOINT.to_string(),
        }
    }
}

impl Settings {
    /// Scene size as a vector
    pub fn scene_size(&self) -> Vec2 {
        Vec2::new(self.scene_width, self.scene_height)
    }

    /// Ball diameter, the narrowest a strip may get before the gap turns back
    pub fn ball_diameter(&self) -> f32 {
        self.ball_radius * 2.0
    }

    /// Seconds a strip pair takes to scroll from the bottom edge off the top
    pub fn travel_secs(&self) -> f32 {
        self.scene_height / (self.ball_fall_speed * self.movement_coefficient)
    }

    /// Parse settings from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read settings from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Load settings from the file named by `TILT_GAP_SETTINGS`, falling back to defaults
    pub fn load() -> Self {
        let Some(path) = std::env::var_os(SETTINGS_ENV) else {
            log::info!("Using default settings");
            return Self::default();
        };

        match Self::from_file(&path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.to_string_lossy());
                settings
            }
            Err(e) => {
                log::warn!("{}; using default settings", e);
                Self::default()
            }
        }
    }
}
