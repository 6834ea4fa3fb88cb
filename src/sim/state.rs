//! Round state types

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{BUTTON_HEIGHT, BUTTON_WIDTH};

/// How a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Loss,
}

/// Current phase of the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for a start tap (button visible once presented)
    Idle,
    /// Ball falling, strips spawning, clock ticking
    Running,
    /// Round over; rests here until the next presentation arms a new round
    Ended(Outcome),
}

/// Per-round session flags, replaced wholesale on start and end
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub elapsed: u32,
    pub started: bool,
    pub paused: bool,
    /// A round is armed (button shown) or in progress
    pub armed: bool,
}

impl Session {
    /// Fresh session for a round that has just been started
    pub fn running() -> Self {
        Self {
            elapsed: 0,
            started: true,
            paused: false,
            armed: true,
        }
    }
}

/// Start button with press feedback
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StartButton {
    pub center: Vec2,
    pub size: Vec2,
    pub visible: bool,
    pub pressed: bool,
    pub scale: f32,
    pub alpha: f32,
}

impl StartButton {
    pub const PRESSED_SCALE: f32 = 0.9;
    pub const PRESSED_ALPHA: f32 = 0.8;

    pub fn new(center: Vec2) -> Self {
        Self {
            center,
            size: Vec2::new(BUTTON_WIDTH, BUTTON_HEIGHT),
            visible: false,
            pressed: false,
            scale: 1.0,
            alpha: 1.0,
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        let half = self.size * 0.5;
        let d = (point - self.center).abs();
        d.x <= half.x && d.y <= half.y
    }

    pub fn show(&mut self) {
        self.visible = true;
        self.release();
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.release();
    }

    pub fn press(&mut self) {
        self.pressed = true;
        self.scale = Self::PRESSED_SCALE;
        self.alpha = Self::PRESSED_ALPHA;
    }

    pub fn release(&mut self) {
        self.pressed = false;
        self.scale = 1.0;
        self.alpha = 1.0;
    }
}
