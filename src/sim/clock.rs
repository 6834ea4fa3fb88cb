//! Tick countdowns and the round clock

use serde::{Deserialize, Serialize};

use crate::secs_to_ticks;

/// Repeating countdown measured in whole simulation ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    pub period: u32,
    pub remaining: u32,
}

impl Countdown {
    pub fn new(period_ticks: u32) -> Self {
        let period = period_ticks.max(1);
        Self {
            period,
            remaining: period,
        }
    }

    pub fn from_secs(secs: f32) -> Self {
        Self::new(secs_to_ticks(secs))
    }

    /// Advance one tick; returns true when the countdown fires (and rearms)
    pub fn tick(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.remaining = self.period;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.remaining = self.period;
    }
}

/// What a clock tick produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockEvent {
    /// Nothing visible changed
    Idle,
    /// Elapsed counter advanced to this value
    Second(u32),
    /// Elapsed counter reached the win time
    Won(u32),
}

/// Elapsed-seconds counter driven by a one-interval countdown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameClock {
    pub elapsed: u32,
    pub win_seconds: u32,
    countdown: Countdown,
    running: bool,
}

impl GameClock {
    pub fn new(interval_secs: f32, win_seconds: u32) -> Self {
        Self {
            elapsed: 0,
            win_seconds,
            countdown: Countdown::from_secs(interval_secs),
            running: false,
        }
    }

    /// Zero the counter and start ticking
    pub fn start(&mut self) {
        self.elapsed = 0;
        self.countdown.reset();
        self.running = true;
    }

    /// Invalidate the ticker and zero the counter
    pub fn stop(&mut self) {
        self.running = false;
        self.elapsed = 0;
        self.countdown.reset();
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn tick(&mut self) -> ClockEvent {
        if !self.running || !self.countdown.tick() {
            return ClockEvent::Idle;
        }
        self.elapsed += 1;
        if self.elapsed >= self.win_seconds {
            ClockEvent::Won(self.elapsed)
        } else {
            ClockEvent::Second(self.elapsed)
        }
    }
}
