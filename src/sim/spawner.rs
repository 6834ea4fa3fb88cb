//! Strip pair spawning, gap oscillation and scrolling
//!
//! Every spawn period a pair of strips is laid along the bottom edge with a
//! gap between them. Each pair then rises off the top of the scene while its
//! gap slides left and right on its own oscillation countdown.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::clock::Countdown;
use super::physics::{BodyDesc, BodyId, EntityKind, PhysicsWorld, Shape};
use super::star::{Polygon, star_polygon};
use crate::secs_to_ticks;
use crate::settings::Settings;

/// Which way the gap is currently sliding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Left strip widens, right strip narrows
    Right,
    /// Right strip widens, left strip narrows
    Left,
}

impl Direction {
    pub fn reversed(self) -> Self {
        match self {
            Direction::Right => Direction::Left,
            Direction::Left => Direction::Right,
        }
    }
}

/// Which strip segment carries the mounted star
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Segment {
    Left,
    Right,
}

/// A live left/right strip pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripPair {
    pub left: BodyId,
    pub right: BodyId,
    pub star: Option<BodyId>,
    /// Segment the star was placed on, if any
    pub star_segment: Option<Segment>,
    pub left_width: f32,
    pub right_width: f32,
    pub gap_width: f32,
    pub direction: Direction,
    /// Ticks since spawn
    pub elapsed: u32,
    /// Ticks until the pair leaves the scene
    pub travel: u32,
    oscillation: Countdown,
    strip_y0: f32,
    star_y0: f32,
    rise: f32,
}

impl StripPair {
    pub fn gap_left_edge(&self) -> f32 {
        self.left_width
    }

    pub fn gap_right_edge(&self) -> f32 {
        self.left_width + self.gap_width
    }

    pub fn gap_center(&self) -> f32 {
        self.left_width + self.gap_width * 0.5
    }

    /// Total span covered by both strips and the gap
    pub fn span(&self) -> f32 {
        self.left_width + self.gap_width + self.right_width
    }

    /// Current vertical offset travelled since spawn
    pub fn offset(&self) -> f32 {
        self.rise * self.elapsed as f32 / self.travel as f32
    }

    /// Current strip center height
    pub fn strip_y(&self) -> f32 {
        self.strip_y0 + self.offset()
    }

    fn narrowing_width(&self) -> f32 {
        match self.direction {
            Direction::Right => self.right_width,
            Direction::Left => self.left_width,
        }
    }

    /// Slide the gap one step; returns the signed horizontal shift applied.
    ///
    /// Direction flips whenever the narrowing strip is at or below `min_width`,
    /// checked both before and after the step. Widths never go negative.
    pub fn oscillate(&mut self, step: f32, min_width: f32) -> f32 {
        if self.narrowing_width() <= min_width {
            self.direction = self.direction.reversed();
        }

        let delta = step.min(self.narrowing_width()).max(0.0);
        let shift = match self.direction {
            Direction::Right => {
                self.left_width += delta;
                self.right_width -= delta;
                delta
            }
            Direction::Left => {
                self.left_width -= delta;
                self.right_width += delta;
                -delta
            }
        };

        if self.narrowing_width() <= min_width {
            self.direction = self.direction.reversed();
        }
        shift
    }
}

/// Owns the spawn countdown and every live strip pair
#[derive(Debug, Clone)]
pub struct ObstacleSpawner {
    scene_width: f32,
    scene_height: f32,
    strip_height: f32,
    gap_width: f32,
    oscillation_step: f32,
    min_strip_width: f32,
    oscillation_ticks: u32,
    travel_ticks: u32,
    star_shape: Polygon,
    star_extent: Vec2,
    spawn: Countdown,
    running: bool,
    first_strip: bool,
    pairs: Vec<StripPair>,
}

impl ObstacleSpawner {
    pub fn new(settings: &Settings) -> Self {
        let star_shape = star_polygon(settings.star_size, settings.mounted_star_spikes)
            .rotated(std::f32::consts::PI);
        let star_extent = star_shape.extent();
        Self {
            scene_width: settings.scene_width,
            scene_height: settings.scene_height,
            strip_height: settings.strip_height,
            gap_width: settings.gap_width,
            oscillation_step: settings.oscillation_step,
            min_strip_width: settings.ball_diameter(),
            oscillation_ticks: secs_to_ticks(settings.oscillation_interval),
            travel_ticks: secs_to_ticks(settings.travel_secs()),
            star_shape,
            star_extent,
            spawn: Countdown::from_secs(settings.spawn_period),
            running: false,
            first_strip: true,
            pairs: Vec::new(),
        }
    }

    /// Suppress the mounted star on the next spawned pair
    pub fn arm_first_strip(&mut self) {
        self.first_strip = true;
    }

    pub fn pairs(&self) -> &[StripPair] {
        &self.pairs
    }

    /// Start the spawn cycle, spawning the first pair immediately
    pub fn start(&mut self, world: &mut PhysicsWorld, rng: &mut Pcg32) {
        self.running = true;
        self.spawn.reset();
        self.spawn_pair(world, rng);
    }

    /// Stop spawning and remove every pair's bodies
    pub fn clear(&mut self, world: &mut PhysicsWorld) {
        for pair in self.pairs.drain(..) {
            world.remove(pair.left);
            world.remove(pair.right);
            if let Some(star) = pair.star {
                world.remove(star);
            }
        }
        self.running = false;
        self.spawn.reset();
    }

    /// Advance one tick
    pub fn tick(&mut self, world: &mut PhysicsWorld, rng: &mut Pcg32) {
        if !self.running {
            return;
        }

        if self.spawn.tick() {
            self.spawn_pair(world, rng);
        }

        let step = self.oscillation_step;
        let min_width = self.min_strip_width;
        let scene_width = self.scene_width;
        let strip_height = self.strip_height;

        self.pairs.retain_mut(|pair| {
            pair.elapsed += 1;

            let shift = if pair.oscillation.tick() {
                pair.oscillate(step, min_width)
            } else {
                0.0
            };

            let y = pair.strip_y();
            world.set_shape(
                pair.left,
                Shape::Rect {
                    size: Vec2::new(pair.left_width, strip_height),
                },
            );
            world.set_position(pair.left, Vec2::new(pair.left_width * 0.5, y));
            world.set_shape(
                pair.right,
                Shape::Rect {
                    size: Vec2::new(pair.right_width, strip_height),
                },
            );
            world.set_position(pair.right, Vec2::new(scene_width - pair.right_width * 0.5, y));
            if let Some(star) = pair.star
                && let Some(x) = world.get(star).map(|b| b.pos.x)
            {
                world.set_position(star, Vec2::new(x + shift, pair.star_y0 + pair.offset()));
            }

            if pair.elapsed >= pair.travel {
                world.remove(pair.left);
                world.remove(pair.right);
                if let Some(star) = pair.star {
                    world.remove(star);
                }
                false
            } else {
                true
            }
        });
    }

    fn spawn_pair(&mut self, world: &mut PhysicsWorld, rng: &mut Pcg32) {
        let half_gap = self.gap_width * 0.5;
        let center = uniform(rng, half_gap, self.scene_width - half_gap);
        let left_width = (center - half_gap).max(0.0);
        let right_width = (self.scene_width - (center + half_gap)).max(0.0);
        let strip_y0 = -self.strip_height * 0.5;

        let left = world.register(BodyDesc::new(
            EntityKind::Strip,
            Shape::Rect {
                size: Vec2::new(left_width, self.strip_height),
            },
            Vec2::new(left_width * 0.5, strip_y0),
        ));
        let right = world.register(BodyDesc::new(
            EntityKind::Strip,
            Shape::Rect {
                size: Vec2::new(right_width, self.strip_height),
            },
            Vec2::new(self.scene_width - right_width * 0.5, strip_y0),
        ));

        let star_y0 = self.star_extent.y * 0.5;
        let placement = if self.first_strip {
            None
        } else {
            self.place_star(rng, left_width, right_width)
        };
        let star = placement.map(|(_, x)| {
            world.register(BodyDesc::new(
                EntityKind::MountedStar,
                Shape::Polygon(self.star_shape.clone()),
                Vec2::new(x, star_y0),
            ))
        });

        log::debug!(
            "Spawned strip pair: gap at {:.1}, star {:?}",
            center,
            placement
        );

        self.pairs.push(StripPair {
            left,
            right,
            star,
            star_segment: placement.map(|(segment, _)| segment),
            left_width,
            right_width,
            gap_width: self.gap_width,
            direction: Direction::Right,
            elapsed: 0,
            travel: self.travel_ticks,
            oscillation: Countdown::new(self.oscillation_ticks),
            strip_y0,
            star_y0,
            rise: self.scene_height + self.strip_height,
        });
        self.first_strip = false;
    }

    /// Pick a segment wide enough for the star and an x that keeps it inside
    fn place_star(&self, rng: &mut Pcg32, left_width: f32, right_width: f32) -> Option<(Segment, f32)> {
        let w = self.star_extent.x;
        let half = w * 0.5;
        let segment = match (left_width >= w, right_width >= w) {
            (true, true) => {
                if rng.random_bool(0.5) {
                    Segment::Left
                } else {
                    Segment::Right
                }
            }
            (true, false) => Segment::Left,
            (false, true) => Segment::Right,
            (false, false) => return None,
        };

        let x = match segment {
            Segment::Left => uniform(rng, half, left_width - half),
            Segment::Right => uniform(
                rng,
                left_width + self.gap_width + half,
                self.scene_width - half,
            ),
        };
        Some((segment, x))
    }
}

/// Uniform sample in `[lo, hi]`, collapsing to `lo` when the range is empty
fn uniform(rng: &mut Pcg32, lo: f32, hi: f32) -> f32 {
    if hi > lo {
        rng.random_range(lo..=hi)
    } else {
        lo
    }
}
