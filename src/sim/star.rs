//! Star polygon geometry
//!
//! A star of `spikes` points is a closed polygon of `2 * spikes` vertices that
//! alternate between an outer radius of `size / 2` and an inner radius of
//! `size / 4`. The first vertex sits at `-π/2` and the rest follow
//! counter-clockwise.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::polar_to_cartesian;

/// A closed polygon in local coordinates (centered on the origin)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub vertices: Vec<Vec2>,
}

impl Polygon {
    pub fn new(vertices: Vec<Vec2>) -> Self {
        Self { vertices }
    }

    /// Rotate every vertex about the origin
    pub fn rotated(&self, angle: f32) -> Self {
        let rot = Vec2::from_angle(angle);
        Self {
            vertices: self.vertices.iter().map(|v| rot.rotate(*v)).collect(),
        }
    }

    /// Axis-aligned bounding box as (min, max)
    pub fn bounds(&self) -> (Vec2, Vec2) {
        let mut min = Vec2::splat(f32::INFINITY);
        let mut max = Vec2::splat(f32::NEG_INFINITY);
        for v in &self.vertices {
            min = min.min(*v);
            max = max.max(*v);
        }
        if self.vertices.is_empty() {
            (Vec2::ZERO, Vec2::ZERO)
        } else {
            (min, max)
        }
    }

    /// Width and height of the bounding box (the star's frame)
    pub fn extent(&self) -> Vec2 {
        let (min, max) = self.bounds();
        max - min
    }

    /// Vertices translated to `offset`
    pub fn translated(&self, offset: Vec2) -> impl Iterator<Item = Vec2> + '_ {
        self.vertices.iter().map(move |v| *v + offset)
    }
}

/// Build a star polygon.
///
/// Inputs are not validated: a spike count below 3 yields a degenerate shape.
pub fn star_polygon(size: f32, spikes: u32) -> Polygon {
    let points = spikes as usize * 2;
    let step = std::f32::consts::TAU / points as f32;
    let outer = size / 2.0;
    let inner = size / 4.0;

    let vertices = (0..points)
        .map(|i| {
            let r = if i % 2 == 0 { outer } else { inner };
            let theta = i as f32 * step - std::f32::consts::FRAC_PI_2;
            polar_to_cartesian(r, theta)
        })
        .collect();

    Polygon::new(vertices)
}
