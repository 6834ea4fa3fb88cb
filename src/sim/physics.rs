//! Minimal rigid-body world
//!
//! Bodies carry typed kinds plus category/contact/collision bit masks. Only
//! the edge-loop wall physically blocks anything; every other interaction is
//! report-only and surfaces as a contact-begin event from [`PhysicsWorld::step`].

use std::collections::BTreeSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{WorldShape, shapes_overlap};
use super::star::Polygon;

/// Category bits
pub mod category {
    pub const BALL: u32 = 1 << 0;
    pub const STRIP: u32 = 1 << 1;
    pub const WALL: u32 = 1 << 2;
    pub const FLOOR_STAR: u32 = 1 << 3;
    pub const MOUNTED_STAR: u32 = 1 << 4;
}

/// What a body is, used for contact dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Ball,
    Wall,
    Strip,
    FloorStar,
    MountedStar,
}

impl EntityKind {
    pub fn category(self) -> u32 {
        match self {
            EntityKind::Ball => category::BALL,
            EntityKind::Wall => category::WALL,
            EntityKind::Strip => category::STRIP,
            EntityKind::FloorStar => category::FLOOR_STAR,
            EntityKind::MountedStar => category::MOUNTED_STAR,
        }
    }

    /// Which categories this kind wants contact reports for
    pub fn contact_mask(self) -> u32 {
        use category::*;
        match self {
            EntityKind::Ball => STRIP | FLOOR_STAR | MOUNTED_STAR,
            EntityKind::Wall => 0,
            EntityKind::Strip => BALL | FLOOR_STAR,
            EntityKind::FloorStar => BALL | STRIP | MOUNTED_STAR,
            EntityKind::MountedStar => BALL | FLOOR_STAR,
        }
    }

    /// Which categories physically block this kind
    pub fn collision_mask(self) -> u32 {
        match self {
            EntityKind::Ball => category::WALL,
            EntityKind::Wall => category::BALL,
            _ => 0,
        }
    }
}

/// Stable body handle, allocated in increasing order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyId(pub u32);

/// Local-space collision shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle { radius: f32 },
    Rect { size: Vec2 },
    Polygon(Polygon),
}

impl Shape {
    /// Half of the bounding box size
    pub fn half_extent(&self) -> Vec2 {
        match self {
            Shape::Circle { radius } => Vec2::splat(*radius),
            Shape::Rect { size } => *size * 0.5,
            Shape::Polygon(poly) => {
                let (min, max) = poly.bounds();
                min.abs().max(max.abs())
            }
        }
    }

    fn to_world(&self, pos: Vec2) -> WorldShape {
        match self {
            Shape::Circle { radius } => WorldShape::Circle {
                center: pos,
                radius: *radius,
            },
            Shape::Rect { size } => WorldShape::rect(pos, *size),
            Shape::Polygon(poly) => WorldShape::Polygon(poly.translated(pos).collect()),
        }
    }
}

/// Registration parameters for a body
#[derive(Debug, Clone)]
pub struct BodyDesc {
    pub kind: EntityKind,
    pub shape: Shape,
    pub pos: Vec2,
    pub vel: Vec2,
    pub category: u32,
    pub contact_mask: u32,
    pub collision_mask: u32,
    pub gravity_affected: bool,
}

impl BodyDesc {
    /// Body with the default masks for its kind, at rest, not gravity-affected
    pub fn new(kind: EntityKind, shape: Shape, pos: Vec2) -> Self {
        Self {
            kind,
            shape,
            pos,
            vel: Vec2::ZERO,
            category: kind.category(),
            contact_mask: kind.contact_mask(),
            collision_mask: kind.collision_mask(),
            gravity_affected: false,
        }
    }

    pub fn with_masks(mut self, category: u32, contact: u32, collision: u32) -> Self {
        self.category = category;
        self.contact_mask = contact;
        self.collision_mask = collision;
        self
    }

    pub fn with_gravity(mut self, affected: bool) -> Self {
        self.gravity_affected = affected;
        self
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }
}

/// A registered body
#[derive(Debug, Clone)]
pub struct Body {
    pub id: BodyId,
    pub kind: EntityKind,
    pub shape: Shape,
    pub pos: Vec2,
    pub vel: Vec2,
    pub category: u32,
    pub contact_mask: u32,
    pub collision_mask: u32,
    pub gravity_affected: bool,
    /// Disabled bodies neither move nor report contacts
    pub enabled: bool,
}

impl Body {
    fn reports_contact_with(&self, other: &Body) -> bool {
        (self.category & other.contact_mask) != 0 || (other.category & self.contact_mask) != 0
    }

    pub fn world_shape(&self) -> WorldShape {
        self.shape.to_world(self.pos)
    }
}

/// Which edges of the scene frame hold the ball in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EdgeLoop {
    /// Left and right edges only; vertical travel is free
    #[default]
    SidesOnly,
    /// All four edges
    Full,
}

/// Static boundary around the scene frame
#[derive(Debug, Clone, Copy)]
struct Wall {
    min: Vec2,
    max: Vec2,
    mode: EdgeLoop,
    category: u32,
    collision_mask: u32,
}

/// Contact-begin event between two bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub a: BodyId,
    pub a_kind: EntityKind,
    pub b: BodyId,
    pub b_kind: EntityKind,
}

impl Contact {
    /// Match the contact against a kind pair in either order.
    ///
    /// Returns the ids ordered as `(first, second)` when matched.
    pub fn matching(&self, first: EntityKind, second: EntityKind) -> Option<(BodyId, BodyId)> {
        if self.a_kind == first && self.b_kind == second {
            Some((self.a, self.b))
        } else if self.b_kind == first && self.a_kind == second {
            Some((self.b, self.a))
        } else {
            None
        }
    }
}

/// The body container and stepper
#[derive(Debug, Clone, Default)]
pub struct PhysicsWorld {
    /// Sorted by id
    bodies: Vec<Body>,
    next_id: u32,
    /// Pairs overlapping at the end of the last step (lower id first)
    touching: BTreeSet<(BodyId, BodyId)>,
    pub gravity: Vec2,
    wall: Option<Wall>,
}

impl PhysicsWorld {
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity,
            ..Default::default()
        }
    }

    /// Install the frame wall; it blocks bodies whose collision mask includes walls
    pub fn set_edge_loop(&mut self, min: Vec2, max: Vec2, mode: EdgeLoop) {
        self.wall = Some(Wall {
            min,
            max,
            mode,
            category: EntityKind::Wall.category(),
            collision_mask: EntityKind::Wall.collision_mask(),
        });
    }

    /// Add a body and return its handle
    pub fn register(&mut self, desc: BodyDesc) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        self.bodies.push(Body {
            id,
            kind: desc.kind,
            shape: desc.shape,
            pos: desc.pos,
            vel: desc.vel,
            category: desc.category,
            contact_mask: desc.contact_mask,
            collision_mask: desc.collision_mask,
            gravity_affected: desc.gravity_affected,
            enabled: true,
        });
        id
    }

    pub fn remove(&mut self, id: BodyId) -> Option<Body> {
        let idx = self.index_of(id)?;
        self.touching.retain(|(a, b)| *a != id && *b != id);
        Some(self.bodies.remove(idx))
    }

    /// Remove every body of the given kind
    pub fn remove_kind(&mut self, kind: EntityKind) {
        let removed: Vec<BodyId> = self
            .bodies
            .iter()
            .filter(|b| b.kind == kind)
            .map(|b| b.id)
            .collect();
        for id in removed {
            self.remove(id);
        }
    }

    pub fn get(&self, id: BodyId) -> Option<&Body> {
        self.index_of(id).map(|i| &self.bodies[i])
    }

    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.index_of(id).map(move |i| &mut self.bodies[i])
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn bodies(&self) -> impl Iterator<Item = &Body> {
        self.bodies.iter()
    }

    pub fn count_kind(&self, kind: EntityKind) -> usize {
        self.bodies.iter().filter(|b| b.kind == kind).count()
    }

    pub fn set_velocity(&mut self, id: BodyId, vx: f32, vy: f32) {
        if let Some(body) = self.get_mut(id) {
            body.vel = Vec2::new(vx, vy);
        }
    }

    pub fn set_position(&mut self, id: BodyId, pos: Vec2) {
        if let Some(body) = self.get_mut(id) {
            body.pos = pos;
        }
    }

    pub fn set_shape(&mut self, id: BodyId, shape: Shape) {
        if let Some(body) = self.get_mut(id) {
            body.shape = shape;
        }
    }

    /// Enable or disable a body without dropping it
    pub fn set_enabled(&mut self, id: BodyId, enabled: bool) {
        if let Some(body) = self.get_mut(id) {
            body.enabled = enabled;
        }
        if !enabled {
            self.touching.retain(|(a, b)| *a != id && *b != id);
        }
    }

    /// Advance one step and return contacts that began during it
    pub fn step(&mut self, dt: f32) -> Vec<Contact> {
        let gravity = self.gravity;
        for body in self.bodies.iter_mut().filter(|b| b.enabled) {
            if body.gravity_affected {
                body.vel += gravity * dt;
            }
            body.pos += body.vel * dt;
        }

        if let Some(wall) = self.wall {
            for body in self.bodies.iter_mut().filter(|b| b.enabled) {
                if (body.collision_mask & wall.category) != 0
                    && (wall.collision_mask & body.category) != 0
                {
                    confine(body, &wall);
                }
            }
        }

        self.detect_contacts()
    }

    fn detect_contacts(&mut self) -> Vec<Contact> {
        let shapes: Vec<(usize, Vec2, WorldShape)> = self
            .bodies
            .iter()
            .enumerate()
            .filter(|(_, b)| b.enabled)
            .map(|(i, b)| (i, b.shape.half_extent(), b.world_shape()))
            .collect();

        let mut now_touching = BTreeSet::new();
        let mut began = Vec::new();

        for (n, (i, half_i, shape_i)) in shapes.iter().enumerate() {
            for (j, half_j, shape_j) in shapes.iter().skip(n + 1) {
                let (bi, bj) = (&self.bodies[*i], &self.bodies[*j]);
                if !bi.reports_contact_with(bj) {
                    continue;
                }
                // Broad phase
                let gap = (bi.pos - bj.pos).abs() - (*half_i + *half_j);
                if gap.x > 0.0 || gap.y > 0.0 || !shapes_overlap(shape_i, shape_j) {
                    continue;
                }
                let key = (bi.id, bj.id);
                if !self.touching.contains(&key) {
                    began.push(Contact {
                        a: bi.id,
                        a_kind: bi.kind,
                        b: bj.id,
                        b_kind: bj.kind,
                    });
                }
                now_touching.insert(key);
            }
        }

        self.touching = now_touching;
        began
    }

    fn index_of(&self, id: BodyId) -> Option<usize> {
        self.bodies.binary_search_by_key(&id, |b| b.id).ok()
    }
}

/// Push a body back inside the wall; velocity is left as-is
fn confine(body: &mut Body, wall: &Wall) {
    let half = body.shape.half_extent();
    let lo = wall.min + half;
    let hi = (wall.max - half).max(lo);
    body.pos.x = body.pos.x.clamp(lo.x, hi.x);
    if wall.mode == EdgeLoop::Full {
        body.pos.y = body.pos.y.clamp(lo.y, hi.y);
    }
}
