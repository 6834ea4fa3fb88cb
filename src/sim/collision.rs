//! Overlap tests between world-space shapes
//!
//! Stars are concave, so polygon tests use edge intersection plus a
//! point-in-polygon check instead of separating axes.

use glam::Vec2;

/// A body's shape placed in world coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum WorldShape {
    Circle { center: Vec2, radius: f32 },
    Rect { min: Vec2, max: Vec2 },
    Polygon(Vec<Vec2>),
}

impl WorldShape {
    /// Rectangle from its center and full size
    pub fn rect(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        WorldShape::Rect {
            min: center - half,
            max: center + half,
        }
    }
}

/// Check whether two shapes overlap (touching edges do not count)
pub fn shapes_overlap(a: &WorldShape, b: &WorldShape) -> bool {
    use WorldShape::*;

    match (a, b) {
        (Circle { center: ca, radius: ra }, Circle { center: cb, radius: rb }) => {
            (*ca - *cb).length_squared() < (ra + rb) * (ra + rb)
        }
        (Circle { center, radius }, Rect { min, max })
        | (Rect { min, max }, Circle { center, radius }) => {
            circle_rect_overlap(*center, *radius, *min, *max)
        }
        (Circle { center, radius }, Polygon(poly)) | (Polygon(poly), Circle { center, radius }) => {
            circle_polygon_overlap(*center, *radius, poly)
        }
        (Rect { min: a_min, max: a_max }, Rect { min: b_min, max: b_max }) => {
            a_min.x < b_max.x && a_max.x > b_min.x && a_min.y < b_max.y && a_max.y > b_min.y
        }
        (Rect { min, max }, Polygon(poly)) | (Polygon(poly), Rect { min, max }) => {
            polygon_polygon_overlap(&rect_corners(*min, *max), poly)
        }
        (Polygon(pa), Polygon(pb)) => polygon_polygon_overlap(pa, pb),
    }
}

/// Circle against an axis-aligned box
pub fn circle_rect_overlap(center: Vec2, radius: f32, min: Vec2, max: Vec2) -> bool {
    let closest = center.clamp(min, max);
    (center - closest).length_squared() < radius * radius
}

/// Circle against an arbitrary (possibly concave) polygon
pub fn circle_polygon_overlap(center: Vec2, radius: f32, poly: &[Vec2]) -> bool {
    if poly.len() < 3 {
        return false;
    }
    if point_in_polygon(center, poly) {
        return true;
    }
    let r_sq = radius * radius;
    edges(poly).any(|(a, b)| distance_sq_to_segment(center, a, b) < r_sq)
}

/// Two polygons overlap if any edges cross or one contains the other
pub fn polygon_polygon_overlap(pa: &[Vec2], pb: &[Vec2]) -> bool {
    if pa.len() < 3 || pb.len() < 3 {
        return false;
    }
    for (a1, a2) in edges(pa) {
        for (b1, b2) in edges(pb) {
            if segments_intersect(a1, a2, b1, b2) {
                return true;
            }
        }
    }
    point_in_polygon(pa[0], pb) || point_in_polygon(pb[0], pa)
}

/// Even-odd ray casting test
pub fn point_in_polygon(p: Vec2, poly: &[Vec2]) -> bool {
    let mut inside = false;
    for (a, b) in edges(poly) {
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if p.x < x_cross {
                inside = !inside;
            }
        }
    }
    inside
}

/// Squared distance from `p` to segment `a`-`b`
pub fn distance_sq_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < 1e-8 {
        return (p - a).length_squared();
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).length_squared()
}

/// Proper segment crossing (collinear overlap counts as a crossing)
pub fn segments_intersect(p1: Vec2, p2: Vec2, q1: Vec2, q2: Vec2) -> bool {
    let d1 = (p2 - p1).perp_dot(q1 - p1);
    let d2 = (p2 - p1).perp_dot(q2 - p1);
    let d3 = (q2 - q1).perp_dot(p1 - q1);
    let d4 = (q2 - q1).perp_dot(p2 - q1);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    let on_segment = |a: Vec2, b: Vec2, p: Vec2| {
        p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
    };
    (d1 == 0.0 && on_segment(p1, p2, q1))
        || (d2 == 0.0 && on_segment(p1, p2, q2))
        || (d3 == 0.0 && on_segment(q1, q2, p1))
        || (d4 == 0.0 && on_segment(q1, q2, p2))
}

fn rect_corners(min: Vec2, max: Vec2) -> [Vec2; 4] {
    [min, Vec2::new(max.x, min.y), max, Vec2::new(min.x, max.y)]
}

fn edges(poly: &[Vec2]) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
    let n = poly.len();
    (0..n).map(move |i| (poly[i], poly[(i + 1) % n]))
}
