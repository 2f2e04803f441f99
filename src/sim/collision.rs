//! Overlap and boundary tests shared by the resolver
//!
//! Everything here is a pure function of positions and radii.

use glam::Vec2;

use super::arena::{Edge, Rect};

/// Strict circle-circle overlap: touching circles do not collide
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let reach = ra + rb;
    a.distance_squared(b) < reach * reach
}

/// The edge a point has crossed, checked left, right, top, bottom
pub fn exit_edge(pos: Vec2, rect: &Rect) -> Option<Edge> {
    if pos.x < rect.left {
        Some(Edge::Left)
    } else if pos.x > rect.right {
        Some(Edge::Right)
    } else if pos.y < rect.top {
        Some(Edge::Top)
    } else if pos.y > rect.bottom {
        Some(Edge::Bottom)
    } else {
        None
    }
}

/// Whether a point is further than `margin` outside the screen
pub fn outside_world(pos: Vec2, screen: Vec2, margin: f32) -> bool {
    pos.x < -margin || pos.y < -margin || pos.x > screen.x + margin || pos.y > screen.y + margin
}

/// Offset that moves circle `a` just clear of circle `b`.
///
/// Coincident centers push along +x so the result is never NaN.
pub fn separation(a: Vec2, ra: f32, b: Vec2, rb: f32) -> Vec2 {
    let delta = a - b;
    let dist = delta.length();
    let depth = ra + rb - dist;
    if depth <= 0.0 {
        return Vec2::ZERO;
    }
    let normal = if dist > f32::EPSILON {
        delta / dist
    } else {
        Vec2::X
    };
    normal * depth
}
