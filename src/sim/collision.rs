//! Collision detection for circles against axis-aligned rectangles
//!
//! All tests work on squared distances and are inclusive at the boundary: a
//! ball that exactly touches a block, paddle or wall counts as a hit.
//!
//! Non-finite input never reports a collision.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::shapes::{Circle, Rect};

/// Which side of a rectangle was struck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    /// Outward unit normal of this side (y grows downward, so Top is -y)
    pub fn normal(self) -> DVec2 {
        match self {
            Side::Top => DVec2::new(0.0, -1.0),
            Side::Bottom => DVec2::new(0.0, 1.0),
            Side::Left => DVec2::new(-1.0, 0.0),
            Side::Right => DVec2::new(1.0, 0.0),
        }
    }
}

/// Detailed result of a circle/rectangle overlap
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Closest point on the rectangle to the circle center
    pub point: DVec2,
    /// Side of the rectangle that was struck
    pub side: Side,
    /// Outward normal of `side`
    pub normal: DVec2,
    /// How far the circle overlaps the rectangle (for position correction)
    pub penetration: f64,
}

/// Closest point on (or in) `rect` to `p`
///
/// Uses max/min instead of `f64::clamp` so an empty rectangle never panics.
#[inline]
pub fn closest_point(p: DVec2, rect: &Rect) -> DVec2 {
    DVec2::new(
        p.x.max(rect.left()).min(rect.right()),
        p.y.max(rect.top()).min(rect.bottom()),
    )
}

/// Check whether a circle overlaps a rectangle
///
/// Clamps the circle center onto the rectangle to find the closest point and
/// compares the squared distance against the squared radius. With radius 0
/// this is an inclusive point-in-rectangle test.
pub fn circle_rect_collision(circle: &Circle, rect: &Rect) -> bool {
    if !circle.is_finite() || !rect.is_finite() {
        return false;
    }
    let closest = closest_point(circle.center, rect);
    circle.center.distance_squared(closest) <= circle.radius * circle.radius
}

/// Like [`circle_rect_collision`], but also reports which side was struck
///
/// Side selection:
/// - center inside the rectangle: nearest edge (ties: left, right, top, bottom)
/// - center beside an edge: that edge
/// - center in a corner region: the axis with the larger separation, ties
///   going to the left/right edge
pub fn circle_rect_contact(circle: &Circle, rect: &Rect) -> Option<Contact> {
    if !circle_rect_collision(circle, rect) {
        return None;
    }

    let c = circle.center;
    let point = closest_point(c, rect);

    if rect.contains(c) {
        let candidates = [
            (Side::Left, c.x - rect.left()),
            (Side::Right, rect.right() - c.x),
            (Side::Top, c.y - rect.top()),
            (Side::Bottom, rect.bottom() - c.y),
        ];
        let (side, depth) = candidates
            .into_iter()
            .fold(candidates[0], |best, cur| if cur.1 < best.1 { cur } else { best });
        let point = match side {
            Side::Left => DVec2::new(rect.left(), c.y),
            Side::Right => DVec2::new(rect.right(), c.y),
            Side::Top => DVec2::new(c.x, rect.top()),
            Side::Bottom => DVec2::new(c.x, rect.bottom()),
        };
        return Some(Contact {
            point,
            side,
            normal: side.normal(),
            penetration: circle.radius + depth,
        });
    }

    let delta = c - point;
    let side = if delta.x.abs() >= delta.y.abs() {
        if delta.x < 0.0 { Side::Left } else { Side::Right }
    } else if delta.y < 0.0 {
        Side::Top
    } else {
        Side::Bottom
    };

    Some(Contact {
        point,
        side,
        normal: side.normal(),
        penetration: circle.radius - delta.length(),
    })
}

/// Which canvas boundaries a circle currently touches or crosses
///
/// Each flag is evaluated on its own, so a ball in a corner sets two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WallHits {
    pub top: bool,
    pub left: bool,
    pub right: bool,
    pub bottom: bool,
}

impl WallHits {
    pub const NONE: WallHits = WallHits {
        top: false,
        left: false,
        right: false,
        bottom: false,
    };

    pub fn any(&self) -> bool {
        self.top || self.left || self.right || self.bottom
    }
}

/// Check a circle against the canvas walls `[0, width] x [0, height]`
///
/// Inclusive: `left` holds when `x - r <= 0`, `right` when `x + r >= width`,
/// `top` when `y - r <= 0` and `bottom` when `y + r >= height`.
pub fn wall_collision(circle: &Circle, width: f64, height: f64) -> WallHits {
    if !circle.is_finite() || !width.is_finite() || !height.is_finite() {
        return WallHits::NONE;
    }
    let Circle { center, radius } = *circle;
    WallHits {
        top: center.y - radius <= 0.0,
        left: center.x - radius <= 0.0,
        right: center.x + radius >= width,
        bottom: center.y + radius >= height,
    }
}

/// Push a circle center back inside the left, right and top walls
///
/// The bottom is left open: falling out is a lost life, not a bounce.
pub fn clamp_inside(circle: &Circle, width: f64) -> DVec2 {
    let r = circle.radius;
    let mut center = circle.center;
    if center.x - r < 0.0 {
        center.x = r;
    }
    if center.x + r > width {
        center.x = width - r;
    }
    if center.y - r < 0.0 {
        center.y = r;
    }
    center
}

/// Inclusive point-in-rectangle test
#[inline]
pub fn point_in_rect(p: DVec2, rect: &Rect) -> bool {
    rect.contains(p)
}

/// Whether two rectangles overlap (touching edges count)
pub fn rect_intersects_rect(a: &Rect, b: &Rect) -> bool {
    !(a.right() < b.left() || b.right() < a.left() || a.bottom() < b.top() || b.bottom() < a.top())
}

/// Whether two circles overlap (touching does not count)
pub fn circle_intersects_circle(a: &Circle, b: &Circle) -> bool {
    let r = a.radius + b.radius;
    a.center.distance_squared(b.center) < r * r
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n, with `normal` of unit length.
#[inline]
pub fn reflect_velocity(velocity: DVec2, normal: DVec2) -> DVec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}
