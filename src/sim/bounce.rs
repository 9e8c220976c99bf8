//! Paddle bounce model and wall reflection
//!
//! Where the ball strikes the paddle decides where it goes next: the left
//! edge sends it up-left at 150 degrees, the center straight up at 90 and the
//! right edge up-right at 30. Angles are measured from the +x axis with "up"
//! positive, so the resulting velocity is `(s·cos θ, -s·sin θ)` in screen
//! space where y grows downward.

use glam::DVec2;

use super::collision::WallHits;
use super::shapes::{Circle, Rect};
use crate::consts::{CENTER_BOUNCE_ANGLE, MAX_BOUNCE_ANGLE, MIN_BOUNCE_ANGLE};

/// Normalized impact offset along the paddle, in [-1, 1]
///
/// -1 is the left edge, 0 the center and +1 the right edge. Balls past an
/// edge clamp to it. A paddle without width (or non-finite input) yields 0,
/// i.e. a vertical bounce.
pub fn hit_position(ball_x: f64, paddle_center: f64, paddle_width: f64) -> f64 {
    if !ball_x.is_finite() || !paddle_center.is_finite() {
        return 0.0;
    }
    let half_width = paddle_width / 2.0;
    if !(half_width > 0.0) || !half_width.is_finite() {
        return 0.0;
    }
    ((ball_x - paddle_center) / half_width).clamp(-1.0, 1.0)
}

/// Bounce angle (radians) for a hit position
///
/// Piecewise linear: 150° at -1 through 90° at 0 down to 30° at +1. The
/// input is clamped first so the result never leaves [30°, 150°].
pub fn bounce_angle(hit_position: f64) -> f64 {
    let hit = if hit_position.is_nan() {
        0.0
    } else {
        hit_position.clamp(-1.0, 1.0)
    };

    if hit < 0.0 {
        CENTER_BOUNCE_ANGLE + (-hit) * (MAX_BOUNCE_ANGLE - CENTER_BOUNCE_ANGLE)
    } else {
        CENTER_BOUNCE_ANGLE - hit * (CENTER_BOUNCE_ANGLE - MIN_BOUNCE_ANGLE)
    }
}

/// Bounce angle for a ball striking a paddle rectangle
pub fn paddle_bounce_angle(ball: &Circle, paddle: &Rect) -> f64 {
    bounce_angle(hit_position(ball.x(), paddle.center_x(), paddle.width))
}

/// Screen-space velocity of magnitude `speed` travelling at `angle`
#[inline]
pub fn velocity_from_angle(speed: f64, angle: f64) -> DVec2 {
    DVec2::new(speed * angle.cos(), -speed * angle.sin())
}

/// New velocity after a paddle hit
///
/// Keeps the current speed and redirects it by impact offset. The result
/// always moves upward (negative y) unless the ball was at rest.
pub fn paddle_bounce(velocity: DVec2, ball_x: f64, paddle_center: f64, paddle_width: f64) -> DVec2 {
    let speed = velocity.length();
    let angle = bounce_angle(hit_position(ball_x, paddle_center, paddle_width));
    velocity_from_angle(speed, angle)
}

/// [`paddle_bounce`] for a ball circle and paddle rectangle
pub fn reflect_from_paddle(velocity: DVec2, ball: &Circle, paddle: &Rect) -> DVec2 {
    paddle_bounce(velocity, ball.x(), paddle.center_x(), paddle.width)
}

/// Result of bouncing off the canvas walls
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallBounce {
    pub velocity: DVec2,
    /// Ball reached the bottom edge; the caller takes a life
    pub life_lost: bool,
}

/// Reflect off the walls that were hit
///
/// Left/right flip `vx`, top flips `vy`. The bottom never reflects.
pub fn reflect_off_walls(velocity: DVec2, hits: WallHits) -> WallBounce {
    let mut velocity = velocity;
    if hits.left || hits.right {
        velocity.x = -velocity.x;
    }
    if hits.top {
        velocity.y = -velocity.y;
    }
    WallBounce {
        velocity,
        life_lost: hits.bottom,
    }
}
