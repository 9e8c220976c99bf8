//! Breakout Sim - a deterministic Breakout simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (geometry tests, bounce model, game state, tick)
//! - `tuning`: Data-driven game balance
//!
//! Coordinates follow the canvas convention: `x` grows to the right, `y` grows
//! downward, so "up" is a negative `y` velocity. See [`consts::UP`].

pub mod sim;
pub mod tuning;

pub use tuning::{Difficulty, Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    use glam::DVec2;
    use std::f64::consts::PI;

    /// Screen-space "up" (y grows downward)
    pub const UP: DVec2 = DVec2::new(0.0, -1.0);

    /// Shallowest bounce, struck on the paddle's right edge (30 degrees)
    pub const MIN_BOUNCE_ANGLE: f64 = PI / 6.0;
    /// Steepest-left bounce, struck on the paddle's left edge (150 degrees)
    pub const MAX_BOUNCE_ANGLE: f64 = PI * 5.0 / 6.0;
    /// Straight up, struck on the paddle's center (90 degrees)
    pub const CENTER_BOUNCE_ANGLE: f64 = PI / 2.0;

    /// Canvas defaults
    pub const CANVAS_WIDTH: f64 = 800.0;
    pub const CANVAS_HEIGHT: f64 = 600.0;

    /// Ball defaults (velocities are pixels per frame)
    pub const BALL_RADIUS: f64 = 10.0;
    pub const BALL_START_SPEED: f64 = 5.0 * std::f64::consts::SQRT_2;
    pub const BALL_MAX_SPEED: f64 = 12.0;
    /// Serve launches within this angle either side of vertical (45 degrees)
    pub const SERVE_MAX_ANGLE: f64 = PI / 4.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f64 = 100.0;
    pub const PADDLE_HEIGHT: f64 = 20.0;
    pub const PADDLE_SPEED: f64 = 8.0;
    /// Gap between the paddle's bottom edge and the canvas bottom
    pub const PADDLE_BOTTOM_MARGIN: f64 = 30.0;

    pub const INITIAL_LIVES: u8 = 3;
    pub const MAX_LIVES: u8 = 5;
}

/// Convert degrees to radians
#[inline]
pub fn deg_to_rad(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

/// Convert radians to degrees
#[inline]
pub fn rad_to_deg(radians: f64) -> f64 {
    radians * 180.0 / std::f64::consts::PI
}
