//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (grid order for blocks)
//! - No rendering or platform dependencies
//!
//! Screen coordinates: x grows to the right, y grows downward.

pub mod bounce;
pub mod collision;
pub mod shapes;
pub mod state;
pub mod tick;

pub use bounce::{
    WallBounce, bounce_angle, hit_position, paddle_bounce, paddle_bounce_angle, reflect_from_paddle,
    reflect_off_walls, velocity_from_angle,
};
pub use collision::{
    Contact, Side, WallHits, circle_rect_collision, circle_rect_contact, clamp_inside, wall_collision,
};
pub use shapes::{Circle, Rect};
pub use state::{Ball, BallState, Block, BlockKind, GameEvent, GamePhase, GameState, Paddle};
pub use tick::{TickInput, generate_level, tick};
