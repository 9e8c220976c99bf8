//! Game state and core simulation types
//!
//! `GameState` is the context object the orchestrator owns and passes to
//! `tick`; nothing in the simulation lives in globals.

use glam::DVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bounce::velocity_from_angle;
use super::shapes::{Circle, Rect};
use crate::consts::CENTER_BOUNCE_ANGLE;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ball resting on the paddle, waiting for launch input
    Serve,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Every breakable block is gone; launch starts the next level
    LevelComplete,
    /// Out of lives; launch starts a new run
    GameOver,
}

/// Ball state - attached to paddle or free-moving
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallState {
    Attached,
    Free,
}

/// The ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: DVec2,
    /// Pixels per frame, y grows downward
    pub vel: DVec2,
    pub radius: f64,
    pub state: BallState,
    /// Paddle and block hits since the last serve
    pub hit_count: u32,
    /// Ticks of piercing left (passes through blocks without reflecting)
    #[serde(default)]
    pub power_ticks: u32,
}

impl Ball {
    pub fn new(radius: f64) -> Self {
        Self {
            pos: DVec2::ZERO,
            vel: DVec2::ZERO,
            radius,
            state: BallState::Attached,
            hit_count: 0,
            power_ticks: 0,
        }
    }

    #[inline]
    pub fn circle(&self) -> Circle {
        Circle {
            center: self.pos,
            radius: self.radius,
        }
    }

    pub fn speed(&self) -> f64 {
        self.vel.length()
    }

    /// Rescale velocity to `speed`, keeping direction (no-op at rest)
    pub fn set_speed(&mut self, speed: f64) {
        let current = self.speed();
        if current > 0.0 {
            self.vel *= speed / current;
        }
    }

    pub fn is_power_ball(&self) -> bool {
        self.power_ticks > 0
    }

    pub fn enable_power_ball(&mut self, ticks: u32) {
        self.power_ticks = ticks;
    }

    /// Move one step, count down piercing, cap speed
    pub fn advance(&mut self, dt: f64, max_speed: f64) {
        self.pos += self.vel * dt;
        self.power_ticks = self.power_ticks.saturating_sub(1);

        if self.speed() > max_speed {
            self.set_speed(max_speed);
        }
    }

    /// Count a hit; every `every` hits the ball gains `amount` speed
    ///
    /// Returns the new speed when a speed-up was applied.
    pub fn on_hit(&mut self, every: u32, amount: f64, max_speed: f64) -> Option<f64> {
        self.hit_count += 1;
        if every == 0 || self.hit_count % every != 0 {
            return None;
        }
        let speed = (self.speed() + amount).min(max_speed);
        self.set_speed(speed);
        Some(speed)
    }

    /// Rest the ball on top of the paddle's center
    pub fn attach_to(&mut self, paddle: &Paddle) {
        self.state = BallState::Attached;
        self.vel = DVec2::ZERO;
        self.hit_count = 0;
        self.power_ticks = 0;
        self.follow(paddle);
    }

    /// Keep an attached ball on the paddle
    pub fn follow(&mut self, paddle: &Paddle) {
        if self.state == BallState::Attached {
            self.pos = DVec2::new(paddle.center_x(), paddle.rect.top() - self.radius - 1.0);
        }
    }

    /// Launch an attached ball upward, `offset` radians off vertical
    pub fn launch(&mut self, speed: f64, offset: f64) {
        if self.state == BallState::Attached {
            self.vel = velocity_from_angle(speed, CENTER_BOUNCE_ANGLE + offset);
            self.state = BallState::Free;
        }
    }
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub rect: Rect,
}

impl Paddle {
    /// Paddle centered horizontally near the bottom of the canvas
    pub fn new(tuning: &Tuning) -> Self {
        let rect = Rect::new(
            (tuning.canvas_width - tuning.paddle_width) / 2.0,
            tuning.canvas_height - tuning.paddle_bottom_margin - tuning.paddle_height,
            tuning.paddle_width,
            tuning.paddle_height,
        );
        Self { rect }
    }

    #[inline]
    pub fn center_x(&self) -> f64 {
        self.rect.center_x()
    }

    /// Move horizontally by `dx`, staying inside `[0, canvas_width]`
    pub fn move_by(&mut self, dx: f64, canvas_width: f64) {
        if !dx.is_finite() {
            return;
        }
        let max_x = (canvas_width - self.rect.width).max(0.0);
        self.rect.x = (self.rect.x + dx).max(0.0).min(max_x);
    }

    /// Move the center toward `target_x`, at most `|max_step|` this tick
    ///
    /// A non-finite step leaves the paddle where it is.
    pub fn move_toward(&mut self, target_x: f64, max_step: f64, canvas_width: f64) {
        if !max_step.is_finite() {
            return;
        }
        let step = max_step.abs();
        let delta = (target_x - self.center_x()).max(-step).min(step);
        self.move_by(delta, canvas_width);
    }
}

/// Block types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BlockKind {
    #[default]
    Normal,
    Hard,
    SuperHard,
    /// Cannot be destroyed, doesn't count for level clear
    Unbreakable,
}

impl BlockKind {
    pub fn initial_hp(self) -> u8 {
        match self {
            BlockKind::Normal => 1,
            BlockKind::Hard => 2,
            BlockKind::SuperHard => 3,
            BlockKind::Unbreakable => u8::MAX,
        }
    }

    /// Points awarded when destroyed
    pub fn points(self) -> u64 {
        match self {
            BlockKind::Normal => 10,
            BlockKind::Hard => 20,
            BlockKind::SuperHard => 30,
            BlockKind::Unbreakable => 0,
        }
    }
}

/// A block entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub id: u32,
    pub kind: BlockKind,
    pub hp: u8,
    pub rect: Rect,
    /// Grid row (0 = top)
    pub row: u32,
}

impl Block {
    pub fn new(id: u32, kind: BlockKind, rect: Rect, row: u32) -> Self {
        Self {
            id,
            kind,
            hp: kind.initial_hp(),
            rect,
            row,
        }
    }

    /// Apply one hit; returns true if this destroyed the block
    pub fn damage(&mut self) -> bool {
        if self.kind == BlockKind::Unbreakable || self.hp == 0 {
            return false;
        }
        self.hp -= 1;
        self.hp == 0
    }

    pub fn is_destroyed(&self) -> bool {
        self.hp == 0
    }

    /// Returns true if this block must be destroyed to clear the level
    pub fn counts_for_clear(&self) -> bool {
        self.kind != BlockKind::Unbreakable
    }
}

/// Things that happened during a tick, for scoring, logging and effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Paused,
    Resumed,
    Launched,
    WallBounce,
    /// Paddle hit, with the outgoing bounce angle in radians
    PaddleHit { angle: f64 },
    BlockHit { id: u32 },
    /// Points include the level and combo multipliers
    BlockDestroyed { id: u32, points: u64 },
    PowerBall,
    SpeedUp { speed: f64 },
    LifeLost { lives_left: u8 },
    LifeGained { lives: u8 },
    LevelCleared { level: u32, bonus: u64 },
    LevelStarted { level: u32 },
    GameOver { score: u64 },
}

/// RNG state wrapper for serialization
///
/// Each draw reseeds from `(seed, draws)` so a saved state replays exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub draws: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, draws: 0 }
    }

    pub fn next_rng(&mut self) -> Pcg32 {
        let rng = Pcg32::seed_from_u64(self.seed ^ self.draws.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        self.draws += 1;
        rng
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng_state: RngState,
    pub canvas_width: f64,
    pub canvas_height: f64,
    /// Current level (0-based)
    pub level: u32,
    pub lives: u8,
    #[serde(default)]
    pub max_lives: u8,
    pub score: u64,
    /// Best score this session
    pub high_score: u64,
    /// Blocks destroyed since the ball last touched the paddle
    #[serde(default)]
    pub combo: u32,
    /// Longest combo this run
    #[serde(default)]
    pub max_combo: u32,
    /// Lives lost on the current level
    #[serde(default)]
    pub misses_this_level: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub paddle: Paddle,
    pub ball: Ball,
    /// Remaining blocks, in grid order
    pub blocks: Vec<Block>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed; no blocks yet
    pub fn new(seed: u64, tuning: &Tuning) -> Self {
        let paddle = Paddle::new(tuning);
        let mut ball = Ball::new(tuning.ball_radius);
        ball.attach_to(&paddle);

        Self {
            seed,
            rng_state: RngState::new(seed),
            canvas_width: tuning.canvas_width,
            canvas_height: tuning.canvas_height,
            level: 0,
            lives: tuning.lives,
            max_lives: tuning.max_lives,
            score: 0,
            high_score: 0,
            combo: 0,
            max_combo: 0,
            misses_this_level: 0,
            time_ticks: 0,
            phase: GamePhase::Serve,
            paddle,
            ball,
            blocks: Vec::new(),
            next_id: 1,
        }
    }

    /// Start a fresh run, keeping the seed stream and the session best
    pub fn reset(&mut self, tuning: &Tuning) {
        self.level = 0;
        self.lives = tuning.lives;
        self.max_lives = tuning.max_lives;
        self.score = 0;
        self.combo = 0;
        self.max_combo = 0;
        self.misses_this_level = 0;
        self.phase = GamePhase::Serve;
        self.blocks.clear();
        self.paddle = Paddle::new(tuning);
        self.ball = Ball::new(tuning.ball_radius);
        self.ball.attach_to(&self.paddle);
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn add_score(&mut self, points: u64) {
        self.score += points;
        self.high_score = self.high_score.max(self.score);
    }

    /// Points for destroying a block of `kind` at the current level and combo
    pub fn block_points(&self, kind: BlockKind, tuning: &Tuning) -> u64 {
        block_score(kind.points(), self.level, self.combo, tuning)
    }

    /// Extend the combo after a block is destroyed
    pub fn extend_combo(&mut self) {
        self.combo += 1;
        self.max_combo = self.max_combo.max(self.combo);
    }

    pub fn break_combo(&mut self) {
        self.combo = 0;
    }

    /// Bonus for clearing the level: per remaining life, plus a no-miss bonus
    pub fn clear_bonus(&self, tuning: &Tuning) -> u64 {
        let bonus = self.lives as u64 * tuning.clear_bonus_per_life;
        if self.misses_this_level == 0 {
            bonus + tuning.no_miss_bonus
        } else {
            bonus
        }
    }

    /// Add a life, up to `max_lives`; returns true if one was added
    pub fn gain_life(&mut self) -> bool {
        if self.phase == GamePhase::GameOver || self.lives >= self.max_lives {
            return false;
        }
        self.lives += 1;
        true
    }

    /// Take a life; returns true when that was the last one
    pub fn lose_life(&mut self) -> bool {
        self.combo = 0;
        self.misses_this_level += 1;
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.phase = GamePhase::GameOver;
            true
        } else {
            false
        }
    }

    /// No breakable blocks remain
    pub fn is_level_clear(&self) -> bool {
        !self.blocks.iter().any(Block::counts_for_clear)
    }

    /// Put the ball back on the paddle and wait for launch
    pub fn serve(&mut self) {
        self.ball.attach_to(&self.paddle);
        self.phase = GamePhase::Serve;
    }
}

/// Base points scaled by level (0-based) and combo
///
/// The combo multiplier is capped at `combo_max_multiplier`.
pub fn block_score(base: u64, level: u32, combo: u32, tuning: &Tuning) -> u64 {
    let level_mult = 1.0 + level as f64 * tuning.level_score_step;
    let combo_mult = (1.0 + combo as f64 * tuning.combo_score_step).min(tuning.combo_max_multiplier);
    let points = base as f64 * level_mult * combo_mult.max(1.0);
    // Absorb float error so 10 * 1.1 is 11, not 10
    (points + 1e-9).floor().max(0.0) as u64
}
