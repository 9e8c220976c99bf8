//! Data-driven game balance
//!
//! Loaded from JSON. Every field has a default, so a tuning file only needs
//! the values it changes.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Errors from loading or validating a tuning file
#[derive(Debug)]
pub enum TuningError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid { field: &'static str, reason: String },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Io(e) => write!(f, "failed to read tuning file: {e}"),
            TuningError::Parse(e) => write!(f, "failed to parse tuning: {e}"),
            TuningError::Invalid { field, reason } => write!(f, "invalid tuning `{field}`: {reason}"),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::Io(e) => Some(e),
            TuningError::Parse(e) => Some(e),
            TuningError::Invalid { .. } => None,
        }
    }
}

impl From<std::io::Error> for TuningError {
    fn from(e: std::io::Error) -> Self {
        TuningError::Io(e)
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(e: serde_json::Error) -> Self {
        TuningError::Parse(e)
    }
}

/// Difficulty presets, differing in starting lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn starting_lives(self) -> u8 {
        match self {
            Difficulty::Easy => 5,
            Difficulty::Normal => INITIAL_LIVES,
            Difficulty::Hard => 1,
        }
    }
}

/// Game balance values
///
/// Distances are pixels, speeds are pixels per frame, durations are ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Canvas ===
    pub canvas_width: f64,
    pub canvas_height: f64,

    // === Ball ===
    pub ball_radius: f64,
    /// Launch speed
    pub ball_speed: f64,
    pub ball_max_speed: f64,
    /// Hits between speed-ups (0 disables)
    pub speedup_every_hits: u32,
    pub speedup_amount: f64,

    // === Paddle ===
    pub paddle_width: f64,
    pub paddle_height: f64,
    pub paddle_speed: f64,
    /// Gap between paddle bottom and canvas bottom
    pub paddle_bottom_margin: f64,

    pub lives: u8,
    /// Lives can't be gained past this
    pub max_lives: u8,
    /// Award a life every time the score crosses a multiple of this (0 disables)
    pub extra_life_score: u64,

    // === Scoring ===
    /// Block points grow by this fraction per level
    pub level_score_step: f64,
    /// Block points grow by this fraction per combo step
    pub combo_score_step: f64,
    pub combo_max_multiplier: f64,
    pub clear_bonus_per_life: u64,
    /// Extra bonus for clearing a level without losing a life
    pub no_miss_bonus: u64,

    // === Block grid ===
    pub block_rows: u32,
    pub block_cols: u32,
    pub block_width: f64,
    pub block_height: f64,
    pub block_padding: f64,
    pub block_top_offset: f64,
    pub block_left_offset: f64,
    /// Chance a block in the rows below the top becomes unbreakable
    pub unbreakable_chance: f64,

    // === Power ball ===
    /// Chance a destroyed block turns the ball into a power ball
    pub power_ball_chance: f64,
    pub power_ball_ticks: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,

            ball_radius: BALL_RADIUS,
            ball_speed: BALL_START_SPEED,
            ball_max_speed: BALL_MAX_SPEED,
            speedup_every_hits: 10,
            speedup_amount: 0.1,

            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_speed: PADDLE_SPEED,
            paddle_bottom_margin: PADDLE_BOTTOM_MARGIN,

            lives: INITIAL_LIVES,
            max_lives: MAX_LIVES,
            extra_life_score: 10_000,

            level_score_step: 0.2,
            combo_score_step: 0.1,
            combo_max_multiplier: 3.0,
            clear_bonus_per_life: 500,
            no_miss_bonus: 500,

            block_rows: 5,
            block_cols: 10,
            block_width: 70.0,
            block_height: 20.0,
            block_padding: 8.0,
            block_top_offset: 60.0,
            block_left_offset: 14.0,
            unbreakable_chance: 0.0,

            power_ball_chance: 0.05,
            power_ball_ticks: 300,
        }
    }
}

impl Tuning {
    /// Default tuning with the starting lives of `difficulty`
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        Self::default().with_difficulty(difficulty)
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.lives = difficulty.starting_lives();
        self.max_lives = self.max_lives.max(self.lives);
        self
    }

    /// Parse and validate a JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load and validate a JSON tuning file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Right edge of the block grid
    pub fn grid_right(&self) -> f64 {
        let cols = self.block_cols as f64;
        self.block_left_offset + cols * self.block_width + (cols - 1.0).max(0.0) * self.block_padding
    }

    /// Bottom edge of the block grid
    pub fn grid_bottom(&self) -> f64 {
        let rows = self.block_rows as f64;
        self.block_top_offset + rows * self.block_height + (rows - 1.0).max(0.0) * self.block_padding
    }

    /// Check that values make a playable game
    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> TuningError {
            TuningError::Invalid {
                field,
                reason: reason.into(),
            }
        }

        let positive = [
            ("canvas_width", self.canvas_width),
            ("canvas_height", self.canvas_height),
            ("ball_radius", self.ball_radius),
            ("ball_speed", self.ball_speed),
            ("ball_max_speed", self.ball_max_speed),
            ("paddle_width", self.paddle_width),
            ("paddle_height", self.paddle_height),
            ("paddle_speed", self.paddle_speed),
            ("block_width", self.block_width),
            ("block_height", self.block_height),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid(field, format!("must be a positive number, got {value}")));
            }
        }

        let non_negative = [
            ("speedup_amount", self.speedup_amount),
            ("level_score_step", self.level_score_step),
            ("combo_score_step", self.combo_score_step),
            ("paddle_bottom_margin", self.paddle_bottom_margin),
            ("block_padding", self.block_padding),
            ("block_top_offset", self.block_top_offset),
            ("block_left_offset", self.block_left_offset),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(field, format!("must be >= 0, got {value}")));
            }
        }

        for (field, value) in [
            ("unbreakable_chance", self.unbreakable_chance),
            ("power_ball_chance", self.power_ball_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(field, format!("must be within [0, 1], got {value}")));
            }
        }

        if self.ball_radius * 2.0 >= self.canvas_width {
            return Err(invalid("ball_radius", "ball is wider than the canvas"));
        }
        if self.ball_radius * 2.0 >= self.canvas_height {
            return Err(invalid("ball_radius", "ball is taller than the canvas"));
        }
        if !(self.combo_max_multiplier >= 1.0) || !self.combo_max_multiplier.is_finite() {
            return Err(invalid("combo_max_multiplier", "must be a finite number >= 1"));
        }
        if self.ball_max_speed < self.ball_speed {
            return Err(invalid("ball_max_speed", "must be at least ball_speed"));
        }
        if self.paddle_width > self.canvas_width {
            return Err(invalid("paddle_width", "wider than the canvas"));
        }
        if self.paddle_bottom_margin + self.paddle_height >= self.canvas_height {
            return Err(invalid("paddle_bottom_margin", "paddle would sit above the canvas"));
        }
        if self.lives == 0 {
            return Err(invalid("lives", "must be at least 1"));
        }
        if self.max_lives < self.lives {
            return Err(invalid("max_lives", "must be at least lives"));
        }
        if self.block_rows == 0 || self.block_cols == 0 {
            return Err(invalid("block_rows", "grid needs at least one row and column"));
        }
        if self.grid_right() > self.canvas_width {
            return Err(invalid(
                "block_cols",
                format!("grid is {} px wide, canvas {}", self.grid_right(), self.canvas_width),
            ));
        }
        let paddle_top = self.canvas_height - self.paddle_bottom_margin - self.paddle_height;
        if self.grid_bottom() >= paddle_top {
            return Err(invalid("block_rows", "grid overlaps the paddle"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert!(tuning.grid_right() <= tuning.canvas_width);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let tuning = Tuning::from_json(r#"{ "lives": 5, "ball_radius": 6.0 }"#).unwrap();
        assert_eq!(tuning.lives, 5);
        assert_eq!(tuning.ball_radius, 6.0);
        assert_eq!(tuning.canvas_width, CANVAS_WIDTH);
        assert_eq!(tuning.paddle_width, PADDLE_WIDTH);
    }

    #[test]
    fn test_json_round_trip() {
        let tuning = Tuning::default();
        let json = tuning.to_json().unwrap();
        let loaded = Tuning::from_json(&json).unwrap();
        assert_eq!(loaded.block_cols, tuning.block_cols);
        assert!((loaded.ball_speed - tuning.ball_speed).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = Tuning::from_json(r#"{ "paddle_width": 0.0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "paddle_width", .. }));

        let err = Tuning::from_json(r#"{ "lives": 0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "lives", .. }));

        let err = Tuning::from_json(r#"{ "ball_speed": 20.0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "ball_max_speed", .. }));

        let err = Tuning::from_json(r#"{ "block_cols": 40 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "block_cols", .. }));

        let err = Tuning::from_json(r#"{ "power_ball_chance": 1.5 }"#).unwrap_err();
        assert!(err.to_string().contains("power_ball_chance"));
    }

    #[test]
    fn test_rejects_oversized_ball() {
        let err = Tuning::from_json(r#"{ "ball_radius": 400.0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "ball_radius", .. }));

        let err = Tuning::from_json(r#"{ "ball_radius": 300.0 }"#).unwrap_err();
        assert!(err.to_string().contains("taller"));

        assert!(Tuning::from_json(r#"{ "ball_radius": 25.0 }"#).is_ok());
    }

    #[test]
    fn test_scoring_and_lives_limits() {
        let err = Tuning::from_json(r#"{ "lives": 4, "max_lives": 3 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "max_lives", .. }));

        let err = Tuning::from_json(r#"{ "combo_max_multiplier": 0.5 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "combo_max_multiplier", .. }));

        let err = Tuning::from_json(r#"{ "level_score_step": -0.1 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "level_score_step", .. }));
    }

    #[test]
    fn test_difficulty_presets() {
        assert_eq!(Tuning::for_difficulty(Difficulty::Easy).lives, 5);
        assert_eq!(Tuning::for_difficulty(Difficulty::Normal).lives, INITIAL_LIVES);
        assert_eq!(Tuning::for_difficulty(Difficulty::Hard).lives, 1);
        for d in [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard] {
            assert!(Tuning::for_difficulty(d).validate().is_ok());
        }

        let d: Difficulty = serde_json::from_str(r#""hard""#).unwrap();
        assert_eq!(d, Difficulty::Hard);
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = Tuning::from_json("{ lives: 3 ").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = Tuning::load("/definitely/not/a/tuning.json").unwrap_err();
        assert!(matches!(err, TuningError::Io(_)));
    }
}
