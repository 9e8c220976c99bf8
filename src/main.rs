//! Breakout sim headless runner
//!
//! Plays a seeded autopilot game for a fixed number of ticks and logs what
//! happens. Set `RUST_LOG=info` (or `debug`) to see the event stream.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use breakout_sim::{Difficulty, Tuning};
use breakout_sim::sim::tick::autopilot_target;
use breakout_sim::sim::{GameEvent, GamePhase, GameState, TickInput, generate_level, tick};

#[derive(Parser, Debug)]
#[command(about = "Run a headless Breakout simulation with an autopilot paddle", version)]
struct Args {
    /// RNG seed for the run
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Number of fixed ticks to simulate
    #[arg(long, default_value_t = 10_000)]
    ticks: u64,
    /// JSON tuning file; missing fields use defaults
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// Starting lives preset, applied on top of the tuning
    #[arg(long, value_enum)]
    difficulty: Option<DifficultyArg>,
    /// Print the final game state as JSON
    #[arg(long)]
    dump_state: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum DifficultyArg {
    Easy,
    Normal,
    Hard,
}

impl From<DifficultyArg> for Difficulty {
    fn from(arg: DifficultyArg) -> Self {
        match arg {
            DifficultyArg::Easy => Difficulty::Easy,
            DifficultyArg::Normal => Difficulty::Normal,
            DifficultyArg::Hard => Difficulty::Hard,
        }
    }
}

/// Offset from the ball the autopilot aims at, cycling so the paddle
/// doesn't always return the ball straight up
fn aim_offset(tick: u64, paddle_width: f64) -> f64 {
    let step = (tick / 120 % 5) as f64 - 2.0;
    step * paddle_width / 6.0
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let tuning = match &args.tuning {
        Some(path) => Tuning::load(path)
            .with_context(|| format!("loading tuning from {}", path.display()))?,
        None => Tuning::default(),
    };
    let tuning = match args.difficulty {
        Some(d) => tuning.with_difficulty(d.into()),
        None => tuning,
    };

    log::info!("Breakout sim starting (seed {}, {} ticks)", args.seed, args.ticks);

    let mut state = GameState::new(args.seed, &tuning);
    generate_level(&mut state, &tuning);

    let mut paddle_hits = 0u64;
    let mut blocks_destroyed = 0u64;
    let mut runs = 1u32;

    for _ in 0..args.ticks {
        let ready = matches!(
            state.phase,
            GamePhase::Serve | GamePhase::LevelComplete | GamePhase::GameOver
        );
        let input = TickInput {
            target_x: Some(autopilot_target(&state) + aim_offset(state.time_ticks, tuning.paddle_width)),
            launch: ready,
            ..Default::default()
        };

        for event in tick(&mut state, &input, &tuning) {
            match event {
                GameEvent::PaddleHit { angle } => {
                    paddle_hits += 1;
                    log::debug!("Paddle hit at {:.1} deg", breakout_sim::rad_to_deg(angle));
                }
                GameEvent::BlockDestroyed { id, points } => {
                    blocks_destroyed += 1;
                    log::debug!("Block {} destroyed (+{})", id, points);
                }
                GameEvent::LifeLost { lives_left } => log::info!("Life lost, {} left", lives_left),
                GameEvent::LevelStarted { level } => {
                    if level == 0 && state.time_ticks > 0 {
                        runs += 1;
                    }
                    log::info!("Level {} started", level);
                }
                GameEvent::LifeGained { lives } => log::info!("Extra life, {} now", lives),
                GameEvent::LevelCleared { level, bonus } => {
                    log::info!("Level {} cleared (+{} bonus)", level, bonus)
                }
                GameEvent::PowerBall => log::info!("Power ball!"),
                GameEvent::SpeedUp { speed } => log::debug!("Speed up: {:.2}", speed),
                _ => {}
            }
        }
    }

    println!(
        "seed={} ticks={} runs={} level={} score={} best={} lives={} max_combo={} paddle_hits={} blocks_destroyed={} phase={:?}",
        args.seed,
        state.time_ticks,
        runs,
        state.level,
        state.score,
        state.high_score,
        state.lives,
        state.max_combo,
        paddle_hits,
        blocks_destroyed,
        state.phase
    );

    if args.dump_state {
        let json = serde_json::to_string_pretty(&state).context("serializing game state")?;
        println!("{json}");
    }

    Ok(())
}
