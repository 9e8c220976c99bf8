//! Fixed timestep simulation tick
//!
//! Core game loop that advances the simulation one frame per call.
//! Velocities are pixels per frame, so every tick uses `dt = 1`.

use rand::Rng;

use super::bounce::{paddle_bounce_angle, reflect_from_paddle, reflect_off_walls};
use super::collision::{Side, WallHits, circle_rect_contact, clamp_inside, reflect_velocity, wall_collision};
use super::shapes::Rect;
use super::state::{BallState, Block, BlockKind, GameEvent, GamePhase, GameState};
use crate::consts::SERVE_MAX_ANGLE;
use crate::tuning::Tuning;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Keyboard steering, -1 (left) to 1 (right)
    pub move_dir: f64,
    /// Pointer x position; wins over `move_dir` when set
    pub target_x: Option<f64>,
    /// Launch ball / continue after level clear or game over
    pub launch: bool,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the game state by one frame
///
/// Returns what happened this tick, in order.
pub fn tick(state: &mut GameState, input: &TickInput, tuning: &Tuning) -> Vec<GameEvent> {
    let mut events = Vec::new();

    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing | GamePhase::Serve => {
                state.phase = GamePhase::Paused;
                events.push(GameEvent::Paused);
                return events;
            }
            GamePhase::Paused => {
                state.phase = if state.ball.state == BallState::Attached {
                    GamePhase::Serve
                } else {
                    GamePhase::Playing
                };
                events.push(GameEvent::Resumed);
            }
            _ => {}
        }
    }

    match state.phase {
        GamePhase::Paused => return events,
        GamePhase::GameOver => {
            if input.launch {
                log::info!("Starting new run (last score {})", state.score);
                state.reset(tuning);
                generate_level(state, tuning);
                events.push(GameEvent::LevelStarted { level: state.level });
            }
            return events;
        }
        GamePhase::LevelComplete => {
            if input.launch {
                state.level += 1;
                state.misses_this_level = 0;
                generate_level(state, tuning);
                state.serve();
                events.push(GameEvent::LevelStarted { level: state.level });
            }
            return events;
        }
        GamePhase::Serve | GamePhase::Playing => {}
    }

    state.time_ticks += 1;
    move_paddle(state, input, tuning);

    match state.phase {
        GamePhase::Serve => {
            state.ball.follow(&state.paddle);

            if input.launch {
                let offset = state
                    .rng_state
                    .next_rng()
                    .random_range(-SERVE_MAX_ANGLE..=SERVE_MAX_ANGLE);
                state.ball.launch(tuning.ball_speed, offset);
                state.phase = GamePhase::Playing;
                events.push(GameEvent::Launched);
            }
        }
        GamePhase::Playing => step_ball(state, tuning, &mut events),
        _ => {}
    }

    events
}

fn move_paddle(state: &mut GameState, input: &TickInput, tuning: &Tuning) {
    let width = state.canvas_width;
    match input.target_x {
        Some(target) if target.is_finite() => {
            state.paddle.move_toward(target, tuning.paddle_speed, width);
        }
        _ if input.move_dir.is_finite() && input.move_dir != 0.0 => {
            state
                .paddle
                .move_by(input.move_dir.clamp(-1.0, 1.0) * tuning.paddle_speed, width);
        }
        _ => {}
    }
}

/// Move the free ball and resolve walls, paddle and blocks
fn step_ball(state: &mut GameState, tuning: &Tuning, events: &mut Vec<GameEvent>) {
    state.ball.advance(1.0, tuning.ball_max_speed);

    // --- WALLS ---
    let circle = state.ball.circle();
    let hits = wall_collision(&circle, state.canvas_width, state.canvas_height);
    if hits.any() {
        state.ball.pos = clamp_inside(&circle, state.canvas_width);

        // Only reflect off walls the ball is heading into, so a ball resting
        // on a wall after correction can't flip back and forth
        let vel = state.ball.vel;
        let approaching = WallHits {
            left: hits.left && vel.x < 0.0,
            right: hits.right && vel.x > 0.0,
            top: hits.top && vel.y < 0.0,
            bottom: hits.bottom,
        };
        let bounce = reflect_off_walls(vel, approaching);
        if bounce.velocity != vel {
            events.push(GameEvent::WallBounce);
        }
        state.ball.vel = bounce.velocity;

        if bounce.life_lost {
            if state.lose_life() {
                state.ball.attach_to(&state.paddle);
                log::info!("Game over: score {} (best {})", state.score, state.high_score);
                events.push(GameEvent::LifeLost { lives_left: 0 });
                events.push(GameEvent::GameOver { score: state.score });
            } else {
                log::debug!("Ball lost, {} lives left", state.lives);
                events.push(GameEvent::LifeLost {
                    lives_left: state.lives,
                });
                state.serve();
            }
            return;
        }
    }

    // --- PADDLE ---
    // Only while falling, so the ball can't be caught twice on the way up
    let circle = state.ball.circle();
    let paddle = state.paddle.rect;
    if state.ball.vel.y > 0.0 {
        if let Some(contact) = circle_rect_contact(&circle, &paddle) {
            if contact.side == Side::Top || circle.center.y < paddle.top() {
                let angle = paddle_bounce_angle(&circle, &paddle);
                state.ball.vel = reflect_from_paddle(state.ball.vel, &circle, &paddle);
                state.ball.pos.y = paddle.top() - state.ball.radius;
                events.push(GameEvent::PaddleHit { angle });
                state.break_combo();
                register_hit(state, tuning, events);
            }
        }
    }

    // --- BLOCKS ---
    let circle = state.ball.circle();
    let contacts: Vec<_> = state
        .blocks
        .iter()
        .enumerate()
        .filter_map(|(i, block)| circle_rect_contact(&circle, &block.rect).map(|c| (i, c)))
        .collect();
    if contacts.is_empty() {
        return;
    }

    // A power ball plows through everything it touches; a normal ball bounces
    // off the first block in grid order and damages only that one
    let power = state.ball.is_power_ball();
    let targets = if power { &contacts[..] } else { &contacts[..1] };

    if !power {
        let contact = contacts[0].1;
        if state.ball.vel.dot(contact.normal) < 0.0 {
            state.ball.vel = reflect_velocity(state.ball.vel, contact.normal);
        }
        state.ball.pos += contact.normal * contact.penetration.max(0.0);
    }

    let mut destroyed_any = false;
    for &(i, _) in targets {
        let block = &mut state.blocks[i];
        let id = block.id;
        let kind = block.kind;
        let destroyed = block.damage();

        events.push(GameEvent::BlockHit { id });
        if destroyed {
            let points = state.block_points(kind, tuning);
            state.extend_combo();
            events.push(GameEvent::BlockDestroyed { id, points });
            award_points(state, points, tuning, events);
            destroyed_any = true;
        }
    }
    register_hit(state, tuning, events);

    if !destroyed_any {
        return;
    }
    state.blocks.retain(|b| !b.is_destroyed());

    if !power && tuning.power_ball_chance > 0.0 {
        let roll: f64 = state.rng_state.next_rng().random();
        if roll < tuning.power_ball_chance {
            state.ball.enable_power_ball(tuning.power_ball_ticks);
            events.push(GameEvent::PowerBall);
        }
    }

    if state.is_level_clear() {
        let bonus = state.clear_bonus(tuning);
        award_points(state, bonus, tuning, events);
        log::info!(
            "Level {} cleared, bonus {}, score {}",
            state.level,
            bonus,
            state.score
        );
        state.phase = GamePhase::LevelComplete;
        state.ball.attach_to(&state.paddle);
        events.push(GameEvent::LevelCleared {
            level: state.level,
            bonus,
        });
    }
}

/// Add points, awarding a life each time the score crosses an
/// `extra_life_score` multiple
fn award_points(state: &mut GameState, points: u64, tuning: &Tuning, events: &mut Vec<GameEvent>) {
    let before = state.score;
    state.add_score(points);

    let every = tuning.extra_life_score;
    if every > 0 && before / every < state.score / every && state.gain_life() {
        log::debug!("Extra life at {} points", state.score);
        events.push(GameEvent::LifeGained { lives: state.lives });
    }
}

fn register_hit(state: &mut GameState, tuning: &Tuning, events: &mut Vec<GameEvent>) {
    if let Some(speed) = state.ball.on_hit(
        tuning.speedup_every_hits,
        tuning.speedup_amount,
        tuning.ball_max_speed,
    ) {
        log::debug!("Ball speed up to {:.2}", speed);
        events.push(GameEvent::SpeedUp { speed });
    }
}

/// Lay out the block grid for the current level
///
/// The top row is always breakable. Each level adds one more row of tougher
/// blocks at the top.
pub fn generate_level(state: &mut GameState, tuning: &Tuning) {
    state.blocks.clear();
    let mut rng = state.rng_state.next_rng();
    let level = state.level;

    for row in 0..tuning.block_rows {
        for col in 0..tuning.block_cols {
            let x = tuning.block_left_offset + col as f64 * (tuning.block_width + tuning.block_padding);
            let y = tuning.block_top_offset + row as f64 * (tuning.block_height + tuning.block_padding);
            let kind = determine_block_kind(row, level, tuning, &mut rng);
            let id = state.next_entity_id();
            state.blocks.push(Block::new(
                id,
                kind,
                Rect::new(x, y, tuning.block_width, tuning.block_height),
                row,
            ));
        }
    }

    let breakable = state.blocks.iter().filter(|b| b.counts_for_clear()).count();
    log::info!(
        "Level {}: {} blocks ({} breakable)",
        level,
        state.blocks.len(),
        breakable
    );
}

fn determine_block_kind(row: u32, level: u32, tuning: &Tuning, rng: &mut impl Rng) -> BlockKind {
    let super_hard_rows = level.min(tuning.block_rows.saturating_sub(1));
    let hard_rows = level + 1;

    if row < super_hard_rows {
        BlockKind::SuperHard
    } else if row < super_hard_rows + hard_rows {
        BlockKind::Hard
    } else if rng.random::<f64>() < tuning.unbreakable_chance {
        BlockKind::Unbreakable
    } else {
        BlockKind::Normal
    }
}

/// Ball position a perfect player would aim the paddle at
pub fn autopilot_target(state: &GameState) -> f64 {
    match state.ball.state {
        BallState::Attached => state.canvas_width / 2.0,
        BallState::Free => state.ball.pos.x,
    }
}
