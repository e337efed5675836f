//! Fixed timestep frame update
//!
//! `advance_frame` is the whole core loop body: one call per logical tick
//! while the screen is `Playing` and the game is unpaused. Sub-steps run in
//! a fixed order (paddle, bricks, challenge dynamics, ball, walls, bottom
//! exit, paddle bounce, power-ups, timed reversions) so a frame is fully
//! deterministic for a given state.

use glam::Vec2;
use rand::Rng;

use super::collision::renormalize;
use super::levels;
use super::state::{
    BallState, GameEvent, GameState, Mode, PowerUp, PowerUpKind, RevertAction, Screen,
};
use crate::consts::*;

/// Advance the simulation by one logical tick
pub fn advance_frame(state: &mut GameState) {
    if state.screen != Screen::Playing || state.paused {
        return;
    }
    state.tick += 1;

    move_paddle(state);

    if state.mode.rules().uses_bricks {
        resolve_brick_hits(state);
        // Clearing level 10 ends the run inside the hit pass
        if state.screen != Screen::Playing {
            return;
        }
    }

    if state.mode == Mode::Challenge {
        advance_and_sway_bricks(state);
        // Bricks reaching the paddle line end the run
        if state.screen != Screen::Playing {
            return;
        }
    }

    move_ball(state);
    resolve_wall_bounces(state);
    if handle_bottom_exit(state) {
        return;
    }
    resolve_paddle_bounce(state);
    update_powerups(state);
    process_reverts(state);
}

/// Paddle movement from the held-input flags, clamped to the canvas.
/// Right wins when both keys are held. The paddle center is recorded to
/// the trail every frame, moving or not.
fn move_paddle(state: &mut GameState) {
    if state.right_held {
        state.paddle.x += state.paddle.speed;
    } else if state.left_held {
        state.paddle.x -= state.paddle.speed;
    }
    state.paddle.x = state.paddle.x.clamp(0.0, CANVAS_WIDTH - state.paddle.width);
    state.paddle_trail.push(state.paddle.rect().center());
}

/// Ball-center-vs-brick hit pass. No early exit: the ball may hit several
/// bricks in one frame, flipping dy once per hit.
fn resolve_brick_hits(state: &mut GameState) {
    if state.ball.state != BallState::Free {
        return;
    }

    for i in 0..state.bricks.len() {
        if !state.bricks[i].alive || !state.bricks[i].rect().contains_point(state.ball.pos) {
            continue;
        }

        state.ball.vel.y = -state.ball.vel.y;
        state.bricks[i].hp_remaining = state.bricks[i].hp_remaining.saturating_sub(1);
        state.score += state.bricks[i].score_value;
        update_speed_scaling(state);

        if state.bricks[i].hp_remaining == 0 {
            state.bricks[i].alive = false;
            // Only top-tier bricks drop power-ups
            if state.bricks[i].hit_points == 3 {
                let center = state.bricks[i].rect().center();
                maybe_drop_powerup(state, center);
            }
        }
    }

    if state.mode == Mode::Challenge
        && !state.bricks.is_empty()
        && state.bricks.iter().all(|b| !b.alive)
    {
        advance_level(state);
    }
}

fn maybe_drop_powerup(state: &mut GameState, center: Vec2) {
    let drop = match state.mode {
        Mode::Challenge => true,
        Mode::Survival => state.rng.random_bool(SURVIVAL_DROP_CHANCE),
        Mode::Classic => false,
    };
    if !drop {
        return;
    }
    let kind = match state.rng.random_range(0..4u8) {
        0 => PowerUpKind::PaddleExtend,
        1 => PowerUpKind::PaddleShrink,
        2 => PowerUpKind::ExtraLife,
        _ => PowerUpKind::BallSpeedUp,
    };
    let fall_speed = state
        .rng
        .random_range(POWERUP_MIN_FALL_SPEED..=POWERUP_MAX_FALL_SPEED);
    state.powerups.push(PowerUp {
        kind,
        pos: center - Vec2::splat(POWERUP_SIZE / 2.0),
        size: POWERUP_SIZE,
        fall_speed,
    });
    log::debug!("power-up dropped: {kind:?}");
}

/// Level clear: load the next layout or end the run past the last level
fn advance_level(state: &mut GameState) {
    let next = state.level + 1;
    if state.load_challenge_level(next) {
        state.level = next;
        state.powerups.clear();
        state.ball_trail.clear();
        state.paddle_trail.clear();
        state.sway_offset = 0.0;
        state.sway_dir = 1.0;
        state.next_advance_tick = state.tick + CHALLENGE_ADVANCE_TICKS;
        state.respawn_ball();
        log::info!("level cleared, starting level {next}");
    } else {
        log::info!("challenge complete");
        state.screen = Screen::GameOver;
    }
}

/// Challenge brick dynamics: the timed downward march plus per-frame sway
fn advance_and_sway_bricks(state: &mut GameState) {
    if state.tick >= state.next_advance_tick {
        state.next_advance_tick = state.tick + CHALLENGE_ADVANCE_TICKS;
        for brick in state.bricks.iter_mut().filter(|b| b.alive) {
            brick.y += BRICK_HEIGHT + BRICK_PADDING;
        }
        log::info!("bricks advanced a row");
        if state
            .bricks
            .iter()
            .any(|b| b.alive && b.rect().bottom() >= state.paddle.y)
        {
            log::info!("bricks reached the paddle, run over");
            state.screen = Screen::GameOver;
            return;
        }
    }

    state.sway_offset += state.sway_dir * SWAY_STEP;
    if state.sway_offset.abs() >= SWAY_LIMIT {
        state.sway_offset = state.sway_offset.clamp(-SWAY_LIMIT, SWAY_LIMIT);
        state.sway_dir = -state.sway_dir;
    }
    let offset = state.sway_offset;
    for brick in state.bricks.iter_mut().filter(|b| b.alive) {
        brick.x = brick.initial_x + offset;
    }
}

/// Ball translation (attached balls track the paddle until launch)
fn move_ball(state: &mut GameState) {
    match state.ball.state {
        BallState::Attached => {
            state.ball.pos = Vec2::new(
                state.paddle.rect().center_x(),
                state.paddle.y - state.ball.radius,
            );
            if state.launch_requested {
                state.ball.vel = Vec2::new(BASE_BALL_SPEED, -BASE_BALL_SPEED);
                state.ball.state = BallState::Free;
                log::debug!("ball launched");
            }
        }
        BallState::Free => {
            state.ball.pos += state.ball.vel;
            state.ball_trail.push(state.ball.pos);
        }
    }
    state.launch_requested = false;
}

/// Side and top wall reflections. Contact exactly at the wall reflects on
/// this frame; the direction guard keeps a resting contact from double
/// flipping.
fn resolve_wall_bounces(state: &mut GameState) {
    if state.ball.state != BallState::Free {
        return;
    }
    let mut bounces = 0;
    let ball = &state.ball;
    if (ball.pos.x - ball.radius <= 0.0 && ball.vel.x < 0.0)
        || (ball.pos.x + ball.radius >= CANVAS_WIDTH && ball.vel.x > 0.0)
    {
        state.ball.vel.x = -state.ball.vel.x;
        bounces += 1;
    }
    let ball = &state.ball;
    if ball.pos.y - ball.radius <= 0.0 && ball.vel.y < 0.0 {
        state.ball.vel.y = -state.ball.vel.y;
        bounces += 1;
    }
    for _ in 0..bounces {
        state.push_event(GameEvent::WallBounce);
    }
}

/// Bottom exit: decrement lives and respawn, or end the run.
///
/// With exactly one life left the run ends with the displayed lives still
/// at 1; the counter never shows 0.
fn handle_bottom_exit(state: &mut GameState) -> bool {
    if state.ball.state != BallState::Free {
        return false;
    }
    if state.ball.pos.y + state.ball.radius <= CANVAS_HEIGHT {
        return false;
    }
    match state.lives {
        None => {
            log::info!("ball lost, game over (score {})", state.score);
            state.screen = Screen::GameOver;
        }
        Some(lives) if lives <= 1 => {
            log::info!("last ball lost, game over (score {})", state.score);
            state.screen = Screen::GameOver;
        }
        Some(lives) => {
            state.lives = Some(lives - 1);
            log::info!("ball lost, {} lives left", lives - 1);
            state.respawn_ball();
        }
    }
    true
}

/// Paddle bounce: invert dy, deflect dx by the hit offset, renormalize to
/// the pre-collision speed, and nudge the ball clear of the paddle.
fn resolve_paddle_bounce(state: &mut GameState) {
    if state.ball.state != BallState::Free {
        return;
    }
    let paddle_rect = state.paddle.rect();
    if !paddle_rect.overlaps_circle(state.ball.pos, state.ball.radius) {
        return;
    }

    let speed = state.ball.speed();
    state.ball.vel.y = -state.ball.vel.y;
    let half_width = paddle_rect.w / 2.0;
    let offset = ((state.ball.pos.x - paddle_rect.center_x()) / half_width).clamp(-1.0, 1.0);
    state.ball.vel.x += offset * SPIN_FACTOR;
    state.ball.vel = renormalize(state.ball.vel, speed);
    state.ball.pos.y = state.paddle.y - state.ball.radius;

    match state.mode {
        Mode::Survival => {
            state.paddle_hits += 1;
            if state.paddle_hits % SURVIVAL_SPAWN_HITS == 0 {
                spawn_survival_brick(state);
            }
        }
        Mode::Classic | Mode::Challenge => {
            state.score += 1;
            update_speed_scaling(state);
        }
    }
    state.push_event(GameEvent::PaddleHit);
}

/// Survival brick spawn with a single-shot placement check: an overlapping
/// position skips the spawn for this attempt instead of retrying.
fn spawn_survival_brick(state: &mut GameState) {
    let brick = levels::generate_survival_brick(&mut state.rng);
    let rect = brick.rect();
    if state
        .bricks
        .iter()
        .any(|b| b.alive && b.rect().overlaps(&rect))
    {
        log::debug!("brick spawn skipped, placement overlapped");
        return;
    }
    log::debug!(
        "brick spawned at ({:.0}, {:.0}) with {} hp",
        brick.x,
        brick.y,
        brick.hit_points
    );
    state.bricks.push(brick);
}

/// Scale ball velocity when the score crosses a new threshold multiple,
/// and raise the transient banner (self-clears after 1 second)
fn update_speed_scaling(state: &mut GameState) {
    let threshold = state.mode.rules().speed_threshold;
    let new_level = state.score / threshold;
    if new_level > state.speed_level {
        state.speed_level = new_level;
        state.ball.vel *= SPEED_GROWTH_FACTOR;
        state.speed_banner = true;
        state.schedule_revert(RevertAction::ClearSpeedBanner, SPEED_BANNER_TICKS);
        log::info!("speed level {new_level}");
    }
}

/// Power-up fall, paddle pickup, and off-screen removal
fn update_powerups(state: &mut GameState) {
    let paddle_rect = state.paddle.rect();
    let mut collected = Vec::new();
    state.powerups.retain_mut(|p| {
        p.pos.y += p.fall_speed;
        if p.rect().overlaps(&paddle_rect) {
            collected.push(p.kind);
            return false;
        }
        // Fell past the canvas: remove without effect
        p.pos.y < CANVAS_HEIGHT
    });
    for kind in collected {
        apply_powerup(state, kind);
    }
}

fn apply_powerup(state: &mut GameState, kind: PowerUpKind) {
    log::debug!("power-up collected: {kind:?}");
    match kind {
        PowerUpKind::PaddleExtend => {
            state.paddle.width = PADDLE_WIDTH * PADDLE_EXTEND_FACTOR;
            state.schedule_revert(RevertAction::RestorePaddleWidth, POWERUP_EFFECT_TICKS);
        }
        PowerUpKind::PaddleShrink => {
            state.paddle.width = PADDLE_WIDTH * PADDLE_SHRINK_FACTOR;
            state.schedule_revert(RevertAction::RestorePaddleWidth, POWERUP_EFFECT_TICKS);
        }
        PowerUpKind::ExtraLife => {
            if let Some(lives) = state.lives {
                state.lives = Some(lives.saturating_add(1));
            }
        }
        PowerUpKind::BallSpeedUp => {
            state.ball.vel *= BALL_SPEEDUP_FACTOR;
            state.schedule_revert(RevertAction::UnscaleBallSpeed, POWERUP_EFFECT_TICKS);
        }
    }
}

/// Apply every timed reversion that has come due
fn process_reverts(state: &mut GameState) {
    let tick = state.tick;
    let mut due = Vec::new();
    state.pending_reverts.retain(|revert| {
        if revert.at_tick <= tick {
            due.push(revert.action);
            false
        } else {
            true
        }
    });
    for action in due {
        match action {
            RevertAction::ClearSpeedBanner => state.speed_banner = false,
            RevertAction::RestorePaddleWidth => state.paddle.width = PADDLE_WIDTH,
            RevertAction::UnscaleBallSpeed => state.ball.vel /= BALL_SPEEDUP_FACTOR,
        }
    }
}
