//! Headless demo runner
//!
//! Seeds a survival round, drives the paddle with a trivial ball-tracking
//! autopilot for up to a minute of simulated time, and prints the final
//! world-state snapshot as JSON. Useful for eyeballing the simulation
//! without a renderer (RUST_LOG=debug shows spawns and pickups).

use brick_blitz::consts::{PADDLE_SPEED, TICKS_PER_SECOND};
use brick_blitz::{GameEvent, GameState, Mode, Screen, advance_frame};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .map(|arg| arg.parse())
        .transpose()?
        .unwrap_or(0xB1A57);

    let mut state = GameState::new(seed)?;
    state.start_game(Mode::Survival);

    let mut paddle_hits = 0u32;
    let mut wall_bounces = 0u32;
    for _ in 0..60 * TICKS_PER_SECOND {
        // Chase the ball with the held-key flags, like a player would
        let center = state.paddle.x + state.paddle.width / 2.0;
        state.set_left_held(state.ball.pos.x < center - PADDLE_SPEED);
        state.set_right_held(state.ball.pos.x > center + PADDLE_SPEED);

        advance_frame(&mut state);
        for event in state.drain_events() {
            match event {
                GameEvent::PaddleHit => paddle_hits += 1,
                GameEvent::WallBounce => wall_bounces += 1,
            }
        }
        if state.screen == Screen::GameOver {
            break;
        }
    }

    log::info!(
        "run finished after {} ticks: score {}, {} paddle hits, {} wall bounces",
        state.tick,
        state.score,
        paddle_hits,
        wall_bounces
    );
    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(())
}
