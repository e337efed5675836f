//! Cross-module simulation properties

use glam::Vec2;
use proptest::prelude::*;

use brick_blitz::consts::*;
use brick_blitz::{GameEvent, GameState, Mode, advance_frame};

fn playing(mode: Mode, seed: u64) -> GameState {
    let mut state = GameState::new(seed).unwrap();
    state.start_game(mode);
    state
}

proptest! {
    /// Paddle bounces change direction, never speed
    #[test]
    fn paddle_bounce_preserves_speed(
        offset in -0.9f32..0.9,
        dx in -3.0f32..3.0,
        dy in 1.0f32..4.0,
    ) {
        let mut state = playing(Mode::Classic, 1);
        let center = state.paddle.x + state.paddle.width / 2.0;
        state.ball.pos = Vec2::new(center + offset * 45.0, state.paddle.y - 10.0);
        state.ball.vel = Vec2::new(dx, dy);
        let speed_before = state.ball.vel.length();

        advance_frame(&mut state);

        prop_assert!(state.drain_events().any(|e| e == GameEvent::PaddleHit));
        prop_assert!((state.ball.speed() - speed_before).abs() < 1e-3);
        prop_assert!(state.ball.vel.y < 0.0);
    }

    /// Trails never exceed capacity, whatever the inputs do
    #[test]
    fn trails_stay_bounded(
        seed in 0u64..1000,
        inputs in proptest::collection::vec((any::<bool>(), any::<bool>()), 1..200),
    ) {
        let mut state = playing(Mode::Survival, seed);
        for (left, right) in inputs {
            state.set_left_held(left);
            state.set_right_held(right);
            advance_frame(&mut state);
            prop_assert!(state.ball_trail.len() <= TRAIL_CAPACITY);
            prop_assert!(state.paddle_trail.len() <= TRAIL_CAPACITY);
        }
    }

    /// Resetting twice is the same as resetting once, wherever the round was
    #[test]
    fn reset_is_idempotent(seed in 0u64..1000, frames in 0usize..300) {
        let mut state = playing(Mode::Survival, seed);
        for _ in 0..frames {
            advance_frame(&mut state);
        }
        state.reset();
        let once = state.clone();
        state.reset();
        prop_assert_eq!(state, once);
    }

    /// A ball at exact wall contact reflects on the same frame
    #[test]
    fn wall_contact_reflects_immediately(approach in 0.0f32..5.0, y in 100.0f32..400.0) {
        let mut state = playing(Mode::Classic, 1);
        // Lands exactly at (or past) x = radius this frame
        state.ball.pos = Vec2::new(BALL_RADIUS + approach, y);
        state.ball.vel = Vec2::new(-approach.max(0.5), 0.0);
        advance_frame(&mut state);
        prop_assert!(state.ball.vel.x > 0.0);
    }
}
