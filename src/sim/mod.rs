//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed logical ticks only (no wall-clock time)
//! - Seeded RNG only
//! - No rendering, audio, or platform dependencies

pub mod collision;
pub mod levels;
pub mod state;
pub mod tick;

pub use collision::{Rect, renormalize};
pub use levels::{ChallengeLevels, LevelTableError, generate_survival_brick};
pub use state::{
    Ball, BallState, Brick, BrickColor, GameEvent, GameState, Mode, ModeRules, Paddle, PowerUp,
    PowerUpKind, Screen, Trail,
};
pub use tick::advance_frame;
