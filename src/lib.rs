//! Brick Blitz - a multi-mode brick-and-paddle arcade game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, mode rules)
//!
//! Rendering, audio, and input capture are external collaborators: they
//! read the `GameState` snapshot, drain the event queue, and feed the held
//! input flags before each frame.

pub mod sim;

pub use sim::{GameEvent, GameState, Mode, Screen, advance_frame};

/// Game configuration constants
pub mod consts {
    /// Logical ticks per second (one `advance_frame` per tick)
    pub const TICKS_PER_SECOND: u64 = 60;

    /// Canvas dimensions
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 100.0;
    pub const PADDLE_HEIGHT: f32 = 10.0;
    pub const PADDLE_SPEED: f32 = 7.0;
    /// Distance from canvas bottom to the paddle top
    pub const PADDLE_BOTTOM_OFFSET: f32 = 20.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 10.0;
    pub const BASE_BALL_SPEED: f32 = 2.0;
    /// Horizontal deflection added per unit of paddle-hit offset
    pub const SPIN_FACTOR: f32 = 2.0;

    /// Trail history length (ball and paddle)
    pub const TRAIL_CAPACITY: usize = 10;

    /// Ball velocity growth per speed level
    pub const SPEED_GROWTH_FACTOR: f32 = 1.2;
    /// "Speed up!" banner duration (1 second)
    pub const SPEED_BANNER_TICKS: u64 = TICKS_PER_SECOND;

    /// Brick grid geometry
    pub const BRICK_WIDTH: f32 = 60.0;
    pub const BRICK_HEIGHT: f32 = 20.0;
    pub const BRICK_PADDING: f32 = 10.0;
    pub const BRICK_MARGIN: f32 = 35.0;
    pub const BRICK_ROWS: usize = 5;
    /// Columns that fit between the side margins
    pub const BRICK_COLS: usize =
        ((CANVAS_WIDTH - 2.0 * BRICK_MARGIN) / (BRICK_WIDTH + BRICK_PADDING)) as usize;
    /// Vertical start of the challenge grid
    pub const BRICK_TOP: f32 = 60.0;

    /// Challenge mode
    pub const CHALLENGE_LEVELS: usize = 10;
    /// Bricks march down every 60 seconds of simulated time
    pub const CHALLENGE_ADVANCE_TICKS: u64 = 60 * TICKS_PER_SECOND;
    /// Lateral sway bound (pixels) and per-tick step
    pub const SWAY_LIMIT: f32 = 5.0;
    pub const SWAY_STEP: f32 = 0.25;

    /// Lives
    pub const SURVIVAL_LIVES: u8 = 3;
    pub const CHALLENGE_LIVES: u8 = 3;
    /// Survival spawns a brick every N paddle hits
    pub const SURVIVAL_SPAWN_HITS: u32 = 2;
    /// Power-up drop chance from a destroyed 3 HP brick in survival
    pub const SURVIVAL_DROP_CHANCE: f64 = 0.3;

    /// Power-ups
    pub const POWERUP_SIZE: f32 = 16.0;
    pub const POWERUP_MIN_FALL_SPEED: f32 = 1.5;
    pub const POWERUP_MAX_FALL_SPEED: f32 = 3.0;
    /// Timed power-up effects last 10 seconds
    pub const POWERUP_EFFECT_TICKS: u64 = 10 * TICKS_PER_SECOND;
    pub const PADDLE_EXTEND_FACTOR: f32 = 1.5;
    pub const PADDLE_SHRINK_FACTOR: f32 = 0.5;
    pub const BALL_SPEEDUP_FACTOR: f32 = 1.5;

    /// Outbound event queue bound (drained by the presentation layer)
    pub const MAX_PENDING_EVENTS: usize = 64;
}
