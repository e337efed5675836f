//! Game state and core simulation types
//!
//! The whole world lives in one explicitly owned [`GameState`]; there are no
//! hidden statics, so multiple instances (e.g. for tests) can coexist.

use std::collections::VecDeque;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::levels::{ChallengeLevels, LevelTableError};
use crate::consts::*;

/// Top-level UI phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    StartScreen,
    Playing,
    GameOver,
}

/// Gameplay ruleset selected at start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    Classic,
    Survival,
    Challenge,
}

/// Per-mode rule table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeRules {
    /// Score multiple that triggers a ball speed-up
    pub speed_threshold: u32,
    /// `None` means a bottom exit ends the run immediately
    pub starting_lives: Option<u8>,
    pub uses_bricks: bool,
}

impl Mode {
    pub fn rules(&self) -> ModeRules {
        match self {
            Mode::Classic => ModeRules {
                speed_threshold: 10,
                starting_lives: None,
                uses_bricks: false,
            },
            Mode::Survival => ModeRules {
                speed_threshold: 5,
                starting_lives: Some(SURVIVAL_LIVES),
                uses_bricks: true,
            },
            Mode::Challenge => ModeRules {
                speed_threshold: 5,
                starting_lives: Some(CHALLENGE_LIVES),
                uses_bricks: true,
            },
        }
    }
}

/// Discrete notifications for the presentation/audio collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    PaddleHit,
    WallBounce,
}

/// Ball state - pinned to the paddle (Challenge launch gate) or free-moving
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallState {
    Attached,
    Free,
}

/// The player's paddle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    pub x: f32,
    pub y: f32,
    /// Temporarily scaled by power-ups; reverts to `PADDLE_WIDTH`
    pub width: f32,
    pub height: f32,
    pub speed: f32,
}

impl Default for Paddle {
    fn default() -> Self {
        Self {
            x: (CANVAS_WIDTH - PADDLE_WIDTH) / 2.0,
            y: CANVAS_HEIGHT - PADDLE_BOTTOM_OFFSET,
            width: PADDLE_WIDTH,
            height: PADDLE_HEIGHT,
            speed: PADDLE_SPEED,
        }
    }
}

impl Paddle {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// The ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub radius: f32,
    pub vel: Vec2,
    pub state: BallState,
}

impl Default for Ball {
    fn default() -> Self {
        Self {
            pos: Vec2::new(CANVAS_WIDTH / 2.0, CANVAS_HEIGHT - 30.0),
            radius: BALL_RADIUS,
            vel: Vec2::ZERO,
            state: BallState::Free,
        }
    }
}

impl Ball {
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}

/// Brick color, derived from remaining hit points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrickColor {
    Grey,
    Gold,
    Red,
    Indigo,
}

/// A brick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Initial hit points (1-4); also the per-hit score value
    pub hit_points: u8,
    pub hp_remaining: u8,
    pub alive: bool,
    pub score_value: u32,
    /// Sway reference: the x this brick oscillates around (Challenge)
    pub initial_x: f32,
}

impl Brick {
    pub fn new(x: f32, y: f32, hit_points: u8) -> Self {
        Self {
            x,
            y,
            width: BRICK_WIDTH,
            height: BRICK_HEIGHT,
            hit_points,
            hp_remaining: hit_points,
            alive: true,
            score_value: hit_points as u32,
            initial_x: x,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn color(&self) -> BrickColor {
        match self.hp_remaining {
            0 | 1 => BrickColor::Grey,
            2 => BrickColor::Gold,
            3 => BrickColor::Red,
            _ => BrickColor::Indigo,
        }
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    PaddleExtend,
    PaddleShrink,
    ExtraLife,
    BallSpeedUp,
}

/// A falling power-up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    /// Top-left corner of the pickup square
    pub pos: Vec2,
    pub size: f32,
    pub fall_speed: f32,
}

impl PowerUp {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size, self.size)
    }
}

/// Bounded FIFO position history, used by the renderer for fade effects
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trail {
    points: VecDeque<Vec2>,
}

impl Trail {
    /// Record a position, evicting the oldest once capacity is reached
    pub fn push(&mut self, p: Vec2) {
        self.points.push_back(p);
        if self.points.len() > TRAIL_CAPACITY {
            self.points.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &Vec2> {
        self.points.iter()
    }
}

/// Actions that undo a timed effect at a known tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevertAction {
    ClearSpeedBanner,
    RestorePaddleWidth,
    UnscaleBallSpeed,
}

/// A scheduled reversion, evaluated once per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingRevert {
    pub at_tick: u64,
    pub action: RevertAction,
}

/// Complete world state (deterministic, snapshot-serializable)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    #[serde(skip)]
    pub rng: Pcg32,
    /// Logical tick counter, advanced only while playing and unpaused
    pub tick: u64,
    pub screen: Screen,
    pub mode: Mode,
    pub paused: bool,
    pub score: u32,
    pub lives: Option<u8>,
    /// Current challenge level (1-based; 0 outside Challenge)
    pub level: u32,
    /// How many speed thresholds have been crossed
    pub speed_level: u32,
    /// Transient "Speed up!" notification, self-clears after 1 second
    pub speed_banner: bool,
    pub left_held: bool,
    pub right_held: bool,
    pub launch_requested: bool,
    pub paddle: Paddle,
    pub ball: Ball,
    pub bricks: Vec<Brick>,
    pub powerups: Vec<PowerUp>,
    pub ball_trail: Trail,
    pub paddle_trail: Trail,
    /// Challenge sway, bounded to [-SWAY_LIMIT, SWAY_LIMIT]
    pub sway_offset: f32,
    pub sway_dir: f32,
    /// Tick at which challenge bricks next march down a row
    pub next_advance_tick: u64,
    /// Survival paddle-hit counter driving brick spawns
    pub paddle_hits: u32,
    #[serde(skip)]
    pub pending_reverts: Vec<PendingRevert>,
    #[serde(skip)]
    events: VecDeque<GameEvent>,
    #[serde(skip)]
    pub levels: ChallengeLevels,
}

impl GameState {
    /// Create a fresh state on the start screen.
    ///
    /// Precomputes the challenge level layouts; a malformed layout table is
    /// fatal here rather than mid-round.
    pub fn new(seed: u64) -> Result<Self, LevelTableError> {
        let mut rng = Pcg32::seed_from_u64(seed);
        let levels = ChallengeLevels::build(&mut rng)?;
        Ok(Self {
            seed,
            rng,
            tick: 0,
            screen: Screen::StartScreen,
            mode: Mode::Classic,
            paused: false,
            score: 0,
            lives: None,
            level: 0,
            speed_level: 0,
            speed_banner: false,
            left_held: false,
            right_held: false,
            launch_requested: false,
            paddle: Paddle::default(),
            ball: Ball::default(),
            bricks: Vec::new(),
            powerups: Vec::new(),
            ball_trail: Trail::default(),
            paddle_trail: Trail::default(),
            sway_offset: 0.0,
            sway_dir: 1.0,
            next_advance_tick: 0,
            paddle_hits: 0,
            pending_reverts: Vec::new(),
            events: VecDeque::new(),
            levels,
        })
    }

    // --- input setters (written by the input collaborator) ---

    pub fn set_left_held(&mut self, held: bool) {
        self.left_held = held;
    }

    pub fn set_right_held(&mut self, held: bool) {
        self.right_held = held;
    }

    /// Toggle pause; only meaningful while playing
    pub fn toggle_pause(&mut self) {
        if self.screen == Screen::Playing {
            self.paused = !self.paused;
        }
    }

    /// Request a ball launch (Challenge launch gate); consumed next frame
    pub fn request_launch(&mut self) {
        self.launch_requested = true;
    }

    // --- screen/mode state machine ---

    /// Start a round in the given mode.
    ///
    /// Ignored while a round is already active; valid from the start screen
    /// or the game-over screen.
    pub fn start_game(&mut self, mode: Mode) {
        if self.screen == Screen::Playing {
            log::warn!("start_game ignored while a round is active");
            return;
        }
        self.clear_round_state();
        self.mode = mode;
        self.lives = mode.rules().starting_lives;
        self.screen = Screen::Playing;
        if mode == Mode::Challenge {
            self.level = 1;
            self.load_challenge_level(1);
            self.next_advance_tick = self.tick + CHALLENGE_ADVANCE_TICKS;
        }
        self.respawn_ball();
        log::info!("starting {:?} round", mode);
    }

    /// Return to the start screen, zeroing all round-scoped state.
    ///
    /// Cancels every pending timed reversion and restores canonical
    /// baseline values, so a reset mid-effect can never revert a
    /// since-changed value. Idempotent.
    pub fn reset(&mut self) {
        self.clear_round_state();
        self.screen = Screen::StartScreen;
    }

    fn clear_round_state(&mut self) {
        self.paused = false;
        self.score = 0;
        self.lives = None;
        self.level = 0;
        self.speed_level = 0;
        self.speed_banner = false;
        self.left_held = false;
        self.right_held = false;
        self.launch_requested = false;
        self.paddle = Paddle::default();
        self.ball = Ball::default();
        self.bricks.clear();
        self.powerups.clear();
        self.ball_trail.clear();
        self.paddle_trail.clear();
        self.sway_offset = 0.0;
        self.sway_dir = 1.0;
        self.next_advance_tick = 0;
        self.paddle_hits = 0;
        self.pending_reverts.clear();
        self.events.clear();
    }

    // --- round helpers used by the tick ---

    /// Re-center the paddle and put the ball back above it.
    ///
    /// Challenge re-attaches the ball (the launch gate applies after every
    /// life loss and level change); other modes launch immediately at base
    /// speed, aimed upward.
    pub(crate) fn respawn_ball(&mut self) {
        self.paddle.x = (CANVAS_WIDTH - self.paddle.width) / 2.0;
        self.ball.radius = BALL_RADIUS;
        self.ball.pos = Vec2::new(CANVAS_WIDTH / 2.0, self.paddle.y - self.ball.radius);
        if self.mode == Mode::Challenge {
            self.ball.vel = Vec2::ZERO;
            self.ball.state = BallState::Attached;
        } else {
            self.ball.vel = Vec2::new(BASE_BALL_SPEED, -BASE_BALL_SPEED);
            self.ball.state = BallState::Free;
        }
    }

    /// Replace the brick field with the cached layout for `level` (1-based).
    /// Returns false past the end of the table.
    pub(crate) fn load_challenge_level(&mut self, level: u32) -> bool {
        let bricks = match self.levels.get(level) {
            Some(bricks) => bricks.to_vec(),
            None => return false,
        };
        self.bricks = bricks;
        true
    }

    /// Schedule a reversion `delay` ticks from now
    pub(crate) fn schedule_revert(&mut self, action: RevertAction, delay: u64) {
        self.pending_reverts.push(PendingRevert {
            at_tick: self.tick + delay,
            action,
        });
    }

    /// Queue an outbound notification, dropping the oldest when full
    pub(crate) fn push_event(&mut self, event: GameEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    /// Drain queued notifications; called once per frame by presentation
    pub fn drain_events(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.events.drain(..)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trail_fifo_bound() {
        let mut trail = Trail::default();
        for i in 0..25 {
            trail.push(Vec2::new(i as f32, 0.0));
            assert!(trail.len() <= TRAIL_CAPACITY);
        }
        assert_eq!(trail.len(), TRAIL_CAPACITY);
        // Oldest evicted first: front should be entry 15
        assert_eq!(trail.iter().next(), Some(&Vec2::new(15.0, 0.0)));
    }

    #[test]
    fn test_brick_color_from_remaining_hp() {
        let mut brick = Brick::new(0.0, 0.0, 4);
        assert_eq!(brick.color(), BrickColor::Indigo);
        brick.hp_remaining = 3;
        assert_eq!(brick.color(), BrickColor::Red);
        brick.hp_remaining = 2;
        assert_eq!(brick.color(), BrickColor::Gold);
        brick.hp_remaining = 1;
        assert_eq!(brick.color(), BrickColor::Grey);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut state = GameState::new(7).unwrap();
        state.start_game(Mode::Survival);
        for _ in 0..30 {
            super::super::tick::advance_frame(&mut state);
        }
        state.reset();
        let once = state.clone();
        state.reset();
        assert_eq!(state, once);
        assert_eq!(state.screen, Screen::StartScreen);
        assert_eq!(state.score, 0);
        assert!(state.bricks.is_empty());
        assert!(state.ball_trail.is_empty());
        assert!(state.pending_reverts.is_empty());
    }

    #[test]
    fn test_start_game_ignored_while_playing() {
        let mut state = GameState::new(7).unwrap();
        state.start_game(Mode::Classic);
        state.score = 3;
        state.start_game(Mode::Survival);
        assert_eq!(state.mode, Mode::Classic);
        assert_eq!(state.score, 3);
    }

    #[test]
    fn test_challenge_start_loads_level_one() {
        let mut state = GameState::new(7).unwrap();
        state.start_game(Mode::Challenge);
        assert_eq!(state.level, 1);
        assert!(!state.bricks.is_empty());
        assert!(state.bricks.iter().all(|b| b.alive));
        assert_eq!(state.ball.state, BallState::Attached);
        assert_eq!(state.lives, Some(CHALLENGE_LIVES));
    }

    #[test]
    fn test_event_queue_bounded() {
        let mut state = GameState::new(7).unwrap();
        for _ in 0..(MAX_PENDING_EVENTS + 10) {
            state.push_event(GameEvent::WallBounce);
        }
        assert_eq!(state.drain_events().count(), MAX_PENDING_EVENTS);
    }

    #[test]
    fn test_pause_only_while_playing() {
        let mut state = GameState::new(7).unwrap();
        state.toggle_pause();
        assert!(!state.paused);
        state.start_game(Mode::Classic);
        state.toggle_pause();
        assert!(state.paused);
    }
}
