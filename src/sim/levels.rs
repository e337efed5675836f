//! Brick generation: survival spawns and the precomputed challenge layouts
//!
//! Layout shapes and hit-point distributions are plain data tables, kept
//! apart from the simulation logic. The tables are validated when the
//! layouts are built, so a malformed table fails at startup, never
//! mid-round.

use std::fmt;

use rand::Rng;
use rand_pcg::Pcg32;

use super::state::Brick;
use crate::consts::*;

/// Fatal table validation failure, surfaced by [`ChallengeLevels::build`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelTableError {
    /// A hit-point weight row does not sum to 100
    WeightSum { level: usize, sum: u32 },
    /// A layout has no bricks at all (the level would clear instantly)
    EmptyLayout { level: usize },
}

impl fmt::Display for LevelTableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelTableError::WeightSum { level, sum } => write!(
                f,
                "level {level} hit-point weights sum to {sum}, expected 100"
            ),
            LevelTableError::EmptyLayout { level } => {
                write!(f, "level {level} layout contains no bricks")
            }
        }
    }
}

impl std::error::Error for LevelTableError {}

/// One brick with hit points drawn from the survival distribution
/// (45% 1 HP, 35% 2 HP, 20% 3 HP), placed uniformly in the spawn region:
/// the central 60% of the width, the upper 40% of the height.
///
/// The caller is responsible for the overlap check against existing bricks.
pub fn generate_survival_brick(rng: &mut Pcg32) -> Brick {
    let x = rng.random_range(CANVAS_WIDTH * 0.2..=CANVAS_WIDTH * 0.8 - BRICK_WIDTH);
    let y = rng.random_range(0.0..=CANVAS_HEIGHT * 0.4 - BRICK_HEIGHT);
    Brick::new(x, y, survival_hit_points(rng))
}

/// Draw hit points from the fixed survival distribution
pub fn survival_hit_points(rng: &mut Pcg32) -> u8 {
    match rng.random_range(0..100u32) {
        0..=44 => 1,
        45..=79 => 2,
        _ => 3,
    }
}

/// Per-level layout shapes: 1 = brick, 0 = gap, 5 rows x BRICK_COLS columns
const LEVEL_LAYOUTS: [[[u8; BRICK_COLS]; BRICK_ROWS]; CHALLENGE_LEVELS] = [
    // 1: two solid rows
    [
        [1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
        [1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
        [0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    ],
    // 2: checkerboard
    [
        [1, 0, 1, 0, 1, 0, 1, 0, 1, 0],
        [0, 1, 0, 1, 0, 1, 0, 1, 0, 1],
        [1, 0, 1, 0, 1, 0, 1, 0, 1, 0],
        [0, 1, 0, 1, 0, 1, 0, 1, 0, 1],
        [0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    ],
    // 3: pyramid
    [
        [0, 0, 0, 0, 1, 1, 0, 0, 0, 0],
        [0, 0, 0, 1, 1, 1, 1, 0, 0, 0],
        [0, 0, 1, 1, 1, 1, 1, 1, 0, 0],
        [0, 1, 1, 1, 1, 1, 1, 1, 1, 0],
        [1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    ],
    // 4: side columns
    [
        [1, 1, 0, 0, 0, 0, 0, 0, 1, 1],
        [1, 1, 0, 0, 1, 1, 0, 0, 1, 1],
        [1, 1, 0, 0, 1, 1, 0, 0, 1, 1],
        [1, 1, 0, 0, 1, 1, 0, 0, 1, 1],
        [1, 1, 0, 0, 0, 0, 0, 0, 1, 1],
    ],
    // 5: diamond
    [
        [0, 0, 0, 0, 1, 1, 0, 0, 0, 0],
        [0, 0, 1, 1, 1, 1, 1, 1, 0, 0],
        [1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
        [0, 0, 1, 1, 1, 1, 1, 1, 0, 0],
        [0, 0, 0, 0, 1, 1, 0, 0, 0, 0],
    ],
    // 6: alternating full rows
    [
        [1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
        [0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
        [1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
        [0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
        [1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    ],
    // 7: funnel
    [
        [1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
        [0, 1, 1, 1, 1, 1, 1, 1, 1, 0],
        [0, 0, 1, 1, 1, 1, 1, 1, 0, 0],
        [0, 0, 0, 1, 1, 1, 1, 0, 0, 0],
        [0, 0, 0, 0, 1, 1, 0, 0, 0, 0],
    ],
    // 8: frame
    [
        [1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
        [1, 0, 0, 0, 0, 0, 0, 0, 0, 1],
        [1, 0, 0, 1, 1, 1, 1, 0, 0, 1],
        [1, 0, 0, 0, 0, 0, 0, 0, 0, 1],
        [1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    ],
    // 9: zigzag
    [
        [1, 1, 1, 0, 0, 0, 0, 1, 1, 1],
        [0, 1, 1, 1, 0, 0, 1, 1, 1, 0],
        [0, 0, 1, 1, 1, 1, 1, 1, 0, 0],
        [0, 1, 1, 1, 0, 0, 1, 1, 1, 0],
        [1, 1, 1, 0, 0, 0, 0, 1, 1, 1],
    ],
    // 10: full wall
    [
        [1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
        [1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
        [1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
        [1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
        [1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    ],
];

/// Per-level hit-point weights (percent for 1/2/3/4 HP; each row sums to
/// 100). Level 10 forces every brick to 4 HP.
const LEVEL_HP_WEIGHTS: [[u32; 4]; CHALLENGE_LEVELS] = [
    [70, 30, 0, 0],
    [60, 30, 10, 0],
    [50, 35, 15, 0],
    [40, 35, 20, 5],
    [35, 35, 20, 10],
    [30, 30, 25, 15],
    [25, 30, 25, 20],
    [20, 25, 30, 25],
    [10, 25, 30, 35],
    [0, 0, 0, 100],
];

fn roll_hit_points(weights: &[u32; 4], rng: &mut Pcg32) -> u8 {
    let roll = rng.random_range(0..100u32);
    let mut acc = 0;
    for (i, &weight) in weights.iter().enumerate() {
        acc += weight;
        if roll < acc {
            return i as u8 + 1;
        }
    }
    4
}

pub(crate) fn validate_hp_weights(rows: &[[u32; 4]]) -> Result<(), LevelTableError> {
    for (i, row) in rows.iter().enumerate() {
        let sum: u32 = row.iter().sum();
        if sum != 100 {
            return Err(LevelTableError::WeightSum { level: i + 1, sum });
        }
    }
    Ok(())
}

/// The ten challenge layouts, built once at startup and cloned into the
/// round whenever a level (re)starts
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChallengeLevels {
    layouts: Vec<Vec<Brick>>,
}

impl ChallengeLevels {
    /// Materialize every level from the layout and weight tables.
    ///
    /// Brick shapes are deterministic; hit points are rolled from the
    /// per-level distribution with the run RNG, so they vary per seed.
    pub fn build(rng: &mut Pcg32) -> Result<Self, LevelTableError> {
        validate_hp_weights(&LEVEL_HP_WEIGHTS)?;

        let mut layouts = Vec::with_capacity(CHALLENGE_LEVELS);
        for (idx, layout) in LEVEL_LAYOUTS.iter().enumerate() {
            let weights = &LEVEL_HP_WEIGHTS[idx];
            let mut bricks = Vec::new();
            for (row, cols) in layout.iter().enumerate() {
                for (col, &cell) in cols.iter().enumerate() {
                    if cell == 0 {
                        continue;
                    }
                    let x = BRICK_MARGIN + col as f32 * (BRICK_WIDTH + BRICK_PADDING);
                    let y = BRICK_TOP + row as f32 * (BRICK_HEIGHT + BRICK_PADDING);
                    bricks.push(Brick::new(x, y, roll_hit_points(weights, rng)));
                }
            }
            if bricks.is_empty() {
                return Err(LevelTableError::EmptyLayout { level: idx + 1 });
            }
            log::debug!("level {} built with {} bricks", idx + 1, bricks.len());
            layouts.push(bricks);
        }
        Ok(Self { layouts })
    }

    /// Layout for a 1-based level number; `None` past the end of the run
    pub fn get(&self, level: u32) -> Option<&[Brick]> {
        if level == 0 {
            return None;
        }
        self.layouts.get(level as usize - 1).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }
}
