//! Difficulty table, seed policy and loop speed settings.

use clap::ValueEnum;
use rand::Rng;
use serde::Serialize;

use crate::error::{MazeError, Result};

/// Seeds are drawn from and must stay below this bound.
pub const SEED_LIMIT: u32 = 1_000_000_000;

const DEFAULT_TICK_MS: u64 = 60;
const DEFAULT_RENDER_FPS: u64 = 60;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, ValueEnum)]
#[serde(into = "u8")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
    VeryHard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::VeryHard,
    ];

    pub fn grid_size(self) -> usize {
        match self {
            Difficulty::Easy => 10,
            Difficulty::Medium => 20,
            Difficulty::Hard => 30,
            Difficulty::VeryHard => 60,
        }
    }

    /// Integer code used in the settings file.
    pub fn code(self) -> u8 {
        match self {
            Difficulty::Easy => 0,
            Difficulty::Medium => 1,
            Difficulty::Hard => 2,
            Difficulty::VeryHard => 3,
        }
    }

    pub fn from_code(code: i64) -> Result<Self> {
        Difficulty::ALL
            .into_iter()
            .find(|d| i64::from(d.code()) == code)
            .ok_or_else(|| MazeError::InvalidConfiguration(format!("unknown difficulty {code}")))
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::VeryHard => "Very hard",
        }
    }
}

impl From<Difficulty> for u8 {
    fn from(difficulty: Difficulty) -> u8 {
        difficulty.code()
    }
}

/// Accepts a caller-supplied seed if it is below [`SEED_LIMIT`].
pub fn check_seed(seed: u32) -> Result<u32> {
    if seed >= SEED_LIMIT {
        return Err(MazeError::InvalidConfiguration(format!(
            "seed {seed} must be below {SEED_LIMIT}"
        )));
    }
    Ok(seed)
}

/// Reuses `seed` verbatim or draws a fresh one below [`SEED_LIMIT`].
pub fn resolve_seed(seed: Option<u32>, rng: &mut impl Rng) -> Result<u32> {
    match seed {
        Some(seed) => check_seed(seed),
        None => Ok(rng.gen_range(0..SEED_LIMIT)),
    }
}

/// Everything needed to build one maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameConfig {
    pub size: usize,
    pub seed: u32,
}

impl GameConfig {
    /// `size` overrides the difficulty table when given.
    pub fn new(
        difficulty: Difficulty,
        size: Option<usize>,
        seed: Option<u32>,
        rng: &mut impl Rng,
    ) -> Result<Self> {
        let size = size.unwrap_or_else(|| difficulty.grid_size());
        if size == 0 {
            return Err(MazeError::InvalidConfiguration(
                "maze size must be at least 1".to_string(),
            ));
        }
        let seed = resolve_seed(seed, rng)?;
        Ok(Self { size, seed })
    }
}

/// Tick length and redraw rate, from `MAZE_TICK_MS` and `MAZE_FPS`.
pub fn read_speed_settings() -> (u64, u64) {
    let tick_ms = std::env::var("MAZE_TICK_MS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_TICK_MS);
    let render_fps = std::env::var("MAZE_FPS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_RENDER_FPS);
    (tick_ms, render_fps)
}
