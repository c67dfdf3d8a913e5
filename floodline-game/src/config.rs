//! Game configuration and the difficulty-derived simulation parameters.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    DEFAULT_SEED, ELEVATION_DIFFERENCE_FACTOR, FAILURE_POINT_NUM, FLOOD_DIFFERENCE_FACTOR,
    FLOOD_LOG_NORMAL_MU, FLOOD_LOG_NORMAL_SIGMA, PROPAGATION_FLOOD_INCREASE,
    PROPAGATION_THRESHOLD, TIME_REMAINING,
};

/// Errors raised when configuration values fall outside the supported set.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unsupported difficulty {value:?} (expected Easy, Medium, or Hard)")]
    UnknownDifficulty { value: String },
    #[error("unsupported game type {value:?} (expected punishment or reward)")]
    UnknownGameType { value: String },
    #[error("unsupported game mode {value:?} (expected Fixed or Random)")]
    UnknownGameMode { value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(ConfigError::UnknownDifficulty {
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GameType {
    #[default]
    Punishment,
    Reward,
}

impl GameType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Punishment => "punishment",
            Self::Reward => "reward",
        }
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "punishment" => Ok(Self::Punishment),
            "reward" => Ok(Self::Reward),
            _ => Err(ConfigError::UnknownGameType {
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum GameMode {
    /// Seeded, reproducible run.
    Fixed,
    /// Non-reproducible run on platform entropy.
    #[default]
    Random,
}

impl GameMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fixed => "Fixed",
            Self::Random => "Random",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fixed" => Ok(Self::Fixed),
            "random" => Ok(Self::Random),
            _ => Err(ConfigError::UnknownGameMode {
                value: s.to_string(),
            }),
        }
    }
}

/// The six combinations a participant can be assigned to.
const GAME_COMBINATIONS: [(Difficulty, GameType); 6] = [
    (Difficulty::Easy, GameType::Punishment),
    (Difficulty::Easy, GameType::Reward),
    (Difficulty::Medium, GameType::Punishment),
    (Difficulty::Medium, GameType::Reward),
    (Difficulty::Hard, GameType::Punishment),
    (Difficulty::Hard, GameType::Reward),
];

/// Participant-facing run configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GameConfig {
    pub difficulty: Difficulty,
    pub game_type: GameType,
    pub mode: GameMode,
    /// Seed for Fixed-mode runs; falls back to [`DEFAULT_SEED`] when absent.
    pub seed: Option<u64>,
}

impl GameConfig {
    /// Seed in effect for this configuration.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed.unwrap_or(DEFAULT_SEED)
    }

    /// Assign a participant to one of the six difficulty/game-type
    /// combinations uniformly at random, with a fresh seed.
    #[must_use]
    pub fn assign_random() -> Self {
        let mut rng = rand::thread_rng();
        let (difficulty, game_type) = GAME_COMBINATIONS[rng.gen_range(0..GAME_COMBINATIONS.len())];
        Self {
            difficulty,
            game_type,
            mode: GameMode::Random,
            seed: Some(rng.gen_range(0..1_000_000)),
        }
    }
}

/// Simulation parameters in effect for an episode run. Derived from the
/// difficulty once at session start and immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameParameters {
    pub flood_log_normal_mu: f64,
    pub flood_log_normal_sigma: f64,
    pub propagation_threshold: f64,
    pub propagation_flood_increase: f64,
    pub elevation_difference_factor: f64,
    pub flood_difference_factor: f64,
    pub failure_point_num: usize,
    pub time_remaining: u32,
}

impl GameParameters {
    const fn base() -> Self {
        Self {
            flood_log_normal_mu: FLOOD_LOG_NORMAL_MU,
            flood_log_normal_sigma: FLOOD_LOG_NORMAL_SIGMA,
            propagation_threshold: PROPAGATION_THRESHOLD,
            propagation_flood_increase: PROPAGATION_FLOOD_INCREASE,
            elevation_difference_factor: ELEVATION_DIFFERENCE_FACTOR,
            flood_difference_factor: FLOOD_DIFFERENCE_FACTOR,
            failure_point_num: FAILURE_POINT_NUM,
            time_remaining: TIME_REMAINING,
        }
    }

    /// Parameters for a difficulty level. Harder settings grow faster, grow
    /// wilder, and propagate from lower source levels.
    #[must_use]
    pub const fn for_difficulty(difficulty: Difficulty) -> Self {
        let mut params = Self::base();
        match difficulty {
            Difficulty::Easy => {
                params.flood_log_normal_mu = 5.0;
                params.flood_log_normal_sigma = 0.6;
                params.propagation_threshold = 15.0;
            }
            Difficulty::Medium => {
                params.flood_log_normal_mu = 7.0;
                params.flood_log_normal_sigma = 1.1;
                params.propagation_threshold = 10.0;
            }
            Difficulty::Hard => {
                params.flood_log_normal_mu = 9.0;
                params.flood_log_normal_sigma = 1.6;
                params.propagation_threshold = 5.0;
            }
        }
        params
    }
}

impl Default for GameParameters {
    fn default() -> Self {
        Self::for_difficulty(Difficulty::default())
    }
}
