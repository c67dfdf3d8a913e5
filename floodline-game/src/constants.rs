//! Centralized tuning constants for the Floodline simulation.
//!
//! Study parameters live here rather than in external assets so that any
//! change to the game's behavior is a reviewed code change, and so the
//! difficulty tables in [`crate::config`] have a single base to derive
//! from.

// Flood propagation ---------------------------------------------------------
pub const PROPAGATION_THRESHOLD: f64 = 10.0;
pub const PROPAGATION_FLOOD_INCREASE: f64 = 100.0;
pub const ELEVATION_DIFFERENCE_FACTOR: f64 = 0.5;
pub const FLOOD_DIFFERENCE_FACTOR: f64 = 0.2;

/// Difficulty scaling applied to the elevation-difference factor: lower
/// difficulties dampen how much elevation shelters a target node.
pub(crate) const ELEVATION_SCALE_EASY: f64 = 0.4;
pub(crate) const ELEVATION_SCALE_MEDIUM: f64 = 0.9;
pub(crate) const ELEVATION_SCALE_HARD: f64 = 1.0;

/// Floor for the elevation factor so propagation never collapses to zero
/// or goes negative when the target sits far above the source.
pub(crate) const ELEVATION_FACTOR_FLOOR: f64 = 0.1;

// Autonomous growth ---------------------------------------------------------
pub const FLOOD_LOG_NORMAL_MU: f64 = 7.0;
pub const FLOOD_LOG_NORMAL_SIGMA: f64 = 1.0;

// Terrain -------------------------------------------------------------------
pub const MIN_ELEVATION: i32 = 0;
pub const MAX_ELEVATION: i32 = 10;

// Water levels --------------------------------------------------------------
pub const FLOOD_LEVEL_MIN: f64 = 0.0;
pub const FLOOD_LEVEL_MAX: f64 = 100.0;

/// Track-node level above which an admitted train is trapped.
pub const TRAP_THRESHOLD: f64 = 50.0;

// Session shape -------------------------------------------------------------
pub const ROUNDS_PER_EPISODE: u32 = 10;
pub const EPISODES_PER_GAME: u32 = 10;
pub const FAILURE_POINT_NUM: usize = 1;

/// Decision time budget per round, in seconds.
pub const TIME_REMAINING: u32 = 20;

/// Seed used when a Fixed-mode config carries none.
pub const DEFAULT_SEED: u64 = 12;

/// Resting position of the prediction slider at the start of each round.
pub const DEFAULT_SLIDER_VALUE: f64 = 25.0;

// Scoring -------------------------------------------------------------------
pub(crate) const PUNISHMENT_DENY_DELTA: i64 = -10;
pub(crate) const PUNISHMENT_TRAPPED_PER_ROUND: i64 = -50;
pub(crate) const REWARD_DENY_DELTA: i64 = 40;
pub(crate) const REWARD_PASS_DELTA: i64 = 50;
