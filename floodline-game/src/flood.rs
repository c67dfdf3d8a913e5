//! Flood growth and neighbor-to-neighbor propagation.

use crate::config::{Difficulty, GameParameters};
use crate::constants::{
    ELEVATION_FACTOR_FLOOR, ELEVATION_SCALE_EASY, ELEVATION_SCALE_HARD, ELEVATION_SCALE_MEDIUM,
    FLOOD_LEVEL_MAX, FLOOD_LEVEL_MIN,
};
use crate::rng::RandomSource;

/// Outcome of one directed propagation step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Propagation {
    /// Target level after the step, clamped into `[0, 100]`.
    pub level: f64,
    /// Increase applied to the target.
    pub increase: f64,
}

impl Propagation {
    const fn unchanged(target_level: f64) -> Self {
        Self {
            level: target_level,
            increase: 0.0,
        }
    }
}

const fn elevation_scale(difficulty: Difficulty) -> f64 {
    match difficulty {
        Difficulty::Easy => ELEVATION_SCALE_EASY,
        Difficulty::Medium => ELEVATION_SCALE_MEDIUM,
        Difficulty::Hard => ELEVATION_SCALE_HARD,
    }
}

/// Spread flood from a source node to a lower neighbor.
///
/// No-op unless the source has reached the propagation threshold and sits
/// above the target. The transferred amount follows the level difference,
/// dampened (or amplified, for a downhill target) by the elevation gap.
#[must_use]
pub fn propagate(
    source_level: f64,
    target_level: f64,
    source_elevation: i32,
    target_elevation: i32,
    difficulty: Difficulty,
    params: &GameParameters,
) -> Propagation {
    if source_level < params.propagation_threshold || source_level <= target_level {
        return Propagation::unchanged(target_level);
    }

    let flood_difference = source_level - target_level;
    let elevation_difference = f64::from(source_elevation - target_elevation);
    let scaled_factor = params.elevation_difference_factor * elevation_scale(difficulty);
    let elevation_factor = (1.0 + elevation_difference * scaled_factor).max(ELEVATION_FACTOR_FLOOR);

    let increase = (flood_difference * params.flood_difference_factor * elevation_factor)
        .ceil()
        .clamp(0.0, params.propagation_flood_increase);
    let level = (target_level + increase).clamp(FLOOD_LEVEL_MIN, FLOOD_LEVEL_MAX);

    Propagation { level, increase }
}

/// Autonomous per-round increase at a failure point.
///
/// Log-normal draw via a Box-Muller transform over two uniforms from the
/// shared source, rounded to one decimal. Intentionally unbounded: callers
/// clamp the resulting level into `[0, 100]`, not the draw itself.
pub fn generate_increase(rng: &mut RandomSource, mu: f64, sigma: f64) -> f64 {
    // ln(0) guard; the sources never return exactly 1.0.
    let u1 = rng.random().max(f64::MIN_POSITIVE);
    let u2 = rng.random();
    let z = (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos();
    let normal = mu.ln() + sigma * z;
    (normal.exp() * 10.0).round() / 10.0
}
