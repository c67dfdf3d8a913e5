//! Built-in play strategies for automated runs.

use clap::ValueEnum;
use serde::Serialize;

use floodline_game::{Decision, GameState};

/// Scripted strategies for headless play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum, Serialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyKind {
    /// Predict the current track level; allow while the prediction stays
    /// under the trap threshold.
    #[default]
    Threshold,
    /// Deny unless the track is nearly dry.
    Cautious,
    /// Always allow; maximizes traps.
    Bold,
    /// Like `Threshold`, but lets every third round time out to exercise
    /// the auto-resolution paths.
    TimeoutProne,
}

impl PolicyKind {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Threshold => "Threshold",
            Self::Cautious => "Cautious",
            Self::Bold => "Bold",
            Self::TimeoutProne => "Timeout-prone",
        }
    }

    /// Water-level prediction for the current round.
    #[must_use]
    pub fn predict(self, state: &GameState) -> f64 {
        // All strategies anchor on the last committed track level plus its
        // most recent momentum.
        let track = &state.track_node;
        (track.flood_level + track.increase_this_round / 2.0).clamp(0.0, 100.0)
    }

    /// Passage call given the prediction just submitted.
    #[must_use]
    pub fn decide(self, prediction: f64) -> Decision {
        let cutoff = match self {
            Self::Threshold | Self::TimeoutProne => 45.0,
            Self::Cautious => 10.0,
            Self::Bold => return Decision::Allow,
        };
        if prediction <= cutoff {
            Decision::Allow
        } else {
            Decision::Deny
        }
    }

    /// Whether this strategy abandons the given round to the countdown.
    #[must_use]
    pub fn times_out(self, round: u32) -> bool {
        matches!(self, Self::TimeoutProne) && round % 3 == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bold_always_allows() {
        assert_eq!(PolicyKind::Bold.decide(99.0), Decision::Allow);
        assert_eq!(PolicyKind::Bold.decide(0.0), Decision::Allow);
    }

    #[test]
    fn cautious_denies_wet_track() {
        assert_eq!(PolicyKind::Cautious.decide(11.0), Decision::Deny);
        assert_eq!(PolicyKind::Cautious.decide(5.0), Decision::Allow);
    }

    #[test]
    fn only_timeout_prone_times_out() {
        assert!(PolicyKind::TimeoutProne.times_out(3));
        assert!(!PolicyKind::TimeoutProne.times_out(4));
        assert!(!PolicyKind::Threshold.times_out(3));
    }
}
