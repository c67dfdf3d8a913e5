//! Floodline Game Engine
//!
//! Platform-agnostic core logic for the Floodline flood-estimation research
//! game: a participant predicts the water level at a subway track node and
//! decides whether to admit a train, across repeated rounds and episodes.
//! This crate provides the flood simulation and the round/episode state
//! machine without UI, persistence, or platform-specific dependencies.

pub mod assignment;
pub mod config;
pub mod constants;
pub mod flood;
pub mod journal;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod state;

// Re-export commonly used types
pub use assignment::{EpisodeLayout, assign_episode, rank_nodes_by_elevation};
pub use config::{ConfigError, Difficulty, GameConfig, GameMode, GameParameters, GameType};
pub use flood::{Propagation, generate_increase, propagate};
pub use journal::{Journal, LogEntry, SettingsSnapshot};
pub use rng::{RandomSource, SeededRandom};
pub use scoring::score_decision;
pub use session::{GameError, GameSession, TimeoutKind, TimeoutOutcome};
pub use state::{Decision, GameState, Node, NodeId, RoundPhase};

/// Hook invoked on every observable state change.
///
/// Platform-specific persistence collaborators implement this to stream
/// journal entries to durable storage. Delivery is best-effort: the core
/// neither retries nor inspects the collaborator's outcome, and a slow or
/// failing sink must not block the simulation.
pub trait LogSink {
    fn record(&mut self, entry: &LogEntry);
}

/// Sink that drops every entry; useful for tools that only want the final
/// state.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl LogSink for NullSink {
    fn record(&mut self, _entry: &LogEntry) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_sink_accepts_entries() {
        let config = GameConfig {
            mode: GameMode::Fixed,
            seed: Some(7),
            ..GameConfig::default()
        };
        let mut session = GameSession::new(config);
        session.set_sink(Box::new(NullSink));
        session.release_timer();
        session.submit_prediction(25.0).unwrap();
        assert_eq!(session.state().phase, RoundPhase::Deciding);
    }
}
