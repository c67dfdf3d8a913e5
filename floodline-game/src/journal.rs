//! Append-only journal of observed state changes.
//!
//! Entries are export-facing snapshots consumed by persistence
//! collaborators; the simulation never reads them back.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{Difficulty, GameMode, GameParameters, GameType};
use crate::state::{Decision, GameState};

/// Settings block attached to session-start and episode-start entries so an
/// exported journal is self-describing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SettingsSnapshot {
    pub difficulty: Difficulty,
    pub game_type: GameType,
    pub game_mode: GameMode,
    pub seed: u64,
    pub parameters: GameParameters,
}

/// One observed state change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub round: u32,
    pub episode: u32,
    /// RFC 3339 UTC capture time. Timestamps never feed back into the
    /// simulation, so Fixed-mode replays stay byte-identical.
    pub timestamp: String,
    pub state: GameState,
    pub decision: Option<Decision>,
    pub prediction: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<SettingsSnapshot>,
}

impl LogEntry {
    pub(crate) fn capture(state: &GameState, settings: Option<SettingsSnapshot>) -> Self {
        Self {
            round: state.round,
            episode: state.episode,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            state: state.clone(),
            decision: state.decision,
            prediction: state.prediction,
            settings,
        }
    }
}

/// In-memory journal buffer, cleared on restart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Journal {
    entries: Vec<LogEntry>,
}

impl Journal {
    pub(crate) fn append(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pretty-printed JSON export of the full journal.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.entries)
    }
}
