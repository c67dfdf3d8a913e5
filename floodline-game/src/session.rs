//! Round/episode state machine driving the flood simulation.
//!
//! [`GameSession`] owns the canonical [`GameState`] and is its only
//! mutator. User actions and timer ticks enter through the same transition
//! methods, every committed change bumps the state version and lands in the
//! journal, and every precondition violation leaves the state untouched.

use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::LogSink;
use crate::assignment::{EpisodeLayout, assign_episode};
use crate::config::{GameConfig, GameParameters};
use crate::constants::{
    DEFAULT_SLIDER_VALUE, EPISODES_PER_GAME, FLOOD_LEVEL_MAX, FLOOD_LEVEL_MIN, ROUNDS_PER_EPISODE,
    TRAP_THRESHOLD,
};
use crate::flood::{generate_increase, propagate};
use crate::journal::{Journal, LogEntry, SettingsSnapshot};
use crate::rng::RandomSource;
use crate::scoring::score_decision;
use crate::state::{Decision, GameState, NodeId, RoundPhase};

/// Errors returned when a transition's preconditions are violated. The
/// state is left unchanged in every error case.
#[derive(Debug, Error, PartialEq)]
pub enum GameError {
    /// Action submitted in a state that does not accept it.
    #[error("{action} not valid: {detail}")]
    InvalidTransition {
        action: &'static str,
        detail: &'static str,
    },
    /// Prediction outside the accepted range.
    #[error("prediction {value} outside [0, 100]")]
    OutOfRangeInput { value: f64 },
}

/// How an expired countdown was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeoutKind {
    /// No prediction yet: the slider value was committed and passage allowed.
    AutoPredictionAndDecision,
    /// Prediction present, no decision: passage allowed.
    AutoDecision,
    /// Round fully resolved; reminder to advance, no state change.
    AdvanceReminder,
}

impl TimeoutKind {
    /// Message key for the participant-facing dialog.
    #[must_use]
    pub const fn message_key(self) -> &'static str {
        match self {
            Self::AutoPredictionAndDecision => "timeout.auto-prediction-and-decision",
            Self::AutoDecision => "timeout.auto-decision",
            Self::AdvanceReminder => "timeout.advance-reminder",
        }
    }
}

/// Resolution of one countdown expiry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeoutOutcome {
    pub kind: TimeoutKind,
    /// Prediction in effect after the resolution.
    pub prediction: f64,
    /// Decision in effect after the resolution.
    pub decision: Decision,
}

/// A running game for one participant.
pub struct GameSession {
    config: GameConfig,
    params: GameParameters,
    rng: RandomSource,
    state: GameState,
    journal: Journal,
    sink: Option<Box<dyn LogSink>>,
    slider_value: f64,
    timer_held: bool,
    timer_expired: bool,
    episode_scores: Vec<i64>,
}

impl fmt::Debug for GameSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameSession")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("slider_value", &self.slider_value)
            .field("timer_held", &self.timer_held)
            .field("timer_expired", &self.timer_expired)
            .field("journal_len", &self.journal.len())
            .finish_non_exhaustive()
    }
}

impl GameSession {
    /// Start a new game from a configuration.
    ///
    /// The countdown starts held; callers release it once the pre-game gate
    /// (consent, instructions, survey) has closed.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        let params = GameParameters::for_difficulty(config.difficulty);
        let mut rng = RandomSource::for_mode(config.mode, config.seed());
        let layout = assign_episode(config.difficulty, &params, &mut rng);
        let state = GameState::fresh(layout.elevations, &layout.failure_points, params.time_remaining);
        let mut session = Self {
            config,
            params,
            rng,
            state,
            journal: Journal::default(),
            sink: None,
            slider_value: DEFAULT_SLIDER_VALUE,
            timer_held: true,
            timer_expired: false,
            episode_scores: Vec::new(),
        };
        debug!(
            "session start: difficulty={} type={} mode={} seed={}",
            config.difficulty,
            config.game_type,
            config.mode,
            config.seed()
        );
        session.emit(true);
        session
    }

    /// Register the persistence hook invoked on every observable state
    /// change. Delivery is best-effort; the core neither retries nor
    /// inspects the collaborator's outcome.
    pub fn set_sink(&mut self, sink: Box<dyn LogSink>) {
        self.sink = Some(sink);
    }

    /// Read-only snapshot of the canonical state.
    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutable state access for tooling and tests. Production collaborators
    /// go through the transition methods.
    pub const fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub const fn params(&self) -> &GameParameters {
        &self.params
    }

    #[must_use]
    pub const fn journal(&self) -> &Journal {
        &self.journal
    }

    /// Final scores of completed episodes, oldest first.
    #[must_use]
    pub fn episode_scores(&self) -> &[i64] {
        &self.episode_scores
    }

    #[must_use]
    pub const fn slider_value(&self) -> f64 {
        self.slider_value
    }

    /// Track the uncommitted slider position; it auto-fills the prediction
    /// when the countdown expires before submission.
    pub fn set_slider(&mut self, value: f64) {
        self.slider_value = value.clamp(FLOOD_LEVEL_MIN, FLOOD_LEVEL_MAX);
    }

    /// Suspend the countdown while a pre-round gate (consent, survey) is
    /// open. Held ticks are dropped, not queued.
    pub fn hold_timer(&mut self) {
        self.timer_held = true;
    }

    /// Resume the countdown once the gate closes.
    pub fn release_timer(&mut self) {
        self.timer_held = false;
    }

    #[must_use]
    pub const fn timer_held(&self) -> bool {
        self.timer_held
    }

    /// Store the participant's water-level prediction and open the decision.
    ///
    /// # Errors
    ///
    /// `OutOfRangeInput` if the value leaves `[0, 100]`; `InvalidTransition`
    /// outside the predicting phase or after game over.
    pub fn submit_prediction(&mut self, value: f64) -> Result<&GameState, GameError> {
        self.ensure_live("submit_prediction")?;
        if self.state.phase != RoundPhase::Predicting {
            return Err(GameError::InvalidTransition {
                action: "submit_prediction",
                detail: "prediction already submitted",
            });
        }
        if !(FLOOD_LEVEL_MIN..=FLOOD_LEVEL_MAX).contains(&value) {
            return Err(GameError::OutOfRangeInput { value });
        }
        self.state.prediction = Some(value);
        self.state.phase = RoundPhase::Deciding;
        debug!(
            "e{} r{} prediction {value}",
            self.state.episode, self.state.round
        );
        self.emit(false);
        Ok(&self.state)
    }

    /// Score the participant's passage call against the actual track level.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` unless a prediction is in and the round is not
    /// yet resolved.
    pub fn submit_decision(&mut self, decision: Decision) -> Result<&GameState, GameError> {
        self.ensure_live("submit_decision")?;
        match self.state.phase {
            RoundPhase::Predicting => Err(GameError::InvalidTransition {
                action: "submit_decision",
                detail: "no prediction submitted yet",
            }),
            RoundPhase::Resolved => Err(GameError::InvalidTransition {
                action: "submit_decision",
                detail: "round already resolved",
            }),
            RoundPhase::Deciding => {
                self.resolve_decision(decision);
                Ok(&self.state)
            }
        }
    }

    /// Feed one 1 Hz countdown tick. Ticks are dropped while the timer is
    /// held, after expiry, and after game over, which makes late ticks
    /// harmless. Returns the timeout resolution when this tick expires the
    /// clock.
    pub fn tick_timer(&mut self) -> Option<TimeoutOutcome> {
        if self.timer_held || self.timer_expired || self.state.game_over {
            return None;
        }
        if self.state.time_remaining > 0 {
            self.state.time_remaining -= 1;
        }
        if self.state.time_remaining > 0 {
            return None;
        }
        self.timer_expired = true;
        self.resolve_timeout()
    }

    /// Commit the flood update and open the next round.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` unless the round is resolved, the train is free,
    /// and rounds remain in the episode.
    pub fn advance_round(&mut self) -> Result<&GameState, GameError> {
        self.ensure_live("advance_round")?;
        if self.state.phase != RoundPhase::Resolved {
            return Err(GameError::InvalidTransition {
                action: "advance_round",
                detail: "round not resolved yet",
            });
        }
        if self.state.train_trapped {
            return Err(GameError::InvalidTransition {
                action: "advance_round",
                detail: "train trapped; the episode is over",
            });
        }
        if self.state.round >= ROUNDS_PER_EPISODE {
            return Err(GameError::InvalidTransition {
                action: "advance_round",
                detail: "final round; the episode is over",
            });
        }
        self.update_flood_levels();
        self.state.round += 1;
        self.begin_round();
        debug!(
            "e{} advanced to round {} (track {:.1}%)",
            self.state.episode, self.state.round, self.state.track_node.flood_level
        );
        self.emit(false);
        Ok(&self.state)
    }

    /// Close the episode and open the next one with fresh terrain, or end
    /// the game after the final episode.
    ///
    /// Callers invoke this after the episode survey has been collected; the
    /// survey itself is an external collaborator.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` unless the round is resolved and the episode
    /// boundary (trapped train or final round) has been reached.
    pub fn advance_episode(&mut self) -> Result<&GameState, GameError> {
        self.ensure_live("advance_episode")?;
        if self.state.phase != RoundPhase::Resolved {
            return Err(GameError::InvalidTransition {
                action: "advance_episode",
                detail: "round still in progress",
            });
        }
        if !self.state.train_trapped && self.state.round < ROUNDS_PER_EPISODE {
            return Err(GameError::InvalidTransition {
                action: "advance_episode",
                detail: "episode boundary not reached",
            });
        }
        self.episode_scores.push(self.state.score);
        if self.state.episode >= EPISODES_PER_GAME {
            self.state.game_over = true;
            debug!("game over after episode {}", self.state.episode);
            self.emit(false);
            return Ok(&self.state);
        }
        self.state.episode += 1;
        self.state.round = 1;
        self.state.score = 0;
        let layout = assign_episode(self.config.difficulty, &self.params, &mut self.rng);
        self.apply_layout(&layout);
        self.begin_round();
        debug!("episode {} started", self.state.episode);
        self.emit(true);
        Ok(&self.state)
    }

    /// Reset to the initial state. Fixed mode re-seeds the random source
    /// from the original seed, so the replay matches the first run.
    pub fn restart(&mut self) -> &GameState {
        self.rng = RandomSource::for_mode(self.config.mode, self.config.seed());
        let layout = assign_episode(self.config.difficulty, &self.params, &mut self.rng);
        self.state = GameState::fresh(
            layout.elevations,
            &layout.failure_points,
            self.params.time_remaining,
        );
        self.episode_scores.clear();
        self.journal.clear();
        self.slider_value = DEFAULT_SLIDER_VALUE;
        self.timer_held = true;
        self.timer_expired = false;
        debug!("session restarted");
        self.emit(true);
        &self.state
    }

    fn ensure_live(&self, action: &'static str) -> Result<(), GameError> {
        if self.state.game_over {
            return Err(GameError::InvalidTransition {
                action,
                detail: "game is over; only restart is valid",
            });
        }
        Ok(())
    }

    fn resolve_decision(&mut self, decision: Decision) {
        let trapped =
            decision.allows() && self.state.track_node.flood_level > TRAP_THRESHOLD;
        let remaining = ROUNDS_PER_EPISODE - self.state.round;
        let delta = score_decision(self.config.game_type, decision, trapped, remaining);
        self.state.decision = Some(decision);
        self.state.train_trapped = trapped;
        self.state.score += delta;
        self.state.phase = RoundPhase::Resolved;
        debug!(
            "e{} r{} decision {decision}: trapped={trapped} delta={delta} score={}",
            self.state.episode, self.state.round, self.state.score
        );
        self.emit(false);
    }

    fn resolve_timeout(&mut self) -> Option<TimeoutOutcome> {
        match self.state.phase {
            RoundPhase::Predicting => {
                // Sub-case (a): commit the slider position, allow passage.
                let prediction = self.slider_value;
                self.state.prediction = Some(prediction);
                self.state.phase = RoundPhase::Deciding;
                self.resolve_decision(Decision::Allow);
                Some(TimeoutOutcome {
                    kind: TimeoutKind::AutoPredictionAndDecision,
                    prediction,
                    decision: Decision::Allow,
                })
            }
            RoundPhase::Deciding => {
                // Sub-case (b): prediction stands, allow passage.
                let prediction = self.state.prediction.unwrap_or(self.slider_value);
                self.resolve_decision(Decision::Allow);
                Some(TimeoutOutcome {
                    kind: TimeoutKind::AutoDecision,
                    prediction,
                    decision: Decision::Allow,
                })
            }
            RoundPhase::Resolved => {
                if self.state.train_trapped || self.state.round >= ROUNDS_PER_EPISODE {
                    // Episode boundary: the survey gate owns the screen.
                    return None;
                }
                // Sub-case (c): nothing to change, remind only.
                Some(TimeoutOutcome {
                    kind: TimeoutKind::AdvanceReminder,
                    prediction: self.state.prediction.unwrap_or(self.slider_value),
                    decision: self.state.decision.unwrap_or(Decision::Allow),
                })
            }
        }
    }

    /// One simulation step between rounds: autonomous growth at failure
    /// points, then sequential propagation. Stations feed the track first;
    /// the already-updated track level feeds back to both stations. The
    /// ordering is part of the game's contract, not an implementation
    /// accident.
    fn update_flood_levels(&mut self) {
        for id in NodeId::ALL {
            let node = self.state.node_mut(id);
            node.previous_flood_level = node.flood_level;
            node.increase_this_round = 0.0;
        }

        for id in NodeId::ALL {
            if self.state.node(id).is_failure_point {
                let increase = generate_increase(
                    &mut self.rng,
                    self.params.flood_log_normal_mu,
                    self.params.flood_log_normal_sigma,
                );
                let node = self.state.node_mut(id);
                node.flood_level = (node.flood_level + increase).min(FLOOD_LEVEL_MAX);
                node.increase_this_round = increase;
            }
        }

        self.propagate_between(NodeId::StationA, NodeId::TrackNode);
        self.propagate_between(NodeId::StationB, NodeId::TrackNode);
        self.propagate_between(NodeId::TrackNode, NodeId::StationA);
        self.propagate_between(NodeId::TrackNode, NodeId::StationB);

        self.state.clamp_levels();
    }

    fn propagate_between(&mut self, source: NodeId, target: NodeId) {
        let source_node = *self.state.node(source);
        let target_node = *self.state.node(target);
        let result = propagate(
            source_node.flood_level,
            target_node.flood_level,
            source_node.elevation,
            target_node.elevation,
            self.config.difficulty,
            &self.params,
        );
        let target_node = self.state.node_mut(target);
        target_node.flood_level = result.level;
        target_node.increase_this_round += result.increase;
    }

    fn begin_round(&mut self) {
        self.state.prediction = None;
        self.state.decision = None;
        self.state.phase = RoundPhase::Predicting;
        self.state.time_remaining = self.params.time_remaining;
        self.state.train_trapped = false;
        self.timer_expired = false;
        self.slider_value = DEFAULT_SLIDER_VALUE;
    }

    fn apply_layout(&mut self, layout: &EpisodeLayout) {
        for id in NodeId::ALL {
            let node = self.state.node_mut(id);
            *node = crate::state::Node::at_elevation(
                layout.elevations[id.index()],
                layout.is_failure_point(id),
            );
        }
    }

    fn settings_snapshot(&self) -> SettingsSnapshot {
        SettingsSnapshot {
            difficulty: self.config.difficulty,
            game_type: self.config.game_type,
            game_mode: self.config.mode,
            seed: self.config.seed(),
            parameters: self.params,
        }
    }

    /// Commit an observable state change: bump the version, journal the
    /// snapshot, and notify the persistence hook.
    fn emit(&mut self, with_settings: bool) {
        self.state.version += 1;
        let settings = with_settings.then(|| self.settings_snapshot());
        let entry = LogEntry::capture(&self.state, settings);
        if let Some(sink) = self.sink.as_mut() {
            sink.record(&entry);
        }
        self.journal.append(entry);
    }
}
