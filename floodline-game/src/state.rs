//! Canonical game state owned by the round/episode state machine.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{FLOOD_LEVEL_MAX, FLOOD_LEVEL_MIN};

/// The three simulated nodes. Declaration order doubles as the tie-break
/// order for elevation ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeId {
    StationA,
    TrackNode,
    StationB,
}

impl NodeId {
    pub const ALL: [Self; 3] = [Self::StationA, Self::TrackNode, Self::StationB];

    /// Position in [`Self::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::StationA => 0,
            Self::TrackNode => 1,
            Self::StationB => 2,
        }
    }

    /// Participant-facing label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::StationA => "Station A",
            Self::TrackNode => "Track Node",
            Self::StationB => "Station B",
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One station or track node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Water level as a percentage, held in `[0, 100]`.
    pub flood_level: f64,
    /// Elevation in meters.
    pub elevation: i32,
    /// Whether this node grows autonomously each round.
    pub is_failure_point: bool,
    /// Committed level before the most recent advance.
    pub previous_flood_level: f64,
    /// Total increase applied during the most recent advance
    /// (autonomous growth plus received propagation).
    pub increase_this_round: f64,
}

impl Node {
    /// A dry node at the given elevation.
    #[must_use]
    pub const fn at_elevation(elevation: i32, is_failure_point: bool) -> Self {
        Self {
            flood_level: 0.0,
            elevation,
            is_failure_point,
            previous_flood_level: 0.0,
            increase_this_round: 0.0,
        }
    }

    /// Force the level back into `[0, 100]`.
    pub fn clamp_level(&mut self) {
        self.flood_level = self.flood_level.clamp(FLOOD_LEVEL_MIN, FLOOD_LEVEL_MAX);
    }
}

/// Where the current round stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RoundPhase {
    /// Waiting for the water-level prediction.
    #[default]
    Predicting,
    /// Prediction stored; waiting for the passage decision.
    Deciding,
    /// Decision scored; waiting for round or episode advance.
    Resolved,
}

impl RoundPhase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Predicting => "predicting",
            Self::Deciding => "deciding",
            Self::Resolved => "resolved",
        }
    }
}

impl fmt::Display for RoundPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The participant's passage call for a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::Deny => "deny",
        }
    }

    /// Whether the train was admitted onto the track.
    #[must_use]
    pub const fn allows(self) -> bool {
        matches!(self, Self::Allow)
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full simulation state. Owned by [`crate::session::GameSession`] and
/// mutated only through its transitions; collaborators read snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Bumped on every committed transition.
    pub version: u64,
    /// Round within the episode, `1..=10`.
    pub round: u32,
    /// Episode within the game, `1..=10`.
    pub episode: u32,
    /// Episode-scoped score; resets at episode boundaries.
    pub score: i64,
    pub phase: RoundPhase,
    pub prediction: Option<f64>,
    pub decision: Option<Decision>,
    /// Countdown seconds left in the current round.
    pub time_remaining: u32,
    pub train_trapped: bool,
    pub game_over: bool,
    pub station_a: Node,
    pub track_node: Node,
    pub station_b: Node,
}

impl GameState {
    /// Fresh round-1 state for a new game or episode.
    #[must_use]
    pub fn fresh(elevations: [i32; 3], failure_points: &[NodeId], time_remaining: u32) -> Self {
        let node = |id: NodeId| {
            Node::at_elevation(elevations[id.index()], failure_points.contains(&id))
        };
        Self {
            version: 0,
            round: 1,
            episode: 1,
            score: 0,
            phase: RoundPhase::Predicting,
            prediction: None,
            decision: None,
            time_remaining,
            train_trapped: false,
            game_over: false,
            station_a: node(NodeId::StationA),
            track_node: node(NodeId::TrackNode),
            station_b: node(NodeId::StationB),
        }
    }

    #[must_use]
    pub const fn node(&self, id: NodeId) -> &Node {
        match id {
            NodeId::StationA => &self.station_a,
            NodeId::TrackNode => &self.track_node,
            NodeId::StationB => &self.station_b,
        }
    }

    pub const fn node_mut(&mut self, id: NodeId) -> &mut Node {
        match id {
            NodeId::StationA => &mut self.station_a,
            NodeId::TrackNode => &mut self.track_node,
            NodeId::StationB => &mut self.station_b,
        }
    }

    /// Force every node level back into `[0, 100]`.
    pub fn clamp_levels(&mut self) {
        self.station_a.clamp_level();
        self.track_node.clamp_level();
        self.station_b.clamp_level();
    }

    /// Whether every node level sits inside `[0, 100]`.
    #[must_use]
    pub fn levels_in_bounds(&self) -> bool {
        NodeId::ALL.iter().all(|id| {
            let level = self.node(*id).flood_level;
            (FLOOD_LEVEL_MIN..=FLOOD_LEVEL_MAX).contains(&level)
        })
    }
}
