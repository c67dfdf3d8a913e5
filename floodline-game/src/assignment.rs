//! Per-episode terrain assignment: elevations and failure points.
//!
//! Every episode draws fresh elevations for the three nodes and marks which
//! of them (if any) floods autonomously. Difficulty shapes both the
//! elevation spread and where the failure point is allowed to land: Easy
//! keeps terrain flat and the failure point anywhere, Hard uses the full
//! elevation range and pins it to the highest node, removing the "safe high
//! ground" heuristic.

use std::cmp::Reverse;

use crate::config::{Difficulty, GameParameters};
use crate::constants::{MAX_ELEVATION, MIN_ELEVATION};
use crate::rng::RandomSource;
use crate::state::NodeId;

/// Terrain drawn for one episode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeLayout {
    /// Elevations indexed by [`NodeId`] declaration order.
    pub elevations: [i32; 3],
    /// Nodes subject to autonomous growth this episode.
    pub failure_points: Vec<NodeId>,
}

impl EpisodeLayout {
    #[must_use]
    pub fn is_failure_point(&self, id: NodeId) -> bool {
        self.failure_points.contains(&id)
    }
}

/// Rank node ids by elevation, highest first. Equal elevations keep
/// declaration order (Station A, Track Node, Station B).
#[must_use]
pub fn rank_nodes_by_elevation(elevations: [i32; 3]) -> [NodeId; 3] {
    let mut ranked = NodeId::ALL;
    ranked.sort_by_key(|id| Reverse(elevations[id.index()]));
    ranked
}

fn elevation_band(difficulty: Difficulty) -> (i32, i32) {
    let scaled = |fraction: f64| (f64::from(MAX_ELEVATION) * fraction).round() as i32;
    match difficulty {
        Difficulty::Easy => (scaled(0.4), scaled(0.7)),
        Difficulty::Medium => (scaled(0.2), scaled(0.8)),
        Difficulty::Hard => (MIN_ELEVATION, MAX_ELEVATION),
    }
}

fn shuffle(nodes: &mut [NodeId; 3], rng: &mut RandomSource) {
    for i in (1..nodes.len()).rev() {
        let j = rng.random_int(0, i as i32) as usize;
        nodes.swap(i, j);
    }
}

/// Draw elevations and failure points for a fresh episode.
pub fn assign_episode(
    difficulty: Difficulty,
    params: &GameParameters,
    rng: &mut RandomSource,
) -> EpisodeLayout {
    let (lo, hi) = elevation_band(difficulty);
    let elevations = [
        rng.random_int(lo, hi),
        rng.random_int(lo, hi),
        rng.random_int(lo, hi),
    ];

    let count = params.failure_point_num.min(NodeId::ALL.len());
    let failure_points = if count == 0 {
        Vec::new()
    } else {
        match difficulty {
            Difficulty::Easy => {
                let mut candidates = NodeId::ALL;
                shuffle(&mut candidates, rng);
                candidates[..count].to_vec()
            }
            Difficulty::Medium => {
                // One of the top two by elevation; never the lowest node.
                let ranked = rank_nodes_by_elevation(elevations);
                let pick = rng.random_int(0, ranked.len() as i32 - 2) as usize;
                vec![ranked[pick]]
            }
            Difficulty::Hard => {
                let ranked = rank_nodes_by_elevation(elevations);
                vec![ranked[0]]
            }
        }
    };

    EpisodeLayout {
        elevations,
        failure_points,
    }
}
