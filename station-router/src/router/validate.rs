//! Batch connectivity validation.
//!
//! Answers "can this source reach every one of these targets" and sorts the
//! answers worst-first, so a caller surfacing problems sees unreachable
//! targets before merely-distant ones.

use std::cmp::Ordering;

use crate::domain::StopId;

use super::astar::RouteResult;
use super::graph::RoutingGraph;

/// Result of checking one target.
#[derive(Debug, Clone, PartialEq)]
pub struct PathCheck {
    /// The target stop that was checked.
    pub target: StopId,

    /// Whether the source reaches it.
    pub outcome: PathOutcome,
}

/// Outcome of a single reachability check.
#[derive(Debug, Clone, PartialEq)]
pub enum PathOutcome {
    /// Reachable, with the route cost in seconds.
    Reached { distance: f64 },

    /// Known stop, but no route under the graph's profile.
    Unreachable,

    /// The target id is not in the graph at all.
    UnknownStop,
}

impl PathCheck {
    /// Sort key: problems first, then farthest-first.
    fn badness(&self) -> (u8, f64) {
        match self.outcome {
            PathOutcome::UnknownStop => (2, 0.0),
            PathOutcome::Unreachable => (1, 0.0),
            PathOutcome::Reached { distance } => (0, distance),
        }
    }
}

/// Run one route query per target and sort the results worst-first:
/// unknown stops, then unreachable stops, then reached stops by distance
/// descending.
pub fn validate_paths_to_stops(
    graph: &RoutingGraph,
    source: StopId,
    targets: &[StopId],
) -> Vec<PathCheck> {
    let mut checks: Vec<PathCheck> = targets
        .iter()
        .map(|&target| {
            let outcome = match graph.find_route(source, target) {
                RouteResult::Found(route) => PathOutcome::Reached {
                    distance: route.total_cost,
                },
                RouteResult::NoRoute => PathOutcome::Unreachable,
                RouteResult::UnknownStop(_) | RouteResult::NoGraph => PathOutcome::UnknownStop,
            };
            PathCheck { target, outcome }
        })
        .collect();

    checks.sort_by(|a, b| {
        let (rank_a, dist_a) = a.badness();
        let (rank_b, dist_b) = b.badness();
        rank_b
            .cmp(&rank_a)
            .then_with(|| dist_b.partial_cmp(&dist_a).unwrap_or(Ordering::Equal))
    });

    checks
}
