//! A* shortest-path search over a [`RoutingGraph`].
//!
//! The search answers point-to-point queries and reports, alongside the stop
//! path, which physical pathway produced each traversed edge so callers can
//! highlight them.
//!
//! "No route" and "unknown stop" are normal outcomes, not errors: a
//! restrictive profile disconnecting the graph is expected behaviour and
//! callers must branch on the result, not catch.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;
use tracing::trace;

use crate::domain::{PathwayId, StopId};

use super::graph::RoutingGraph;

/// One traversed edge of a found route.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteEdge {
    /// The pathway that produced this edge's cost, or `None` for the implicit
    /// boarding-area-to-platform edge.
    pub pathway: Option<PathwayId>,

    /// Cost of this edge in seconds, under the graph's profile.
    pub cost: f64,
}

/// A found route.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Total cost in seconds.
    pub total_cost: f64,

    /// Visited stops, start and goal included.
    pub stops: Vec<StopId>,

    /// Per-edge attribution; one entry per consecutive stop pair.
    pub edges: Vec<RouteEdge>,
}

/// Outcome of a route query.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteResult {
    /// A route exists.
    Found(Route),

    /// Both stops are known but no route connects them under the graph's
    /// profile. Expected under restrictive profiles.
    NoRoute,

    /// The id is not part of the current graph.
    UnknownStop(StopId),

    /// No graph exists because the stop set is empty.
    NoGraph,
}

impl RouteResult {
    /// Total cost of the found route, if any.
    pub fn distance(&self) -> Option<f64> {
        match self {
            RouteResult::Found(route) => Some(route.total_cost),
            _ => None,
        }
    }

    /// The stop path of the found route; empty for every other outcome.
    pub fn path(&self) -> &[StopId] {
        match self {
            RouteResult::Found(route) => &route.stops,
            _ => &[],
        }
    }

    /// Whether a route was found.
    pub fn is_found(&self) -> bool {
        matches!(self, RouteResult::Found(_))
    }
}

impl RoutingGraph {
    /// Find the cheapest route from `from` to `to` under this graph's
    /// profile.
    pub fn find_route(&self, from: StopId, to: StopId) -> RouteResult {
        let Some(start) = self.index_of(from) else {
            return RouteResult::UnknownStop(from);
        };
        let Some(goal) = self.index_of(to) else {
            return RouteResult::UnknownStop(to);
        };

        if start == goal {
            return RouteResult::Found(Route {
                total_cost: 0.0,
                stops: vec![from],
                edges: Vec::new(),
            });
        }

        let n = self.len();
        let mut dist = vec![f64::INFINITY; n];
        let mut prev: Vec<Option<usize>> = vec![None; n];
        let mut closed = vec![false; n];

        dist[start] = 0.0;

        let mut open: BinaryHeap<Reverse<(OrderedFloat<f64>, usize)>> = BinaryHeap::new();
        open.push(Reverse((OrderedFloat(self.heuristic[start][goal]), start)));

        while let Some(Reverse((_, node))) = open.pop() {
            if closed[node] {
                continue;
            }
            closed[node] = true;

            if node == goal {
                return RouteResult::Found(self.reconstruct(start, goal, &dist, &prev));
            }

            for next in 0..n {
                let Some(cost) = self.adjacency[node][next] else {
                    continue;
                };
                if closed[next] {
                    continue;
                }

                let tentative = dist[node] + cost;
                if tentative < dist[next] {
                    dist[next] = tentative;
                    prev[next] = Some(node);
                    let priority = tentative + self.heuristic[next][goal];
                    open.push(Reverse((OrderedFloat(priority), next)));
                }
            }
        }

        trace!(from = %from, to = %to, "no route");
        RouteResult::NoRoute
    }

    /// Walk predecessor links back from the goal and attribute each edge.
    fn reconstruct(&self, start: usize, goal: usize, dist: &[f64], prev: &[Option<usize>]) -> Route {
        let mut indices = vec![goal];
        let mut node = goal;
        while node != start {
            match prev[node] {
                Some(p) => node = p,
                // A popped goal always has a predecessor chain back to start.
                None => unreachable!("broken predecessor chain in reconstruction"),
            }
            indices.push(node);
        }
        indices.reverse();

        let edges = indices
            .windows(2)
            .map(|pair| {
                let (i, j) = (pair[0], pair[1]);
                match self.adjacency[i][j] {
                    Some(cost) => RouteEdge {
                        pathway: self.attribution[i][j],
                        cost,
                    },
                    // Every consecutive pair came off a relaxed edge.
                    None => unreachable!("reconstructed path crosses a missing edge"),
                }
            })
            .collect();

        let stops = indices
            .iter()
            .filter_map(|&i| self.stop_id(i))
            .collect();

        Route {
            total_cost: dist[goal],
            stops,
            edges,
        }
    }
}
