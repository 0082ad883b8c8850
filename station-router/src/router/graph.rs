//! Routing graph construction.
//!
//! Converts a closure-complete stop and pathway set into the matrices A*
//! searches over: adjacency (edge costs under one cost profile), heuristic
//! (straight-line time estimates), and pathway attribution (which pathway
//! produced each stored edge cost).
//!
//! A graph is a derived, disposable structure. It is valid for exactly one
//! (stop set, profile) pairing; any mutation of the stop set invalidates it.
//! Stop-id to matrix-index assignment is rebuilt on every construction, so
//! indices must never be cached across graphs.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::domain::{LocationType, Pathway, PathwayId, Stop, StopId};
use crate::geo::haversine_distance;

use super::cost::{MAX_TRAVERSAL_SPEED_M_S, Profile};

/// Cost floor for edges, in seconds. Keeps genuinely-adjacent stops (implicit
/// boarding-area edges, zero-length pathways) distinct from free teleports and
/// gives the parallel-edge resolution a stable minimum.
pub const MIN_EDGE: f64 = 0.01;

/// A weighted directed graph over one station's stops, built for one cost
/// profile.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingGraph {
    profile: Profile,

    /// Stop ids in matrix order (insertion order of the input list).
    pub(crate) ids: Vec<StopId>,

    /// Reverse map; strictly internal to this graph instance.
    pub(crate) index: HashMap<StopId, usize>,

    /// Edge costs in seconds; `None` means no edge.
    pub(crate) adjacency: Vec<Vec<Option<f64>>>,

    /// Admissible remaining-cost estimates: straight-line distance at the
    /// maximum traversal speed, or 0 where geometry is missing.
    pub(crate) heuristic: Vec<Vec<f64>>,

    /// Which pathway produced the currently-stored edge cost. `None` on an
    /// existing edge means the edge is implicit (boarding area to parent).
    pub(crate) attribution: Vec<Vec<Option<PathwayId>>>,
}

impl RoutingGraph {
    /// Build a graph over `stops` using `profile` to cost every pathway.
    ///
    /// Pathways with an endpoint missing from `stops` are skipped (dangling
    /// references are a tolerated data condition). Where several pathways
    /// connect the same ordered stop pair, the cheapest one under this profile
    /// wins the cell.
    pub fn build(stops: &[Stop], pathways: &[Pathway], profile: Profile) -> Self {
        let n = stops.len();

        let ids: Vec<StopId> = stops.iter().map(|s| s.id).collect();
        let index: HashMap<StopId, usize> =
            ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();

        // All-pairs straight-line distances. Pairs without geometry on both
        // sides get no distance; their heuristic stays 0, which is admissible.
        let mut distance: Vec<Vec<Option<f64>>> = vec![vec![None; n]; n];
        for i in 0..n {
            for j in (i + 1)..n {
                if let (Some(a), Some(b)) = (stops[i].coordinate, stops[j].coordinate) {
                    let d = haversine_distance(a, b);
                    distance[i][j] = Some(d);
                    distance[j][i] = Some(d);
                }
            }
        }

        let heuristic: Vec<Vec<f64>> = distance
            .iter()
            .map(|row| {
                row.iter()
                    .map(|d| d.map_or(0.0, |d| d / MAX_TRAVERSAL_SPEED_M_S))
                    .collect()
            })
            .collect();

        let mut graph = Self {
            profile,
            ids,
            index,
            adjacency: vec![vec![None; n]; n],
            heuristic,
            attribution: vec![vec![None; n]; n],
        };

        // Boarding areas are always reachable from their own platform, even
        // without an explicit pathway record. One-directional, minimal cost.
        for (i, stop) in stops.iter().enumerate() {
            if stop.location_type != LocationType::BoardingArea {
                continue;
            }
            let Some(parent) = stop.parent_station else {
                continue;
            };
            if let Some(&p) = graph.index.get(&parent) {
                graph.improve(i, p, MIN_EDGE, None);
            }
        }

        for pathway in pathways {
            graph.add_pathway(stops, &distance, pathway);
        }

        debug!(
            stops = n,
            pathways = pathways.len(),
            profile = %profile,
            "built routing graph"
        );

        graph
    }

    fn add_pathway(&mut self, stops: &[Stop], distance: &[Vec<Option<f64>>], pathway: &Pathway) {
        let (Some(&from), Some(&to)) = (
            self.index.get(&pathway.from_stop),
            self.index.get(&pathway.to_stop),
        ) else {
            warn!(
                pathway = %pathway.id,
                from = %pathway.from_stop,
                to = %pathway.to_stop,
                "skipping pathway with dangling endpoint"
            );
            return;
        };

        if from == to {
            warn!(pathway = %pathway.id, "skipping self-loop pathway");
            return;
        }

        // Prefer the surveyed length; fall back to straight-line distance. A
        // pathway with neither geometry nor a surveyed time is unusable.
        let effective = match pathway.length.or(distance[from][to]) {
            Some(d) => d.max(MIN_EDGE),
            None if pathway.traversal_time.is_some() => MIN_EDGE,
            None => {
                warn!(
                    pathway = %pathway.id,
                    stop = %stops[from].id,
                    "skipping pathway with no length and no endpoint geometry"
                );
                return;
            }
        };

        let Some(cost) = self.profile.cost(pathway, effective) else {
            return;
        };

        self.improve(from, to, cost, Some(pathway.id));
        if pathway.is_bidirectional {
            // Mirrored independently: a one-directional pathway must never
            // make the reverse direction look traversable.
            self.improve(to, from, cost, Some(pathway.id));
        }
    }

    /// Write `cost` into the cell only if it beats the current occupant.
    fn improve(&mut self, from: usize, to: usize, cost: f64, pathway: Option<PathwayId>) {
        match self.adjacency[from][to] {
            Some(existing) if existing <= cost => {}
            _ => {
                self.adjacency[from][to] = Some(cost);
                self.attribution[from][to] = pathway;
            }
        }
    }

    /// The profile this graph was built with.
    pub fn profile(&self) -> Profile {
        self.profile
    }

    /// Number of stops in the graph.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the graph has no stops.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Matrix index of a stop id within this graph instance.
    pub fn index_of(&self, id: StopId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Stop id at a matrix index.
    pub fn stop_id(&self, index: usize) -> Option<StopId> {
        self.ids.get(index).copied()
    }

    /// Edge cost between two stops, by id.
    pub fn edge(&self, from: StopId, to: StopId) -> Option<f64> {
        let from = self.index_of(from)?;
        let to = self.index_of(to)?;
        self.adjacency[from][to]
    }

    /// The pathway that produced the stored edge cost between two stops, by
    /// id. Returns `None` both when no edge exists and when the edge is an
    /// implicit boarding-area edge.
    pub fn edge_pathway(&self, from: StopId, to: StopId) -> Option<PathwayId> {
        let from = self.index_of(from)?;
        let to = self.index_of(to)?;
        self.attribution[from][to]
    }
}
