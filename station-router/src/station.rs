//! The station aggregate: the working set of stops, pathways, and levels for
//! one station, plus its lazily-built routing graph.
//!
//! Loading is a cooperative closure/cascade protocol. The station is created
//! from a single root stop record; every merged record carries references
//! (parent, children, pathway endpoints, level co-members) that may name stops
//! not yet loaded. [`Station::add_stops`] merges a fetched batch and returns
//! the ids still to fetch; the caller fetches those and calls again, until the
//! returned set is empty. The station never decides *when* to fetch, only
//! *what* is missing.

use std::collections::{BTreeSet, HashMap};

use tracing::{debug, warn};

use crate::domain::{DomainError, Level, LevelId, Pathway, PathwayId, Stop, StopId};
use crate::router::{Profile, RouteResult, RoutingGraph};

/// Aggregate root for one station's interior layout.
#[derive(Debug, Clone)]
pub struct Station {
    /// The station's own record. Held apart from the working set; its id is
    /// never reported as missing.
    root: Stop,

    /// Flat stop list in insertion order. Graph matrix indices follow this
    /// order, so it is append-or-replace-in-place, never reordered.
    stops: Vec<Stop>,

    /// Position of each stop in `stops`.
    by_id: HashMap<StopId, usize>,

    /// Deduplicated pathway list.
    pathways: Vec<Pathway>,

    /// Position of each pathway in `pathways`.
    pathway_pos: HashMap<PathwayId, usize>,

    /// Level grouping, re-derived after every merge.
    levels: Vec<Level>,

    /// Ids referenced by merged records but not yet loaded.
    missing: BTreeSet<StopId>,

    /// The built graph and the profile it was built for. Any mutation of the
    /// working set clears this.
    cached: Option<(Profile, RoutingGraph)>,
}

impl Station {
    /// Create a station from its root stop record.
    ///
    /// The root's own references (children, pathways, level co-members) seed
    /// the initial to-fetch set, available via [`Station::missing`].
    pub fn new(root: Stop) -> Self {
        let mut station = Self {
            root: root.clone(),
            stops: Vec::new(),
            by_id: HashMap::new(),
            pathways: Vec::new(),
            pathway_pos: HashMap::new(),
            levels: Vec::new(),
            missing: BTreeSet::new(),
            cached: None,
        };

        station.collect_references(&root);
        station.merge_pathways(&root);
        station.missing.remove(&root.id);

        station
    }

    /// Merge a batch of fetched stop records and return the ids still to
    /// fetch.
    ///
    /// The batch wins on id collision. The returned set is the full
    /// outstanding set, not just this batch's contribution: repeated calls
    /// converge to empty once the transitively-reachable component is loaded.
    /// Growth while deeper references are being discovered is normal; an id
    /// that was requested and is *still* missing after its batch arrives is
    /// not (see [`Station::ensure_progress`]).
    pub fn add_stops(&mut self, batch: Vec<Stop>) -> BTreeSet<StopId> {
        for mut stop in batch {
            self.missing.remove(&stop.id);

            if stop.id == self.root.id {
                self.collect_references(&stop);
                self.merge_pathways(&stop);
                self.root = stop;
                continue;
            }

            sanitize(&mut stop);
            self.collect_references(&stop);
            self.merge_pathways(&stop);

            match self.by_id.get(&stop.id) {
                Some(&pos) => self.stops[pos] = stop,
                None => {
                    self.by_id.insert(stop.id, self.stops.len());
                    self.stops.push(stop);
                }
            }
        }

        // References resolved by earlier stops in the same batch.
        let loaded_root = self.root.id;
        let by_id = &self.by_id;
        self.missing
            .retain(|id| !by_id.contains_key(id) && *id != loaded_root);

        self.rebuild_levels();
        self.cached = None;

        debug!(
            loaded = self.stops.len(),
            missing = self.missing.len(),
            "merged stop batch"
        );

        self.missing.clone()
    }

    /// Record every id `stop` references that is not yet loaded.
    fn collect_references(&mut self, stop: &Stop) {
        let mut reference = |id: StopId| {
            if id != stop.id && !self.by_id.contains_key(&id) {
                self.missing.insert(id);
            }
        };

        if let Some(parent) = stop.parent_station {
            reference(parent);
        }
        for &child in &stop.children {
            reference(child);
        }
        for pathway in stop.pathways() {
            reference(pathway.from_stop);
            reference(pathway.to_stop);
        }
        if let Some(level) = &stop.level {
            for &member in &level.stops {
                reference(member);
            }
        }
    }

    /// Merge the pathways embedded in a stop record, deduplicated by id. The
    /// newest record wins a collision, matching the batch-wins rule for stops.
    fn merge_pathways(&mut self, stop: &Stop) {
        for pathway in stop.pathways() {
            if pathway.from_stop == stop.id && pathway.to_stop == stop.id {
                warn!(pathway = %pathway.id, stop = %stop.id, "dropping self-loop pathway");
                continue;
            }
            match self.pathway_pos.get(&pathway.id) {
                Some(&pos) => self.pathways[pos] = pathway.clone(),
                None => {
                    self.pathway_pos.insert(pathway.id, self.pathways.len());
                    self.pathways.push(pathway.clone());
                }
            }
        }
    }

    /// Re-derive the level grouping from the working set. Existing levels are
    /// matched by id and keep their metadata; membership is rebuilt from
    /// scratch. Stops without an explicit level share a single synthetic
    /// "Unassigned" level, created at most once.
    fn rebuild_levels(&mut self) {
        for level in &mut self.levels {
            level.stops.clear();
        }

        for i in 0..self.stops.len() {
            let stop_id = self.stops[i].id;
            let level_id = match &self.stops[i].level {
                Some(level) => {
                    if !self.levels.iter().any(|l| l.id == level.id) {
                        let mut created = level.clone();
                        created.stops.clear();
                        self.levels.push(created);
                    }
                    level.id
                }
                None => {
                    if !self.levels.iter().any(|l| l.id == LevelId::UNASSIGNED) {
                        self.levels.push(Level::unassigned());
                    }
                    LevelId::UNASSIGNED
                }
            };

            if let Some(level) = self.levels.iter_mut().find(|l| l.id == level_id) {
                level.stops.push(stop_id);
            }
        }
    }

    /// Check that a completed fetch actually resolved what it was asked for.
    ///
    /// `previous` is the set a prior [`Station::add_stops`] returned and the
    /// caller fetched; `current` is the set returned after merging that
    /// fetch's records. Any overlap means the data source referenced ids it
    /// cannot resolve — cyclic or inconsistent upstream data. The load should
    /// be treated as failed, not retried.
    pub fn ensure_progress(
        previous: &BTreeSet<StopId>,
        current: &BTreeSet<StopId>,
    ) -> Result<(), DomainError> {
        let stalled = current.intersection(previous).count();
        if stalled > 0 {
            return Err(DomainError::StalledLoad { missing: stalled });
        }
        Ok(())
    }

    /// Route from `from` to `to` under `profile`, building (or reusing) the
    /// graph for that profile.
    pub fn route(&mut self, from: StopId, to: StopId, profile: Profile) -> RouteResult {
        if self.stops.is_empty() {
            return RouteResult::NoGraph;
        }
        self.graph(profile).find_route(from, to)
    }

    /// The routing graph for `profile`, rebuilt only when the working set or
    /// the profile changed since the last build.
    pub fn graph(&mut self, profile: Profile) -> &RoutingGraph {
        let fresh = matches!(&self.cached, Some((p, _)) if *p == profile);
        if !fresh {
            let graph = RoutingGraph::build(&self.stops, &self.pathways, profile);
            self.cached = Some((profile, graph));
        }
        // Populated on the line above when it was stale or absent.
        match &self.cached {
            Some((_, graph)) => graph,
            None => unreachable!("graph cache populated before read"),
        }
    }

    /// Add a pathway directly (used for synthesized street pathways).
    /// Replaces any pathway with the same id and invalidates the graph.
    pub fn add_pathway(&mut self, pathway: Pathway) {
        match self.pathway_pos.get(&pathway.id) {
            Some(&pos) => self.pathways[pos] = pathway,
            None => {
                self.pathway_pos.insert(pathway.id, self.pathways.len());
                self.pathways.push(pathway);
            }
        }
        self.cached = None;
    }

    /// The next unused synthetic (negative) pathway id.
    pub fn next_synthetic_pathway_id(&self) -> PathwayId {
        let lowest = self
            .pathways
            .iter()
            .map(|p| p.id.0)
            .filter(|id| *id < 0)
            .min();
        PathwayId(lowest.map_or(-1, |id| id - 1))
    }

    /// The station's root stop record.
    pub fn root(&self) -> &Stop {
        &self.root
    }

    /// The working stop set, in insertion order.
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// Look up a loaded stop by id.
    pub fn stop(&self, id: StopId) -> Option<&Stop> {
        self.by_id.get(&id).map(|&pos| &self.stops[pos])
    }

    /// The deduplicated pathway list.
    pub fn pathways(&self) -> &[Pathway] {
        &self.pathways
    }

    /// The derived level grouping.
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// Ids referenced but not yet loaded.
    pub fn missing(&self) -> &BTreeSet<StopId> {
        &self.missing
    }

    /// Whether every referenced stop has been loaded.
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    /// Number of loaded stops (the root not included).
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Whether no stops have been loaded yet.
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }
}

/// Drop references a stop makes to itself; entity-level self-loops are a data
/// defect, not a routable edge.
fn sanitize(stop: &mut Stop) {
    if stop.parent_station == Some(stop.id) {
        warn!(stop = %stop.id, "dropping self-referential parent");
        stop.parent_station = None;
    }
    let id = stop.id;
    stop.children.retain(|&child| child != id);
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::LocationType;
    use proptest::prelude::*;

    /// Build records for a connected component of `n` stops where stop `i`
    /// references stop `i + 1` via the kind of link selected for it.
    fn component(n: usize, links: &[u8]) -> Vec<Stop> {
        (2..=n as i64 + 1)
            .map(|id| {
                let mut stop = Stop::new(StopId(id), format!("stop {id}"), LocationType::Platform)
                    .with_coordinate(0.0001 * id as f64, 0.0);
                let next = StopId(id + 1);
                if id < n as i64 + 1 {
                    match links[(id - 2) as usize % links.len().max(1)] % 3 {
                        0 => stop.children.push(next),
                        1 => {
                            stop = stop.with_pathway_from(Pathway::new(
                                PathwayId(id),
                                crate::domain::PathwayMode::Walkway,
                                StopId(id),
                                next,
                                true,
                            ));
                        }
                        _ => {
                            let mut level = Level::new(LevelId(1), "L", 0.0);
                            level.stops = vec![next];
                            stop = stop.with_level(level);
                        }
                    }
                }
                stop
            })
            .collect()
    }

    proptest! {
        /// Feeding referenced records one at a time converges within the
        /// component size, and the final stop count equals the component.
        #[test]
        fn closure_converges(n in 1usize..20, links in proptest::collection::vec(0u8..3, 1..20)) {
            let records = component(n, &links);

            let mut root = Stop::new(StopId(1), "root", LocationType::Station);
            root.children = vec![StopId(2)];
            let mut station = Station::new(root);

            let mut to_fetch = station.missing().clone();
            let mut iterations = 0;

            while !to_fetch.is_empty() {
                iterations += 1;
                prop_assert!(iterations <= n + 1, "did not converge in component-size iterations");

                let batch: Vec<Stop> = records
                    .iter()
                    .filter(|s| to_fetch.contains(&s.id))
                    .cloned()
                    .collect();
                prop_assert!(!batch.is_empty(), "requested ids outside the component");

                let previous = to_fetch;
                to_fetch = station.add_stops(batch);
                prop_assert!(Station::ensure_progress(&previous, &to_fetch).is_ok());
            }

            prop_assert_eq!(station.len(), n);
            prop_assert!(station.is_complete());
        }
    }
}
