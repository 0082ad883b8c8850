//! Street-pathway synthesis: best-effort connectivity repair.
//!
//! Some upstream stations carry platforms with no pathway data at all. Rather
//! than leaving them unroutable, this module connects each orphaned platform
//! to its nearest entrance with a synthesized bidirectional walkway. Synthetic
//! pathways carry negative ids and the `generated` flag so downstream layers
//! can tell them from surveyed data; real pathways are never touched.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::domain::{LocationType, Pathway, PathwayId, PathwayMode, Stop, StopId};
use crate::geo::haversine_distance;
use crate::router::MIN_EDGE;
use crate::station::Station;

/// How far from a platform to look for an entrance, in metres. Anything
/// farther is assumed to belong to a different complex.
pub const STREET_SEARCH_RADIUS_M: f64 = 500.0;

/// Connect every platform with no pathway references to its nearest entrance.
///
/// An entrance with exactly the platform's name is taken immediately as the
/// same physical place; otherwise the nearest entrance within
/// [`STREET_SEARCH_RADIUS_M`] wins. Returns the ids of the pathways created.
pub fn add_street_pathways(station: &mut Station) -> Vec<PathwayId> {
    let referenced: HashSet<StopId> = station
        .pathways()
        .iter()
        .flat_map(|p| [p.from_stop, p.to_stop])
        .collect();

    let orphans: Vec<Stop> = station
        .stops()
        .iter()
        .filter(|s| s.location_type == LocationType::Platform && !referenced.contains(&s.id))
        .cloned()
        .collect();

    let entrances: Vec<Stop> = station
        .stops()
        .iter()
        .filter(|s| s.location_type == LocationType::Entrance)
        .cloned()
        .collect();

    let mut created = Vec::new();

    for platform in &orphans {
        let Some((entrance, length)) = nearest_entrance(platform, &entrances) else {
            warn!(platform = %platform.id, "no entrance within reach of orphaned platform");
            continue;
        };

        let id = station.next_synthetic_pathway_id();
        let mut pathway = Pathway::new(
            id,
            PathwayMode::Walkway,
            platform.id,
            entrance,
            true,
        )
        .with_length(length);
        pathway.generated = true;

        debug!(
            platform = %platform.id,
            entrance = %entrance,
            pathway = %id,
            "synthesized street pathway"
        );

        station.add_pathway(pathway);
        created.push(id);
    }

    created
}

/// The entrance to pair an orphaned platform with, and the length to record
/// on the synthesized pathway.
fn nearest_entrance(platform: &Stop, entrances: &[Stop]) -> Option<(StopId, f64)> {
    let mut best: Option<(StopId, f64)> = None;

    for entrance in entrances {
        // An identical name is a strong signal of the same physical entrance;
        // take it even when geometry is missing or distant.
        if !platform.name.is_empty() && entrance.name == platform.name {
            let length = match (platform.coordinate, entrance.coordinate) {
                (Some(a), Some(b)) => haversine_distance(a, b).max(MIN_EDGE),
                _ => MIN_EDGE,
            };
            return Some((entrance.id, length));
        }

        let (Some(a), Some(b)) = (platform.coordinate, entrance.coordinate) else {
            continue;
        };
        let d = haversine_distance(a, b);
        if d > STREET_SEARCH_RADIUS_M {
            continue;
        }
        if best.is_none_or(|(_, best_d)| d < best_d) {
            best = Some((entrance.id, d.max(MIN_EDGE)));
        }
    }

    best
}
