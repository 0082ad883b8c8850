//! Routing over a station's interior.
//!
//! Three pieces, in pipeline order: cost profiles map each pathway to a
//! traversal cost (or mark it impassable), the graph builder turns a
//! closure-complete stop set into adjacency/heuristic matrices under one
//! profile, and A* answers point-to-point queries against those matrices.

mod astar;
mod cost;
mod graph;
mod validate;

pub use astar::{Route, RouteEdge, RouteResult};
pub use cost::{
    MAX_TRAVERSAL_SPEED_M_S, Profile, WALK_SPEED_M_S, WHEELCHAIR_SPEED_M_S,
};
pub use graph::{MIN_EDGE, RoutingGraph};
pub use validate::{PathCheck, PathOutcome, validate_paths_to_stops};

#[cfg(test)]
mod pipeline_tests {
    //! End-to-end exercises of the whole pipeline: closure load, graph
    //! build, accessibility validation, street-pathway repair, routing.

    use super::*;
    use crate::domain::{Level, LevelId, LocationType, Pathway, PathwayId, PathwayMode, Stop, StopId};
    use crate::station::Station;
    use crate::synthesis::add_street_pathways;

    /// A two-level station: two platforms below a concourse, stairs and an
    /// elevator up to it, a fare gate to the entrance, and one orphaned
    /// platform with no pathway data at all.
    fn load_station() -> Station {
        let mut root = Stop::new(StopId(1), "Central", LocationType::Station);
        root.children = vec![StopId(2), StopId(3), StopId(4), StopId(5), StopId(6)];
        let mut station = Station::new(root);

        let lower = Level::new(LevelId(10), "Platform level", -1.0);
        let upper = Level::new(LevelId(11), "Concourse", 0.0);

        let stairs_up = Pathway::new(
            PathwayId(100),
            PathwayMode::Stairs,
            StopId(2),
            StopId(4),
            true,
        );
        let elevator_up = Pathway::new(
            PathwayId(101),
            PathwayMode::Elevator,
            StopId(3),
            StopId(4),
            true,
        );
        let gate = Pathway::new(
            PathwayId(102),
            PathwayMode::FareGate,
            StopId(4),
            StopId(5),
            true,
        );
        let between_platforms = Pathway::new(
            PathwayId(103),
            PathwayMode::Walkway,
            StopId(2),
            StopId(3),
            true,
        );

        let to_fetch = station.add_stops(vec![
            Stop::new(StopId(2), "Platform 1", LocationType::Platform)
                .with_coordinate(-122.0, 37.0)
                .with_parent(StopId(1))
                .with_level(lower.clone())
                .with_pathway_from(stairs_up)
                .with_pathway_from(between_platforms),
            Stop::new(StopId(3), "Platform 2", LocationType::Platform)
                .with_coordinate(-122.0001, 37.0)
                .with_parent(StopId(1))
                .with_level(lower)
                .with_pathway_from(elevator_up),
            Stop::new(StopId(4), "Concourse", LocationType::GenericNode)
                .with_coordinate(-122.00005, 37.0001)
                .with_parent(StopId(1))
                .with_level(upper.clone())
                .with_pathway_from(gate),
            Stop::new(StopId(5), "Main entrance", LocationType::Entrance)
                .with_coordinate(-122.0001, 37.0002)
                .with_parent(StopId(1))
                .with_level(upper),
            Stop::new(StopId(6), "Platform 3", LocationType::Platform)
                .with_coordinate(-122.0003, 37.0001)
                .with_parent(StopId(1)),
        ]);

        assert!(to_fetch.is_empty(), "fixture should load in one batch");
        station
    }

    #[test]
    fn default_profile_routes_platform_to_entrance() {
        let mut station = load_station();
        let result = station.route(StopId(2), StopId(5), Profile::Default);

        assert!(result.is_found());
        assert_eq!(result.path(), &[StopId(2), StopId(4), StopId(5)]);
    }

    #[test]
    fn wheelchair_routes_via_the_elevator() {
        let mut station = load_station();
        let result = station.route(StopId(2), StopId(5), Profile::Wheelchair);

        // Stairs are out; the only way up is via platform 2's elevator.
        assert_eq!(result.path(), &[StopId(2), StopId(3), StopId(4), StopId(5)]);
    }

    #[test]
    fn validation_flags_the_orphaned_platform() {
        let mut station = load_station();
        let targets = [StopId(2), StopId(3), StopId(6)];

        let checks =
            validate_paths_to_stops(station.graph(Profile::Default), StopId(5), &targets);

        assert_eq!(checks[0].target, StopId(6));
        assert_eq!(checks[0].outcome, PathOutcome::Unreachable);
        assert!(checks[1..]
            .iter()
            .all(|c| matches!(c.outcome, PathOutcome::Reached { .. })));
    }

    #[test]
    fn synthesis_repairs_the_orphan_and_validation_passes() {
        let mut station = load_station();

        let created = add_street_pathways(&mut station);
        assert_eq!(created.len(), 1);
        assert!(created[0].is_synthetic());

        let checks = validate_paths_to_stops(
            station.graph(Profile::Default),
            StopId(5),
            &[StopId(2), StopId(3), StopId(6)],
        );
        assert!(checks
            .iter()
            .all(|c| matches!(c.outcome, PathOutcome::Reached { .. })));

        // Real pathways survived the repair untouched.
        let real: Vec<PathwayId> = station
            .pathways()
            .iter()
            .filter(|p| !p.generated)
            .map(|p| p.id)
            .collect();
        assert_eq!(
            real,
            vec![PathwayId(100), PathwayId(103), PathwayId(101), PathwayId(102)]
        );
    }

    #[test]
    fn levels_are_derived_from_the_load() {
        let station = load_station();
        let levels = station.levels();

        let lower = levels.iter().find(|l| l.id == LevelId(10)).unwrap();
        assert_eq!(lower.stops, vec![StopId(2), StopId(3)]);

        let unassigned = levels.iter().find(|l| l.id == LevelId::UNASSIGNED).unwrap();
        assert_eq!(unassigned.stops, vec![StopId(6)]);
    }
}
