//! Cost profiles: pure functions from a pathway and its distance to a
//! traversal cost in seconds.
//!
//! A profile returning `None` marks the pathway impassable for that profile
//! (e.g. stairs under the wheelchair profile). Profiles are deterministic and
//! side-effect-free; the graph builder may apply the same profile many times
//! and must get identical results.

use std::fmt;

use crate::domain::{Pathway, PathwayMode};

/// Assumed walking speed in metres per second.
pub const WALK_SPEED_M_S: f64 = 1.3;

/// Assumed wheelchair speed in metres per second.
pub const WHEELCHAIR_SPEED_M_S: f64 = 0.7;

/// Upper bound on traversal speed, used for the A* heuristic. No profile may
/// produce a cost below `distance / MAX_TRAVERSAL_SPEED_M_S`, which keeps the
/// heuristic admissible.
pub const MAX_TRAVERSAL_SPEED_M_S: f64 = 5.0;

/// A named cost profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Profile {
    /// Pure time-at-walking-speed, with no per-mode adjustment. Useful as a
    /// baseline and for connectivity checks that should ignore comfort.
    Distance,

    /// Walking with per-mode penalties (stairs slower, escalators and
    /// elevators add waiting time, gates add queueing time).
    Default,

    /// Like [`Profile::Default`], but stairs are impassable.
    NoStairs,

    /// Like [`Profile::Default`], but stairs and escalators are impassable.
    NoStairsOrEscalator,

    /// Wheelchair accessibility: stairs and escalators are impassable, and
    /// travel is at reduced speed.
    Wheelchair,
}

impl Profile {
    /// All profiles, for iteration in validation sweeps.
    pub const ALL: [Profile; 5] = [
        Profile::Distance,
        Profile::Default,
        Profile::NoStairs,
        Profile::NoStairsOrEscalator,
        Profile::Wheelchair,
    ];

    /// Cost in seconds of traversing `pathway`, whose effective distance is
    /// `distance` metres, or `None` if the pathway is impassable under this
    /// profile.
    pub fn cost(&self, pathway: &Pathway, distance: f64) -> Option<f64> {
        match self {
            Profile::Distance => Some(admissible(
                base_time(pathway, distance, WALK_SPEED_M_S),
                distance,
            )),
            Profile::Default => Some(adjusted_cost(pathway, distance, WALK_SPEED_M_S)),
            Profile::NoStairs => match pathway.mode {
                PathwayMode::Stairs => None,
                _ => Some(adjusted_cost(pathway, distance, WALK_SPEED_M_S)),
            },
            Profile::NoStairsOrEscalator => match pathway.mode {
                PathwayMode::Stairs | PathwayMode::Escalator => None,
                _ => Some(adjusted_cost(pathway, distance, WALK_SPEED_M_S)),
            },
            Profile::Wheelchair => match pathway.mode {
                PathwayMode::Stairs | PathwayMode::Escalator => None,
                _ => Some(adjusted_cost(pathway, distance, WHEELCHAIR_SPEED_M_S)),
            },
        }
    }

    /// Look up a profile by its display name.
    pub fn from_name(name: &str) -> Option<Profile> {
        Profile::ALL.iter().copied().find(|p| p.to_string() == name)
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Profile::Distance => "Pathways: Distance",
            Profile::Default => "Pathways: Default",
            Profile::NoStairs => "Pathways: No stairs",
            Profile::NoStairsOrEscalator => "Pathways: No stairs or escalators",
            Profile::Wheelchair => "Pathways: Wheelchair",
        };
        f.write_str(name)
    }
}

/// Base traversal time: the surveyed time when present, otherwise distance at
/// the given speed.
fn base_time(pathway: &Pathway, distance: f64, speed: f64) -> f64 {
    pathway.traversal_time.unwrap_or(distance / speed)
}

/// Floor a cost so it never undercuts the heuristic.
fn admissible(cost: f64, distance: f64) -> f64 {
    cost.max(distance / MAX_TRAVERSAL_SPEED_M_S)
}

fn adjusted_cost(pathway: &Pathway, distance: f64, speed: f64) -> f64 {
    let t = base_time(pathway, distance, speed);

    let adjusted = match pathway.mode {
        PathwayMode::Walkway => t,
        PathwayMode::Stairs => t * 1.5,
        PathwayMode::MovingSidewalk => t * 0.75,
        PathwayMode::Escalator => t + 10.0,
        PathwayMode::Elevator => t + 60.0,
        PathwayMode::FareGate => t * 1.5 + 10.0,
        PathwayMode::ExitGate => t + 10.0,
    };

    admissible(adjusted, distance)
}
