//! Station interior routing.
//!
//! Models the inside of a transit station — platforms, entrances, boarding
//! areas, and the walkways, stairs, escalators, elevators, and fare gates
//! connecting them — as a weighted graph, and answers "how do I get from A to
//! B" under different accessibility constraints.
//!
//! The crate owns no I/O. The caller fetches stop records from wherever they
//! live, feeds each batch to [`Station::add_stops`], and repeats with the
//! returned id set until it is empty (the closure/cascade load). Route
//! queries then lazily build a [`router::RoutingGraph`] for the requested
//! [`router::Profile`] and run A* over it.

pub mod domain;
pub mod geo;
pub mod router;
pub mod station;
pub mod synthesis;

pub use station::Station;
