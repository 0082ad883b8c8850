//! Domain types for station interior routing.
//!
//! These types mirror the shapes of the external data source's records: stops,
//! the pathways connecting them, and the levels grouping them. Integer type
//! codes are decoded into enums at the boundary, so code that receives these
//! types never sees an out-of-range code.

mod error;
mod level;
mod pathway;
mod stop;

pub use error::DomainError;
pub use level::{Level, LevelId};
pub use pathway::{Pathway, PathwayId, PathwayMode, UnknownPathwayMode};
pub use stop::{LocationType, Stop, StopId, UnknownLocationType};
