//! Stop records and their identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

use super::level::Level;
use super::pathway::Pathway;

/// Identifier of a stop record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StopId(pub i64);

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when decoding an unknown location type code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown location type code: {0}")]
pub struct UnknownLocationType(pub u8);

/// Structural role of a stop, mirroring the external schema's integer codes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum LocationType {
    /// A platform or boarding point (code 0). The schema default.
    #[default]
    Platform,

    /// The station itself (code 1).
    Station,

    /// An entrance or exit (code 2).
    Entrance,

    /// A generic in-station node (code 3).
    GenericNode,

    /// A boarding area on a platform (code 4).
    BoardingArea,
}

impl TryFrom<u8> for LocationType {
    type Error = UnknownLocationType;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Platform),
            1 => Ok(Self::Station),
            2 => Ok(Self::Entrance),
            3 => Ok(Self::GenericNode),
            4 => Ok(Self::BoardingArea),
            other => Err(UnknownLocationType(other)),
        }
    }
}

impl From<LocationType> for u8 {
    fn from(t: LocationType) -> u8 {
        match t {
            LocationType::Platform => 0,
            LocationType::Station => 1,
            LocationType::Entrance => 2,
            LocationType::GenericNode => 3,
            LocationType::BoardingArea => 4,
        }
    }
}

/// A stop record as returned by the external data source.
///
/// Records arrive partially connected: a stop carries the ids of its parent,
/// children, and pathway endpoints, any of which may not have been fetched yet.
/// `Option` and `#[serde(default)]` are used liberally because the source omits
/// fields rather than sending nulls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stop {
    /// Identifier, unique within the data source.
    pub id: StopId,

    /// Human-readable name.
    #[serde(default)]
    pub name: String,

    /// Structural role of this stop.
    #[serde(default)]
    pub location_type: LocationType,

    /// Position, if the source has geometry for this stop.
    #[serde(default)]
    pub coordinate: Option<Coordinate>,

    /// The stop this one belongs to (e.g. a boarding area's platform).
    #[serde(default)]
    pub parent_station: Option<StopId>,

    /// Stops that belong to this one.
    #[serde(default)]
    pub children: Vec<StopId>,

    /// The level this stop is assigned to, if any.
    #[serde(default)]
    pub level: Option<Level>,

    /// Pathways leaving this stop.
    #[serde(default)]
    pub pathways_from_stop: Vec<Pathway>,

    /// Pathways arriving at this stop.
    #[serde(default)]
    pub pathways_to_stop: Vec<Pathway>,
}

impl Stop {
    /// Create a stop with no connections and no geometry.
    pub fn new(id: StopId, name: impl Into<String>, location_type: LocationType) -> Self {
        Self {
            id,
            name: name.into(),
            location_type,
            coordinate: None,
            parent_station: None,
            children: Vec::new(),
            level: None,
            pathways_from_stop: Vec::new(),
            pathways_to_stop: Vec::new(),
        }
    }

    /// Set the coordinate.
    pub fn with_coordinate(mut self, lon: f64, lat: f64) -> Self {
        self.coordinate = Some(Coordinate::new(lon, lat));
        self
    }

    /// Set the parent stop.
    pub fn with_parent(mut self, parent: StopId) -> Self {
        self.parent_station = Some(parent);
        self
    }

    /// Set the level.
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }

    /// Append a pathway leaving this stop.
    pub fn with_pathway_from(mut self, pathway: Pathway) -> Self {
        self.pathways_from_stop.push(pathway);
        self
    }

    /// Append a pathway arriving at this stop.
    pub fn with_pathway_to(mut self, pathway: Pathway) -> Self {
        self.pathways_to_stop.push(pathway);
        self
    }

    /// Iterate over the pathways attached to this record, in both directions.
    pub fn pathways(&self) -> impl Iterator<Item = &Pathway> {
        self.pathways_from_stop
            .iter()
            .chain(self.pathways_to_stop.iter())
    }
}
