//! Level records: the floors of a station.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::stop::StopId;

/// Identifier of a level record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelId(pub i64);

impl LevelId {
    /// The synthetic level that groups stops with no explicit level
    /// assignment. Created at most once per station.
    pub const UNASSIGNED: LevelId = LevelId(-1);
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A level (floor) of a station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// Identifier, unique within the data source.
    pub id: LevelId,

    /// Human-readable name, e.g. "Mezzanine".
    #[serde(default)]
    pub name: String,

    /// Vertical ordering index: higher means further up. Street level is
    /// conventionally 0.
    #[serde(default)]
    pub index: f64,

    /// Stops assigned to this level, as known to the data source. During the
    /// closure fetch these co-member ids are treated as references to load.
    #[serde(default)]
    pub stops: Vec<StopId>,
}

impl Level {
    /// Create a level with no member stops.
    pub fn new(id: LevelId, name: impl Into<String>, index: f64) -> Self {
        Self {
            id,
            name: name.into(),
            index,
            stops: Vec::new(),
        }
    }

    /// The synthetic "Unassigned" level.
    pub fn unassigned() -> Self {
        Self::new(LevelId::UNASSIGNED, "Unassigned", 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unassigned_sentinel() {
        let level = Level::unassigned();
        assert_eq!(level.id, LevelId::UNASSIGNED);
        assert_eq!(level.name, "Unassigned");
        assert!(level.stops.is_empty());
    }

    #[test]
    fn deserialize_with_members() {
        let level: Level = serde_json::from_str(
            r#"{"id": 2, "name": "Concourse", "index": -1.0, "stops": [4, 5, 6]}"#,
        )
        .unwrap();

        assert_eq!(level.id, LevelId(2));
        assert_eq!(level.index, -1.0);
        assert_eq!(level.stops, vec![StopId(4), StopId(5), StopId(6)]);
    }

    #[test]
    fn deserialize_minimal() {
        let level: Level = serde_json::from_str(r#"{"id": 1}"#).unwrap();
        assert_eq!(level.name, "");
        assert_eq!(level.index, 0.0);
        assert!(level.stops.is_empty());
    }
}
