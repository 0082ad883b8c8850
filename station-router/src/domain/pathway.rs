//! Pathway records: the physical connectors between stops.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::stop::StopId;

/// Identifier of a pathway record.
///
/// Negative ids are reserved for pathways synthesized by this crate (street
/// connectivity repair); the external source only ever issues positive ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathwayId(pub i64);

impl PathwayId {
    /// Whether this id was generated locally rather than by the data source.
    pub fn is_synthetic(&self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for PathwayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when decoding an unknown pathway mode code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown pathway mode code: {0}")]
pub struct UnknownPathwayMode(pub u8);

/// Physical type of a pathway, mirroring the external schema's integer codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PathwayMode {
    /// Plain walkway (code 1).
    Walkway,

    /// Stairs (code 2).
    Stairs,

    /// Moving sidewalk / travelator (code 3).
    MovingSidewalk,

    /// Escalator (code 4).
    Escalator,

    /// Elevator (code 5).
    Elevator,

    /// Fare gate (code 6).
    FareGate,

    /// Exit gate (code 7).
    ExitGate,
}

impl TryFrom<u8> for PathwayMode {
    type Error = UnknownPathwayMode;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::Walkway),
            2 => Ok(Self::Stairs),
            3 => Ok(Self::MovingSidewalk),
            4 => Ok(Self::Escalator),
            5 => Ok(Self::Elevator),
            6 => Ok(Self::FareGate),
            7 => Ok(Self::ExitGate),
            other => Err(UnknownPathwayMode(other)),
        }
    }
}

impl From<PathwayMode> for u8 {
    fn from(m: PathwayMode) -> u8 {
        match m {
            PathwayMode::Walkway => 1,
            PathwayMode::Stairs => 2,
            PathwayMode::MovingSidewalk => 3,
            PathwayMode::Escalator => 4,
            PathwayMode::Elevator => 5,
            PathwayMode::FareGate => 6,
            PathwayMode::ExitGate => 7,
        }
    }
}

/// A pathway record.
///
/// Endpoints are references by id and may dangle: a pathway whose endpoint has
/// not been loaded is kept in the working set (its endpoint id drives the
/// closure fetch) but skipped during graph construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pathway {
    /// Identifier, unique within the data source.
    pub id: PathwayId,

    /// Physical type of the connector.
    pub mode: PathwayMode,

    /// Whether the pathway can be traversed in both directions.
    #[serde(default)]
    pub is_bidirectional: bool,

    /// Origin stop.
    pub from_stop: StopId,

    /// Destination stop.
    pub to_stop: StopId,

    /// Physical length in metres, if surveyed.
    #[serde(default)]
    pub length: Option<f64>,

    /// Measured traversal time in seconds, if surveyed.
    #[serde(default)]
    pub traversal_time: Option<f64>,

    /// Number of stairs, if surveyed.
    #[serde(default)]
    pub stair_count: Option<i32>,

    /// Maximum slope as a ratio, if surveyed.
    #[serde(default)]
    pub max_slope: Option<f64>,

    /// Minimum width in metres, if surveyed.
    #[serde(default)]
    pub min_width: Option<f64>,

    /// True for pathways synthesized by this crate rather than loaded.
    #[serde(default)]
    pub generated: bool,
}

impl Pathway {
    /// Create a pathway with no surveyed physical attributes.
    pub fn new(
        id: PathwayId,
        mode: PathwayMode,
        from_stop: StopId,
        to_stop: StopId,
        is_bidirectional: bool,
    ) -> Self {
        Self {
            id,
            mode,
            is_bidirectional,
            from_stop,
            to_stop,
            length: None,
            traversal_time: None,
            stair_count: None,
            max_slope: None,
            min_width: None,
            generated: false,
        }
    }

    /// Set the surveyed length in metres.
    pub fn with_length(mut self, length: f64) -> Self {
        self.length = Some(length);
        self
    }

    /// Set the measured traversal time in seconds.
    pub fn with_traversal_time(mut self, seconds: f64) -> Self {
        self.traversal_time = Some(seconds);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_codes_roundtrip() {
        for code in 1u8..=7 {
            let m = PathwayMode::try_from(code).unwrap();
            assert_eq!(u8::from(m), code);
        }
    }

    #[test]
    fn unknown_mode_rejected() {
        assert_eq!(PathwayMode::try_from(0), Err(UnknownPathwayMode(0)));
        assert_eq!(PathwayMode::try_from(8), Err(UnknownPathwayMode(8)));
    }

    #[test]
    fn synthetic_ids_are_negative() {
        assert!(PathwayId(-1).is_synthetic());
        assert!(PathwayId(-100).is_synthetic());
        assert!(!PathwayId(0).is_synthetic());
        assert!(!PathwayId(17).is_synthetic());
    }

    #[test]
    fn deserialize_minimal_record() {
        let pw: Pathway = serde_json::from_str(
            r#"{"id": 3, "mode": 5, "from_stop": 1, "to_stop": 2}"#,
        )
        .unwrap();

        assert_eq!(pw.id, PathwayId(3));
        assert_eq!(pw.mode, PathwayMode::Elevator);
        assert!(!pw.is_bidirectional);
        assert!(pw.length.is_none());
        assert!(pw.traversal_time.is_none());
        assert!(!pw.generated);
    }

    #[test]
    fn deserialize_surveyed_record() {
        let pw: Pathway = serde_json::from_str(
            r#"{
                "id": 4,
                "mode": 2,
                "is_bidirectional": true,
                "from_stop": 1,
                "to_stop": 2,
                "length": 12.5,
                "traversal_time": 20.0,
                "stair_count": 24
            }"#,
        )
        .unwrap();

        assert_eq!(pw.mode, PathwayMode::Stairs);
        assert!(pw.is_bidirectional);
        assert_eq!(pw.length, Some(12.5));
        assert_eq!(pw.traversal_time, Some(20.0));
        assert_eq!(pw.stair_count, Some(24));
    }
}
