//! Geometry utilities.
//!
//! Great-circle distance between two coordinates via the Haversine formula.
//! Coordinates are WGS84 degrees, longitude first (matching the external
//! schema); distances are in metres.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in metres.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS84 coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Longitude in degrees.
    pub lon: f64,

    /// Latitude in degrees.
    pub lat: f64,
}

impl Coordinate {
    /// Create a coordinate from longitude and latitude in degrees.
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

/// Great-circle distance between two coordinates, in metres.
///
/// # Examples
///
/// ```
/// use station_router::geo::{Coordinate, haversine_distance};
///
/// let a = Coordinate::new(-122.0, 37.0);
/// let b = Coordinate::new(-122.0, 37.0);
/// assert_eq!(haversine_distance(a, b), 0.0);
/// ```
pub fn haversine_distance(a: Coordinate, b: Coordinate) -> f64 {
    let lat_a = a.lat.to_radians();
    let lat_b = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_points() {
        let p = Coordinate::new(-0.1278, 51.5074);
        assert_eq!(haversine_distance(p, p), 0.0);
    }

    #[test]
    fn platform_to_entrance() {
        // 0.0005 degrees of longitude at latitude 37 is roughly 44 metres.
        let platform = Coordinate::new(-122.0, 37.0);
        let entrance = Coordinate::new(-122.0005, 37.0);

        let d = haversine_distance(platform, entrance);
        assert!((44.0..45.0).contains(&d), "got {d}");
    }

    #[test]
    fn one_degree_of_latitude() {
        // One degree of latitude is ~111.2 km regardless of longitude.
        let a = Coordinate::new(10.0, 50.0);
        let b = Coordinate::new(10.0, 51.0);

        let d = haversine_distance(a, b);
        assert!((111_000.0..111_400.0).contains(&d), "got {d}");
    }

    #[test]
    fn antimeridian_crossing() {
        // Points either side of the antimeridian are close, not half a world apart.
        let a = Coordinate::new(179.9995, 0.0);
        let b = Coordinate::new(-179.9995, 0.0);

        let d = haversine_distance(a, b);
        assert!(d < 200.0, "got {d}");
    }
}
