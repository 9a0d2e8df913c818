//! Coordinates and great-circle distance.
//!
//! Distances between facilities are small relative to the planet, so plain
//! haversine on a spherical Earth is accurate well past the 2-decimal-mile
//! precision the pipeline reports.

use crate::error::GeoError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Statute miles per meter conversion factor.
pub const METERS_PER_MILE: f64 = 1609.34;

/// Mean Earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A validated WGS84 coordinate.
///
/// Immutable once constructed; equality is exact, proximity goes through
/// [`Coordinate::distance_meters`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    lat: f64,
    lon: f64,
}

impl Coordinate {
    /// Create a coordinate, validating the ranges.
    ///
    /// # Errors
    /// Returns error if latitude is outside [-90, 90] or longitude is
    /// outside [-180, 180].
    pub fn new(lat: f64, lon: f64) -> Result<Self, GeoError> {
        if !(-90.0..=90.0).contains(&lat) || lat.is_nan() {
            return Err(GeoError::InvalidLatitude(lat));
        }
        if !(-180.0..=180.0).contains(&lon) || lon.is_nan() {
            return Err(GeoError::InvalidLongitude(lon));
        }
        Ok(Self { lat, lon })
    }

    /// Latitude in degrees.
    #[must_use]
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    #[must_use]
    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// Great-circle distance to another coordinate, in meters.
    #[must_use]
    pub fn distance_meters(self, other: Coordinate) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let dlat = (other.lat - self.lat).to_radians();
        let dlon = (other.lon - self.lon).to_radians();

        let a = (dlat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_M * c
    }

    /// Great-circle distance to another coordinate, in statute miles.
    #[must_use]
    pub fn distance_miles(self, other: Coordinate) -> f64 {
        self.distance_meters(other) / METERS_PER_MILE
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

/// Round a mile figure to the 2-decimal precision the pipeline reports.
#[must_use]
pub fn round_miles(miles: f64) -> f64 {
    (miles * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_valid() {
        let c = Coordinate::new(51.5088, -2.5782).expect("valid coordinate");
        assert!((c.lat() - 51.5088).abs() < f64::EPSILON);
        assert!((c.lon() + 2.5782).abs() < f64::EPSILON);
    }

    #[test]
    fn test_coordinate_invalid_latitude() {
        assert!(matches!(
            Coordinate::new(90.01, 0.0),
            Err(GeoError::InvalidLatitude(_))
        ));
        assert!(matches!(
            Coordinate::new(-91.0, 0.0),
            Err(GeoError::InvalidLatitude(_))
        ));
    }

    #[test]
    fn test_coordinate_invalid_longitude() {
        assert!(matches!(
            Coordinate::new(0.0, 180.5),
            Err(GeoError::InvalidLongitude(_))
        ));
        assert!(matches!(
            Coordinate::new(0.0, -181.0),
            Err(GeoError::InvalidLongitude(_))
        ));
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        let c = Coordinate::new(51.5088, -2.5782).expect("valid coordinate");
        assert!(c.distance_meters(c).abs() < f64::EPSILON);
        assert!(c.distance_miles(c).abs() < f64::EPSILON);
    }

    #[test]
    fn test_distance_known_pair() {
        // Filton, Bristol to central London is roughly 170 km.
        let filton = Coordinate::new(51.5088, -2.5782).expect("valid coordinate");
        let london = Coordinate::new(51.5074, -0.1278).expect("valid coordinate");

        let meters = filton.distance_meters(london);
        assert!(meters > 165_000.0, "got {meters}");
        assert!(meters < 175_000.0, "got {meters}");
    }

    #[test]
    fn test_distance_symmetry() {
        let a = Coordinate::new(51.5088, -2.5782).expect("valid coordinate");
        let b = Coordinate::new(51.52, -2.54).expect("valid coordinate");
        let ab = a.distance_meters(b);
        let ba = b.distance_meters(a);
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn test_round_miles() {
        assert!((round_miles(3.14159) - 3.14).abs() < f64::EPSILON);
        assert!((round_miles(2.676) - 2.68).abs() < f64::EPSILON);
        assert!((round_miles(0.0) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_coordinate_serde_roundtrip() {
        let c = Coordinate::new(51.5088, -2.5782).expect("valid coordinate");
        let json = serde_json::to_string(&c).expect("serialize coordinate");
        let parsed: Coordinate = serde_json::from_str(&json).expect("deserialize coordinate");
        assert_eq!(parsed, c);
    }
}
