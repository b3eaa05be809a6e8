//! Geographic coordinates and great-circle distance.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters used by the haversine formula.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS84 position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
}

impl Coordinate {
    /// Creates a coordinate from latitude and longitude in degrees.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Returns true if both components are finite and within range.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    /// Great-circle distance to `other` in meters (haversine).
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let a = (d_lat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        // Rounding can push `a` marginally above 1 for antipodal points
        let c = 2.0 * a.sqrt().min(1.0).asin();

        EARTH_RADIUS_M * c
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_distance_to_self() {
        let p = Coordinate::new(41.1579, -8.6291);
        assert_eq!(p.distance_to(&p), 0.0);
    }

    #[test]
    fn one_degree_of_latitude() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(1.0, 0.0);
        let expected = EARTH_RADIUS_M * std::f64::consts::PI / 180.0;
        assert!((a.distance_to(&b) - expected).abs() < 1e-6);
    }

    #[test]
    fn known_city_distance() {
        // Porto (Trindade) to Lisbon (Rossio), roughly 274 km
        let porto = Coordinate::new(41.1526, -8.6093);
        let lisbon = Coordinate::new(38.7139, -9.1394);
        let d = porto.distance_to(&lisbon);
        assert!((270_000.0..280_000.0).contains(&d), "got {d}");
    }

    #[test]
    fn antipodal_points_do_not_produce_nan() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(0.0, 180.0);
        let d = a.distance_to(&b);
        assert!(d.is_finite());
        assert!((d - EARTH_RADIUS_M * std::f64::consts::PI).abs() < 1e-3);
    }

    #[test]
    fn validity() {
        assert!(Coordinate::new(41.0, -8.0).is_valid());
        assert!(!Coordinate::new(91.0, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, 181.0).is_valid());
        assert!(!Coordinate::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn display() {
        let p = Coordinate::new(41.15, -8.61);
        assert_eq!(p.to_string(), "(41.150000, -8.610000)");
    }
}
