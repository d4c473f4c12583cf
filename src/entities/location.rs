use std::fmt;

use chrono::{DateTime, Utc};
use geo_types::Point;
use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters, as used by Leaflet's `CRS.Earth`.
pub const EARTH_RADIUS: f64 = 6_371_000.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle (haversine) distance in meters.
    pub fn distance_to(&self, other: &Coordinates) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let d_lat = lat2 - lat1;
        let d_lng = (other.longitude - self.longitude).to_radians();

        let a = ((d_lat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2))
        .clamp(0.0, 1.0);

        2.0 * EARTH_RADIUS * a.sqrt().atan2((1.0 - a).sqrt())
    }

    /// Moves the coordinate by the given offsets in meters.
    pub fn offset(&self, north: f64, east: f64) -> Coordinates {
        let meters_per_degree = EARTH_RADIUS.to_radians();
        let latitude = self.latitude + north / meters_per_degree;
        let longitude =
            self.longitude + east / (meters_per_degree * self.latitude.to_radians().cos());

        Coordinates::new(latitude, longitude)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

impl From<Coordinates> for Point<f64> {
    fn from(coordinates: Coordinates) -> Self {
        Point::new(coordinates.longitude, coordinates.latitude)
    }
}

impl From<Point<f64>> for Coordinates {
    fn from(point: Point<f64>) -> Self {
        Coordinates::new(point.y(), point.x())
    }
}

/// A single received geolocation sample.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fix {
    pub coordinates: Coordinates,
    pub timestamp: DateTime<Utc>,
}

impl Fix {
    pub fn new(coordinates: Coordinates) -> Self {
        Self {
            coordinates,
            timestamp: Utc::now(),
        }
    }
}

#[test]
fn distance_matches_known_offsets() {
    let origin = Coordinates::new(22.2800, 70.7720);

    assert_eq!(origin.distance_to(&origin), 0.0);

    let pharmacy = Coordinates::new(22.2750, 70.7700);
    let distance = origin.distance_to(&pharmacy);
    assert!((distance - 592.8).abs() < 1.0, "got {}", distance);
    assert!((pharmacy.distance_to(&origin) - distance).abs() < 1e-9);
}

#[test]
fn offset_moves_by_meters() {
    let origin = Coordinates::new(22.2800, 70.7720);
    let moved = origin.offset(300.0, -400.0);

    assert!((origin.distance_to(&moved) - 500.0).abs() < 1.0);
    assert!(moved.latitude > origin.latitude);
    assert!(moved.longitude < origin.longitude);
}

#[test]
fn point_conversion_swaps_axes() {
    let coordinates = Coordinates::new(22.28, 70.772);
    let point: Point<f64> = coordinates.into();

    assert_eq!(point.x(), 70.772);
    assert_eq!(point.y(), 22.28);
    assert_eq!(Coordinates::from(point), coordinates);
    assert_eq!(coordinates.to_string(), "22.28,70.772");
}
