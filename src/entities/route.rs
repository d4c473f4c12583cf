use geo_types::LineString;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{Coordinates, SafePlace};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteStyle {
    pub color: String,
    pub opacity: f64,
    pub weight: u32,
}

impl Default for RouteStyle {
    fn default() -> Self {
        Self {
            color: "#50E3C2".into(),
            opacity: 1.0,
            weight: 6,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub id: Uuid,
    pub origin: Coordinates,
    pub destination: SafePlace,
    pub path: LineString<f64>,
    pub style: RouteStyle,
}

impl Route {
    pub fn new(origin: Coordinates, destination: SafePlace, path: LineString<f64>) -> Self {
        Route {
            id: Uuid::new_v4(),
            origin,
            destination,
            path,
            style: RouteStyle::default(),
        }
    }

    pub fn waypoints(&self) -> Vec<Coordinates> {
        self.path
            .points()
            .map(Coordinates::from)
            .collect()
    }
}
