use async_trait::async_trait;
use geo_types::LineString;
use serde::{Deserialize, Serialize};

use super::RoutingProvider;
use crate::{
    entities::Coordinates,
    error::{invalid_input_error, no_route_error, upstream_error, Error},
};

pub const DEFAULT_API_BASE: &str = "https://router.project-osrm.org";

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Response {
    code: String,
    routes: Option<Vec<RouteResult>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct RouteResult {
    geometry: Geometry,
    distance: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Geometry {
    /// `[longitude, latitude]` pairs.
    coordinates: Vec<[f64; 2]>,
}

#[derive(Clone, Debug)]
pub struct OsrmRouter {
    api_base: String,
    client: reqwest::Client,
}

impl OsrmRouter {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn route_url(&self, origin: &Coordinates, destination: &Coordinates) -> String {
        format!(
            "{}/route/v1/driving/{},{};{},{}",
            self.api_base,
            origin.longitude,
            origin.latitude,
            destination.longitude,
            destination.latitude
        )
    }
}

impl Default for OsrmRouter {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}

#[async_trait]
impl RoutingProvider for OsrmRouter {
    #[tracing::instrument(skip(self))]
    async fn find_path(
        &self,
        origin: Coordinates,
        destination: Coordinates,
    ) -> Result<LineString<f64>, Error> {
        let res = self
            .client
            .get(self.route_url(&origin, &destination))
            .query(&[("overview", "full"), ("geometries", "geojson")])
            .send()
            .await?;

        let status_code = res.status().as_u16();

        if status_code >= 400 && status_code < 500 {
            return Err(invalid_input_error());
        } else if status_code != 200 {
            return Err(upstream_error());
        }

        let data: Response = res.json().await?;

        path_from_response(data)
    }
}

fn path_from_response(data: Response) -> Result<LineString<f64>, Error> {
    match data.code.as_str() {
        "Ok" => {}
        "NoRoute" | "NoSegment" => return Err(no_route_error()),
        _ => return Err(upstream_error()),
    }

    let route = data
        .routes
        .and_then(|routes| routes.into_iter().next())
        .ok_or_else(no_route_error)?;

    tracing::debug!(distance = route.distance, "route found");

    Ok(route
        .geometry
        .coordinates
        .into_iter()
        .map(|[lng, lat]| (lng, lat))
        .collect::<Vec<_>>()
        .into())
}

#[test]
fn parses_geojson_route() {
    let body = r#"{
        "code": "Ok",
        "routes": [{
            "distance": 712.4,
            "geometry": {
                "type": "LineString",
                "coordinates": [[70.772, 22.28], [70.7712, 22.2781], [70.77, 22.275]]
            }
        }],
        "waypoints": []
    }"#;

    let data: Response = serde_json::from_str(body).unwrap();
    let path = path_from_response(data).unwrap();

    assert_eq!(path.0.len(), 3);
    assert_eq!(path.0[0].x, 70.772);
    assert_eq!(path.0[0].y, 22.28);
}

#[test]
fn no_route_is_an_error() {
    let data: Response = serde_json::from_str(r#"{"code": "NoRoute"}"#).unwrap();
    assert_eq!(path_from_response(data).unwrap_err(), no_route_error());

    let data: Response = serde_json::from_str(r#"{"code": "Ok", "routes": []}"#).unwrap();
    assert_eq!(path_from_response(data).unwrap_err(), no_route_error());

    let data: Response = serde_json::from_str(r#"{"code": "TooBig"}"#).unwrap();
    assert_eq!(path_from_response(data).unwrap_err(), upstream_error());
}

#[test]
fn route_url_orders_longitude_first() {
    let router = OsrmRouter::new("http://localhost:5000/");
    let url = router.route_url(
        &Coordinates::new(22.28, 70.772),
        &Coordinates::new(22.275, 70.77),
    );

    assert_eq!(
        url,
        "http://localhost:5000/route/v1/driving/70.772,22.28;70.77,22.275"
    );
}
