use uuid::Uuid;

use super::{MarkerIcon, MarkerId, Renderer, Status, TileLayer};
use crate::entities::{Coordinates, Route, SafePlace};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub center: Coordinates,
    pub zoom: u8,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    pub id: MarkerId,
    pub position: Coordinates,
    pub icon: MarkerIcon,
    pub popup: Option<String>,
}

/// Headless page: keeps the map, status line and modal in memory and logs
/// every change.
#[derive(Debug, Default)]
pub struct SceneRenderer {
    tiles: Option<TileLayer>,
    viewport: Option<Viewport>,
    markers: Vec<Marker>,
    routes: Vec<Route>,
    status: Option<String>,
    alerts: Vec<String>,
    modal_visible: bool,
}

impl SceneRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tiles(&self) -> Option<&TileLayer> {
        self.tiles.as_ref()
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn user_markers(&self) -> impl Iterator<Item = &Marker> {
        self.markers
            .iter()
            .filter(|marker| marker.icon == MarkerIcon::UserPulse)
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    pub fn is_map_initialized(&self) -> bool {
        self.viewport.is_some()
    }
}

impl Renderer for SceneRenderer {
    fn init_map(&mut self, center: Coordinates, zoom: u8, tiles: &TileLayer) {
        tracing::info!(%center, zoom, tiles = %tiles.url_template, "map initialized");

        self.tiles = Some(tiles.clone());
        self.viewport = Some(Viewport { center, zoom });
    }

    fn add_place_marker(&mut self, place: &SafePlace) -> MarkerId {
        let id = Uuid::new_v4();
        tracing::debug!(name = %place.name, at = %place.coordinates, "place marker added");

        self.markers.push(Marker {
            id,
            position: place.coordinates,
            icon: MarkerIcon::Default,
            popup: Some(place.popup_label()),
        });

        id
    }

    fn add_user_marker(&mut self, at: Coordinates, icon: MarkerIcon) -> MarkerId {
        let id = Uuid::new_v4();
        tracing::debug!(%at, "user marker added");

        self.markers.push(Marker {
            id,
            position: at,
            icon,
            popup: None,
        });

        id
    }

    fn move_marker(&mut self, marker: MarkerId, to: Coordinates) {
        match self.markers.iter_mut().find(|m| m.id == marker) {
            Some(m) => {
                tracing::debug!(%to, "marker moved");
                m.position = to;
            }
            None => tracing::warn!(%marker, "move of unknown marker ignored"),
        }
    }

    fn set_view(&mut self, center: Coordinates, zoom: u8) {
        tracing::debug!(%center, zoom, "view set");
        self.viewport = Some(Viewport { center, zoom });
    }

    fn draw_route(&mut self, route: &Route) {
        tracing::info!(
            id = %route.id,
            destination = %route.destination.name,
            points = route.path.0.len(),
            "route drawn"
        );
        self.routes.push(route.clone());
    }

    fn remove_route(&mut self, id: Uuid) {
        tracing::debug!(%id, "route removed");
        self.routes.retain(|route| route.id != id);
    }

    fn set_status(&mut self, status: &Status) {
        let text = status.to_string();
        tracing::info!(status = %text);
        self.status = Some(text);
    }

    fn alert(&mut self, message: &str) {
        tracing::warn!(alert = message);
        self.alerts.push(message.into());
    }

    fn is_modal_visible(&self) -> bool {
        self.modal_visible
    }

    fn set_modal_visible(&mut self, visible: bool) {
        tracing::info!(visible, "sos modal");
        self.modal_visible = visible;
    }
}

#[test]
fn moving_unknown_marker_is_ignored() {
    let mut scene = SceneRenderer::new();
    let id = scene.add_user_marker(Coordinates::new(1.0, 2.0), MarkerIcon::UserPulse);

    scene.move_marker(Uuid::new_v4(), Coordinates::new(5.0, 5.0));
    assert_eq!(scene.markers()[0].position, Coordinates::new(1.0, 2.0));

    scene.move_marker(id, Coordinates::new(3.0, 4.0));
    assert_eq!(scene.markers()[0].position, Coordinates::new(3.0, 4.0));
}

#[test]
fn place_markers_carry_popups() {
    use crate::entities::Category;

    let mut scene = SceneRenderer::new();
    scene.add_place_marker(&SafePlace::new("Clinic", Category::Pharmacy, 1.0, 2.0));

    assert_eq!(scene.user_markers().count(), 0);
    assert_eq!(
        scene.markers()[0].popup.as_deref(),
        Some("<b>Clinic</b><br>Pharmacy")
    );
}
