mod scene;

pub use scene::{Marker, SceneRenderer, Viewport};

use std::fmt;

use uuid::Uuid;

use crate::entities::{Coordinates, Route, SafePlace};

pub type MarkerId = Uuid;

/// Zoom used when the map is first created.
pub const INITIAL_ZOOM: u8 = 15;
/// Zoom used when the view snaps to the user's first fix.
pub const USER_ZOOM: u8 = 16;
/// Zoom used when the view follows a route to its destination.
pub const DESTINATION_ZOOM: u8 = 15;

#[derive(Clone, Debug, PartialEq)]
pub struct TileLayer {
    pub url_template: String,
    pub attribution: String,
    pub max_zoom: u8,
}

impl TileLayer {
    pub fn carto_dark() -> Self {
        Self {
            url_template: "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}{r}.png".into(),
            attribution: "© <a href=\"https://carto.com/attributions\">CARTO</a>".into(),
            max_zoom: 19,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkerIcon {
    Default,
    /// Pulsing dot (`user-location-pulse`) that marks the user.
    UserPulse,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Status {
    Tracking,
    LocationFailed,
    GeolocationUnsupported,
    Nearest { name: String },
    Shared,
    ShareFailed { reason: String },
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tracking => f.write_str("Your location is being tracked live."),
            Self::LocationFailed => f.write_str("Could not access location. Please enable it."),
            Self::GeolocationUnsupported => {
                f.write_str("Geolocation is not supported by your browser.")
            }
            Self::Nearest { name } => {
                write!(f, "Nearest Safe Place: {}. Routing you now.", name)
            }
            Self::Shared => f.write_str("Location shared successfully!"),
            Self::ShareFailed { reason } => write!(f, "Error sharing location: {}", reason),
        }
    }
}

/// Everything the session needs from the page: the map widget, the status
/// line, blocking alerts and the SOS panel.
pub trait Renderer: Send {
    fn init_map(&mut self, center: Coordinates, zoom: u8, tiles: &TileLayer);
    fn add_place_marker(&mut self, place: &SafePlace) -> MarkerId;
    fn add_user_marker(&mut self, at: Coordinates, icon: MarkerIcon) -> MarkerId;
    fn move_marker(&mut self, marker: MarkerId, to: Coordinates);
    fn set_view(&mut self, center: Coordinates, zoom: u8);
    fn draw_route(&mut self, route: &Route);
    fn remove_route(&mut self, id: Uuid);
    fn set_status(&mut self, status: &Status);
    fn alert(&mut self, message: &str);
    fn is_modal_visible(&self) -> bool;
    fn set_modal_visible(&mut self, visible: bool);
}
