use super::{Engine, Tracking};

use crate::{
    api::LocationAPI,
    entities::{Coordinates, Fix},
    geolocation::PositionError,
    render::{MarkerIcon, Renderer, Status, INITIAL_ZOOM, USER_ZOOM},
};

impl<R: Renderer> Engine<R> {
    fn initialize_map(&mut self, center: Coordinates) {
        self.renderer.init_map(center, INITIAL_ZOOM, &self.tiles);

        for place in &self.places {
            self.renderer.add_place_marker(place);
        }

        self.session.map_initialized = true;
    }
}

impl<R: Renderer> LocationAPI for Engine<R> {
    #[tracing::instrument(skip(self))]
    fn update_location(&mut self, fix: Fix) {
        let at = fix.coordinates;
        self.session.tracking = Tracking::Located(fix);
        self.renderer.set_status(&Status::Tracking);

        if !self.session.map_initialized {
            self.initialize_map(at);
        }

        match self.session.user_marker {
            Some(marker) => self.renderer.move_marker(marker, at),
            None => {
                let marker = self.renderer.add_user_marker(at, MarkerIcon::UserPulse);
                self.session.user_marker = Some(marker);
                self.renderer.set_view(at, USER_ZOOM);
            }
        }
    }

    #[tracing::instrument(skip(self))]
    fn location_failed(&mut self, error: PositionError) {
        tracing::warn!(%error, "geolocation failed");
        self.renderer.set_status(&Status::LocationFailed);
    }

    #[tracing::instrument(skip(self))]
    fn geolocation_unsupported(&mut self) {
        self.renderer.set_status(&Status::GeolocationUnsupported);
    }

    fn current_location(&self) -> Option<Coordinates> {
        self.session.current_location()
    }
}

#[test]
fn first_fix_initializes_map_once() {
    let mut engine = super::testing::engine();
    assert!(!engine.renderer().is_map_initialized());
    assert_eq!(engine.current_location(), None);

    let first = Coordinates::new(22.2800, 70.7720);
    engine.update_location(Fix::new(first));

    let scene = engine.renderer();
    assert!(engine.session().map_initialized);
    assert_eq!(scene.markers().len(), 6);
    assert_eq!(scene.tiles().unwrap().max_zoom, 19);
    assert_eq!(scene.viewport().unwrap().center, first);
    assert_eq!(scene.viewport().unwrap().zoom, USER_ZOOM);
    assert_eq!(scene.status(), Some("Your location is being tracked live."));

    // later fixes move the marker but never the viewport
    let second = Coordinates::new(22.2810, 70.7730);
    engine.update_location(Fix::new(second));

    let scene = engine.renderer();
    assert_eq!(scene.markers().len(), 6);
    assert_eq!(scene.viewport().unwrap().center, first);
    assert_eq!(scene.viewport().unwrap().zoom, USER_ZOOM);
    assert_eq!(engine.current_location(), Some(second));
}

#[test]
fn n_fixes_leave_one_marker_at_last_position() {
    let mut engine = super::testing::engine();

    let fixes: Vec<Coordinates> = (0..25)
        .map(|i| Coordinates::new(22.28 + i as f64 * 0.0001, 70.772 - i as f64 * 0.0001))
        .collect();

    for at in &fixes {
        engine.update_location(Fix::new(*at));
    }

    let users: Vec<_> = engine.renderer().user_markers().collect();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].position, *fixes.last().unwrap());
    assert_eq!(engine.session().user_marker, Some(users[0].id));
}

#[test]
fn failure_keeps_location_unset() {
    let mut engine = super::testing::engine();

    engine.location_failed(PositionError::PermissionDenied);

    assert_eq!(engine.current_location(), None);
    assert!(!engine.renderer().is_map_initialized());
    assert_eq!(
        engine.renderer().status(),
        Some("Could not access location. Please enable it.")
    );

    engine.geolocation_unsupported();
    assert_eq!(
        engine.renderer().status(),
        Some("Geolocation is not supported by your browser.")
    );
}

#[test]
fn failure_after_fix_keeps_last_location() {
    let mut engine = super::testing::engine();
    let at = Coordinates::new(22.2800, 70.7720);

    engine.update_location(Fix::new(at));
    engine.location_failed(PositionError::Timeout);

    assert_eq!(engine.current_location(), Some(at));
}
