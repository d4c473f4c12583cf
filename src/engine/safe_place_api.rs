use super::{Engine, LOCATION_PENDING_ALERT};

use async_trait::async_trait;

use crate::{
    api::{LocationAPI, SafePlaceAPI},
    entities::{find_nearest, Coordinates, Nearest, Route, SafePlace},
    error::{location_unavailable_error, no_safe_place_error, Error},
    render::{Renderer, Status, DESTINATION_ZOOM},
};

impl<R: Renderer> Engine<R> {
    /// Replaces the active route. The old one is gone before the provider is
    /// asked, so a failed lookup leaves no route at all.
    #[tracing::instrument(skip(self, destination), fields(destination = %destination.name))]
    async fn route_to(&mut self, origin: Coordinates, destination: &SafePlace) {
        if let Some(id) = self.session.route.take() {
            self.renderer.remove_route(id);
        }

        match self
            .router
            .find_path(origin, destination.coordinates)
            .await
        {
            Ok(path) => {
                let route = Route::new(origin, destination.clone(), path);
                self.renderer.draw_route(&route);
                self.session.route = Some(route.id);
            }
            Err(err) => tracing::warn!(%err, "routing failed"),
        }

        self.renderer
            .set_view(destination.coordinates, DESTINATION_ZOOM);
    }
}

#[async_trait]
impl<R: Renderer> SafePlaceAPI for Engine<R> {
    fn nearest_safe_place(&self) -> Result<Nearest, Error> {
        let at = self
            .current_location()
            .ok_or_else(location_unavailable_error)?;

        find_nearest(&self.places, &at).ok_or_else(no_safe_place_error)
    }

    #[tracing::instrument(skip(self))]
    async fn find_safe_place(&mut self) -> Result<Nearest, Error> {
        let origin = match self.current_location() {
            Some(origin) => origin,
            None => {
                self.renderer.alert(LOCATION_PENDING_ALERT);
                return Err(location_unavailable_error());
            }
        };

        let nearest = find_nearest(&self.places, &origin).ok_or_else(no_safe_place_error)?;

        tracing::info!(
            name = %nearest.place.name,
            distance = nearest.distance,
            "nearest safe place"
        );

        self.renderer.set_status(&Status::Nearest {
            name: nearest.place.name.clone(),
        });
        self.route_to(origin, &nearest.place).await;

        Ok(nearest)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    use tokio_test::block_on;

    use crate::api::{LocationAPI, SafePlaceAPI};
    use crate::engine::testing::{engine, engine_with, StubRouter, StubSharePlatform};
    use crate::entities::{Coordinates, Fix};
    use crate::render::DESTINATION_ZOOM;

    #[test]
    fn find_before_fix_alerts_without_mutation() {
        let mut engine = engine();

        let err = block_on(engine.find_safe_place()).unwrap_err();

        assert!(err.is_location_unavailable_error());
        let scene = engine.renderer();
        assert_eq!(
            scene.alerts(),
            ["Your location is not available yet. Please wait.".to_string()]
        );
        assert!(!scene.is_map_initialized());
        assert!(scene.markers().is_empty());
        assert!(scene.routes().is_empty());
        assert_eq!(scene.status(), None);
        assert!(engine.session().route.is_none());
    }

    #[test]
    fn nearest_reports_place_and_distance() {
        let mut engine = engine();
        assert!(engine
            .nearest_safe_place()
            .unwrap_err()
            .is_location_unavailable_error());

        engine.update_location(Fix::new(Coordinates::new(22.2850, 70.7705)));

        let nearest = engine.nearest_safe_place().unwrap();
        assert_eq!(nearest.place.name, "University Police Station");
        assert!((nearest.distance - 121.2).abs() < 1.0);
        assert!(engine.renderer().routes().is_empty());
    }

    #[test]
    fn find_routes_to_nearest_and_updates_status() {
        let mut engine = engine();
        let origin = Coordinates::new(22.2800, 70.7720);
        engine.update_location(Fix::new(origin));

        let nearest = block_on(engine.find_safe_place()).unwrap();

        assert_eq!(nearest.place.name, "24x7 Pharmacy (Near Wockhardt)");
        let scene = engine.renderer();
        assert_eq!(
            scene.status(),
            Some("Nearest Safe Place: 24x7 Pharmacy (Near Wockhardt). Routing you now.")
        );
        assert_eq!(scene.routes().len(), 1);
        let route = &scene.routes()[0];
        assert_eq!(route.origin, origin);
        assert_eq!(route.destination, nearest.place);
        assert_eq!(route.style.color, "#50E3C2");
        assert_eq!(route.waypoints().last(), Some(&nearest.place.coordinates));
        assert_eq!(scene.viewport().unwrap().center, nearest.place.coordinates);
        assert_eq!(scene.viewport().unwrap().zoom, DESTINATION_ZOOM);
    }

    #[test]
    fn second_find_replaces_route() {
        let router = Arc::new(StubRouter::default());
        let mut engine = engine_with(router.clone(), Arc::new(StubSharePlatform::default()));
        engine.update_location(Fix::new(Coordinates::new(22.2800, 70.7720)));

        block_on(engine.find_safe_place()).unwrap();
        let first = engine.session().route.unwrap();

        engine.update_location(Fix::new(Coordinates::new(22.2960, 70.7720)));
        let nearest = block_on(engine.find_safe_place()).unwrap();

        let routes = engine.renderer().routes();
        assert_eq!(router.calls.load(Ordering::SeqCst), 2);
        assert_eq!(routes.len(), 1);
        assert_ne!(routes[0].id, first);
        assert_eq!(Some(routes[0].id), engine.session().route);
        assert_eq!(nearest.place.name, "Gandhigram Police Station");
    }

    #[test]
    fn routing_failure_is_a_visual_noop() {
        let router = Arc::new(StubRouter::default());
        let mut engine = engine_with(router, Arc::new(StubSharePlatform::default()));
        engine.update_location(Fix::new(Coordinates::new(22.2800, 70.7720)));
        block_on(engine.find_safe_place()).unwrap();
        assert_eq!(engine.renderer().routes().len(), 1);

        let failing = Arc::new(StubRouter {
            fail: true,
            ..Default::default()
        });
        let mut engine = engine_with(failing, Arc::new(StubSharePlatform::default()));
        engine.update_location(Fix::new(Coordinates::new(22.2800, 70.7720)));

        let nearest = block_on(engine.find_safe_place()).unwrap();

        let scene = engine.renderer();
        assert!(scene.routes().is_empty());
        assert!(engine.session().route.is_none());
        assert_eq!(scene.viewport().unwrap().center, nearest.place.coordinates);
    }

    #[test]
    fn empty_place_list_changes_nothing() {
        use crate::engine::Engine;
        use crate::render::SceneRenderer;

        let mut engine = Engine::new(
            SceneRenderer::new(),
            Arc::new(StubRouter::default()),
            Arc::new(StubSharePlatform::default()),
            vec![],
        );
        engine.update_location(Fix::new(Coordinates::new(22.2800, 70.7720)));

        assert!(block_on(engine.find_safe_place()).is_err());
        assert!(engine.renderer().routes().is_empty());
        assert_eq!(
            engine.renderer().status(),
            Some("Your location is being tracked live.")
        );
    }
}
