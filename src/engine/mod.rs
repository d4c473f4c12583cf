mod location_api;
mod safe_place_api;
mod share_api;
mod sos_api;

pub use share_api::ShareJob;

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    api::API,
    entities::{Coordinates, Fix, SafePlace},
    external::{RoutingProvider, SharePlatform},
    render::{MarkerId, Renderer, TileLayer},
};

pub const LOCATION_PENDING_ALERT: &str = "Your location is not available yet. Please wait.";
pub const SHARE_PENDING_ALERT: &str = "Your location is not available. Cannot share.";

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Tracking {
    #[default]
    Unlocated,
    Located(Fix),
}

#[derive(Clone, Debug, Default)]
pub struct Session {
    pub tracking: Tracking,
    pub map_initialized: bool,
    pub user_marker: Option<MarkerId>,
    pub route: Option<Uuid>,
}

impl Session {
    pub fn current_location(&self) -> Option<Coordinates> {
        match &self.tracking {
            Tracking::Unlocated => None,
            Tracking::Located(fix) => Some(fix.coordinates),
        }
    }
}

pub struct Engine<R> {
    renderer: R,
    router: Arc<dyn RoutingProvider>,
    share_platform: Arc<dyn SharePlatform>,
    places: Vec<SafePlace>,
    tiles: TileLayer,
    session: Session,
}

impl<R: Renderer> Engine<R> {
    pub fn new(
        renderer: R,
        router: Arc<dyn RoutingProvider>,
        share_platform: Arc<dyn SharePlatform>,
        places: Vec<SafePlace>,
    ) -> Self {
        Self {
            renderer,
            router,
            share_platform,
            places,
            tiles: TileLayer::carto_dark(),
            session: Session::default(),
        }
    }

    pub fn with_tiles(mut self, tiles: TileLayer) -> Self {
        self.tiles = tiles;
        self
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn places(&self) -> &[SafePlace] {
        &self.places
    }
}

impl<R: Renderer> API for Engine<R> {}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use geo_types::LineString;

    use super::Engine;
    use crate::entities::{Coordinates, ShareData};
    use crate::error::{no_route_error, share_error, Error};
    use crate::external::{RoutingProvider, SharePlatform};
    use crate::places;
    use crate::render::SceneRenderer;

    #[derive(Default)]
    pub struct StubRouter {
        pub fail: bool,
        pub calls: AtomicUsize,
    }

    #[async_trait]
    impl RoutingProvider for StubRouter {
        async fn find_path(
            &self,
            origin: Coordinates,
            destination: Coordinates,
        ) -> Result<LineString<f64>, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            if self.fail {
                return Err(no_route_error());
            }

            Ok(vec![
                (origin.longitude, origin.latitude),
                (destination.longitude, destination.latitude),
            ]
            .into())
        }
    }

    #[derive(Default)]
    pub struct StubSharePlatform {
        pub native: bool,
        pub fail: bool,
        /// Share sheet crashes instead of answering.
        pub panic: bool,
        pub clipboard: std::sync::Mutex<Vec<String>>,
    }

    #[async_trait]
    impl SharePlatform for StubSharePlatform {
        fn supports_native_share(&self) -> bool {
            self.native
        }

        async fn share(&self, _data: &ShareData) -> Result<(), Error> {
            if self.panic {
                panic!("share sheet crashed");
            }
            if self.fail {
                return Err(share_error("AbortError: Share canceled"));
            }
            Ok(())
        }

        async fn write_clipboard(&self, text: &str) -> Result<(), Error> {
            if self.fail {
                return Err(share_error("NotAllowedError: Write permission denied"));
            }
            self.clipboard.lock().unwrap().push(text.into());
            Ok(())
        }
    }

    pub fn engine_with(
        router: Arc<StubRouter>,
        share_platform: Arc<StubSharePlatform>,
    ) -> Engine<SceneRenderer> {
        Engine::new(SceneRenderer::new(), router, share_platform, places::rajkot())
    }

    pub fn engine() -> Engine<SceneRenderer> {
        engine_with(
            Arc::new(StubRouter::default()),
            Arc::new(StubSharePlatform {
                native: true,
                ..Default::default()
            }),
        )
    }
}
