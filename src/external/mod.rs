pub mod osrm;
pub mod share;

use async_trait::async_trait;
use geo_types::LineString;

use crate::entities::{Coordinates, ShareData};
use crate::error::Error;

#[async_trait]
pub trait RoutingProvider: Send + Sync {
    async fn find_path(
        &self,
        origin: Coordinates,
        destination: Coordinates,
    ) -> Result<LineString<f64>, Error>;
}

#[async_trait]
pub trait SharePlatform: Send + Sync {
    fn supports_native_share(&self) -> bool;

    /// Resolves once the user completes the share sheet; cancelling is an error.
    async fn share(&self, data: &ShareData) -> Result<(), Error>;

    async fn write_clipboard(&self, text: &str) -> Result<(), Error>;
}
