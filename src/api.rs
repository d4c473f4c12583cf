use async_trait::async_trait;

use crate::engine::ShareJob;
use crate::entities::{Coordinates, Fix, Nearest, ShareOutcome};
use crate::error::Error;
use crate::geolocation::PositionError;

pub trait LocationAPI {
    fn update_location(&mut self, fix: Fix);
    fn location_failed(&mut self, error: PositionError);
    fn geolocation_unsupported(&mut self);
    fn current_location(&self) -> Option<Coordinates>;
}

#[async_trait]
pub trait SafePlaceAPI {
    /// Resolves the nearest place without touching the map.
    fn nearest_safe_place(&self) -> Result<Nearest, Error>;

    /// Resolves the nearest place and routes the user to it.
    async fn find_safe_place(&mut self) -> Result<Nearest, Error>;
}

#[async_trait]
pub trait ShareAPI {
    fn begin_share(&mut self) -> Result<ShareJob, Error>;
    fn finish_share(&mut self, outcome: Result<ShareOutcome, Error>) -> Result<ShareOutcome, Error>;
    async fn share_location(&mut self) -> Result<ShareOutcome, Error>;
}

pub trait SosAPI {
    /// Flips the SOS panel and returns whether it is now visible.
    fn toggle_sos_modal(&mut self) -> bool;
}

pub trait API: LocationAPI + SafePlaceAPI + ShareAPI + SosAPI {}
