use super::{Engine, SHARE_PENDING_ALERT};

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    api::{LocationAPI, ShareAPI},
    entities::{ShareData, ShareOutcome},
    error::{location_unavailable_error, Error},
    external::SharePlatform,
    render::{Renderer, Status},
};

/// A share in flight. Owns everything it needs so it can run detached from
/// the session while the user is in the share sheet.
pub struct ShareJob {
    data: ShareData,
    platform: Arc<dyn SharePlatform>,
}

impl ShareJob {
    pub fn data(&self) -> &ShareData {
        &self.data
    }

    #[tracing::instrument(skip(self), fields(url = %self.data.url))]
    pub async fn run(self) -> Result<ShareOutcome, Error> {
        if self.platform.supports_native_share() {
            self.platform.share(&self.data).await?;
            return Ok(ShareOutcome::Shared);
        }

        self.platform.write_clipboard(&self.data.url).await?;

        Ok(ShareOutcome::Copied { url: self.data.url })
    }
}

#[async_trait]
impl<R: Renderer> ShareAPI for Engine<R> {
    #[tracing::instrument(skip(self))]
    fn begin_share(&mut self) -> Result<ShareJob, Error> {
        let at = match self.current_location() {
            Some(at) => at,
            None => {
                self.renderer.alert(SHARE_PENDING_ALERT);
                return Err(location_unavailable_error());
            }
        };

        Ok(ShareJob {
            data: ShareData::for_location(&at),
            platform: self.share_platform.clone(),
        })
    }

    #[tracing::instrument(skip(self))]
    fn finish_share(&mut self, outcome: Result<ShareOutcome, Error>) -> Result<ShareOutcome, Error> {
        match &outcome {
            Ok(ShareOutcome::Shared) => self.renderer.set_status(&Status::Shared),
            Ok(ShareOutcome::Copied { url }) => self
                .renderer
                .alert(&format!("Share link copied to clipboard: {}", url)),
            Err(err) => {
                tracing::warn!(%err, "share failed");
                self.renderer.set_status(&Status::ShareFailed {
                    reason: err.message.clone(),
                });
            }
        }

        outcome
    }

    async fn share_location(&mut self) -> Result<ShareOutcome, Error> {
        let job = self.begin_share()?;
        let outcome = job.run().await;

        self.finish_share(outcome)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio_test::block_on;

    use crate::api::{LocationAPI, ShareAPI};
    use crate::engine::testing::{engine, engine_with, StubRouter, StubSharePlatform};
    use crate::entities::{Coordinates, Fix, ShareOutcome};

    #[test]
    fn share_before_fix_alerts() {
        let mut engine = engine();

        let err = block_on(engine.share_location()).unwrap_err();

        assert!(err.is_location_unavailable_error());
        assert_eq!(
            engine.renderer().alerts(),
            ["Your location is not available. Cannot share.".to_string()]
        );
        assert_eq!(engine.renderer().status(), None);
        assert!(!engine.renderer().is_map_initialized());
    }

    #[test]
    fn native_share_sets_status() {
        let mut engine = engine();
        engine.update_location(Fix::new(Coordinates::new(22.28, 70.772)));

        let job = engine.begin_share().unwrap();
        assert_eq!(job.data().url, "https://www.google.com/maps?q=22.28,70.772");

        let outcome = block_on(engine.share_location()).unwrap();

        assert_eq!(outcome, ShareOutcome::Shared);
        assert_eq!(
            engine.renderer().status(),
            Some("Location shared successfully!")
        );
    }

    #[test]
    fn clipboard_fallback_alerts_link() {
        let platform = Arc::new(StubSharePlatform::default());
        let mut engine = engine_with(Arc::new(StubRouter::default()), platform.clone());
        engine.update_location(Fix::new(Coordinates::new(22.28, 70.772)));

        let outcome = block_on(engine.share_location()).unwrap();

        let url = "https://www.google.com/maps?q=22.28,70.772".to_string();
        assert_eq!(outcome, ShareOutcome::Copied { url: url.clone() });
        assert_eq!(*platform.clipboard.lock().unwrap(), vec![url.clone()]);
        assert_eq!(
            engine.renderer().alerts(),
            [format!("Share link copied to clipboard: {}", url)]
        );
    }

    #[test]
    fn failure_surfaces_in_status() {
        let platform = Arc::new(StubSharePlatform {
            native: true,
            fail: true,
            ..Default::default()
        });
        let mut engine = engine_with(Arc::new(StubRouter::default()), platform);
        engine.update_location(Fix::new(Coordinates::new(22.28, 70.772)));

        assert!(block_on(engine.share_location()).is_err());
        assert_eq!(
            engine.renderer().status(),
            Some("Error sharing location: AbortError: Share canceled")
        );
        assert_eq!(engine.current_location(), Some(Coordinates::new(22.28, 70.772)));
    }
}
