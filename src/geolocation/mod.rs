//! Position sources and the continuous watch over them.
//!
//! A source is any stream of [`PositionUpdate`]s. [`watch_position`] pumps it
//! into a `tokio::sync::watch` channel, so a slow consumer only ever sees the
//! latest update and never a backlog.

mod replay;
mod simulated;

pub use replay::ReplaySource;
pub use simulated::SimulatedSource;

use std::fmt;
use std::time::Duration;

use futures::stream::BoxStream;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::entities::Fix;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionError {
    PermissionDenied,
    PositionUnavailable,
    Timeout,
}

impl fmt::Display for PositionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PermissionDenied => f.write_str("permission denied"),
            Self::PositionUnavailable => f.write_str("position unavailable"),
            Self::Timeout => f.write_str("timeout"),
        }
    }
}

pub type PositionUpdate = Result<Fix, PositionError>;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositionOptions {
    pub enable_high_accuracy: bool,
    /// Delay between consecutive updates of a source.
    pub interval: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            enable_high_accuracy: true,
            interval: Duration::from_secs(1),
        }
    }
}

pub trait PositionSource: Send {
    fn into_stream(self: Box<Self>, options: PositionOptions) -> BoxStream<'static, PositionUpdate>;
}

pub type PositionWatch = watch::Receiver<Option<PositionUpdate>>;

/// Starts delivering updates from `source` for as long as the returned
/// receiver is alive. The receiver reports closed once the source runs dry.
#[tracing::instrument(skip(source))]
pub fn watch_position(source: Box<dyn PositionSource>, options: PositionOptions) -> PositionWatch {
    let (tx, rx) = watch::channel(None);
    let mut updates = source.into_stream(options);

    tokio::spawn(async move {
        while let Some(update) = updates.next().await {
            if tx.send(Some(update)).is_err() {
                tracing::debug!("position watch dropped");
                return;
            }
        }

        tracing::info!("position source exhausted");
    });

    rx
}

#[tokio::test]
async fn watch_keeps_latest_update() {
    use crate::entities::Coordinates;

    let source = ReplaySource::from_updates(vec![
        Ok(Fix::new(Coordinates::new(1.0, 1.0))),
        Err(PositionError::Timeout),
        Ok(Fix::new(Coordinates::new(3.0, 3.0))),
    ]);
    let options = PositionOptions {
        interval: Duration::ZERO,
        ..Default::default()
    };

    let mut rx = watch_position(Box::new(source), options);

    let mut last = None;
    while rx.changed().await.is_ok() {
        last = rx.borrow_and_update().clone();
    }

    let fix = last.unwrap().unwrap();
    assert_eq!(fix.coordinates, Coordinates::new(3.0, 3.0));
}
