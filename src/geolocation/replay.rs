use std::path::Path;

use futures::stream::{self, BoxStream};
use futures::StreamExt;
use serde::Deserialize;

use super::{PositionError, PositionOptions, PositionSource, PositionUpdate};
use crate::{
    entities::{Coordinates, Fix},
    error::Error,
};

#[derive(Deserialize)]
#[serde(untagged)]
enum Line {
    Fix(Coordinates),
    Error { error: PositionError },
}

/// Replays a recorded track. Each non-empty line of the file is either
/// `{"latitude": .., "longitude": ..}` or `{"error": "permission_denied"}`;
/// lines starting with `#` are skipped.
#[derive(Clone, Debug, Default)]
pub struct ReplaySource {
    updates: Vec<Result<Coordinates, PositionError>>,
}

impl ReplaySource {
    #[tracing::instrument]
    pub async fn open(path: &Path) -> Result<Self, Error> {
        let text = tokio::fs::read_to_string(path).await?;
        let source = Self::parse(&text)?;

        tracing::info!(updates = source.len(), "track loaded");

        Ok(source)
    }

    pub fn parse(text: &str) -> Result<Self, Error> {
        let mut updates = vec![];

        for line in text.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let update = match serde_json::from_str::<Line>(line)? {
                Line::Fix(coordinates) => Ok(coordinates),
                Line::Error { error } => Err(error),
            };
            updates.push(update);
        }

        Ok(Self { updates })
    }

    pub fn from_updates(updates: Vec<PositionUpdate>) -> Self {
        Self {
            updates: updates
                .into_iter()
                .map(|update| update.map(|fix| fix.coordinates))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.updates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }
}

impl PositionSource for ReplaySource {
    fn into_stream(self: Box<Self>, options: PositionOptions) -> BoxStream<'static, PositionUpdate> {
        stream::iter(self.updates.into_iter().enumerate())
            .then(move |(i, update)| async move {
                if i > 0 {
                    tokio::time::sleep(options.interval).await;
                }

                update.map(Fix::new)
            })
            .boxed()
    }
}

#[test]
fn parses_fixes_and_errors() {
    let text = r#"
        # morning walk
        {"latitude": 22.28, "longitude": 70.772}

        {"error": "permission_denied"}
        {"latitude": 22.2801, "longitude": 70.7721}
    "#;

    let source = ReplaySource::parse(text).unwrap();

    assert_eq!(source.len(), 3);
    assert_eq!(source.updates[0], Ok(Coordinates::new(22.28, 70.772)));
    assert_eq!(source.updates[1], Err(PositionError::PermissionDenied));
}

#[test]
fn rejects_malformed_lines() {
    let err = ReplaySource::parse(r#"{"lat": 1.0}"#).unwrap_err();

    assert_eq!(err.code, 7);
}

#[tokio::test]
async fn replays_in_order() {
    let source = ReplaySource::parse(
        r#"{"latitude": 1.0, "longitude": 2.0}
           {"error": "timeout"}"#,
    )
    .unwrap();
    let options = PositionOptions {
        interval: std::time::Duration::ZERO,
        ..Default::default()
    };

    let updates: Vec<PositionUpdate> = Box::new(source).into_stream(options).collect().await;

    assert_eq!(updates.len(), 2);
    assert_eq!(
        updates[0].as_ref().unwrap().coordinates,
        Coordinates::new(1.0, 2.0)
    );
    assert_eq!(updates[1], Err(PositionError::Timeout));
}

#[test]
fn demo_track_parses() {
    let source = ReplaySource::parse(include_str!("../../demos/rajkot_walk.jsonl")).unwrap();

    assert_eq!(source.len(), 6);
    assert_eq!(source.updates[3], Err(PositionError::Timeout));
}
