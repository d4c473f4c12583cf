//! Event loop binding platform events to the session's handlers.
//!
//! Only this loop touches the engine. Fixes arrive through a watch channel,
//! button presses through an `async_channel`, and shares run as detached
//! tasks that report back through their own channel.

use std::str::FromStr;

use crate::{
    api::API,
    entities::ShareOutcome,
    error::{invalid_input_error, share_error, Error},
    geolocation::{PositionUpdate, PositionWatch},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    FindSafePlace,
    ShareLocation,
    /// The SOS button.
    OpenSos,
    /// The modal's close control.
    CloseSos,
}

impl FromStr for Command {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "find" => Ok(Self::FindSafePlace),
            "share" => Ok(Self::ShareLocation),
            "sos" => Ok(Self::OpenSos),
            "close" => Ok(Self::CloseSos),
            _ => Err(invalid_input_error()),
        }
    }
}

async fn next_position(positions: &mut Option<PositionWatch>) -> Option<PositionUpdate> {
    let Some(rx) = positions.as_mut() else {
        return std::future::pending().await;
    };

    let changed = rx.changed().await;

    match changed {
        Ok(()) => rx.borrow_and_update().clone(),
        Err(_) => {
            tracing::info!("position updates ended");
            *positions = None;
            None
        }
    }
}

/// Runs the session until the command channel closes and every share in
/// flight has reported back. Returns the api for inspection.
pub async fn run<T>(
    mut api: T,
    mut positions: Option<PositionWatch>,
    commands: async_channel::Receiver<Command>,
) -> T
where
    T: API + Send,
{
    let (share_tx, share_rx) = async_channel::unbounded::<Result<ShareOutcome, Error>>();
    let mut commands_open = true;
    let mut shares_in_flight = 0usize;

    if positions.is_none() {
        api.geolocation_unsupported();
    }

    while commands_open || shares_in_flight > 0 {
        tokio::select! {
            biased;

            update = next_position(&mut positions) => match update {
                Some(Ok(fix)) => api.update_location(fix),
                Some(Err(error)) => api.location_failed(error),
                None => {}
            },

            outcome = share_rx.recv() => {
                if let Ok(outcome) = outcome {
                    shares_in_flight -= 1;
                    if let Ok(outcome) = api.finish_share(outcome) {
                        tracing::info!(?outcome, "share finished");
                    }
                }
            },

            command = commands.recv(), if commands_open => match command {
                Ok(command) => {
                    if handle_command(&mut api, command, &share_tx).await {
                        shares_in_flight += 1;
                    }
                }
                Err(_) => {
                    tracing::info!("command channel closed");
                    commands_open = false;
                }
            },
        }
    }

    api
}

/// Returns whether a share task was started.
#[tracing::instrument(skip(api, share_tx))]
async fn handle_command<T>(
    api: &mut T,
    command: Command,
    share_tx: &async_channel::Sender<Result<ShareOutcome, Error>>,
) -> bool
where
    T: API + Send,
{
    match command {
        Command::FindSafePlace => {
            if let Err(err) = api.find_safe_place().await {
                tracing::warn!(%err, "find safe place aborted");
            }
            false
        }
        Command::ShareLocation => match api.begin_share() {
            Ok(job) => {
                let share_tx = share_tx.clone();
                tokio::spawn(async move {
                    // a panicking share still has to report back, or the
                    // session would wait on it forever
                    let outcome = match tokio::spawn(job.run()).await {
                        Ok(outcome) => outcome,
                        Err(err) => Err(share_error(err)),
                    };
                    let _ = share_tx.send(outcome).await;
                });
                true
            }
            Err(err) => {
                tracing::warn!(%err, "share aborted");
                false
            }
        },
        Command::OpenSos | Command::CloseSos => {
            api.toggle_sos_modal();
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::sync::watch;

    use super::{run, Command};
    use crate::engine::testing::{engine, engine_with, StubRouter, StubSharePlatform};
    use crate::entities::{Coordinates, Fix};
    use crate::geolocation::PositionError;
    use crate::render::Renderer;

    #[test]
    fn parses_commands() {
        assert_eq!("find".parse::<Command>().unwrap(), Command::FindSafePlace);
        assert_eq!(" share\n".parse::<Command>().unwrap(), Command::ShareLocation);
        assert_eq!("sos".parse::<Command>().unwrap(), Command::OpenSos);
        assert_eq!("close".parse::<Command>().unwrap(), Command::CloseSos);
        assert!("help".parse::<Command>().is_err());
    }

    #[tokio::test]
    async fn session_without_geolocation() {
        let (tx, rx) = async_channel::unbounded();
        tx.send(Command::FindSafePlace).await.unwrap();
        tx.send(Command::ShareLocation).await.unwrap();
        drop(tx);

        let engine = run(engine(), None, rx).await;

        let scene = engine.renderer();
        assert_eq!(
            scene.status(),
            Some("Geolocation is not supported by your browser.")
        );
        assert_eq!(scene.alerts().len(), 2);
        assert!(!scene.is_map_initialized());
    }

    #[tokio::test]
    async fn full_session() {
        let (fixes, positions) = watch::channel(None);
        fixes
            .send(Some(Ok(Fix::new(Coordinates::new(22.2800, 70.7720)))))
            .unwrap();

        let (tx, rx) = async_channel::unbounded();
        for command in [
            Command::FindSafePlace,
            Command::FindSafePlace,
            Command::OpenSos,
            Command::ShareLocation,
            Command::CloseSos,
        ] {
            tx.send(command).await.unwrap();
        }
        drop(tx);

        let engine = run(engine(), Some(positions), rx).await;
        drop(fixes);

        let scene = engine.renderer();
        assert_eq!(scene.user_markers().count(), 1);
        assert_eq!(scene.routes().len(), 1);
        assert_eq!(
            scene.routes()[0].destination.name,
            "24x7 Pharmacy (Near Wockhardt)"
        );
        assert!(!scene.is_modal_visible());
        assert_eq!(scene.status(), Some("Location shared successfully!"));
    }

    #[tokio::test]
    async fn failed_share_keeps_session_alive() {
        let (fixes, positions) = watch::channel(None);
        fixes
            .send(Some(Ok(Fix::new(Coordinates::new(22.2850, 70.7705)))))
            .unwrap();
        let platform = Arc::new(StubSharePlatform {
            native: true,
            fail: true,
            ..Default::default()
        });

        let (tx, rx) = async_channel::unbounded();
        tx.send(Command::ShareLocation).await.unwrap();
        drop(tx);

        let engine = run(
            engine_with(Arc::new(StubRouter::default()), platform),
            Some(positions),
            rx,
        )
        .await;
        drop(fixes);

        assert_eq!(
            engine.renderer().status(),
            Some("Error sharing location: AbortError: Share canceled")
        );
    }

    #[tokio::test]
    async fn position_error_is_reported() {
        let (fixes, positions) = watch::channel(None);
        fixes.send(Some(Err(PositionError::PermissionDenied))).unwrap();

        let (tx, rx) = async_channel::unbounded::<Command>();
        drop(tx);

        let engine = run(engine(), Some(positions), rx).await;
        drop(fixes);

        assert!(engine.renderer().routes().is_empty());
        assert_eq!(
            engine.renderer().status(),
            Some("Could not access location. Please enable it.")
        );
    }

    #[tokio::test]
    async fn crashed_share_is_reported_and_session_ends() {
        let (fixes, positions) = watch::channel(None);
        fixes
            .send(Some(Ok(Fix::new(Coordinates::new(22.2850, 70.7705)))))
            .unwrap();
        let platform = Arc::new(StubSharePlatform {
            native: true,
            panic: true,
            ..Default::default()
        });

        let (tx, rx) = async_channel::unbounded();
        tx.send(Command::ShareLocation).await.unwrap();
        drop(tx);

        let session = run(
            engine_with(Arc::new(StubRouter::default()), platform),
            Some(positions),
            rx,
        );
        let engine = tokio::time::timeout(std::time::Duration::from_secs(5), session)
            .await
            .expect("session waited on a crashed share");
        drop(fixes);

        let status = engine.renderer().status().unwrap();
        assert!(status.starts_with("Error sharing location:"), "{}", status);
    }
}
