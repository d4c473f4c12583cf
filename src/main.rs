use std::sync::Arc;

use saferoute::app::{self, Command};
use saferoute::config::{Config, SourceConfig};
use saferoute::engine::Engine;
use saferoute::error::Error;
use saferoute::external::{osrm::OsrmRouter, share::ConsoleSharePlatform};
use saferoute::geolocation::{
    watch_position, PositionOptions, PositionSource, PositionWatch, ReplaySource, SimulatedSource,
};
use saferoute::places;
use saferoute::render::SceneRenderer;
use tokio::io::{AsyncBufReadExt, BufReader};

async fn start_geolocation(config: &Config) -> Result<Option<PositionWatch>, Error> {
    let source: Box<dyn PositionSource> = match &config.source {
        Some(SourceConfig::Replay(path)) => Box::new(ReplaySource::open(path).await?),
        Some(SourceConfig::Simulate { start, step_meters }) => {
            Box::new(SimulatedSource::new(*start, *step_meters)?)
        }
        None => return Ok(None),
    };

    let options = PositionOptions {
        enable_high_accuracy: true,
        interval: config.fix_interval,
    };

    Ok(Some(watch_position(source, options)))
}

async fn read_commands(tx: async_channel::Sender<Command>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => {
                tracing::error!(%err, "stdin closed");
                break;
            }
        };

        if line.trim() == "quit" {
            break;
        }

        match line.parse::<Command>() {
            Ok(command) => {
                if tx.send(command).await.is_err() {
                    break;
                }
            }
            Err(_) => tracing::warn!(input = %line.trim(), "expected find, share, sos, close or quit"),
        }
    }
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::from_env();

    let positions = match start_geolocation(&config).await {
        Ok(positions) => positions,
        Err(err) => {
            tracing::error!(%err, "could not start geolocation");
            None
        }
    };

    let engine = Engine::new(
        SceneRenderer::new(),
        Arc::new(OsrmRouter::new(config.router_api_base.clone())),
        Arc::new(ConsoleSharePlatform),
        places::rajkot(),
    );

    let (tx, rx) = async_channel::unbounded();
    tokio::spawn(read_commands(tx));

    app::run(engine, positions, rx).await;
}
