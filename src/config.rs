use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::{
    entities::Coordinates,
    error::{invalid_input_error, Error},
    external::osrm::DEFAULT_API_BASE,
};

const DEFAULT_FIX_INTERVAL_MS: u64 = 1000;
/// Standard deviation of each simulated step, in meters.
const SIMULATED_STEP_METERS: f64 = 5.0;

#[derive(Clone, Debug, PartialEq)]
pub enum SourceConfig {
    Replay(PathBuf),
    Simulate { start: Coordinates, step_meters: f64 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub router_api_base: String,
    /// `None` means the device has no geolocation.
    pub source: Option<SourceConfig>,
    pub fix_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            router_api_base: DEFAULT_API_BASE.into(),
            source: None,
            fix_interval: Duration::from_millis(DEFAULT_FIX_INTERVAL_MS),
        }
    }
}

impl Config {
    /// Never fails: unreadable or malformed values are logged and replaced
    /// by their defaults, and a bad source means no geolocation.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| match env::var(key) {
            Ok(value) => Some(value),
            Err(env::VarError::NotPresent) => None,
            Err(err) => {
                tracing::warn!(key, error = %Error::from(err), "ignoring variable");
                None
            }
        })
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let router_api_base =
            lookup("SAFEROUTE_ROUTER_BASE").unwrap_or_else(|| DEFAULT_API_BASE.into());

        let source = match (lookup("SAFEROUTE_FIX_FILE"), lookup("SAFEROUTE_SIMULATE")) {
            (Some(path), _) => Some(SourceConfig::Replay(path.into())),
            (None, Some(start)) => match parse_coordinates(&start) {
                Ok(start) => Some(SourceConfig::Simulate {
                    start,
                    step_meters: SIMULATED_STEP_METERS,
                }),
                Err(err) => {
                    tracing::warn!(value = %start, %err, "invalid SAFEROUTE_SIMULATE, geolocation disabled");
                    None
                }
            },
            (None, None) => None,
        };

        let fix_interval = match lookup("SAFEROUTE_FIX_INTERVAL_MS") {
            Some(ms) => match ms.trim().parse::<u64>() {
                Ok(ms) => Duration::from_millis(ms),
                Err(_) => {
                    tracing::warn!(value = %ms, "invalid SAFEROUTE_FIX_INTERVAL_MS, using default");
                    Duration::from_millis(DEFAULT_FIX_INTERVAL_MS)
                }
            },
            None => Duration::from_millis(DEFAULT_FIX_INTERVAL_MS),
        };

        Self {
            router_api_base,
            source,
            fix_interval,
        }
    }
}

/// Parses `"<lat>,<lng>"`.
pub fn parse_coordinates(value: &str) -> Result<Coordinates, Error> {
    let (latitude, longitude) = value.split_once(',').ok_or_else(invalid_input_error)?;

    let latitude: f64 = latitude.trim().parse().map_err(|_| invalid_input_error())?;
    let longitude: f64 = longitude.trim().parse().map_err(|_| invalid_input_error())?;

    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(invalid_input_error());
    }

    Ok(Coordinates::new(latitude, longitude))
}

#[cfg(test)]
fn lookup_from(vars: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
    move |key| {
        vars.iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.to_string())
    }
}

#[test]
fn defaults_without_variables() {
    let config = Config::from_lookup(lookup_from(&[]));

    assert_eq!(config.router_api_base, DEFAULT_API_BASE);
    assert_eq!(config.source, None);
    assert_eq!(config.fix_interval, Duration::from_millis(1000));
}

#[test]
fn replay_file_wins_over_simulation() {
    let config = Config::from_lookup(lookup_from(&[
        ("SAFEROUTE_FIX_FILE", "track.jsonl"),
        ("SAFEROUTE_SIMULATE", "22.28,70.772"),
        ("SAFEROUTE_FIX_INTERVAL_MS", "250"),
    ]));

    assert_eq!(config.source, Some(SourceConfig::Replay("track.jsonl".into())));
    assert_eq!(config.fix_interval, Duration::from_millis(250));
}

#[test]
fn simulation_start_is_parsed() {
    let config = Config::from_lookup(lookup_from(&[("SAFEROUTE_SIMULATE", " 22.28 , 70.772 ")]));

    assert_eq!(
        config.source,
        Some(SourceConfig::Simulate {
            start: Coordinates::new(22.28, 70.772),
            step_meters: SIMULATED_STEP_METERS,
        })
    );
}

#[test]
fn bad_coordinates_are_invalid_input() {
    assert_eq!(parse_coordinates("22.28").unwrap_err(), invalid_input_error());
    assert_eq!(parse_coordinates("95,10").unwrap_err(), invalid_input_error());
    assert_eq!(parse_coordinates("north,east").unwrap_err(), invalid_input_error());
}

#[test]
fn bad_values_fall_back_instead_of_failing() {
    let config = Config::from_lookup(lookup_from(&[
        ("SAFEROUTE_SIMULATE", "95,10"),
        ("SAFEROUTE_FIX_INTERVAL_MS", "soon"),
    ]));

    assert_eq!(config.source, None);
    assert_eq!(config.fix_interval, Duration::from_millis(1000));
    assert_eq!(config, Config::default());

    let config = Config::from_lookup(lookup_from(&[("SAFEROUTE_SIMULATE", "north,east")]));
    assert_eq!(config.source, None);
}
