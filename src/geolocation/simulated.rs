use futures::stream::{self, BoxStream};
use futures::StreamExt;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use super::{PositionOptions, PositionSource, PositionUpdate};
use crate::{
    entities::{Coordinates, Fix},
    error::{invalid_input_error, Error},
};

/// Receiver noise (standard deviation in meters) with and without high accuracy.
const HIGH_ACCURACY_NOISE: f64 = 3.0;
const LOW_ACCURACY_NOISE: f64 = 30.0;

/// Random walk around a starting point; an endless source.
#[derive(Clone, Debug)]
pub struct SimulatedSource {
    start: Coordinates,
    step: Normal<f64>,
    rng: StdRng,
}

impl SimulatedSource {
    /// `step_meters` is the standard deviation of each north/east step.
    pub fn new(start: Coordinates, step_meters: f64) -> Result<Self, Error> {
        Self::with_rng(start, step_meters, StdRng::from_entropy())
    }

    pub fn with_seed(start: Coordinates, step_meters: f64, seed: u64) -> Result<Self, Error> {
        Self::with_rng(start, step_meters, StdRng::seed_from_u64(seed))
    }

    fn with_rng(start: Coordinates, step_meters: f64, rng: StdRng) -> Result<Self, Error> {
        if !(step_meters.is_finite() && step_meters >= 0.0) {
            return Err(invalid_input_error());
        }

        let step = Normal::new(0.0, step_meters).map_err(|_| invalid_input_error())?;

        Ok(Self { start, step, rng })
    }
}

impl PositionSource for SimulatedSource {
    fn into_stream(self: Box<Self>, options: PositionOptions) -> BoxStream<'static, PositionUpdate> {
        let noise_meters = if options.enable_high_accuracy {
            HIGH_ACCURACY_NOISE
        } else {
            LOW_ACCURACY_NOISE
        };
        let noise = Normal::new(0.0, noise_meters).ok();
        let SimulatedSource { start, step, rng } = *self;

        stream::unfold(
            (start, rng, true),
            move |(position, mut rng, first)| async move {
                if !first {
                    tokio::time::sleep(options.interval).await;
                }

                let position = if first {
                    position
                } else {
                    position.offset(step.sample(&mut rng), step.sample(&mut rng))
                };

                let reported = match noise {
                    Some(noise) => position.offset(noise.sample(&mut rng), noise.sample(&mut rng)),
                    None => position,
                };

                Some((Ok(Fix::new(reported)), (position, rng, false)))
            },
        )
        .boxed()
    }
}

#[test]
fn rejects_invalid_step() {
    let start = Coordinates::new(0.0, 0.0);

    for step in [-1.0, f64::NAN, f64::INFINITY] {
        let err = SimulatedSource::new(start, step).unwrap_err();
        assert_eq!(err, invalid_input_error());
    }

    assert!(SimulatedSource::new(start, 0.0).is_ok());
}

#[tokio::test]
async fn walks_near_start() {
    let start = Coordinates::new(22.2800, 70.7720);
    let source = SimulatedSource::with_seed(start, 5.0, 7).unwrap();
    let options = PositionOptions {
        interval: std::time::Duration::ZERO,
        ..Default::default()
    };

    let updates: Vec<PositionUpdate> = Box::new(source).into_stream(options).take(20).collect().await;

    assert_eq!(updates.len(), 20);
    for update in updates {
        let fix = update.unwrap();
        // 20 steps of sigma 5 m stay well within a kilometer
        assert!(start.distance_to(&fix.coordinates) < 1_000.0);
    }
}
