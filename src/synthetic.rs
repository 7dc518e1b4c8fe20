use ndarray::{Array, Array1};
use ndarray_rand::rand::Rng;
use ndarray_rand::rand_distr::Normal;
use ndarray_rand::RandomExt;

use crate::apparatus::ApparatusGeometry;
use crate::error::require_positive;
use crate::math::mean;
use crate::samples::SampleSeries;
use crate::viscosity::decay_slope;
use crate::{Error, Result};

/// Parameters of a simulated pressure-decay run
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SyntheticConfig {
    /// Viscosity of the simulated gas in Pa s
    pub viscosity: f64,
    /// Bulb pressure at $t = 0$ in Pa
    pub initial_pressure: f64,
    pub duration_s: f64,
    pub num_samples: usize,
    /// Standard deviation of the noise on $1/P$ as a fraction of its mean
    pub noise_fraction: f64,
}

impl SyntheticConfig {
    /// A five minute run from 1 bar sampled twenty times with 1% noise
    pub const fn new(viscosity: f64) -> Self {
        Self {
            viscosity,
            initial_pressure: 1e5,
            duration_s: 300.,
            num_samples: 20,
            noise_fraction: 0.01,
        }
    }
}

/// A simulated run alongside the noiseless curve it was drawn from
#[derive(Clone, Debug)]
pub struct SyntheticRun {
    pub samples: SampleSeries,
    /// Theoretical $1/P$ at each sample time
    pub theoretical_reciprocal_pressure: Array1<f64>,
}

/// Simulate a run by adding Gaussian noise to the ideal reciprocal pressure decay
///
/// # Errors
/// Returns an error if the configuration is not physical, or if the noise drives a reciprocal
/// pressure non-positive.
pub fn generate<R: Rng>(
    config: &SyntheticConfig,
    geometry: &ApparatusGeometry,
    rng: &mut R,
) -> Result<SyntheticRun> {
    let slope = decay_slope(config.viscosity, geometry)?;
    let initial_pressure = require_positive("initial pressure", config.initial_pressure)?;
    let duration = require_positive("duration", config.duration_s)?;
    if !(config.noise_fraction.is_finite() && config.noise_fraction >= 0.) {
        return Err(Error::InvalidPhysicalInput {
            quantity: "noise fraction",
            value: config.noise_fraction,
        });
    }

    let time = Array1::linspace(0., duration, config.num_samples);
    let theoretical = time.mapv(|t| slope.mul_add(t, initial_pressure.recip()));

    let measured = match mean(theoretical.view()) {
        Some(level) if config.noise_fraction > 0. => {
            let noise = Normal::new(0., config.noise_fraction * level).map_err(|_| {
                Error::InvalidPhysicalInput {
                    quantity: "noise fraction",
                    value: config.noise_fraction,
                }
            })?;
            &theoretical + &Array::random_using(config.num_samples, noise, rng)
        }
        _ => theoretical.clone(),
    };
    log::debug!(
        "simulated {} samples with slope {slope:e} 1/(Pa s)",
        config.num_samples
    );

    let samples = SampleSeries::new(time, measured.mapv(f64::recip))?;

    Ok(SyntheticRun {
        samples,
        theoretical_reciprocal_pressure: theoretical,
    })
}
