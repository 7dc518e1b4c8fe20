use std::f64::consts::PI;

use crate::apparatus::ApparatusGeometry;
use crate::regression::{linear_regression, RegressionResult};
use crate::samples::SampleSeries;
use crate::{Error, Result};

/// Below this coefficient of determination a decay run is flagged as a poor fit
const POOR_FIT_R_SQUARED: f64 = 0.99;

/// Viscosity extracted from a pressure-decay run
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViscosityResult {
    /// Dynamic viscosity in Pa s
    pub viscosity: f64,
    /// One-sigma uncertainty on `viscosity` propagated from the slope standard error
    pub uncertainty: f64,
    /// Coefficient of determination of the $1/P$ against $t$ fit
    pub r_squared: f64,
    /// The underlying fit
    pub fit: RegressionResult<f64>,
}

/// Extract the viscosity of the gas draining through the capillary
///
/// For laminar Poiseuille flow out of the bulb the reciprocal pressure rises linearly in time
///
/// $$
///     \frac{1}{P} = \frac{1}{P_0} + \frac{\pi r^4}{16 \eta L V} t,
/// $$
///
/// so a least squares fit of $1/P_i$ against $t_i$ yields the slope $m$, from which
/// [`viscosity_from_slope`] recovers $\eta$.
///
/// # Errors
/// - [`Error::InvalidPhysicalInput`] if the geometry is not positive
/// - [`Error::DegenerateInput`] if every sample was taken at the same time
/// - [`Error::InvalidSlope`] if the reciprocal pressure does not rise
pub fn calculate_viscosity(
    samples: &SampleSeries,
    geometry: &ApparatusGeometry,
) -> Result<ViscosityResult> {
    let reciprocal_pressure = samples.reciprocal_pressure();
    let fit = linear_regression(samples.time(), reciprocal_pressure.view())?;
    log::debug!(
        "1/P against t: slope {:e} 1/(Pa s), intercept {:e} 1/Pa, r^2 {:.6}",
        fit.slope,
        fit.intercept,
        fit.r_squared
    );

    let viscosity = viscosity_from_slope(fit.slope, geometry)?;
    if fit.r_squared < POOR_FIT_R_SQUARED {
        log::warn!(
            "decay is poorly described by Poiseuille flow, r^2 = {:.4}",
            fit.r_squared
        );
    }

    Ok(ViscosityResult {
        viscosity,
        uncertainty: viscosity * fit.stderr / fit.slope,
        r_squared: fit.r_squared,
        fit,
    })
}

/// Map the slope of $1/P$ against $t$ to a dynamic viscosity
///
/// $$
///     \eta = \frac{\pi r^4}{16 m L V}
/// $$
///
/// # Errors
/// - [`Error::InvalidSlope`] unless `slope` is positive and finite, and small enough in magnitude
///   to leave the viscosity finite. A falling or flat reciprocal pressure would give a negative or
///   infinite viscosity, which has no meaning in this model.
/// - [`Error::InvalidPhysicalInput`] if the geometry is not positive
pub fn viscosity_from_slope(slope: f64, geometry: &ApparatusGeometry) -> Result<f64> {
    geometry.validate()?;
    if !(slope.is_finite() && slope > 0.) {
        return Err(Error::InvalidSlope(slope));
    }
    let viscosity = poiseuille_factor(geometry) / (slope * geometry.length_m * geometry.volume_m3);
    if !viscosity.is_finite() {
        return Err(Error::InvalidSlope(slope));
    }
    Ok(viscosity)
}

/// Slope of $1/P$ against $t$ expected for a gas of the given viscosity, the inverse of
/// [`viscosity_from_slope`]
///
/// # Errors
/// - [`Error::InvalidViscosity`] unless `viscosity` is positive and finite, and large enough to
///   leave the slope finite
/// - [`Error::InvalidPhysicalInput`] if the geometry is not positive
pub fn decay_slope(viscosity: f64, geometry: &ApparatusGeometry) -> Result<f64> {
    geometry.validate()?;
    if !(viscosity.is_finite() && viscosity > 0.) {
        return Err(Error::InvalidViscosity(viscosity));
    }
    let slope = poiseuille_factor(geometry) / (viscosity * geometry.length_m * geometry.volume_m3);
    if !slope.is_finite() {
        return Err(Error::InvalidViscosity(viscosity));
    }
    Ok(slope)
}

/// $\pi r^4 / 16$
fn poiseuille_factor(geometry: &ApparatusGeometry) -> f64 {
    PI * geometry.radius_m.powi(4) / 16.
}

#[cfg(test)]
mod tests {
    use ndarray::Array1;

    use super::{calculate_viscosity, decay_slope, viscosity_from_slope};
    use crate::apparatus::ApparatusGeometry;
    use crate::samples::SampleSeries;
    use crate::{Error, Result};

    const NITROGEN_VISCOSITY: f64 = 17.76e-6;

    /// Noiseless decay from 1 bar for a gas of the given viscosity
    fn ideal_run(viscosity: f64, geometry: &ApparatusGeometry) -> Result<SampleSeries> {
        let slope = decay_slope(viscosity, geometry)?;
        let time = Array1::linspace(0., 300., 20);
        let pressure = time.mapv(|t| 1. / (1e-5 + slope * t));
        SampleSeries::new(time, pressure)
    }

    #[test]
    fn slope_maps_to_tabulated_viscosity() -> Result<()> {
        // pi (1.5e-4)^4 / (16 * 17.76e-6 * 0.15 * 500e-6)
        let slope = 7.462_609_238_362_576e-8;
        let viscosity = viscosity_from_slope(slope, &ApparatusGeometry::REFERENCE)?;
        approx::assert_relative_eq!(viscosity, NITROGEN_VISCOSITY, max_relative = 1e-12);
        Ok(())
    }

    #[test]
    fn doubling_radius_scales_viscosity_sixteenfold() -> Result<()> {
        let slope = 3.2e-8;
        let narrow = ApparatusGeometry::REFERENCE;
        let wide = ApparatusGeometry {
            radius_m: 2. * narrow.radius_m,
            ..narrow
        };

        let ratio = viscosity_from_slope(slope, &wide)? / viscosity_from_slope(slope, &narrow)?;

        approx::assert_relative_eq!(ratio, 16., max_relative = 1e-12);
        Ok(())
    }

    #[test]
    fn doubling_radius_scales_fitted_viscosity_sixteenfold() -> Result<()> {
        let narrow = ApparatusGeometry::REFERENCE;
        let wide = ApparatusGeometry {
            radius_m: 2. * narrow.radius_m,
            ..narrow
        };
        let samples = ideal_run(NITROGEN_VISCOSITY, &narrow)?;

        let ratio = calculate_viscosity(&samples, &wide)?.viscosity
            / calculate_viscosity(&samples, &narrow)?.viscosity;

        approx::assert_relative_eq!(ratio, 16., max_relative = 1e-12);
        Ok(())
    }

    #[test]
    fn noiseless_run_recovers_viscosity() -> Result<()> {
        let geometry = ApparatusGeometry::REFERENCE;
        for viscosity in [NITROGEN_VISCOSITY, 8.9e-6, 2.261e-5, 1e-3] {
            let samples = ideal_run(viscosity, &geometry)?;

            let result = calculate_viscosity(&samples, &geometry)?;

            approx::assert_relative_eq!(result.viscosity, viscosity, max_relative = 1e-9);
            approx::assert_relative_eq!(result.r_squared, 1., max_relative = 1e-12);
            assert!(result.uncertainty < 1e-6 * viscosity);
        }
        Ok(())
    }

    #[test]
    fn constant_pressure_has_invalid_slope() -> Result<()> {
        let time: Array1<f64> = (0..27u32).map(|i| 0.7 * f64::from(i)).collect();
        let samples = SampleSeries::new(time, vec![1e5; 27])?;

        let result = calculate_viscosity(&samples, &ApparatusGeometry::REFERENCE);

        assert!(matches!(result, Err(Error::InvalidSlope(slope)) if slope == 0.));
        Ok(())
    }

    #[test]
    fn constant_pressure_has_invalid_slope_at_any_level() -> Result<()> {
        for pressure in [1e5, 9.87e4, 101_325., 3e4, 7.1e4] {
            for num_samples in 2u32..30 {
                for step in [0.5, 0.7, 1., 2.5, 10.] {
                    let time: Array1<f64> = (0..num_samples).map(|i| step * f64::from(i)).collect();
                    let samples = SampleSeries::new(time, vec![pressure; num_samples as usize])?;

                    let result = calculate_viscosity(&samples, &ApparatusGeometry::REFERENCE);

                    assert!(
                        matches!(result, Err(Error::InvalidSlope(slope)) if slope == 0.),
                        "{pressure} Pa over {num_samples} samples every {step} s gave {result:?}"
                    );
                }
            }
        }
        Ok(())
    }

    #[test]
    fn subnormal_slope_is_rejected() {
        for slope in [f64::from_bits(1), 1e-321] {
            assert!(matches!(
                viscosity_from_slope(slope, &ApparatusGeometry::REFERENCE),
                Err(Error::InvalidSlope(rejected)) if rejected == slope
            ));
        }
    }

    #[test]
    fn subnormal_viscosity_has_no_decay_slope() {
        assert!(matches!(
            decay_slope(f64::from_bits(1), &ApparatusGeometry::REFERENCE),
            Err(Error::InvalidViscosity(_))
        ));
    }

    #[test]
    fn rising_pressure_has_invalid_slope() -> Result<()> {
        let samples = SampleSeries::new(vec![0., 10., 20.], vec![1e5, 1.1e5, 1.2e5])?;

        let result = calculate_viscosity(&samples, &ApparatusGeometry::REFERENCE);

        assert!(matches!(result, Err(Error::InvalidSlope(slope)) if slope < 0.));
        Ok(())
    }

    #[test]
    fn simultaneous_samples_are_degenerate() -> Result<()> {
        let samples = SampleSeries::new(vec![5., 5., 5.], vec![1e5, 9e4, 8e4])?;

        let result = calculate_viscosity(&samples, &ApparatusGeometry::REFERENCE);

        assert!(matches!(result, Err(Error::DegenerateInput(_))));
        Ok(())
    }

    #[test]
    fn invalid_geometry_is_rejected() {
        let geometry = ApparatusGeometry {
            length_m: 0.,
            ..ApparatusGeometry::REFERENCE
        };
        assert!(matches!(
            viscosity_from_slope(1e-8, &geometry),
            Err(Error::InvalidPhysicalInput { .. })
        ));
    }

    #[test]
    fn non_positive_viscosity_has_no_decay_slope() {
        assert!(matches!(
            decay_slope(-1e-5, &ApparatusGeometry::REFERENCE),
            Err(Error::InvalidViscosity(_))
        ));
    }
}
