use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::constants::PhysicalConstants;
use crate::error::require_positive;
use crate::{Error, Result};

/// Kinetic theory model relating viscosity to molecular size
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiameterModel {
    /// First-order Chapman-Enskog result for rigid spheres
    ///
    /// $$
    ///     \eta = \frac{5}{16} \sqrt{\frac{M R T}{\pi}} \frac{1}{N_A d^2}
    /// $$
    #[default]
    HardSphere,
    /// Elementary mean free path estimate
    ///
    /// $$
    ///     \eta = \frac{2}{3 \pi^{3/2}} \frac{\sqrt{m k_B T}}{d^2}, \qquad m = M / N_A
    /// $$
    ///
    /// It gives diameters roughly 20% smaller than the hard sphere model.
    Elementary,
}

impl DiameterModel {
    /// Invert the model for the molecular diameter in metres
    ///
    /// `viscosity` is in Pa s, `molar_mass` in kg/mol and `temperature` in K.
    ///
    /// # Errors
    /// - [`Error::InvalidViscosity`] unless `viscosity` is positive and finite
    /// - [`Error::InvalidPhysicalInput`] unless `molar_mass` and `temperature` are positive and
    ///   finite
    pub fn diameter(
        self,
        viscosity: f64,
        molar_mass: f64,
        temperature: f64,
        constants: &PhysicalConstants,
    ) -> Result<f64> {
        if !(viscosity.is_finite() && viscosity > 0.) {
            return Err(Error::InvalidViscosity(viscosity));
        }
        let molar_mass = require_positive("molar mass", molar_mass)?;
        let temperature = require_positive("temperature", temperature)?;

        let d_squared = match self {
            Self::HardSphere => {
                let thermal = (molar_mass * constants.gas_constant * temperature / PI).sqrt();
                5. / 16. * thermal / (constants.avogadro * viscosity)
            }
            Self::Elementary => {
                let molecular_mass = molar_mass / constants.avogadro;
                let thermal = (molecular_mass * constants.boltzmann * temperature).sqrt();
                2. / (3. * PI.powf(1.5)) * thermal / viscosity
            }
        };

        Ok(d_squared.sqrt())
    }
}

/// Molecular diameter in metres from the hard sphere model, see [`DiameterModel::HardSphere`]
///
/// # Errors
/// As [`DiameterModel::diameter`].
pub fn molecular_diameter(
    viscosity: f64,
    molar_mass: f64,
    temperature: f64,
    constants: &PhysicalConstants,
) -> Result<f64> {
    DiameterModel::HardSphere.diameter(viscosity, molar_mass, temperature, constants)
}
