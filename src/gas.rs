use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Identifier of a gas, such as `N2` or `CO2`
#[derive(Clone, Hash, PartialEq, Eq, Debug, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Gas(pub String);

impl Gas {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self(identifier.into())
    }

    /// Look the gas up in the built-in reference table
    ///
    /// # Errors
    /// Returns [`Error::UnknownGas`] if the identifier is not tabulated.
    pub fn reference(&self) -> Result<&'static GasReference> {
        REFERENCE_DATA
            .iter()
            .find(|reference| reference.identifier == self.0)
            .ok_or_else(|| Error::UnknownGas(self.0.clone()))
    }
}

impl fmt::Display for Gas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Temperature at which the tabulated reference viscosities were measured
pub const REFERENCE_TEMPERATURE_K: f64 = 298.15;

/// Tabulated properties of a gas, used to resolve molar masses and to validate results
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GasReference {
    pub identifier: &'static str,
    pub name: &'static str,
    /// Molar mass in kg/mol
    pub molar_mass: f64,
    /// Dynamic viscosity at [`REFERENCE_TEMPERATURE_K`] in Pa s
    pub viscosity_ref: f64,
    /// Sutherland constant $C$ in K
    pub sutherland_constant: f64,
}

impl GasReference {
    /// Estimate the viscosity at `temperature` by Sutherland's law
    ///
    /// $$
    ///     \eta(T) = \eta_0 \frac{T_0 + C}{T + C} \left(\frac{T}{T_0}\right)^{3/2}
    /// $$
    ///
    /// This only feeds the comparison against measured values, never the extraction itself.
    pub fn viscosity_at(&self, temperature: f64) -> f64 {
        let t0 = REFERENCE_TEMPERATURE_K;
        let c = self.sutherland_constant;
        self.viscosity_ref * (t0 + c) / (temperature + c) * (temperature / t0).powf(1.5)
    }
}

/// Built-in reference data
pub const REFERENCE_DATA: &[GasReference] = &[
    GasReference {
        identifier: "N2",
        name: "Nitrogen",
        molar_mass: 28.0134e-3,
        viscosity_ref: 17.76e-6,
        sutherland_constant: 111.,
    },
    GasReference {
        identifier: "Ar",
        name: "Argon",
        molar_mass: 39.948e-3,
        viscosity_ref: 22.61e-6,
        sutherland_constant: 144.,
    },
    GasReference {
        identifier: "He",
        name: "Helium",
        molar_mass: 4.0026e-3,
        viscosity_ref: 19.85e-6,
        sutherland_constant: 79.,
    },
    GasReference {
        identifier: "CO2",
        name: "Carbon Dioxide",
        molar_mass: 44.01e-3,
        viscosity_ref: 14.90e-6,
        sutherland_constant: 240.,
    },
];
