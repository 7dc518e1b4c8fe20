use serde::{Deserialize, Serialize};

/// Physical constants used by the kinetic theory formulae
///
/// Defaults are the exact SI values fixed by the 2019 redefinition (CODATA 2018). They can be
/// overridden in an experiment file, which is useful when comparing against tables computed with
/// older constants.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PhysicalConstants {
    /// Molar gas constant $R$ in J/(mol K)
    pub gas_constant: f64,
    /// Avogadro constant $N_A$ in 1/mol
    pub avogadro: f64,
    /// Boltzmann constant $k_B$ in J/K
    pub boltzmann: f64,
}

impl PhysicalConstants {
    pub const CODATA_2018: Self = Self {
        gas_constant: 8.314_462_618_153_24,
        avogadro: 6.022_140_76e23,
        boltzmann: 1.380_649e-23,
    };
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self::CODATA_2018
    }
}
