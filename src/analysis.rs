use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::apparatus::ApparatusGeometry;
use crate::constants::PhysicalConstants;
use crate::diameter::DiameterModel;
use crate::gas::Gas;
use crate::regression::RegressionResult;
use crate::samples::SampleSeries;
use crate::viscosity::calculate_viscosity;
use crate::Result;

/// Conditions of a single viscometer run
///
/// Read from TOML, for example
///
/// ```toml
/// gas = "N2"
/// temperature_k = 298.15
///
/// [apparatus]
/// radius_m = 1.5e-4
/// ```
///
/// Omitted apparatus dimensions and constants take their reference values. A molar mass is only
/// required for gases missing from the reference table.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Experiment {
    pub gas: Gas,
    pub temperature_k: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub molar_mass_kg_per_mol: Option<f64>,
    #[serde(default)]
    pub diameter_model: DiameterModel,
    #[serde(default)]
    pub apparatus: ApparatusGeometry,
    #[serde(default)]
    pub constants: PhysicalConstants,
}

impl Experiment {
    /// A run on the reference apparatus with reference constants
    pub fn new(gas: Gas, temperature_k: f64) -> Self {
        Self {
            gas,
            temperature_k,
            molar_mass_kg_per_mol: None,
            diameter_model: DiameterModel::default(),
            apparatus: ApparatusGeometry::default(),
            constants: PhysicalConstants::default(),
        }
    }

    /// Read the experiment description from a TOML file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not a valid experiment description.
    pub fn from_file(path: &Path) -> Result<Self> {
        log::info!("reading experiment from {}", path.display());
        let contents = fs::read_to_string(path)?;
        let experiment: Self = toml::from_str(&contents)?;
        Ok(experiment)
    }

    /// The configured molar mass, falling back to the reference table
    ///
    /// # Errors
    /// Returns [`crate::Error::UnknownGas`] if neither source provides a value.
    pub fn molar_mass(&self) -> Result<f64> {
        match self.molar_mass_kg_per_mol {
            Some(molar_mass) => Ok(molar_mass),
            None => Ok(self.gas.reference()?.molar_mass),
        }
    }
}

/// Tabulated viscosity at the run temperature and the deviation of the measurement from it
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReferenceComparison {
    pub viscosity_pa_s: f64,
    /// Signed relative error of the measured viscosity
    pub relative_error: f64,
}

/// Outcome of analysing one run
#[derive(Clone, Debug, PartialEq)]
pub struct Analysis {
    pub gas: Gas,
    pub temperature_k: f64,
    pub viscosity_pa_s: f64,
    /// One-sigma uncertainty on `viscosity_pa_s`
    pub viscosity_uncertainty_pa_s: f64,
    pub r_squared: f64,
    pub diameter_m: f64,
    pub diameter_model: DiameterModel,
    pub fit: RegressionResult<f64>,
    /// Present when the gas is tabulated
    pub reference: Option<ReferenceComparison>,
}

/// Run the full pipeline: fit $1/P$ against $t$, convert the slope to a viscosity, then the
/// viscosity to a molecular diameter
///
/// # Errors
/// Propagates the first failure of any stage; no partial result is produced.
pub fn analyse(samples: &SampleSeries, experiment: &Experiment) -> Result<Analysis> {
    let molar_mass = experiment.molar_mass()?;
    let viscosity = calculate_viscosity(samples, &experiment.apparatus)?;
    let diameter_m = experiment.diameter_model.diameter(
        viscosity.viscosity,
        molar_mass,
        experiment.temperature_k,
        &experiment.constants,
    )?;

    let reference = experiment.gas.reference().ok().map(|reference| {
        let viscosity_pa_s = reference.viscosity_at(experiment.temperature_k);
        ReferenceComparison {
            viscosity_pa_s,
            relative_error: (viscosity.viscosity - viscosity_pa_s) / viscosity_pa_s,
        }
    });
    log::info!(
        "{}: viscosity {:e} Pa s, diameter {:e} m",
        experiment.gas,
        viscosity.viscosity,
        diameter_m
    );

    Ok(Analysis {
        gas: experiment.gas.clone(),
        temperature_k: experiment.temperature_k,
        viscosity_pa_s: viscosity.viscosity,
        viscosity_uncertainty_pa_s: viscosity.uncertainty,
        r_squared: viscosity.r_squared,
        diameter_m,
        diameter_model: experiment.diameter_model,
        fit: viscosity.fit,
        reference,
    })
}

impl fmt::Display for Analysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Poiseuille flow analysis: {} at {:.2} K",
            self.gas, self.temperature_k
        )?;
        writeln!(f, "Linear fit R^2:        {:.5}", self.r_squared)?;
        writeln!(
            f,
            "Calculated viscosity:  {:.2} ± {:.2} µPa s",
            self.viscosity_pa_s * 1e6,
            self.viscosity_uncertainty_pa_s * 1e6
        )?;
        if let Some(reference) = &self.reference {
            writeln!(
                f,
                "Reference viscosity:   {:.2} µPa s",
                reference.viscosity_pa_s * 1e6
            )?;
            writeln!(
                f,
                "Error:                 {:.2}%",
                reference.relative_error.abs() * 100.
            )?;
        }
        writeln!(f, "{}", "-".repeat(30))?;
        write!(
            f,
            "Molecular diameter:    {:.3} nm ({:?})",
            self.diameter_m * 1e9,
            self.diameter_model
        )
    }
}

#[cfg(test)]
mod tests {
    use ndarray::Array1;

    use super::{analyse, Experiment};
    use crate::gas::Gas;
    use crate::samples::SampleSeries;
    use crate::viscosity::decay_slope;
    use crate::{Error, Result};

    fn nitrogen_run(experiment: &Experiment) -> Result<SampleSeries> {
        let slope = decay_slope(17.76e-6, &experiment.apparatus)?;
        let time = Array1::linspace(0., 300., 20);
        let pressure = time.mapv(|t| 1. / (1e-5 + slope * t));
        SampleSeries::new(time, pressure)
    }

    #[test]
    fn nitrogen_pipeline_recovers_tabulated_values() -> Result<()> {
        let experiment = Experiment::new(Gas::new("N2"), 298.15);
        let samples = nitrogen_run(&experiment)?;

        let analysis = analyse(&samples, &experiment)?;

        approx::assert_relative_eq!(analysis.viscosity_pa_s, 17.76e-6, max_relative = 1e-9);
        approx::assert_relative_eq!(analysis.r_squared, 1., max_relative = 1e-12);
        approx::assert_relative_eq!(analysis.diameter_m, 3.7064e-10, max_relative = 1e-4);
        let reference = analysis.reference.expect("nitrogen is tabulated");
        assert!(reference.relative_error.abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn untabulated_gases_need_a_molar_mass() -> Result<()> {
        let mut experiment = Experiment::new(Gas::new("Kr"), 298.15);
        let samples = nitrogen_run(&experiment)?;

        assert!(matches!(
            analyse(&samples, &experiment),
            Err(Error::UnknownGas(_))
        ));

        experiment.molar_mass_kg_per_mol = Some(83.798e-3);
        let analysis = analyse(&samples, &experiment)?;
        assert!(analysis.reference.is_none());
        assert!(analysis.diameter_m > 0.);
        Ok(())
    }

    #[test]
    fn report_lists_headline_numbers() -> Result<()> {
        let experiment = Experiment::new(Gas::new("N2"), 298.15);
        let samples = nitrogen_run(&experiment)?;

        let report = analyse(&samples, &experiment)?.to_string();

        assert!(report.contains("N2 at 298.15 K"));
        assert!(report.contains("Calculated viscosity:  17.76"));
        assert!(report.contains("Molecular diameter:    0.371 nm"));
        Ok(())
    }

    #[test]
    fn experiments_are_parsed_with_defaults() {
        let experiment: Experiment = toml::from_str(
            r#"
            gas = "CO2"
            temperature_k = 310.0
            diameter_model = "elementary"

            [apparatus]
            radius_m = 2e-4
            "#,
        )
        .unwrap();

        assert_eq!(experiment.gas, Gas::new("CO2"));
        assert_eq!(experiment.apparatus.radius_m, 2e-4);
        assert_eq!(experiment.apparatus.length_m, 0.15);
        assert_eq!(experiment.molar_mass_kg_per_mol, None);
        assert_eq!(
            experiment.diameter_model,
            crate::diameter::DiameterModel::Elementary
        );
    }
}
