use serde::{Deserialize, Serialize};

use crate::error::require_positive;
use crate::Result;

/// Dimensions of a capillary viscometer
///
/// A bulb of volume $V$ drains through a capillary of radius $r$ and length $L$. The radius enters
/// the viscosity to the fourth power, so it dominates the error budget of any calibration.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ApparatusGeometry {
    pub radius_m: f64,
    pub length_m: f64,
    pub volume_m3: f64,
}

impl ApparatusGeometry {
    /// The reference viscometer: a 500 mL bulb on a 15 cm capillary of 0.15 mm radius
    pub const REFERENCE: Self = Self {
        radius_m: 1.5e-4,
        length_m: 0.15,
        volume_m3: 500e-6,
    };

    /// Check every dimension is a positive finite length or volume
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidPhysicalInput`] naming the first offending dimension.
    pub fn validate(&self) -> Result<()> {
        require_positive("capillary radius", self.radius_m)?;
        require_positive("capillary length", self.length_m)?;
        require_positive("bulb volume", self.volume_m3)?;
        Ok(())
    }
}

impl Default for ApparatusGeometry {
    fn default() -> Self {
        Self::REFERENCE
    }
}
