/// Errors raised while fitting pressure-decay data or deriving quantities from it
///
/// Every numerical precondition violation invalidates the whole calculation, so none of these
/// carry partial results.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Sample sequences of mismatched length, or too short to fit
    #[error("malformed sample series: {0}")]
    InputShape(String),

    /// The regression is undefined for the supplied abscissae
    #[error("degenerate regression input: {0}")]
    DegenerateInput(String),

    /// The fitted slope of 1/P against t does not correspond to a physical viscosity
    #[error("fitted slope {0:e} must be strictly positive")]
    InvalidSlope(f64),

    #[error("viscosity {0:e} Pa s must be strictly positive")]
    InvalidViscosity(f64),

    #[error("{quantity} must be a positive finite number, got {value:e}")]
    InvalidPhysicalInput { quantity: &'static str, value: f64 },

    /// No molar mass was configured and the gas is missing from the reference table
    #[error("no reference data for gas {0:?}")]
    UnknownGas(String),

    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse samples: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to parse experiment configuration: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Fail with [`Error::InvalidPhysicalInput`] unless `value` is positive and finite
pub(crate) fn require_positive(quantity: &'static str, value: f64) -> Result<f64, Error> {
    if value.is_finite() && value > 0. {
        Ok(value)
    } else {
        Err(Error::InvalidPhysicalInput { quantity, value })
    }
}
