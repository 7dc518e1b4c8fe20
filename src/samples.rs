use std::io;
use std::path::Path;

use itertools::Itertools;
use ndarray::{Array1, ArrayView1};
use serde::Deserialize;

use crate::{Error, Result};

/// Time and pressure readings from one pressure-decay run
///
/// Invariants established at construction: both series have the same length, at least two
/// samples are present, every time is finite and every pressure is positive and finite so its
/// reciprocal exists.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleSeries {
    time: Array1<f64>,
    pressure: Array1<f64>,
}

impl SampleSeries {
    /// Pair time readings in seconds with pressure readings in pascals
    ///
    /// # Errors
    /// - [`Error::InputShape`] if the lengths differ or fewer than two samples are given
    /// - [`Error::InvalidPhysicalInput`] for a non-finite time or a non-positive pressure
    pub fn new(time: impl Into<Array1<f64>>, pressure: impl Into<Array1<f64>>) -> Result<Self> {
        let time = time.into();
        let pressure = pressure.into();

        if time.len() != pressure.len() {
            return Err(Error::InputShape(format!(
                "{} time values paired with {} pressure values",
                time.len(),
                pressure.len()
            )));
        }
        if time.len() < 2 {
            return Err(Error::InputShape(format!(
                "at least two samples are required, got {}",
                time.len()
            )));
        }
        if let Some(&value) = time.iter().find(|t| !t.is_finite()) {
            return Err(Error::InvalidPhysicalInput {
                quantity: "time",
                value,
            });
        }
        if let Some(&value) = pressure.iter().find(|p| !(p.is_finite() && **p > 0.)) {
            return Err(Error::InvalidPhysicalInput {
                quantity: "pressure",
                value,
            });
        }
        if time.iter().tuple_windows().any(|(a, b)| b < a) {
            log::warn!("time values are not monotonically non-decreasing");
        }

        Ok(Self { time, pressure })
    }

    /// Read a series from CSV with a header row, time in seconds then pressure in pascals
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, a row fails to parse as two numbers, or the
    /// parsed series violates the invariants checked by [`SampleSeries::new`].
    pub fn from_csv(path: &Path) -> Result<Self> {
        log::info!("reading samples from {}", path.display());
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Read a series from any CSV source, see [`SampleSeries::from_csv`]
    ///
    /// # Errors
    /// As [`SampleSeries::from_csv`].
    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut time = vec![];
        let mut pressure = vec![];
        for result in rdr.deserialize() {
            let record: Row = result?;
            time.push(record.0);
            pressure.push(record.1);
        }
        log::debug!("parsed {} samples", time.len());

        Self::new(time, pressure)
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Always false, a series holds at least two samples
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Sample times in seconds
    pub fn time(&self) -> ArrayView1<'_, f64> {
        self.time.view()
    }

    /// Pressures in pascals
    pub fn pressure(&self) -> ArrayView1<'_, f64> {
        self.pressure.view()
    }

    /// Reciprocal pressures $1/P_i$ in 1/Pa, the ordinate which decays linearly in time
    pub fn reciprocal_pressure(&self) -> Array1<f64> {
        self.pressure.mapv(f64::recip)
    }
}

#[derive(Deserialize)]
struct Row(f64, f64);
