#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
// #![warn(clippy::cargo)]

//! Extract the viscosity of a gas from the pressure decay of a capillary viscometer, and estimate
//! its molecular diameter from kinetic theory.

pub mod analysis;
pub mod apparatus;
pub mod constants;
pub mod diameter;
mod error;
pub mod gas;
pub mod math;
pub mod regression;
pub mod samples;
pub mod synthetic;
pub mod viscosity;

pub use analysis::{analyse, Analysis, Experiment};
pub use error::Error;

pub type Result<T> = ::std::result::Result<T, Error>;
