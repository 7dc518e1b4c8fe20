//! # viscometry
//!
//! Analyse pressure-decay runs from a capillary viscometer.
//!
//! ```bash
//! # Simulate a noisy nitrogen run and analyse it
//! viscometry simulate --gas N2 --noise 0.01
//!
//! # Analyse a recorded run
//! viscometry analyse experiment.toml samples.csv
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use ndarray_rand::rand::{thread_rng, Rng, SeedableRng};
use rand_isaac::Isaac64Rng;

use viscometry::diameter::DiameterModel;
use viscometry::gas::Gas;
use viscometry::samples::SampleSeries;
use viscometry::synthetic::{self, SyntheticConfig};
use viscometry::{analyse, Experiment};

/// Gas viscosity and molecular diameter from capillary pressure decay
#[derive(Parser)]
#[command(name = "viscometry")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a run at the gas's reference viscosity and analyse it
    Simulate {
        /// Tabulated gas identifier
        #[arg(short, long, default_value = "N2")]
        gas: String,

        /// Absolute temperature in K
        #[arg(short, long, default_value_t = 298.15)]
        temperature: f64,

        /// Noise on 1/P as a fraction of its mean
        #[arg(short, long, default_value_t = 0.01)]
        noise: f64,

        /// Number of samples in the run
        #[arg(short, long, default_value_t = 20)]
        samples: usize,

        /// Run length in seconds
        #[arg(short, long, default_value_t = 300.)]
        duration: f64,

        /// Seed for the noise, drawn at random when omitted
        #[arg(long)]
        seed: Option<u64>,

        #[arg(short, long, value_enum, default_value_t = Model::HardSphere)]
        model: Model,
    },

    /// Analyse a recorded run
    Analyse {
        /// Experiment description (TOML)
        #[arg(value_name = "EXPERIMENT")]
        experiment: PathBuf,

        /// Time and pressure samples (CSV with header)
        #[arg(value_name = "SAMPLES")]
        samples: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Model {
    HardSphere,
    Elementary,
}

impl From<Model> for DiameterModel {
    fn from(model: Model) -> Self {
        match model {
            Model::HardSphere => Self::HardSphere,
            Model::Elementary => Self::Elementary,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Simulate {
            gas,
            temperature,
            noise,
            samples,
            duration,
            seed,
            model,
        } => run_simulate(gas, temperature, noise, samples, duration, seed, model),
        Commands::Analyse {
            experiment,
            samples,
        } => run_analyse(&experiment, &samples),
    }
}

fn run_simulate(
    gas: String,
    temperature: f64,
    noise: f64,
    num_samples: usize,
    duration: f64,
    seed: Option<u64>,
    model: Model,
) -> Result<()> {
    let gas = Gas(gas);
    let reference = gas.reference()?;
    let mut experiment = Experiment::new(gas, temperature);
    experiment.diameter_model = model.into();

    let seed = seed.unwrap_or_else(|| thread_rng().gen());
    info!("simulating {} with seed {seed}", reference.name);
    let mut rng = Isaac64Rng::seed_from_u64(seed);

    let config = SyntheticConfig {
        duration_s: duration,
        num_samples,
        noise_fraction: noise,
        ..SyntheticConfig::new(reference.viscosity_at(temperature))
    };
    let run = synthetic::generate(&config, &experiment.apparatus, &mut rng)
        .context("Failed to simulate run")?;

    let analysis = analyse(&run.samples, &experiment).context("Failed to analyse run")?;
    println!("{analysis}");
    Ok(())
}

fn run_analyse(experiment: &Path, samples: &Path) -> Result<()> {
    let experiment = Experiment::from_file(experiment)
        .with_context(|| format!("Failed to load experiment {}", experiment.display()))?;
    let samples = SampleSeries::from_csv(samples)
        .with_context(|| format!("Failed to load samples {}", samples.display()))?;

    let analysis = analyse(&samples, &experiment).context("Failed to analyse run")?;
    println!("{analysis}");
    Ok(())
}
