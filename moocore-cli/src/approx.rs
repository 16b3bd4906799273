use super::helpers::{read_matrix, GlobalConfiguration, Subcommand};
use anyhow::Result;
use clap::{Parser, ValueHint};
use std::path::PathBuf;
use std::process::ExitCode;

/// Which deterministic hypervolume approximation estimator to use.
#[derive(Clone, Copy, clap::ValueEnum)]
pub enum Method {
    /// Monte-Carlo (`DZ2019-MC`): directions drawn from `|N(0,1)^d|`.
    Mc,
    /// Quasi-Monte-Carlo (`DZ2019-HW`): directions from a Halton-Weyl sequence.
    Hw,
}

/// Approximate the hypervolume indicator via Monte-Carlo or quasi-Monte-Carlo sampling.
#[derive(Parser)]
pub struct Opts {
    /// Path to the dataset file.
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,
    /// Reference point, e.g. `10,10`.
    #[arg(long, value_delimiter = ',')]
    reference: Vec<f64>,
    /// Estimator to use.
    #[arg(long, value_enum, default_value_t = Method::Hw)]
    method: Method,
    /// Number of sample directions.
    #[arg(long, default_value_t = 100_000)]
    nsamples: usize,
    /// RNG seed, only used by `--method mc`.
    #[arg(long, default_value_t = 0)]
    seed: u32,
}

impl Subcommand for Opts {
    fn run(&self, cfg: &GlobalConfiguration) -> Result<ExitCode> {
        let data = read_matrix(&self.input)?;
        let value = match self.method {
            Method::Mc => moocore::api::hv_approx_mc(data.view(), &self.reference, self.nsamples, self.seed, None)?,
            Method::Hw => moocore::api::hv_approx_hw(data.view(), &self.reference, self.nsamples, None)?,
        };
        println!("{:.*e}", cfg.digits, value);

        Ok(ExitCode::SUCCESS)
    }
}
