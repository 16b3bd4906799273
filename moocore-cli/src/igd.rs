use super::helpers::{read_matrix, GlobalConfiguration, Subcommand};
use anyhow::Result;
use clap::{Parser, ValueHint};
use std::path::PathBuf;
use std::process::ExitCode;

/// Compute the (inverted generational distance) IGD or IGD+ indicator against a reference set.
#[derive(Parser)]
pub struct Opts {
    /// Path to the approximation set.
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,
    /// Path to the reference set.
    #[arg(value_hint = ValueHint::FilePath)]
    reference: PathBuf,
    /// Use the Pareto-compliant IGD+ distance instead of plain IGD.
    #[arg(long)]
    plus: bool,
}

impl Subcommand for Opts {
    fn run(&self, cfg: &GlobalConfiguration) -> Result<ExitCode> {
        let x = read_matrix(&self.input)?;
        let r = read_matrix(&self.reference)?;

        let value = if self.plus {
            moocore::api::igd_plus(x.view(), r.view(), None)?
        } else {
            moocore::api::igd(x.view(), r.view(), None)?
        };
        println!("{:.*e}", cfg.digits, value);

        Ok(ExitCode::SUCCESS)
    }
}
