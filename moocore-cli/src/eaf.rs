use super::helpers::{create_table, read_sets, GlobalConfiguration, Subcommand};
use anyhow::{bail, Result};
use clap::{Parser, ValueHint};
use prettytable::row;
use std::path::PathBuf;
use std::process::ExitCode;

/// Compute the empirical attainment function of several point sets, separated by blank lines.
#[derive(Parser)]
pub struct Opts {
    /// Path to the dataset file (blank-line-separated sets).
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,
    /// Percentiles to compute, e.g. `25,50,100`; defaults to every `i*100/k`.
    #[arg(long, value_delimiter = ',')]
    percentiles: Vec<f64>,
}

impl Subcommand for Opts {
    fn run(&self, cfg: &GlobalConfiguration) -> Result<ExitCode> {
        let sets = read_sets(&self.input)?;
        if sets.len() < 2 {
            bail!("eaf requires at least two blank-line-separated sets, found {}", sets.len());
        }
        let views: Vec<_> = sets.iter().map(|s| s.view()).collect();
        let percentiles = (!self.percentiles.is_empty()).then_some(self.percentiles.as_slice());
        let levels = moocore::api::eaf(&views, percentiles)?;

        for level in levels {
            let mut table = create_table();
            table.set_titles(row![c->format!("level {}%", level.percentile)]);
            for row in level.points.rows() {
                let coords: Vec<String> = row.iter().map(|v| format!("{:.*e}", cfg.digits, v)).collect();
                table.add_row(row![r->coords.join(" ")]);
            }
            table.printstd();
            println!();
        }

        Ok(ExitCode::SUCCESS)
    }
}
