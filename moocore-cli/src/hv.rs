use super::helpers::{create_table, read_matrix, GlobalConfiguration, Subcommand};
use anyhow::Result;
use clap::{Parser, ValueHint};
use prettytable::row;
use std::path::PathBuf;
use std::process::ExitCode;

/// Compute the hypervolume indicator, or per-point contributions, of a point set.
#[derive(Parser)]
pub struct Opts {
    /// Path to the dataset file.
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,
    /// Reference point, e.g. `10,10`.
    #[arg(long, value_delimiter = ',')]
    reference: Vec<f64>,
    /// Print each point's individual hypervolume contribution instead of the total.
    #[arg(long)]
    contributions: bool,
}

impl Subcommand for Opts {
    fn run(&self, cfg: &GlobalConfiguration) -> Result<ExitCode> {
        let data = read_matrix(&self.input)?;

        if self.contributions {
            let contributions = moocore::api::hv_contributions(data.view(), &self.reference, None)?;
            let mut table = create_table();
            table.set_titles(row![c->"point", c->"contribution"]);
            for (i, c) in contributions.iter().enumerate() {
                table.add_row(row![r->i, r->&format!("{:.*e}", cfg.digits, c)]);
            }
            table.printstd();
        } else {
            let hv = moocore::api::hypervolume(data.view(), &self.reference, None)?;
            println!("{:.*e}", cfg.digits, hv);
        }

        Ok(ExitCode::SUCCESS)
    }
}
