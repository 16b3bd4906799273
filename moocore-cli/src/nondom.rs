use super::helpers::{create_table, read_matrix, GlobalConfiguration, Subcommand};
use anyhow::Result;
use clap::{Parser, ValueHint};
use prettytable::row;
use std::path::PathBuf;
use std::process::ExitCode;

/// Filter a point set down to its non-dominated points.
#[derive(Parser)]
pub struct Opts {
    /// Path to the dataset file.
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,
    /// Treat duplicates of a non-dominated point as non-dominated too.
    #[arg(long)]
    keep_weakly: bool,
}

impl Subcommand for Opts {
    fn run(&self, _: &GlobalConfiguration) -> Result<ExitCode> {
        let data = read_matrix(&self.input)?;
        let mask = moocore::api::is_nondominated(data.view(), self.keep_weakly, None)?;

        let mut table = create_table();
        table.set_titles(row![c->"point", c->"nondominated"]);
        for (i, &b) in mask.iter().enumerate() {
            table.add_row(row![r->i, r->b]);
        }
        table.printstd();

        Ok(ExitCode::SUCCESS)
    }
}
