use super::helpers::{create_table, read_matrix, GlobalConfiguration, Subcommand};
use anyhow::Result;
use clap::{Parser, ValueHint};
use prettytable::row;
use std::path::PathBuf;
use std::process::ExitCode;

/// Assign each point its Pareto rank (0 = first front).
#[derive(Parser)]
pub struct Opts {
    /// Path to the dataset file.
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,
}

impl Subcommand for Opts {
    fn run(&self, _: &GlobalConfiguration) -> Result<ExitCode> {
        let data = read_matrix(&self.input)?;
        let rank = moocore::api::pareto_rank(data.view(), None)?;

        let mut table = create_table();
        table.set_titles(row![c->"point", c->"rank"]);
        for (i, r) in rank.iter().enumerate() {
            table.add_row(row![r->i, r->r]);
        }
        table.printstd();

        Ok(ExitCode::SUCCESS)
    }
}
