use anyhow::{Context, Result};
use ndarray::Array2;
use prettytable::format::{FormatBuilder, LinePosition, LineSeparator};
use prettytable::Table;
use std::path::Path;
use std::process::ExitCode;

/// Shared, process-wide CLI flags (parsed once, passed to every subcommand).
#[derive(clap::Parser)]
pub struct GlobalConfiguration {
    /// Number of digits shown for numerical values.
    #[arg(default_value = "6", long)]
    pub digits: usize,
}

/// Implemented by every `moocore <subcommand>`.
#[enum_dispatch::enum_dispatch]
pub trait Subcommand {
    /// Run the subcommand, returning the process exit code.
    fn run(&self, cfg: &GlobalConfiguration) -> Result<ExitCode>;
}

/// Read a dataset file into one `n x d` matrix per blank-line-separated set.
pub fn read_sets(path: &Path) -> Result<Vec<Array2<f64>>> {
    let dataset = moocore::dataset::read_datasets(path)
        .with_context(|| format!("failed to parse dataset {}", path.display()))?;
    let tagged = dataset.to_tagged_matrix();
    let ncols = dataset.ncols;
    let mut sets = Vec::with_capacity(dataset.set_sizes.len());
    let mut offset = 0;
    for &size in &dataset.set_sizes {
        sets.push(tagged.slice(ndarray::s![offset..offset + size, ..ncols]).to_owned());
        offset += size;
    }
    Ok(sets)
}

/// Read a dataset file as a single matrix, ignoring any blank-line set boundaries.
pub fn read_matrix(path: &Path) -> Result<Array2<f64>> {
    let dataset = moocore::dataset::read_datasets(path)
        .with_context(|| format!("failed to parse dataset {}", path.display()))?;
    let ncols = dataset.ncols;
    Ok(dataset.to_tagged_matrix().slice(ndarray::s![.., ..ncols]).to_owned())
}

/// A `prettytable` with a plain, borderless style used by every subcommand.
#[must_use]
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.set_format(
        FormatBuilder::new()
            .column_separator(' ')
            .separator(LinePosition::Title, LineSeparator::new('-', '+', ' ', ' '))
            .padding(0, 1)
            .build(),
    );
    table
}
