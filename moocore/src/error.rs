//! Error types returned by the public API surface.

use thiserror::Error;

/// Error returned while parsing a dataset text file.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The input contained no data rows at all.
    #[error("input is empty")]
    FileEmpty,
    /// A data row did not have the same number of columns as the first row
    /// of the first set.
    #[error("row {row} has {found} columns, expected {expected}")]
    WrongInitialDim {
        /// Zero-based row index (within the whole file) that triggered the error.
        row: usize,
        /// Number of columns found on that row.
        found: usize,
        /// Number of columns fixed by the first data row.
        expected: usize,
    },
    /// The requested file could not be opened.
    #[error("cannot open file: {0}")]
    FileOpen(String),
    /// A token could not be parsed as an `f64`.
    #[error("cannot convert token {token:?} on row {row} to a number")]
    Conversion {
        /// Zero-based row index.
        row: usize,
        /// The offending token.
        token: String,
    },
}

/// Catch-all error for the `moocore` crate.
#[derive(Debug, Error)]
pub enum MooError {
    /// Input arrays have inconsistent or invalid shapes (e.g. `ref.len() != d`).
    #[error("invalid shape: {0}")]
    InvalidShape(String),
    /// Values that should be finite were not, or fell outside a required range.
    #[error("invalid value: {0}")]
    InvalidValue(String),
    /// The requested algorithm does not support the given dimensionality.
    #[error("unsupported: {0}")]
    Unsupported(String),
    /// Dataset text parsing failed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// Underlying reader failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MooError>;
