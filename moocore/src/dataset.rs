//! Whitespace-separated point-set text format
//!
//! ```text
//! # optional comment lines
//! <f0_0>  <f0_1>  ... <f0_{d-1}>
//! <f1_0>  <f1_1>  ...
//! ...
//!                         <- blank line separates sets
//! <g0_0>  <g0_1>  ...
//! ```

use crate::error::{MooError, ParseError};
use ndarray::Array2;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Result of parsing a dataset: the flattened row-major point data, the
/// number of columns, and, for each set (in first-occurrence order), the
/// number of rows it contributed.
#[derive(Debug)]
pub struct Dataset {
    /// Row-major `n * ncols` point data.
    pub data: Vec<f64>,
    /// Number of columns, fixed by the first data row of the first set.
    pub ncols: usize,
    /// Number of rows in each set, in file order.
    pub set_sizes: Vec<usize>,
}

impl Dataset {
    /// Number of points across all sets.
    #[must_use]
    pub fn nrows(&self) -> usize {
        if self.ncols == 0 {
            0
        } else {
            self.data.len() / self.ncols
        }
    }

    /// Per-row set index (0-based, aligned with [`Dataset::data`]).
    #[must_use]
    pub fn set_index_per_row(&self) -> Vec<usize> {
        let mut out = Vec::with_capacity(self.nrows());
        for (set, &size) in self.set_sizes.iter().enumerate() {
            out.extend(std::iter::repeat(set).take(size));
        }
        out
    }

    /// Augmented `(n, ncols + 1)` matrix: each row of [`Dataset::data`]
    /// followed by that row's 0-based set index, matching the single tagged
    /// array `_moocore.py`'s `read_datasets` returns (its last column is
    /// what `groupby`-style consumers split on). The CLI reads sets through
    /// this helper instead of re-deriving offsets from `set_sizes` itself.
    #[must_use]
    pub fn to_tagged_matrix(&self) -> Array2<f64> {
        let n = self.nrows();
        let mut out = Array2::<f64>::zeros((n, self.ncols + 1));
        for (row, (chunk, set_idx)) in
            self.data.chunks(self.ncols).zip(self.set_index_per_row()).enumerate()
        {
            for (col, &v) in chunk.iter().enumerate() {
                out[[row, col]] = v;
            }
            out[[row, self.ncols]] = set_idx as f64;
        }
        out
    }
}

/// Parse a dataset from any reader (already decompressed).
pub fn parse_reader<R: Read>(reader: R) -> Result<Dataset, MooError> {
    let buf = BufReader::new(reader);
    let mut data: Vec<f64> = Vec::new();
    let mut ncols: Option<usize> = None;
    let mut set_sizes: Vec<usize> = Vec::new();
    let mut current_set_rows = 0usize;
    let mut any_row_seen = false;
    let mut saw_blank_since_row = false;

    for (lineno, line) in buf.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.starts_with('#') {
            continue;
        }
        if trimmed.is_empty() {
            if current_set_rows > 0 {
                set_sizes.push(current_set_rows);
                current_set_rows = 0;
            }
            saw_blank_since_row = true;
            continue;
        }
        saw_blank_since_row = false;

        let tokens: Vec<&str> = trimmed.split_whitespace().collect();
        let row: Vec<f64> = tokens
            .iter()
            .map(|tok| {
                tok.parse::<f64>().map_err(|_| ParseError::Conversion {
                    row: lineno,
                    token: (*tok).to_string(),
                })
            })
            .collect::<Result<_, _>>()?;

        match ncols {
            None => ncols = Some(row.len()),
            Some(d) if d != row.len() => {
                return Err(ParseError::WrongInitialDim {
                    row: lineno,
                    found: row.len(),
                    expected: d,
                }
                .into());
            }
            Some(_) => {}
        }

        data.extend(row);
        current_set_rows += 1;
        any_row_seen = true;
    }
    let _ = saw_blank_since_row;
    if current_set_rows > 0 {
        set_sizes.push(current_set_rows);
    }

    if !any_row_seen {
        return Err(ParseError::FileEmpty.into());
    }

    Ok(Dataset {
        data,
        ncols: ncols.unwrap_or(0),
        set_sizes,
    })
}

/// Parse a dataset from a file path. If the path ends in `.xz` the content
/// is transparently LZMA-decompressed first.
pub fn read_datasets<P: AsRef<Path>>(path: P) -> Result<Dataset, MooError> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|_| ParseError::FileOpen(path.display().to_string()))?;

    if path.extension().is_some_and(|ext| ext == "xz") {
        let decoder = xz2::read::XzDecoder::new(file);
        parse_reader(decoder)
    } else {
        parse_reader(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn three_sets_of_sizes_1_2_1() {
        let text = "0.5 0.5\n\n1 0\n0 1\n\n0.5 0.5";
        let ds = parse_reader(Cursor::new(text)).unwrap();
        assert_eq!(ds.ncols, 2);
        assert_eq!(ds.set_sizes, vec![1, 2, 1]);
        assert_eq!(ds.nrows(), 4);
    }

    #[test]
    fn comments_are_skipped() {
        let text = "# a comment\n1 2 3\n# another\n4 5 6\n";
        let ds = parse_reader(Cursor::new(text)).unwrap();
        assert_eq!(ds.ncols, 3);
        assert_eq!(ds.data, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn empty_input_errors() {
        let err = parse_reader(Cursor::new("")).unwrap_err();
        assert!(matches!(err, MooError::Parse(ParseError::FileEmpty)));
    }

    #[test]
    fn mismatched_columns_errors() {
        let text = "1 2\n3 4 5\n";
        let err = parse_reader(Cursor::new(text)).unwrap_err();
        assert!(matches!(
            err,
            MooError::Parse(ParseError::WrongInitialDim { .. })
        ));
    }

    #[test]
    fn non_numeric_token_errors() {
        let text = "1 foo\n";
        let err = parse_reader(Cursor::new(text)).unwrap_err();
        assert!(matches!(err, MooError::Parse(ParseError::Conversion { .. })));
    }

    #[test]
    fn missing_file_errors() {
        let err = read_datasets("/nonexistent/path/does/not/exist.dat").unwrap_err();
        assert!(matches!(err, MooError::Parse(ParseError::FileOpen(_))));
    }
}
