//! Parser for the column-format data ngspice emits via `wrdata`, plus the
//! single-line comma-separated header sidecar files that accompany it.

use error::{Error, Result};
use serde::Serialize;

pub mod error;
pub mod parser;

/// A rectangular table of simulation output samples.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawData {
    rows: Vec<Vec<f64>>,
}

/// Parse the given column-format data.
pub fn parse<T>(input: &T) -> Result<RawData>
where
    T: AsRef<str> + ?Sized,
{
    let rows = parser::parse_rows(input.as_ref())?;
    if rows.is_empty() {
        return Err(Error::Empty);
    }
    Ok(RawData { rows })
}

/// Parse a header sidecar file: one line of comma-separated column names.
pub fn parse_headers<T>(input: &T) -> Vec<String>
where
    T: AsRef<str> + ?Sized,
{
    input
        .as_ref()
        .lines()
        .next()
        .unwrap_or("")
        .split(',')
        .map(|s| s.trim().to_string())
        .collect()
}

impl RawData {
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_columns(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or(0)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Returns the idx-th column, or `None` if out of range.
    pub fn column(&self, idx: usize) -> Option<Vec<f64>> {
        if idx >= self.num_columns() {
            return None;
        }
        Some(self.rows.iter().map(|r| r[idx]).collect())
    }
}
