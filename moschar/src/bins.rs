//! Model-bin tables: ordered (width-range, length-range) → bin-id records.

use std::path::Path;

use arcstr::ArcStr;
use serde::{Deserialize, Serialize};

use crate::error::{with_err_context, ErrorContext, ErrorSource, Result};
use crate::log::warn;

/// A half-open range `[start, end)` over a device dimension, in meters.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct BinRange {
    pub start: f64,
    pub end: f64,
}

impl BinRange {
    #[inline]
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Containment is inclusive at the lower bound and exclusive at the
    /// upper bound.
    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        self.start <= value && value < self.end
    }
}

impl From<(f64, f64)> for BinRange {
    fn from(value: (f64, f64)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl From<BinRange> for (f64, f64) {
    fn from(value: BinRange) -> Self {
        (value.start, value.end)
    }
}

/// One bin record: the bin id substituted into the model name when both
/// dimension ranges contain the instance's (w, l) pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BinSpec {
    pub id: ArcStr,
    pub w: BinRange,
    pub l: BinRange,
}

impl BinSpec {
    pub fn new(id: impl Into<ArcStr>, w: BinRange, l: BinRange) -> Self {
        Self { id: id.into(), w, l }
    }

    #[inline]
    pub fn contains(&self, w: f64, l: f64) -> bool {
        self.w.contains(w) && self.l.contains(l)
    }
}

/// An ordered set of bins.
///
/// Selection is deterministic: the first bin in table order containing the
/// queried pair wins, and an overlap is reported as a table configuration
/// warning rather than an error.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BinTable {
    bins: Vec<BinSpec>,
}

impl BinTable {
    pub fn new(bins: Vec<BinSpec>) -> Self {
        Self { bins }
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn bins(&self) -> impl Iterator<Item = &BinSpec> {
        self.bins.iter()
    }

    /// Selects the bin for the given width and length (both in meters).
    pub fn select(&self, w: f64, l: f64) -> Option<&BinSpec> {
        let mut matches = self.bins.iter().filter(|b| b.contains(w, l));
        let first = matches.next()?;
        if let Some(other) = matches.next() {
            warn!(
                "bin table is ambiguous for w={:.4e} l={:.4e}: bins {} and {} both match; using {}",
                w, l, first.id, other.id, first.id
            );
        }
        Some(first)
    }

    /// Checks that every range is non-empty and non-negative.
    pub fn validate(&self) -> Result<()> {
        if self.bins.is_empty() {
            return Err(ErrorSource::InvalidBinTable("table has no bins".to_string()).into());
        }
        for bin in &self.bins {
            for (dim, range) in [("w", bin.w), ("l", bin.l)] {
                if !(range.start >= 0.0 && range.start < range.end) {
                    return Err(ErrorSource::InvalidBinTable(format!(
                        "bin {}: empty or negative {dim} range [{:e}, {:e})",
                        bin.id, range.start, range.end
                    ))
                    .into());
                }
            }
        }
        Ok(())
    }

    /// Loads and validates a table from a TOML file of the form:
    ///
    /// ```toml
    /// [[bins]]
    /// id = "21"
    /// w = [3.5e-6, 5.0e-6]
    /// l = [3.0e-6, 4.0e-6]
    /// ```
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = with_err_context(std::fs::read_to_string(path), || {
            ErrorContext::ReadFile(path.to_path_buf())
        })?;
        Self::from_toml(&data)
    }

    /// Parses and validates a table from TOML text.
    pub fn from_toml(data: &str) -> Result<Self> {
        let table: BinTable = toml::from_str(data).map_err(ErrorSource::from)?;
        table.validate()?;
        Ok(table)
    }
}
