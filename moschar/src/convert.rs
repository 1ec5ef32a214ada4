//! Conversion of ngspice column output into CSV.
//!
//! A circuit `foo.cir` leaves behind `foo.raw` (numeric columns written by
//! `wrdata`) and optionally `foo.csv_heads` (one comma-separated line of
//! column names). This module merges the two into `foo.csv`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{with_err_context, ErrorContext, ErrorSource, MoscharError, Result};
use crate::log::{info, warn};

/// Combines `<base>.raw` and `<base>.csv_heads` into `<base>.csv`.
///
/// When the header sidecar is missing, `Column1..ColumnN` names are
/// synthesized from the data width. When `cleanup` is set, both input files
/// are deleted after the CSV is written.
///
/// Returns the path of the written CSV file.
pub fn combine(cir: impl AsRef<Path>, cleanup: bool) -> Result<PathBuf> {
    let base = cir.as_ref().with_extension("");
    let heads_path = base.with_extension("csv_heads");
    let raw_path = base.with_extension("raw");
    let csv_path = base.with_extension("csv");

    let raw_text = with_err_context(std::fs::read_to_string(&raw_path), || {
        ErrorContext::ReadFile(raw_path.clone())
    })?;
    let data = rawdata::parse(&raw_text).map_err(ErrorSource::from)?;

    let headers = match std::fs::read_to_string(&heads_path) {
        Ok(text) => rawdata::parse_headers(&text),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!(
                "headers file {:?} not found; using default column names",
                heads_path
            );
            (1..=data.num_columns()).map(|i| format!("Column{i}")).collect()
        }
        Err(e) => {
            return Err(MoscharError::from(ErrorSource::Io(e))
                .with_context(ErrorContext::ReadFile(heads_path.clone())))
        }
    };

    if headers.len() != data.num_columns() {
        return Err(ErrorSource::Internal(format!(
            "{} header names for {} data columns in {:?}",
            headers.len(),
            data.num_columns(),
            raw_path
        ))
        .into());
    }

    let mut writer = csv::Writer::from_path(&csv_path).map_err(ErrorSource::from)?;
    writer.write_record(&headers).map_err(ErrorSource::from)?;
    for row in data.rows() {
        writer.serialize(row).map_err(ErrorSource::from)?;
    }
    with_err_context(writer.flush(), || {
        ErrorContext::WriteFile(csv_path.clone())
    })?;

    info!("combined data and headers into {:?}", csv_path);

    if cleanup {
        if heads_path.exists() {
            with_err_context(std::fs::remove_file(&heads_path), || {
                ErrorContext::Task(arcstr::format!("deleting {heads_path:?}"))
            })?;
        }
        with_err_context(std::fs::remove_file(&raw_path), || {
            ErrorContext::Task(arcstr::format!("deleting {raw_path:?}"))
        })?;
        info!("deleted {:?} and {:?}", heads_path, raw_path);
    }

    Ok(csv_path)
}
