//! Root-mean-square error comparison across CSV series.
//!
//! Given a listing of CSV files (one path per line), the second column of
//! each file is compared against a reference series taken from the first or
//! last file of the listing, in linear or log10 scale.

use std::path::{Path, PathBuf};

use itertools::Itertools;

use crate::error::{with_err_context, ErrorContext, ErrorSource, Result};
use crate::log::warn;

/// Which listed file provides the reference series.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum Reference {
    First,
    #[default]
    Last,
}

/// Scale in which the error is computed.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum Scale {
    Linear,
    #[default]
    Log10,
}

/// RMSE of one listed file against the reference.
#[derive(Clone, Debug, PartialEq)]
pub struct Comparison {
    pub path: PathBuf,
    pub rmse: f64,
}

/// Root-mean-square error between two series.
///
/// Returns +∞ when the series have different lengths, 0 for empty series,
/// and NaN when either series contains a NaN.
pub fn rmse(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() {
        return f64::INFINITY;
    }
    if a.is_empty() {
        return 0.0;
    }
    if a.iter().chain(b).any(|v| v.is_nan()) {
        return f64::NAN;
    }

    let mean_sq = a
        .iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        / a.len() as f64;
    mean_sq.sqrt()
}

/// RMSE between the base-10 logarithms of two series.
///
/// In addition to the [`rmse`] conventions, returns NaN when either series
/// contains a non-positive value.
pub fn rmse_log10(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() {
        return f64::INFINITY;
    }
    if a.is_empty() {
        return 0.0;
    }
    if a.iter().chain(b).any(|v| v.is_nan() || *v <= 0.0) {
        return f64::NAN;
    }

    let log_a = a.iter().map(|v| v.log10()).collect_vec();
    let log_b = b.iter().map(|v| v.log10()).collect_vec();
    rmse(&log_a, &log_b)
}

/// Compares every series against the selected reference series.
pub fn compare_series(series: &[Vec<f64>], reference: Reference, scale: Scale) -> Vec<f64> {
    let Some(reference) = (match reference {
        Reference::First => series.first(),
        Reference::Last => series.last(),
    }) else {
        return Vec::new();
    };

    series
        .iter()
        .map(|s| match scale {
            Scale::Linear => rmse(s, reference),
            Scale::Log10 => rmse_log10(s, reference),
        })
        .collect()
}

/// Runs the whole comparison for a listing file.
///
/// Listed names are forced to a `.csv` extension (with a warning when this
/// changes the name). Files whose CSV has fewer than two columns are skipped
/// with a warning. At least one usable series is required.
pub fn compare_listing(
    listing: impl AsRef<Path>,
    reference: Reference,
    scale: Scale,
) -> Result<Vec<Comparison>> {
    let listing = listing.as_ref();
    let text = with_err_context(std::fs::read_to_string(listing), || {
        ErrorContext::ReadFile(listing.to_path_buf())
    })?;

    let mut paths = Vec::new();
    let mut series = Vec::new();
    for name in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let path = fix_extension(Path::new(name));
        match read_second_column(&path)? {
            Some(values) => {
                paths.push(path);
                series.push(values);
            }
            None => warn!("{:?} has fewer than two columns; skipping it", path),
        }
    }

    if series.is_empty() {
        return Err(ErrorSource::Internal(format!(
            "no usable csv data listed in {listing:?}"
        ))
        .into());
    }

    let errors = compare_series(&series, reference, scale);
    Ok(paths
        .into_iter()
        .zip(errors)
        .map(|(path, rmse)| Comparison { path, rmse })
        .collect())
}

fn fix_extension(path: &Path) -> PathBuf {
    let matches = path
        .extension()
        .map(|e| e.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);
    if matches {
        return path.to_path_buf();
    }
    let fixed = path.with_extension("csv");
    warn!("listed file {:?} is not a csv name; using {:?}", path, fixed);
    fixed
}

/// Reads the second column of a CSV file with a header row.
///
/// Returns `None` when the file has fewer than two columns.
fn read_second_column(path: &Path) -> Result<Option<Vec<f64>>> {
    let mut reader = csv::Reader::from_path(path).map_err(ErrorSource::from)?;
    let mut values = Vec::new();
    for record in reader.records() {
        let record = record.map_err(ErrorSource::from)?;
        let Some(field) = record.get(1) else {
            return Ok(None);
        };
        let value = field.trim().parse::<f64>().map_err(|_| {
            ErrorSource::Internal(format!("non-numeric value `{field}` in {path:?}"))
        })?;
        values.push(value);
    }
    Ok(Some(values))
}

#[cfg(test)]
mod tests {
    use float_eq::assert_float_eq;
    use tempdir::TempDir;

    use super::*;

    #[test]
    fn rmse_basic() {
        assert_float_eq!(
            rmse(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]),
            0.0,
            abs <= 1e-12
        );
        assert_float_eq!(rmse(&[0.0, 0.0], &[3.0, 4.0]), 12.5f64.sqrt(), r2nd <= 1e-12);
    }

    #[test]
    fn rmse_edge_cases() {
        assert_eq!(rmse(&[1.0], &[1.0, 2.0]), f64::INFINITY);
        assert_eq!(rmse(&[], &[]), 0.0);
        assert!(rmse(&[f64::NAN], &[1.0]).is_nan());
    }

    #[test]
    fn rmse_log10_matches_linear_on_logs() {
        let a = [1e-9, 1e-8, 1e-7];
        let b = [1e-8, 1e-7, 1e-6];
        assert_float_eq!(rmse_log10(&a, &b), 1.0, r2nd <= 1e-12);
    }

    #[test]
    fn rmse_log10_rejects_non_positive() {
        assert!(rmse_log10(&[0.0, 1.0], &[1.0, 1.0]).is_nan());
        assert!(rmse_log10(&[-1.0, 1.0], &[1.0, 1.0]).is_nan());
    }

    #[test]
    fn series_reference_selection() {
        let series = vec![vec![1.0, 1.0], vec![2.0, 2.0], vec![3.0, 3.0]];
        let against_last = compare_series(&series, Reference::Last, Scale::Linear);
        assert_float_eq!(against_last[0], 2.0, r2nd <= 1e-12);
        assert_float_eq!(against_last[2], 0.0, abs <= 1e-12);

        let against_first = compare_series(&series, Reference::First, Scale::Linear);
        assert_float_eq!(against_first[0], 0.0, abs <= 1e-12);
        assert_float_eq!(against_first[2], 2.0, r2nd <= 1e-12);
    }

    fn write_csv(dir: &Path, name: &str, body: &str) {
        std::fs::write(dir.join(name), body).unwrap();
    }

    #[test]
    fn listing_end_to_end() {
        let tmp = TempDir::new("compare").unwrap();
        write_csv(tmp.path(), "a.csv", "V,I\n0.0,1e-9\n0.1,1e-8\n");
        write_csv(tmp.path(), "b.csv", "V,I\n0.0,1e-8\n0.1,1e-7\n");
        let listing = tmp.path().join("list.txt");
        std::fs::write(
            &listing,
            format!(
                "{}\n{}\n",
                tmp.path().join("a.csv").display(),
                // Listed with the wrong extension on purpose.
                tmp.path().join("b.cir").display()
            ),
        )
        .unwrap();

        let out = compare_listing(&listing, Reference::Last, Scale::Log10).unwrap();
        assert_eq!(out.len(), 2);
        assert_float_eq!(out[0].rmse, 1.0, r2nd <= 1e-12);
        assert_float_eq!(out[1].rmse, 0.0, abs <= 1e-12);
    }

    #[test]
    fn listing_skips_single_column_files() {
        let tmp = TempDir::new("compare").unwrap();
        write_csv(tmp.path(), "one.csv", "V\n0.0\n");
        write_csv(tmp.path(), "two.csv", "V,I\n0.0,1.0\n");
        let listing = tmp.path().join("list.txt");
        std::fs::write(
            &listing,
            format!(
                "{}\n{}\n",
                tmp.path().join("one.csv").display(),
                tmp.path().join("two.csv").display()
            ),
        )
        .unwrap();

        let out = compare_listing(&listing, Reference::Last, Scale::Linear).unwrap();
        assert_eq!(out.len(), 1);
        assert!(out[0].path.ends_with("two.csv"));
    }

    #[test]
    fn listing_with_no_usable_data_is_an_error() {
        let tmp = TempDir::new("compare").unwrap();
        let listing = tmp.path().join("list.txt");
        std::fs::write(&listing, "\n").unwrap();
        assert!(compare_listing(&listing, Reference::Last, Scale::Linear).is_err());
    }
}
