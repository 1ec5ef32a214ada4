//! Extraction of measured ID(VG) characteristics from foundry IV data.
//!
//! The measurement files (e.g. `sky130_fd_pr__nfet_01v8__iv.data`) are
//! whitespace-separated tables with columns VDS, ID, IG, VGS. This module
//! selects the rows of one VDS operating point and writes the (VGS, ID)
//! pairs to a two-column CSV.

use std::path::Path;

use crate::error::{with_err_context, ErrorContext, ErrorSource, Result};
use crate::log::{info, warn};

/// Column indices in the measurement table.
const VDS_COL: usize = 0;
const ID_COL: usize = 1;
const VGS_COL: usize = 3;

/// Filters the measurement table at `data` by `vds` and writes a `V,I` CSV
/// to `output`. Returns the number of extracted rows.
///
/// Rows are matched by exact comparison: the measurement grid carries exact
/// decimal values, and a tolerance would merge adjacent sweep points.
pub fn extract_id_vg(
    data: impl AsRef<Path>,
    vds: f64,
    output: impl AsRef<Path>,
) -> Result<usize> {
    let data = data.as_ref();
    let output = output.as_ref();

    let text = with_err_context(std::fs::read_to_string(data), || {
        ErrorContext::ReadFile(data.to_path_buf())
    })?;
    let table = rawdata::parse(&text).map_err(ErrorSource::from)?;

    if table.num_columns() <= VGS_COL {
        return Err(ErrorSource::Internal(format!(
            "expected at least {} columns in {:?}, found {}",
            VGS_COL + 1,
            data,
            table.num_columns()
        ))
        .into());
    }

    let mut writer = csv::Writer::from_path(output).map_err(ErrorSource::from)?;
    writer.write_record(["V", "I"]).map_err(ErrorSource::from)?;

    let mut count = 0;
    for row in table.rows().filter(|r| r[VDS_COL] == vds) {
        writer
            .serialize((row[VGS_COL], row[ID_COL]))
            .map_err(ErrorSource::from)?;
        count += 1;
    }
    with_err_context(writer.flush(), || {
        ErrorContext::WriteFile(output.to_path_buf())
    })?;

    if count == 0 {
        warn!("no rows in {:?} match vds={}", data, vds);
    } else {
        info!("extracted {} rows at vds={} into {:?}", count, vds, output);
    }

    Ok(count)
}

#[cfg(test)]
mod tests {
    use tempdir::TempDir;

    use super::*;

    const IV_DATA: &str = "\
1.8 1.0e-4 1e-12 0.9
1.8 2.0e-4 1e-12 1.2
0.1 3.0e-6 1e-12 0.9
1.8 3.5e-4 1e-12 1.8
";

    #[test]
    fn extracts_matching_vds_rows() {
        let tmp = TempDir::new("refdata").unwrap();
        let data = tmp.path().join("iv.data");
        let out = tmp.path().join("idvg.csv");
        std::fs::write(&data, IV_DATA).unwrap();

        let n = extract_id_vg(&data, 1.8, &out).unwrap();
        assert_eq!(n, 3);

        let text = std::fs::read_to_string(&out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "V,I");
        assert_eq!(lines.len(), 4);
        // VGS ends up in the first output column, ID in the second.
        assert!(lines[1].starts_with("0.9,"));
        assert!(lines[3].starts_with("1.8,"));
    }

    #[test]
    fn empty_selection_is_not_an_error() {
        let tmp = TempDir::new("refdata").unwrap();
        let data = tmp.path().join("iv.data");
        let out = tmp.path().join("idvg.csv");
        std::fs::write(&data, IV_DATA).unwrap();

        let n = extract_id_vg(&data, 0.5, &out).unwrap();
        assert_eq!(n, 0);
        assert_eq!(std::fs::read_to_string(&out).unwrap().lines().count(), 1);
    }

    #[test]
    fn narrow_tables_are_rejected() {
        let tmp = TempDir::new("refdata").unwrap();
        let data = tmp.path().join("iv.data");
        std::fs::write(&data, "1.8 1.0e-4\n").unwrap();
        assert!(extract_id_vg(&data, 1.8, tmp.path().join("o.csv")).is_err());
    }

    #[test]
    fn missing_data_file_is_an_error() {
        let tmp = TempDir::new("refdata").unwrap();
        assert!(extract_id_vg(tmp.path().join("nope.data"), 1.8, tmp.path().join("o.csv")).is_err());
    }
}
