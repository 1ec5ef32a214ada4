use nom::character::complete::space0;
use nom::combinator::eof;
use nom::multi::many1;
use nom::number::complete::double;
use nom::sequence::{preceded, tuple};
use nom::IResult;

use crate::error::{Error, Result};


fn data_row(input: &str) -> IResult<&str, Vec<f64>> {
    let (input, values) = many1(preceded(space0, double))(input)?;
    let (input, _) = tuple((space0, eof))(input)?;
    Ok((input, values))
}

/// Parses whitespace-separated numeric rows, one row per line.
///
/// Blank lines are skipped. Every row must have the same number of columns.
pub(crate) fn parse_rows(input: &str) -> Result<Vec<Vec<f64>>> {
    let mut rows: Vec<Vec<f64>> = Vec::new();
    for (i, line) in input.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let (_, row) = data_row(line).map_err(|_| Error::InvalidRow {
            line: i + 1,
            text: line.to_string(),
        })?;
        if let Some(first) = rows.first() {
            if row.len() != first.len() {
                return Err(Error::RaggedRow {
                    line: i + 1,
                    expected: first.len(),
                    found: row.len(),
                });
            }
        }
        rows.push(row);
    }
    Ok(rows)
}
