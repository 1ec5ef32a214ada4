use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid numeric data on line {line}: `{text}`")]
    InvalidRow { line: usize, text: String },

    #[error("ragged data: line {line} has {found} columns, expected {expected}")]
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("no data rows found")]
    Empty,
}
