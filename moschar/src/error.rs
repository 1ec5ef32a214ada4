use std::fmt::{Debug, Display};
use std::path::PathBuf;

use arcstr::ArcStr;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MoscharError>;

pub struct MoscharError {
    pub(crate) source: ErrorSource,
    pub(crate) context: Vec<ErrorContext>,
}

impl MoscharError {
    pub fn source(&self) -> &ErrorSource {
        &self.source
    }
}

impl std::error::Error for MoscharError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

impl Display for MoscharError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Error:\n{}", self.source)?;
        if !self.context.is_empty() {
            writeln!(f, "\nError occurred:")?;
            for item in self.context.iter() {
                writeln!(f, "\twhile {}", item)?;
            }
        }
        Ok(())
    }
}

impl Debug for MoscharError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.source)?;
        if !self.context.is_empty() {
            writeln!(f, "\nError occurred:")?;
            for (i, item) in self.context.iter().enumerate() {
                writeln!(f, "\t{}: {:?}", i, item)?;
            }
        }
        Ok(())
    }
}

impl<T> From<T> for MoscharError
where
    T: Into<ErrorSource>,
{
    fn from(value: T) -> Self {
        Self {
            source: value.into(),
            context: Vec::new(),
        }
    }
}

impl MoscharError {
    pub fn new(source: impl Into<ErrorSource>) -> Self {
        Self {
            source: source.into(),
            context: Vec::new(),
        }
    }

    pub fn with_context(mut self, ctx: impl Into<ErrorContext>) -> Self {
        self.context.push(ctx.into());
        self
    }

    #[inline]
    pub fn into_inner(self) -> ErrorSource {
        self.source
    }
}

#[inline]
pub fn with_err_context<T, E, C>(result: std::result::Result<T, E>, ctx: C) -> Result<T>
where
    C: FnOnce() -> ErrorContext,
    E: Into<MoscharError>,
{
    result.map_err(|err| err.into().with_context(ctx()))
}

#[derive(Debug, Clone, Eq, PartialEq)]
#[non_exhaustive]
pub enum ErrorContext {
    ReadFile(PathBuf),
    WriteFile(PathBuf),
    Task(ArcStr),
}

impl Display for ErrorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use ErrorContext::*;
        match self {
            ReadFile(path) => write!(f, "reading file {path:?}"),
            WriteFile(path) => write!(f, "writing file {path:?}"),
            Task(task) => write!(f, "{task}"),
        }
    }
}

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ErrorSource {
    #[error("internal error: {0}")]
    Internal(String),

    #[error("device instance is missing or has invalid parameters: {reason} in `{line}`")]
    MalformedInstance { line: String, reason: String },

    #[error(
        "no bin covers w={w:.4e} l={l:.4e} (instance {instance}, nodes {nodes}); \
         extend the bin table"
    )]
    NoMatchingBin {
        instance: String,
        nodes: String,
        w: f64,
        l: f64,
    },

    #[error("invalid bin table: {0}")]
    InvalidBinTable(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("error parsing netlist: {0}")]
    NetlistParsing(#[from] binspice::error::Error),

    #[error("error parsing simulation output data: {0}")]
    RawData(#[from] rawdata::error::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("error parsing TOML: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("unexpected error: {0}")]
    Anyhow(#[from] anyhow::Error),
}
