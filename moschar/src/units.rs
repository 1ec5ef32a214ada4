use std::fmt::Display;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An SI magnitude prefix, as written in SPICE netlists.
#[derive(
    Copy, Clone, Default, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize,
)]
pub enum SiPrefix {
    Femto,
    Pico,
    Nano,
    Micro,
    Milli,
    #[default]
    None,
    Kilo,
    Mega,
    Giga,
    Tera,
}

impl SiPrefix {
    pub fn multiplier(&self) -> f64 {
        match self {
            SiPrefix::Femto => 1e-15,
            SiPrefix::Pico => 1e-12,
            SiPrefix::Nano => 1e-9,
            SiPrefix::Micro => 1e-6,
            SiPrefix::Milli => 1e-3,
            SiPrefix::None => 1e0,
            SiPrefix::Kilo => 1e3,
            SiPrefix::Mega => 1e6,
            SiPrefix::Giga => 1e9,
            SiPrefix::Tera => 1e12,
        }
    }

    /// Parses a SPICE magnitude suffix. Suffixes are case-insensitive;
    /// `meg` denotes 1e6 while a bare `m` denotes 1e-3.
    pub fn parse_suffix(suffix: &str) -> Option<Self> {
        let prefix = match suffix.to_lowercase().as_str() {
            "" => SiPrefix::None,
            "f" => SiPrefix::Femto,
            "p" => SiPrefix::Pico,
            "n" => SiPrefix::Nano,
            "u" | "µ" => SiPrefix::Micro,
            "m" => SiPrefix::Milli,
            "k" => SiPrefix::Kilo,
            "meg" => SiPrefix::Mega,
            "g" => SiPrefix::Giga,
            "t" => SiPrefix::Tera,
            _ => return None,
        };
        Some(prefix)
    }
}

impl Display for SiPrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match *self {
            Self::Femto => "f",
            Self::Pico => "p",
            Self::Nano => "n",
            Self::Micro => "u",
            Self::Milli => "m",
            Self::None => "",
            Self::Kilo => "K",
            Self::Mega => "MEG",
            Self::Giga => "G",
            Self::Tera => "T",
        };

        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum SiParseError {
    #[error("invalid numeric value `{0}`")]
    InvalidNumber(String),
    #[error("unknown SI suffix `{0}`")]
    UnknownSuffix(String),
}

/// Parses a numeric value with an optional trailing SI magnitude suffix,
/// e.g. `4.0u` = 4.0e-6. Unsuffixed values are interpreted in base units.
pub fn parse_si(s: &str) -> std::result::Result<f64, SiParseError> {
    let s = s.trim();
    let boundary = s
        .char_indices()
        .rev()
        .find(|(_, c)| !c.is_ascii_alphabetic() && *c != 'µ')
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    let (number, suffix) = s.split_at(boundary);

    let value: f64 = number
        .parse()
        .map_err(|_| SiParseError::InvalidNumber(s.to_string()))?;
    let prefix = SiPrefix::parse_suffix(suffix)
        .ok_or_else(|| SiParseError::UnknownSuffix(suffix.to_string()))?;

    Ok(value * prefix.multiplier())
}
