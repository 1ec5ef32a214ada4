use error::Result;
use parser::{InstanceLine, NetlistLine};
use serde::Serialize;

pub mod error;
pub mod parser;

/// A netlist parsed line-by-line.
///
/// Line records borrow from the input text; the i-th record corresponds to
/// the i-th line of the input, so callers can rewrite individual lines while
/// leaving the rest of the file untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedNetlist<'a> {
    pub lines: Vec<NetlistLine<'a>>,
}

/// Parse the given netlist text.
pub fn parse<T>(input: &T) -> Result<ParsedNetlist<'_>>
where
    T: AsRef<str> + ?Sized,
{
    let lines = input
        .as_ref()
        .lines()
        .map(parser::classify)
        .collect::<Result<Vec<_>>>()?;
    Ok(ParsedNetlist { lines })
}

impl<'a> ParsedNetlist<'a> {
    /// Return an iterator over the lines in the parsed netlist.
    pub fn lines(&self) -> impl Iterator<Item = &NetlistLine<'a>> {
        self.lines.iter()
    }

    /// Return an iterator over the device instance lines in the netlist.
    pub fn instances(&self) -> impl Iterator<Item = &InstanceLine<'a>> {
        self.lines.iter().filter_map(|line| line.instance())
    }
}
