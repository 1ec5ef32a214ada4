use nom::branch::alt;
use nom::bytes::complete::take_till1;
use nom::character::complete::{char, space0, space1};
use nom::combinator::{eof, opt, rest, verify};
use nom::multi::many0;
use nom::sequence::{pair, preceded, separated_pair, tuple};
use nom::{IResult, Offset};
use serde::Serialize;

use crate::error::{Error, Result};


/// A single netlist line, classified by kind.
///
/// Everything except [`NetlistLine::Instance`] is opaque: such lines are
/// never modified and must be re-emitted byte-for-byte.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum NetlistLine<'a> {
    /// A MOS device instance card.
    Instance(InstanceLine<'a>),
    /// A comment line (leading `*`).
    Comment(&'a str),
    /// A simulator directive (leading `.`).
    Directive(&'a str),
    /// A line containing only whitespace.
    Blank,
    /// Any other element card or continuation line.
    Other,
}

impl<'a> NetlistLine<'a> {
    pub fn instance(&self) -> Option<&InstanceLine<'a>> {
        match self {
            NetlistLine::Instance(line) => Some(line),
            _ => None,
        }
    }
}

/// A parsed MOS instance card.
///
/// The grammar is positional: an instance name starting with `M`, four node
/// names, a model name, then `key=value` parameters in any order.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct InstanceLine<'a> {
    pub name: &'a str,
    /// Drain, gate, source, body.
    pub nodes: [&'a str; 4],
    pub model: &'a str,
    /// Byte offset of the model token within the raw line.
    ///
    /// Allows splicing a replacement model name without touching any
    /// other byte of the line.
    pub model_offset: usize,
    pub params: Vec<Param<'a>>,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Param<'a> {
    pub key: &'a str,
    pub value: &'a str,
}

impl<'a> InstanceLine<'a> {
    /// Looks up a parameter value by key, ignoring ASCII case.
    pub fn param(&self, key: &str) -> Option<&'a str> {
        self.params
            .iter()
            .find(|p| p.key.eq_ignore_ascii_case(key))
            .map(|p| p.value)
    }
}

fn is_space(c: char) -> bool {
    c == ' ' || c == '\t'
}

fn token(input: &str) -> IResult<&str, &str> {
    take_till1(is_space)(input)
}

fn node(input: &str) -> IResult<&str, &str> {
    verify(token, |t: &str| !t.contains('='))(input)
}

fn param(input: &str) -> IResult<&str, Param> {
    let (input, (key, value)) = separated_pair(
        take_till1(|c| c == '=' || is_space(c)),
        char('='),
        preceded(space0, token),
    )(input)?;
    Ok((input, Param { key, value }))
}

fn trailing_comment(input: &str) -> IResult<&str, ()> {
    let (input, _) = pair(char(';'), rest)(input)?;
    Ok((input, ()))
}

fn instance_line(input: &str) -> IResult<&str, InstanceLine> {
    let (input, (_, name)) = pair(space0, token)(input)?;
    let (input, d) = preceded(space1, node)(input)?;
    let (input, g) = preceded(space1, node)(input)?;
    let (input, s) = preceded(space1, node)(input)?;
    let (input, b) = preceded(space1, node)(input)?;
    let (input, model) = preceded(space1, node)(input)?;
    let (input, params) = many0(preceded(space1, param))(input)?;
    let (input, _) = tuple((space0, opt(trailing_comment), eof))(input)?;

    Ok((
        input,
        InstanceLine {
            name,
            nodes: [d, g, s, b],
            model,
            model_offset: 0,
            params,
        },
    ))
}

fn comment_line(input: &str) -> IResult<&str, NetlistLine> {
    let (input, (_, _, comment)) = tuple((space0, char('*'), rest))(input)?;
    Ok((input, NetlistLine::Comment(comment.trim())))
}

fn directive_line(input: &str) -> IResult<&str, NetlistLine> {
    let (input, (_, _, directive)) = tuple((space0, char('.'), rest))(input)?;
    Ok((input, NetlistLine::Directive(directive)))
}

fn blank_line(input: &str) -> IResult<&str, NetlistLine> {
    let (input, _) = pair(space0, eof)(input)?;
    Ok((input, NetlistLine::Blank))
}

fn first_token(line: &str) -> &str {
    line.trim_start_matches(is_space)
        .split(is_space)
        .next()
        .unwrap_or("")
}

/// Classifies a single netlist line.
///
/// Lines whose first token names a MOS device (leading `M`/`m`) must match
/// the full instance grammar; anything else on such a line is an error
/// rather than a silent pass-through.
pub fn classify(line: &str) -> Result<NetlistLine> {
    if let Ok((_, parsed)) = alt((blank_line, comment_line, directive_line))(line) {
        return Ok(parsed);
    }

    let lead = first_token(line);
    if lead.starts_with(['M', 'm']) {
        match instance_line(line) {
            Ok((_, mut inst)) => {
                inst.model_offset = line.offset(inst.model);
                Ok(NetlistLine::Instance(inst))
            }
            Err(_) => Err(Error::MalformedInstance(line.to_string())),
        }
    } else {
        Ok(NetlistLine::Other)
    }
}
