//! The textual form of a point distribution: a literal bracketed comma-separated list,
//! e.g. `[82,84,79]`. Downstream parsers depend on this form byte for byte, so formatting and
//! parsing must round-trip exactly.

use thiserror::Error;

pub fn format_points(points: &[u32]) -> String {
    let mut formatted = String::with_capacity(2 + 3 * points.len());
    formatted.push('[');
    for (index, entry) in points.iter().enumerate() {
        if index > 0 {
            formatted.push(',');
        }
        formatted.push_str(&entry.to_string());
    }
    formatted.push(']');
    formatted
}

pub fn parse_points(literal: &str) -> Result<Vec<u32>, ParseError> {
    let body = literal
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(|| ParseError::MissingBrackets(literal.into()))?;
    if body.is_empty() {
        return Ok(vec![]);
    }
    body.split(',')
        .map(|entry| {
            entry
                .parse::<u32>()
                .map_err(|_| ParseError::BadEntry(entry.into()))
        })
        .collect()
}

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("point list {0:?} is not bracketed")]
    MissingBrackets(String),

    #[error("point list entry {0:?} is not a non-negative integer")]
    BadEntry(String),
}
