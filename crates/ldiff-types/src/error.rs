use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A malformed record reported by a parser.
///
/// `line` is the 1-based physical line on which the problem was detected.
#[derive(Clone, Debug, Error, PartialEq, Eq, Serialize, Deserialize)]
#[error("line {line}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}
