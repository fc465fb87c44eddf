//! The parser capability.
//!
//! Statistics and comparison never depend on a concrete parser; anything
//! that turns text into a sequence of change records satisfies the contract.

use crate::error::ParseError;
use crate::record::ChangeRecord;

/// Everything a parser produced for one input, in input order.
///
/// A malformed record yields an `Err` in its position without stopping the
/// records that follow it. Whether to skip or abort is the caller's decision.
pub type ParseOutput = Vec<Result<ChangeRecord, ParseError>>;

/// Turns LDIF text into change records.
pub trait ChangeRecordParser: Send + Sync {
    fn parse(&self, text: &str) -> ParseOutput;
}

impl<F> ChangeRecordParser for F
where
    F: Fn(&str) -> ParseOutput + Send + Sync,
{
    fn parse(&self, text: &str) -> ParseOutput {
        self(text)
    }
}
