//! Foundation types for ldiff.
//!
//! This crate provides the change-record model shared by every other ldiff
//! crate, plus the parser capability that turns LDIF text into records.
//!
//! # Key Types
//!
//! - [`ChangeRecord`] -- One parsed operation (add, delete, modify, rename) targeting a DN
//! - [`Attribute`] / [`ModSpec`] / [`ModOp`] -- Attribute payloads of add and modify records
//! - [`OperationKind`] -- Canonical operation label used in statistics
//! - [`ChangeRecordParser`] -- Capability implemented by any conforming LDIF parser
//! - [`ParseError`] -- Structured per-record parse failure (line + message)

pub mod error;
pub mod parser;
pub mod record;

pub use error::ParseError;
pub use parser::{ChangeRecordParser, ParseOutput};
pub use record::{Attribute, ChangeRecord, ModOp, ModSpec, OperationKind};
