//! LDIF change-record parser for ldiff.
//!
//! Implements [`ChangeRecordParser`](ldiff_types::ChangeRecordParser) for the
//! LDIF change format: an optional `version:` header, records separated by
//! blank lines, folded continuation lines, `#` comments, and base64 (`::`)
//! values.
//!
//! Malformed records are reported in place as
//! [`ParseError`](ldiff_types::ParseError)s and parsing resumes at the next
//! record.
//!
//! ```
//! use ldiff_parser::LdifParser;
//! use ldiff_types::{ChangeRecordParser, OperationKind};
//!
//! let text = "version: 1\n\ndn: cn=a,dc=x\nchangetype: delete\n";
//! let records = LdifParser::new().parse(text);
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].as_ref().unwrap().kind(), OperationKind::Delete);
//! ```

pub mod lines;
pub mod parser;
mod value;

pub use lines::{split_records, LogicalLine};
pub use parser::LdifParser;
