//! Threshold comparison of LDIF files.
//!
//! Reads two files through any [`ChangeRecordParser`](ldiff_types::ChangeRecordParser),
//! aggregates each into [`Stats`](ldiff_stats::Stats), and decides whether
//! the new file is within tolerance of the baseline.
//!
//! # Key Types
//!
//! - [`CompareConfig`] / [`Thresholds`] / [`ParsePolicy`] -- Run configuration, loadable from TOML
//! - [`ComparisonResult`] -- Verdict, threshold violations, and entry-level diffs
//! - [`compare_files`] -- Parse, aggregate, and compare two files
//! - [`DetailFormat`] -- JSON Lines or text output for detailed entry diffs

pub mod analyze;
pub mod config;
pub mod detail;
pub mod engine;
pub mod error;

pub use analyze::{analyze_file, analyze_text, apply_policy, compare_files, load_records, ParsedRecords};
pub use config::{CompareConfig, ParsePolicy, Thresholds};
pub use detail::{
    read_json_lines, render_detail_text, write_entry_diffs, write_json_lines, DetailFormat,
};
pub use engine::{
    compare_stats, ComparisonResult, BAD_MESSAGE, DISTRIBUTION_REPORT_LIMIT, GOOD_MESSAGE,
};
pub use error::{CompareError, CompareResult};
