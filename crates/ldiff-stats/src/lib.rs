//! Per-file statistics for ldiff.
//!
//! A [`StatsAggregator`] folds one file's change records into a finished
//! [`Stats`] value: operation counters, file-wide attribute value counts, and
//! one [`EntryInfo`] per distinguished name.
//!
//! # Key Types
//!
//! - [`StatsAggregator`] -- Owned, single-use fold over a record stream
//! - [`Stats`] -- Finished per-file counters
//! - [`EntryInfo`] -- Everything one file did to a single DN
//! - [`ChangeSummary`] -- What a file changes: created/deleted entries, users, value operations
//! - [`percent_diff`] -- Relative change used by every threshold check

pub mod aggregator;
pub mod entry;
pub mod percent;
pub mod stats;
pub mod summary;

pub use aggregator::{analyze, StatsAggregator};
pub use entry::EntryInfo;
pub use percent::{exceeds, percent_diff, signed_percent};
pub use stats::Stats;
pub use summary::{
    is_user_add, is_user_dn, is_user_record, AttributeNames, ChangeSummary, ClassifiedRecord,
};
