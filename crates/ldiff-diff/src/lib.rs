//! Diff engine for ldiff.
//!
//! Compares two LDIF files at three granularities: file-wide attribute
//! distributions, per-DN statistics, and raw per-DN line blocks rendered as a
//! unified diff.
//!
//! # Key Types
//!
//! - [`compare_distribution`] / [`compare_entry_attributes`] -- Attribute-count difference lines
//! - [`EntryDiff`] / [`EntryDiffSummary`] -- Per-DN statistics diff (case-sensitive DNs)
//! - [`UnifiedDiff`] / [`BlockChange`] -- DN-grouped text diff (case-insensitive DNs)
//! - [`DiffLine`] / [`LineDiffAlgorithm`] -- Line-level diff inside one entry

pub mod attribute_diff;
pub mod blocks;
pub mod entry_diff;
pub mod error;
pub mod line_diff;
pub mod unified;

pub use attribute_diff::{
    compare_distribution, compare_entry_attributes, AttributeMarker,
    DISTRIBUTION_SIGNIFICANCE_PERCENT,
};
pub use blocks::{parse_to_blocks, EntryBlock, EntryBlocks};
pub use entry_diff::{generate_entry_diffs, ChangeType, EntryDiff, EntryDiffSummary};
pub use error::{DiffError, DiffResult};
pub use line_diff::{compute_line_diff, compute_line_diff_with, DiffLine, LineDiffAlgorithm};
pub use unified::{
    generate_unified_diff, generate_unified_diff_with, write_unified_diff, BlockChange,
    UnifiedDiff,
};
