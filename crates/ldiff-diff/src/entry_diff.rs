//! Entry-level diff: compare the per-DN statistics of two files.
//!
//! DNs are matched exactly (case-sensitive). Every DN present on one side
//! only yields an `Added` or `Removed` record; a DN present on both sides
//! yields `Modified` when its attributes, value total, or operation history
//! differ.

use std::collections::BTreeSet;
use std::fmt;

use ldiff_stats::{EntryInfo, Stats};
use ldiff_types::OperationKind;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::attribute_diff::{added_line, compare_entry_attributes, removed_line, AttributeMarker};

/// How a DN changed between baseline and new.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeType {
    Added,
    Removed,
    Modified,
}

impl ChangeType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Added => "Added",
            Self::Removed => "Removed",
            Self::Modified => "Modified",
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One changed DN.
///
/// Baseline fields are `None` for `Added`, new fields are `None` for
/// `Removed`; both are set for `Modified`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryDiff {
    pub dn: String,
    pub change_type: ChangeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline_operations: Option<Vec<OperationKind>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_operations: Option<Vec<OperationKind>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline_attr_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_attr_count: Option<usize>,
    #[serde(default)]
    pub attribute_differences: Vec<String>,
}

impl EntryDiff {
    fn added(entry: &EntryInfo) -> Self {
        Self {
            dn: entry.dn.clone(),
            change_type: ChangeType::Added,
            baseline_operations: None,
            new_operations: Some(entry.operation_types.clone()),
            baseline_attr_count: None,
            new_attr_count: Some(entry.total_attribute_count),
            attribute_differences: entry
                .attributes
                .iter()
                .map(|(name, count)| added_line(name, *count))
                .collect(),
        }
    }

    fn removed(entry: &EntryInfo) -> Self {
        Self {
            dn: entry.dn.clone(),
            change_type: ChangeType::Removed,
            baseline_operations: Some(entry.operation_types.clone()),
            new_operations: None,
            baseline_attr_count: Some(entry.total_attribute_count),
            new_attr_count: None,
            attribute_differences: entry
                .attributes
                .iter()
                .map(|(name, count)| removed_line(name, *count))
                .collect(),
        }
    }

    fn modified(baseline: &EntryInfo, new: &EntryInfo) -> Option<Self> {
        let attribute_differences = compare_entry_attributes(baseline, new);
        let changed = !attribute_differences.is_empty()
            || baseline.total_attribute_count != new.total_attribute_count
            || baseline.operation_types != new.operation_types;

        changed.then(|| Self {
            dn: baseline.dn.clone(),
            change_type: ChangeType::Modified,
            baseline_operations: Some(baseline.operation_types.clone()),
            new_operations: Some(new.operation_types.clone()),
            baseline_attr_count: Some(baseline.total_attribute_count),
            new_attr_count: Some(new.total_attribute_count),
            attribute_differences,
        })
    }
}

/// Diff the entries of two files, in ascending DN order.
pub fn generate_entry_diffs(baseline: &Stats, new: &Stats) -> Vec<EntryDiff> {
    let dns: BTreeSet<&str> = baseline
        .entries
        .keys()
        .chain(new.entries.keys())
        .map(String::as_str)
        .collect();

    let diffs: Vec<EntryDiff> = dns
        .into_iter()
        .filter_map(|dn| match (baseline.entry(dn), new.entry(dn)) {
            (None, Some(entry)) => Some(EntryDiff::added(entry)),
            (Some(entry), None) => Some(EntryDiff::removed(entry)),
            (Some(old), Some(current)) => EntryDiff::modified(old, current),
            (None, None) => None,
        })
        .collect();

    debug!(
        baseline_entries = baseline.entries.len(),
        new_entries = new.entries.len(),
        changed = diffs.len(),
        "entry diffs generated"
    );
    diffs
}

/// Counts over a list of entry diffs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryDiffSummary {
    pub added: usize,
    pub removed: usize,
    pub modified: usize,
    /// Attribute-difference lines starting with `+`.
    pub attributes_added: usize,
    /// Attribute-difference lines starting with `-`.
    pub attributes_removed: usize,
    /// Attribute-difference lines starting with `~`.
    pub attributes_modified: usize,
}

impl EntryDiffSummary {
    pub fn from_diffs<'a, I>(diffs: I) -> Self
    where
        I: IntoIterator<Item = &'a EntryDiff>,
    {
        let mut summary = Self::default();
        for diff in diffs {
            match diff.change_type {
                ChangeType::Added => summary.added += 1,
                ChangeType::Removed => summary.removed += 1,
                ChangeType::Modified => summary.modified += 1,
            }
            for line in &diff.attribute_differences {
                match AttributeMarker::classify(line) {
                    Some(AttributeMarker::Added) => summary.attributes_added += 1,
                    Some(AttributeMarker::Removed) => summary.attributes_removed += 1,
                    Some(AttributeMarker::Changed) => summary.attributes_modified += 1,
                    None => {}
                }
            }
        }
        summary
    }

    /// Number of changed entries.
    pub fn entries(&self) -> usize {
        self.added + self.removed + self.modified
    }

    /// Number of attribute-difference lines.
    pub fn attributes(&self) -> usize {
        self.attributes_added + self.attributes_removed + self.attributes_modified
    }
}
