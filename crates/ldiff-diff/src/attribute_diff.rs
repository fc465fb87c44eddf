//! Attribute-count comparison.
//!
//! Two variants share the same three-way logic (new / removed / changed):
//! the file-wide distribution comparison only reports changes beyond
//! [`DISTRIBUTION_SIGNIFICANCE_PERCENT`], while the per-entry comparison
//! reports every change.

use std::collections::{BTreeMap, BTreeSet};

use ldiff_stats::{percent_diff, signed_percent, EntryInfo};

/// Minimum relative change for a file-wide attribute count to be reported.
///
/// Fixed; unrelated to the configurable comparison thresholds.
pub const DISTRIBUTION_SIGNIFICANCE_PERCENT: f64 = 20.0;

/// The marker that opens every attribute-difference line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttributeMarker {
    /// `+`: present only on the new side.
    Added,
    /// `-`: present only on the baseline side.
    Removed,
    /// `~`: present on both sides with different counts.
    Changed,
}

impl AttributeMarker {
    pub fn symbol(&self) -> char {
        match self {
            Self::Added => '+',
            Self::Removed => '-',
            Self::Changed => '~',
        }
    }

    /// Classify a formatted difference line by its leading marker.
    pub fn classify(line: &str) -> Option<Self> {
        match line.trim_start().chars().next()? {
            '+' => Some(Self::Added),
            '-' => Some(Self::Removed),
            '~' => Some(Self::Changed),
            _ => None,
        }
    }
}

fn union_keys<'a>(
    baseline: &'a BTreeMap<String, usize>,
    new: &'a BTreeMap<String, usize>,
) -> BTreeSet<&'a str> {
    baseline
        .keys()
        .chain(new.keys())
        .map(String::as_str)
        .collect()
}

/// Compare two file-wide attribute distributions.
///
/// Emits one line per attribute, in ascending name order, for attributes
/// that appeared, disappeared, or changed by more than
/// [`DISTRIBUTION_SIGNIFICANCE_PERCENT`].
pub fn compare_distribution(
    baseline: &BTreeMap<String, usize>,
    new: &BTreeMap<String, usize>,
) -> Vec<String> {
    let mut diffs = Vec::new();

    for name in union_keys(baseline, new) {
        let base = baseline.get(name).copied().unwrap_or(0);
        let current = new.get(name).copied().unwrap_or(0);

        if base == 0 && current > 0 {
            diffs.push(format!("+ {name}: new attribute ({current} values)"));
        } else if base > 0 && current == 0 {
            diffs.push(format!("- {name}: removed ({base} values)"));
        } else if base != current {
            let pct = percent_diff(base as f64, current as f64);
            if pct.abs() > DISTRIBUTION_SIGNIFICANCE_PERCENT {
                diffs.push(format!(
                    "~ {name}: {}% ({base} → {current})",
                    signed_percent(pct)
                ));
            }
        }
    }

    diffs
}

/// Compare the attribute counts of one DN across two files.
///
/// Every difference is reported, however small.
pub fn compare_entry_attributes(baseline: &EntryInfo, new: &EntryInfo) -> Vec<String> {
    let mut diffs = Vec::new();

    for name in union_keys(&baseline.attributes, &new.attributes) {
        let base = baseline.attributes.get(name).copied().unwrap_or(0);
        let current = new.attributes.get(name).copied().unwrap_or(0);

        if base == 0 && current > 0 {
            diffs.push(added_line(name, current));
        } else if base > 0 && current == 0 {
            diffs.push(removed_line(name, base));
        } else if base != current {
            diffs.push(format!("~ {name}: {base} → {current} value(s)"));
        }
    }

    diffs
}

pub(crate) fn added_line(name: &str, count: usize) -> String {
    format!("+ {name}: {count} value(s)")
}

pub(crate) fn removed_line(name: &str, count: usize) -> String {
    format!("- {name}: {count} value(s)")
}
