//! Reports over an entry-diff JSON Lines file.

use std::collections::BTreeMap;

use ldiff_diff::{ChangeType, EntryDiff, EntryDiffSummary};
use ldiff_types::OperationKind;

const SAMPLE_LIMIT: usize = 10;
const MODIFIED_SAMPLE_LIMIT: usize = 5;
const ATTRIBUTE_SAMPLE_LIMIT: usize = 3;
const FIND_LIMIT: usize = 20;

fn joined(ops: &[OperationKind]) -> String {
    ops.iter()
        .map(OperationKind::label)
        .collect::<Vec<_>>()
        .join(", ")
}

fn of_type(diffs: &[EntryDiff], change_type: ChangeType) -> Vec<&EntryDiff> {
    diffs.iter().filter(|d| d.change_type == change_type).collect()
}

pub fn render_summary(diffs: &[EntryDiff]) -> String {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for diff in diffs {
        *counts.entry(diff.change_type.label()).or_insert(0) += 1;
    }

    let mut out = String::from("=== Summary Report ===\n\n");
    out.push_str(&format!("Total differences: {}\n", diffs.len()));
    for (label, count) in counts {
        out.push_str(&format!("  {label}: {count}\n"));
    }
    out.push('\n');
    out
}

/// Added or removed entries with the operations and value count of the side
/// they exist on.
fn render_one_sided(diffs: &[EntryDiff], change_type: ChangeType) -> String {
    let (title, total) = match change_type {
        ChangeType::Added => ("Added Entries", "Total added"),
        ChangeType::Removed => ("Removed Entries", "Total removed"),
        ChangeType::Modified => ("Modified Entries", "Total modified"),
    };
    let selected = of_type(diffs, change_type);

    let mut out = String::new();
    out.push_str(&format!("=== {title} ===\n\n"));
    out.push_str(&format!("{total}: {}\n", selected.len()));

    if !selected.is_empty() {
        out.push_str(&format!("\nSample entries (first {SAMPLE_LIMIT}):\n"));
        for diff in selected.iter().take(SAMPLE_LIMIT) {
            let (ops, count) = match change_type {
                ChangeType::Removed => (&diff.baseline_operations, diff.baseline_attr_count),
                _ => (&diff.new_operations, diff.new_attr_count),
            };
            out.push_str(&format!("  - {}\n", diff.dn));
            if let Some(ops) = ops.as_deref().filter(|ops| !ops.is_empty()) {
                out.push_str(&format!("    Operations: {}\n", joined(ops)));
            }
            out.push_str(&format!("    Attributes: {}\n", count.unwrap_or(0)));
        }
    }
    out.push('\n');
    out
}

pub fn render_added(diffs: &[EntryDiff]) -> String {
    render_one_sided(diffs, ChangeType::Added)
}

pub fn render_removed(diffs: &[EntryDiff]) -> String {
    render_one_sided(diffs, ChangeType::Removed)
}

pub fn render_modified(diffs: &[EntryDiff]) -> String {
    let modified = of_type(diffs, ChangeType::Modified);

    let mut out = String::from("=== Modified Entries ===\n\n");
    out.push_str(&format!("Total modified: {}\n", modified.len()));

    if !modified.is_empty() {
        let summary = EntryDiffSummary::from_diffs(modified.iter().copied());
        out.push_str("\nAttribute changes:\n");
        out.push_str(&format!("  Added attributes: {}\n", summary.attributes_added));
        out.push_str(&format!("  Removed attributes: {}\n", summary.attributes_removed));
        out.push_str(&format!("  Modified attributes: {}\n", summary.attributes_modified));

        out.push_str(&format!("\nSample modified entries (first {MODIFIED_SAMPLE_LIMIT}):\n"));
        for diff in modified.iter().take(MODIFIED_SAMPLE_LIMIT) {
            out.push_str(&format!("  - {}\n", diff.dn));
            for line in diff.attribute_differences.iter().take(ATTRIBUTE_SAMPLE_LIMIT) {
                out.push_str(&format!("    {}\n", line.trim()));
            }
            let hidden = diff
                .attribute_differences
                .len()
                .saturating_sub(ATTRIBUTE_SAMPLE_LIMIT);
            if hidden > 0 {
                out.push_str(&format!("    ... and {hidden} more\n"));
            }
        }
    }
    out.push('\n');
    out
}

/// Entries whose DN contains `pattern`, ignoring case.
pub fn find_matches<'a>(diffs: &'a [EntryDiff], pattern: &str) -> Vec<&'a EntryDiff> {
    let pattern = pattern.to_lowercase();
    diffs
        .iter()
        .filter(|d| d.dn.to_lowercase().contains(&pattern))
        .collect()
}

pub fn render_find(diffs: &[EntryDiff], pattern: &str) -> String {
    let matches = find_matches(diffs, pattern);

    let mut out = String::new();
    out.push_str(&format!("=== Entries matching '{pattern}' ===\n\n"));
    out.push_str(&format!("Found {} matching entries\n", matches.len()));

    if !matches.is_empty() {
        out.push('\n');
        for diff in matches.iter().take(FIND_LIMIT) {
            out.push_str(&format!("  [{}] {}\n", diff.change_type, diff.dn));
            let count = diff.attribute_differences.len();
            if count > 0 {
                out.push_str(&format!("    {count} attribute changes\n"));
            }
        }
        let hidden = matches.len().saturating_sub(FIND_LIMIT);
        if hidden > 0 {
            out.push_str(&format!("  ... and {hidden} more\n"));
        }
    }
    out.push('\n');
    out
}

fn csv_quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// One header row and one row per entry diff.
pub fn render_csv(diffs: &[EntryDiff]) -> String {
    let ops = |ops: &Option<Vec<OperationKind>>| {
        ops.as_deref()
            .map(|ops| {
                ops.iter()
                    .map(OperationKind::label)
                    .collect::<Vec<_>>()
                    .join(";")
            })
            .unwrap_or_default()
    };

    let mut out = String::from(
        "DN,Change Type,Baseline Operations,New Operations,Baseline Attr Count,New Attr Count,Attr Changes\n",
    );
    for diff in diffs {
        out.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            csv_quote(&diff.dn),
            csv_quote(diff.change_type.label()),
            csv_quote(&ops(&diff.baseline_operations)),
            csv_quote(&ops(&diff.new_operations)),
            diff.baseline_attr_count.unwrap_or(0),
            diff.new_attr_count.unwrap_or(0),
            diff.attribute_differences.len()
        ));
    }
    out
}
