use ldiff_diff::{compare_distribution, generate_entry_diffs, EntryDiff, EntryDiffSummary};
use ldiff_stats::{exceeds, percent_diff, signed_percent, Stats};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Thresholds;

/// Verdict message for a file within every threshold.
pub const GOOD_MESSAGE: &str = "✓ New LDIF file appears good - within acceptable thresholds";

/// Verdict message for a file outside at least one threshold.
pub const BAD_MESSAGE: &str = "✗ New LDIF file has significant differences from baseline";

/// Distribution lines listed before the rest are summarized as a count.
pub const DISTRIBUTION_REPORT_LIMIT: usize = 10;

// ---------------------------------------------------------------------------
// ComparisonResult
// ---------------------------------------------------------------------------

/// The outcome of comparing a new file's statistics against a baseline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    /// `true` iff no headline metric exceeded its threshold.
    pub is_good: bool,
    pub message: String,
    /// Threshold violations followed by any distribution changes.
    pub differences: Vec<String>,
    pub baseline_stats: Stats,
    pub new_stats: Stats,
    pub entry_diffs: Vec<EntryDiff>,
}

impl ComparisonResult {
    /// Counts over [`entry_diffs`](Self::entry_diffs).
    pub fn entry_summary(&self) -> EntryDiffSummary {
        EntryDiffSummary::from_diffs(&self.entry_diffs)
    }
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

/// Compare two finished statistics objects.
///
/// The three headline checks run in a fixed order (record count, value
/// count, average values per record) and decide the verdict. Attribute
/// distribution changes and entry-level diffs are reported but never affect
/// it.
pub fn compare_stats(baseline: &Stats, new: &Stats, thresholds: &Thresholds) -> ComparisonResult {
    let mut differences = Vec::new();
    let mut is_good = true;

    let entity_pct = percent_diff(baseline.total_entries as f64, new.total_entries as f64);
    if exceeds(entity_pct, thresholds.entity_percent) {
        is_good = false;
        differences.push(format!(
            "Entity count difference: {}% (baseline: {}, new: {})",
            signed_percent(entity_pct),
            baseline.total_entries,
            new.total_entries
        ));
    }

    let attribute_pct =
        percent_diff(baseline.total_attributes as f64, new.total_attributes as f64);
    if exceeds(attribute_pct, thresholds.attribute_percent) {
        is_good = false;
        differences.push(format!(
            "Total attribute count difference: {}% (baseline: {}, new: {})",
            signed_percent(attribute_pct),
            baseline.total_attributes,
            new.total_attributes
        ));
    }

    let baseline_avg = baseline.average_attributes_per_entry();
    let new_avg = new.average_attributes_per_entry();
    let avg_pct = percent_diff(baseline_avg, new_avg);
    if exceeds(avg_pct, thresholds.avg_attributes_percent) {
        is_good = false;
        differences.push(format!(
            "Average attributes per entry difference: {}% (baseline: {baseline_avg:.2}, new: {new_avg:.2})",
            signed_percent(avg_pct)
        ));
    }

    let distribution = compare_distribution(&baseline.attribute_counts, &new.attribute_counts);
    if !distribution.is_empty() {
        differences.push("Attribute distribution changes:".to_string());
        let hidden = distribution.len().saturating_sub(DISTRIBUTION_REPORT_LIMIT);
        differences.extend(distribution.into_iter().take(DISTRIBUTION_REPORT_LIMIT));
        if hidden > 0 {
            differences.push(format!("... and {hidden} more"));
        }
    }

    let entry_diffs = generate_entry_diffs(baseline, new);

    debug!(
        is_good,
        entity_pct,
        attribute_pct,
        avg_pct,
        entry_diffs = entry_diffs.len(),
        "comparison complete"
    );

    ComparisonResult {
        is_good,
        message: if is_good { GOOD_MESSAGE } else { BAD_MESSAGE }.to_string(),
        differences,
        baseline_stats: baseline.clone(),
        new_stats: new.clone(),
        entry_diffs,
    }
}
