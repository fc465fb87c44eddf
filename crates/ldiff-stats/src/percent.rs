//! Percentage math shared by the threshold checks.

/// Relative change from `baseline` to `new`, in percent.
///
/// Growth from zero is reported as exactly 100 %, so any appearance of a
/// metric that was previously absent counts as significant.
pub fn percent_diff(baseline: f64, new: f64) -> f64 {
    if baseline == 0.0 {
        return if new == 0.0 { 0.0 } else { 100.0 };
    }
    (new - baseline) / baseline * 100.0
}

/// Whether a percentage change is beyond `threshold` in either direction.
pub fn exceeds(percent: f64, threshold: f64) -> bool {
    percent.abs() > threshold
}

/// Format a percentage with an explicit sign and one decimal: `+12.5`.
pub fn signed_percent(percent: f64) -> String {
    format!("{percent:+.1}")
}
