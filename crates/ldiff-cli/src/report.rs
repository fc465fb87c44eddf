//! Text reports for `compare` and `analyze`.

use std::path::Path;

use colored::Colorize;
use ldiff_compare::{ComparisonResult, DetailFormat};
use ldiff_diff::AttributeMarker;
use ldiff_stats::{ChangeSummary, Stats};
use ldiff_types::ParseError;

/// Where the detailed entry diffs went, if anywhere.
pub enum DetailNote<'a> {
    Written { path: &'a Path, format: DetailFormat },
    NotRequested,
}

fn push_stats(out: &mut String, stats: &Stats) {
    out.push_str(&format!("  Total entries: {}\n", stats.total_entries));
    out.push_str(&format!("    - Add operations: {}\n", stats.total_add_operations));
    out.push_str(&format!("    - Modify operations: {}\n", stats.total_modify_operations));
    out.push_str(&format!("    - Delete operations: {}\n", stats.total_delete_operations));
    out.push_str(&format!("    - ModDn operations: {}\n", stats.total_mod_dn_operations));
    out.push_str(&format!("  Total attributes: {}\n", stats.total_attributes));
    out.push_str(&format!(
        "  Average attributes per entry: {:.2}\n",
        stats.average_attributes_per_entry()
    ));
    out.push_str(&format!("  Unique attribute types: {}\n", stats.unique_attribute_types()));
}

/// Distribution lines and their overflow note sit under their header.
fn difference_indent(line: &str) -> &'static str {
    if AttributeMarker::classify(line).is_some() || line.starts_with("...") {
        "  "
    } else {
        ""
    }
}

pub fn render_comparison(result: &ComparisonResult, detail: DetailNote<'_>) -> String {
    let mut out = String::new();
    let message = if result.is_good {
        result.message.green().bold()
    } else {
        result.message.red().bold()
    };

    out.push_str(&format!("{}\n\n", "=== LDIF Comparison Report ===".bold()));
    out.push_str(&format!("{message}\n\n"));

    out.push_str("Baseline Statistics:\n");
    push_stats(&mut out, &result.baseline_stats);
    out.push('\n');

    out.push_str("New File Statistics:\n");
    push_stats(&mut out, &result.new_stats);
    out.push('\n');

    if !result.differences.is_empty() {
        out.push_str(&format!("{}\n", "Detected Differences:".yellow()));
        for line in &result.differences {
            out.push_str(&format!("{}{line}\n", difference_indent(line)));
        }
        out.push('\n');
    }

    if !result.entry_diffs.is_empty() {
        let summary = result.entry_summary();
        out.push_str(&format!(
            "Entry-level differences: {} entries changed\n",
            result.entry_diffs.len()
        ));
        out.push_str(&format!("  Entries added: {}\n", summary.added));
        out.push_str(&format!("  Entries removed: {}\n", summary.removed));
        out.push_str(&format!("  Entries modified: {}\n", summary.modified));
        if summary.attributes() > 0 {
            out.push_str(&format!("  Attributes added: {}\n", summary.attributes_added));
            out.push_str(&format!("  Attributes removed: {}\n", summary.attributes_removed));
            out.push_str(&format!("  Attributes modified: {}\n", summary.attributes_modified));
        }

        match detail {
            DetailNote::Written { path, format } => {
                out.push_str(&format!(
                    "Detailed diff written to: {} ({} format)\n",
                    path.display(),
                    format.label()
                ));
            }
            DetailNote::NotRequested => {
                out.push_str("(Use --output flag to save detailed differences to a file)\n");
                out.push_str("(Use .jsonl extension for machine-readable JSON Lines format)\n");
            }
        }
        out.push('\n');
    }

    out.push_str(&format!("{}\n", "=== End of Report ===".bold()));
    out
}

pub fn render_change_summary(
    stats: &Stats,
    summary: &ChangeSummary,
    skipped: &[ParseError],
    output: &Path,
) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", "=== LDIF Change Summary ===".bold()));
    out.push_str(&format!("Records JSONL written to: {}\n\n", output.display()));

    out.push_str("File Statistics:\n");
    push_stats(&mut out, stats);
    out.push('\n');

    out.push_str(&format!("Total entries added:   {}\n", summary.entries_added));
    out.push_str(&format!("Total entries deleted: {}\n", summary.entries_deleted));
    out.push_str(&format!("Users added:           {}\n", summary.users_added));
    out.push_str(&format!("Users deleted:         {}\n", summary.users_deleted));
    out.push_str(&format!("User modifications:    {}\n", summary.user_modify_operations));
    out.push_str(&format!("User renames:          {}\n\n", summary.user_dn_modifications));

    out.push_str(&format!("Attribute values added:       {}\n", summary.values_added));
    out.push_str(&format!("Attribute values deleted:     {}\n", summary.values_deleted));
    out.push_str(&format!("Attribute values in replaces: {}\n", summary.values_replaced));
    out.push_str(&format!(
        "Attributes fully cleared:     {}\n\n",
        summary.attributes_fully_cleared
    ));

    out.push_str(&format!(
        "Distinct attributes observed: {}\n\n",
        summary.attributes_observed.len()
    ));

    let lost = summary.lost_attributes();
    if !lost.is_empty() {
        out.push_str(&format!(
            "{}\n",
            "Attributes that appear lost from all modified entries:".yellow()
        ));
        for name in lost {
            out.push_str(&format!("  - {name}\n"));
        }
        out.push('\n');
    }

    if !skipped.is_empty() {
        out.push_str(&format!("{}\n", "Skipped malformed records:".yellow()));
        for err in skipped {
            out.push_str(&format!("  - {err}\n"));
        }
        out.push('\n');
    }

    out.push_str(&format!("{}\n", "=== End of summary ===".bold()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ldiff_compare::{compare_stats, Thresholds};
    use ldiff_stats::analyze;
    use ldiff_types::{Attribute, ChangeRecord, ModOp, ModSpec};

    fn plain() {
        colored::control::set_override(false);
    }

    fn user(dn: &str, attrs: &[&str]) -> ChangeRecord {
        ChangeRecord::add(dn, attrs.iter().map(|a| Attribute::new(*a, ["v"])).collect())
    }

    #[test]
    fn identical_report() {
        plain();
        let stats = analyze([user("cn=U1,dc=x", &["cn", "sn"])]);
        let result = compare_stats(&stats, &stats, &Thresholds::default());

        let report = render_comparison(&result, DetailNote::NotRequested);
        assert_eq!(
            report,
            "=== LDIF Comparison Report ===

✓ New LDIF file appears good - within acceptable thresholds

Baseline Statistics:
  Total entries: 1
    - Add operations: 1
    - Modify operations: 0
    - Delete operations: 0
    - ModDn operations: 0
  Total attributes: 2
  Average attributes per entry: 2.00
  Unique attribute types: 2

New File Statistics:
  Total entries: 1
    - Add operations: 1
    - Modify operations: 0
    - Delete operations: 0
    - ModDn operations: 0
  Total attributes: 2
  Average attributes per entry: 2.00
  Unique attribute types: 2

=== End of Report ===
"
        );
    }

    #[test]
    fn differences_and_entry_counts() {
        plain();
        let baseline = analyze([user("cn=U1,dc=x", &["cn", "sn"])]);
        let new = analyze([user("cn=U1,dc=x", &["cn", "sn"]), user("cn=U2,dc=x", &["cn"])]);
        let result = compare_stats(&baseline, &new, &Thresholds::default());

        let report = render_comparison(&result, DetailNote::NotRequested);
        assert!(report.contains("✗ New LDIF file has significant differences from baseline\n"));
        assert!(report.contains(
            "Detected Differences:\nEntity count difference: +100.0% (baseline: 1, new: 2)\n"
        ));
        assert!(report.contains(
            "Entry-level differences: 1 entries changed
  Entries added: 1
  Entries removed: 0
  Entries modified: 0
  Attributes added: 1
  Attributes removed: 0
  Attributes modified: 0
(Use --output flag to save detailed differences to a file)
"
        ));
        assert!(report.ends_with("\n=== End of Report ===\n"));
    }

    #[test]
    fn distribution_lines_are_indented() {
        plain();
        let thresholds = Thresholds {
            attribute_percent: 1000.0,
            avg_attributes_percent: 1000.0,
            ..Thresholds::default()
        };
        let result = compare_stats(
            &analyze([user("cn=a", &["cn"])]),
            &analyze([user("cn=a", &["cn", "mail"])]),
            &thresholds,
        );
        let report = render_comparison(&result, DetailNote::NotRequested);
        assert!(report.contains(
            "Detected Differences:\nAttribute distribution changes:\n  + mail: new attribute (1 values)\n"
        ));
    }

    #[test]
    fn written_detail_note() {
        plain();
        let result = compare_stats(
            &analyze([user("cn=a", &["cn"])]),
            &analyze([user("cn=b", &["cn"])]),
            &Thresholds::default(),
        );
        let report = render_comparison(
            &result,
            DetailNote::Written {
                path: Path::new("diff.jsonl"),
                format: DetailFormat::JsonLines,
            },
        );
        assert!(report.contains("Detailed diff written to: diff.jsonl (JSONL format)\n"));
        assert!(!report.contains("(Use --output flag"));
    }

    #[test]
    fn change_summary_report() {
        plain();
        let records = vec![
            user("cn=a,ou=Users,dc=x", &["objectClass", "cn"]),
            ChangeRecord::modify(
                "cn=b,ou=Users,dc=x",
                vec![ModSpec::new(ModOp::Delete, "description", Vec::<String>::new())],
            ),
        ];
        let stats = analyze(&records);
        let mut summary = ChangeSummary::new();
        summary.extend(&records);
        let skipped = [ParseError::new(9, "unknown changetype 'explode'")];

        let text = render_change_summary(&stats, &summary, &skipped, Path::new("in.jsonl"));
        assert!(text.starts_with("=== LDIF Change Summary ===\nRecords JSONL written to: in.jsonl\n\n"));
        assert!(text.contains("Total entries added:   1\n"));
        assert!(text.contains("Users added:           1\n"));
        assert!(text.contains("User modifications:    1\n"));
        assert!(text.contains("Attributes fully cleared:     1\n"));
        assert!(text.contains(
            "Attributes that appear lost from all modified entries:\n  - description\n"
        ));
        assert!(text.contains("Skipped malformed records:\n  - line 9: unknown changetype 'explode'\n"));
        assert!(text.ends_with("=== End of summary ===\n"));
    }
}
