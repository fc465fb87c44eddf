//! Line-level diff of one entry's raw lines.
//!
//! The default [`LineDiffAlgorithm::Greedy`] matcher claims, for each
//! baseline line in order, the first unclaimed identical new line. Claims
//! are not order-preserving, so blocks with duplicated or reordered lines can
//! render out of step. [`LineDiffAlgorithm::Myers`] produces a minimal edit
//! script instead and is a different output, not a corrected one.

use std::fmt;

use serde::{Deserialize, Serialize};
use similar::{Algorithm, ChangeTag, TextDiff};

/// A single line in an entry diff.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiffLine {
    /// A line present on both sides (context).
    Context(String),
    /// A line only in the new entry.
    Added(String),
    /// A line only in the baseline entry.
    Removed(String),
}

impl DiffLine {
    pub fn prefix(&self) -> char {
        match self {
            Self::Context(_) => ' ',
            Self::Added(_) => '+',
            Self::Removed(_) => '-',
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Context(s) | Self::Added(s) | Self::Removed(s) => s,
        }
    }
}

impl fmt::Display for DiffLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.prefix(), self.text())
    }
}

/// Matching strategy for [`compute_line_diff_with`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineDiffAlgorithm {
    /// First-unclaimed-match pairing followed by a two-cursor walk.
    #[default]
    Greedy,
    /// Minimal edit script (Myers).
    Myers,
}

/// Diff two entries' lines with the greedy matcher.
pub fn compute_line_diff<S: AsRef<str>>(baseline: &[S], new: &[S]) -> Vec<DiffLine> {
    let mut new_claimed = vec![false; new.len()];
    let mut baseline_claimed = vec![false; baseline.len()];

    for (i, line) in baseline.iter().enumerate() {
        let found = new
            .iter()
            .enumerate()
            .find(|(j, candidate)| !new_claimed[*j] && candidate.as_ref() == line.as_ref());
        if let Some((j, _)) = found {
            baseline_claimed[i] = true;
            new_claimed[j] = true;
        }
    }

    let mut out = Vec::with_capacity(baseline.len() + new.len());
    let (mut b, mut n) = (0, 0);

    while b < baseline.len() || n < new.len() {
        if b < baseline.len() && !baseline_claimed[b] {
            out.push(DiffLine::Removed(baseline[b].as_ref().to_string()));
            b += 1;
        } else if n < new.len() && !new_claimed[n] {
            out.push(DiffLine::Added(new[n].as_ref().to_string()));
            n += 1;
        } else {
            // Claims pair one-to-one, so both cursors sit on claimed lines.
            out.push(DiffLine::Context(baseline[b].as_ref().to_string()));
            b += 1;
            n += 1;
        }
    }

    out
}

/// Diff two entries' lines with the chosen algorithm.
pub fn compute_line_diff_with<S: AsRef<str>>(
    algorithm: LineDiffAlgorithm,
    baseline: &[S],
    new: &[S],
) -> Vec<DiffLine> {
    match algorithm {
        LineDiffAlgorithm::Greedy => compute_line_diff(baseline, new),
        LineDiffAlgorithm::Myers => myers_line_diff(baseline, new),
    }
}

fn myers_line_diff<S: AsRef<str>>(baseline: &[S], new: &[S]) -> Vec<DiffLine> {
    let old: Vec<&str> = baseline.iter().map(AsRef::as_ref).collect();
    let new: Vec<&str> = new.iter().map(AsRef::as_ref).collect();

    let diff = TextDiff::configure()
        .algorithm(Algorithm::Myers)
        .diff_slices(&old, &new);

    diff.iter_all_changes()
        .map(|change| {
            let text = change.value().to_string();
            match change.tag() {
                ChangeTag::Equal => DiffLine::Context(text),
                ChangeTag::Delete => DiffLine::Removed(text),
                ChangeTag::Insert => DiffLine::Added(text),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn render(lines: &[DiffLine]) -> Vec<String> {
        lines.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn identical_lines_are_all_context() {
        let lines = ["dn: cn=a", "cn: a"];
        assert_eq!(render(&compute_line_diff(&lines, &lines)), vec![" dn: cn=a", " cn: a"]);
    }

    #[test]
    fn modified_value() {
        let old = ["dn: cn=User01", "changetype: add", "mail: user01@example.com", "sn: One"];
        let new = ["dn: cn=User01", "changetype: add", "mail: user01.updated@example.com", "sn: One"];
        assert_eq!(
            render(&compute_line_diff(&old, &new)),
            vec![
                " dn: cn=User01",
                " changetype: add",
                "-mail: user01@example.com",
                "+mail: user01.updated@example.com",
                " sn: One",
            ]
        );
    }

    #[test]
    fn appended_line() {
        let old = ["dn: a", "cn: a"];
        let new = ["dn: a", "cn: a", "telephoneNumber: +1 555 000004"];
        assert_eq!(
            render(&compute_line_diff(&old, &new)),
            vec![" dn: a", " cn: a", "+telephoneNumber: +1 555 000004"]
        );
    }

    #[test]
    fn empty_sides() {
        let none: [&str; 0] = [];
        assert_eq!(render(&compute_line_diff(&none, &["x"])), vec!["+x"]);
        assert_eq!(render(&compute_line_diff(&["x"], &none)), vec!["-x"]);
        assert!(compute_line_diff(&none, &none).is_empty());
    }

    #[test]
    fn reordered_lines_desynchronize() {
        // Swapped lines are both claimed, so the walk pairs them positionally
        // and shows the baseline text as context.
        let old = ["a", "b"];
        let new = ["b", "a"];
        assert_eq!(render(&compute_line_diff(&old, &new)), vec![" a", " b"]);
    }

    #[test]
    fn duplicate_lines_claim_in_order() {
        let old = ["x", "x", "y"];
        let new = ["y", "x"];
        // Baseline x#0 claims new x#1, x#1 stays unclaimed, y claims new y#0.
        assert_eq!(render(&compute_line_diff(&old, &new)), vec![" x", "-x", " y"]);
    }

    #[test]
    fn crossed_claims_with_a_removal() {
        let old = ["a", "c", "b"];
        let new = ["c", "a"];
        assert_eq!(render(&compute_line_diff(&old, &new)), vec![" a", " c", "-b"]);
    }

    #[test]
    fn myers_is_order_aware() {
        let old = ["a", "b"];
        let new = ["b", "a"];
        let lines = compute_line_diff_with(LineDiffAlgorithm::Myers, &old, &new);
        assert!(lines.iter().any(|l| matches!(l, DiffLine::Added(_))));
        assert!(lines.iter().any(|l| matches!(l, DiffLine::Removed(_))));
    }

    #[test]
    fn algorithm_defaults_to_greedy() {
        assert_eq!(LineDiffAlgorithm::default(), LineDiffAlgorithm::Greedy);
        let old = ["a", "b"];
        let new = ["b", "a"];
        assert_eq!(
            compute_line_diff_with(LineDiffAlgorithm::default(), &old, &new),
            compute_line_diff(&old, &new)
        );
    }

    fn removed_and_added(lines: &[DiffLine]) -> (Vec<&str>, Vec<&str>) {
        let removed = lines
            .iter()
            .filter(|l| matches!(l, DiffLine::Removed(_)))
            .map(DiffLine::text)
            .collect();
        let added = lines
            .iter()
            .filter(|l| matches!(l, DiffLine::Added(_)))
            .map(DiffLine::text)
            .collect();
        (removed, added)
    }

    proptest! {
        #[test]
        fn every_line_is_accounted_for(
            old in proptest::collection::vec("[a-d]", 0..12),
            new in proptest::collection::vec("[a-d]", 0..12),
        ) {
            let lines = compute_line_diff(&old, &new);
            let (removed, added) = removed_and_added(&lines);
            let context = lines.len() - removed.len() - added.len();

            // A context line stands for one line of each side.
            prop_assert_eq!(removed.len() + context, old.len());
            prop_assert_eq!(added.len() + context, new.len());
        }

        #[test]
        fn identical_sides_have_no_changes(lines in proptest::collection::vec("[a-z]{0,4}", 0..12)) {
            let diff = compute_line_diff(&lines, &lines);
            prop_assert!(diff.iter().all(|l| matches!(l, DiffLine::Context(_))));
            prop_assert_eq!(diff.len(), lines.len());
        }

        #[test]
        fn disjoint_sides_are_all_changes(
            old in proptest::collection::vec("[a-c]{1,3}", 0..8),
            new in proptest::collection::vec("[x-z]{1,3}", 0..8),
        ) {
            let diff = compute_line_diff(&old, &new);
            let (removed, added) = removed_and_added(&diff);
            prop_assert_eq!(removed, old.iter().map(String::as_str).collect::<Vec<_>>());
            prop_assert_eq!(added, new.iter().map(String::as_str).collect::<Vec<_>>());
        }
    }
}
