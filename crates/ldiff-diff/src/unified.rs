//! DN-grouped unified diff of two raw LDIF texts.
//!
//! Output shape:
//!
//! ```text
//! --- <baseline label>
//! +++ <new label>
//!
//! @@ Entry Added: <dn> @@
//! +<line>
//! +
//!
//! @@ Entry Modified: <dn> @@
//!  <context>
//! -<removed>
//! +<added>
//!
//! ```
//!
//! Entries are emitted in case-folded DN order and identical entries are
//! omitted.

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::blocks::{parse_to_blocks, EntryBlocks};
use crate::error::{DiffError, DiffResult};
use crate::line_diff::{compute_line_diff_with, DiffLine, LineDiffAlgorithm};

/// One DN's section in a unified diff.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BlockChange {
    /// Entry only in the new file.
    Added { dn: String, lines: Vec<String> },
    /// Entry only in the baseline file.
    Removed { dn: String, lines: Vec<String> },
    /// Entry in both files with different lines.
    Modified { dn: String, lines: Vec<DiffLine> },
}

impl BlockChange {
    pub fn dn(&self) -> &str {
        match self {
            Self::Added { dn, .. } | Self::Removed { dn, .. } | Self::Modified { dn, .. } => dn,
        }
    }
}

impl fmt::Display for BlockChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added { dn, lines } => {
                writeln!(f, "@@ Entry Added: {dn} @@")?;
                for line in lines {
                    writeln!(f, "+{line}")?;
                }
                writeln!(f, "+")?;
            }
            Self::Removed { dn, lines } => {
                writeln!(f, "@@ Entry Removed: {dn} @@")?;
                for line in lines {
                    writeln!(f, "-{line}")?;
                }
                writeln!(f, "-")?;
            }
            Self::Modified { dn, lines } => {
                writeln!(f, "@@ Entry Modified: {dn} @@")?;
                for line in lines {
                    writeln!(f, "{line}")?;
                }
            }
        }
        writeln!(f)
    }
}

/// A computed unified diff, ready to render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnifiedDiff {
    pub baseline_label: String,
    pub new_label: String,
    pub changes: Vec<BlockChange>,
}

impl UnifiedDiff {
    /// Diff two LDIF texts with the given line matcher.
    pub fn compute(
        baseline_text: &str,
        new_text: &str,
        baseline_label: impl Into<String>,
        new_label: impl Into<String>,
        algorithm: LineDiffAlgorithm,
    ) -> Self {
        let baseline = parse_to_blocks(baseline_text);
        let new = parse_to_blocks(new_text);
        let changes = diff_blocks(&baseline, &new, algorithm);

        Self {
            baseline_label: baseline_label.into(),
            new_label: new_label.into(),
            changes,
        }
    }

    /// Returns `true` if no entry changed.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Number of changed entries.
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Number of added entries.
    pub fn additions(&self) -> usize {
        self.changes
            .iter()
            .filter(|c| matches!(c, BlockChange::Added { .. }))
            .count()
    }

    /// Number of removed entries.
    pub fn removals(&self) -> usize {
        self.changes
            .iter()
            .filter(|c| matches!(c, BlockChange::Removed { .. }))
            .count()
    }

    /// Number of modified entries.
    pub fn modifications(&self) -> usize {
        self.changes
            .iter()
            .filter(|c| matches!(c, BlockChange::Modified { .. }))
            .count()
    }
}

impl fmt::Display for UnifiedDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- {}", self.baseline_label)?;
        writeln!(f, "+++ {}", self.new_label)?;
        writeln!(f)?;
        for change in &self.changes {
            write!(f, "{change}")?;
        }
        Ok(())
    }
}

fn diff_blocks(
    baseline: &EntryBlocks,
    new: &EntryBlocks,
    algorithm: LineDiffAlgorithm,
) -> Vec<BlockChange> {
    let keys: BTreeSet<&String> = baseline.keys().chain(new.keys()).collect();
    let mut changes = Vec::new();

    for key in keys {
        match (baseline.get_folded(key), new.get_folded(key)) {
            (None, Some(block)) => changes.push(BlockChange::Added {
                dn: block.dn.clone(),
                lines: block.lines.clone(),
            }),
            (Some(block), None) => changes.push(BlockChange::Removed {
                dn: block.dn.clone(),
                lines: block.lines.clone(),
            }),
            (Some(old), Some(current)) => {
                if old.lines != current.lines {
                    changes.push(BlockChange::Modified {
                        dn: old.dn.clone(),
                        lines: compute_line_diff_with(algorithm, &old.lines, &current.lines),
                    });
                }
            }
            (None, None) => {}
        }
    }

    changes
}

/// Render the unified diff of two LDIF texts with the greedy matcher.
pub fn generate_unified_diff(
    baseline_text: &str,
    new_text: &str,
    baseline_label: &str,
    new_label: &str,
) -> String {
    generate_unified_diff_with(
        baseline_text,
        new_text,
        baseline_label,
        new_label,
        LineDiffAlgorithm::default(),
    )
}

/// Render the unified diff of two LDIF texts with the chosen matcher.
pub fn generate_unified_diff_with(
    baseline_text: &str,
    new_text: &str,
    baseline_label: &str,
    new_label: &str,
    algorithm: LineDiffAlgorithm,
) -> String {
    UnifiedDiff::compute(baseline_text, new_text, baseline_label, new_label, algorithm).to_string()
}

/// Read two LDIF files and write their unified diff to `output_path`.
///
/// The file paths are used as header labels. Returns the computed diff so
/// callers can report counts.
pub fn write_unified_diff(
    baseline_path: &Path,
    new_path: &Path,
    output_path: &Path,
    algorithm: LineDiffAlgorithm,
) -> DiffResult<UnifiedDiff> {
    let read = |path: &Path| {
        fs::read_to_string(path).map_err(|source| DiffError::Read {
            path: path.to_path_buf(),
            source,
        })
    };

    let baseline_text = read(baseline_path)?;
    let new_text = read(new_path)?;
    debug!(
        baseline = %baseline_path.display(),
        new = %new_path.display(),
        ?algorithm,
        "computing unified diff"
    );

    let diff = UnifiedDiff::compute(
        &baseline_text,
        &new_text,
        baseline_path.display().to_string(),
        new_path.display().to_string(),
        algorithm,
    );

    fs::write(output_path, diff.to_string()).map_err(|source| DiffError::Write {
        path: output_path.to_path_buf(),
        source,
    })?;

    info!(
        output = %output_path.display(),
        added = diff.additions(),
        removed = diff.removals(),
        modified = diff.modifications(),
        "unified diff written"
    );
    Ok(diff)
}
