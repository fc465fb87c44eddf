//! Detailed entry-diff output: JSON Lines or a human-readable text listing.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use ldiff_diff::EntryDiff;
use ldiff_types::OperationKind;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{CompareError, CompareResult};

/// Output format for detailed entry diffs, chosen by file extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DetailFormat {
    /// One JSON object per line (`.jsonl`).
    JsonLines,
    /// Plain text listing (any other extension).
    Text,
}

impl DetailFormat {
    /// `.jsonl` (any case) selects JSON Lines; everything else is text.
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("jsonl") => Self::JsonLines,
            _ => Self::Text,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::JsonLines => "JSONL",
            Self::Text => "text",
        }
    }
}

fn joined(ops: &[OperationKind]) -> String {
    ops.iter()
        .map(OperationKind::label)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render entry diffs as the plain text listing.
pub fn render_detail_text(diffs: &[EntryDiff]) -> String {
    let mut out = String::new();
    out.push_str("=== Detailed Entry-Level Differences ===\n\n");

    for diff in diffs {
        out.push_str(&format!("[{}] {}\n", diff.change_type.label().to_uppercase(), diff.dn));

        if let Some(ops) = diff.baseline_operations.as_deref().filter(|ops| !ops.is_empty()) {
            out.push_str(&format!(
                "  Baseline: {} operation(s), {} attribute(s)\n",
                joined(ops),
                diff.baseline_attr_count.unwrap_or(0)
            ));
        }
        if let Some(ops) = diff.new_operations.as_deref().filter(|ops| !ops.is_empty()) {
            out.push_str(&format!(
                "  New:      {} operation(s), {} attribute(s)\n",
                joined(ops),
                diff.new_attr_count.unwrap_or(0)
            ));
        }
        if !diff.attribute_differences.is_empty() {
            out.push_str("  Attributes:\n");
            for line in &diff.attribute_differences {
                out.push_str(&format!("    {line}\n"));
            }
        }
        out.push('\n');
    }

    out.push_str(&format!("Total differences: {} entries\n", diffs.len()));
    out
}

/// Write any serializable items as JSON Lines.
pub fn write_json_lines<'a, T, I>(items: I, path: &Path) -> CompareResult<usize>
where
    T: Serialize + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let file = File::create(path).map_err(|e| CompareError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    let mut count = 0;

    for item in items {
        serde_json::to_writer(&mut writer, item)?;
        writer
            .write_all(b"\n")
            .map_err(|e| CompareError::io(path, e))?;
        count += 1;
    }
    writer.flush().map_err(|e| CompareError::io(path, e))?;
    Ok(count)
}

/// Read a JSON Lines file, skipping blank and malformed lines.
///
/// Returns the decoded items and the number of malformed lines.
pub fn read_json_lines<T: DeserializeOwned>(path: &Path) -> CompareResult<(Vec<T>, usize)> {
    let text = fs::read_to_string(path).map_err(|e| CompareError::io(path, e))?;
    let mut items = Vec::new();
    let mut malformed = 0;

    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str(line) {
            Ok(item) => items.push(item),
            Err(err) => {
                malformed += 1;
                warn!(
                    path = %path.display(),
                    line = index + 1,
                    error = %err,
                    "skipping malformed JSON line"
                );
            }
        }
    }
    Ok((items, malformed))
}

/// Write entry diffs in the format selected by the path's extension.
pub fn write_entry_diffs(diffs: &[EntryDiff], path: &Path) -> CompareResult<DetailFormat> {
    let format = DetailFormat::for_path(path);
    match format {
        DetailFormat::JsonLines => {
            write_json_lines(diffs, path)?;
        }
        DetailFormat::Text => {
            fs::write(path, render_detail_text(diffs)).map_err(|e| CompareError::io(path, e))?;
        }
    }
    info!(
        path = %path.display(),
        format = format.label(),
        entries = diffs.len(),
        "entry diffs written"
    );
    Ok(format)
}
