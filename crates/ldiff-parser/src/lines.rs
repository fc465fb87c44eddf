//! Physical-to-logical line handling.
//!
//! LDIF folds long lines by starting the continuation with a single space.
//! Records are separated by one or more blank lines. Comment lines start
//! with `#` and may be folded as well.

/// An unfolded line together with the physical line it started on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogicalLine {
    /// 1-based physical line number of the first fragment.
    pub line: usize,
    pub text: String,
}

/// Split LDIF text into records of unfolded logical lines.
///
/// Comments are dropped. Empty records (runs of blank lines) never appear in
/// the output.
pub fn split_records(text: &str) -> Vec<Vec<LogicalLine>> {
    let mut records = Vec::new();
    let mut current: Vec<LogicalLine> = Vec::new();
    let mut in_comment = false;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;

        if raw.trim().is_empty() {
            in_comment = false;
            if !current.is_empty() {
                records.push(std::mem::take(&mut current));
            }
            continue;
        }

        if let Some(rest) = raw.strip_prefix(' ') {
            if in_comment {
                continue;
            }
            match current.last_mut() {
                Some(last) => {
                    last.text.push_str(rest);
                    continue;
                }
                // A continuation with nothing to continue is kept verbatim so
                // the parser can report it.
                None => {
                    current.push(LogicalLine {
                        line: line_no,
                        text: raw.to_string(),
                    });
                    continue;
                }
            }
        }

        if raw.starts_with('#') {
            in_comment = true;
            continue;
        }

        in_comment = false;
        current.push(LogicalLine {
            line: line_no,
            text: raw.to_string(),
        });
    }

    if !current.is_empty() {
        records.push(current);
    }

    records
}
