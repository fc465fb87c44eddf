//! File-level analysis: read, parse, apply the parse policy, aggregate.

use std::fs;
use std::panic;
use std::path::Path;
use std::thread;

use ldiff_stats::{analyze, Stats};
use ldiff_types::{ChangeRecord, ChangeRecordParser, ParseError, ParseOutput};
use tracing::{debug, info, warn};

use crate::config::{CompareConfig, ParsePolicy};
use crate::engine::{compare_stats, ComparisonResult};
use crate::error::{CompareError, CompareResult};

/// Records kept from one parse, plus the errors skipped under
/// [`ParsePolicy::Skip`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedRecords {
    pub records: Vec<ChangeRecord>,
    pub skipped: Vec<ParseError>,
}

/// Apply a parse policy to raw parser output.
///
/// Under `Abort` the first error is returned; under `Skip` every error is
/// logged and collected.
pub fn apply_policy(output: ParseOutput, policy: ParsePolicy) -> Result<ParsedRecords, ParseError> {
    let mut parsed = ParsedRecords::default();
    for item in output {
        match item {
            Ok(record) => parsed.records.push(record),
            Err(err) => match policy {
                ParsePolicy::Abort => return Err(err),
                ParsePolicy::Skip => {
                    warn!(line = err.line, error = %err.message, "skipping malformed record");
                    parsed.skipped.push(err);
                }
            },
        }
    }
    Ok(parsed)
}

/// Parse LDIF text and aggregate its statistics.
pub fn analyze_text<P>(parser: &P, text: &str, policy: ParsePolicy) -> Result<Stats, ParseError>
where
    P: ChangeRecordParser + ?Sized,
{
    let parsed = apply_policy(parser.parse(text), policy)?;
    Ok(analyze(&parsed.records))
}

/// Read and parse one LDIF file.
pub fn load_records<P>(parser: &P, path: &Path, policy: ParsePolicy) -> CompareResult<ParsedRecords>
where
    P: ChangeRecordParser + ?Sized,
{
    let text = fs::read_to_string(path).map_err(|e| CompareError::io(path, e))?;
    let parsed = apply_policy(parser.parse(&text), policy).map_err(|source| CompareError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(
        path = %path.display(),
        records = parsed.records.len(),
        skipped = parsed.skipped.len(),
        "file parsed"
    );
    Ok(parsed)
}

/// Read, parse, and aggregate one LDIF file.
pub fn analyze_file<P>(parser: &P, path: &Path, policy: ParsePolicy) -> CompareResult<Stats>
where
    P: ChangeRecordParser + ?Sized,
{
    let parsed = load_records(parser, path, policy)?;
    Ok(analyze(&parsed.records))
}

/// Analyze two LDIF files and compare them.
///
/// The two analyses share nothing and run on separate scoped threads. If
/// both fail, the baseline error is reported.
pub fn compare_files<P>(
    parser: &P,
    baseline_path: &Path,
    new_path: &Path,
    config: &CompareConfig,
) -> CompareResult<ComparisonResult>
where
    P: ChangeRecordParser + ?Sized,
{
    let policy = config.parse_policy;
    let (baseline, new) = thread::scope(|scope| {
        let baseline = scope.spawn(|| analyze_file(parser, baseline_path, policy));
        let new = analyze_file(parser, new_path, policy);
        let baseline = baseline
            .join()
            .unwrap_or_else(|payload| panic::resume_unwind(payload));
        (baseline, new)
    });
    let (baseline, new) = (baseline?, new?);

    let result = compare_stats(&baseline, &new, &config.thresholds);
    info!(
        baseline = %baseline_path.display(),
        new = %new_path.display(),
        is_good = result.is_good,
        entry_diffs = result.entry_diffs.len(),
        "files compared"
    );
    Ok(result)
}
