use std::fs;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{bail, Context};
use colored::Colorize;
use ldiff_compare::{
    compare_files, load_records, read_json_lines, write_entry_diffs, write_json_lines,
    CompareConfig, ParsePolicy,
};
use ldiff_diff::{write_unified_diff, EntryDiff, EntryDiffSummary};
use ldiff_parser::LdifParser;
use ldiff_stats::{analyze, ChangeSummary, ClassifiedRecord};
use serde_json::json;
use tracing::debug;

use crate::cli::*;
use crate::inspect;
use crate::report::{render_change_summary, render_comparison, DetailNote};

/// How a successful command ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// `compare` found the new file outside its thresholds.
    ThresholdsExceeded,
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Success => ExitCode::SUCCESS,
            Outcome::ThresholdsExceeded => ExitCode::from(1),
        }
    }
}

pub fn run_command(cli: Cli) -> anyhow::Result<Outcome> {
    let format = cli.format;
    match cli.command {
        Command::Compare(args) => cmd_compare(args, format),
        Command::Diff(args) => cmd_diff(args, format),
        Command::Analyze(args) => cmd_analyze(args, format),
        Command::Inspect(args) => cmd_inspect(args, format),
    }
}

fn policy(skip_parse_errors: bool) -> ParsePolicy {
    if skip_parse_errors {
        ParsePolicy::Skip
    } else {
        ParsePolicy::Abort
    }
}

/// Config file first, then any flags on top.
fn compare_config(args: &CompareArgs) -> anyhow::Result<CompareConfig> {
    let mut config = match &args.config {
        Some(path) => CompareConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => CompareConfig::default(),
    };

    if let Some(value) = args.entity_threshold {
        config.thresholds.entity_percent = value;
    }
    if let Some(value) = args.attribute_threshold {
        config.thresholds.attribute_percent = value;
    }
    if let Some(value) = args.avg_threshold {
        config.thresholds.avg_attributes_percent = value;
    }
    if args.skip_parse_errors {
        config.parse_policy = ParsePolicy::Skip;
    }
    Ok(config)
}

fn cmd_compare(args: CompareArgs, format: OutputFormat) -> anyhow::Result<Outcome> {
    let config = compare_config(&args)?;
    debug!(?config, "compare configuration");

    let result = compare_files(&LdifParser::new(), &args.baseline, &args.new, &config)
        .context("comparison failed")?;

    let detail = match &args.output {
        Some(path) if !result.entry_diffs.is_empty() => {
            let written = write_entry_diffs(&result.entry_diffs, path)
                .with_context(|| format!("failed to write {}", path.display()))?;
            DetailNote::Written { path, format: written }
        }
        _ => DetailNote::NotRequested,
    };

    match format {
        OutputFormat::Text => print!("{}", render_comparison(&result, detail)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
    }

    Ok(if result.is_good {
        Outcome::Success
    } else {
        Outcome::ThresholdsExceeded
    })
}

fn cmd_diff(args: DiffArgs, format: OutputFormat) -> anyhow::Result<Outcome> {
    let diff = write_unified_diff(&args.baseline, &args.new, &args.output, args.algorithm.into())?;

    match format {
        OutputFormat::Text => {
            println!("{} Unified diff written to: {}", "✓".green().bold(), args.output.display());
            println!(
                "  {} added, {} removed, {} modified",
                diff.additions().to_string().green(),
                diff.removals().to_string().red(),
                diff.modifications().to_string().yellow()
            );
        }
        OutputFormat::Json => println!(
            "{}",
            json!({
                "output": args.output.display().to_string(),
                "added": diff.additions(),
                "removed": diff.removals(),
                "modified": diff.modifications(),
            })
        ),
    }
    Ok(Outcome::Success)
}

fn cmd_analyze(args: AnalyzeArgs, format: OutputFormat) -> anyhow::Result<Outcome> {
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| args.input.with_extension("jsonl"));
    if output == args.input {
        bail!("output path {} would overwrite the input", output.display());
    }

    let parsed = load_records(&LdifParser::new(), &args.input, policy(args.skip_parse_errors))
        .with_context(|| format!("failed to analyze {}", args.input.display()))?;
    let classified: Vec<ClassifiedRecord<'_>> =
        parsed.records.iter().map(ClassifiedRecord::new).collect();
    write_json_lines(&classified, &output)
        .with_context(|| format!("failed to write {}", output.display()))?;

    let stats = analyze(&parsed.records);
    let mut summary = ChangeSummary::new();
    summary.extend(&parsed.records);

    match format {
        OutputFormat::Text => print!(
            "{}",
            render_change_summary(&stats, &summary, &parsed.skipped, &output)
        ),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "output": output.display().to_string(),
                "stats": stats,
                "summary": summary,
                "lostAttributes": summary.lost_attributes(),
                "skipped": parsed.skipped,
            }))?
        ),
    }
    Ok(Outcome::Success)
}

fn load_entry_diffs(path: &Path) -> anyhow::Result<Vec<EntryDiff>> {
    let (diffs, malformed) = read_json_lines(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    if malformed > 0 {
        eprintln!(
            "{} skipped {malformed} malformed line(s) in {}",
            "warning:".yellow().bold(),
            path.display()
        );
    }
    Ok(diffs)
}

fn cmd_inspect(args: InspectArgs, format: OutputFormat) -> anyhow::Result<Outcome> {
    let diffs = load_entry_diffs(&args.file)?;

    if let Some(csv) = &args.csv {
        fs::write(csv, inspect::render_csv(&diffs))
            .with_context(|| format!("failed to write {}", csv.display()))?;
    }

    if format == OutputFormat::Json {
        let matches = args
            .find
            .as_deref()
            .map(|pattern| inspect::find_matches(&diffs, pattern));
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "file": args.file.display().to_string(),
                "summary": EntryDiffSummary::from_diffs(&diffs),
                "matches": matches,
            }))?
        );
        return Ok(Outcome::Success);
    }

    println!("Loaded {} entries from {}\n", diffs.len(), args.file.display());
    if args.show_summary() {
        print!("{}", inspect::render_summary(&diffs));
    }
    if args.all || args.added {
        print!("{}", inspect::render_added(&diffs));
    }
    if args.all || args.removed {
        print!("{}", inspect::render_removed(&diffs));
    }
    if args.all || args.modified {
        print!("{}", inspect::render_modified(&diffs));
    }
    if let Some(pattern) = &args.find {
        print!("{}", inspect::render_find(&diffs, pattern));
    }
    if let Some(csv) = &args.csv {
        println!("{} Exported {} entries to {}", "✓".green(), diffs.len(), csv.display());
    }
    Ok(Outcome::Success)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    const BASELINE: &str = "version: 1

dn: cn=User01,ou=Users,dc=example,dc=com
changetype: add
objectClass: inetOrgPerson
cn: User01
mail: user01@example.com
";

    fn run(args: &[&str]) -> anyhow::Result<Outcome> {
        let mut argv = vec!["ldiff"];
        argv.extend_from_slice(args);
        run_command(Cli::try_parse_from(argv)?)
    }

    fn write(dir: &Path, name: &str, text: &str) -> String {
        let path = dir.join(name);
        fs::write(&path, text).unwrap();
        path.display().to_string()
    }

    #[test]
    fn compare_identical_files_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "a.ldif", BASELINE);
        let b = write(dir.path(), "b.ldif", BASELINE);
        assert_eq!(run(&["compare", a.as_str(), b.as_str()]).unwrap(), Outcome::Success);
    }

    #[test]
    fn compare_writes_jsonl_and_fails_thresholds() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "a.ldif", BASELINE);
        let b = write(
            dir.path(),
            "b.ldif",
            &format!("{BASELINE}\ndn: cn=User02,ou=Users,dc=example,dc=com\nchangetype: add\ncn: User02\n"),
        );
        let out = dir.path().join("diff.jsonl");

        let out_arg = out.display().to_string();
        let outcome = run(&["compare", a.as_str(), b.as_str(), "--output", out_arg.as_str()]).unwrap();
        assert_eq!(outcome, Outcome::ThresholdsExceeded);

        let (diffs, malformed): (Vec<EntryDiff>, usize) = read_json_lines(&out).unwrap();
        assert_eq!(malformed, 0);
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].dn, "cn=User02,ou=Users,dc=example,dc=com");
    }

    #[test]
    fn threshold_flags_override_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = write(dir.path(), "ldiff.toml", "[thresholds]\nentity_percent = 50.0\n");
        let cli = Cli::try_parse_from([
            "ldiff", "compare", "a", "b", "--config", config.as_str(), "--entity-threshold", "200",
        ])
        .unwrap();
        let Command::Compare(args) = cli.command else { panic!("wrong command") };

        let config = compare_config(&args).unwrap();
        assert_eq!(config.thresholds.entity_percent, 200.0);
        assert_eq!(config.thresholds.attribute_percent, 10.0);
        assert_eq!(config.parse_policy, ParsePolicy::Abort);
    }

    #[test]
    fn compare_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "a.ldif", BASELINE);
        let missing = dir.path().join("missing.ldif").display().to_string();
        assert!(run(&["compare", a.as_str(), missing.as_str()]).is_err());
    }

    #[test]
    fn diff_writes_output() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "a.ldif", BASELINE);
        let b = write(dir.path(), "b.ldif", &BASELINE.replace("user01@", "user01.new@"));
        let out = dir.path().join("out.diff");

        let out_arg = out.display().to_string();
        run(&["diff", a.as_str(), b.as_str(), out_arg.as_str()]).unwrap();
        let text = fs::read_to_string(&out).unwrap();
        assert!(text.contains("@@ Entry Modified: cn=User01,ou=Users,dc=example,dc=com @@\n"));
        assert!(text.contains("-mail: user01@example.com\n+mail: user01.new@example.com\n"));
    }

    #[test]
    fn analyze_writes_records_next_to_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(dir.path(), "in.ldif", BASELINE);

        run(&["analyze", input.as_str()]).unwrap();
        let text = fs::read_to_string(dir.path().join("in.jsonl")).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with(r#"{"changeType":"Add","dn":"cn=User01,ou=Users,dc=example,dc=com""#));
        assert!(text.trim_end().ends_with(r#""isUser":true}"#));
    }

    #[test]
    fn analyze_refuses_to_overwrite_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(dir.path(), "in.jsonl", BASELINE);
        assert!(run(&["analyze", input.as_str()]).is_err());
    }

    #[test]
    fn inspect_exports_csv() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "a.ldif", BASELINE);
        let b = write(dir.path(), "b.ldif", "");
        let jsonl = dir.path().join("diff.jsonl").display().to_string();
        let csv = dir.path().join("diff.csv");

        let csv_arg = csv.display().to_string();
        run(&["compare", a.as_str(), b.as_str(), "-o", jsonl.as_str()]).unwrap();
        run(&["inspect", jsonl.as_str(), "--csv", csv_arg.as_str()]).unwrap();

        let text = fs::read_to_string(&csv).unwrap();
        assert!(text.contains(r#""cn=User01,ou=Users,dc=example,dc=com","Removed","Add","",3,0,3"#));
    }
}
