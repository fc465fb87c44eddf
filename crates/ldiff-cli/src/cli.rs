use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use ldiff_diff::LineDiffAlgorithm;

#[derive(Parser)]
#[command(
    name = "ldiff",
    about = "LDIF change-file analysis, comparison, and diff",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Algorithm {
    Greedy,
    Myers,
}

impl From<Algorithm> for LineDiffAlgorithm {
    fn from(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Greedy => Self::Greedy,
            Algorithm::Myers => Self::Myers,
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Compare a new LDIF file against a baseline
    Compare(CompareArgs),
    /// Write a unified diff of two LDIF files, grouped by DN
    Diff(DiffArgs),
    /// Convert one LDIF file to JSON Lines and summarize its changes
    Analyze(AnalyzeArgs),
    /// Report on an entry-diff JSON Lines file written by `compare`
    Inspect(InspectArgs),
}

#[derive(Args)]
pub struct CompareArgs {
    pub baseline: PathBuf,
    pub new: PathBuf,
    /// Write detailed entry diffs here (`.jsonl` for JSON Lines, otherwise text)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    #[arg(long, allow_negative_numbers = true)]
    pub entity_threshold: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    pub attribute_threshold: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    pub avg_threshold: Option<f64>,
    /// TOML configuration file; flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub skip_parse_errors: bool,
}

#[derive(Args)]
pub struct DiffArgs {
    pub baseline: PathBuf,
    pub new: PathBuf,
    pub output: PathBuf,
    #[arg(long, value_enum, default_value_t = Algorithm::Greedy)]
    pub algorithm: Algorithm,
}

#[derive(Args)]
pub struct AnalyzeArgs {
    pub input: PathBuf,
    /// Defaults to the input path with a `.jsonl` extension
    pub output: Option<PathBuf>,
    #[arg(long)]
    pub skip_parse_errors: bool,
}

#[derive(Args)]
pub struct InspectArgs {
    pub file: PathBuf,
    #[arg(long)]
    pub summary: bool,
    #[arg(long)]
    pub added: bool,
    #[arg(long)]
    pub removed: bool,
    #[arg(long)]
    pub modified: bool,
    /// Show entries whose DN contains this text (case-insensitive)
    #[arg(long)]
    pub find: Option<String>,
    /// Export every entry diff to a CSV file
    #[arg(long)]
    pub csv: Option<PathBuf>,
    #[arg(long)]
    pub all: bool,
}

impl InspectArgs {
    /// The summary is shown when asked for, or when nothing else is.
    pub fn show_summary(&self) -> bool {
        self.summary
            || self.all
            || !(self.added || self.removed || self.modified || self.find.is_some() || self.csv.is_some())
    }
}
