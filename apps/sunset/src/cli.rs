//! CLI argument parsing via `clap`.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "sunset",
    version,
    about = "Escalate deprecation warnings to errors once their removal date arrives",
    long_about = "Sunset rewrites linter diagnostics: a warning whose text carries a removal date (\"will be removed in 2025-06-30\") becomes an error on or after that date.\n\nConfiguration precedence: CLI > sunset.toml > defaults.",
    after_help = "Examples:\n  eslint -f json src | sunset check -\n  sunset check reports/*.json --output json\n  sunset check eslint.json --pattern 'sunset=(\\d{4}/\\d{2}/\\d{2})' --write",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[arg(long, short, global = true, action = clap::ArgAction::SetTrue, help = "Enable debug logging (RUST_LOG overrides)")]
    pub verbose: bool,
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current sunset version.")]
    Version,
    /// Escalate diagnostics in report files
    #[command(
        about = "Escalate overdue warnings in diagnostic reports",
        long_about = "Read diagnostic reports (grouped, flat, or linter results JSON), escalate warnings whose removal date is today or past, and print the result. Exits 1 when any error remains.",
        after_help = "Examples:\n  sunset check reports/eslint.json\n  sunset check - --today 2025-01-01 < eslint.json"
    )]
    Check {
        #[arg(help = "Report files or globs; '-' reads stdin (default: [reports] from config, else stdin)")]
        inputs: Vec<String>,
        #[arg(long, help = "Repository root (default: current dir)")]
        repo_root: Option<String>,
        #[arg(long, help = "Removal date pattern with one capture group (case-insensitive)")]
        pattern: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(long, help = "Treat this YYYY-MM-DD date as today")]
        today: Option<NaiveDate>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Rewrite report files with escalated severities")]
        write: bool,
    },
}
