//! Sunset CLI binary entry point.
//! Resolves configuration, runs the check, and prints results.

use clap::Parser;
use owo_colors::OwoColorize;
use sunset::check::{collect_sources, run_check};
use sunset::cli::{Cli, Commands};
use sunset::{config, logger, output};

fn error_prefix() -> String {
    if std::env::var_os("NO_COLOR").is_none() {
        "error:".red().bold().to_string()
    } else {
        "error:".to_string()
    }
}

fn main() {
    let cli = Cli::parse();
    logger::init_logger(cli.verbose);
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Check {
            inputs,
            repo_root,
            pattern,
            output,
            today,
            write,
        } => {
            let eff = match config::resolve_effective(
                repo_root.as_deref(),
                pattern.as_deref(),
                output.as_deref(),
                today,
                if write { Some(true) } else { None },
            ) {
                Ok(eff) => eff,
                Err(e) => {
                    eprintln!("{} {}", error_prefix(), e);
                    std::process::exit(2);
                }
            };
            if !eff.config_found {
                tracing::debug!("no sunset.toml found; using defaults");
            }
            // CLI inputs win; otherwise configured reports; otherwise stdin
            let inputs = if !inputs.is_empty() {
                inputs
            } else if !eff.reports.is_empty() {
                eff.reports.clone()
            } else {
                vec!["-".to_string()]
            };
            let sources = match collect_sources(&eff.repo_root, &inputs) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("{} {}", error_prefix(), e);
                    std::process::exit(2);
                }
            };
            tracing::debug!(
                pattern = eff.processor.pattern().as_str(),
                today = %eff.today,
                reports = sources.len(),
                "running check"
            );
            let result = run_check(&eff.repo_root, &sources, &eff.processor, eff.today, eff.write);
            output::print_check(&result, &eff.output);
            if result.summary.failed > 0 {
                std::process::exit(2);
            }
            if result.summary.errors > 0 {
                std::process::exit(1);
            }
        }
    }
}
