//! Output rendering for `sunset check`.
//!
//! Supports `human` (default) and `json` outputs. The JSON form includes
//! per-finding fields, failures, and a top-level summary.

use crate::models::{CheckResult, Finding};
use owo_colors::OwoColorize;
use serde_json::Value as JsonVal;

fn use_colors(output: &str) -> bool {
    output != "json" && std::env::var_os("NO_COLOR").is_none()
}

fn location(f: &Finding) -> String {
    match (f.line, f.column) {
        (Some(l), Some(c)) => format!("{}:{}:{}", f.file, l, c),
        (Some(l), None) => format!("{}:{}", f.file, l),
        _ => f.file.clone(),
    }
}

/// Render one finding as a single human-readable line.
pub fn human_line(f: &Finding, color: bool) -> String {
    let (icon, sev) = match (f.severity.as_str(), color) {
        ("error", true) => ("✖".red().to_string(), "⟦error⟧".red().bold().to_string()),
        ("error", false) => ("✖".to_string(), "⟦error⟧".to_string()),
        (_, true) => ("▲".yellow().to_string(), "⟦warn⟧".yellow().bold().to_string()),
        (_, false) => ("▲".to_string(), "⟦warn⟧".to_string()),
    };
    let loc = if color {
        location(f).bold().to_string()
    } else {
        location(f)
    };
    let rule = f.rule.as_deref().unwrap_or("-");
    let mut line = format!("{} {} {} ❲{}❳ — {}", icon, sev, loc, rule, f.message);
    if f.escalated {
        if color {
            line.push_str(&format!(" {}", "(escalated: removal date reached)".magenta()));
        } else {
            line.push_str(" (escalated: removal date reached)");
        }
    }
    line
}

/// Print check results in the requested format.
pub fn print_check(res: &CheckResult, output: &str) {
    match output {
        "json" => match serde_json::to_string_pretty(&compose_check_json(res)) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("failed to render JSON output: {}", e),
        },
        _ => {
            let color = use_colors(output);
            for f in &res.findings {
                println!("{}", human_line(f, color));
            }
            for fail in &res.failures {
                if color {
                    eprintln!(
                        "{} {} — {}",
                        "⟦fail⟧".red().bold(),
                        fail.file.bold(),
                        fail.message
                    );
                } else {
                    eprintln!("⟦fail⟧ {} — {}", fail.file, fail.message);
                }
            }
            let summary = format!(
                "— Summary — errors={} warnings={} escalated={} reports={} failed={} today={}",
                res.summary.errors,
                res.summary.warnings,
                res.summary.escalated,
                res.summary.reports,
                res.summary.failed,
                res.today
            );
            if color {
                println!("{}", summary.bold());
            } else {
                println!("{}", summary);
            }
        }
    }
}

/// Compose check JSON object (pure) for testing/snapshot purposes.
pub fn compose_check_json(res: &CheckResult) -> JsonVal {
    // Directly serialize CheckResult as JSON, keeping stable shape
    serde_json::to_value(res).unwrap_or(JsonVal::Null)
}
