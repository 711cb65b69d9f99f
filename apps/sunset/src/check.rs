//! Check runner: escalate every report matched by the inputs.
//!
//! Each report is an independent postprocess invocation, so reports are
//! processed in parallel. Findings are ordered by report then position in
//! the report, which keeps output deterministic.

use crate::error::{Result, SunsetError};
use crate::escalate::SunsetProcessor;
use crate::models::{CheckResult, Failure, Finding, Summary};
use crate::report::process_report;
use chrono::NaiveDate;
use glob::glob;
use rayon::prelude::*;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Where a report comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportSource {
    Path(PathBuf),
    Stdin,
}

fn has_glob_meta(s: &str) -> bool {
    s.contains(|c: char| matches!(c, '*' | '?' | '['))
}

/// Resolve CLI/config inputs against `root`.
///
/// `-` means stdin. Glob patterns expand to the files they match (sorted);
/// plain paths are kept even when missing so the failure gets reported.
pub fn collect_sources(root: &Path, inputs: &[String]) -> Result<Vec<ReportSource>> {
    let mut out: Vec<ReportSource> = Vec::new();
    for input in inputs {
        if input == "-" {
            if !out.contains(&ReportSource::Stdin) {
                out.push(ReportSource::Stdin);
            }
            continue;
        }
        if has_glob_meta(input) {
            let pattern = root.join(input).to_string_lossy().to_string();
            let entries = glob(&pattern).map_err(|source| SunsetError::Glob {
                pattern: input.clone(),
                source,
            })?;
            let mut matched: Vec<PathBuf> = entries.flatten().filter(|p| p.is_file()).collect();
            matched.sort();
            if matched.is_empty() {
                warn!(pattern = %input, "report pattern matched no files");
            }
            for p in matched {
                let src = ReportSource::Path(p);
                if !out.contains(&src) {
                    out.push(src);
                }
            }
        } else {
            let src = ReportSource::Path(root.join(input));
            if !out.contains(&src) {
                out.push(src);
            }
        }
    }
    Ok(out)
}

/// Path relative to `root` when possible, for display.
pub fn display_path(root: &Path, path: &Path) -> String {
    if path.is_absolute() {
        if let Some(rel) = pathdiff::diff_paths(path, root) {
            if !rel.starts_with("..") {
                return rel.to_string_lossy().to_string();
            }
        }
    }
    path.to_string_lossy().to_string()
}

struct Outcome {
    label: String,
    findings: Vec<Finding>,
    escalated: usize,
    failure: Option<String>,
}

fn failed(label: String, err: SunsetError) -> Outcome {
    warn!(report = %label, error = %err, "report skipped");
    Outcome {
        label,
        findings: Vec::new(),
        escalated: 0,
        failure: Some(err.to_string()),
    }
}

fn check_one(
    root: &Path,
    label: String,
    text: &str,
    write_to: Option<&Path>,
    processor: &SunsetProcessor,
    today: NaiveDate,
) -> Outcome {
    let report = match process_report(&label, text, processor, today) {
        Ok(r) => r,
        Err(e) => return failed(label, e),
    };
    if let Some(path) = write_to {
        if report.escalated_count() > 0 {
            let written = report.to_pretty_json().and_then(|s| {
                fs::write(path, s).map_err(|source| SunsetError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            });
            if let Err(e) = written {
                return failed(label, e);
            }
        }
    }
    let escalated = report.escalated_count();
    info!(report = %label, escalated, "report processed");
    let mut findings = report.findings();
    for f in findings.iter_mut() {
        f.file = display_path(root, Path::new(&f.file));
    }
    Outcome {
        label,
        findings,
        escalated,
        failure: None,
    }
}

/// Run the escalator over all `sources` and aggregate the result.
///
/// With `write`, report files that had escalations are rewritten in place;
/// stdin is never written back.
pub fn run_check(
    root: &Path,
    sources: &[ReportSource],
    processor: &SunsetProcessor,
    today: NaiveDate,
    write: bool,
) -> CheckResult {
    let mut outcomes: Vec<Outcome> = Vec::new();

    if sources.contains(&ReportSource::Stdin) {
        let mut buf = String::new();
        match std::io::stdin().read_to_string(&mut buf) {
            Ok(_) => {
                if write {
                    warn!("--write has no effect on stdin");
                }
                outcomes.push(check_one(root, "<stdin>".into(), &buf, None, processor, today));
            }
            Err(source) => outcomes.push(failed(
                "<stdin>".into(),
                SunsetError::Io {
                    path: PathBuf::from("<stdin>"),
                    source,
                },
            )),
        }
    }

    let paths: Vec<&PathBuf> = sources
        .iter()
        .filter_map(|s| match s {
            ReportSource::Path(p) => Some(p),
            ReportSource::Stdin => None,
        })
        .collect();
    let mut per_file: Vec<Outcome> = paths
        .par_iter()
        .map(|path| {
            let label = display_path(root, path);
            match fs::read_to_string(path) {
                Ok(text) => check_one(
                    root,
                    label,
                    &text,
                    if write { Some(path.as_path()) } else { None },
                    processor,
                    today,
                ),
                Err(source) => failed(
                    label,
                    SunsetError::Io {
                        path: path.to_path_buf(),
                        source,
                    },
                ),
            }
        })
        .collect();
    per_file.sort_by(|a, b| a.label.cmp(&b.label));
    outcomes.extend(per_file);

    let reports = outcomes.len();
    let mut findings: Vec<Finding> = Vec::new();
    let mut failures: Vec<Failure> = Vec::new();
    let mut escalated = 0usize;
    for o in outcomes {
        escalated += o.escalated;
        if let Some(message) = o.failure {
            failures.push(Failure {
                file: o.label,
                message,
            });
        }
        findings.extend(o.findings);
    }
    let errors = findings.iter().filter(|f| f.severity == "error").count();
    let warnings = findings.len() - errors;
    CheckResult {
        today,
        summary: Summary {
            errors,
            warnings,
            escalated,
            reports,
            failed: failures.len(),
        },
        findings,
        failures,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    const PAST: &str = r#"[[{"ruleId":"dep","severity":1,"message":"will be removed in 2001-01-01","line":4}]]"#;
    const FUTURE: &str = r#"[[{"ruleId":"dep","severity":1,"message":"will be removed in 2999-01-01"}]]"#;

    #[test]
    fn test_collect_sources_expands_globs_and_keeps_plain_paths() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("reports")).unwrap();
        fs::write(root.join("reports/b.json"), "[]").unwrap();
        fs::write(root.join("reports/a.json"), "[]").unwrap();
        fs::write(root.join("reports/notes.txt"), "").unwrap();
        let inputs = vec![
            "reports/*.json".to_string(),
            "reports/a.json".to_string(),
            "missing.json".to_string(),
            "-".to_string(),
        ];
        let sources = collect_sources(root, &inputs).unwrap();
        assert_eq!(
            sources,
            vec![
                ReportSource::Path(root.join("reports/a.json")),
                ReportSource::Path(root.join("reports/b.json")),
                ReportSource::Path(root.join("missing.json")),
                ReportSource::Stdin,
            ]
        );
        assert!(collect_sources(root, &["reports/[.json".to_string()]).is_err());
    }

    #[test]
    fn test_run_check_escalates_and_summarizes() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        fs::write(root.join("past.json"), PAST).unwrap();
        fs::write(root.join("future.json"), FUTURE).unwrap();
        fs::write(root.join("broken.json"), "{").unwrap();
        let inputs = ["*.json".to_string(), "gone.json".to_string()];
        let sources = collect_sources(root, &inputs).unwrap();
        let res = run_check(root, &sources, &SunsetProcessor::default(), today(), false);
        assert_eq!(res.summary.reports, 4);
        assert_eq!(res.summary.errors, 1);
        assert_eq!(res.summary.warnings, 1);
        assert_eq!(res.summary.escalated, 1);
        assert_eq!(res.summary.failed, 2);
        let files: Vec<_> = res.findings.iter().map(|f| f.file.as_str()).collect();
        assert_eq!(files, ["future.json", "past.json"]);
        assert!(res.findings[1].escalated);
        assert_eq!(res.findings[1].line, Some(4));
        // without --write nothing on disk changes
        assert_eq!(fs::read_to_string(root.join("past.json")).unwrap(), PAST);
    }

    #[test]
    fn test_run_check_write_rewrites_only_escalated_reports() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        fs::write(root.join("past.json"), PAST).unwrap();
        fs::write(root.join("future.json"), FUTURE).unwrap();
        let sources = collect_sources(root, &["*.json".to_string()]).unwrap();
        let res = run_check(root, &sources, &SunsetProcessor::default(), today(), true);
        assert_eq!(res.summary.escalated, 1);
        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(root.join("past.json")).unwrap()).unwrap();
        assert_eq!(written[0]["severity"], serde_json::json!(2));
        assert_eq!(written[0]["line"], serde_json::json!(4));
        assert_eq!(fs::read_to_string(root.join("future.json")).unwrap(), FUTURE);
        // a second run finds nothing new to escalate
        let again = run_check(root, &sources, &SunsetProcessor::default(), today(), true);
        assert_eq!(again.summary.escalated, 0);
        assert_eq!(again.summary.errors, 1);
    }

    #[test]
    fn test_display_path_relative_to_root() {
        let root = Path::new("/repo");
        assert_eq!(display_path(root, Path::new("/repo/src/a.js")), "src/a.js");
        assert_eq!(display_path(root, Path::new("/elsewhere/a.js")), "/elsewhere/a.js");
        assert_eq!(display_path(root, Path::new("rel/a.js")), "rel/a.js");
    }
}
