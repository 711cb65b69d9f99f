//! Configuration discovery and effective settings resolution.
//!
//! Sunset reads `sunset.toml|yaml|yml` from the repository root (or closest
//! ancestor) and merges it with CLI flags to produce an `Effective` config.
//! Defaults:
//! - `removalPattern`: the built-in "will be removed in YYYY-MM-DD" pattern
//! - `output`: `human`
//! - `reports`: none (stdin)
//! - `today`: the local date, sampled once per run
//! - `write`: false
//!
//! Overrides precedence: CLI > config file > defaults.

use crate::decide;
use crate::error::{Result, SunsetError};
use crate::escalate::{ProcessorConfig, SunsetProcessor};
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILES: [&str; 3] = ["sunset.toml", "sunset.yaml", "sunset.yml"];

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `sunset.toml|yaml`.
pub struct SunsetConfig {
    #[serde(default, rename = "removalPattern", alias = "removalRegex")]
    pub removal_pattern: Option<String>,
    pub output: Option<String>,
    /// Report files or globs, relative to the repository root.
    #[serde(default)]
    pub reports: Option<Vec<String>>,
    /// Fixed "today" as `YYYY-MM-DD`, for reproducible runs.
    pub today: Option<String>,
    pub write: Option<bool>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub repo_root: PathBuf,
    pub config_found: bool,
    pub processor: SunsetProcessor,
    pub output: String,
    pub reports: Vec<String>,
    pub today: NaiveDate,
    pub write: bool,
}

/// Walk upward from `start` to detect the repository root.
///
/// Stops when a `sunset.toml|yaml|yml` or a `.git` directory is found.
pub fn detect_repo_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if CONFIG_FILES.iter().any(|f| cur.join(f).exists()) || cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Load `SunsetConfig` from `sunset.toml` or `sunset.yaml|yml` if present.
///
/// A config file that exists but does not parse is an error rather than a
/// silent fallback to defaults.
pub fn load_config(root: &Path) -> Result<Option<SunsetConfig>> {
    for name in CONFIG_FILES {
        let p = root.join(name);
        if !p.exists() {
            continue;
        }
        let s = fs::read_to_string(&p).map_err(|source| SunsetError::Io {
            path: p.clone(),
            source,
        })?;
        let parsed = if name.ends_with(".toml") {
            toml::from_str::<SunsetConfig>(&s).map_err(|e| e.to_string())
        } else {
            serde_yaml::from_str::<SunsetConfig>(&s).map_err(|e| e.to_string())
        };
        return parsed.map(Some).map_err(|e| SunsetError::Config {
            message: format!("{}: {}", p.to_string_lossy(), e),
        });
    }
    Ok(None)
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
///
/// The removal pattern is compiled here, once, so a broken custom pattern
/// stops the run before any report is touched.
pub fn resolve_effective(
    cli_repo_root: Option<&str>,
    cli_pattern: Option<&str>,
    cli_output: Option<&str>,
    cli_today: Option<NaiveDate>,
    cli_write: Option<bool>,
) -> Result<Effective> {
    let start = PathBuf::from(cli_repo_root.unwrap_or("."));
    let repo_root = detect_repo_root(&start);
    let loaded = load_config(&repo_root)?;
    let config_found = loaded.is_some();
    let cfg = loaded.unwrap_or_default();

    let processor_cfg = ProcessorConfig {
        removal_pattern: cli_pattern
            .map(|s| s.to_string())
            .or(cfg.removal_pattern),
    };
    let processor = SunsetProcessor::from_config(&processor_cfg)?;

    let output = cli_output
        .map(|s| s.to_string())
        .or(cfg.output)
        .unwrap_or_else(|| "human".to_string());
    if output != "human" && output != "json" {
        return Err(SunsetError::Config {
            message: format!("unknown output mode '{}'; expected human or json", output),
        });
    }

    let cfg_today = match cfg.today.as_deref() {
        Some(s) => Some(s.trim().parse::<NaiveDate>().map_err(|e| SunsetError::Config {
            message: format!("today = '{}' is not a YYYY-MM-DD date: {}", s, e),
        })?),
        None => None,
    };
    let today = cli_today.or(cfg_today).unwrap_or_else(decide::today);

    let write = cli_write.or(cfg.write).unwrap_or(false);

    Ok(Effective {
        repo_root,
        config_found,
        processor,
        output,
        reports: cfg.reports.unwrap_or_default(),
        today,
        write,
    })
}
