//! Removal-date extraction from free-form diagnostic text.
//!
//! An `ExtractionPattern` is a case-insensitive regex whose first capture
//! group yields a calendar date. Extraction only applies to warnings with a
//! textual body; anything that does not produce a valid date is "no date".

use crate::error::{Result, SunsetError};
use crate::models::DiagnosticMessage;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;
use tracing::trace;

/// Pattern used when no custom `removalPattern` is configured.
/// Digits are ASCII only; a Unicode `\d` would capture dates that never parse.
pub const DEFAULT_REMOVAL_PATTERN: &str = r"will be removed in\s+([0-9]{4}-[0-9]{2}-[0-9]{2})";

static DEFAULT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    RegexBuilder::new(DEFAULT_REMOVAL_PATTERN)
        .case_insensitive(true)
        .build()
        .expect("default removal pattern is a valid regex")
});

/// Date shapes accepted for a captured string, tried in order.
/// Year-first or month-named only; `01/02/2025` style is ambiguous and rejected.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

#[derive(Debug, Clone)]
/// Compiled single-capture-group pattern.
pub struct ExtractionPattern {
    regex: Regex,
}

impl Default for ExtractionPattern {
    fn default() -> Self {
        ExtractionPattern {
            regex: DEFAULT_REGEX.clone(),
        }
    }
}

impl ExtractionPattern {
    /// Compile a caller-supplied pattern, case-insensitively.
    ///
    /// Fails when the regex is malformed or has no capture group to read the
    /// date from.
    pub fn compile(pattern: &str) -> Result<Self> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| SunsetError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;
        // captures_len counts the implicit whole-match group
        if regex.captures_len() < 2 {
            return Err(SunsetError::MissingCaptureGroup {
                pattern: pattern.to_string(),
            });
        }
        Ok(ExtractionPattern { regex })
    }

    /// Custom pattern when given and non-empty, otherwise the default.
    pub fn resolve(custom: Option<&str>) -> Result<Self> {
        match custom {
            Some(p) if !p.is_empty() => Self::compile(p),
            _ => Ok(Self::default()),
        }
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// First capture group of the first match in `text`.
    pub fn capture<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.regex
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    /// Removal date carried by `message`, if it is eligible and has one.
    pub fn extract(&self, message: &DiagnosticMessage) -> Option<NaiveDate> {
        if !message.severity.is_warning() {
            return None;
        }
        let raw = self.capture(message.text()?)?;
        let date = parse_date(raw);
        if date.is_none() {
            trace!(captured = raw, "captured removal date is not a calendar date");
        }
        date
    }
}

/// Parse a captured date string into a calendar date.
///
/// Date-times are accepted and truncated to their date in the offset they
/// were written in.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Some(d) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
    {
        return Some(d);
    }
    // compact YYYYMMDD
    if s.len() == 8 && s.bytes().all(|b| b.is_ascii_digit()) {
        let y = s[..4].parse().ok()?;
        let m = s[4..6].parse().ok()?;
        let d = s[6..].parse().ok()?;
        return NaiveDate::from_ymd_opt(y, m, d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|dt| dt.date())
}
