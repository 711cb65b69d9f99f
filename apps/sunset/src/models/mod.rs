//! Shared data models: diagnostic messages as the host hands them over, and
//! the check result structs consumed by printers.

use chrono::NaiveDate;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value as Json};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Severity of a diagnostic. Encoded as `1` (warning) and `2` (error) on the wire.
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    /// Numeric wire code.
    pub fn code(self) -> u8 {
        match self {
            Severity::Warning => 1,
            Severity::Error => 2,
        }
    }

    pub fn from_code(code: u64) -> Option<Self> {
        match code {
            1 => Some(Severity::Warning),
            2 => Some(Severity::Error),
            _ => None,
        }
    }

    pub fn as_label(self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }

    pub fn is_warning(self) -> bool {
        matches!(self, Severity::Warning)
    }

    pub fn is_error(self) -> bool {
        matches!(self, Severity::Error)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

impl Serialize for Severity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = u64::deserialize(deserializer)?;
        Severity::from_code(code).ok_or_else(|| {
            D::Error::custom(format!(
                "unsupported severity {}; expected 1 (warning) or 2 (error)",
                code
            ))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Json>", into = "Map<String, Json>")]
/// One finding from an analysis pass.
///
/// Only `severity` and `message` are interpreted. Everything else (`ruleId`,
/// `line`, `column`, `fix`, ...) lives in `fields` and round-trips verbatim,
/// including explicit `null`s. `message` is kept as raw JSON so that a
/// non-textual or missing body survives untouched. Keys are written back in
/// the order they were read.
pub struct DiagnosticMessage {
    pub severity: Severity,
    /// `Null` when the body was absent.
    pub message: Json,
    pub fields: Map<String, Json>,
    layout: KeyLayout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Original positions of `severity` and `message` among all keys.
struct KeyLayout {
    severity_at: usize,
    message_at: Option<usize>,
}

impl Default for KeyLayout {
    fn default() -> Self {
        KeyLayout {
            severity_at: 0,
            message_at: Some(1),
        }
    }
}

impl TryFrom<Map<String, Json>> for DiagnosticMessage {
    type Error = String;

    fn try_from(raw: Map<String, Json>) -> Result<Self, Self::Error> {
        let mut severity = None;
        let mut message = Json::Null;
        let mut layout = KeyLayout {
            severity_at: 0,
            message_at: None,
        };
        let mut fields = Map::new();
        for (i, (key, value)) in raw.into_iter().enumerate() {
            match key.as_str() {
                "severity" => {
                    let parsed =
                        serde_json::from_value::<Severity>(value).map_err(|e| e.to_string())?;
                    severity = Some(parsed);
                    layout.severity_at = i;
                }
                "message" => {
                    message = value;
                    layout.message_at = Some(i);
                }
                _ => {
                    fields.insert(key, value);
                }
            }
        }
        let severity = severity.ok_or_else(|| "missing field `severity`".to_string())?;
        Ok(DiagnosticMessage {
            severity,
            message,
            fields,
            layout,
        })
    }
}

impl From<DiagnosticMessage> for Map<String, Json> {
    fn from(msg: DiagnosticMessage) -> Self {
        let DiagnosticMessage {
            severity,
            message,
            fields,
            layout,
        } = msg;
        let mut entries: Vec<(String, Json)> = fields.into_iter().collect();
        let mut slots = vec![(layout.severity_at, "severity", Json::from(severity.code()))];
        match layout.message_at {
            Some(at) => slots.push((at, "message", message)),
            // body set after decoding a message that had none
            None if !message.is_null() => slots.push((layout.severity_at + 1, "message", message)),
            None => {}
        }
        slots.sort_by_key(|(at, _, _)| *at);
        for (at, key, value) in slots {
            entries.insert(at.min(entries.len()), (key.to_string(), value));
        }
        entries.into_iter().collect()
    }
}

/// All findings of one analysis sub-pass, in reporting order.
pub type MessageGroup = Vec<DiagnosticMessage>;

impl DiagnosticMessage {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        DiagnosticMessage {
            severity,
            message: Json::String(message.into()),
            fields: Map::new(),
            layout: KeyLayout::default(),
        }
    }

    /// Same message with a different severity; every other field is kept.
    pub fn with_severity(self, severity: Severity) -> Self {
        DiagnosticMessage { severity, ..self }
    }

    /// Builder-style helper to attach an extra field.
    pub fn with_field(mut self, key: &str, value: impl Into<Json>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    /// The message body when it is textual.
    pub fn text(&self) -> Option<&str> {
        self.message.as_str()
    }

    pub fn rule_id(&self) -> Option<&str> {
        self.fields.get("ruleId").and_then(Json::as_str)
    }

    pub fn line(&self) -> Option<u64> {
        self.fields.get("line").and_then(Json::as_u64)
    }

    pub fn column(&self) -> Option<u64> {
        self.fields.get("column").and_then(Json::as_u64)
    }

    /// Whether the host can auto-fix this finding.
    pub fn is_fixable(&self) -> bool {
        self.fields.get("fix").is_some_and(|f| !f.is_null())
    }

    /// Display form of the body; non-textual bodies are shown as compact JSON.
    pub fn display_text(&self) -> String {
        match &self.message {
            Json::String(s) => s.clone(),
            Json::Null => String::new(),
            other => other.to_string(),
        }
    }
}

#[derive(Serialize)]
/// A single diagnostic as reported by `sunset check`.
pub struct Finding {
    pub file: String,
    pub rule: Option<String>,
    pub severity: String,
    pub line: Option<u64>,
    pub column: Option<u64>,
    pub message: String,
    /// True when this run turned a warning into an error.
    pub escalated: bool,
}

#[derive(Serialize)]
/// A report that could not be read, decoded, or written back.
pub struct Failure {
    pub file: String,
    pub message: String,
}

#[derive(Serialize)]
/// Aggregated counts used by printers and the exit code.
pub struct Summary {
    pub errors: usize,
    pub warnings: usize,
    pub escalated: usize,
    pub reports: usize,
    pub failed: usize,
}

#[derive(Serialize)]
/// Result of a `sunset check` run.
pub struct CheckResult {
    pub today: NaiveDate,
    pub findings: Vec<Finding>,
    pub failures: Vec<Failure>,
    pub summary: Summary,
}
