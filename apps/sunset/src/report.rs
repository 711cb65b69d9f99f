//! Diagnostic report documents: decoding, escalation, and re-encoding.
//!
//! Three JSON shapes are recognized:
//! - grouped: `[[message, ...], ...]`, the shape a host passes to postprocess
//! - flat: `[message, ...]`, what postprocess returns
//! - results: `[{"filePath": ..., "messages": [...], ...}]`, a linter's JSON
//!   formatter output; count fields are recomputed after escalation
//!
//! An empty array decodes as grouped. Flat and grouped documents are written
//! back flat; results documents keep their shape.

use crate::error::{Result, SunsetError};
use crate::escalate::SunsetProcessor;
use crate::models::{DiagnosticMessage, Finding, MessageGroup, Severity};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};

#[derive(Debug, Clone, Serialize, Deserialize)]
/// One linted file inside a results document.
pub struct FileResult {
    #[serde(rename = "filePath")]
    pub file_path: String,
    pub messages: Vec<DiagnosticMessage>,
    #[serde(flatten)]
    pub rest: Map<String, Json>,
}

#[derive(Debug)]
enum Document {
    Grouped(Vec<MessageGroup>),
    Results(Vec<FileResult>),
}

/// Messages of one linted file after escalation.
pub struct ReportEntry {
    pub file: String,
    pub messages: Vec<DiagnosticMessage>,
    /// Parallel to `messages`: whether this run escalated it.
    pub escalated: Vec<bool>,
}

/// A fully processed report document.
pub struct ProcessedReport {
    pub origin: String,
    /// Escalated document, ready to be written back.
    pub document: Json,
    pub entries: Vec<ReportEntry>,
}

impl ProcessedReport {
    pub fn escalated_count(&self) -> usize {
        self.entries
            .iter()
            .map(|e| e.escalated.iter().filter(|x| **x).count())
            .sum()
    }

    /// Flatten entries into printable findings.
    pub fn findings(&self) -> Vec<Finding> {
        self.entries
            .iter()
            .flat_map(|entry| {
                entry
                    .messages
                    .iter()
                    .zip(entry.escalated.iter())
                    .map(move |(m, esc)| Finding {
                        file: entry.file.clone(),
                        rule: m.rule_id().map(str::to_string),
                        severity: m.severity.as_label().to_string(),
                        line: m.line(),
                        column: m.column(),
                        message: m.display_text(),
                        escalated: *esc,
                    })
            })
            .collect()
    }

    /// Pretty JSON with a trailing newline.
    pub fn to_pretty_json(&self) -> Result<String> {
        let mut out =
            serde_json::to_string_pretty(&self.document).map_err(|source| SunsetError::Encode {
                origin: self.origin.clone(),
                source,
            })?;
        out.push('\n');
        Ok(out)
    }
}

fn decode(origin: &str, text: &str) -> Result<Document> {
    let err = |source| SunsetError::Decode {
        origin: origin.to_string(),
        source,
    };
    let value: Json = serde_json::from_str(text).map_err(err)?;
    let is_results = value
        .as_array()
        .and_then(|items| items.first())
        .and_then(Json::as_object)
        .is_some_and(|first| first.contains_key("filePath") || first.contains_key("messages"));
    let is_flat = !is_results
        && value
            .as_array()
            .and_then(|items| items.first())
            .is_some_and(Json::is_object);
    if is_results {
        serde_json::from_value(value).map(Document::Results).map_err(err)
    } else if is_flat {
        serde_json::from_value::<MessageGroup>(value)
            .map(|flat| Document::Grouped(vec![flat]))
            .map_err(err)
    } else {
        serde_json::from_value(value).map(Document::Grouped).map_err(err)
    }
}

fn severities<'a>(messages: impl IntoIterator<Item = &'a DiagnosticMessage>) -> Vec<Severity> {
    messages.into_iter().map(|m| m.severity).collect()
}

fn escalation_marks(before: &[Severity], after: &[DiagnosticMessage]) -> Vec<bool> {
    before
        .iter()
        .zip(after)
        .map(|(b, a)| b.is_warning() && a.severity.is_error())
        .collect()
}

/// Overwrite count fields that the input already carries.
fn recount(rest: &mut Map<String, Json>, messages: &[DiagnosticMessage]) {
    let count = |sev: Severity, fixable: bool| {
        messages
            .iter()
            .filter(|m| m.severity == sev && (!fixable || m.is_fixable()))
            .count()
    };
    let counts = [
        ("errorCount", count(Severity::Error, false)),
        ("warningCount", count(Severity::Warning, false)),
        ("fixableErrorCount", count(Severity::Error, true)),
        ("fixableWarningCount", count(Severity::Warning, true)),
    ];
    for (key, n) in counts {
        if let Some(slot) = rest.get_mut(key) {
            *slot = Json::from(n);
        }
    }
}

/// Decode `text`, escalate it with `processor` against `today`, and build
/// the rewritten document.
pub fn process_report(
    origin: &str,
    text: &str,
    processor: &SunsetProcessor,
    today: NaiveDate,
) -> Result<ProcessedReport> {
    match decode(origin, text)? {
        Document::Grouped(groups) => {
            let before = severities(groups.iter().flatten());
            let messages = processor.postprocess_at(groups, origin, today);
            let escalated = escalation_marks(&before, &messages);
            let document = serde_json::to_value(&messages).map_err(|source| SunsetError::Encode {
                origin: origin.to_string(),
                source,
            })?;
            Ok(ProcessedReport {
                origin: origin.to_string(),
                document,
                entries: vec![ReportEntry {
                    file: origin.to_string(),
                    messages,
                    escalated,
                }],
            })
        }
        Document::Results(results) => {
            let mut entries = Vec::with_capacity(results.len());
            let mut rewritten = Vec::with_capacity(results.len());
            for FileResult {
                file_path,
                messages,
                mut rest,
            } in results
            {
                let before = severities(&messages);
                let messages = processor.postprocess_at(vec![messages], &file_path, today);
                let escalated = escalation_marks(&before, &messages);
                recount(&mut rest, &messages);
                rewritten.push(FileResult {
                    file_path: file_path.clone(),
                    messages: messages.clone(),
                    rest,
                });
                entries.push(ReportEntry {
                    file: file_path,
                    messages,
                    escalated,
                });
            }
            let document = serde_json::to_value(&rewritten).map_err(|source| SunsetError::Encode {
                origin: origin.to_string(),
                source,
            })?;
            Ok(ProcessedReport {
                origin: origin.to_string(),
                document,
                entries,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn run(doc: Json) -> ProcessedReport {
        let p = SunsetProcessor::default();
        process_report("report.json", &doc.to_string(), &p, today()).unwrap()
    }

    #[test]
    fn test_grouped_document_is_flattened_and_escalated() {
        let rep = run(json!([
            [{"ruleId": "a", "severity": 1, "message": "will be removed in 2000-01-01"}],
            [{"ruleId": "b", "severity": 1, "message": "will be removed in 2999-01-01"}]
        ]));
        assert_eq!(
            rep.document,
            json!([
                {"ruleId": "a", "severity": 2, "message": "will be removed in 2000-01-01"},
                {"ruleId": "b", "severity": 1, "message": "will be removed in 2999-01-01"}
            ])
        );
        assert_eq!(rep.entries.len(), 1);
        assert_eq!(rep.entries[0].escalated, vec![true, false]);
        assert_eq!(rep.escalated_count(), 1);
    }

    #[test]
    fn test_flat_document_round_trips_and_is_stable() {
        let rep = run(json!([
            {"ruleId": "a", "severity": 1, "message": "will be removed in 2000-01-01"}
        ]));
        assert_eq!(rep.document[0]["severity"], json!(2));
        // a second pass over the written document changes nothing
        let again = run(rep.document.clone());
        assert_eq!(again.document, rep.document);
        assert_eq!(again.escalated_count(), 0);
    }

    #[test]
    fn test_results_document_recounts() {
        let rep = run(json!([
            {
                "filePath": "/repo/src/a.js",
                "messages": [
                    {"ruleId": "dep", "severity": 1, "message": "will be removed in 2020-01-01",
                     "fix": {"range": [0, 1], "text": ""}},
                    {"ruleId": "no-console", "severity": 1, "message": "Unexpected console statement."}
                ],
                "suppressedMessages": [],
                "errorCount": 0,
                "fatalErrorCount": 0,
                "warningCount": 2,
                "fixableErrorCount": 0,
                "fixableWarningCount": 1,
                "source": "console.log(1)"
            },
            {"filePath": "/repo/src/b.js", "messages": [], "errorCount": 0, "warningCount": 0}
        ]));
        let a = &rep.document[0];
        assert_eq!(a["messages"][0]["severity"], json!(2));
        assert_eq!(a["messages"][1]["severity"], json!(1));
        assert_eq!(a["errorCount"], json!(1));
        assert_eq!(a["warningCount"], json!(1));
        assert_eq!(a["fixableErrorCount"], json!(1));
        assert_eq!(a["fixableWarningCount"], json!(0));
        assert_eq!(a["fatalErrorCount"], json!(0));
        assert_eq!(a["source"], json!("console.log(1)"));
        assert_eq!(rep.entries.len(), 2);
        let findings = rep.findings();
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].file, "/repo/src/a.js");
        assert!(findings[0].escalated);
        assert_eq!(findings[0].severity, "error");
        assert!(!findings[1].escalated);
    }

    #[test]
    fn test_message_without_body_passes_through() {
        let rep = run(json!([[
            {"severity": 1, "ruleId": "x"},
            {"severity": 1, "message": "will be removed in 2000-01-01"}
        ]]));
        assert_eq!(
            rep.document,
            json!([
                {"severity": 1, "ruleId": "x"},
                {"severity": 2, "message": "will be removed in 2000-01-01"}
            ])
        );
        assert_eq!(rep.entries[0].escalated, vec![false, true]);
        let findings = rep.findings();
        assert_eq!(findings[0].message, "");
        assert_eq!(findings[1].severity, "error");
    }

    #[test]
    fn test_write_back_keeps_key_order() {
        let text = r#"[{"ruleId":"a","severity":1,"message":"will be removed in 2000-01-01","line":1}]"#;
        let p = SunsetProcessor::default();
        let rep = process_report("r.json", text, &p, today()).unwrap();
        assert_eq!(
            serde_json::to_string(&rep.document).unwrap(),
            r#"[{"ruleId":"a","severity":2,"message":"will be removed in 2000-01-01","line":1}]"#
        );
    }

    #[test]
    fn test_missing_count_fields_are_not_added() {
        let rep = run(json!([{"filePath": "x.js", "messages": []}]));
        assert_eq!(rep.document, json!([{"filePath": "x.js", "messages": []}]));
    }

    #[test]
    fn test_empty_document() {
        let rep = run(json!([]));
        assert_eq!(rep.document, json!([]));
        assert!(rep.findings().is_empty());
    }

    #[test]
    fn test_undecodable_documents() {
        let p = SunsetProcessor::default();
        assert!(matches!(
            process_report("bad.json", "{not json", &p, today()),
            Err(SunsetError::Decode { .. })
        ));
        let off = r#"[[{"severity": 0, "message": "off"}]]"#;
        assert!(process_report("bad.json", off, &p, today()).is_err());
        assert!(process_report("bad.json", r#"{"severity": 1}"#, &p, today()).is_err());
    }
}
