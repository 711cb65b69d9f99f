//! Escalation pipeline and the host-facing processor.
//!
//! `postprocess` flattens message groups and rewrites each warning whose
//! removal date has arrived into an error. Order, count, and every other
//! field of each message are preserved. `SunsetProcessor` wraps it with the
//! preprocess/postprocess pair a lint host expects.

use crate::decide::{self, should_escalate};
use crate::error::Result;
use crate::extract::ExtractionPattern;
use crate::flatten::flatten;
use crate::models::{DiagnosticMessage, MessageGroup, Severity};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

/// Decide a single message against a fixed `today`.
pub fn escalate_message(
    message: DiagnosticMessage,
    pattern: &ExtractionPattern,
    today: NaiveDate,
) -> DiagnosticMessage {
    match pattern.extract(&message) {
        Some(removal) if should_escalate(removal, today) => {
            debug!(
                rule = message.rule_id().unwrap_or("-"),
                %removal,
                "removal date reached; escalating warning to error"
            );
            message.with_severity(Severity::Error)
        }
        _ => message,
    }
}

/// Flatten `groups` and escalate every due warning.
pub fn postprocess<I>(
    groups: I,
    pattern: &ExtractionPattern,
    today: NaiveDate,
) -> Vec<DiagnosticMessage>
where
    I: IntoIterator<Item = MessageGroup>,
{
    flatten(groups)
        .map(|message| escalate_message(message, pattern, today))
        .collect()
}

#[derive(Debug, Default, Clone, Deserialize)]
/// Host configuration. Unrecognized keys are ignored.
pub struct ProcessorConfig {
    #[serde(default, rename = "removalPattern", alias = "removalRegex")]
    pub removal_pattern: Option<String>,
}

#[derive(Debug, Clone, Default)]
/// Processor registered with a lint host.
pub struct SunsetProcessor {
    pattern: ExtractionPattern,
}

impl SunsetProcessor {
    pub fn new(pattern: ExtractionPattern) -> Self {
        SunsetProcessor { pattern }
    }

    /// Resolve the removal pattern once; a broken custom pattern fails here.
    pub fn from_config(config: &ProcessorConfig) -> Result<Self> {
        let pattern = ExtractionPattern::resolve(config.removal_pattern.as_deref())?;
        Ok(SunsetProcessor { pattern })
    }

    pub fn pattern(&self) -> &ExtractionPattern {
        &self.pattern
    }

    /// Identity step: the source text is linted as-is, as a single block.
    pub fn preprocess(&self, text: &str, _filename: &str) -> Vec<String> {
        vec![text.to_string()]
    }

    /// Escalate against the local date, sampled once for the whole batch.
    pub fn postprocess(
        &self,
        groups: Vec<MessageGroup>,
        filename: &str,
    ) -> Vec<DiagnosticMessage> {
        self.postprocess_at(groups, filename, decide::today())
    }

    pub fn postprocess_at(
        &self,
        groups: Vec<MessageGroup>,
        filename: &str,
        today: NaiveDate,
    ) -> Vec<DiagnosticMessage> {
        let out = postprocess(groups, &self.pattern, today);
        debug!(file = filename, messages = out.len(), %today, "postprocessed");
        out
    }
}
