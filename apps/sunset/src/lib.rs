//! Sunset core library.
//!
//! Escalates linter warnings to errors once a removal ("sunset") date found
//! in their text has arrived. Each postprocess call is pure given its inputs
//! and a single sample of today's date.
//!
//! High-level modules:
//! - `models`: Severity, diagnostic messages, and check result structs.
//! - `flatten`: Concatenation of message groups.
//! - `extract`: Removal pattern compilation and date extraction.
//! - `decide`: Day-granularity escalation rule.
//! - `escalate`: The postprocess pipeline and host processor.
//! - `report`: Report document decoding, escalation, and re-encoding.
//! - `check`: Parallel runner over report files.
//! - `config`: Discovery and effective configuration resolution.
//! - `cli`: CLI argument parsing (binary uses this).
//! - `output`: Human/JSON printers.
//! - `logger`: Tracing subscriber setup.
//! - `error`: Error type.
pub mod check;
pub mod cli;
pub mod config;
pub mod decide;
pub mod error;
pub mod escalate;
pub mod extract;
pub mod flatten;
pub mod logger;
pub mod models;
pub mod output;
pub mod report;

pub use error::{Result, SunsetError};
pub use escalate::{postprocess, ProcessorConfig, SunsetProcessor};
pub use extract::{ExtractionPattern, DEFAULT_REMOVAL_PATTERN};
pub use models::{DiagnosticMessage, MessageGroup, Severity};
