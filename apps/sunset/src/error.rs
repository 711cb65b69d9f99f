//! Error type shared by the library and the CLI.
//!
//! Per-message problems (no match, bad date, wrong severity) are never
//! errors; they degrade to passing the message through. Only configuration
//! and report I/O failures surface here.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SunsetError {
    #[error("invalid removal pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("removal pattern '{pattern}' has no capture group for the date")]
    MissingCaptureGroup { pattern: String },

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{origin} is not a valid diagnostic report: {source}")]
    Decode {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode report {origin}: {source}")]
    Encode {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid report glob '{pattern}': {source}")]
    Glob {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("configuration error: {message}")]
    Config { message: String },
}

pub type Result<T> = std::result::Result<T, SunsetError>;
