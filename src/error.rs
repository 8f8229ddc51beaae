// src/error.rs

use thiserror::Error;

/// Failures turning an uploaded file into a [`Table`](crate::table::Table).
///
/// Every variant is a user-facing message at the binary boundary; there is
/// no retry, the user re-uploads.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("file is not valid {encoding} text")]
    Decode { encoding: &'static str },

    #[error("uploaded file is empty")]
    Empty,

    #[error("unsupported file extension `{0}` (expected csv, xlsx or xls)")]
    UnsupportedFormat(String),

    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to read workbook: {0}")]
    Excel(#[from] calamine::Error),
}

/// A table whose column set is not a superset of the required schema.
/// Blocks every downstream operation for the session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("uploaded file is missing required columns: {}", .missing.join(", "))]
pub struct SchemaError {
    /// Missing column names, sorted.
    pub missing: Vec<String>,
}

impl SchemaError {
    pub fn new(mut missing: Vec<String>) -> Self {
        missing.sort();
        Self { missing }
    }
}

/// Faults on the outbound completion call. Always caught and surfaced as an
/// "analysis service unavailable" message; never a raw crash, never retried.
#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("completion request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("completion service returned {status}: {body}")]
    Service { status: u16, body: String },

    #[error("completion response contained no choices")]
    EmptyResponse,

    #[error("invalid completion endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error("no API key configured; set SHEETSAGE_API_KEY or completion.api_key")]
    MissingApiKey,
}

/// Failures writing or reloading a history export.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("failed to write export: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode history rows: {0}")]
    Csv(#[from] csv::Error),
}
