//! Error taxonomy for a scrape run.
//!
//! Fatal errors ([`ConfigError`], [`NavigationError`], render failures) abort
//! the run. [`ExtractionError`] is scoped to one scroll batch and
//! [`ExportError`] to one output format; neither stops the run.

use std::path::PathBuf;
use thiserror::Error;

/// Pre-flight configuration problems.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("AGENTQL_API_KEY not found in environment variables")]
    MissingApiKey,

    #[error("invalid value for {name}: {reason}")]
    InvalidValue { name: String, reason: String },

    #[error("cannot read .env file: {0}")]
    EnvFile(String),
}

/// Target page could not be loaded or never became ready.
#[derive(Error, Debug)]
pub enum NavigationError {
    #[error("navigation to {url} failed: {reason}")]
    LoadFailed { url: String, reason: String },

    #[error("timed out after {timeout_ms}ms waiting for '{selector}'")]
    ReadyTimeout { selector: String, timeout_ms: u64 },
}

/// A single structured-extraction batch failed.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("structured query failed: {0}")]
    Query(String),

    #[error("extraction service returned {status}: {body}")]
    Service { status: u16, body: String },

    #[error("malformed extraction response: {0}")]
    MalformedResponse(String),
}

/// One output format could not be written.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("XLSX error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("writer task failed: {0}")]
    Task(String),
}

/// Errors that abort a scrape once the session is open.
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("navigation error: {0}")]
    Navigation(#[from] NavigationError),

    /// The browser session itself failed (launch, scroll, height read).
    #[error("render error: {0:#}")]
    Render(anyhow::Error),
}

impl ScrapeError {
    pub fn render(err: impl Into<anyhow::Error>) -> Self {
        Self::Render(err.into())
    }
}
