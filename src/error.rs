//! Error types for the adcopy library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`AdCopyError`] is **fatal**: the run cannot proceed at all (bad
//!   configuration, provider not configured, unreadable bulk input).
//!   Returned as `Err(AdCopyError)` from the top-level entry points.
//!
//! * [`GenerationError`] is **non-fatal**: one ad group failed (model error,
//!   unparsable reply) but the rest of a batch is fine. Stored inside
//!   [`crate::output::AdGroupResult`] next to an empty asset set; its
//!   `Display` text is what the user sees.
//!
//! Landing-page fetch failures are neither: the fetcher substitutes a generic
//! context string and logs a warning.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the adcopy library.
#[derive(Debug, Error)]
pub enum AdCopyError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Bulk input file was not found at the given path.
    #[error("Bulk input file not found: '{path}'\nCheck the path exists and is readable.")]
    InputNotFound { path: PathBuf },

    /// Bulk input could not be parsed as CSV.
    #[error("Failed to read bulk input '{path}': {detail}")]
    InvalidInput { path: PathBuf, detail: String },

    /// Bulk input is missing a required column.
    #[error("Bulk input '{path}' has no '{column}' column.\nExpected columns: Campaign, Ad Group, Category, URL")]
    MissingColumn { path: PathBuf, column: String },

    // ── LLM errors ────────────────────────────────────────────────────────
    /// The configured provider is not initialised (missing API key etc.).
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// Every bulk row failed; there is nothing to export.
    #[error("All {total} rows failed.\nFirst error: {first_error}")]
    AllRowsFailed { total: usize, first_error: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write an output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single ad group.
///
/// Never retried: the ad group is reported with an empty asset set and the
/// batch moves on.
#[derive(Debug, Clone, Error, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum GenerationError {
    /// The model call itself failed (quota, network, auth).
    #[error("Error: LLM call failed: {detail}")]
    LlmFailed { detail: String },

    /// The model call exceeded the configured timeout.
    #[error("Error: LLM call timed out after {secs}s")]
    Timeout { secs: u64 },

    /// The reply was not the expected `{"headlines": [...], "descriptions": [...]}` JSON.
    #[error("Error: malformed model response: {detail}")]
    MalformedResponse { detail: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_rows_failed_display() {
        let e = AdCopyError::AllRowsFailed {
            total: 3,
            first_error: "quota exceeded".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("All 3 rows"), "got: {msg}");
        assert!(msg.contains("quota exceeded"));
    }

    #[test]
    fn missing_column_display() {
        let e = AdCopyError::MissingColumn {
            path: PathBuf::from("rows.csv"),
            column: "URL".into(),
        };
        assert!(e.to_string().contains("'URL'"));
    }

    #[test]
    fn generation_error_display_is_user_facing() {
        let e = GenerationError::MalformedResponse {
            detail: "expected value at line 1 column 1".into(),
        };
        assert!(e.to_string().starts_with("Error: "));
        assert!(e.to_string().contains("line 1 column 1"));
    }

    #[test]
    fn timeout_display() {
        let e = GenerationError::Timeout { secs: 30 };
        assert!(e.to_string().contains("30s"));
    }
}
