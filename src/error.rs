//! Error type for the edgequake-pdfproof library.
//!
//! A proofreading run has no partial-success mode: the first failure stops
//! the run and nothing further is printed. There is therefore a single
//! [`ProofreadError`] enum and every variant is fatal. The CLI maps it to a
//! non-zero exit status.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The two model calls issued for every page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Repair spacing and line breaks lost during text extraction.
    Reformat,
    /// Ask for spelling, grammar and tone feedback on the tidied text.
    Proofread,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Reformat => f.write_str("reformat"),
            Stage::Proofread => f.write_str("proofread"),
        }
    }
}

/// All errors returned by the edgequake-pdfproof library.
#[derive(Debug, Error)]
pub enum ProofreadError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'")]
    DownloadTimeout { url: String, secs: u64 },

    /// The input was read, but is not a PDF.
    #[error("Input is not a valid PDF: '{source_name}'\nFirst bytes: {magic:?}")]
    NotAPdf { source_name: String, magic: Vec<u8> },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// The document could not be parsed at all.
    #[error("PDF '{source_name}' is corrupt: {detail}")]
    CorruptPdf { source_name: String, detail: String },

    /// The document parsed, but text could not be extracted from a page.
    #[error("Text extraction failed for page {page}: {detail}")]
    ExtractionFailed { page: usize, detail: String },

    /// A requested page number is outside the document.
    #[error("Page {page} is out of range (document has {total} pages)")]
    PageOutOfRange { page: usize, total: usize },

    // ── LLM errors ────────────────────────────────────────────────────────
    /// The credential variable for the chosen provider is unset or empty.
    #[error("Environment variable {var} is not set.\nExport your {provider} API key, e.g. export {var}=...")]
    MissingApiKey { provider: String, var: String },

    /// The provider factory refused the provider/model combination.
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// The model API returned an error.
    #[error("LLM API error on page {page} ({stage}): {message}")]
    LlmApiError {
        page: usize,
        stage: Stage,
        message: String,
    },

    /// The model answered, but with no text to print.
    #[error("LLM returned an empty reply on page {page} ({stage})")]
    EmptyReply { page: usize, stage: Stage },

    /// The overall deadline elapsed while a model call was in flight.
    #[error("Deadline of {secs}s exceeded on page {page} ({stage})\nIncrease --timeout.")]
    DeadlineExceeded { page: usize, stage: Stage, secs: u64 },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Writing a report to the output stream failed.
    #[error("Failed to write output: {source}")]
    OutputWriteFailed {
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

impl From<std::io::Error> for ProofreadError {
    fn from(source: std::io::Error) -> Self {
        ProofreadError::OutputWriteFailed { source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_api_key_names_variable() {
        let e = ProofreadError::MissingApiKey {
            provider: "gemini".into(),
            var: "GEMINI_API_KEY".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("GEMINI_API_KEY"), "got: {msg}");
        assert!(msg.contains("gemini"), "got: {msg}");
    }

    #[test]
    fn llm_error_display_names_page_and_stage() {
        let e = ProofreadError::LlmApiError {
            page: 30,
            stage: Stage::Proofread,
            message: "FinishReasonRecitation".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("page 30"), "got: {msg}");
        assert!(msg.contains("proofread"), "got: {msg}");
        assert!(msg.contains("FinishReasonRecitation"), "got: {msg}");
    }

    #[test]
    fn deadline_display() {
        let e = ProofreadError::DeadlineExceeded {
            page: 2,
            stage: Stage::Reformat,
            secs: 120,
        };
        assert!(e.to_string().contains("120s"));
        assert!(e.to_string().contains("reformat"));
    }

    #[test]
    fn page_out_of_range_display() {
        let e = ProofreadError::PageOutOfRange { page: 31, total: 30 };
        assert_eq!(
            e.to_string(),
            "Page 31 is out of range (document has 30 pages)"
        );
    }

    #[test]
    fn io_error_converts_to_output_write_failed() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");
        let e: ProofreadError = io.into();
        assert!(matches!(e, ProofreadError::OutputWriteFailed { .. }));
    }
}
