//! Data produced by extraction and by a proofreading run.

use crate::error::Stage;
use serde::{Deserialize, Serialize};

/// Text extracted from one PDF page.
///
/// Created once per document load and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageText {
    /// 1-indexed page number, in source document order.
    pub page_num: usize,
    /// Raw extracted text. May be empty for image-only pages.
    pub content: String,
}

impl PageText {
    pub fn new(page_num: usize, content: impl Into<String>) -> Self {
        Self {
            page_num,
            content: content.into(),
        }
    }

    /// The page text prefixed with its page number, as sent to the reformatter.
    pub fn labelled(&self) -> String {
        format!("Page: {}\n{}", self.page_num, self.content)
    }
}

/// Outcome of both model calls for a single page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageReport {
    pub page_num: usize,
    /// Labelled raw text, see [`PageText::labelled`].
    pub raw: String,
    /// Reformatter output.
    pub tidied: String,
    /// Proofreading feedback. `None` in reformat-only mode.
    pub proofread: Option<String>,
    /// Wall-clock time of the proofreading call.
    pub proofread_duration_ms: Option<u64>,
    pub input_tokens: usize,
    pub output_tokens: usize,
}

/// Token usage and timing of one model call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageUsage {
    pub stage: Stage,
    pub input_tokens: usize,
    pub output_tokens: usize,
    pub duration_ms: u64,
}

/// Aggregate statistics for a completed run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionStats {
    /// Pages in the document.
    pub total_pages: usize,
    /// Pages that went through every requested stage.
    pub processed_pages: usize,
    /// Number of model calls issued.
    pub llm_calls: usize,
    pub total_input_tokens: u64,
    pub total_output_tokens: u64,
    pub total_duration_ms: u64,
}

/// Document-level metadata read from the PDF Info dictionary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub page_count: usize,
    pub pdf_version: String,
    pub is_encrypted: bool,
}
