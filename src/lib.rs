//! # edgequake-pdfproof
//!
//! Extract the text of a PDF page by page, have an LLM repair the extraction
//! damage, then ask it for proofreading feedback.
//!
//! Raw PDF text extraction loses spacing and line breaks: headings run into
//! body text, table cells run into each other. This crate sends each page through
//! two sequential model calls. The first restores the layout; the second
//! reviews spelling, punctuation, grammar, verbosity and tone, suggesting
//! fixes in Markdown.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input      resolve local file or download from URL
//!  ├─ 2. Extract    per-page text via lopdf (spawn_blocking)
//!  ├─ 3. Select     --pages filter, 1-based
//!  ├─ 4. Reformat   LLM call #1, reply cleaned up
//!  ├─ 5. Proofread  LLM call #2 on the tidied text
//!  └─ 6. Report     text blocks or JSON lines, written as each page finishes
//! ```
//!
//! Pages are processed one at a time and every error is fatal. One deadline
//! (`timeout_secs`, default 120 s) covers all model calls of a run.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_pdfproof::{proofread_document, ProofreadConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Uses gemini-1.5-flash-latest with GEMINI_API_KEY by default.
//!     let config = ProofreadConfig::default();
//!     let stats = proofread_document("paper.pdf", &config, &mut std::io::stdout()).await?;
//!     eprintln!("tokens: {} in / {} out",
//!         stats.total_input_tokens,
//!         stats.total_output_tokens);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdfproof` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod proofread;
pub mod session;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{OutputFormat, PageSelection, ProofreadConfig, ProofreadConfigBuilder};
pub use error::{ProofreadError, Stage};
pub use output::{DocumentMetadata, PageReport, PageText, SessionStats, StageUsage};
pub use pipeline::llm::{LlmModel, ModelFailure, ModelReply, TextModel};
pub use progress::{NoopProgressCallback, ProgressCallback, ProofreadProgressCallback};
pub use proofread::{inspect, load_pages, proofread_document, proofread_with_model};
pub use session::{select_pages, ProofreadSession};
