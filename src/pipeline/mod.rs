//! Pipeline stages for a proofreading run.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ llm ──▶ postprocess
//! (path/URL) (lopdf)    (two calls per page)
//! ```
//!
//! 1. [`input`]: read a local file or download a URL into memory
//! 2. [`extract`]: split the document into per-page text on a blocking thread
//! 3. [`llm`]: the [`llm::TextModel`] seam and its edgequake-llm implementation
//! 4. [`postprocess`]: deterministic cleanup of model replies
//!
//! Sequencing, output and the run deadline live in [`crate::session`].

pub mod extract;
pub mod input;
pub mod llm;
pub mod postprocess;
