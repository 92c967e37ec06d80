//! Progress-callback trait for per-page proofreading events.
//!
//! Inject an [`Arc<dyn ProofreadProgressCallback>`] via
//! [`crate::config::ProofreadConfigBuilder::progress_callback`] to receive
//! events as the session walks through the selected pages. The CLI uses it
//! to drive a spinner on stderr while stdout carries the page reports.
//!
//! # Example
//!
//! ```rust
//! use edgequake_pdfproof::{ProofreadConfig, ProofreadProgressCallback, StageUsage};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CallCounter {
//!     calls: AtomicUsize,
//! }
//!
//! impl ProofreadProgressCallback for CallCounter {
//!     fn on_stage_complete(&self, page_num: usize, usage: &StageUsage) {
//!         self.calls.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("page {page_num}: {} done in {}ms", usage.stage, usage.duration_ms);
//!     }
//! }
//!
//! let config = ProofreadConfig::builder()
//!     .progress_callback(Arc::new(CallCounter { calls: AtomicUsize::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use crate::error::Stage;
use crate::output::StageUsage;
use std::sync::Arc;

/// Called by the session as it processes each page.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Pages are processed one at a time, but the trait is
/// `Send + Sync` so a callback can be shared with other tasks.
pub trait ProofreadProgressCallback: Send + Sync {
    /// Called once before the first page.
    ///
    /// `selected_pages` is the number of pages that will be processed.
    fn on_session_start(&self, selected_pages: usize) {
        let _ = selected_pages;
    }

    /// Called just before a model call is sent for a page.
    fn on_stage_start(&self, page_num: usize, stage: Stage) {
        let _ = (page_num, stage);
    }

    /// Called when a model call returns successfully.
    fn on_stage_complete(&self, page_num: usize, usage: &StageUsage) {
        let _ = (page_num, usage);
    }

    /// Called when every stage of a page has completed and its report is written.
    fn on_page_complete(&self, page_num: usize, selected_pages: usize) {
        let _ = (page_num, selected_pages);
    }

    /// Called once after the last page. Not called when the run aborts.
    fn on_session_complete(&self, processed_pages: usize) {
        let _ = processed_pages;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ProofreadProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ProofreadConfig`].
pub type ProgressCallback = Arc<dyn ProofreadProgressCallback>;
