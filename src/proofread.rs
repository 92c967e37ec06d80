//! Top-level entry points: wire input, extraction, provider and session.

use crate::config::ProofreadConfig;
use crate::error::ProofreadError;
use crate::output::{DocumentMetadata, PageText, SessionStats};
use crate::pipeline::llm::{resolve_provider, LlmModel, TextModel};
use crate::pipeline::{extract, input};
use crate::session::{deadline_after, select_pages, ProofreadSession};
use std::io::Write;
use tracing::{info, warn};

/// Proofread a PDF file or URL, writing page reports to `out`.
///
/// The provider is resolved before the document is touched, so a missing
/// credential fails fast. Any error aborts the run.
///
/// # Example
/// ```rust,no_run
/// use edgequake_pdfproof::{proofread_document, PageSelection, ProofreadConfig};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// // Reads GEMINI_API_KEY from the environment.
/// let config = ProofreadConfig::builder()
///     .pages(PageSelection::Single(30))
///     .build()?;
/// let stats = proofread_document("report.pdf", &config, &mut std::io::stdout()).await?;
/// eprintln!("{} pages, {} calls", stats.processed_pages, stats.llm_calls);
/// # Ok(())
/// # }
/// ```
pub async fn proofread_document<W: Write>(
    input_str: impl AsRef<str>,
    config: &ProofreadConfig,
    out: &mut W,
) -> Result<SessionStats, ProofreadError> {
    let provider = resolve_provider(config)?;
    let model = LlmModel::new(provider, config);
    proofread_with_model(input_str, &model, config, out).await
}

/// Like [`proofread_document`], but with a caller-supplied [`TextModel`].
///
/// The run deadline starts before the document is loaded, so time spent
/// downloading and extracting counts against `timeout_secs`.
pub async fn proofread_with_model<M: TextModel, W: Write>(
    input_str: impl AsRef<str>,
    model: &M,
    config: &ProofreadConfig,
    out: &mut W,
) -> Result<SessionStats, ProofreadError> {
    let input_str = input_str.as_ref();
    info!("Starting proofreading: {}", input_str);
    let deadline = deadline_after(config.timeout_secs);

    let all_pages = load_pages(input_str, config.download_timeout_secs).await?;
    let total_pages = all_pages.len();
    if total_pages == 0 {
        warn!("{} has no pages", input_str);
    }

    let pages = select_pages(all_pages, &config.pages)?;
    ProofreadSession::new(model, config)
        .run_until(&pages, total_pages, deadline, out)
        .await
}

/// Extract every page of a PDF file or URL, in document order.
pub async fn load_pages(
    input_str: &str,
    download_timeout_secs: u64,
) -> Result<Vec<PageText>, ProofreadError> {
    let source = input::resolve_input(input_str, download_timeout_secs).await?;
    extract::extract_pages(&source).await
}

/// Read PDF metadata without extracting text or calling a model.
///
/// Does not require an API key. `download_timeout_secs` applies to URL
/// inputs only.
pub async fn inspect(
    input_str: impl AsRef<str>,
    download_timeout_secs: u64,
) -> Result<DocumentMetadata, ProofreadError> {
    let source = input::resolve_input(input_str.as_ref(), download_timeout_secs).await?;
    extract::extract_metadata(&source).await
}
