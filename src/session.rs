//! The per-page proofreading loop.
//!
//! For each selected page the session makes up to two model calls, one after
//! the other: reformat the raw extraction, then proofread the tidied text.
//! Each block of output is written as soon as it is available, so a reader
//! watching stdout sees the raw page while the first call is still in flight.
//!
//! ## Failure semantics
//!
//! The first error ends the run. Whatever was already written stays written;
//! nothing after the failing step is emitted. The one exception mirrors the
//! timing report: the proofreading execution time is printed before the
//! proofreading result is checked, so a failed call still shows how long it
//! took.
//!
//! ## Deadline
//!
//! A single deadline covers every call. It is not reset per page or per
//! call. [`ProofreadSession::run`] starts it on entry;
//! [`crate::proofread_with_model`] starts it before the PDF is loaded and
//! hands it over through [`ProofreadSession::run_until`]. Timeouts too large
//! to represent are capped at [`MAX_TIMEOUT`].

use crate::config::{OutputFormat, PageSelection, ProofreadConfig};
use crate::error::{ProofreadError, Stage};
use crate::output::{PageReport, PageText, SessionStats, StageUsage};
use crate::pipeline::llm::{ModelFailure, ModelReply, TextModel};
use crate::pipeline::postprocess::clean_reply;
use crate::prompts::{build_prompt, PROOFREAD_PROMPT, REFORMAT_PROMPT};
use std::io::Write;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Longest deadline the session will arm, roughly thirty years.
pub const MAX_TIMEOUT: Duration = Duration::from_secs(86_400 * 365 * 30);

/// The instant `timeout_secs` from now, capped at [`MAX_TIMEOUT`].
pub fn deadline_after(timeout_secs: u64) -> tokio::time::Instant {
    tokio::time::Instant::now() + Duration::from_secs(timeout_secs).min(MAX_TIMEOUT)
}

/// Drives the two-stage model calls over a list of pages.
pub struct ProofreadSession<'a, M: TextModel> {
    model: &'a M,
    config: &'a ProofreadConfig,
}

impl<'a, M: TextModel> ProofreadSession<'a, M> {
    pub fn new(model: &'a M, config: &'a ProofreadConfig) -> Self {
        Self { model, config }
    }

    /// Process `pages` in order, writing each page's output to `out`.
    ///
    /// `total_pages` is the page count of the whole document and only feeds
    /// the returned statistics.
    pub async fn run<W: Write>(
        &self,
        pages: &[PageText],
        total_pages: usize,
        out: &mut W,
    ) -> Result<SessionStats, ProofreadError> {
        let deadline = deadline_after(self.config.timeout_secs);
        self.run_until(pages, total_pages, deadline, out).await
    }

    /// Like [`run`](Self::run), but every call must finish before `deadline`.
    pub async fn run_until<W: Write>(
        &self,
        pages: &[PageText],
        total_pages: usize,
        deadline: tokio::time::Instant,
        out: &mut W,
    ) -> Result<SessionStats, ProofreadError> {
        let started = Instant::now();

        if let Some(ref cb) = self.config.progress_callback {
            cb.on_session_start(pages.len());
        }

        let mut stats = SessionStats {
            total_pages,
            ..Default::default()
        };

        for page in pages {
            info!("Processing page {}", page.page_num);
            let report = self.process_page(page, deadline, out).await?;

            if self.config.output_format == OutputFormat::JsonLines {
                serde_json::to_writer(&mut *out, &report)
                    .map_err(|e| ProofreadError::Internal(format!("JSON encoding: {e}")))?;
                writeln!(out)?;
            }
            out.flush()?;

            stats.processed_pages += 1;
            stats.llm_calls += if report.proofread.is_some() { 2 } else { 1 };
            stats.total_input_tokens += report.input_tokens as u64;
            stats.total_output_tokens += report.output_tokens as u64;

            if let Some(ref cb) = self.config.progress_callback {
                cb.on_page_complete(page.page_num, pages.len());
            }
        }

        stats.total_duration_ms = started.elapsed().as_millis() as u64;
        info!(
            "Proofreading complete: {} pages, {} calls, {}ms",
            stats.processed_pages, stats.llm_calls, stats.total_duration_ms
        );

        if let Some(ref cb) = self.config.progress_callback {
            cb.on_session_complete(stats.processed_pages);
        }

        Ok(stats)
    }

    async fn process_page<W: Write>(
        &self,
        page: &PageText,
        deadline: tokio::time::Instant,
        out: &mut W,
    ) -> Result<PageReport, ProofreadError> {
        let text_output = self.config.output_format == OutputFormat::Text;
        let raw = page.labelled();

        if text_output {
            writeln!(out, "=== Raw page ===")?;
            writeln!(out, "{raw}")?;
            out.flush()?;
        }

        // ── Stage 1: reformat ────────────────────────────────────────────
        let instruction = self
            .config
            .reformat_prompt
            .as_deref()
            .unwrap_or(REFORMAT_PROMPT);
        let (reply, reformat_usage) = self
            .call(page.page_num, Stage::Reformat, &build_prompt(instruction, &raw), deadline)
            .await?;
        let tidied = self.clean(&reply.text);

        if text_output {
            writeln!(out, "=== Tidied up page ===")?;
            writeln!(out, "{tidied}")?;
            out.flush()?;
        }

        let mut report = PageReport {
            page_num: page.page_num,
            raw,
            tidied,
            proofread: None,
            proofread_duration_ms: None,
            input_tokens: reformat_usage.input_tokens,
            output_tokens: reformat_usage.output_tokens,
        };

        if !self.config.proofread {
            return Ok(report);
        }

        // ── Stage 2: proofread ───────────────────────────────────────────
        let instruction = self
            .config
            .proofread_prompt
            .as_deref()
            .unwrap_or(PROOFREAD_PROMPT);
        let prompt = build_prompt(instruction, &report.tidied);

        let started = Instant::now();
        let result = self
            .call(page.page_num, Stage::Proofread, &prompt, deadline)
            .await;
        let elapsed = started.elapsed();

        if text_output {
            writeln!(out, "\nProofreading Execution Time: {elapsed:?}")?;
            out.flush()?;
        }

        let (reply, usage) = result?;
        let feedback = self.clean(&reply.text);

        if text_output {
            writeln!(out, "=== Proofread page ===")?;
            writeln!(out, "{feedback}")?;
        }

        report.proofread = Some(feedback);
        report.proofread_duration_ms = Some(elapsed.as_millis() as u64);
        report.input_tokens += usage.input_tokens;
        report.output_tokens += usage.output_tokens;
        Ok(report)
    }

    /// Issue one model call under the run deadline.
    async fn call(
        &self,
        page_num: usize,
        stage: Stage,
        prompt: &str,
        deadline: tokio::time::Instant,
    ) -> Result<(ModelReply, StageUsage), ProofreadError> {
        if let Some(ref cb) = self.config.progress_callback {
            cb.on_stage_start(page_num, stage);
        }

        let started = Instant::now();
        let reply = match tokio::time::timeout_at(deadline, self.model.generate(prompt)).await {
            Ok(Ok(reply)) => reply,
            Ok(Err(ModelFailure::Api(message))) => {
                return Err(ProofreadError::LlmApiError {
                    page: page_num,
                    stage,
                    message,
                });
            }
            Ok(Err(ModelFailure::Empty)) => {
                return Err(ProofreadError::EmptyReply {
                    page: page_num,
                    stage,
                });
            }
            Err(_) => {
                return Err(ProofreadError::DeadlineExceeded {
                    page: page_num,
                    stage,
                    secs: self.config.timeout_secs,
                });
            }
        };

        let usage = StageUsage {
            stage,
            input_tokens: reply.input_tokens,
            output_tokens: reply.output_tokens,
            duration_ms: started.elapsed().as_millis() as u64,
        };
        debug!(
            "Page {} {}: {} in / {} out tokens, {}ms",
            page_num, stage, usage.input_tokens, usage.output_tokens, usage.duration_ms
        );

        if let Some(ref cb) = self.config.progress_callback {
            cb.on_stage_complete(page_num, &usage);
        }

        Ok((reply, usage))
    }

    fn clean(&self, text: &str) -> String {
        if self.config.clean_replies {
            clean_reply(text)
        } else {
            text.to_string()
        }
    }
}

/// Keep only the pages named by `selection`, in ascending page order.
///
/// `pages` must be the full extraction result, one entry per page.
pub fn select_pages(
    pages: Vec<PageText>,
    selection: &PageSelection,
) -> Result<Vec<PageText>, ProofreadError> {
    let wanted = selection.select(pages.len())?;
    debug!("Selected {} of {} pages", wanted.len(), pages.len());
    Ok(pages
        .into_iter()
        .filter(|p| wanted.binary_search(&p.page_num).is_ok())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(n: usize) -> Vec<PageText> {
        (1..=n).map(|i| PageText::new(i, format!("text {i}"))).collect()
    }

    #[test]
    fn select_all_keeps_order() {
        let selected = select_pages(pages(3), &PageSelection::All).unwrap();
        let nums: Vec<usize> = selected.iter().map(|p| p.page_num).collect();
        assert_eq!(nums, vec![1, 2, 3]);
    }

    #[test]
    fn select_set_out_of_order() {
        let selected = select_pages(pages(5), &PageSelection::Set(vec![4, 2])).unwrap();
        let nums: Vec<usize> = selected.iter().map(|p| p.page_num).collect();
        assert_eq!(nums, vec![2, 4]);
        assert_eq!(selected[0].content, "text 2");
    }

    #[tokio::test(start_paused = true)]
    async fn huge_timeout_is_capped() {
        let start = tokio::time::Instant::now();
        assert_eq!(deadline_after(u64::MAX) - start, MAX_TIMEOUT);
        assert_eq!(deadline_after(5) - start, Duration::from_secs(5));
    }

    #[test]
    fn select_out_of_range_is_fatal() {
        let err = select_pages(pages(2), &PageSelection::Single(30)).unwrap_err();
        assert!(matches!(err, ProofreadError::PageOutOfRange { page: 30, total: 2 }));
    }
}
