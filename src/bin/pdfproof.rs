//! CLI binary for edgequake-pdfproof.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ProofreadConfig` and streams page reports to stdout.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_pdfproof::{
    inspect, proofread_document, OutputFormat, PageSelection, ProgressCallback, ProofreadConfig,
    ProofreadProgressCallback, Stage, StageUsage,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

/// Spinner on stderr showing which page and stage is waiting on the model.
/// Stdout is left to the page reports.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Self {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  {pos}/{len} pages  ⏱ {elapsed_precise}  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(TICKS);

        bar.set_style(style);
        bar.set_prefix("Proofreading");
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar }
    }
}

impl ProofreadProgressCallback for CliProgressCallback {
    fn on_session_start(&self, selected_pages: usize) {
        self.bar.set_length(selected_pages as u64);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Proofreading {selected_pages} pages…"))
        ));
    }

    fn on_stage_start(&self, page_num: usize, stage: Stage) {
        self.bar.set_message(format!("page {page_num} · {stage}"));
    }

    fn on_stage_complete(&self, page_num: usize, usage: &StageUsage) {
        self.bar.println(format!(
            "  {} Page {:>3}  {:<9}  {}  {}",
            green("✓"),
            page_num,
            usage.stage.to_string(),
            dim(&format!("{:>5} tok out", usage.output_tokens)),
            dim(&format!("{:.1}s", usage.duration_ms as f64 / 1000.0)),
        ));
    }

    fn on_page_complete(&self, _page_num: usize, _selected_pages: usize) {
        self.bar.inc(1);
    }

    fn on_session_complete(&self, processed_pages: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} pages proofread",
            green("✔"),
            bold(&processed_pages.to_string())
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Proofread every page (stdout)
  pdfproof --input-pdf report.pdf

  # A single page with a different model
  pdfproof --input-pdf report.pdf --pages 30 --model gemini-1.5-pro-latest

  # Only repair the extracted text, no proofreading
  pdfproof --input-pdf report.pdf --pages 1-5 --reformat-only

  # From a URL, JSON lines output
  pdfproof --input-pdf https://example.org/paper.pdf --json > report.jsonl

  # Inspect PDF metadata (no API key needed)
  pdfproof --input-pdf report.pdf --inspect-only

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY          Google Gemini API key (default provider)
  OPENAI_API_KEY          OpenAI API key (--provider openai)
  ANTHROPIC_API_KEY       Anthropic API key (--provider anthropic)
  RUST_LOG                Override the log filter, e.g. RUST_LOG=edgequake_pdfproof=debug
"#;

/// Tidy and proofread PDF text page by page with an LLM.
#[derive(Parser, Debug)]
#[command(
    name = "pdfproof",
    version,
    about = "Tidy and proofread PDF text page by page with an LLM",
    long_about = "Extract text from a PDF page by page, have an LLM repair spacing and line \
breaks lost during extraction, then ask it for proofreading feedback on spelling, punctuation, \
grammar, verbosity and tone. Results are printed to stdout as each page completes.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Path to the input PDF file, or an HTTP/HTTPS URL.
    #[arg(long, env = "PDFPROOF_INPUT")]
    input_pdf: String,

    /// Model to use for the API.
    #[arg(long, env = "PDFPROOF_MODEL", default_value = edgequake_pdfproof::config::DEFAULT_MODEL)]
    model: String,

    /// LLM provider: gemini, openai, anthropic, mistral, ollama, ...
    #[arg(long, env = "PDFPROOF_PROVIDER", default_value = edgequake_pdfproof::config::DEFAULT_PROVIDER)]
    provider: String,

    /// Page selection: all, 30, 3-15, or 1,3,5,7.
    #[arg(long, env = "PDFPROOF_PAGES", default_value = "all")]
    pages: String,

    /// Overall deadline in seconds for all model calls.
    #[arg(long, env = "PDFPROOF_TIMEOUT", default_value_t = 120)]
    timeout: u64,

    /// Sampling temperature (0.0–2.0).
    #[arg(long, env = "PDFPROOF_TEMPERATURE", default_value_t = 0.0)]
    temperature: f32,

    /// Max output tokens per model call.
    #[arg(long, env = "PDFPROOF_MAX_TOKENS")]
    max_tokens: Option<usize>,

    /// Skip the proofreading call; print tidied pages only.
    #[arg(long)]
    reformat_only: bool,

    /// Path to a text file replacing the built-in reformatting instructions.
    #[arg(long)]
    reformat_prompt: Option<PathBuf>,

    /// Path to a text file replacing the built-in proofreading instructions.
    #[arg(long)]
    proofread_prompt: Option<PathBuf>,

    /// Print model replies exactly as received.
    #[arg(long)]
    raw_replies: bool,

    /// Output one JSON object per page instead of text blocks.
    #[arg(long)]
    json: bool,

    /// Print PDF metadata only, no model calls.
    #[arg(long)]
    inspect_only: bool,

    /// Disable the progress spinner.
    #[arg(long, env = "PDFPROOF_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDFPROOF_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDFPROOF_QUIET")]
    quiet: bool,

    /// HTTP download timeout in seconds for URL inputs.
    #[arg(long, env = "PDFPROOF_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner already reports progress; keep INFO logs from tearing it.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.inspect_only;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let meta = inspect(&cli.input_pdf, cli.download_timeout)
            .await
            .context("Failed to inspect PDF")?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&meta).context("Failed to serialise metadata")?
            );
        } else {
            println!("File:         {}", cli.input_pdf);
            if let Some(ref t) = meta.title {
                println!("Title:        {}", t);
            }
            if let Some(ref a) = meta.author {
                println!("Author:       {}", a);
            }
            if let Some(ref s) = meta.subject {
                println!("Subject:      {}", s);
            }
            println!("Pages:        {}", meta.page_count);
            println!("PDF Version:  {}", meta.pdf_version);
            println!("Encrypted:    {}", meta.is_encrypted);
            if let Some(ref p) = meta.producer {
                println!("Producer:     {}", p);
            }
            if let Some(ref c) = meta.creator {
                println!("Creator:      {}", c);
            }
        }
        return Ok(());
    }

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(std::sync::Arc::new(CliProgressCallback::new()))
    } else {
        None
    };

    let config = build_config(&cli, progress_cb).await?;

    // ── Run ──────────────────────────────────────────────────────────────
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let stats = proofread_document(&cli.input_pdf, &config, &mut handle)
        .await
        .context("Proofreading failed")?;

    if !cli.quiet && !show_progress && !cli.json {
        eprintln!(
            "Proofread {}/{} pages with {} calls in {}ms",
            stats.processed_pages, stats.total_pages, stats.llm_calls, stats.total_duration_ms
        );
    }
    if !cli.quiet && !cli.json {
        eprintln!(
            "   {} tokens in  /  {} tokens out",
            dim(&stats.total_input_tokens.to_string()),
            dim(&stats.total_output_tokens.to_string()),
        );
    }

    Ok(())
}

/// Map CLI args to `ProofreadConfig`.
async fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ProofreadConfig> {
    let pages: PageSelection = cli.pages.parse().context("Invalid --pages")?;

    let mut builder = ProofreadConfig::builder()
        .provider_name(&cli.provider)
        .model(&cli.model)
        .pages(pages)
        .timeout_secs(cli.timeout)
        .temperature(cli.temperature)
        .proofread(!cli.reformat_only)
        .clean_replies(!cli.raw_replies)
        .download_timeout_secs(cli.download_timeout)
        .output_format(if cli.json {
            OutputFormat::JsonLines
        } else {
            OutputFormat::Text
        });

    if let Some(n) = cli.max_tokens {
        builder = builder.max_tokens(n);
    }
    if let Some(ref path) = cli.reformat_prompt {
        builder = builder.reformat_prompt(read_prompt(path).await?);
    }
    if let Some(ref path) = cli.proofread_prompt {
        builder = builder.proofread_prompt(read_prompt(path).await?);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

async fn read_prompt(path: &Path) -> Result<String> {
    let prompt = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read prompt from {:?}", path))?;
    Ok(prompt.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults() {
        let cli = Cli::parse_from(["pdfproof", "--input-pdf", "report.pdf"]);
        assert_eq!(cli.input_pdf, "report.pdf");
        assert_eq!(cli.model, "gemini-1.5-flash-latest");
        assert_eq!(cli.provider, "gemini");
        assert_eq!(cli.timeout, 120);
        assert_eq!(cli.pages, "all");
        assert!(!cli.reformat_only);
    }

    #[test]
    fn cli_model_override() {
        let cli = Cli::parse_from([
            "pdfproof",
            "--input-pdf",
            "report.pdf",
            "--model",
            "gemini-1.5-pro-latest",
            "--pages",
            "30",
        ]);
        assert_eq!(cli.model, "gemini-1.5-pro-latest");
        assert_eq!(cli.pages, "30");
    }

    #[tokio::test]
    async fn build_config_maps_flags() {
        let cli = Cli::parse_from([
            "pdfproof",
            "--input-pdf",
            "report.pdf",
            "--pages",
            "2-4",
            "--reformat-only",
            "--json",
            "--timeout",
            "30",
        ]);
        let config = build_config(&cli, None).await.unwrap();
        assert_eq!(config.pages, PageSelection::Range(2, 4));
        assert!(!config.proofread);
        assert_eq!(config.output_format, OutputFormat::JsonLines);
        assert_eq!(config.timeout_secs, 30);
    }

    #[tokio::test]
    async fn build_config_rejects_bad_pages() {
        let cli = Cli::parse_from(["pdfproof", "--input-pdf", "x.pdf", "--pages", "0"]);
        assert!(build_config(&cli, None).await.is_err());
    }
}
