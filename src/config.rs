//! Configuration types for a proofreading run.
//!
//! Every knob lives in [`ProofreadConfig`], built via its
//! [`ProofreadConfigBuilder`]. The CLI maps its flags onto the builder; library
//! callers set only what they need and rely on the defaults for the rest.

use crate::error::ProofreadError;
use crate::progress::ProgressCallback;
use edgequake_llm::LLMProvider;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Provider used when none is configured.
pub const DEFAULT_PROVIDER: &str = "gemini";

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash-latest";

/// Configuration for a proofreading run.
///
/// # Example
/// ```rust
/// use edgequake_pdfproof::{PageSelection, ProofreadConfig};
///
/// let config = ProofreadConfig::builder()
///     .model("gemini-1.5-pro-latest")
///     .pages(PageSelection::Single(30))
///     .timeout_secs(300)
///     .build()
///     .unwrap();
/// assert_eq!(config.timeout_secs, 300);
/// ```
#[derive(Clone)]
pub struct ProofreadConfig {
    /// edgequake-llm provider name. Default: `"gemini"`.
    pub provider_name: String,

    /// Model identifier passed to the provider. Default: `"gemini-1.5-flash-latest"`.
    pub model: String,

    /// Pre-constructed LLM provider. Takes precedence over `provider_name`
    /// and skips the API-key check.
    pub provider: Option<Arc<dyn LLMProvider>>,

    /// Sampling temperature. Default: 0.0.
    ///
    /// Both stages are corrective rather than creative; zero keeps the
    /// reformatter from rewording the page.
    pub temperature: f32,

    /// Optional cap on tokens generated per call. Default: provider default.
    pub max_tokens: Option<usize>,

    /// Overall deadline in seconds for every model call of the run. Default: 120.
    ///
    /// The deadline is measured from the start of the run, not per call: once
    /// it passes, whichever call is in flight fails and the run stops.
    pub timeout_secs: u64,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// Pages to process. Default: all pages.
    pub pages: PageSelection,

    /// Issue the proofreading call after reformatting. Default: true.
    pub proofread: bool,

    /// Apply [`crate::pipeline::postprocess::clean_reply`] to model output. Default: true.
    pub clean_replies: bool,

    /// Custom reformatter instructions. If None, uses [`crate::prompts::REFORMAT_PROMPT`].
    pub reformat_prompt: Option<String>,

    /// Custom proofreader instructions. If None, uses [`crate::prompts::PROOFREAD_PROMPT`].
    pub proofread_prompt: Option<String>,

    /// How page results are written. Default: text blocks.
    pub output_format: OutputFormat,

    /// Optional progress events sink.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ProofreadConfig {
    fn default() -> Self {
        Self {
            provider_name: DEFAULT_PROVIDER.to_string(),
            model: DEFAULT_MODEL.to_string(),
            provider: None,
            temperature: 0.0,
            max_tokens: None,
            timeout_secs: 120,
            download_timeout_secs: 120,
            pages: PageSelection::default(),
            proofread: true,
            clean_replies: true,
            reformat_prompt: None,
            proofread_prompt: None,
            output_format: OutputFormat::default(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ProofreadConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProofreadConfig")
            .field("provider_name", &self.provider_name)
            .field("model", &self.model)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn LLMProvider>"))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .field("pages", &self.pages)
            .field("proofread", &self.proofread)
            .field("clean_replies", &self.clean_replies)
            .field("output_format", &self.output_format)
            .finish()
    }
}

impl ProofreadConfig {
    /// Create a new builder for `ProofreadConfig`.
    pub fn builder() -> ProofreadConfigBuilder {
        ProofreadConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ProofreadConfig`].
#[derive(Debug)]
pub struct ProofreadConfigBuilder {
    config: ProofreadConfig,
}

impl ProofreadConfigBuilder {
    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = name.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = Some(n);
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs;
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn pages(mut self, selection: PageSelection) -> Self {
        self.config.pages = selection;
        self
    }

    pub fn proofread(mut self, v: bool) -> Self {
        self.config.proofread = v;
        self
    }

    pub fn clean_replies(mut self, v: bool) -> Self {
        self.config.clean_replies = v;
        self
    }

    pub fn reformat_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.reformat_prompt = Some(prompt.into());
        self
    }

    pub fn proofread_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.proofread_prompt = Some(prompt.into());
        self
    }

    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.config.output_format = format;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ProofreadConfig, ProofreadError> {
        let c = &self.config;
        if c.timeout_secs == 0 {
            return Err(ProofreadError::InvalidConfig(
                "Timeout must be ≥ 1 second".into(),
            ));
        }
        if c.model.trim().is_empty() {
            return Err(ProofreadError::InvalidConfig("Model must not be empty".into()));
        }
        if c.provider.is_none() && c.provider_name.trim().is_empty() {
            return Err(ProofreadError::InvalidConfig(
                "Provider name must not be empty".into(),
            ));
        }
        if c.max_tokens == Some(0) {
            return Err(ProofreadError::InvalidConfig(
                "Max tokens must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// How page results are written to the output stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// `=== Raw page ===` / `=== Tidied up page ===` / `=== Proofread page ===` blocks. (default)
    #[default]
    Text,
    /// One JSON-encoded [`crate::output::PageReport`] per line.
    JsonLines,
}

/// Specifies which pages of the PDF to process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSelection {
    /// Process all pages (default).
    #[default]
    All,
    /// Process a single page (1-indexed).
    Single(usize),
    /// Process a contiguous range of pages (1-indexed, inclusive).
    Range(usize, usize),
    /// Process specific pages (1-indexed, deduplicated).
    Set(Vec<usize>),
}

impl PageSelection {
    /// Expand the selection into sorted, deduplicated 1-indexed page numbers.
    ///
    /// Any explicitly requested page outside `1..=total_pages` is an error;
    /// `All` on an empty document yields an empty list.
    pub fn select(&self, total_pages: usize) -> Result<Vec<usize>, ProofreadError> {
        let check = |p: usize| {
            if p >= 1 && p <= total_pages {
                Ok(p)
            } else {
                Err(ProofreadError::PageOutOfRange {
                    page: p,
                    total: total_pages,
                })
            }
        };

        let mut pages: Vec<usize> = match self {
            PageSelection::All => (1..=total_pages).collect(),
            PageSelection::Single(p) => vec![check(*p)?],
            PageSelection::Range(start, end) => {
                check(*start)?;
                check(*end)?;
                (*start..=*end).collect()
            }
            PageSelection::Set(pages) => pages
                .iter()
                .map(|&p| check(p))
                .collect::<Result<Vec<_>, _>>()?,
        };
        pages.sort_unstable();
        pages.dedup();
        Ok(pages)
    }
}

impl FromStr for PageSelection {
    type Err = ProofreadError;

    /// Parse `all`, `5`, `3-15` or `1,3,5,7`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        let parse_page = |p: &str| -> Result<usize, ProofreadError> {
            let page: usize = p.trim().parse().map_err(|_| {
                ProofreadError::InvalidConfig(format!("Invalid page number: '{}'", p.trim()))
            })?;
            if page < 1 {
                return Err(ProofreadError::InvalidConfig(format!(
                    "Pages are 1-indexed, minimum is 1 (got {})",
                    page
                )));
            }
            Ok(page)
        };

        if s == "all" {
            return Ok(PageSelection::All);
        }

        if let Some((start, end)) = s.split_once('-') {
            let start = parse_page(start)?;
            let end = parse_page(end)?;
            if start > end {
                return Err(ProofreadError::InvalidConfig(format!(
                    "Invalid page range '{}-{}': start must be <= end",
                    start, end
                )));
            }
            return Ok(PageSelection::Range(start, end));
        }

        if s.contains(',') {
            let pages = s
                .split(',')
                .map(parse_page)
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(PageSelection::Set(pages));
        }

        Ok(PageSelection::Single(parse_page(&s)?))
    }
}
