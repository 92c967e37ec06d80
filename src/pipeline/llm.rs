//! Model interaction: send one prompt, get one reply.
//!
//! [`TextModel`] is the seam between the session and the network. The real
//! implementation, [`LlmModel`], wraps an `edgequake-llm` provider; tests
//! drive the session with scripted models instead.
//!
//! There is no retry loop here. A failed call is reported to the caller,
//! which aborts the run.

use crate::config::ProofreadConfig;
use crate::error::ProofreadError;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider, ProviderFactory};
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

/// Text returned by a model call, with token accounting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelReply {
    pub text: String,
    pub input_tokens: usize,
    pub output_tokens: usize,
}

impl ModelReply {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

/// Why a model call failed, before the session attaches page and stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelFailure {
    /// The API answered with an error.
    Api(String),
    /// The API answered, but without any text.
    Empty,
}

/// A model that turns a single prompt into a single reply.
pub trait TextModel: Send + Sync {
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<ModelReply, ModelFailure>> + Send;
}

/// [`TextModel`] backed by an `edgequake-llm` provider.
pub struct LlmModel {
    provider: Arc<dyn LLMProvider>,
    temperature: f32,
    max_tokens: Option<usize>,
}

impl LlmModel {
    pub fn new(provider: Arc<dyn LLMProvider>, config: &ProofreadConfig) -> Self {
        Self {
            provider,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    fn options(&self) -> CompletionOptions {
        CompletionOptions {
            temperature: Some(self.temperature),
            max_tokens: self.max_tokens,
            ..Default::default()
        }
    }
}

impl TextModel for LlmModel {
    async fn generate(&self, prompt: &str) -> Result<ModelReply, ModelFailure> {
        let messages = vec![ChatMessage::user(prompt)];
        let options = self.options();

        let response = self
            .provider
            .chat(&messages, Some(&options))
            .await
            .map_err(|e| ModelFailure::Api(e.to_string()))?;

        debug!(
            "{} input tokens, {} output tokens",
            response.prompt_tokens, response.completion_tokens
        );

        if response.content.trim().is_empty() {
            return Err(ModelFailure::Empty);
        }

        Ok(ModelReply {
            text: response.content,
            input_tokens: response.prompt_tokens,
            output_tokens: response.completion_tokens,
        })
    }
}

/// Name of the environment variable holding the credential for `provider`.
///
/// Local providers (ollama, lmstudio) need no credential and return `None`.
pub fn api_key_var(provider: &str) -> Option<&'static str> {
    match provider.to_lowercase().as_str() {
        "gemini" | "google" => Some("GEMINI_API_KEY"),
        "openai" => Some("OPENAI_API_KEY"),
        "anthropic" | "claude" => Some("ANTHROPIC_API_KEY"),
        "mistral" => Some("MISTRAL_API_KEY"),
        "openrouter" => Some("OPENROUTER_API_KEY"),
        "azure" => Some("AZURE_OPENAI_API_KEY"),
        _ => None,
    }
}

/// Fail with [`ProofreadError::MissingApiKey`] unless the provider's
/// credential variable is set to a non-empty value.
///
/// `lookup` reads a variable; production code passes `std::env::var`.
pub fn check_api_key<F>(provider: &str, lookup: F) -> Result<(), ProofreadError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(var) = api_key_var(provider) else {
        return Ok(());
    };
    match lookup(var) {
        Some(value) if !value.trim().is_empty() => Ok(()),
        _ => Err(ProofreadError::MissingApiKey {
            provider: provider.to_string(),
            var: var.to_string(),
        }),
    }
}

/// Resolve the LLM provider for a run.
///
/// 1. **Pre-built provider** (`config.provider`) is used as-is.
/// 2. Otherwise the credential for `config.provider_name` must be present
///    in the environment, and [`ProviderFactory::create_llm_provider`] builds
///    the provider for `config.model`.
pub fn resolve_provider(config: &ProofreadConfig) -> Result<Arc<dyn LLMProvider>, ProofreadError> {
    if let Some(ref provider) = config.provider {
        return Ok(Arc::clone(provider));
    }

    let name = config.provider_name.as_str();
    check_api_key(name, |var| std::env::var(var).ok())?;

    ProviderFactory::create_llm_provider(name, &config.model).map_err(|e| {
        ProofreadError::ProviderNotConfigured {
            provider: name.to_string(),
            hint: format!("{e}"),
        }
    })
}
