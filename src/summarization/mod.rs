//! Abstractive summarization through a hosted generative model.
//!
//! [`GenerationClient`] is the seam to the model provider; [`gemini::GeminiClient`] talks to the
//! generative language REST API. [`engine::SummarizationEngine`] builds the prompt and walks the
//! ordered model candidates until one of them answers.

pub mod engine;
pub mod gemini;
pub mod prompt;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

pub use engine::{
    ModelCandidates, SummarizationEngine, SummarizationError, SummaryRequest, SummaryResult,
};
pub use gemini::GeminiClient;
pub use prompt::{LengthClass, SummaryStyle, UnknownStyle, build_prompt, count_words};

/// Errors surfaced by a single call to the model provider.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Provider could not be reached or does not know the model.
    #[error("Model provider unavailable: {0}")]
    ProviderUnavailable(String),
    /// Provider returned an error response.
    #[error("Failed to generate content: {0}")]
    GenerationFailed(String),
    /// Provider response could not be parsed.
    #[error("Malformed provider response: {0}")]
    InvalidResponse(String),
}

/// A model advertised by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDescriptor {
    /// Fully qualified model name, e.g. `models/gemini-pro`.
    pub name: String,
    /// Human readable name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Provider supplied description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Interface implemented by generative model providers.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Run one generation call against `model`. An empty string means the model produced nothing.
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, GenerationError>;

    /// Enumerate the models the provider exposes.
    async fn list_models(&self) -> Result<Vec<ModelDescriptor>, GenerationError>;
}
