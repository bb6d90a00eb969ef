//! Ordered model fallback around a [`GenerationClient`].

use super::prompt::{LengthClass, SummaryStyle, build_prompt, count_words};
use super::{GenerationClient, GenerationError, ModelDescriptor};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors returned by [`SummarizationEngine`].
#[derive(Debug, Error)]
pub enum SummarizationError {
    /// The source text is blank.
    #[error("No text provided for summarization")]
    EmptyInput,
    /// Every candidate model failed, timed out, or returned nothing.
    #[error("Failed to generate summary with any available model (tried: {})", .attempted.join(", "))]
    NoModelAvailable {
        /// Candidates tried, in order.
        attempted: Vec<String>,
    },
    /// The provider's model catalog could not be fetched.
    #[error("Failed to list models: {0}")]
    Catalog(#[source] GenerationError),
}

/// Ordered model identifiers. The first entry has the highest priority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelCandidates(Vec<String>);

impl ModelCandidates {
    /// Wrap an ordered list of model identifiers.
    pub fn new(models: Vec<String>) -> Self {
        Self(models)
    }

    /// Candidates in priority order.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl<S: Into<String>> FromIterator<S> for ModelCandidates {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Text to summarize plus the requested shape of the summary.
#[derive(Debug, Clone)]
pub struct SummaryRequest {
    /// Source text. Must contain something other than whitespace.
    pub text: String,
    /// Requested presentation style.
    pub style: SummaryStyle,
    /// Requested length class.
    pub length: LengthClass,
}

/// A generated summary and where it came from.
#[derive(Debug, Clone)]
pub struct SummaryResult {
    /// Generated summary text.
    pub summary: String,
    /// Candidate that produced the summary.
    pub used_model: String,
    /// Style the prompt was built with.
    pub style: SummaryStyle,
    /// Length class the prompt was built with.
    pub length: LengthClass,
    /// Whitespace-delimited word count of the source text.
    pub original_word_count: usize,
    /// Whitespace-delimited word count of the summary.
    pub summary_word_count: usize,
    /// Candidates that failed before the winner answered.
    pub fallbacks: usize,
}

/// Builds prompts and tries candidate models in order until one answers.
///
/// Holds no per-request state; one engine serves every request concurrently.
pub struct SummarizationEngine {
    client: Arc<dyn GenerationClient>,
    candidates: ModelCandidates,
    call_timeout: Duration,
}

impl SummarizationEngine {
    /// Create an engine over `client`, bounding every attempt by `call_timeout`.
    pub fn new(
        client: Arc<dyn GenerationClient>,
        candidates: ModelCandidates,
        call_timeout: Duration,
    ) -> Self {
        Self {
            client,
            candidates,
            call_timeout,
        }
    }

    /// Configured candidates in priority order.
    pub fn candidates(&self) -> &ModelCandidates {
        &self.candidates
    }

    /// Summarize `request.text`.
    ///
    /// Candidates are tried one at a time. A failure, timeout, or blank answer moves on to the
    /// next candidate; the first non-blank answer wins and stops the loop.
    pub async fn summarize(
        &self,
        request: &SummaryRequest,
    ) -> Result<SummaryResult, SummarizationError> {
        if request.text.trim().is_empty() {
            return Err(SummarizationError::EmptyInput);
        }

        let prompt = build_prompt(&request.text, request.style, request.length);
        let mut attempted = Vec::with_capacity(self.candidates.as_slice().len());

        for model in self.candidates.as_slice() {
            attempted.push(model.clone());
            let outcome =
                tokio::time::timeout(self.call_timeout, self.client.generate(model, &prompt)).await;
            match outcome {
                Ok(Ok(text)) if !text.trim().is_empty() => {
                    let summary = text.trim().to_string();
                    let fallbacks = attempted.len() - 1;
                    tracing::info!(
                        model = %model,
                        fallbacks,
                        style = %request.style,
                        length = %request.length,
                        "Summary generated"
                    );
                    return Ok(SummaryResult {
                        original_word_count: count_words(&request.text),
                        summary_word_count: count_words(&summary),
                        summary,
                        used_model: model.clone(),
                        style: request.style,
                        length: request.length,
                        fallbacks,
                    });
                }
                Ok(Ok(_)) => {
                    tracing::warn!(model = %model, "Model returned an empty summary; trying next candidate");
                }
                Ok(Err(error)) => {
                    tracing::warn!(model = %model, error = %error, "Model call failed; trying next candidate");
                }
                Err(_) => {
                    tracing::warn!(
                        model = %model,
                        timeout_ms = self.call_timeout.as_millis() as u64,
                        "Model call timed out; trying next candidate"
                    );
                }
            }
        }

        tracing::error!(attempted = ?attempted, "No candidate model produced a summary");
        Err(SummarizationError::NoModelAvailable { attempted })
    }

    /// List the models advertised by the provider.
    pub async fn list_models(&self) -> Result<Vec<ModelDescriptor>, SummarizationError> {
        self.client
            .list_models()
            .await
            .map_err(SummarizationError::Catalog)
    }
}
