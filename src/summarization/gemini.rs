//! REST client for the generative language API (`generateContent` and model listing).

use super::{GenerationClient, GenerationError, ModelDescriptor};
use crate::config::Config;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

/// Client for the hosted Gemini models.
pub struct GeminiClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl GeminiClient {
    /// Build a client with a per-request timeout.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GenerationError> {
        let http = Client::builder()
            .user_agent("notes-summarizer/gemini")
            .timeout(timeout)
            .build()
            .map_err(|error| {
                GenerationError::ProviderUnavailable(format!("failed to build HTTP client: {error}"))
            })?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    /// Build a client from the service configuration.
    pub fn from_config(config: &Config) -> Result<Self, GenerationError> {
        Self::new(
            config.gemini_base_url.clone(),
            config.gemini_api_key.clone(),
            config.model_timeout,
        )
    }

    fn root(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    fn generate_endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/{}:generateContent", self.root(), qualified_model(model))
    }

    fn models_endpoint(&self) -> String {
        format!("{}/v1beta/models", self.root())
    }
}

/// `gemini-pro` becomes `models/gemini-pro`; already-qualified names pass through.
fn qualified_model(model: &str) -> String {
    if model.starts_with("models/") {
        model.to_string()
    } else {
        format!("models/{model}")
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateResponse {
    fn into_text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<RemoteModel>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteModel {
    name: String,
    display_name: Option<String>,
    description: Option<String>,
}

#[async_trait]
impl GenerationClient for GeminiClient {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, GenerationError> {
        let payload = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let response = self
            .http
            .post(self.generate_endpoint(model))
            .query(&[("key", self.api_key.as_str())])
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                // Strip the URL: it carries the API key as a query parameter.
                GenerationError::ProviderUnavailable(format!(
                    "failed to reach model service at {}: {}",
                    self.base_url,
                    error.without_url()
                ))
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(GenerationError::ProviderUnavailable(format!(
                "model '{model}' not found"
            )));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::GenerationFailed(format!(
                "model service returned {status}: {body}"
            )));
        }

        let body: GenerateResponse = response.json().await.map_err(|error| {
            GenerationError::InvalidResponse(format!(
                "failed to decode generateContent response: {}",
                error.without_url()
            ))
        })?;

        Ok(body.into_text().trim().to_string())
    }

    async fn list_models(&self) -> Result<Vec<ModelDescriptor>, GenerationError> {
        let response = self
            .http
            .get(self.models_endpoint())
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|error| {
                GenerationError::ProviderUnavailable(format!(
                    "failed to reach model service at {}: {}",
                    self.base_url,
                    error.without_url()
                ))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::GenerationFailed(format!(
                "model listing returned {status}: {body}"
            )));
        }

        let body: ListModelsResponse = response.json().await.map_err(|error| {
            GenerationError::InvalidResponse(format!(
                "failed to decode model listing: {}",
                error.without_url()
            ))
        })?;

        Ok(body
            .models
            .into_iter()
            .map(|model| ModelDescriptor {
                name: model.name,
                display_name: model.display_name,
                description: model.description,
            })
            .collect())
    }
}
