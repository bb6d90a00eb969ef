//! HTTP surface for the summarizer.
//!
//! Routes (all but `/api/metrics` require `Authorization: Bearer <token>`):
//!
//! - `POST /api/upload-pdf` – Multipart upload with a single `pdf` field. Validates the file,
//!   extracts its text, and returns `{ message, text }`. Nothing is retained server side.
//! - `POST /api/summarize` – `{ text }` → `{ summary, usedModel, wordCount, summaryWordCount }`
//!   using the comprehensive style at medium length.
//! - `POST /api/summarize-advanced` – `{ text, summaryType?, maxLength? }` →
//!   `{ summary, summaryType, maxLength, usedModel, originalWordCount, summaryWordCount }`.
//! - `GET /api/models` – Models advertised by the provider.
//! - `GET /api/metrics` – Pipeline counters.
//!
//! Every failure is returned as `{ message, error?, attemptedModels? }` with 400 for input
//! problems, 401/403 for credential problems, 500 for extraction and generation failures, and
//! 502 when the model catalog cannot be fetched.

use crate::auth::{Caller, CredentialError, CredentialVerifier, require_bearer};
use crate::ingestion::{MAX_UPLOAD_BYTES, UploadedDocument, ValidationError};
use crate::metrics::MetricsSnapshot;
use crate::pipeline::{PipelineApi, UploadError};
use crate::summarization::{
    LengthClass, ModelDescriptor, SummarizationError, SummaryRequest, SummaryStyle,
};
use axum::{
    Extension, Json, Router,
    extract::{DefaultBodyLimit, Multipart, State, multipart::MultipartError, rejection::JsonRejection},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Room for multipart framing on top of the document ceiling.
const BODY_LIMIT_BYTES: usize = MAX_UPLOAD_BYTES + 1024 * 1024;

/// Multipart field carrying the document.
const UPLOAD_FIELD: &str = "pdf";

/// Build the HTTP router for the pipeline.
pub fn create_router<S>(service: Arc<S>, verifier: Arc<dyn CredentialVerifier>) -> Router
where
    S: PipelineApi + 'static,
{
    let protected = Router::new()
        .route("/api/upload-pdf", post(upload_pdf::<S>))
        .route("/api/summarize", post(summarize::<S>))
        .route("/api/summarize-advanced", post(summarize_advanced::<S>))
        .route("/api/models", get(list_models::<S>))
        .route_layer(middleware::from_fn_with_state(verifier, require_bearer));

    Router::new()
        .merge(protected)
        .route("/api/metrics", get(get_metrics::<S>))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(CorsLayer::permissive())
        .with_state(service)
}

/// Success response for `POST /api/upload-pdf`.
#[derive(Serialize)]
struct UploadResponse {
    message: &'static str,
    text: String,
}

/// Extract the text of an uploaded PDF.
async fn upload_pdf<S>(
    State(service): State<Arc<S>>,
    Extension(caller): Extension<Caller>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError>
where
    S: PipelineApi,
{
    let document = read_upload(multipart).await?;
    let result = service.extract_upload(document).await?;
    tracing::info!(
        caller = %caller.id,
        pages = result.page_count,
        "Upload request completed"
    );
    Ok(Json(UploadResponse {
        message: "PDF processed successfully",
        text: result.text,
    }))
}

/// Pull the `pdf` field out of the multipart body.
///
/// Reading stops as soon as the field grows past the upload ceiling; the truncated document is
/// still handed to the pipeline so validation reports it as too large.
async fn read_upload(mut multipart: Multipart) -> Result<UploadedDocument, AppError> {
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|error| multipart_error(error, 0))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let mut data = Vec::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|error| multipart_error(error, data.len()))?
        {
            data.extend_from_slice(&chunk);
            if data.len() > MAX_UPLOAD_BYTES {
                break;
            }
        }
        return Ok(UploadedDocument::new(filename, content_type, data));
    }

    Err(AppError::Upload(UploadError::Validation(
        ValidationError::MissingFile,
    )))
}

/// Map a multipart failure after `received` bytes of the file field were read.
fn multipart_error(error: MultipartError, received: usize) -> AppError {
    let validation = if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        // The body limit sits above the file ceiling, so the file is over it too.
        ValidationError::TooLarge {
            size: received.max(MAX_UPLOAD_BYTES + 1),
            limit: MAX_UPLOAD_BYTES,
        }
    } else {
        ValidationError::Malformed(error.body_text())
    };
    AppError::Upload(UploadError::Validation(validation))
}

/// Request body for `POST /api/summarize`.
#[derive(Deserialize)]
struct SummarizeBody {
    #[serde(default)]
    text: Option<String>,
}

/// Success response for `POST /api/summarize`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SummarizeResponse {
    summary: String,
    used_model: String,
    word_count: usize,
    summary_word_count: usize,
}

/// Summarize text with the default style and length.
async fn summarize<S>(
    State(service): State<Arc<S>>,
    Extension(caller): Extension<Caller>,
    body: Result<Json<SummarizeBody>, JsonRejection>,
) -> Result<Json<SummarizeResponse>, AppError>
where
    S: PipelineApi,
{
    let Json(body) = body?;
    let result = service
        .summarize(SummaryRequest {
            text: body.text.unwrap_or_default(),
            style: SummaryStyle::default(),
            length: LengthClass::default(),
        })
        .await?;
    tracing::info!(caller = %caller.id, model = %result.used_model, "Summarize request completed");
    Ok(Json(SummarizeResponse {
        summary: result.summary,
        used_model: result.used_model,
        word_count: result.original_word_count,
        summary_word_count: result.summary_word_count,
    }))
}

/// Request body for `POST /api/summarize-advanced`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdvancedSummarizeBody {
    #[serde(default)]
    text: Option<String>,
    /// Kept loose: anything that is not a known style means comprehensive.
    #[serde(default)]
    summary_type: Option<Value>,
    /// Likewise, anything that is not a known length class means medium.
    #[serde(default)]
    max_length: Option<Value>,
}

/// Success response for `POST /api/summarize-advanced`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AdvancedSummarizeResponse {
    summary: String,
    summary_type: SummaryStyle,
    max_length: LengthClass,
    used_model: String,
    original_word_count: usize,
    summary_word_count: usize,
}

/// Summarize text with a caller-selected style and length class.
async fn summarize_advanced<S>(
    State(service): State<Arc<S>>,
    Extension(caller): Extension<Caller>,
    body: Result<Json<AdvancedSummarizeBody>, JsonRejection>,
) -> Result<Json<AdvancedSummarizeResponse>, AppError>
where
    S: PipelineApi,
{
    let Json(body) = body?;
    let style = body
        .summary_type
        .as_ref()
        .and_then(Value::as_str)
        .map(SummaryStyle::parse_lenient)
        .unwrap_or_default();
    let length = body
        .max_length
        .as_ref()
        .and_then(Value::as_str)
        .map(LengthClass::parse_lenient)
        .unwrap_or_default();

    let result = service
        .summarize(SummaryRequest {
            text: body.text.unwrap_or_default(),
            style,
            length,
        })
        .await?;
    tracing::info!(
        caller = %caller.id,
        model = %result.used_model,
        style = %result.style,
        length = %result.length,
        "Advanced summarize request completed"
    );
    Ok(Json(AdvancedSummarizeResponse {
        summary: result.summary,
        summary_type: result.style,
        max_length: result.length,
        used_model: result.used_model,
        original_word_count: result.original_word_count,
        summary_word_count: result.summary_word_count,
    }))
}

/// Response body for `GET /api/models`.
#[derive(Serialize)]
struct ModelsResponse {
    models: Vec<ModelDescriptor>,
}

/// List models advertised by the provider.
async fn list_models<S>(State(service): State<Arc<S>>) -> Result<Json<ModelsResponse>, AppError>
where
    S: PipelineApi,
{
    let models = service.list_models().await?;
    Ok(Json(ModelsResponse { models }))
}

/// Return the pipeline counters.
async fn get_metrics<S>(State(service): State<Arc<S>>) -> Json<MetricsSnapshot>
where
    S: PipelineApi,
{
    Json(service.metrics_snapshot())
}

/// Uniform error body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    attempted_models: Option<Vec<String>>,
}

impl ErrorBody {
    fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: None,
            attempted_models: None,
        }
    }

    fn with_error(message: impl Into<String>, error: impl ToString) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::message(message)
        }
    }
}

enum AppError {
    Upload(UploadError),
    Summarization(SummarizationError),
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Upload(UploadError::Validation(error)) => {
                (StatusCode::BAD_REQUEST, ErrorBody::message(error.to_string()))
            }
            AppError::Upload(UploadError::Extraction(error)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody::with_error("Error processing PDF", error),
            ),
            AppError::Summarization(SummarizationError::EmptyInput) => (
                StatusCode::BAD_REQUEST,
                ErrorBody::message(SummarizationError::EmptyInput.to_string()),
            ),
            AppError::Summarization(SummarizationError::NoModelAvailable { attempted }) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    message: "Failed to generate summary with any available model".into(),
                    error: Some("every candidate model failed or returned an empty summary".into()),
                    attempted_models: Some(attempted),
                },
            ),
            AppError::Summarization(error @ SummarizationError::Catalog(_)) => (
                StatusCode::BAD_GATEWAY,
                ErrorBody::with_error("Error fetching available models", error),
            ),
            AppError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, ErrorBody::message(message))
            }
        };
        (status, Json(body)).into_response()
    }
}

impl From<UploadError> for AppError {
    fn from(inner: UploadError) -> Self {
        Self::Upload(inner)
    }
}

impl From<SummarizationError> for AppError {
    fn from(inner: SummarizationError) -> Self {
        Self::Summarization(inner)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for CredentialError {
    fn into_response(self) -> Response {
        let status = match self {
            CredentialError::Missing => StatusCode::UNAUTHORIZED,
            CredentialError::Invalid => StatusCode::FORBIDDEN,
        };
        (status, Json(ErrorBody::message(self.to_string()))).into_response()
    }
}
