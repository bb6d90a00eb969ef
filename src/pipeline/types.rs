//! Errors raised by the pipeline orchestrator.

use crate::ingestion::{ExtractionError, ValidationError};
use crate::summarization::GenerationError;
use thiserror::Error;

/// Terminal failure states of the upload flow.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The upload was rejected before anything was stored.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The upload passed validation but its text could not be extracted.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}

/// Errors raised while wiring the pipeline at startup.
#[derive(Debug, Error)]
pub enum InitError {
    /// The scratch directory could not be created.
    #[error("Failed to prepare upload directory: {0}")]
    Storage(#[from] std::io::Error),
    /// The model client could not be constructed.
    #[error("Failed to initialize model client: {0}")]
    Client(#[from] GenerationError),
}
