//! Request-level orchestration of the upload and summarize flows.

mod service;
pub mod types;

pub use service::{PipelineApi, PipelineService};
pub use types::{InitError, UploadError};
