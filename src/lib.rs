#![deny(missing_docs)]

//! Core library for the notes summarizer: PDF ingestion, text extraction, and model-backed
//! summarization behind a small HTTP surface.

/// HTTP routing and REST handlers.
pub mod api;
/// Bearer credential verification for protected routes.
pub mod auth;
/// Environment-driven configuration management.
pub mod config;
/// Upload validation, scratch storage, and PDF text extraction.
pub mod ingestion;
/// Structured logging and tracing setup.
pub mod logging;
/// Pipeline outcome counters.
pub mod metrics;
/// Service tying ingestion and summarization together.
pub mod pipeline;
/// Prompt construction, provider client, and model fallback.
pub mod summarization;
