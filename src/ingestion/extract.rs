//! PDF text extraction backed by `lopdf`.

use super::types::{ExtractionError, ExtractionResult};
use async_trait::async_trait;
use lopdf::Document;
use std::path::Path;

/// Turns a stored document into plain text.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Read the file at `path` and extract its text.
    async fn extract_file(&self, path: &Path) -> Result<ExtractionResult, ExtractionError>;
}

/// Default extractor: reads the file asynchronously, parses on the blocking pool.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfTextExtractor;

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    async fn extract_file(&self, path: &Path) -> Result<ExtractionResult, ExtractionError> {
        let bytes = tokio::fs::read(path).await?;
        tokio::task::spawn_blocking(move || extract_text(&bytes))
            .await
            .map_err(|err| ExtractionError::Worker(err.to_string()))?
    }
}

/// Extract the text layer of an in-memory PDF, page by page, in document order.
///
/// A well-formed PDF without a text layer yields an empty string. No OCR is attempted.
pub fn extract_text(bytes: &[u8]) -> Result<ExtractionResult, ExtractionError> {
    let document =
        Document::load_mem(bytes).map_err(|err| ExtractionError::Malformed(err.to_string()))?;
    if document.is_encrypted() {
        return Err(ExtractionError::Encrypted);
    }

    let pages = document.get_pages();
    let mut page_texts = Vec::with_capacity(pages.len());
    // BTreeMap keys are page numbers, so iteration follows document order.
    for page_number in pages.keys() {
        let text = document.extract_text(&[*page_number]).map_err(|err| {
            ExtractionError::Malformed(format!("page {page_number}: {err}"))
        })?;
        let text = text.trim_end();
        if !text.trim().is_empty() {
            page_texts.push(text.to_string());
        }
    }

    Ok(ExtractionResult {
        text: page_texts.join("\n\n"),
        page_count: pages.len(),
    })
}
