//! Data carried through the upload flow and the errors it can raise.

use thiserror::Error;

/// A document received from a client, held in memory until validation passes.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    /// Original filename supplied by the client.
    pub filename: String,
    /// Media type declared by the client, if any. Untrusted.
    pub content_type: Option<String>,
    /// Raw file contents.
    pub data: Vec<u8>,
}

impl UploadedDocument {
    /// Build a document from its parts.
    pub fn new(filename: impl Into<String>, content_type: Option<String>, data: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type,
            data,
        }
    }

    /// Size of the payload in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Plain text recovered from a PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    /// Page text in document order. Empty when the PDF carries no text layer.
    pub text: String,
    /// Number of pages visited.
    pub page_count: usize,
}

/// Reasons an upload is refused before any extraction work starts.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The request carried no file field.
    #[error("No file uploaded")]
    MissingFile,
    /// The multipart body could not be read.
    #[error("Malformed upload: {0}")]
    Malformed(String),
    /// The filename does not end in `.pdf`.
    #[error("Only PDFs are allowed (got '{filename}')")]
    UnsupportedExtension {
        /// Filename as supplied by the client.
        filename: String,
    },
    /// The declared media type is not a PDF type.
    #[error("Only PDFs are allowed (declared content type '{content_type}')")]
    UnsupportedContentType {
        /// Media type as supplied by the client.
        content_type: String,
    },
    /// The payload does not start with the PDF signature.
    #[error("File has a .pdf extension but is not a PDF")]
    NotPdf,
    /// The payload exceeds the upload ceiling.
    #[error("File too large: {size} bytes exceeds the {limit} byte limit")]
    TooLarge {
        /// Observed size in bytes (a lower bound when the transport aborted early).
        size: usize,
        /// Configured ceiling in bytes.
        limit: usize,
    },
}

/// Failures raised while turning a stored PDF into text.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The backing artifact could not be written or read.
    #[error("Failed to access stored document: {0}")]
    Storage(#[from] std::io::Error),
    /// The bytes are not a parseable PDF.
    #[error("Failed to parse PDF: {0}")]
    Malformed(String),
    /// The PDF is encrypted and cannot be read without a password.
    #[error("PDF is encrypted")]
    Encrypted,
    /// The blocking extraction task did not complete.
    #[error("Extraction task failed: {0}")]
    Worker(String),
}
