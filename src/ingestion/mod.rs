//! Upload-side building blocks: validation, scratch storage, and PDF text extraction.

pub mod extract;
pub mod storage;
#[cfg(test)]
pub(crate) mod test_pdf;
pub mod types;
pub mod validate;

pub use extract::{PdfTextExtractor, TextExtractor, extract_text};
pub use storage::{ScratchSpace, TempArtifact};
pub use types::{ExtractionError, ExtractionResult, UploadedDocument, ValidationError};
pub use validate::{MAX_UPLOAD_BYTES, validate};
