//! Upload validation. Runs before anything touches disk.

use super::types::{UploadedDocument, ValidationError};
use std::path::Path;

/// Hard ceiling for uploaded documents (10 MiB).
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

const PDF_SIGNATURE: &[u8] = b"%PDF-";
const ACCEPTED_CONTENT_TYPES: [&str; 3] =
    ["application/pdf", "application/x-pdf", "application/octet-stream"];

/// Accept or reject an upload.
///
/// The extension is always checked because the declared content type comes from the client.
/// A declared type, when present, must also be PDF-compatible, and the payload must start with
/// the PDF signature.
pub fn validate(document: &UploadedDocument) -> Result<(), ValidationError> {
    if !has_pdf_extension(&document.filename) {
        return Err(ValidationError::UnsupportedExtension {
            filename: document.filename.clone(),
        });
    }

    if let Some(content_type) = document.content_type.as_deref() {
        if !is_pdf_content_type(content_type) {
            return Err(ValidationError::UnsupportedContentType {
                content_type: content_type.to_string(),
            });
        }
    }

    if document.size() > MAX_UPLOAD_BYTES {
        return Err(ValidationError::TooLarge {
            size: document.size(),
            limit: MAX_UPLOAD_BYTES,
        });
    }

    if !document.data.starts_with(PDF_SIGNATURE) {
        return Err(ValidationError::NotPdf);
    }

    Ok(())
}

fn has_pdf_extension(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

fn is_pdf_content_type(content_type: &str) -> bool {
    // Parameters such as `; charset=binary` are irrelevant here.
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    ACCEPTED_CONTENT_TYPES.contains(&essence.as_str())
}
