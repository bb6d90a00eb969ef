//! Scratch storage for uploads awaiting extraction.
//!
//! Every stored upload is owned by a [`TempArtifact`]. Dropping the artifact deletes the file, so
//! the file is gone on every exit path, including early returns and panics. Callers that want to
//! observe deletion failures call [`TempArtifact::release`] instead of relying on `Drop`.

use super::types::UploadedDocument;
use std::io;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use uuid::Uuid;

/// Shared directory for transient upload artifacts.
///
/// Concurrent requests never collide because each artifact gets a unique name.
#[derive(Debug, Clone)]
pub struct ScratchSpace {
    dir: PathBuf,
}

impl ScratchSpace {
    /// Ensure `dir` exists and use it as scratch space.
    pub async fn prepare(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    /// Directory backing this scratch space.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write the upload to a freshly named file.
    pub async fn persist(&self, document: &UploadedDocument) -> io::Result<TempArtifact> {
        let path = self.dir.join(artifact_name(&document.filename));
        let artifact = TempArtifact {
            path,
            released: false,
        };
        // If the write fails half way, dropping `artifact` removes the partial file.
        tokio::fs::write(&artifact.path, &document.data).await?;
        tracing::debug!(path = %artifact.path.display(), bytes = document.size(), "Stored upload");
        Ok(artifact)
    }
}

/// A stored upload that is deleted when released or dropped.
#[derive(Debug)]
pub struct TempArtifact {
    path: PathBuf,
    released: bool,
}

impl TempArtifact {
    /// Location of the stored file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the file now and report the outcome.
    pub async fn release(mut self) -> io::Result<()> {
        self.released = true;
        match tokio::fs::remove_file(&self.path).await {
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}

impl Drop for TempArtifact {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(err) = std::fs::remove_file(&self.path) {
            if err.kind() != io::ErrorKind::NotFound {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "Failed to remove temporary upload"
                );
            }
        }
    }
}

/// `{unix_millis}-{random}-{sanitized filename}`.
fn artifact_name(original: &str) -> String {
    let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    let nonce = Uuid::new_v4().simple().to_string();
    format!("{millis}-{}-{}", &nonce[..8], sanitize_filename(original))
}

/// Keep only the final path component and replace anything outside `[A-Za-z0-9._-]`.
fn sanitize_filename(original: &str) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload.pdf".to_string()
    } else {
        cleaned.to_string()
    }
}
