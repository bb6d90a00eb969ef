//! Pipeline service sequencing validation, scratch storage, extraction, and summarization.

use crate::{
    config::Config,
    ingestion::{
        ExtractionError, ExtractionResult, PdfTextExtractor, ScratchSpace, TextExtractor,
        UploadedDocument, validate,
    },
    metrics::{MetricsSnapshot, PipelineMetrics},
    pipeline::types::{InitError, UploadError},
    summarization::{
        GeminiClient, ModelCandidates, ModelDescriptor, SummarizationEngine, SummarizationError,
        SummaryRequest, SummaryResult,
    },
};
use async_trait::async_trait;
use std::sync::Arc;

/// Runs the two independent flows exposed over HTTP.
///
/// The upload flow goes validate → store → extract → delete and hands the text back to the
/// caller. The summarize flow takes whatever text the caller sends. The two share no state; a
/// client typically edits the extracted text before asking for a summary. Construct the service
/// once at startup and share it through an `Arc`.
pub struct PipelineService {
    scratch: ScratchSpace,
    extractor: Box<dyn TextExtractor>,
    engine: SummarizationEngine,
    metrics: Arc<PipelineMetrics>,
}

/// Abstraction over the pipeline used by the HTTP surface.
#[async_trait]
pub trait PipelineApi: Send + Sync {
    /// Validate an upload and extract its text.
    async fn extract_upload(
        &self,
        document: UploadedDocument,
    ) -> Result<ExtractionResult, UploadError>;

    /// Summarize caller-supplied text.
    async fn summarize(&self, request: SummaryRequest)
    -> Result<SummaryResult, SummarizationError>;

    /// Enumerate models advertised by the provider.
    async fn list_models(&self) -> Result<Vec<ModelDescriptor>, SummarizationError>;

    /// Retrieve the current metrics snapshot for diagnostics.
    fn metrics_snapshot(&self) -> MetricsSnapshot;
}

impl PipelineService {
    /// Assemble a service from explicit parts.
    pub fn new(
        scratch: ScratchSpace,
        extractor: Box<dyn TextExtractor>,
        engine: SummarizationEngine,
    ) -> Self {
        Self {
            scratch,
            extractor,
            engine,
            metrics: Arc::new(PipelineMetrics::new()),
        }
    }

    /// Build the production pipeline: scratch directory, `lopdf` extractor, Gemini-backed engine.
    pub async fn from_config(config: &Config) -> Result<Self, InitError> {
        let scratch = ScratchSpace::prepare(config.upload_dir.clone()).await?;
        tracing::info!(dir = %scratch.dir().display(), "Upload directory ready");
        let client = GeminiClient::from_config(config)?;
        let engine = SummarizationEngine::new(
            Arc::new(client),
            ModelCandidates::new(config.summary_models.clone()),
            config.model_timeout,
        );
        tracing::info!(
            candidates = ?engine.candidates().as_slice(),
            "Summarization engine initialized"
        );
        Ok(Self::new(scratch, Box::new(PdfTextExtractor), engine))
    }

    /// Validate, store, extract, and delete an upload.
    ///
    /// Nothing is written when validation fails. Once the upload is stored, the stored file is
    /// removed before this returns whether extraction succeeded or not; a failed removal is
    /// logged and does not change the result.
    pub async fn extract_upload(
        &self,
        document: UploadedDocument,
    ) -> Result<ExtractionResult, UploadError> {
        tracing::info!(
            filename = %document.filename,
            bytes = document.size(),
            content_type = ?document.content_type,
            "Upload received"
        );

        if let Err(error) = validate(&document) {
            self.metrics.record_rejection();
            tracing::warn!(filename = %document.filename, error = %error, "Upload rejected");
            return Err(error.into());
        }

        let artifact = match self.scratch.persist(&document).await {
            Ok(artifact) => artifact,
            Err(error) => {
                self.metrics.record_extraction_failure();
                tracing::error!(error = %error, "Failed to store upload");
                return Err(ExtractionError::Storage(error).into());
            }
        };
        drop(document);

        let outcome = self.extractor.extract_file(artifact.path()).await;
        let artifact_path = artifact.path().to_path_buf();
        if let Err(error) = artifact.release().await {
            tracing::warn!(
                path = %artifact_path.display(),
                error = %error,
                "Failed to remove temporary upload"
            );
        }

        match outcome {
            Ok(result) => {
                self.metrics.record_extraction();
                tracing::info!(
                    pages = result.page_count,
                    chars = result.text.chars().count(),
                    "Text extracted"
                );
                Ok(result)
            }
            Err(error) => {
                self.metrics.record_extraction_failure();
                tracing::error!(error = %error, "Text extraction failed");
                Err(error.into())
            }
        }
    }

    /// Summarize text through the engine and record the outcome.
    pub async fn summarize(
        &self,
        request: SummaryRequest,
    ) -> Result<SummaryResult, SummarizationError> {
        match self.engine.summarize(&request).await {
            Ok(result) => {
                self.metrics.record_summary(result.fallbacks as u64);
                Ok(result)
            }
            Err(error) => {
                if let SummarizationError::NoModelAvailable { attempted } = &error {
                    self.metrics.record_summary_failure(attempted.len() as u64);
                }
                Err(error)
            }
        }
    }

    /// Enumerate models advertised by the provider.
    pub async fn list_models(&self) -> Result<Vec<ModelDescriptor>, SummarizationError> {
        self.engine.list_models().await
    }

    /// Return the current pipeline metrics snapshot.
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

#[async_trait]
impl PipelineApi for PipelineService {
    async fn extract_upload(
        &self,
        document: UploadedDocument,
    ) -> Result<ExtractionResult, UploadError> {
        PipelineService::extract_upload(self, document).await
    }

    async fn summarize(
        &self,
        request: SummaryRequest,
    ) -> Result<SummaryResult, SummarizationError> {
        PipelineService::summarize(self, request).await
    }

    async fn list_models(&self) -> Result<Vec<ModelDescriptor>, SummarizationError> {
        PipelineService::list_models(self).await
    }

    fn metrics_snapshot(&self) -> MetricsSnapshot {
        PipelineService::metrics_snapshot(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestion::ValidationError;
    use crate::ingestion::test_pdf::build_pdf;
    use crate::summarization::{GenerationClient, GenerationError, LengthClass, SummaryStyle};
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tempfile::TempDir;

    /// Wraps the real extractor and counts invocations.
    struct CountingExtractor {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl TextExtractor for CountingExtractor {
        async fn extract_file(&self, path: &Path) -> Result<ExtractionResult, ExtractionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            PdfTextExtractor.extract_file(path).await
        }
    }

    /// Extracts normally, then leaves a directory where the stored upload was so removal fails.
    struct BlockingCleanupExtractor;

    #[async_trait]
    impl TextExtractor for BlockingCleanupExtractor {
        async fn extract_file(&self, path: &Path) -> Result<ExtractionResult, ExtractionError> {
            let result = PdfTextExtractor.extract_file(path).await?;
            std::fs::remove_file(path)?;
            std::fs::create_dir(path)?;
            Ok(result)
        }
    }

    struct FixedClient {
        reply: Option<&'static str>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl GenerationClient for FixedClient {
        async fn generate(&self, model: &str, _prompt: &str) -> Result<String, GenerationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply
                .map(str::to_string)
                .ok_or_else(|| GenerationError::ProviderUnavailable(format!("{model} offline")))
        }

        async fn list_models(&self) -> Result<Vec<ModelDescriptor>, GenerationError> {
            Ok(vec![ModelDescriptor {
                name: "models/fixed".into(),
                display_name: None,
                description: None,
            }])
        }
    }

    struct Harness {
        _dir: TempDir,
        scratch_dir: std::path::PathBuf,
        service: PipelineService,
        extractor_calls: Arc<AtomicUsize>,
        model_calls: Arc<AtomicUsize>,
    }

    async fn harness(reply: Option<&'static str>) -> Harness {
        let dir = tempfile::tempdir().expect("tempdir");
        let scratch_dir = dir.path().join("uploads");
        let scratch = ScratchSpace::prepare(&scratch_dir).await.expect("scratch");
        let extractor_calls = Arc::new(AtomicUsize::new(0));
        let model_calls = Arc::new(AtomicUsize::new(0));
        let engine = SummarizationEngine::new(
            Arc::new(FixedClient {
                reply,
                calls: model_calls.clone(),
            }),
            ["m1", "m2"].into_iter().collect(),
            Duration::from_secs(1),
        );
        let service = PipelineService::new(
            scratch,
            Box::new(CountingExtractor {
                calls: extractor_calls.clone(),
            }),
            engine,
        );
        Harness {
            _dir: dir,
            scratch_dir,
            service,
            extractor_calls,
            model_calls,
        }
    }

    fn scratch_is_empty(dir: &Path) -> bool {
        std::fs::read_dir(dir).expect("list scratch").next().is_none()
    }

    #[tokio::test]
    async fn rejected_uploads_never_reach_the_extractor() {
        let harness = harness(Some("summary")).await;
        let oversized = {
            let mut data = b"%PDF-1.4".to_vec();
            data.resize(crate::ingestion::MAX_UPLOAD_BYTES + 1, 0);
            data
        };
        let uploads = vec![
            UploadedDocument::new("notes.docx", Some("application/pdf".into()), build_pdf(&[Some("x")])),
            UploadedDocument::new("notes.pdf", Some("image/png".into()), build_pdf(&[Some("x")])),
            UploadedDocument::new("big.pdf", None, oversized),
        ];

        for upload in uploads {
            let error = harness
                .service
                .extract_upload(upload)
                .await
                .expect_err("rejected");
            assert!(matches!(error, UploadError::Validation(_)));
        }

        assert_eq!(harness.extractor_calls.load(Ordering::SeqCst), 0);
        assert!(scratch_is_empty(&harness.scratch_dir));
        assert_eq!(harness.service.metrics_snapshot().documents_rejected, 3);
    }

    #[tokio::test]
    async fn extracts_text_and_cleans_up() {
        let harness = harness(Some("summary")).await;
        let upload = UploadedDocument::new(
            "lecture.pdf",
            Some("application/pdf".into()),
            build_pdf(&[Some("Photosynthesis converts light"), None]),
        );

        let result = harness
            .service
            .extract_upload(upload)
            .await
            .expect("extraction");

        assert!(result.text.contains("Photosynthesis converts light"));
        assert_eq!(result.page_count, 2);
        assert_eq!(harness.extractor_calls.load(Ordering::SeqCst), 1);
        assert!(scratch_is_empty(&harness.scratch_dir));
        assert_eq!(harness.service.metrics_snapshot().documents_extracted, 1);
    }

    #[tokio::test]
    async fn extraction_failure_still_cleans_up() {
        let harness = harness(Some("summary")).await;
        let upload = UploadedDocument::new(
            "broken.pdf",
            Some("application/pdf".into()),
            b"%PDF-1.7\n%%garbage without xref".to_vec(),
        );

        let error = harness
            .service
            .extract_upload(upload)
            .await
            .expect_err("corrupt pdf");

        assert!(matches!(error, UploadError::Extraction(_)));
        assert!(scratch_is_empty(&harness.scratch_dir));
        assert_eq!(harness.service.metrics_snapshot().extraction_failures, 1);
    }

    #[tokio::test]
    async fn image_only_pdf_extracts_to_empty_text() {
        let harness = harness(Some("summary")).await;
        let upload = UploadedDocument::new("scan.pdf", None, build_pdf(&[None]));

        let result = harness
            .service
            .extract_upload(upload)
            .await
            .expect("empty text is success");
        assert_eq!(result.text, "");
    }

    #[tokio::test]
    async fn summarize_records_success_and_failure() {
        let ok = harness(Some("a short summary")).await;
        let result = ok
            .service
            .summarize(SummaryRequest {
                text: "one two three".into(),
                style: SummaryStyle::Brief,
                length: LengthClass::Short,
            })
            .await
            .expect("summary");
        assert_eq!(result.used_model, "m1");
        assert_eq!(result.original_word_count, 3);
        assert_eq!(ok.service.metrics_snapshot().summaries_generated, 1);

        let failing = harness(None).await;
        let error = failing
            .service
            .summarize(SummaryRequest {
                text: "one two three".into(),
                style: SummaryStyle::Brief,
                length: LengthClass::Short,
            })
            .await
            .expect_err("all candidates down");
        assert!(matches!(error, SummarizationError::NoModelAvailable { .. }));
        let snapshot = failing.service.metrics_snapshot();
        assert_eq!(snapshot.summary_failures, 1);
        assert_eq!(snapshot.model_fallbacks, 2);
    }

    #[tokio::test]
    async fn blank_text_is_rejected_without_model_calls() {
        let harness = harness(Some("unused")).await;
        let error = harness
            .service
            .summarize(SummaryRequest {
                text: "   ".into(),
                style: SummaryStyle::default(),
                length: LengthClass::default(),
            })
            .await
            .expect_err("blank");

        assert!(matches!(error, SummarizationError::EmptyInput));
        assert_eq!(harness.model_calls.load(Ordering::SeqCst), 0);
        assert_eq!(harness.service.metrics_snapshot().summary_failures, 0);
    }

    #[tokio::test]
    async fn validation_error_carries_the_reason() {
        let harness = harness(None).await;
        let error = harness
            .service
            .extract_upload(UploadedDocument::new("a.pdf", None, b"hello".to_vec()))
            .await
            .expect_err("not a pdf");
        assert!(matches!(error, UploadError::Validation(ValidationError::NotPdf)));
    }

    #[tokio::test]
    async fn failed_cleanup_does_not_override_extraction_result() {
        let dir = tempfile::tempdir().expect("tempdir");
        let scratch = ScratchSpace::prepare(dir.path()).await.expect("scratch");
        let engine = SummarizationEngine::new(
            Arc::new(FixedClient {
                reply: Some("summary"),
                calls: Arc::new(AtomicUsize::new(0)),
            }),
            ["m1"].into_iter().collect(),
            Duration::from_secs(1),
        );
        let service = PipelineService::new(scratch, Box::new(BlockingCleanupExtractor), engine);

        let result = service
            .extract_upload(UploadedDocument::new(
                "kept.pdf",
                Some("application/pdf".into()),
                build_pdf(&[Some("Cleanup is best effort")]),
            ))
            .await
            .expect("extraction result survives cleanup failure");

        assert!(result.text.contains("Cleanup is best effort"));
        let snapshot = service.metrics_snapshot();
        assert_eq!(snapshot.documents_extracted, 1);
        assert_eq!(snapshot.extraction_failures, 0);
        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .expect("list scratch")
            .map(|entry| entry.expect("entry").path())
            .collect();
        assert_eq!(leftovers.len(), 1);
        assert!(leftovers[0].is_dir());
    }
}
