use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing pipeline activity since startup.
#[derive(Default)]
pub struct PipelineMetrics {
    documents_extracted: AtomicU64,
    documents_rejected: AtomicU64,
    extraction_failures: AtomicU64,
    summaries_generated: AtomicU64,
    summary_failures: AtomicU64,
    model_fallbacks: AtomicU64,
}

impl PipelineMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// An upload was validated and its text extracted.
    pub fn record_extraction(&self) {
        self.documents_extracted.fetch_add(1, Ordering::Relaxed);
    }

    /// An upload failed validation.
    pub fn record_rejection(&self) {
        self.documents_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// A validated upload could not be stored or parsed.
    pub fn record_extraction_failure(&self) {
        self.extraction_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// A summary was produced after `fallbacks` failed candidates.
    pub fn record_summary(&self, fallbacks: u64) {
        self.summaries_generated.fetch_add(1, Ordering::Relaxed);
        self.model_fallbacks.fetch_add(fallbacks, Ordering::Relaxed);
    }

    /// Summarization failed after `failed_attempts` candidate calls.
    pub fn record_summary_failure(&self, failed_attempts: u64) {
        self.summary_failures.fetch_add(1, Ordering::Relaxed);
        self.model_fallbacks
            .fetch_add(failed_attempts, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            documents_extracted: self.documents_extracted.load(Ordering::Relaxed),
            documents_rejected: self.documents_rejected.load(Ordering::Relaxed),
            extraction_failures: self.extraction_failures.load(Ordering::Relaxed),
            summaries_generated: self.summaries_generated.load(Ordering::Relaxed),
            summary_failures: self.summary_failures.load(Ordering::Relaxed),
            model_fallbacks: self.model_fallbacks.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of pipeline counters used for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct MetricsSnapshot {
    /// Uploads whose text was extracted.
    pub documents_extracted: u64,
    /// Uploads refused by validation.
    pub documents_rejected: u64,
    /// Validated uploads that failed to store or parse.
    pub extraction_failures: u64,
    /// Summaries returned to callers.
    pub summaries_generated: u64,
    /// Summarize requests that failed after validation.
    pub summary_failures: u64,
    /// Failed candidate attempts absorbed by the fallback loop.
    pub model_fallbacks: u64,
}
