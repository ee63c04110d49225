use chrono::NaiveDateTime;
use thiserror::Error;

use recepta_core::{Confidence, Config, LedgerRecord, ValidationWarning};

use crate::enrich::enrich;
use crate::extractor::{ExtractionBackend, ExtractionError, Provider};
use crate::gate::ConfidenceGate;
use crate::normalize::VendorNormalizer;
use crate::validate::validate;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractionError),
    #[error("Unknown model provider: '{0}'")]
    UnknownProvider(String),
}

/// One successfully processed receipt: the enriched record plus the
/// advisory findings attached to it.
#[derive(Debug)]
pub struct ProcessedReceipt {
    pub record: LedgerRecord,
    pub warnings: Vec<ValidationWarning>,
    pub needs_review: bool,
}

/// Orchestrates: provider check → extract → validate → normalize/enrich →
/// confidence gate, one receipt at a time.
pub struct ReceiptPipeline<B: ExtractionBackend> {
    backend: B,
    config: Config,
    normalizer: VendorNormalizer,
    gate: ConfidenceGate,
}

impl<B: ExtractionBackend> ReceiptPipeline<B> {
    pub fn new(backend: B, config: Config) -> Self {
        Self::with_gate(backend, config, ConfidenceGate::default())
    }

    pub fn with_gate(backend: B, config: Config, gate: ConfidenceGate) -> Self {
        let normalizer = VendorNormalizer::new(&config.vendor_aliases);
        Self { backend, config, normalizer, gate }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Process a single receipt image. Warnings and the review flag are
    /// advisory; the only failures are the extraction service erroring and
    /// an unrecognized provider label, both scoped to this one receipt.
    pub fn process(
        &self,
        file_name: &str,
        image_bytes: &[u8],
        now: NaiveDateTime,
    ) -> Result<ProcessedReceipt, PipelineError> {
        if self.config.model_provider.parse::<Provider>().is_err() {
            return Err(PipelineError::UnknownProvider(
                self.config.model_provider.clone(),
            ));
        }

        let raw = self.backend.extract(image_bytes)?;
        let warnings = validate(&raw, &self.config.validation, now);
        let record = enrich(raw, file_name, &self.normalizer, &self.config, now);
        let needs_review = self.gate.needs_review(record.confidence);

        Ok(ProcessedReceipt { record, warnings, needs_review })
    }

    /// Process a sequence of receipt images to completion, one at a time.
    /// A failure on one file is logged and skipped; the run continues. No
    /// partial record is added to the batch on failure.
    pub fn run<'a, I>(&self, sources: I, now: NaiveDateTime) -> Batch
    where
        I: IntoIterator<Item = (&'a str, &'a [u8])>,
    {
        let mut batch = Batch::default();
        for (file_name, image_bytes) in sources {
            tracing::info!("Processing receipt: {file_name}");
            match self.process(file_name, image_bytes, now) {
                Ok(receipt) => {
                    for warning in &receipt.warnings {
                        tracing::warn!("{file_name}: {warning}");
                    }
                    if receipt.needs_review {
                        tracing::warn!(
                            "{file_name}: low confidence ({}) - review recommended",
                            receipt.record.confidence
                        );
                    }
                    batch.push(receipt);
                }
                Err(error) => {
                    tracing::warn!("Skipping {file_name}: {error}");
                    batch.record_failure(file_name, error);
                }
            }
        }
        batch
    }
}

/// The run's accumulated records: an explicit, append-only object handed
/// through the pipeline stages rather than module state.
#[derive(Debug, Default)]
pub struct Batch {
    receipts: Vec<ProcessedReceipt>,
    failures: Vec<(String, PipelineError)>,
}

impl Batch {
    pub fn push(&mut self, receipt: ProcessedReceipt) {
        self.receipts.push(receipt);
    }

    pub fn record_failure(&mut self, file_name: &str, error: PipelineError) {
        self.failures.push((file_name.to_string(), error));
    }

    pub fn len(&self) -> usize {
        self.receipts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receipts.is_empty()
    }

    pub fn receipts(&self) -> &[ProcessedReceipt] {
        &self.receipts
    }

    pub fn failures(&self) -> &[(String, PipelineError)] {
        &self.failures
    }

    /// Release the records for export; the batch owns them until here.
    pub fn into_records(self) -> Vec<LedgerRecord> {
        self.receipts.into_iter().map(|r| r.record).collect()
    }

    pub fn summary(&self) -> RunSummary {
        let mut summary = RunSummary {
            processed: self.receipts.len(),
            failed: self.failures.len(),
            ..RunSummary::default()
        };
        for receipt in &self.receipts {
            match receipt.record.confidence {
                Confidence::High => summary.high_confidence += 1,
                Confidence::Medium => summary.medium_confidence += 1,
                Confidence::Low => summary.low_confidence += 1,
            }
            if receipt.needs_review {
                summary.review_files.push(receipt.record.file_name.clone());
            }
            for warning in &receipt.warnings {
                summary
                    .warnings
                    .push((receipt.record.file_name.clone(), warning.clone()));
            }
        }
        summary
    }
}

/// End-of-run report: counts per confidence label, files flagged for
/// review, and every accumulated warning. Warnings are surfaced here,
/// never thrown.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub processed: usize,
    pub failed: usize,
    pub high_confidence: usize,
    pub medium_confidence: usize,
    pub low_confidence: usize,
    pub review_files: Vec<String>,
    pub warnings: Vec<(String, ValidationWarning)>,
}

impl RunSummary {
    /// A run with zero surviving records is an unsuccessful run, however
    /// many files were attempted.
    pub fn is_success(&self) -> bool {
        self.processed > 0
    }
}
