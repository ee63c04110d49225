pub mod enrich;
pub mod extractor;
pub mod gate;
pub mod normalize;
pub mod run;
pub mod validate;

pub use enrich::enrich;
pub use extractor::{ExtractionBackend, ExtractionError, MockExtractor, Provider};
pub use gate::ConfidenceGate;
pub use normalize::VendorNormalizer;
pub use run::{Batch, PipelineError, ProcessedReceipt, ReceiptPipeline, RunSummary};
pub use validate::validate;
