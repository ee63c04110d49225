pub mod config;
pub mod record;

pub use config::{Config, ConfigError, ExportFormat, IrasExport, MergeStrategy, ValidationRules};
pub use record::{Confidence, LedgerRecord, LineItem, RawExtraction, ValidationWarning};
