pub mod bundle;
pub mod iras;
pub mod writer;

pub use bundle::{column_layout, export_file_name, ExportBundle};
pub use iras::{map_record, write_gst_export, GstExportRow};
pub use writer::{write_bundle, ExportError};

use std::path::PathBuf;

use chrono::NaiveDateTime;
use recepta_core::{Config, LedgerRecord};

/// Paths written by one run's export step.
#[derive(Debug, Clone)]
pub struct ExportPaths {
    pub primary: PathBuf,
    pub gst: Option<PathBuf>,
}

/// Write the run's primary export, then the GST listing when enabled.
/// Zero records is a run-level failure: nothing is written at all.
pub fn export_run(
    records: &[LedgerRecord],
    config: &Config,
    now: NaiveDateTime,
) -> Result<ExportPaths, ExportError> {
    let today = now.date();
    let bundle = ExportBundle::plan(records, config, today)?;
    let primary = write_bundle(&bundle, &config.output_folder)?;

    let gst = if config.iras_export.enabled {
        Some(write_gst_export(
            records,
            &config.iras_export,
            &config.output_folder,
            today,
        )?)
    } else {
        None
    };

    Ok(ExportPaths { primary, gst })
}
