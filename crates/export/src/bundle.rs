use chrono::NaiveDate;

use recepta_core::{Config, ExportFormat, LedgerRecord, MergeStrategy};

use crate::writer::ExportError;

/// Output filename for one merge period, stamped with the current date at
/// write time. Weekly buckets use the zero-padded Sunday-first week of
/// year.
pub fn export_file_name(strategy: MergeStrategy, format: ExportFormat, today: NaiveDate) -> String {
    let stem = match strategy {
        MergeStrategy::Single => "expenses_all".to_string(),
        MergeStrategy::Daily => format!("expenses_{}", today.format("%Y-%m-%d")),
        MergeStrategy::Weekly => format!("expenses_week_{}", today.format("%Y-W%U")),
        MergeStrategy::Monthly => format!("expenses_{}", today.format("%Y-%m")),
    };
    format!("{stem}.{}", format.extension())
}

/// Tabular column layout: the configured projection restricted to columns
/// the records actually define, in configured order. Unknown names are
/// dropped silently; an empty projection means every column, in natural
/// field order.
pub fn column_layout(configured: &[String]) -> Vec<&'static str> {
    if configured.is_empty() {
        return LedgerRecord::COLUMNS.to_vec();
    }
    configured
        .iter()
        .filter_map(|name| {
            LedgerRecord::COLUMNS
                .iter()
                .find(|column| **column == name.as_str())
                .copied()
        })
        .collect()
}

/// The in-memory set of records destined for one physical output file.
/// All records in a bundle share one merge period and one format.
#[derive(Debug)]
pub struct ExportBundle<'a> {
    pub file_name: String,
    pub format: ExportFormat,
    /// Projected columns for the tabular formats; the JSON format always
    /// writes the full records.
    pub columns: Vec<&'static str>,
    pub records: &'a [LedgerRecord],
}

impl<'a> ExportBundle<'a> {
    /// Group the run's records under the configured merge period. A run
    /// with zero surviving records produces no bundle and no file.
    pub fn plan(
        records: &'a [LedgerRecord],
        config: &Config,
        today: NaiveDate,
    ) -> Result<Self, ExportError> {
        if records.is_empty() {
            return Err(ExportError::EmptyBatch);
        }
        Ok(Self {
            file_name: export_file_name(config.merge_files, config.output_format, today),
            format: config.output_format,
            columns: column_layout(&config.output_columns),
            records,
        })
    }
}
