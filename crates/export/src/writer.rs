use std::fs::File;
use std::path::{Path, PathBuf};

use rust_xlsxwriter::Workbook;
use thiserror::Error;

use recepta_core::{ExportFormat, LedgerRecord};

use crate::bundle::ExportBundle;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Workbook error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("No records were successfully processed")]
    EmptyBatch,
}

const SHEET_NAME: &str = "Expenses";
const MAX_COLUMN_WIDTH: usize = 50;

/// Write one bundle into the output folder, creating it if absent.
/// The whole table is materialized in memory first; each format takes a
/// single scoped acquisition of the destination file. Returns the path
/// written.
pub fn write_bundle(bundle: &ExportBundle, folder: &Path) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(folder)?;
    let path = folder.join(&bundle.file_name);

    match bundle.format {
        ExportFormat::Excel => write_xlsx(&path, &bundle.columns, bundle.records)?,
        ExportFormat::Csv => write_csv(&path, &bundle.columns, bundle.records)?,
        ExportFormat::Json => write_json(&path, bundle.records)?,
    }

    tracing::info!("Saved {} receipts to {}", bundle.records.len(), path.display());
    Ok(path)
}

/// Auto-fit width: widest of content and header, padded, bounded at 50
/// character units.
fn column_width(header: &str, cells: impl Iterator<Item = String>) -> f64 {
    let content = cells.map(|c| c.len()).max().unwrap_or(0);
    (content.max(header.len()) + 2).min(MAX_COLUMN_WIDTH) as f64
}

fn write_xlsx(
    path: &Path,
    columns: &[&'static str],
    records: &[LedgerRecord],
) -> Result<(), ExportError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, name) in columns.iter().enumerate() {
        sheet.write_string(0, col as u16, *name)?;
    }
    for (row, record) in records.iter().enumerate() {
        for (col, name) in columns.iter().enumerate() {
            let cell = record.cell(name).unwrap_or_default();
            sheet.write_string(row as u32 + 1, col as u16, cell)?;
        }
    }
    for (col, name) in columns.iter().enumerate() {
        let width = column_width(
            name,
            records.iter().map(|r| r.cell(name).unwrap_or_default()),
        );
        sheet.set_column_width(col as u16, width)?;
    }

    workbook.save(path)?;
    Ok(())
}

fn write_csv(
    path: &Path,
    columns: &[&'static str],
    records: &[LedgerRecord],
) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(columns)?;
    for record in records {
        let row: Vec<String> = columns
            .iter()
            .map(|name| record.cell(name).unwrap_or_default())
            .collect();
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

/// The JSON export ignores the column projection: the full record
/// sequence is written with stable field ordering.
fn write_json(path: &Path, records: &[LedgerRecord]) -> Result<(), ExportError> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, records)?;
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::bundle::column_layout;
    use recepta_core::{Confidence, ExportFormat, LineItem};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    pub(crate) fn sample_record(vendor: &str, total: &str) -> LedgerRecord {
        LedgerRecord {
            vendor: vendor.to_string(),
            date: "15/01/2025".to_string(),
            category: "Meals".to_string(),
            items: vec![LineItem {
                description: "Latte".to_string(),
                amount: Decimal::from_str(total).unwrap(),
            }],
            subtotal: Decimal::from_str(total).unwrap(),
            tax: Decimal::ZERO,
            total: Decimal::from_str(total).unwrap(),
            currency: "SGD".to_string(),
            payment_method: "Visa".to_string(),
            receipt_number: "R-1042".to_string(),
            description: String::new(),
            confidence: Confidence::High,
            file_name: "receipt_001.jpg".to_string(),
            processed_at: "2025-01-15 09:30:00".to_string(),
            items_count: 1,
        }
    }

    fn bundle<'a>(
        records: &'a [LedgerRecord],
        format: ExportFormat,
        columns: &[&str],
    ) -> ExportBundle<'a> {
        let configured: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
        ExportBundle {
            file_name: format!("expenses_test.{}", format.extension()),
            format,
            columns: column_layout(&configured),
            records,
        }
    }

    #[test]
    fn csv_writes_header_and_projected_rows() {
        let dir = tempfile::tempdir().unwrap();
        let records = [sample_record("Starbucks", "7.09"), sample_record("Kopitiam", "4.2")];
        let path = write_bundle(
            &bundle(&records, ExportFormat::Csv, &["vendor", "total"]),
            dir.path(),
        )
        .unwrap();

        let contents = std::fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines, ["vendor,total", "Starbucks,7.09", "Kopitiam,4.2"]);
    }

    #[test]
    fn csv_with_no_projection_writes_every_column() {
        let dir = tempfile::tempdir().unwrap();
        let records = [sample_record("Starbucks", "7.09")];
        let path = write_bundle(&bundle(&records, ExportFormat::Csv, &[]), dir.path()).unwrap();

        let contents = std::fs::read_to_string(path).unwrap();
        let header = contents.lines().next().unwrap();
        assert_eq!(header, LedgerRecord::COLUMNS.join(","));
    }

    #[test]
    fn json_ignores_projection_and_keeps_full_records() {
        let dir = tempfile::tempdir().unwrap();
        let records = [sample_record("Starbucks", "7.09")];
        let path = write_bundle(
            &bundle(&records, ExportFormat::Json, &["vendor", "total"]),
            dir.path(),
        )
        .unwrap();

        let contents = std::fs::read_to_string(path).unwrap();
        assert!(contents.contains("\"payment_method\""), "json was {contents}");
        assert!(contents.contains("\"Starbucks\""));
    }

    #[test]
    fn xlsx_saves_a_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let records = [sample_record("Starbucks", "7.09")];
        let path = write_bundle(
            &bundle(&records, ExportFormat::Excel, &["vendor", "total"]),
            dir.path(),
        )
        .unwrap();

        assert!(path.exists());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
        assert_eq!(path.extension().unwrap(), "xlsx");
    }

    #[test]
    fn output_folder_is_created_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("exports").join("2025");
        let records = [sample_record("Starbucks", "7.09")];
        let path = write_bundle(&bundle(&records, ExportFormat::Csv, &[]), &nested).unwrap();
        assert!(path.starts_with(&nested));
        assert!(path.exists());
    }

    #[test]
    fn column_width_is_padded_and_bounded() {
        // Header wins when content is short.
        assert_eq!(column_width("payment_method", ["Visa".to_string()].into_iter()), 16.0);
        // Content wins when longer.
        assert_eq!(column_width("vendor", ["Ya Kun Kaya Toast".to_string()].into_iter()), 19.0);
        // Bounded at 50.
        let long = "x".repeat(80);
        assert_eq!(column_width("vendor", [long].into_iter()), 50.0);
        // No rows: header alone.
        assert_eq!(column_width("tax", std::iter::empty()), 5.0);
    }
}
