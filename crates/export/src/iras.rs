use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use recepta_core::{IrasExport, LedgerRecord};

use crate::writer::ExportError;

/// GST codes whose transactions carry no claimable tax: zero-rated
/// purchases and out-of-scope supplies.
const NO_GST_CODES: [&str; 2] = ["ZP", "OS"];

/// One row of the IRAS GST purchase listing, derived per ledger record and
/// regenerated on each export.
#[derive(Debug, Clone, Serialize)]
pub struct GstExportRow {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Supplier Name")]
    pub supplier_name: String,
    /// Not extracted from receipts; left for manual completion.
    #[serde(rename = "Supplier GST Reg No")]
    pub supplier_gst_reg_no: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Value Excl GST")]
    pub value_excl_gst: Decimal,
    #[serde(rename = "GST Amount")]
    pub gst_amount: Decimal,
    #[serde(rename = "Total Amount")]
    pub total_amount: Decimal,
    #[serde(rename = "GST Code")]
    pub gst_code: String,
    #[serde(rename = "Receipt Reference")]
    pub receipt_reference: String,
}

/// Derive the GST view of one record: code from the category mapping with
/// the configured default as fallback, taxable value from the subtotal
/// (falling back to the total when the subtotal is zero), and a forced
/// zero GST amount for the no-GST codes.
pub fn map_record(record: &LedgerRecord, config: &IrasExport) -> GstExportRow {
    let gst_code = config
        .category_gst_codes
        .get(&record.category)
        .cloned()
        .unwrap_or_else(|| config.default_gst_code.clone());

    let value_excl_gst = if record.subtotal.is_zero() {
        record.total
    } else {
        record.subtotal
    };
    let gst_amount = if NO_GST_CODES.contains(&gst_code.as_str()) {
        Decimal::ZERO
    } else {
        record.tax
    };

    GstExportRow {
        date: record.date.clone(),
        supplier_name: record.vendor.clone(),
        supplier_gst_reg_no: String::new(),
        description: record.description.clone(),
        value_excl_gst,
        gst_amount,
        total_amount: record.total,
        gst_code,
        receipt_reference: record.receipt_number.clone(),
    }
}

/// Write the per-run GST listing as a date-stamped CSV. Always one file
/// per run, independent of the primary format and merge strategy.
pub fn write_gst_export(
    records: &[LedgerRecord],
    config: &IrasExport,
    folder: &Path,
    today: NaiveDate,
) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(folder)?;
    let path = folder.join(format!("iras_gst_export_{}.csv", today.format("%Y-%m-%d")));

    let mut writer = csv::Writer::from_path(&path)?;
    for record in records {
        writer.serialize(map_record(record, config))?;
    }
    writer.flush()?;

    tracing::info!("IRAS GST export: {}", path.display());
    Ok(path)
}
