use chrono::NaiveDateTime;
use recepta_core::{Config, LedgerRecord, RawExtraction};

use crate::normalize::VendorNormalizer;

const PROCESSED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Turn a raw extraction into an immutable ledger record: apply the
/// boundary defaults (0 for numerics, empty string for text, lowest
/// confidence), normalize the vendor, default the currency, and stamp the
/// source metadata. Downstream logic never re-checks for absent fields.
pub fn enrich(
    raw: RawExtraction,
    file_name: &str,
    normalizer: &VendorNormalizer,
    config: &Config,
    now: NaiveDateTime,
) -> LedgerRecord {
    let items = raw.items.unwrap_or_default();
    let currency = raw
        .currency
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| config.default_currency.clone());

    LedgerRecord {
        vendor: normalizer.normalize(raw.vendor.as_deref().unwrap_or("")),
        date: raw.date.unwrap_or_default(),
        category: raw.category.unwrap_or_default(),
        items_count: items.len(),
        items,
        subtotal: raw.subtotal.unwrap_or_default(),
        tax: raw.tax.unwrap_or_default(),
        total: raw.total.unwrap_or_default(),
        currency,
        payment_method: raw.payment_method.unwrap_or_default(),
        receipt_number: raw.receipt_number.unwrap_or_default(),
        description: raw.description.unwrap_or_default(),
        confidence: raw.confidence.unwrap_or_default(),
        file_name: file_name.to_string(),
        processed_at: now.format(PROCESSED_AT_FORMAT).to_string(),
    }
}
