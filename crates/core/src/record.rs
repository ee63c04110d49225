use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Qualitative extraction quality reported by the upstream collaborator.
///
/// Ordinals: high=3, medium=2, low=1. An unrecognized label deserializes as
/// `Medium`; an absent or null label defaults to `Low` at the enrichment
/// boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    #[default]
    Low,
}

impl Confidence {
    pub fn ordinal(self) -> u8 {
        match self {
            Confidence::High => 3,
            Confidence::Medium => 2,
            Confidence::Low => 1,
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Confidence::High => write!(f, "high"),
            Confidence::Medium => write!(f, "medium"),
            Confidence::Low => write!(f, "low"),
        }
    }
}

impl std::str::FromStr for Confidence {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high" => Ok(Confidence::High),
            "medium" => Ok(Confidence::Medium),
            "low" => Ok(Confidence::Low),
            other => Err(format!("Unknown confidence label: '{other}'")),
        }
    }
}

impl<'de> Deserialize<'de> for Confidence {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(s.parse().unwrap_or(Confidence::Medium))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LineItem {
    pub description: String,
    pub amount: Decimal,
}

/// The raw record returned by the extraction service, exactly as received.
///
/// The collaborator enforces no invariant: any field may be missing or null,
/// and both land as `None` rather than a parse error. Defaults are applied
/// once, when the record is enriched into a [`LedgerRecord`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawExtraction {
    pub vendor: Option<String>,
    /// Transaction date as extracted, "DD/MM/YYYY".
    pub date: Option<String>,
    pub category: Option<String>,
    pub items: Option<Vec<LineItem>>,
    pub subtotal: Option<Decimal>,
    pub tax: Option<Decimal>,
    pub total: Option<Decimal>,
    pub currency: Option<String>,
    pub payment_method: Option<String>,
    pub receipt_number: Option<String>,
    /// Free-text description; most extractions do not carry one.
    pub description: Option<String>,
    pub confidence: Option<Confidence>,
}

/// A raw extraction after enrichment: vendor normalized, defaults applied,
/// source metadata stamped. Immutable once built, owned by the batch until
/// written.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerRecord {
    pub vendor: String,
    pub date: String,
    pub category: String,
    pub items: Vec<LineItem>,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub currency: String,
    pub payment_method: String,
    pub receipt_number: String,
    pub description: String,
    pub confidence: Confidence,
    /// Source file identifier (the image the record was extracted from).
    pub file_name: String,
    /// Stamped when the record is enriched, "%Y-%m-%d %H:%M:%S".
    pub processed_at: String,
    pub items_count: usize,
}

impl LedgerRecord {
    /// Tabular column names, in natural field order.
    pub const COLUMNS: [&'static str; 15] = [
        "vendor",
        "date",
        "category",
        "items",
        "subtotal",
        "tax",
        "total",
        "currency",
        "payment_method",
        "receipt_number",
        "description",
        "confidence",
        "file_name",
        "processed_at",
        "items_count",
    ];

    /// Render one column as cell text for the tabular exports. Returns
    /// `None` for a column name the record does not define.
    pub fn cell(&self, column: &str) -> Option<String> {
        let value = match column {
            "vendor" => self.vendor.clone(),
            "date" => self.date.clone(),
            "category" => self.category.clone(),
            "items" => serde_json::to_string(&self.items).unwrap_or_default(),
            "subtotal" => self.subtotal.to_string(),
            "tax" => self.tax.to_string(),
            "total" => self.total.to_string(),
            "currency" => self.currency.clone(),
            "payment_method" => self.payment_method.clone(),
            "receipt_number" => self.receipt_number.clone(),
            "description" => self.description.clone(),
            "confidence" => self.confidence.to_string(),
            "file_name" => self.file_name.clone(),
            "processed_at" => self.processed_at.clone(),
            "items_count" => self.items_count.to_string(),
            _ => return None,
        };
        Some(value)
    }
}

/// Advisory note about a rule violation on one record. Warnings never
/// remove a record from the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning(String);

impl ValidationWarning {
    pub fn new(message: impl Into<String>) -> Self {
        ValidationWarning(message.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
