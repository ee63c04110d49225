use std::collections::HashMap;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Recognized configuration options with their documented defaults.
///
/// Unknown keys are ignored and absent sections fall back to defaults, so a
/// partial (or empty) config file always loads:
///
/// ```toml
/// default_currency = "SGD"
/// merge_files = "weekly"
///
/// [vendor_aliases]
/// "Starbucks SG" = "Starbucks"
///
/// [validation]
/// required_fields = ["vendor", "date", "total"]
/// max_amount = 5000
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Which external extraction service to call. Validated per receipt,
    /// not at load time.
    pub model_provider: String,
    /// Category vocabulary offered to the extraction service.
    pub categories: Vec<String>,
    /// Raw vendor string → canonical name. Keys are case-sensitive here;
    /// lookup falls back to a case-insensitive pass in declared order.
    pub vendor_aliases: IndexMap<String, String>,
    pub validation: ValidationRules,
    pub default_currency: String,
    pub output_folder: PathBuf,
    pub output_format: ExportFormat,
    /// Column projection for tabular exports; empty means all columns.
    pub output_columns: Vec<String>,
    pub merge_files: MergeStrategy,
    pub iras_export: IrasExport,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_provider: "openai".to_string(),
            categories: Vec::new(),
            vendor_aliases: IndexMap::new(),
            validation: ValidationRules::default(),
            default_currency: "SGD".to_string(),
            output_folder: PathBuf::from("./output"),
            output_format: ExportFormat::Excel,
            output_columns: Vec::new(),
            merge_files: MergeStrategy::Daily,
            iras_export: IrasExport::default(),
        }
    }
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml(&std::fs::read_to_string(path)?)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ValidationRules {
    /// Field names that must be present and non-null on the raw record.
    pub required_fields: Vec<String>,
    /// Receipts with a total strictly above this ceiling draw a warning.
    pub max_amount: Decimal,
    pub no_future_dates: bool,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            required_fields: Vec::new(),
            max_amount: Decimal::from(10_000),
            no_future_dates: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IrasExport {
    pub enabled: bool,
    /// GST code used when a category has no entry in `category_gst_codes`.
    pub default_gst_code: String,
    pub category_gst_codes: HashMap<String, String>,
}

impl Default for IrasExport {
    fn default() -> Self {
        Self {
            enabled: false,
            default_gst_code: "TX".to_string(),
            category_gst_codes: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Excel,
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Excel => "xlsx",
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Excel => write!(f, "excel"),
            ExportFormat::Csv => write!(f, "csv"),
            ExportFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "excel" => Ok(ExportFormat::Excel),
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(format!("Unknown output format: '{other}'")),
        }
    }
}

// An unrecognized spelling falls back to the documented default rather
// than failing the whole config load.
impl<'de> Deserialize<'de> for ExportFormat {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(s.parse().unwrap_or_default())
    }
}

/// Time-bucketing policy deciding how many runs' records share one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeStrategy {
    Single,
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl std::fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MergeStrategy::Single => write!(f, "single"),
            MergeStrategy::Daily => write!(f, "daily"),
            MergeStrategy::Weekly => write!(f, "weekly"),
            MergeStrategy::Monthly => write!(f, "monthly"),
        }
    }
}

impl std::str::FromStr for MergeStrategy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" => Ok(MergeStrategy::Single),
            "daily" => Ok(MergeStrategy::Daily),
            "weekly" => Ok(MergeStrategy::Weekly),
            "monthly" => Ok(MergeStrategy::Monthly),
            other => Err(format!("Unknown merge strategy: '{other}'")),
        }
    }
}

impl<'de> Deserialize<'de> for MergeStrategy {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(s.parse().unwrap_or_default())
    }
}
