use chrono::{NaiveDate, NaiveDateTime};
use recepta_core::{RawExtraction, ValidationRules, ValidationWarning};

const DATE_FORMAT: &str = "%d/%m/%Y";

/// Check a raw extraction against the configured rules. Warnings are
/// advisory: the record always continues downstream.
///
/// Rules run independently, in order: required fields, amount ceiling,
/// future date. A date that does not parse as DD/MM/YYYY draws no warning
/// at all (lenient by intent).
pub fn validate(
    raw: &RawExtraction,
    rules: &ValidationRules,
    now: NaiveDateTime,
) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    for field in &rules.required_fields {
        if is_missing(raw, field) {
            warnings.push(ValidationWarning::new(format!(
                "Missing required field: {field}"
            )));
        }
    }

    let total = raw.total.unwrap_or_default();
    if total > rules.max_amount {
        warnings.push(ValidationWarning::new(format!(
            "Total exceeds {}: {}",
            rules.max_amount, total
        )));
    }

    if rules.no_future_dates {
        if let Some(date) = raw.date.as_deref() {
            if let Ok(parsed) = NaiveDate::parse_from_str(date, DATE_FORMAT) {
                if parsed > now.date() {
                    warnings.push(ValidationWarning::new("Date is in the future"));
                }
            }
        }
    }

    warnings
}

/// A field name the schema does not define always counts as missing.
fn is_missing(raw: &RawExtraction, field: &str) -> bool {
    match field {
        "vendor" => raw.vendor.is_none(),
        "date" => raw.date.is_none(),
        "category" => raw.category.is_none(),
        "items" => raw.items.is_none(),
        "subtotal" => raw.subtotal.is_none(),
        "tax" => raw.tax.is_none(),
        "total" => raw.total.is_none(),
        "currency" => raw.currency.is_none(),
        "payment_method" => raw.payment_method.is_none(),
        "receipt_number" => raw.receipt_number.is_none(),
        "description" => raw.description.is_none(),
        "confidence" => raw.confidence.is_none(),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn rules(required: &[&str], max_amount: i64, no_future_dates: bool) -> ValidationRules {
        ValidationRules {
            required_fields: required.iter().map(|s| s.to_string()).collect(),
            max_amount: Decimal::from(max_amount),
            no_future_dates,
        }
    }

    fn at(date: &str) -> NaiveDateTime {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn messages(warnings: &[ValidationWarning]) -> Vec<&str> {
        warnings.iter().map(|w| w.as_str()).collect()
    }

    #[test]
    fn missing_required_fields_warn_in_order() {
        let raw = RawExtraction {
            total: Some(Decimal::from(5)),
            ..RawExtraction::default()
        };
        let warnings = validate(&raw, &rules(&["vendor", "date", "total"], 10_000, true), at("2025-01-15"));
        assert_eq!(
            messages(&warnings),
            ["Missing required field: vendor", "Missing required field: date"]
        );
    }

    #[test]
    fn unknown_required_field_always_warns() {
        let raw = RawExtraction::default();
        let warnings = validate(&raw, &rules(&["merchant_id"], 10_000, true), at("2025-01-15"));
        assert_eq!(messages(&warnings), ["Missing required field: merchant_id"]);
    }

    #[test]
    fn total_above_ceiling_warns_once() {
        let raw = RawExtraction {
            total: Some(Decimal::new(1200050, 2)),
            ..RawExtraction::default()
        };
        let warnings = validate(&raw, &rules(&[], 10_000, false), at("2025-01-15"));
        assert_eq!(messages(&warnings), ["Total exceeds 10000: 12000.50"]);
    }

    #[test]
    fn total_at_ceiling_does_not_warn() {
        let raw = RawExtraction {
            total: Some(Decimal::from(10_000)),
            ..RawExtraction::default()
        };
        assert!(validate(&raw, &rules(&[], 10_000, false), at("2025-01-15")).is_empty());
    }

    #[test]
    fn absent_total_counts_as_zero() {
        let raw = RawExtraction::default();
        assert!(validate(&raw, &rules(&[], 10_000, false), at("2025-01-15")).is_empty());
    }

    #[test]
    fn future_date_warns() {
        let raw = RawExtraction {
            date: Some("01/06/2026".to_string()),
            ..RawExtraction::default()
        };
        let warnings = validate(&raw, &rules(&[], 10_000, true), at("2025-01-15"));
        assert_eq!(messages(&warnings), ["Date is in the future"]);
    }

    #[test]
    fn future_date_check_disabled() {
        let raw = RawExtraction {
            date: Some("01/06/2026".to_string()),
            ..RawExtraction::default()
        };
        assert!(validate(&raw, &rules(&[], 10_000, false), at("2025-01-15")).is_empty());
    }

    #[test]
    fn past_date_does_not_warn() {
        let raw = RawExtraction {
            date: Some("14/01/2025".to_string()),
            ..RawExtraction::default()
        };
        assert!(validate(&raw, &rules(&[], 10_000, true), at("2025-01-15")).is_empty());
    }

    #[test]
    fn same_day_date_does_not_warn() {
        let raw = RawExtraction {
            date: Some("15/01/2025".to_string()),
            ..RawExtraction::default()
        };
        assert!(validate(&raw, &rules(&[], 10_000, true), at("2025-01-15")).is_empty());
    }

    #[test]
    fn malformed_date_is_silently_skipped() {
        let raw = RawExtraction {
            date: Some("32/13/2025".to_string()),
            ..RawExtraction::default()
        };
        assert!(validate(&raw, &rules(&[], 10_000, true), at("2025-01-15")).is_empty());
    }

    #[test]
    fn missing_date_is_silently_skipped() {
        let raw = RawExtraction::default();
        assert!(validate(&raw, &rules(&[], 10_000, true), at("2025-01-15")).is_empty());
    }

    #[test]
    fn rules_are_independent() {
        let raw = RawExtraction {
            date: Some("01/06/2026".to_string()),
            total: Some(Decimal::from(20_000)),
            ..RawExtraction::default()
        };
        let warnings = validate(&raw, &rules(&["vendor"], 10_000, true), at("2025-01-15"));
        assert_eq!(
            messages(&warnings),
            [
                "Missing required field: vendor",
                "Total exceeds 10000: 20000",
                "Date is in the future"
            ]
        );
    }
}
