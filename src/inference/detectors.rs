//! Ordered edge-case detectors for field type inference
//!
//! Each detector is a pure function from (field name, non-null samples) to
//! an optional descriptor. The chain in [`EDGE_CASE_DETECTORS`] is evaluated
//! in order and stops at the first match; the ordering is a deliberate
//! priority list, since several detectors can fire on the same literal
//! (`"1"` is a boolean variant, an epoch fragment and a currency magnitude).

use std::collections::BTreeSet;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::formats::{is_iso_date, is_iso_datetime};
use super::types::{CanonicalType, FieldDescriptor, FieldFormat};

/// A single edge-case detector: returns a descriptor when its pattern fires.
pub type Detector = fn(&str, &[&Value]) -> Option<FieldDescriptor>;

/// The detector battery, in priority order.
pub const EDGE_CASE_DETECTORS: &[(&str, Detector)] = &[
    ("boolean_variant", detect_boolean_variant),
    ("date_format", detect_date_format),
    ("phone_number", detect_phone_number),
    ("currency", detect_currency),
];

/// Two-valued vocabularies recognized as boolean encodings.
const BOOLEAN_VOCABULARIES: &[(&str, &[&str], &[&str])] = &[
    ("numeric_01", &["1"], &["0"]),
    ("yes_no", &["yes", "y"], &["no", "n"]),
    ("true_false", &["true", "t"], &["false", "f"]),
    ("on_off", &["on"], &["off"]),
    ("enabled_disabled", &["enabled"], &["disabled"]),
];

/// Field-name tokens that gate the locale date-pattern branch.
const DATE_NAME_TOKENS: &[&str] = &["date", "time", "timestamp", "created", "updated", "modified"];

/// Field-name tokens that gate phone detection.
const PHONE_NAME_TOKENS: &[&str] = &["phone", "tel", "mobile", "cell", "fax"];

/// Field-name tokens that mark numeric values as monetary.
const MONETARY_NAME_TOKENS: &[&str] = &[
    "price", "cost", "amount", "amt", "total", "subtotal", "tax", "fee", "revenue", "salary",
];

static LOCALE_DATE_PATTERNS: Lazy<Vec<(&'static str, Regex, &'static str)>> = Lazy::new(|| {
    vec![
        (
            "MM/DD/YYYY",
            Regex::new(r"^\d{2}/\d{2}/\d{4}$").unwrap(),
            "%m/%d/%Y",
        ),
        (
            "YYYY/MM/DD",
            Regex::new(r"^\d{4}/\d{2}/\d{2}$").unwrap(),
            "%Y/%m/%d",
        ),
        (
            "DD-MM-YYYY",
            Regex::new(r"^\d{2}-\d{2}-\d{4}$").unwrap(),
            "%d-%m-%Y",
        ),
    ]
});

static PHONE_INTERNATIONAL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+\d{1,3}[\s\-.]?[\d\s\-.()]{6,}$").unwrap());

static PHONE_US_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\(?\d{3}\)?[\s\-.]?\d{3}[\s\-.]?\d{4}$").unwrap());

static PHONE_E164_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+?[1-9]\d{7,14}$").unwrap());

static CURRENCY_STRING_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[$€£¥]?\s?\d[\d,]*(\.\d+)?$").unwrap());

fn name_contains_token(field_name: &str, tokens: &[&str]) -> bool {
    let name = field_name.to_lowercase();
    tokens.iter().any(|t| name.contains(t))
}

/// Normalize a scalar to its lowercase trimmed string form for boolean
/// vocabulary matching. Containers never normalize.
fn normalize_scalar(value: &Value) -> Option<String> {
    match value {
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.trim().to_lowercase()),
        _ => None,
    }
}

/// Detect two-valued boolean encodings (`0/1`, `yes/no`, `on/off`, ...).
///
/// The descriptor's type is strictly boolean; the observed token sets are
/// recorded in the rationale for downstream display only.
pub fn detect_boolean_variant(field_name: &str, samples: &[&Value]) -> Option<FieldDescriptor> {
    let mut distinct: BTreeSet<String> = BTreeSet::new();
    for value in samples {
        distinct.insert(normalize_scalar(value)?);
    }
    if distinct.is_empty() {
        return None;
    }

    for (variant, true_tokens, false_tokens) in BOOLEAN_VOCABULARIES {
        let in_vocab = |v: &String| {
            true_tokens.contains(&v.as_str()) || false_tokens.contains(&v.as_str())
        };
        if distinct.iter().all(in_vocab) {
            let observed_true: Vec<&str> = distinct
                .iter()
                .filter(|v| true_tokens.contains(&v.as_str()))
                .map(String::as_str)
                .collect();
            let observed_false: Vec<&str> = distinct
                .iter()
                .filter(|v| false_tokens.contains(&v.as_str()))
                .map(String::as_str)
                .collect();
            return Some(FieldDescriptor::new(
                field_name,
                CanonicalType::Boolean,
                format!(
                    "boolean variant '{}' detected (true tokens: [{}], false tokens: [{}])",
                    variant,
                    observed_true.join(", "),
                    observed_false.join(", ")
                ),
            ));
        }
    }

    None
}

/// Detect date/time encodings: ISO-8601 strings, Unix epoch numbers, and
/// (field-name gated) common locale patterns.
///
/// ISO and epoch branches need no name gating since their shapes are
/// unambiguous; the locale branch is gated to avoid false positives on
/// arbitrary numeric-looking strings. Epoch values are classified, not
/// normalized: the rationale carries the unit and callers convert.
pub fn detect_date_format(field_name: &str, samples: &[&Value]) -> Option<FieldDescriptor> {
    let first = samples.first()?;

    match first {
        Value::String(s) => {
            if is_iso_datetime(s) {
                return Some(
                    FieldDescriptor::new(
                        field_name,
                        CanonicalType::String,
                        "ISO-8601 date-time detected",
                    )
                    .with_format(FieldFormat::DateTime),
                );
            }
            if is_iso_date(s) {
                return Some(
                    FieldDescriptor::new(
                        field_name,
                        CanonicalType::String,
                        "ISO-8601 date detected",
                    )
                    .with_format(FieldFormat::Date),
                );
            }
            if name_contains_token(field_name, DATE_NAME_TOKENS) {
                for (pattern_name, regex, chrono_format) in LOCALE_DATE_PATTERNS.iter() {
                    if regex.is_match(s) && NaiveDate::parse_from_str(s, chrono_format).is_ok() {
                        return Some(
                            FieldDescriptor::new(
                                field_name,
                                CanonicalType::String,
                                format!("locale date pattern {} detected", pattern_name),
                            )
                            .with_format(FieldFormat::Date),
                        );
                    }
                }
            }
            None
        }
        Value::Number(n) => {
            let v = n.as_f64()?;
            if (1e9..1e10).contains(&v) {
                return Some(
                    FieldDescriptor::new(
                        field_name,
                        CanonicalType::String,
                        "Unix epoch timestamp in seconds detected; values need conversion to date-time",
                    )
                    .with_format(FieldFormat::DateTime),
                );
            }
            if (1e12..1e13).contains(&v) {
                return Some(
                    FieldDescriptor::new(
                        field_name,
                        CanonicalType::String,
                        "Unix epoch timestamp in milliseconds detected; values need conversion to date-time",
                    )
                    .with_format(FieldFormat::DateTime),
                );
            }
            None
        }
        _ => None,
    }
}

/// Detect phone numbers, gated on the field name carrying a telephony token.
pub fn detect_phone_number(field_name: &str, samples: &[&Value]) -> Option<FieldDescriptor> {
    if !name_contains_token(field_name, PHONE_NAME_TOKENS) {
        return None;
    }

    let mut country_code_present = false;
    for value in samples {
        let s = value.as_str()?;
        let trimmed = s.trim();
        let matched = PHONE_INTERNATIONAL_REGEX.is_match(trimmed)
            || PHONE_US_REGEX.is_match(trimmed)
            || PHONE_E164_REGEX.is_match(trimmed);
        if !matched {
            return None;
        }
        if trimmed.starts_with('+') {
            country_code_present = true;
        }
    }
    if samples.is_empty() {
        return None;
    }

    Some(FieldDescriptor::new(
        field_name,
        CanonicalType::String,
        format!(
            "phone number pattern detected (country code {})",
            if country_code_present {
                "present"
            } else {
                "absent"
            }
        ),
    ))
}

/// Strip currency symbols and separators, keeping digits and the decimal
/// point, and parse the magnitude.
fn parse_currency_magnitude(s: &str) -> Option<f64> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    cleaned.parse::<f64>().ok()
}

/// Detect monetary amounts: symbol-prefixed decimal strings, or plain
/// numerics under a monetary field name. The symbol is optional, so bare
/// numeric strings ("123") classify as numbers here; that heuristic is
/// intentional and matches how opaque numeric codes have always been
/// treated.
pub fn detect_currency(field_name: &str, samples: &[&Value]) -> Option<FieldDescriptor> {
    if samples.is_empty() {
        return None;
    }

    let all_currency_strings = samples.iter().all(|v| {
        v.as_str()
            .map(|s| CURRENCY_STRING_REGEX.is_match(s.trim()))
            .unwrap_or(false)
    });
    let all_numeric = samples.iter().all(|v| v.is_number());
    let monetary_name = name_contains_token(field_name, MONETARY_NAME_TOKENS);

    if !all_currency_strings && !(all_numeric && monetary_name) {
        return None;
    }

    let mut magnitudes: Vec<f64> = Vec::with_capacity(samples.len());
    for value in samples {
        let magnitude = match value {
            Value::String(s) => parse_currency_magnitude(s),
            Value::Number(n) => n.as_f64(),
            _ => None,
        };
        if let Some(m) = magnitude {
            magnitudes.push(m);
        }
    }
    if magnitudes.is_empty() {
        return None;
    }

    let min = magnitudes.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = magnitudes.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let has_symbols = samples.iter().any(|v| {
        v.as_str()
            .map(|s| s.trim_start().starts_with(['$', '€', '£', '¥']))
            .unwrap_or(false)
    });

    Some(
        FieldDescriptor::new(
            field_name,
            CanonicalType::Number,
            format!(
                "monetary amount detected (currency symbols {})",
                if has_symbols { "present" } else { "absent" }
            ),
        )
        .with_numeric_range(min, max),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn refs(values: &[Value]) -> Vec<&Value> {
        values.iter().collect()
    }

    #[test]
    fn test_detect_boolean_01() {
        let values = vec![json!(0), json!(1), json!(1), json!(0)];
        let d = detect_boolean_variant("is_active", &refs(&values)).unwrap();
        assert_eq!(d.canonical_type, CanonicalType::Boolean);
        assert!(d.rationale.contains("numeric_01"));
    }

    #[test]
    fn test_detect_boolean_yes_no() {
        let values = vec![
            json!("Yes"),
            json!("No"),
            json!("yes"),
            json!("Y"),
            json!("N"),
        ];
        let d = detect_boolean_variant("subscribed", &refs(&values)).unwrap();
        assert_eq!(d.canonical_type, CanonicalType::Boolean);
        assert!(d.rationale.contains("yes_no"));
    }

    #[test]
    fn test_detect_boolean_true_false() {
        let values = vec![json!("true"), json!("False"), json!("TRUE")];
        let d = detect_boolean_variant("flag", &refs(&values)).unwrap();
        assert!(d.rationale.contains("true_false"));
    }

    #[test]
    fn test_detect_boolean_on_off_and_enabled_disabled() {
        let values = vec![json!("On"), json!("OFF")];
        assert!(
            detect_boolean_variant("power", &refs(&values))
                .unwrap()
                .rationale
                .contains("on_off")
        );

        let values = vec![json!("Enabled"), json!("disabled")];
        assert!(
            detect_boolean_variant("feature", &refs(&values))
                .unwrap()
                .rationale
                .contains("enabled_disabled")
        );
    }

    #[test]
    fn test_not_boolean_variant() {
        let values = vec![json!("active"), json!("inactive"), json!("pending")];
        assert!(detect_boolean_variant("status", &refs(&values)).is_none());
    }

    #[test]
    fn test_detect_iso_date() {
        let values = vec![json!("2024-01-15"), json!("2024-02-20")];
        let d = detect_date_format("signup_date", &refs(&values)).unwrap();
        assert_eq!(d.canonical_type, CanonicalType::String);
        assert_eq!(d.format, Some(FieldFormat::Date));
    }

    #[test]
    fn test_detect_iso_datetime() {
        let values = vec![json!("2024-01-15T10:30:00Z")];
        let d = detect_date_format("created_at", &refs(&values)).unwrap();
        assert_eq!(d.format, Some(FieldFormat::DateTime));
    }

    #[test]
    fn test_detect_epoch_seconds() {
        let values = vec![json!(1705334400i64), json!(1705420800i64)];
        let d = detect_date_format("timestamp", &refs(&values)).unwrap();
        assert_eq!(d.format, Some(FieldFormat::DateTime));
        assert!(d.rationale.contains("seconds"));
    }

    #[test]
    fn test_detect_epoch_milliseconds() {
        let values = vec![json!(1705334400000i64)];
        let d = detect_date_format("event_time", &refs(&values)).unwrap();
        assert_eq!(d.format, Some(FieldFormat::DateTime));
        assert!(d.rationale.contains("milliseconds"));
    }

    #[test]
    fn test_locale_pattern_requires_date_name_token() {
        let values = vec![json!("01/15/2024"), json!("02/20/2024")];
        let d = detect_date_format("birth_date", &refs(&values)).unwrap();
        assert_eq!(d.format, Some(FieldFormat::Date));
        assert!(d.rationale.contains("MM/DD/YYYY"));

        // Same values under a non-date name are not classified
        assert!(detect_date_format("lot_number", &refs(&values)).is_none());
    }

    #[test]
    fn test_locale_pattern_rejects_impossible_dates() {
        let values = vec![json!("99/99/2024")];
        assert!(detect_date_format("start_date", &refs(&values)).is_none());
    }

    #[test]
    fn test_not_date_field() {
        let values = vec![json!("abc123"), json!("def456")];
        assert!(detect_date_format("user_id", &refs(&values)).is_none());
    }

    #[test]
    fn test_detect_phone_international() {
        let values = vec![json!("+1-555-123-4567"), json!("+44 20 1234 5678")];
        let d = detect_phone_number("phone_number", &refs(&values)).unwrap();
        assert_eq!(d.canonical_type, CanonicalType::String);
        assert!(d.rationale.contains("country code present"));
    }

    #[test]
    fn test_detect_phone_us_format() {
        let values = vec![json!("(555) 123-4567"), json!("555-123-4567")];
        let d = detect_phone_number("mobile_phone", &refs(&values)).unwrap();
        assert!(d.rationale.contains("country code absent"));
    }

    #[test]
    fn test_detect_phone_e164() {
        let values = vec![json!("+15551234567"), json!("+442012345678")];
        let d = detect_phone_number("telephone", &refs(&values)).unwrap();
        assert!(d.rationale.contains("country code present"));
    }

    #[test]
    fn test_phone_requires_name_gate() {
        let values = vec![json!("+15551234567")];
        assert!(detect_phone_number("user_id", &refs(&values)).is_none());
    }

    #[test]
    fn test_detect_currency_with_symbol() {
        let values = vec![json!("$100.00"), json!("$250.50"), json!("$99.99")];
        let d = detect_currency("price", &refs(&values)).unwrap();
        assert_eq!(d.canonical_type, CanonicalType::Number);
        assert_eq!(d.numeric_range, Some((99.99, 250.5)));
        assert!(d.rationale.contains("symbols present"));
    }

    #[test]
    fn test_detect_currency_numeric_with_monetary_name() {
        let values = vec![json!(100.0), json!(250.5), json!(99.99)];
        let d = detect_currency("total_amount", &refs(&values)).unwrap();
        assert_eq!(d.canonical_type, CanonicalType::Number);
        assert!(d.rationale.contains("symbols absent"));
    }

    #[test]
    fn test_detect_currency_euro() {
        let values = vec![json!("€50.00"), json!("€100.25")];
        let d = detect_currency("cost", &refs(&values)).unwrap();
        assert_eq!(d.numeric_range, Some((50.0, 100.25)));
    }

    #[test]
    fn test_plain_integers_without_monetary_name_are_not_currency() {
        let values = vec![json!(100), json!(200), json!(300)];
        assert!(detect_currency("count", &refs(&values)).is_none());
    }

    #[test]
    fn test_bare_numeric_strings_match_currency_pattern() {
        // Documented heuristic: numeric strings classify as numbers even
        // under identifier-ish names.
        let values = vec![json!("123"), json!("456"), json!("789")];
        let d = detect_currency("product_code", &refs(&values)).unwrap();
        assert_eq!(d.canonical_type, CanonicalType::Number);
        assert_eq!(d.numeric_range, Some((123.0, 789.0)));
    }
}
