//! String format detection and structural checks

use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

use super::types::FieldFormat;

static ISO_DATE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

static ISO_DATETIME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}:\d{2}(\.\d+)?(Z|[+-]\d{2}:?\d{2})?$").unwrap()
});

/// URI schemes recognized by the structural check.
const URI_SCHEMES: &[&str] = &["http://", "https://", "ftp://", "file://"];

/// Check for an ISO-8601 full date (`YYYY-MM-DD`).
pub fn is_iso_date(value: &str) -> bool {
    ISO_DATE_REGEX.is_match(value)
}

/// Check for an ISO-8601 date-time (`YYYY-MM-DDTHH:MM:SS` with optional
/// fraction and timezone; a space separator is also accepted).
pub fn is_iso_datetime(value: &str) -> bool {
    ISO_DATETIME_REGEX.is_match(value)
}

/// Lightweight email/URI tagging for string fields no edge-case detector
/// claimed. Name tokens count as much as value shape here: a field called
/// `email` with malformed values is still most usefully tagged as email.
pub fn detect_string_format(field_name: &str, value: &str) -> Option<FieldFormat> {
    let name = field_name.to_lowercase();

    if value.contains('@') || name.contains("email") {
        return Some(FieldFormat::Email);
    }

    if value.starts_with("http://")
        || value.starts_with("https://")
        || name.contains("url")
        || name.contains("uri")
    {
        return Some(FieldFormat::Uri);
    }

    None
}

/// Minimal structural check used by the validator: deliberately tolerant,
/// catching values that cannot possibly be the declared format without
/// attempting full parsing.
pub fn matches_format(value: &str, format: FieldFormat) -> bool {
    match format {
        FieldFormat::Email => match value.split_once('@') {
            Some((local, domain)) => !local.is_empty() && domain.contains('.'),
            None => false,
        },
        FieldFormat::Date => is_iso_date(value),
        FieldFormat::DateTime => value.contains('T') || value.contains(' '),
        FieldFormat::Uri => URI_SCHEMES.iter().any(|s| value.starts_with(s)),
        FieldFormat::Uuid => Uuid::parse_str(value).is_ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_date() {
        assert!(is_iso_date("2024-01-15"));
        assert!(!is_iso_date("2024-1-15"));
        assert!(!is_iso_date("01/15/2024"));
    }

    #[test]
    fn test_iso_datetime() {
        assert!(is_iso_datetime("2024-01-15T10:30:00"));
        assert!(is_iso_datetime("2024-01-15T10:30:00Z"));
        assert!(is_iso_datetime("2024-01-15T10:30:00+05:00"));
        assert!(is_iso_datetime("2024-01-15 10:30:00"));
        assert!(!is_iso_datetime("2024-01-15"));
    }

    #[test]
    fn test_detect_email_by_value_and_name() {
        assert_eq!(
            detect_string_format("contact", "alice@example.com"),
            Some(FieldFormat::Email)
        );
        assert_eq!(
            detect_string_format("work_email", "not-filled-in"),
            Some(FieldFormat::Email)
        );
        assert_eq!(detect_string_format("name", "Alice"), None);
    }

    #[test]
    fn test_detect_uri_by_value_and_name() {
        assert_eq!(
            detect_string_format("link", "https://example.com/page"),
            Some(FieldFormat::Uri)
        );
        assert_eq!(
            detect_string_format("profile_url", "example.com"),
            Some(FieldFormat::Uri)
        );
    }

    #[test]
    fn test_matches_format_email() {
        assert!(matches_format("alice@example.com", FieldFormat::Email));
        assert!(!matches_format("not-an-email", FieldFormat::Email));
        assert!(!matches_format("user@nodot", FieldFormat::Email));
    }

    #[test]
    fn test_matches_format_dates() {
        assert!(matches_format("2024-01-15", FieldFormat::Date));
        assert!(!matches_format("15.01.2024", FieldFormat::Date));
        assert!(matches_format("2024-01-15T10:30:00Z", FieldFormat::DateTime));
        assert!(matches_format("2024-01-15 10:30:00", FieldFormat::DateTime));
        assert!(!matches_format("2024-01-15", FieldFormat::DateTime));
    }

    #[test]
    fn test_matches_format_uri_and_uuid() {
        assert!(matches_format("https://example.com", FieldFormat::Uri));
        assert!(!matches_format("example.com", FieldFormat::Uri));
        assert!(matches_format(
            "550e8400-e29b-41d4-a716-446655440000",
            FieldFormat::Uuid
        ));
        assert!(!matches_format("not-a-uuid", FieldFormat::Uuid));
    }

}
