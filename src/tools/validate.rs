//! Semantic argument validation
//!
//! Helpers shared by the tool `validate` implementations. Everything here
//! is pure: a failing check proves no request was sent.

use crate::error::{ToolError, ToolResult};
use chrono::{DateTime, SecondsFormat};

/// Page size must stay within GitLab's accepted window.
pub fn check_per_page(field: &str, value: Option<u32>) -> ToolResult<()> {
    match value {
        Some(v) if !(1..=100).contains(&v) => Err(ToolError::invalid_field(
            field,
            "must be between 1 and 100",
        )),
        _ => Ok(()),
    }
}

/// Pages are 1-based.
pub fn check_page(field: &str, value: Option<u32>) -> ToolResult<()> {
    match value {
        Some(0) => Err(ToolError::invalid_field(field, "must be greater than 0")),
        _ => Ok(()),
    }
}

/// Date filters must be full ISO 8601 timestamps.
pub fn check_timestamp(field: &str, value: Option<&str>) -> ToolResult<()> {
    match value {
        Some(s) if !is_canonical_timestamp(s) => Err(ToolError::invalid_field(
            field,
            "must be a valid ISO 8601 timestamp (YYYY-MM-DDTHH:MM:SSZ)",
        )),
        _ => Ok(()),
    }
}

/// A timestamp is accepted only if it parses as RFC 3339 and its
/// canonical re-serialization equals the input. This rejects date-only
/// strings like `2024-01-01` as well as anything a lenient parser would
/// silently reinterpret.
pub fn is_canonical_timestamp(s: &str) -> bool {
    let Ok(parsed) = DateTime::parse_from_rfc3339(s) else {
        return false;
    };

    let seconds = if s.contains('.') {
        SecondsFormat::Millis
    } else {
        SecondsFormat::Secs
    };

    parsed.to_rfc3339_opts(seconds, s.ends_with('Z')) == s
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("2024-01-15T10:30:00Z")]
    #[case("2024-01-15T10:30:00+02:00")]
    #[case("2024-01-15T10:30:00.500Z")]
    #[case("2024-12-31T23:59:59-05:00")]
    fn test_canonical_timestamps_accepted(#[case] input: &str) {
        assert!(is_canonical_timestamp(input), "{input} should be accepted");
    }

    #[rstest]
    #[case("2024-01-01")]
    #[case("2024-01-15T10:30:00")]
    #[case("2024-13-01T00:00:00Z")]
    #[case("January 15, 2024")]
    #[case("1705315800")]
    #[case("")]
    fn test_non_canonical_timestamps_rejected(#[case] input: &str) {
        assert!(!is_canonical_timestamp(input), "{input} should be rejected");
    }

    #[rstest]
    #[case(None, true)]
    #[case(Some(1), true)]
    #[case(Some(100), true)]
    #[case(Some(0), false)]
    #[case(Some(101), false)]
    fn test_per_page_bounds(#[case] value: Option<u32>, #[case] ok: bool) {
        assert_eq!(check_per_page("per_page", value).is_ok(), ok);
    }

    #[rstest]
    #[case(None, true)]
    #[case(Some(1), true)]
    #[case(Some(0), false)]
    fn test_page_bounds(#[case] value: Option<u32>, #[case] ok: bool) {
        assert_eq!(check_page("page", value).is_ok(), ok);
    }

    #[test]
    fn test_timestamp_error_names_field() {
        let err = check_timestamp("created_after", Some("2024-01-01")).unwrap_err();
        assert!(err.to_string().contains("created_after"));
    }
}
