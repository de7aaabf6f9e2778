//! Helpers for reading optional form fields. HTML forms post empty strings
//! for untouched inputs, so empty and missing are treated alike.

use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

use shared_models::AppError;

fn hh_mm_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d{2}:\d{2}$").expect("valid HH:MM pattern"))
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email pattern")
    })
}

/// Trimmed value, or `None` when missing or blank.
pub fn text(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Untrimmed value, or `None` when missing or empty. Used for passwords.
pub fn secret(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

pub fn required<'a>(value: &'a Option<String>, message: &str) -> Result<&'a str, AppError> {
    text(value).ok_or_else(|| AppError::ValidationError(message.to_string()))
}

/// Parses an optional integer id such as `doctor_id`.
pub fn optional_id(value: &Option<String>, field: &str) -> Result<Option<i64>, AppError> {
    match text(value) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<i64>()
            .map(Some)
            .map_err(|_| AppError::ValidationError(format!("Invalid {}.", field))),
    }
}

pub fn required_id(value: &Option<String>, field: &str) -> Result<i64, AppError> {
    optional_id(value, field)?
        .ok_or_else(|| AppError::ValidationError(format!("{} is required.", field)))
}

/// Strict `HH:MM`, 24-hour clock.
pub fn parse_hh_mm(value: &str) -> Result<NaiveTime, AppError> {
    let invalid = || AppError::ValidationError("Invalid time format. Use HH:MM.".to_string());

    if !hh_mm_pattern().is_match(value) {
        return Err(invalid());
    }
    NaiveTime::parse_from_str(value, "%H:%M").map_err(|_| invalid())
}

/// `YYYY-MM-DDTHH:MM` as posted by `datetime-local` inputs; seconds and a
/// space separator are accepted too.
pub fn parse_datetime_local(value: &str) -> Result<NaiveDateTime, AppError> {
    ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .ok_or_else(|| {
            AppError::ValidationError(
                "Invalid date/time format. Use YYYY-MM-DDTHH:MM.".to_string(),
            )
        })
}

pub fn parse_date(value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        AppError::ValidationError("Invalid date format. Use YYYY-MM-DD.".to_string())
    })
}

pub fn is_valid_email(value: &str) -> bool {
    email_pattern().is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_blank_fields_count_as_missing() {
        assert_eq!(text(&Some("  ".to_string())), None);
        assert_eq!(text(&Some(" Ann ".to_string())), Some("Ann"));
        assert_eq!(text(&None), None);
        assert_eq!(secret(&Some(" pw ".to_string())), Some(" pw "));
        assert_matches!(
            required(&Some(String::new()), "All fields are required."),
            Err(AppError::ValidationError(msg)) if msg == "All fields are required."
        );
    }

    #[test]
    fn test_ids() {
        assert_eq!(optional_id(&None, "doctor_id").unwrap(), None);
        assert_eq!(optional_id(&Some("12".to_string()), "doctor_id").unwrap(), Some(12));
        assert_matches!(
            optional_id(&Some("x".to_string()), "doctor_id"),
            Err(AppError::ValidationError(_))
        );
        assert_matches!(required_id(&None, "doctor_id"), Err(AppError::ValidationError(_)));
    }

    #[test]
    fn test_hh_mm() {
        assert_eq!(parse_hh_mm("09:30").unwrap(), NaiveTime::from_hms_opt(9, 30, 0).unwrap());
        assert!(parse_hh_mm("9:30").is_err());
        assert!(parse_hh_mm("24:00").is_err());
        assert!(parse_hh_mm("09:30:00").is_err());
        assert!(parse_hh_mm("noon").is_err());
    }

    #[test]
    fn test_datetime_local() {
        let parsed = parse_datetime_local("2030-05-01T10:15").unwrap();
        assert_eq!(parsed.to_string(), "2030-05-01 10:15:00");
        assert!(parse_datetime_local("2030-05-01 10:15").is_ok());
        assert!(parse_datetime_local("01/05/2030 10:15").is_err());
    }

    #[test]
    fn test_email_shape() {
        assert!(is_valid_email("ann@example.com"));
        assert!(!is_valid_email("ann.example.com"));
        assert!(!is_valid_email("ann@example"));
    }
}
