use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::date_range::parse_calendar_date;
use crate::models::DateRange;

#[derive(Serialize)]
pub struct DeletedResponse {
    pub message: String,
    pub id: Uuid,
}

/// Parse a path or body identifier; malformed ids are a 400, not a 404.
pub fn parse_id(raw: &str, label: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| AppError::validation(format!("Invalid {label} id: '{raw}'")))
}

/// Trimmed, non-empty text or `None`.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Required trimmed text field.
pub fn required(value: Option<String>, field: &str) -> Result<String, AppError> {
    non_blank(value).ok_or_else(|| AppError::validation(format!("{field} is required")))
}

pub fn parse_date(raw: &str, field: &str) -> Result<NaiveDate, AppError> {
    parse_calendar_date(raw).ok_or_else(|| {
        AppError::validation(format!("{field} must be a date (YYYY-MM-DD), got '{raw}'"))
    })
}

/// Optional date field: absent or blank means `None`.
pub fn parse_optional_date(raw: Option<&str>, field: &str) -> Result<Option<NaiveDate>, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => parse_date(s, field).map(Some),
        None => Ok(None),
    }
}

pub fn date_range(from: Option<&str>, to: Option<&str>) -> Result<DateRange, AppError> {
    DateRange::new(
        parse_optional_date(from, "fromDate")?,
        parse_optional_date(to, "toDate")?,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_ids_are_validation_errors() {
        assert!(matches!(parse_id("not-an-id", "client"), Err(AppError::ValidationError(_))));
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&format!(" {id} "), "client").unwrap(), id);
    }

    #[test]
    fn blank_text_is_missing() {
        assert_eq!(non_blank(Some("  ".into())), None);
        assert_eq!(non_blank(Some(" Smith ".into())), Some("Smith".into()));
        assert!(matches!(required(None, "clientName"), Err(AppError::ValidationError(m)) if m == "clientName is required"));
    }

    #[test]
    fn date_range_from_query_strings() {
        let range = date_range(Some("2024-01-01"), Some("")).unwrap();
        assert_eq!(range.from, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(range.to, None);
        assert!(date_range(Some("yesterday"), None).is_err());
        assert!(date_range(Some("2024-02-01"), Some("2024-01-01")).is_err());
    }
}
