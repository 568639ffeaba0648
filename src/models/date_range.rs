use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::error::AppError;

/// Inclusive calendar-day window used by list filters.
///
/// Either end may be open. When compared against timestamps the window covers
/// the whole of `to`, i.e. it ends at the next midnight (exclusive).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<Self, AppError> {
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(AppError::validation("fromDate must not be after toDate"));
            }
        }
        Ok(Self { from, to })
    }

    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Midnight UTC at the start of `from`.
    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.from.map(|d| d.and_time(NaiveTime::MIN).and_utc())
    }

    /// Midnight UTC after `to`.
    pub fn end_exclusive(&self) -> Option<DateTime<Utc>> {
        self.to
            .and_then(|d| d.succ_opt())
            .map(|d| d.and_time(NaiveTime::MIN).and_utc())
    }
}

/// Accepts `YYYY-MM-DD`, a naive `YYYY-MM-DDTHH:MM:SS` or an RFC 3339 timestamp.
/// Timestamps keep the calendar date as written, not converted to UTC.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|ts| ts.date())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn single_day_expands_to_full_day() {
        let day = date("2024-03-10");
        let range = DateRange::new(Some(day), Some(day)).unwrap();
        assert_eq!(range.start().unwrap().to_rfc3339(), "2024-03-10T00:00:00+00:00");
        assert_eq!(range.end_exclusive().unwrap().to_rfc3339(), "2024-03-11T00:00:00+00:00");
    }

    #[test]
    fn inverted_range_is_rejected() {
        assert!(DateRange::new(Some(date("2024-03-11")), Some(date("2024-03-10"))).is_err());
        assert!(DateRange::new(None, Some(date("2024-03-10"))).is_ok());
        assert!(DateRange::default().is_unbounded());
    }

    #[test]
    fn parses_dates_and_timestamps() {
        assert_eq!(parse_calendar_date("2024-01-31"), Some(date("2024-01-31")));
        assert_eq!(
            parse_calendar_date("2024-01-31T22:15:00.000+05:30"),
            Some(date("2024-01-31"))
        );
        assert_eq!(parse_calendar_date("2024-01-31T08:00:00Z"), Some(date("2024-01-31")));
        assert_eq!(parse_calendar_date("2024-01-31T08:00:00"), Some(date("2024-01-31")));
        assert_eq!(parse_calendar_date("31/01/2024"), None);
        assert_eq!(parse_calendar_date(""), None);
    }
}
