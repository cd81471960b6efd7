//! Conversions between wire date formats and [`DateTime<Utc>`].
//!
//! Two formats appear in the Memento protocol:
//!
//! | Where | Format | Example |
//! |-------|--------|---------|
//! | `Accept-Datetime`, `Memento-Datetime`, link `datetime` | RFC 1123 | `Thu, 01 Apr 2010 12:00:00 GMT` |
//! | TimeMap JSON | `%Y-%m-%dT%H:%M:%SZ` | `2010-04-01T12:00:00Z` |
//!
//! The weekday in an HTTP date is not checked against the calendar date.
//! Archives in the wild send inconsistent weekdays and the date itself is
//! what matters for negotiation.

use crate::core::error::{MementoError, Result};
use chrono::{DateTime, NaiveDateTime, Utc};

const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";
const HTTP_DATE_BODY_FORMAT: &str = "%d %b %Y %H:%M:%S";
const TIMEMAP_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Parse an RFC 1123 HTTP date such as `Sun, 01 Apr 2010 12:00:00 GMT`.
pub fn parse_http_datetime(value: &str) -> Result<DateTime<Utc>> {
    let trimmed = value.trim();
    let body = match trimmed.split_once(',') {
        Some((_weekday, rest)) => rest.trim(),
        None => trimmed,
    };
    let body = body
        .strip_suffix("GMT")
        .ok_or_else(|| MementoError::DateParse(format!("Missing GMT zone: {}", value)))?
        .trim_end();

    NaiveDateTime::parse_from_str(body, HTTP_DATE_BODY_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| MementoError::DateParse(format!("Invalid HTTP date {:?}: {}", value, e)))
}

/// Format a timestamp as an RFC 1123 HTTP date.
pub fn format_http_datetime(datetime: &DateTime<Utc>) -> String {
    datetime.format(HTTP_DATE_FORMAT).to_string()
}

/// Parse a TimeMap JSON date such as `2010-04-01T12:00:00Z`.
pub fn parse_timemap_datetime(value: &str) -> Result<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value.trim(), TIMEMAP_DATE_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| MementoError::DateParse(format!("Invalid TimeMap date {:?}: {}", value, e)))
}

pub fn format_timemap_datetime(datetime: &DateTime<Utc>) -> String {
    datetime.format(TIMEMAP_DATE_FORMAT).to_string()
}

/// Lenient variant of [`parse_http_datetime`]: absent or empty input is `None`.
///
/// # Examples
///
/// ```
/// use memento_rs::convert_to_datetime;
///
/// assert!(convert_to_datetime(Some("Sun, 01 Apr 2010 12:00:00 GMT")).unwrap().is_some());
/// assert!(convert_to_datetime(Some("")).unwrap().is_none());
/// assert!(convert_to_datetime(None).unwrap().is_none());
/// assert!(convert_to_datetime(Some("Sun, 01 Apr 2010 12:00:00 G")).is_err());
/// ```
pub fn convert_to_datetime(value: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    match value {
        Some(v) if !v.trim().is_empty() => parse_http_datetime(v).map(Some),
        _ => Ok(None),
    }
}

/// Lenient variant of [`format_http_datetime`].
pub fn convert_to_http_datetime(datetime: Option<&DateTime<Utc>>) -> Option<String> {
    datetime.map(format_http_datetime)
}

/// Parse a caller-supplied datetime: HTTP date, RFC 3339 or TimeMap format.
pub fn parse_user_datetime(value: &str) -> Result<DateTime<Utc>> {
    parse_http_datetime(value)
        .or_else(|_| {
            DateTime::parse_from_rfc3339(value.trim())
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| MementoError::DateParse(e.to_string()))
        })
        .or_else(|_| parse_timemap_datetime(value))
        .map_err(|_| MementoError::InvalidInput(format!("Unrecognised datetime: {}", value)))
}
