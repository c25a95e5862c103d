//! Row parsing and value formatting helpers.
//!
//! Timestamps are stored UTC as `YYYY-MM-DD HH:MM:SS`, which sorts
//! lexicographically and compares directly against date bounds.

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::DatabaseError;

const STORAGE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render a timestamp in storage form, truncated to the second.
#[must_use]
pub fn format_datetime(timestamp: &DateTime<Utc>) -> String {
    timestamp.format(STORAGE_FORMAT).to_string()
}

/// Start of the given UTC day in storage form.
#[must_use]
pub fn format_day_start(date: NaiveDate) -> String {
    format!("{} 00:00:00", date.format("%Y-%m-%d"))
}

/// Parse a required TEXT column as `DateTime<Utc>`.
///
/// Accepts the storage format and RFC 3339.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string cannot be parsed as either format.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, STORAGE_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| DatabaseError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

/// Parse a TEXT column into a serde-deserializable enum.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string does not match any enum variant.
pub fn parse_enum<T: serde::de::DeserializeOwned>(s: &str) -> Result<T, DatabaseError> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|e| DatabaseError::Query(format!("Failed to parse enum from '{s}': {e}")))
}

/// Read a nullable TEXT column. Returns `None` for both SQL NULL and empty string.
///
/// `row.get::<String>(idx)` on a NULL column returns an error, not `""`.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_opt_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, DatabaseError> {
    match row.get::<Option<String>>(idx)? {
        Some(s) if s.is_empty() => Ok(None),
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use quill_core::Action;

    use super::*;

    #[test]
    fn storage_format_drops_fraction() {
        let ts = Utc.timestamp_opt(1_700_000_000, 999_000_000).unwrap();
        assert_eq!(format_datetime(&ts), "2023-11-14 22:13:20");
    }

    #[test]
    fn parses_both_formats() {
        let stored = parse_datetime("2023-11-14 22:13:20").unwrap();
        let rfc = parse_datetime("2023-11-14T22:13:20Z").unwrap();
        assert_eq!(stored, rfc);
        assert!(parse_datetime("yesterday").is_err());
    }

    #[test]
    fn day_start_bound() {
        let date = NaiveDate::from_ymd_opt(2023, 2, 2).unwrap();
        assert_eq!(format_day_start(date), "2023-02-02 00:00:00");
    }

    #[test]
    fn parses_stored_action() {
        let action: Action = parse_enum("modified").unwrap();
        assert_eq!(action, Action::Modified);
        assert!(parse_enum::<Action>("MODIFIED").is_err());
    }
}
