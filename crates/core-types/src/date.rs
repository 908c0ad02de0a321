use crate::error::CoreError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Timestamps at or above this magnitude are read as milliseconds, below it as seconds.
/// 1e11 seconds is in the year 5138, while 1e11 milliseconds is early 1973.
const MILLIS_THRESHOLD: i64 = 100_000_000_000;

/// The length of a zero-padded `YYYY-MM-DD` day.
const DAY_LEN: usize = 10;

/// A date as it arrives from a trade file, a market data feed, or calling code.
///
/// The original value is kept untouched so it can be echoed back on chart curves;
/// [`DateValue::normalize`] reduces it to a calendar day for every comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateValue {
    Text(String),
    Timestamp(i64),
    FractionalTimestamp(f64),
    #[serde(skip_deserializing)]
    Date(NaiveDate),
    #[serde(skip_deserializing)]
    DateTime(DateTime<Utc>),
}

impl DateValue {
    /// Reduces the value to its UTC calendar day.
    ///
    /// * native dates use their UTC calendar date,
    /// * strings use their first 10 characters (or the whole string when shorter),
    ///   which must read as `YYYY-MM-DD`,
    /// * numbers are Unix timestamps, in milliseconds when `|n| >= 1e11`.
    pub fn normalize(&self) -> Result<NaiveDate, CoreError> {
        match self {
            DateValue::Date(day) => Ok(*day),
            DateValue::DateTime(ts) => Ok(ts.date_naive()),
            DateValue::Text(text) => {
                let head: String = text.chars().take(DAY_LEN).collect();
                NaiveDate::parse_from_str(&head, "%Y-%m-%d")
                    .map_err(|_| CoreError::InvalidDateFormat(text.clone()))
            }
            DateValue::Timestamp(raw) => day_from_timestamp(*raw)
                .ok_or_else(|| CoreError::InvalidDateFormat(raw.to_string())),
            DateValue::FractionalTimestamp(raw) => {
                if !raw.is_finite() {
                    return Err(CoreError::InvalidDateFormat(raw.to_string()));
                }
                day_from_timestamp(raw.trunc() as i64)
                    .ok_or_else(|| CoreError::InvalidDateFormat(raw.to_string()))
            }
        }
    }

    /// The canonical `YYYY-MM-DD` form of the value.
    pub fn canonical(&self) -> Result<String, CoreError> {
        Ok(self.normalize()?.format("%Y-%m-%d").to_string())
    }
}

fn day_from_timestamp(raw: i64) -> Option<NaiveDate> {
    let ts = if raw.unsigned_abs() >= MILLIS_THRESHOLD as u64 {
        DateTime::from_timestamp_millis(raw)?
    } else {
        DateTime::from_timestamp(raw, 0)?
    };
    Some(ts.date_naive())
}

impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateValue::Text(text) => write!(f, "{}", text),
            DateValue::Timestamp(raw) => write!(f, "{}", raw),
            DateValue::FractionalTimestamp(raw) => write!(f, "{}", raw),
            DateValue::Date(day) => write!(f, "{}", day),
            DateValue::DateTime(ts) => write!(f, "{}", ts.to_rfc3339()),
        }
    }
}

impl From<&str> for DateValue {
    fn from(value: &str) -> Self {
        DateValue::Text(value.to_string())
    }
}

impl From<String> for DateValue {
    fn from(value: String) -> Self {
        DateValue::Text(value)
    }
}

impl From<NaiveDate> for DateValue {
    fn from(value: NaiveDate) -> Self {
        DateValue::Date(value)
    }
}

impl From<DateTime<Utc>> for DateValue {
    fn from(value: DateTime<Utc>) -> Self {
        DateValue::DateTime(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn strings_keep_only_the_calendar_day() {
        assert_eq!(DateValue::from("2024-03-05").normalize(), Ok(day(2024, 3, 5)));
        assert_eq!(
            DateValue::from("2024-03-05T23:59:59Z").normalize(),
            Ok(day(2024, 3, 5))
        );
        assert_eq!(
            DateValue::from("2024-03-05 09:30").canonical(),
            Ok("2024-03-05".to_string())
        );
    }

    #[test]
    fn unreadable_strings_are_rejected() {
        assert_eq!(
            DateValue::from("yesterday").normalize(),
            Err(CoreError::InvalidDateFormat("yesterday".to_string()))
        );
        assert!(DateValue::from("").normalize().is_err());
        assert!(DateValue::from("05/03/2024").normalize().is_err());
    }

    #[test]
    fn native_dates_use_utc_day() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 31, 23, 30, 0).unwrap();
        assert_eq!(DateValue::from(ts).normalize(), Ok(day(2024, 1, 31)));
        assert_eq!(DateValue::from(day(2023, 12, 1)).canonical(), Ok("2023-12-01".to_string()));
    }

    #[test]
    fn timestamps_accept_seconds_and_millis() {
        // 2024-01-02T00:00:00Z
        assert_eq!(DateValue::Timestamp(1_704_153_600).normalize(), Ok(day(2024, 1, 2)));
        assert_eq!(DateValue::Timestamp(1_704_153_600_000).normalize(), Ok(day(2024, 1, 2)));
        assert_eq!(
            DateValue::FractionalTimestamp(1_704_153_600.75).normalize(),
            Ok(day(2024, 1, 2))
        );
        assert!(DateValue::FractionalTimestamp(f64::NAN).normalize().is_err());
    }

    #[test]
    fn json_values_deserialize_into_the_right_variant() {
        let text: DateValue = serde_json::from_str("\"2024-01-02\"").unwrap();
        assert_eq!(text, DateValue::Text("2024-01-02".to_string()));
        let number: DateValue = serde_json::from_str("1704153600").unwrap();
        assert_eq!(number, DateValue::Timestamp(1_704_153_600));
        let fractional: DateValue = serde_json::from_str("1704153600.5").unwrap();
        assert_eq!(fractional, DateValue::FractionalTimestamp(1_704_153_600.5));
    }
}
