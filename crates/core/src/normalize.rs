//! Timestamp parsing and the common textual form used for comparison.
//!
//! SQLite keeps timestamps as text such as `2021-06-16 20:14:09.221838+00`,
//! PostgreSQL hands out `timestamptz`. Both are reduced to UTC, truncated to
//! one precision and rendered identically before records are compared.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"];
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Sub-second precision kept when timestamps are compared.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TimestampPrecision {
    Seconds,
    Millis,
    #[default]
    Micros,
}

impl TimestampPrecision {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match *self {
            Self::Seconds => "seconds",
            Self::Millis => "millis",
            Self::Micros => "micros",
        }
    }

    const fn step_nanos(self) -> u32 {
        match self {
            Self::Seconds => 1_000_000_000,
            Self::Millis => 1_000_000,
            Self::Micros => 1_000,
        }
    }

    const fn format(self) -> &'static str {
        match self {
            Self::Seconds => "%Y-%m-%d %H:%M:%S",
            Self::Millis => "%Y-%m-%d %H:%M:%S%.3f",
            Self::Micros => "%Y-%m-%d %H:%M:%S%.6f",
        }
    }
}

impl fmt::Display for TimestampPrecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimestampPrecision {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "s" | "seconds" => Ok(Self::Seconds),
            "ms" | "millis" => Ok(Self::Millis),
            "us" | "micros" => Ok(Self::Micros),
            _ => Err(ConfigError::Invalid {
                name: "timestamp precision",
                value: s.to_owned(),
                reason: "expected seconds, millis or micros".to_owned(),
            }),
        }
    }
}

/// Parse a textual timestamp. Values without an offset are taken as UTC.
#[must_use]
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|| {
            NAIVE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|naive| naive.and_utc())
        })
}

/// Parse a textual date, ignoring any time part after the date.
#[must_use]
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let date_part = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

#[must_use]
pub fn truncate_timestamp(ts: DateTime<Utc>, precision: TimestampPrecision) -> DateTime<Utc> {
    let step = precision.step_nanos();
    let nanos = ts.nanosecond();
    // nanosecond() exceeds 999_999_999 only inside a leap second; keep it.
    ts.with_nanosecond(nanos - nanos % step).unwrap_or(ts)
}

#[must_use]
pub fn normalize_timestamp(ts: DateTime<Utc>, precision: TimestampPrecision) -> String {
    truncate_timestamp(ts, precision).format(precision.format()).to_string()
}

#[must_use]
pub fn normalize_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_sqlite_text_with_short_offset() {
        let ts = parse_timestamp("2021-06-16 20:14:09.221838+00").unwrap();
        let expected = Utc.with_ymd_and_hms(2021, 6, 16, 20, 14, 9).unwrap()
            + chrono::Duration::microseconds(221_838);
        assert_eq!(ts, expected);
    }

    #[test]
    fn parses_rfc3339_and_naive_forms() {
        let a = parse_timestamp("2021-06-16T20:14:09+03:00").unwrap();
        let b = parse_timestamp("2021-06-16 17:14:09").unwrap();
        assert_eq!(a, b);
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn parses_dates_with_or_without_time() {
        let d = NaiveDate::from_ymd_opt(2003, 4, 5).unwrap();
        assert_eq!(parse_date("2003-04-05"), Some(d));
        assert_eq!(parse_date("2003-04-05 00:00:00"), Some(d));
        assert_eq!(parse_date("04/05/2003"), None);
    }

    #[test]
    fn truncates_to_each_precision() {
        let ts = Utc.with_ymd_and_hms(2021, 6, 16, 20, 14, 9).unwrap()
            + chrono::Duration::nanoseconds(221_838_417);
        assert_eq!(
            normalize_timestamp(ts, TimestampPrecision::Micros),
            "2021-06-16 20:14:09.221838"
        );
        assert_eq!(normalize_timestamp(ts, TimestampPrecision::Millis), "2021-06-16 20:14:09.221");
        assert_eq!(normalize_timestamp(ts, TimestampPrecision::Seconds), "2021-06-16 20:14:09");
    }

    #[test]
    fn text_and_typed_timestamps_normalize_alike() {
        let from_text = parse_timestamp("2021-06-16 20:14:09.221838+00").unwrap();
        let typed = Utc.with_ymd_and_hms(2021, 6, 16, 20, 14, 9).unwrap()
            + chrono::Duration::nanoseconds(221_838_999);
        for precision in
            [TimestampPrecision::Seconds, TimestampPrecision::Millis, TimestampPrecision::Micros]
        {
            assert_eq!(
                normalize_timestamp(from_text, precision),
                normalize_timestamp(typed, precision)
            );
        }
    }

    #[test]
    fn precision_from_str() {
        assert_eq!("MS".parse::<TimestampPrecision>().unwrap(), TimestampPrecision::Millis);
        assert_eq!("seconds".parse::<TimestampPrecision>().unwrap(), TimestampPrecision::Seconds);
        assert!("hours".parse::<TimestampPrecision>().is_err());
    }
}
