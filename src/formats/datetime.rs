//! Date, time, and datetime format handlers
//!
//! Accepted spellings follow ISO-8601: `YYYY-MM-DD` dates (single-digit
//! month and day tolerated), `HH:MM[:SS[.ffffff]]` times, and
//! `date[T ]time` datetimes with an optional `Z` or `±HH[:MM]` offset.
//! A datetime without an offset stays naive unless the registry was
//! configured with a default offset.

use chrono::{FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use lazy_static::lazy_static;
use regex::Regex;

use super::FormatHandler;
use crate::value::Value;

lazy_static! {
    static ref DATE_REGEX: Regex =
        Regex::new(r"^(?P<year>\d{4})-(?P<month>\d{1,2})-(?P<day>\d{1,2})$").unwrap();
    static ref TIME_REGEX: Regex = Regex::new(
        r"^(?P<hour>\d{1,2}):(?P<minute>\d{1,2})(?::(?P<second>\d{1,2})(?:\.(?P<micro>\d{1,6})\d*)?)?$"
    )
    .unwrap();
    static ref DATETIME_REGEX: Regex = Regex::new(
        r"^(?P<year>\d{4})-(?P<month>\d{1,2})-(?P<day>\d{1,2})[T ](?P<hour>\d{1,2}):(?P<minute>\d{1,2})(?::(?P<second>\d{1,2})(?:\.(?P<micro>\d{1,6})\d*)?)?(?P<tz>Z|[+-]\d{2}(?::?\d{2})?)?$"
    )
    .unwrap();
}

fn capture_u32(caps: &regex::Captures<'_>, name: &str) -> u32 {
    caps.name(name)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// Microsecond digits are right-padded, so `.5` means half a second.
fn capture_micros(caps: &regex::Captures<'_>) -> u32 {
    match caps.name("micro") {
        Some(m) => format!("{:0<6}", m.as_str()).parse().unwrap_or(0),
        None => 0,
    }
}

fn parse_offset(tz: &str) -> Option<FixedOffset> {
    if tz == "Z" {
        return FixedOffset::east_opt(0);
    }
    let digits: String = tz[1..].chars().filter(|c| *c != ':').collect();
    let hours: i32 = digits.get(0..2)?.parse().ok()?;
    let minutes: i32 = match digits.get(2..4) {
        Some(m) => m.parse().ok()?,
        None => 0,
    };
    let seconds = (hours * 3600 + minutes * 60) * if tz.starts_with('-') { -1 } else { 1 };
    FixedOffset::east_opt(seconds)
}

/// `date`: ISO-8601 calendar date, native form `Value::Date`.
pub struct DateFormat;

impl FormatHandler for DateFormat {
    fn name(&self) -> &str {
        "date"
    }

    fn is_native(&self, value: &Value) -> bool {
        matches!(value, Value::Date(_))
    }

    fn parse(&self, raw: &str) -> Option<Value> {
        let caps = DATE_REGEX.captures(raw)?;
        let date = NaiveDate::from_ymd_opt(
            capture_u32(&caps, "year") as i32,
            capture_u32(&caps, "month"),
            capture_u32(&caps, "day"),
        )?;
        Some(Value::Date(date))
    }

    fn to_string(&self, value: &Value) -> Option<String> {
        value.native_string().or_else(|| value.as_str().map(String::from))
    }
}

/// `time`: wall-clock time, native form `Value::Time`.
pub struct TimeFormat;

impl FormatHandler for TimeFormat {
    fn name(&self) -> &str {
        "time"
    }

    fn is_native(&self, value: &Value) -> bool {
        matches!(value, Value::Time(_))
    }

    fn parse(&self, raw: &str) -> Option<Value> {
        let caps = TIME_REGEX.captures(raw)?;
        let time = NaiveTime::from_hms_micro_opt(
            capture_u32(&caps, "hour"),
            capture_u32(&caps, "minute"),
            capture_u32(&caps, "second"),
            capture_micros(&caps),
        )?;
        Some(Value::Time(time))
    }

    fn to_string(&self, value: &Value) -> Option<String> {
        value.native_string().or_else(|| value.as_str().map(String::from))
    }
}

/// `datetime`: ISO-8601 datetime with optional offset.
///
/// Native forms are `Value::DateTime` (offset-aware) and
/// `Value::NaiveDateTime` (no offset supplied or configured).
pub struct DateTimeFormat {
    default_offset: Option<FixedOffset>,
}

impl DateTimeFormat {
    pub fn new(default_offset: Option<FixedOffset>) -> Self {
        Self { default_offset }
    }
}

impl FormatHandler for DateTimeFormat {
    fn name(&self) -> &str {
        "datetime"
    }

    fn is_native(&self, value: &Value) -> bool {
        matches!(value, Value::DateTime(_) | Value::NaiveDateTime(_))
    }

    fn parse(&self, raw: &str) -> Option<Value> {
        let caps = DATETIME_REGEX.captures(raw)?;
        let date = NaiveDate::from_ymd_opt(
            capture_u32(&caps, "year") as i32,
            capture_u32(&caps, "month"),
            capture_u32(&caps, "day"),
        )?;
        let time = NaiveTime::from_hms_micro_opt(
            capture_u32(&caps, "hour"),
            capture_u32(&caps, "minute"),
            capture_u32(&caps, "second"),
            capture_micros(&caps),
        )?;
        let naive = NaiveDateTime::new(date, time);

        let offset = match caps.name("tz") {
            Some(tz) => Some(parse_offset(tz.as_str())?),
            None => self.default_offset,
        };
        match offset {
            Some(offset) => offset
                .from_local_datetime(&naive)
                .single()
                .map(Value::DateTime),
            None => Some(Value::NaiveDateTime(naive)),
        }
    }

    fn to_string(&self, value: &Value) -> Option<String> {
        value.native_string().or_else(|| value.as_str().map(String::from))
    }
}

/// `format_datetime`: datetime parsed with a configurable strftime
/// pattern. Date-only patterns parse to midnight.
pub struct FormatDateTime {
    pattern: String,
}

impl FormatDateTime {
    pub fn new(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
        }
    }
}

impl FormatHandler for FormatDateTime {
    fn name(&self) -> &str {
        "format_datetime"
    }

    fn is_native(&self, value: &Value) -> bool {
        matches!(value, Value::NaiveDateTime(_) | Value::DateTime(_))
    }

    fn parse(&self, raw: &str) -> Option<Value> {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, &self.pattern) {
            return Some(Value::NaiveDateTime(dt));
        }
        let date = NaiveDate::parse_from_str(raw, &self.pattern).ok()?;
        Some(Value::NaiveDateTime(date.and_hms_opt(0, 0, 0)?))
    }

    fn to_string(&self, value: &Value) -> Option<String> {
        match value {
            Value::NaiveDateTime(dt) => Some(dt.format(&self.pattern).to_string()),
            Value::DateTime(dt) => Some(dt.format(&self.pattern).to_string()),
            Value::String(s) => Some(s.clone()),
            _ => None,
        }
    }
}
