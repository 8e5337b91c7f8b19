//! Legacy-tolerant field codecs.
//!
//! # Responsibility
//! - Decode envelope/date/number fields from documents that may predate
//!   the keyed store (legacy imports carry whatever the old export held).
//!
//! # Invariants
//! - Malformed numeric input decodes to zero, never to an error.
//! - Unparseable datetime strings decode to `None`, never to an error.
//! - A missing or malformed `created_date` decodes to the Unix epoch so
//!   such records sort to the end of newest-first listings.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::Deserialize;
use serde_json::Value;

const DATETIME_SECONDS_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const DATETIME_MINUTES_FORMAT: &str = "%Y-%m-%dT%H:%M";
const DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) fn unix_epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

pub(crate) fn de_created_date<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let parsed = match &value {
        Value::String(raw) => parse_utc_timestamp(raw),
        _ => None,
    };
    Ok(parsed.unwrap_or_else(unix_epoch))
}

pub(crate) fn de_opt_datetime<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match &value {
        Value::String(raw) => parse_wall_datetime(raw),
        _ => None,
    })
}

pub(crate) fn ser_opt_datetime<S>(
    value: &Option<NaiveDateTime>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(datetime) => serializer.serialize_str(
            &datetime
                .format("%Y-%m-%dT%H:%M:%S")
                .to_string(),
        ),
        None => serializer.serialize_none(),
    }
}

pub(crate) fn de_opt_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match &value {
        Value::String(raw) => parse_date(raw),
        _ => None,
    })
}

pub(crate) fn de_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(lenient_number(&value).unwrap_or(0.0))
}

pub(crate) fn de_opt_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(lenient_number(&value))
}

/// Parses an RFC-3339 or naive timestamp into UTC.
pub(crate) fn parse_utc_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if let Ok(datetime) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(datetime.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(trimmed, DATETIME_SECONDS_FORMAT)
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Parses a due-date style value into local wall-clock time.
///
/// Accepted shapes, in order: RFC-3339 (converted to local time), naive
/// with seconds, naive with minutes. Anything else is `None`.
pub(crate) fn parse_wall_datetime(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if let Ok(datetime) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(datetime.with_timezone(&Local).naive_local());
    }
    NaiveDateTime::parse_from_str(trimmed, DATETIME_SECONDS_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, DATETIME_MINUTES_FORMAT))
        .ok()
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .ok()
        .or_else(|| parse_wall_datetime(trimmed).map(|datetime| datetime.date()))
}

fn lenient_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(raw) => raw.trim().parse::<f64>().ok(),
        _ => None,
    }
}
