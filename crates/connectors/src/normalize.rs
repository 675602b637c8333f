//! Value normalization for host field types.
//!
//! The host encodes second-precision date-times as a fixed 14-digit `YYYYMMDDHHMMSS` string in
//! UTC. Every other field type passes through untouched.

use crate::fields::Field;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike, Utc};
use loopstudio_error::{Result, StudioError};
use serde_json::Value;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Convert a remote timestamp to the host's `YYYYMMDDHHMMSS` encoding.
///
/// Accepts RFC 3339 strings, ISO-8601 strings without offset (taken as UTC), `YYYY-MM-DD`
/// (midnight UTC) and numbers as epoch milliseconds. `null` stays `None`.
pub fn normalize_date(raw: &Value) -> Result<Option<String>> {
    let instant = match raw {
        Value::Null => return Ok(None),
        Value::String(s) => parse_instant(s.trim()),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .and_then(DateTime::<Utc>::from_timestamp_millis),
        _ => None,
    };

    let instant =
        instant.ok_or_else(|| StudioError::user(format!("Cannot interpret {} as a date", raw)))?;
    render(&instant).map(Some)
}

/// Normalize `raw` for `field`. Missing values become `null`.
pub fn normalize_value(field: &Field, raw: Option<&Value>) -> Result<Value> {
    let raw = match raw {
        Some(v) => v,
        None => return Ok(Value::Null),
    };

    if field.scalar_type.is_date() {
        return normalize_date(raw)
            .map(|d| d.map(Value::String).unwrap_or(Value::Null))
            .map_err(|e| {
                let message = format!("{} (field '{}')", e.message, field.name);
                StudioError { message, ..e }
            });
    }
    Ok(raw.clone())
}

fn parse_instant(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn render(instant: &DateTime<Utc>) -> Result<String> {
    let year = instant.year();
    if !(0..=9999).contains(&year) {
        return Err(StudioError::user(format!(
            "Date {} is outside the supported year range 0000-9999",
            instant.to_rfc3339()
        )));
    }
    Ok(format!(
        "{:04}{:02}{:02}{:02}{:02}{:02}",
        year,
        instant.month(),
        instant.day(),
        instant.hour(),
        instant.minute(),
        instant.second()
    ))
}
