//! Time and validation helpers shared by the pipeline stages.
//!
//! Everything here is pure: the clock is always passed in, and malformed
//! input degrades to a neutral value instead of an error.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

/// Milliseconds in one day.
pub const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Naive date-time layouts accepted for feed timestamps, read as UTC.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%b %d, %Y %H:%M:%S",
    "%B %d, %Y %H:%M:%S",
];

/// Date-only layouts accepted for feed timestamps (midnight UTC).
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d", "%b %d, %Y", "%B %d, %Y"];

/// Browser `Date` string form, after the trailing zone name is removed.
const DATE_STRING_FORMAT: &str = "%a %b %d %Y %H:%M:%S GMT%z";

/// Constrain `v` to `[lo, hi]`.
///
/// NaN collapses to `lo` so the function stays total.
pub fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    if v.is_nan() {
        return lo;
    }
    v.max(lo).min(hi)
}

/// Round and clamp a progress value into a whole percentage.
pub fn clamp_percent(v: f64) -> u8 {
    clamp(v.round(), 0.0, 100.0) as u8
}

/// Coerce an untrusted JSON value into trimmed text.
///
/// Absent and `null` both become the empty string.
pub fn safe_text(v: Option<&Value>) -> String {
    match v {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => other.to_string().trim().to_string(),
    }
}

/// Parse a feed timestamp.
///
/// Accepts RFC 3339, RFC 2822 and the common spreadsheet layouts. Forms
/// without an offset are interpreted as UTC.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(dt) = parse_date_string(text) {
        return Some(dt);
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return date
                .and_hms_opt(0, 0, 0)
                .map(|naive| Utc.from_utc_datetime(&naive));
        }
    }

    None
}

/// `Mon Mar 10 2025 08:30:00 GMT+0000 (Coordinated Universal Time)`
fn parse_date_string(text: &str) -> Option<DateTime<Utc>> {
    let head = match text.find(" (") {
        Some(idx) if text.ends_with(')') => &text[..idx],
        _ => text,
    };
    DateTime::parse_from_str(head, DATE_STRING_FORMAT)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Whole days elapsed between `date_text` and `now`, floored.
///
/// Unparseable input yields positive infinity so that it never passes a
/// "newer than N days" check. Future dates yield negative values.
pub fn days_since(date_text: &str, now: DateTime<Utc>) -> f64 {
    match parse_timestamp(date_text) {
        Some(t) => {
            let elapsed_ms = (now - t).num_milliseconds();
            elapsed_ms.div_euclid(DAY_MS) as f64
        }
        None => f64::INFINITY,
    }
}

/// [`days_since`] against the wall clock.
pub fn days_since_now(date_text: &str) -> f64 {
    days_since(date_text, Utc::now())
}
