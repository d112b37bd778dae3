//! Lenient conversions from loosely-typed JSON values to the three shapes a chart
//! needs: text keys, numeric values, and calendar timestamps.
//!
//! None of these functions fail. Input that cannot be interpreted yields `NaN` or an
//! invalid [`Timestamp`], and the chart degrades instead of erroring.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

/// Leading numeric portion of a string: sign, digits, fraction, exponent.
static FLOAT_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:Infinity|(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)")
        .expect("float prefix pattern")
});

/// Permissive ISO-8601: `YYYY[-]MM[-]DD[T][HH[:][MM][:][SS]][(.|,)fff][Z|±HH[:][MM]]`.
///
/// Capture groups: 1 year, 3 month, 5 day, 7 hour, 9 minute, 11 second,
/// 12 fraction, 13 zone, 14 offset sign, 15 offset hours, 17 offset minutes.
static ISO8601: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)([0-9]{4})(-)?([0-9]{2})(-)?([0-9]{2})(T)?([0-9]{2})?(:)?([0-9]{2})?(:)?([0-9]{2})?([.,][0-9]+)?($|Z|([+-])([0-9]{2})(:)?([0-9]{2})?)",
    )
    .expect("iso8601 pattern")
});

/// Formats tried, in order, when a string does not match the ISO-8601 pattern.
const FALLBACK_DATETIME_FORMATS: &[&str] = &[
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%b %d, %Y %H:%M:%S",
    "%B %d, %Y %H:%M:%S",
    "%d %b %Y %H:%M:%S",
];

const FALLBACK_DATE_FORMATS: &[&str] = &[
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%d %B %Y",
];

/// A calendar instant that may be invalid.
///
/// Invalid timestamps come from keys that could not be parsed. They order after
/// every valid instant so sorting a series never fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timestamp(Option<DateTime<Utc>>);

impl Timestamp {
    pub const INVALID: Timestamp = Timestamp(None);

    /// Instant `ms` milliseconds after the UNIX epoch; out-of-range input is invalid.
    pub fn from_millis(ms: i64) -> Self {
        Self(DateTime::from_timestamp_millis(ms))
    }

    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        self.0
    }

    /// Milliseconds since the UNIX epoch, `None` when invalid.
    pub fn millis(&self) -> Option<i64> {
        self.0.map(|d| d.timestamp_millis())
    }

    pub fn is_valid(&self) -> bool {
        self.0.is_some()
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(d: DateTime<Utc>) -> Self {
        Self(Some(d))
    }
}

impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.0, other.0) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(d) => write!(f, "{}", d.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)),
            None => f.write_str("Invalid Date"),
        }
    }
}

/// Serialized as epoch milliseconds, or `null` when invalid.
impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.millis() {
            Some(ms) => serializer.serialize_i64(ms),
            None => serializer.serialize_none(),
        }
    }
}

/// Read the leading numeric portion of `v`. Unparseable input yields `NaN`.
pub fn to_float(v: &Value) -> f64 {
    match v {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => parse_float(s),
        Value::Array(_) => parse_float(&to_str(v)),
        Value::Null | Value::Bool(_) | Value::Object(_) => f64::NAN,
    }
}

/// Parse the longest numeric prefix of `s` after leading whitespace.
pub fn parse_float(s: &str) -> f64 {
    FLOAT_PREFIX
        .find(s.trim_start())
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

/// Natural textual form of `v`.
pub fn to_str(v: &Value) -> String {
    match v {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                format_number(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => to_str(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Shortest decimal form of `f` that reads back to the same value.
///
/// Magnitudes of at least 1e21 or below 1e-6 use exponent notation (`1e+21`).
pub fn format_number(f: f64) -> String {
    if f.is_nan() {
        return "NaN".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if f == 0.0 {
        return "0".to_string();
    }
    let a = f.abs();
    if (1e-6..1e21).contains(&a) {
        format!("{}", f)
    } else {
        let s = format!("{:e}", f);
        match s.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => s,
        }
    }
}

/// Interpret `v` as a calendar instant.
///
/// Numbers are whole seconds since the epoch. Strings are normalized (`"2023-01-01
/// 10:00 UTC"` becomes `"2023-01-01T10:00Z"`) and matched against a permissive
/// ISO-8601 pattern before a handful of common formats are tried on the raw
/// text. Anything else is an invalid timestamp.
pub fn to_time(v: &Value) -> Timestamp {
    match v {
        Value::Number(n) => n.as_f64().map(seconds_to_timestamp).unwrap_or(Timestamp::INVALID),
        Value::String(s) => parse_time(s),
        _ => Timestamp::INVALID,
    }
}

fn seconds_to_timestamp(secs: f64) -> Timestamp {
    let ms = secs * 1000.0;
    if !ms.is_finite() || ms.abs() > i64::MAX as f64 {
        return Timestamp::INVALID;
    }
    Timestamp::from_millis(ms as i64)
}

/// Parse a timestamp string; never fails.
pub fn parse_time(s: &str) -> Timestamp {
    let normalized = normalize_time_string(s);
    parse_iso8601(&normalized)
        .or_else(|| parse_fallback(s.trim()))
        .unwrap_or(Timestamp::INVALID)
}

/// First space becomes `T`, the next space is dropped, the first `UTC` becomes `Z`.
fn normalize_time_string(s: &str) -> String {
    s.replacen(' ', "T", 1).replacen(' ', "", 1).replacen("UTC", "Z", 1)
}

/// `None` when the pattern does not match; an invalid timestamp when it matches
/// but the fields are out of range.
fn parse_iso8601(s: &str) -> Option<Timestamp> {
    let caps = ISO8601.captures(s)?;
    let field = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());

    let year: i32 = caps.get(1)?.as_str().parse().ok()?;
    let (Some(month), Some(day)) = (field(3), field(5)) else {
        return Some(Timestamp::INVALID);
    };
    let hour = field(7).unwrap_or(0);
    let minute = field(9).unwrap_or(0);
    let second = field(11).unwrap_or(0);
    let millis = caps
        .get(12)
        .map(|m| {
            let digits = &m.as_str()[1..];
            format!("0.{digits}")
                .parse::<f64>()
                .map(|frac| (frac * 1000.0).trunc() as u32)
                .unwrap_or(0)
        })
        .unwrap_or(0);

    let naive = NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_milli_opt(hour, minute, second, millis.min(999)));
    let Some(naive) = naive else {
        return Some(Timestamp::INVALID);
    };
    let mut instant = naive.and_utc();

    if caps.get(13).is_some_and(|m| !m.as_str().is_empty()) {
        if let Some(sign) = caps.get(14) {
            let mut offset = i64::from(field(15).unwrap_or(0)) * 60;
            offset += i64::from(field(17).unwrap_or(0));
            if sign.as_str() == "-" {
                offset = -offset;
            }
            instant -= Duration::minutes(offset);
        }
    }
    Some(instant.into())
}

fn parse_fallback(s: &str) -> Option<Timestamp> {
    if let Ok(d) = DateTime::parse_from_rfc3339(s) {
        return Some(d.with_timezone(&Utc).into());
    }
    if let Ok(d) = DateTime::parse_from_rfc2822(s) {
        return Some(d.with_timezone(&Utc).into());
    }
    for fmt in FALLBACK_DATETIME_FORMATS {
        if let Ok(d) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(d.and_utc().into());
        }
    }
    for fmt in FALLBACK_DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0).map(|d| d.and_utc().into());
        }
    }
    None
}
