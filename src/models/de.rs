//! Lenient deserializers for backend payloads.
//!
//! The catalog backend serialises dates either as ISO `YYYY-MM-DD` strings or
//! as HTTP dates, and identifiers either as numbers or strings.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Int(i64),
    Float(f64),
}

impl StringOrNumber {
    fn into_string(self) -> String {
        match self {
            StringOrNumber::String(s) => s.trim().to_string(),
            StringOrNumber::Int(n) => n.to_string(),
            StringOrNumber::Float(f) => f.to_string(),
        }
    }
}

pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    StringOrNumber::deserialize(deserializer).map(StringOrNumber::into_string)
}

pub fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<StringOrNumber>::deserialize(deserializer)?.map(StringOrNumber::into_string))
}

/// Parse the date formats the backend emits.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.date_naive());
    }
    // Flask renders dates as "Mon, 15 Jan 2024 00:00:00 GMT"
    NaiveDate::parse_from_str(raw, "%a, %d %b %Y %H:%M:%S GMT")
        .ok()
        .or_else(|| raw.get(..10).and_then(|head| NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()))
}

pub fn flexible_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid date '{}'", raw)))
}

pub fn opt_flexible_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => parse_date(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date '{}'", raw))),
        None => Ok(None),
    }
}
