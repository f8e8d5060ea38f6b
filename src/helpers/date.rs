//! Date helper functions

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

/// Formats tried after RFC 3339, in order
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y/%m/%d %H:%M:%S"];
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Parse a manifest date value into a calendar date
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt.date());
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
}

/// Format a date in long form for the given language
///
/// # Examples
/// ```ignore
/// full_date(&date, "en")    // -> "January 5, 2024"
/// full_date(&date, "zh-CN") // -> "2024年1月5日"
/// ```
pub fn full_date(date: &NaiveDate, language: &str) -> String {
    let lang = language.to_ascii_lowercase();
    if lang.starts_with("zh") || lang.starts_with("ja") {
        format!("{}年{}月{}日", date.year(), date.month(), date.day())
    } else {
        date.format("%B %-d, %Y").to_string()
    }
}

/// Format a raw manifest date value
///
/// Never fails: unparseable input comes back as-is, blank input becomes
/// `fallback`.
pub fn format_date(value: &str, language: &str, fallback: &str) -> String {
    match parse_date(value) {
        Some(date) => full_date(&date, language),
        None if value.trim().is_empty() => fallback.to_string(),
        None => {
            tracing::debug!("Unparseable post date: {:?}", value);
            value.trim().to_string()
        }
    }
}
