//! Display-layer transforms shared by every view: dates, times, truncation,
//! fallbacks. Nothing here aggregates or reorders data.

use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};

pub const NOT_AVAILABLE: &str = "N/A";
pub const DASH: &str = "-";

/// Parse the backend's `slotDate`. Accepts `2025-05-20`, full RFC 3339
/// timestamps and the legacy `20_5_2025` form.
pub fn parse_slot_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }

    let parts: Vec<&str> = raw.split('_').collect();
    if let [day, month, year] = parts.as_slice() {
        let (day, month, year) = (day.parse().ok()?, month.parse().ok()?, year.parse().ok()?);
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    None
}

/// `May 20, 2025`
pub fn format_date_short(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// `May 20, 2025` with the full month name, e.g. `January 5, 2025`.
pub fn format_date_long(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// `Tuesday, May 20, 2025`
pub fn format_weekday_heading(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

/// Short-format a raw `slotDate`, falling back to `N/A` when it is missing
/// and to the raw text when it cannot be parsed.
pub fn slot_date_short(raw: Option<&str>) -> String {
    match raw {
        None => NOT_AVAILABLE.to_string(),
        Some(raw) => parse_slot_date(raw)
            .map(format_date_short)
            .unwrap_or_else(|| fallback(raw, NOT_AVAILABLE)),
    }
}

pub fn slot_date_long(raw: Option<&str>) -> String {
    match raw {
        None => "Unknown date".to_string(),
        Some(raw) => parse_slot_date(raw)
            .map(format_date_long)
            .unwrap_or_else(|| fallback(raw, "Unknown date")),
    }
}

/// `14:30` → `2:30 PM`. Times that already carry a meridiem are returned trimmed.
pub fn format_time_12h(raw: &str) -> String {
    let raw = raw.trim();
    let upper = raw.to_ascii_uppercase();
    if upper.ends_with("AM") || upper.ends_with("PM") {
        return raw.to_string();
    }

    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map(|t| t.format("%-I:%M %p").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

/// Parse a `createdAt` value: RFC 3339 string or epoch milliseconds.
pub fn parse_timestamp(raw: &serde_json::Value) -> Option<DateTime<Utc>> {
    match raw {
        serde_json::Value::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|ts| ts.with_timezone(&Utc))
            .ok(),
        serde_json::Value::Number(n) => n.as_i64().and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        _ => None,
    }
}

/// `May 20, 2025 02:30 PM` in the local timezone.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%b %-d, %Y %I:%M %p").to_string()
}

pub fn format_timestamp_date(ts: DateTime<Utc>) -> String {
    format_date_short(ts.with_timezone(&Local).date_naive())
}

/// Cut `text` to at most `max` characters, marking the cut with `…`.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(max - 1).collect();
    out.push('…');
    out
}

/// First letter of a name, uppercased; `A` for anonymous.
pub fn initial(name: Option<&str>) -> char {
    name.and_then(|n| n.trim().chars().next())
        .map(|c| c.to_uppercase().next().unwrap_or(c))
        .unwrap_or('A')
}

/// Five stars, filled up to `rating` (clamped to 0..=5).
pub fn star_rating(rating: f64) -> String {
    let filled = rating.round().clamp(0.0, 5.0) as usize;
    let mut stars = "★".repeat(filled);
    stars.push_str(&"☆".repeat(5 - filled));
    stars
}

/// Use `value` unless it is missing or blank.
pub fn or_placeholder(value: Option<&str>, placeholder: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => placeholder.to_string(),
    }
}

fn fallback(raw: &str, placeholder: &str) -> String {
    or_placeholder(Some(raw), placeholder)
}
