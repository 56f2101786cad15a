// ── Date normalization ──
//
// Upstream systems disagree on date formats: ServiceNow returns
// `YYYY-MM-DD HH:MM:SS` in UTC, SWIS returns naive ISO timestamps, status
// pages use RFC 3339. Outage timestamps never fail to normalize (unusable
// input means "now"); change windows keep the absence instead.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::model::Eta;

/// Naive layouts, interpreted as UTC.
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Shortest digit string read as epoch milliseconds (Sept 2001 onwards).
const MIN_EPOCH_MILLIS_DIGITS: usize = 10;

/// Parse any supported representation, `None` if unrecognized.
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(dt) = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    {
        return Some(dt.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    if raw.len() >= MIN_EPOCH_MILLIS_DIGITS && raw.bytes().all(|b| b.is_ascii_digit()) {
        return raw
            .parse::<i64>()
            .ok()
            .and_then(DateTime::from_timestamp_millis);
    }
    None
}

/// Normalize to an instant, falling back to `now` for empty or
/// unparseable input.
pub fn to_instant_at(raw: Option<&str>, now: DateTime<Utc>) -> DateTime<Utc> {
    raw.and_then(parse_instant).unwrap_or(now)
}

/// Change-window mode: empty or unparseable input stays absent.
pub fn window_instant(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(parse_instant)
}

/// Outage ETA: `Unknown` when the end field is blank, otherwise the
/// normalized instant.
pub fn eta_at(raw: Option<&str>, now: DateTime<Utc>) -> Eta {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Eta::Unknown,
        Some(value) => Eta::At(to_instant_at(Some(value), now)),
    }
}

/// ServiceNow encoded-query timestamp layout.
pub fn servicenow_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}
