//! Reply-time parsing

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

/// Parse a reply time into seconds since the Unix epoch (UTC).
///
/// Returns `None` for anything that is not a recognised date, never an error.
pub fn parse_reply_time(raw: &str) -> Option<i64> {
    let normalized = expand_compact_date(raw.trim());
    let text = normalized.as_str();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.timestamp());
    }

    for format in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt.and_utc().timestamp());
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp())
}

/// Rewrite a leading `YYYYMM?DD` segment (six digits, a separator, two digits)
/// into `YYYY-MM-DD`, leaving everything else untouched.
fn expand_compact_date(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let compact = bytes.len() >= 9
        && bytes[..6].iter().all(u8::is_ascii_digit)
        && !bytes[6].is_ascii_digit()
        && bytes[6].is_ascii()
        && bytes[7..9].iter().all(u8::is_ascii_digit)
        && bytes.get(9).map_or(true, |b| !b.is_ascii_digit());

    if compact {
        format!("{}-{}-{}", &raw[..4], &raw[4..6], &raw[7..])
    } else {
        raw.to_string()
    }
}
