use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};

pub const INVALID_DATE: &str = "Invalid Date";

const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Calendar date of a backend timestamp, as seen from the local timezone.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local).date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Local).date_naive());
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Date portion only, rendered with `format`.
pub fn format_date(raw: &str, format: &str) -> String {
    match parse_date(raw) {
        Some(date) => date.format(format).to_string(),
        None => {
            tracing::warn!("Unparseable history timestamp: {:?}", raw);
            INVALID_DATE.to_string()
        }
    }
}
