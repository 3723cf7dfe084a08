use chrono::{Datelike, NaiveDate, NaiveDateTime, Utc};

/// Compact public timestamp format, `yyyyMMddHHmmss`, fixed UTC.
const COMPACT_FORMAT: &str = "%Y%m%d%H%M%S";
/// Backend timestamp format, extended with milliseconds, fixed UTC.
const BACKEND_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Lower bound used when a `from` value is absent or unparsable.
pub const EPOCH_START: &str = "1996-01-01T00:00:00Z";

pub fn parse_compact(value: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(value, COMPACT_FORMAT)
}

pub fn format_compact(timestamp: NaiveDateTime) -> String {
    timestamp.format(COMPACT_FORMAT).to_string()
}

pub fn format_backend(timestamp: NaiveDateTime) -> String {
    timestamp.format(BACKEND_FORMAT).to_string()
}

/// Parses a backend timestamp, with or without the fractional part.
pub fn parse_backend(value: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(value, BACKEND_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%SZ"))
}

/// Resolves the `from` bound of the date-range filter. Accepts a full
/// compact timestamp or a 4-digit year (expanded to Jan 1st 00:00:00);
/// anything else falls back to the fixed epoch start.
pub fn resolve_from(raw: Option<&str>) -> String {
    match raw {
        Some(value) if !value.is_empty() => parse_compact(value)
            .or_else(|_| parse_compact(&format!("{}0101000000", value)))
            .map(format_backend)
            .unwrap_or_else(|_| EPOCH_START.to_string()),
        _ => EPOCH_START.to_string(),
    }
}

/// Resolves the `to` bound. Years expand to Dec 31st 23:59:59; absent
/// or unparsable values fall back to the end of the current year.
pub fn resolve_to(raw: Option<&str>) -> String {
    match raw {
        Some(value) if !value.is_empty() => parse_compact(value)
            .or_else(|_| parse_compact(&format!("{}1231235959", value)))
            .map(format_backend)
            .unwrap_or_else(|_| format_backend(end_of_current_year())),
        _ => format_backend(end_of_current_year()),
    }
}

fn end_of_current_year() -> NaiveDateTime {
    let year = Utc::now().year();
    NaiveDate::from_ymd_opt(year, 12, 31)
        .and_then(|d| d.and_hms_opt(23, 59, 59))
        .expect("end of year is a valid timestamp")
}
