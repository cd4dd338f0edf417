use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};

/// Fixed-width storage format, lexical order matches chronological order
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

pub fn format_timestamp(dt: DateTime<Utc>) -> String {
    dt.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).map(|dt| dt.and_utc())
}

/// Check whether `at` falls within the `window` that ends at `now` (both bounds inclusive).
/// A window reaching past the representable range covers everything up to `now`.
pub fn within_trailing_window(at: DateTime<Utc>, now: DateTime<Utc>, window: TimeDelta) -> bool {
    at <= now
        && now
            .checked_sub_signed(window)
            .is_none_or(|start| at >= start)
}
