//! Chart/table data reshaping.
//!
//! Everything in here is a pure transform over already-fetched backend
//! payloads: no IO, no clock, no shared state. Handlers fetch, transform,
//! and hand the result straight to the response.

pub mod daily;
pub mod hourly;
pub mod latest;
pub mod merge;

pub use daily::aggregate_by_day;
pub use hourly::hourly_averages;
pub use latest::latest_per_meter;
pub use merge::merge_series;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parse a backend timestamp leniently. The backend is not consistent about
/// formatting: RFC 3339 with or without offset, space-separated, or a bare
/// date all occur. `None` means the string is not a date at all, and callers
/// treat that as older than any parsable timestamp.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }
    None
}
