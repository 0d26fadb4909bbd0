//! Timestamp formatting for status text, banners and export filenames.

use chrono::{DateTime, TimeZone, Utc};

/// Human-readable stamp, e.g. `Oct 16, 2026, 09:05 AM`.
pub fn display_timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%b %d, %Y, %I:%M %p").to_string()
}

/// ISO 8601 with millisecond precision in UTC, e.g. `2026-10-16T09:05:03.120Z`.
pub fn iso_timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// ISO stamp safe for filenames: `:` and `.` become `-`.
pub fn filename_timestamp(at: &DateTime<Utc>) -> String {
    iso_timestamp(at).replace([':', '.'], "-")
}
