//! Parsing of layer creation timestamps.
//!
//! Schema 1 history entries carry a `created` string such as
//! `2021-05-01T10:00:00.123456789Z`. Only the `YYYY-MM-DDTHH:MM:SS` part is
//! kept; anything after the first `.` is discarded.

use chrono::NaiveDateTime;

#[cfg(test)]
mod tests;

/// Layout accepted after the fractional part has been cut off.
pub const CREATED_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Parses a `created` value into a naive timestamp.
///
/// Returns `None` when the string does not match [`CREATED_FORMAT`]. A
/// failure here is never fatal to the caller.
///
/// # Examples
///
/// ```
/// use libtagstamp::timestamp::parse_created;
///
/// let ts = parse_created("2021-05-01T10:00:00.123456Z").unwrap();
/// assert_eq!(ts.to_string(), "2021-05-01 10:00:00");
///
/// assert!(parse_created("not-a-date").is_none());
/// ```
pub fn parse_created(value: &str) -> Option<NaiveDateTime> {
    let seconds = value.split('.').next().unwrap_or(value);
    NaiveDateTime::parse_from_str(seconds, CREATED_FORMAT).ok()
}
