//! Parsing of raw text input into typed values.
//!
//! All failures are reported as [`Error::MalformedInput`] naming the
//! expected format, so callers can re-prompt.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::error::{Error, Result};
use crate::model::FlightStatus;

/// Parse an instant written in `format`, interpreted as UTC.
///
/// # Errors
///
/// Returns [`Error::MalformedInput`] if `raw` does not match `format`.
pub fn parse_datetime(raw: &str, format: &str) -> Result<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw.trim(), format)
        .map(|naive| Utc.from_utc_datetime(&naive))
        .map_err(|_| Error::malformed_input(raw, describe_format(format)))
}

/// Parse a calendar date written in `format`.
///
/// # Errors
///
/// Returns [`Error::MalformedInput`] if `raw` does not match `format`.
pub fn parse_date(raw: &str, format: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), format)
        .map_err(|_| Error::malformed_input(raw, describe_format(format)))
}

/// Parse a record id.
///
/// # Errors
///
/// Returns [`Error::MalformedInput`] unless `raw` is a positive integer.
pub fn parse_id(raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| Error::malformed_input(raw, "a positive whole number"))
}

/// Parse a flight-hour count; blank input means zero.
///
/// # Errors
///
/// Returns [`Error::MalformedInput`] unless `raw` is blank or a non-negative
/// integer.
pub fn parse_hours(raw: &str) -> Result<u32> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed
        .parse()
        .map_err(|_| Error::malformed_input(raw, "a non-negative whole number of hours"))
}

/// Parse a flight status name.
///
/// # Errors
///
/// Returns [`Error::MalformedInput`] for anything but a known status.
pub fn parse_status(raw: &str) -> Result<FlightStatus> {
    raw.parse()
}

/// Parse optional input: blank means `None`.
///
/// # Errors
///
/// Propagates the error of `parse` for non-blank input.
pub fn optional<T>(raw: &str, parse: impl FnOnce(&str) -> Result<T>) -> Result<Option<T>> {
    if raw.trim().is_empty() {
        Ok(None)
    } else {
        parse(raw).map(Some)
    }
}

/// Render a `chrono` format string the way a person would write it,
/// e.g. `%H:%M %d/%m/%Y` as `HH:MM dd/mm/YYYY`.
#[must_use]
pub fn describe_format(format: &str) -> String {
    format
        .replace("%H", "HH")
        .replace("%M", "MM")
        .replace("%S", "SS")
        .replace("%d", "dd")
        .replace("%m", "mm")
        .replace("%Y", "YYYY")
        .replace("%y", "YY")
}
