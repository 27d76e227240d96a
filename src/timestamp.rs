//! Decoding of the capture timestamp the logger writes in front of every
//! intercepted sentence.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::err::LineError;

const CENTURY: i32 = 2000;
/// Keeps every date field within `u32`.
const MAX_DIGITS: usize = 9;

/// Decodes the capture date (`MM/DD/YYYY` or `MM/DD/YY`) and time
/// (`HH:MM:SS` with an optional decimal fraction) into an absolute instant.
///
/// Two-digit years are counted from 2000. The fraction is read as a decimal
/// fraction of a second with up to nanosecond resolution.
pub fn decode_capture_timestamp(date: &str, time: &str) -> Result<NaiveDateTime, LineError> {
    let date = decode_date(date)?;
    let time = decode_time(time)?;
    Ok(NaiveDateTime::new(date, time))
}

fn decode_date(date: &str) -> Result<NaiveDate, LineError> {
    let mut parts = date.split('/');
    let (month, day, year) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(m), Some(d), Some(y), None) => (m, d, y),
        _ => return Err(LineError::MalformedTimestamp("date is not MM/DD/YYYY")),
    };

    let year = match year.len() {
        2 => CENTURY + digits(year, "year")? as i32,
        4 => digits(year, "year")? as i32,
        _ => return Err(LineError::MalformedTimestamp("year must have 2 or 4 digits")),
    };
    let month = digits(month, "month")?;
    let day = digits(day, "day")?;

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or(LineError::MalformedTimestamp("date out of calendar range"))
}

/// `HH:MM:SS` with an optional `.fff`. Only digits, colons and the dot reach
/// chrono.
fn decode_time(time: &str) -> Result<NaiveTime, LineError> {
    if !time.bytes().all(|b| b.is_ascii_digit() || b == b':' || b == b'.') {
        return Err(LineError::MalformedTimestamp("time must be digits"));
    }
    NaiveTime::parse_from_str(time, "%H:%M:%S%.f")
        .map_err(|_| LineError::MalformedTimestamp("time is not HH:MM:SS.fff"))
}

/// Parses a field made exclusively of ASCII digits.
/// `u32::from_str` alone would also accept a leading `+`.
fn digits(field: &str, name: &'static str) -> Result<u32, LineError> {
    if field.is_empty() || field.len() > MAX_DIGITS || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(LineError::MalformedTimestamp(name));
    }
    field.parse().map_err(|_| LineError::MalformedTimestamp(name))
}
