//! Decoders for the *GGA*, *RMC* and *GSA* sentences of the *NMEA 0183*
//! protocol.
//!
//! Every decoder is a pure function from a [`RawFrame`] to a [`FixState`].
//! A well formed sentence without satellite lock is `NoFix`, anything that
//! cannot be decoded is `Malformed`.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::str::FromStr;

use crate::err::{CoordinateParseError, ParseError};
use crate::lexer::RawFrame;

const LAT_SPLIT: usize = 2;
const ABS_MAX_LAT: f64 = 90.0;
const LONG_SPLIT: usize = 3;
const ABS_MAX_LONG: f64 = 180.0;

const GGA_FIELDS: usize = 15;
const RMC_FIELDS: usize = 13;
const GSA_FIELDS: usize = 18;

/// Trailing `*hh` checksum glued to the last GSA field.
const CHECKSUM_SUFFIX: usize = 3;
const CENTURY: i32 = 2000;

/// Outcome of decoding a single frame.
#[derive(Debug)]
pub enum FixState<P> {
    /// The receiver reported a position solution.
    Valid(P),
    /// Well formed sentence, but the receiver has no lock.
    NoFix,
    /// The frame could not be decoded and has to be skipped.
    Malformed(ParseError),
}

impl<P> FixState<P> {
    /// The rejection reason of a `Malformed` frame. `Valid` and `NoFix`
    /// frames count as accepted.
    pub fn error(&self) -> Option<&ParseError> {
        match self {
            FixState::Malformed(e) => Some(e),
            _ => None,
        }
    }

    fn from_result(res: Result<Option<P>, ParseError>) -> Self {
        match res {
            Ok(Some(p)) => FixState::Valid(p),
            Ok(None) => FixState::NoFix,
            Err(e) => FixState::Malformed(e),
        }
    }
}

/// The cardinal directions.
#[derive(Debug)]
enum CardDir {
    North,
    South,
    East,
    West,
}

impl CardDir {
    #[inline]
    fn get_sign(&self) -> f64 {
        match self {
            CardDir::North | CardDir::East => 1.0,
            CardDir::South | CardDir::West => -1.0,
        }
    }
}

/// Indicator of the quality of gps data. Only the fix qualities the logged
/// receiver produces are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpsQuality {
    Gps,
    Dgps,
}

/// Dimension of the navigation solution reported by GSA.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixMode {
    TwoD,
    ThreeD,
}

/// A GGA sentence with a valid fix.
#[derive(Debug, Clone, PartialEq)]
pub struct GgaPayload {
    /// Universal Time Coordinated (UTC)
    pub utc: NaiveTime,
    /// Latitude in decimal degrees, negative in the southern hemisphere.
    pub lat: f64,
    /// Longitude in decimal degrees, negative in the western hemisphere.
    pub long: f64,
    pub quality: GpsQuality,
    /// Number of satellites in use.
    pub satellites: u32,
    /// Horizontal dilution of precision
    pub hdop: f64,
    /// Antenna altitude above/below mean-sea-level (geoid) in meters
    pub altitude: f64,
    /// Geoidal separation in meters
    pub geo_sep: f64,
}

/// An RMC sentence with status `A`.
#[derive(Debug, Clone, PartialEq)]
pub struct RmcPayload {
    pub timestamp: NaiveDateTime,
    pub lat: f64,
    pub long: f64,
    /// Speed over ground in m/s.
    pub speed: f64,
    /// Course over ground in degrees.
    pub course: f64,
    /// Magnetic variation in degrees, negative to the west.
    pub mag_var: Option<f64>,
}

/// A GSA sentence reporting a 2D or 3D fix.
#[derive(Debug, Clone, PartialEq)]
pub struct GsaPayload {
    pub mode: FixMode,
    pub pdop: Option<f64>,
    pub hdop: Option<f64>,
    pub vdop: Option<f64>,
}

/// Decode a GGA frame.
pub fn decode_gga(frame: &RawFrame) -> FixState<GgaPayload> {
    FixState::from_result(parse_gga(frame))
}

/// Decode an RMC frame.
pub fn decode_rmc(frame: &RawFrame) -> FixState<RmcPayload> {
    FixState::from_result(parse_rmc(frame))
}

/// Decode a GSA frame.
pub fn decode_gsa(frame: &RawFrame) -> FixState<GsaPayload> {
    FixState::from_result(parse_gsa(frame))
}

fn parse_gga(frame: &RawFrame) -> Result<Option<GgaPayload>, ParseError> {
    expect_fields(frame, GGA_FIELDS)?;

    let quality = match &frame[6] {
        "0" => return Ok(None),
        "1" => GpsQuality::Gps,
        "2" => GpsQuality::Dgps,
        _ => return Err(ParseError::UnexpectedValue("quality")),
    };

    let utc = fl_to_utc(&frame[1])?;
    let lat = parse_lat(&frame[2], &frame[3])?;
    let long = parse_long(&frame[4], &frame[5])?;
    let satellites = expect!(&frame[7], u32::from_str, "satellites");
    let hdop = expect!(&frame[8], fl_as_f64, "hdop");
    let altitude = expect!(&frame[9], fl_as_f64, "altitude");
    expect_meters(&frame[10])?;
    let geo_sep = expect!(&frame[11], fl_as_f64, "geoidal separation");
    expect_meters(&frame[12])?;

    Ok(Some(GgaPayload {
        utc,
        lat,
        long,
        quality,
        satellites,
        hdop,
        altitude,
        geo_sep,
    }))
}

fn parse_rmc(frame: &RawFrame) -> Result<Option<RmcPayload>, ParseError> {
    expect_fields(frame, RMC_FIELDS)?;

    match &frame[2] {
        "A" => (),
        "V" => return Ok(None),
        _ => return Err(ParseError::UnexpectedValue("status")),
    }

    let utc = fl_to_utc(&frame[1])?;
    let date = parse_date(&frame[9])?;
    let lat = parse_lat(&frame[3], &frame[4])?;
    let long = parse_long(&frame[5], &frame[6])?;
    let speed = knots_to_mps(expect!(&frame[7], fl_as_f64, "speed"));
    let course = expect!(&frame[8], fl_as_f64, "course");
    let mag_var = accept!(&frame[10], fl_as_f64).map(|v| match &frame[11] {
        "W" => -v,
        _ => v,
    });

    Ok(Some(RmcPayload {
        timestamp: NaiveDateTime::new(date, utc),
        lat,
        long,
        speed,
        course,
        mag_var,
    }))
}

fn parse_gsa(frame: &RawFrame) -> Result<Option<GsaPayload>, ParseError> {
    expect_fields(frame, GSA_FIELDS)?;

    let mode = match &frame[2] {
        "1" => return Ok(None),
        "2" => FixMode::TwoD,
        "3" => FixMode::ThreeD,
        _ => return Err(ParseError::UnexpectedValue("fix type")),
    };

    Ok(Some(GsaPayload {
        mode,
        pdop: accept!(&frame[15], fl_as_f64),
        hdop: accept!(&frame[16], fl_as_f64),
        vdop: accept!(strip_checksum(&frame[17]), fl_as_f64),
    }))
}

/// Converts knots to meters per second, keeping the rational `463 / 900` form
/// so results match earlier reports bit for bit.
#[inline]
pub fn knots_to_mps(knots: f64) -> f64 {
    knots * 463.0 / 900.0
}

#[inline]
fn expect_fields(frame: &RawFrame, expected: usize) -> Result<(), ParseError> {
    if frame.len() != expected {
        return Err(ParseError::FieldCount(expected, frame.len()));
    }
    Ok(())
}

/// Removes the last three characters (`*hh`). Shorter fields become empty.
fn strip_checksum(field: &str) -> &str {
    let end = field
        .char_indices()
        .rev()
        .nth(CHECKSUM_SUFFIX - 1)
        .map_or(0, |(i, _)| i);
    &field[..end]
}

fn parse_lat(coord: &str, dir: &str) -> Result<f64, ParseError> {
    let dir = match dir {
        "N" => CardDir::North,
        "S" => CardDir::South,
        _ => return Err(ParseError::InvalidDir("latitude")),
    };
    Ok(parse_coord(coord, &dir, LAT_SPLIT, ABS_MAX_LAT)?)
}

fn parse_long(coord: &str, dir: &str) -> Result<f64, ParseError> {
    let dir = match dir {
        "E" => CardDir::East,
        "W" => CardDir::West,
        _ => return Err(ParseError::InvalidDir("longitude")),
    };
    Ok(parse_coord(coord, &dir, LONG_SPLIT, ABS_MAX_LONG)?)
}

/// Parse `coord` as a f64 representing a coordinate.
/// `dir` will be converted to 1 or -1 to be multiplied with the degrees.
/// `deg_split` is the number of digits that make up the degrees.
/// `abs_max` is maximum value in degree, e.g. 180 for longitude.
fn parse_coord(
    coord: &str,
    dir: &CardDir,
    deg_split: usize,
    abs_max: f64,
) -> Result<f64, CoordinateParseError> {
    let (deg, min) = match (coord.get(..deg_split), coord.get(deg_split..)) {
        (Some(deg), Some(min)) if !min.is_empty() => (deg, min),
        _ => {
            return Err(CoordinateParseError::InvalidInput(
                "the field is too short for a coordinate",
            ))
        }
    };
    if !deg.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CoordinateParseError::InvalidInput("degrees must be digits"));
    }

    let degrees = f64::from(u8::from_str(deg)?);
    let minutes = f64::from_str(min)?;
    if !(0.0..60.0).contains(&minutes) {
        return Err(CoordinateParseError::InvalidInput("minutes out of range"));
    }

    let dec_deg = degrees + minutes / 60.0;
    if dec_deg > abs_max {
        return Err(CoordinateParseError::InvalidCoord(dec_deg, abs_max));
    }
    Ok(dec_deg * dir.get_sign())
}

/// `ddmmyy` with the year counted from 2000.
fn parse_date(date: &str) -> Result<NaiveDate, ParseError> {
    if date.len() != 6 || !date.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::InvalidDate);
    }
    let day = u32::from_str(&date[0..2])?;
    let month = u32::from_str(&date[2..4])?;
    let year = CENTURY + i32::from_str(&date[4..6])?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or(ParseError::InvalidDate)
}

/// Converts a field in the format `hhmmss.sss` to a time.
#[inline]
fn fl_to_utc(utc: &str) -> Result<NaiveTime, ParseError> {
    Ok(NaiveTime::parse_from_str(utc, "%H%M%S%.f")?)
}

/// Check that a unit field is either empty or `M`.
#[inline]
fn expect_meters(unit: &str) -> Result<(), ParseError> {
    match unit {
        "" | "M" => Ok(()),
        _ => Err(ParseError::InvalidUnit),
    }
}

#[inline]
fn fl_as_f64(fl: &str) -> Result<f64, ParseError> {
    let f = f64::from_str(fl)?;
    if !f.is_finite() {
        return Err(ParseError::NonFinite);
    }
    Ok(f)
}
