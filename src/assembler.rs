//! Cross-frame state: turns the ordered stream of decoded frames into
//! track samples, deriving vertical speed and 3D positions on the way.

use chrono::NaiveDateTime;

use crate::err::ParseError;
use crate::lexer::{RawFrame, SentenceKind};
use crate::parser::{self, FixState, GgaPayload, GsaPayload, RmcPayload};

/// A decoded frame tagged with its sentence type.
#[derive(Debug)]
pub enum DecodedFrame {
    Gga(FixState<GgaPayload>),
    Rmc(FixState<RmcPayload>),
    Gsa(FixState<GsaPayload>),
}

impl DecodedFrame {
    /// Runs the decoder matching the frame's sentence type.
    pub fn decode(frame: &RawFrame) -> Self {
        match frame.kind() {
            SentenceKind::Gga => DecodedFrame::Gga(parser::decode_gga(frame)),
            SentenceKind::Rmc => DecodedFrame::Rmc(parser::decode_rmc(frame)),
            SentenceKind::Gsa => DecodedFrame::Gsa(parser::decode_gsa(frame)),
        }
    }

    pub fn kind(&self) -> SentenceKind {
        match self {
            DecodedFrame::Gga(_) => SentenceKind::Gga,
            DecodedFrame::Rmc(_) => SentenceKind::Rmc,
            DecodedFrame::Gsa(_) => SentenceKind::Gsa,
        }
    }

    pub fn error(&self) -> Option<&ParseError> {
        match self {
            DecodedFrame::Gga(s) => s.error(),
            DecodedFrame::Rmc(s) => s.error(),
            DecodedFrame::Gsa(s) => s.error(),
        }
    }
}

/// A point of the flight path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub long: f64,
    pub lat: f64,
    /// Meters above mean sea level.
    pub altitude: f64,
}

/// What one accepted frame contributes to the track.
///
/// Only the fields the frame's sentence type carries are set. `position` and
/// `vertical_speed` need an earlier GGA altitude and are `None` until one has
/// been seen.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackSample {
    /// Capture time from the log, not the receiver's UTC.
    pub timestamp: NaiveDateTime,
    pub kind: SentenceKind,
    pub fix: bool,
    pub satellites: Option<u32>,
    pub altitude: Option<f64>,
    pub pdop: Option<f64>,
    pub hdop: Option<f64>,
    pub vdop: Option<f64>,
    /// m/s
    pub horizontal_speed: Option<f64>,
    /// m/s, positive when climbing
    pub vertical_speed: Option<f64>,
    pub position: Option<Position>,
}

impl TrackSample {
    fn new(timestamp: NaiveDateTime, kind: SentenceKind, fix: bool) -> Self {
        TrackSample {
            timestamp,
            kind,
            fix,
            satellites: None,
            altitude: None,
            pdop: None,
            hdop: None,
            vdop: None,
            horizontal_speed: None,
            vertical_speed: None,
            position: None,
        }
    }
}

/// Builds track samples from frames fed strictly in log order.
///
/// One assembler covers one log. Positions use the altitude of the
/// *previous* GGA fix.
#[derive(Debug, Default)]
pub struct TrackAssembler {
    last_altitude: Option<(f64, NaiveDateTime)>,
    frame_count: u64,
}

impl TrackAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of accepted (`Valid` or `NoFix`) frames so far.
    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Altitude and capture time of the latest GGA fix.
    #[inline]
    pub fn last_altitude(&self) -> Option<(f64, NaiveDateTime)> {
        self.last_altitude
    }

    /// Feeds one frame. Malformed frames yield `None` and leave the state
    /// untouched.
    pub fn push(&mut self, timestamp: NaiveDateTime, frame: DecodedFrame) -> Option<TrackSample> {
        let kind = frame.kind();
        let sample = match frame {
            DecodedFrame::Gga(FixState::Valid(gga)) => self.on_gga(timestamp, &gga),
            DecodedFrame::Rmc(FixState::Valid(rmc)) => self.on_rmc(timestamp, &rmc),
            DecodedFrame::Gsa(FixState::Valid(gsa)) => on_gsa(timestamp, &gsa),
            DecodedFrame::Gga(FixState::NoFix)
            | DecodedFrame::Rmc(FixState::NoFix)
            | DecodedFrame::Gsa(FixState::NoFix) => TrackSample::new(timestamp, kind, false),
            DecodedFrame::Gga(FixState::Malformed(_))
            | DecodedFrame::Rmc(FixState::Malformed(_))
            | DecodedFrame::Gsa(FixState::Malformed(_)) => return None,
        };
        self.frame_count += 1;
        Some(sample)
    }

    fn on_gga(&mut self, timestamp: NaiveDateTime, gga: &GgaPayload) -> TrackSample {
        let mut sample = TrackSample::new(timestamp, SentenceKind::Gga, true);
        sample.satellites = Some(gga.satellites);
        sample.altitude = Some(gga.altitude);

        if let Some((prev_alt, prev_ts)) = self.last_altitude {
            sample.position = Some(Position {
                long: gga.long,
                lat: gga.lat,
                altitude: prev_alt,
            });
            sample.vertical_speed = vertical_speed(prev_alt, prev_ts, gga.altitude, timestamp);
            if sample.vertical_speed.is_none() {
                log::debug!(
                    "Vertical speed not computable at {} from the fix at {}",
                    timestamp,
                    prev_ts
                );
            }
        }

        self.last_altitude = Some((gga.altitude, timestamp));
        sample
    }

    fn on_rmc(&self, timestamp: NaiveDateTime, rmc: &RmcPayload) -> TrackSample {
        let mut sample = TrackSample::new(timestamp, SentenceKind::Rmc, true);
        sample.horizontal_speed = Some(rmc.speed);
        sample.position = self.last_altitude.map(|(altitude, _)| Position {
            long: rmc.long,
            lat: rmc.lat,
            altitude,
        });
        sample
    }
}

fn on_gsa(timestamp: NaiveDateTime, gsa: &GsaPayload) -> TrackSample {
    let mut sample = TrackSample::new(timestamp, SentenceKind::Gsa, true);
    sample.pdop = gsa.pdop;
    sample.hdop = gsa.hdop;
    sample.vdop = gsa.vdop;
    sample
}

/// `None` when no time elapsed between both readings, the interval does not
/// fit in nanoseconds or the result is not finite.
fn vertical_speed(
    prev_alt: f64,
    prev_ts: NaiveDateTime,
    alt: f64,
    ts: NaiveDateTime,
) -> Option<f64> {
    let elapsed = (ts - prev_ts).num_nanoseconds()? as f64 / 1e9;
    if elapsed == 0.0 {
        return None;
    }
    let speed = (alt - prev_alt) / elapsed;
    if speed.is_finite() {
        Some(speed)
    } else {
        None
    }
}
