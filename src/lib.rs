//! Reconstructs a flight track from a captured log of NMEA 0183 sentences.
//!
//! The pipeline is `lexer` (capture timestamp and raw fields) -> `parser`
//! (GGA, RMC and GSA frame decoders) -> `assembler` (cross-frame state) ->
//! `summary`. [`TrackReader`] drives it lazily over a whole log.

#[cfg(test)]
#[macro_use]
extern crate assert_matches;
#[macro_use]
extern crate quick_error;

pub mod err;
#[macro_use]
mod macros;
pub mod assembler;
pub mod lexer;
pub mod parser;
pub mod reader;
pub mod summary;
pub mod timestamp;

pub use assembler::{DecodedFrame, Position, TrackAssembler, TrackSample};
pub use err::{CoordinateParseError, LineError, ParseError, ReadError};
pub use lexer::{RawFrame, SentenceKind};
pub use parser::{FixMode, FixState, GgaPayload, GpsQuality, GsaPayload, RmcPayload};
pub use reader::{Rejections, TrackReader};
pub use summary::SessionSummary;
