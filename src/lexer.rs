use arrayvec::ArrayVec;
use chrono::NaiveDateTime;

use std::ops::Index;

use crate::err::LineError;
use crate::timestamp::decode_capture_timestamp;

/// The longest supported sentence (GSA) has 18 fields.
pub const MAX_FIELDS: usize = 24;

const MIN_COLUMNS: usize = 6;
const DATE_COLUMN: usize = 2;
const TIME_COLUMN: usize = 3;
const SENTENCE_COLUMN: usize = 5;
const ECHO_MARKER: &str = "Sent:";

/// The sentence types that are decoded. Everything else is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentenceKind {
    Gga,
    Rmc,
    Gsa,
}

impl SentenceKind {
    /// Identifies a sentence by its first field. Only the type code is
    /// matched so that talker IDs other than `GP` are accepted.
    pub fn identify(header: &str) -> Option<Self> {
        if header.contains("GSA") {
            Some(SentenceKind::Gsa)
        } else if header.contains("GGA") {
            Some(SentenceKind::Gga)
        } else if header.contains("RMC") {
            Some(SentenceKind::Rmc)
        } else {
            None
        }
    }
}

/// The comma separated fields of one decodable sentence, borrowed from the
/// log line.
///
/// Only the first `MAX_FIELDS` fields are kept, but `len` is the true field
/// count so that the decoders reject overlong sentences by their length.
#[derive(Debug, Clone)]
pub struct RawFrame<'a> {
    kind: SentenceKind,
    fields: ArrayVec<&'a str, MAX_FIELDS>,
    len: usize,
}

impl<'a> RawFrame<'a> {
    /// Splits `sentence` on commas. Returns `None` when the sentence type is
    /// not one that gets decoded.
    pub fn split(sentence: &'a str) -> Option<Self> {
        let kind = SentenceKind::identify(sentence.split(',').next()?)?;
        let mut fields = ArrayVec::new();
        let mut len = 0;
        for field in sentence.split(',') {
            if !fields.is_full() {
                fields.push(field);
            }
            len += 1;
        }
        Some(RawFrame { kind, fields, len })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn kind(&self) -> SentenceKind {
        self.kind
    }
}

impl<'a> Index<usize> for RawFrame<'a> {
    type Output = str;

    fn index(&self, idx: usize) -> &str {
        self.fields[idx]
    }
}

/// Splits one log line into its capture timestamp and the sentence fields.
///
/// Returns `None` for the frame when the line is an echo of an outgoing
/// sentence (`Sent:` marker), which does not come from the receiver, or when
/// the sentence type is not decoded.
pub fn tokenize(line: &str) -> Result<(NaiveDateTime, Option<RawFrame<'_>>), LineError> {
    let mut columns = line.split_whitespace();
    let mut head = [""; MIN_COLUMNS];
    for (i, slot) in head.iter_mut().enumerate() {
        match columns.next() {
            Some(c) => *slot = c,
            None => return Err(LineError::TruncatedLine(i)),
        }
    }

    let timestamp = decode_capture_timestamp(head[DATE_COLUMN], head[TIME_COLUMN])?;
    if head[SENTENCE_COLUMN] == ECHO_MARKER {
        return Ok((timestamp, None));
    }

    Ok((timestamp, RawFrame::split(head[SENTENCE_COLUMN])))
}
