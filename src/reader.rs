//! Drives the whole pipeline over a captured log, one line at a time.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::assembler::{DecodedFrame, TrackAssembler, TrackSample};
use crate::err::{LineError, ReadError};
use crate::lexer;

/// Lines that were skipped, by reason. None of them count as frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rejections {
    pub truncated: u64,
    pub malformed_timestamp: u64,
    pub malformed_frame: u64,
}

impl Rejections {
    pub fn total(&self) -> u64 {
        self.truncated + self.malformed_timestamp + self.malformed_frame
    }

    fn count(&mut self, err: &LineError) {
        match err {
            LineError::TruncatedLine(_) => self.truncated += 1,
            LineError::MalformedTimestamp(_) => self.malformed_timestamp += 1,
        }
    }
}

/// Lazily yields the track samples of a log.
///
/// The first line is a header and always skipped. Lines are decoded as
/// ISO-8859-1, so any byte sequence is readable. Broken lines and frames are
/// logged, counted in [`Rejections`] and skipped; only I/O errors are
/// returned.
#[derive(Debug)]
pub struct TrackReader<R> {
    input: R,
    buf: Vec<u8>,
    line: String,
    line_no: u64,
    assembler: TrackAssembler,
    rejections: Rejections,
}

impl TrackReader<BufReader<File>> {
    /// Open the log at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ReadError> {
        Ok(TrackReader::new(BufReader::new(File::open(path)?)))
    }
}

impl<R: BufRead> TrackReader<R> {
    pub fn new(input: R) -> Self {
        TrackReader {
            input,
            buf: Vec::new(),
            line: String::new(),
            line_no: 0,
            assembler: TrackAssembler::new(),
            rejections: Rejections::default(),
        }
    }

    /// Accepted frames so far.
    pub fn frame_count(&self) -> u64 {
        self.assembler.frame_count()
    }

    pub fn rejections(&self) -> Rejections {
        self.rejections
    }

    /// Reads the next line into `self.line`. Returns `None` on EOF.
    fn advance(&mut self) -> Result<Option<u64>, io::Error> {
        self.buf.clear();
        if self.input.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(None);
        }
        self.line.clear();
        self.line.extend(self.buf.iter().map(|&b| char::from(b)));
        self.line_no += 1;
        Ok(Some(self.line_no))
    }

    /// Runs one line through the lexer, decoders and assembler.
    fn process_line(&mut self) -> Option<TrackSample> {
        let (timestamp, frame) = match lexer::tokenize(&self.line) {
            Ok((ts, Some(frame))) => (ts, frame),
            Ok((_, None)) => return None,
            Err(e) => {
                log::debug!("line {}: skipped: {}", self.line_no, e);
                self.rejections.count(&e);
                return None;
            }
        };

        let decoded = DecodedFrame::decode(&frame);
        if let Some(e) = decoded.error() {
            log::debug!("line {}: malformed {:?} frame: {}", self.line_no, decoded.kind(), e);
            self.rejections.malformed_frame += 1;
        }

        let sample = self.assembler.push(timestamp, decoded)?;
        log::trace!("line {}: {:?}", self.line_no, sample);
        Some(sample)
    }
}

impl<R: BufRead> Iterator for TrackReader<R> {
    type Item = Result<TrackSample, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line_no = try_some!(self.advance())?;
            if line_no == 1 {
                continue;
            }
            if let Some(sample) = self.process_line() {
                return Some(Ok(sample));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::SentenceKind;
    use crate::summary::SessionSummary;

    const HEADER: &str = "Direction Port Date Time Device Data\n";

    fn line(time: &str, sentence: &str) -> String {
        format!("RX 0 07/21/2016 {} COM3 {}\n", time, sentence)
    }

    fn read_all(log: &str) -> (Vec<TrackSample>, TrackReader<&[u8]>) {
        let mut reader = TrackReader::new(log.as_bytes());
        let samples = reader
            .by_ref()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        (samples, reader)
    }

    #[test]
    fn climb_scenario() {
        let log = [
            HEADER.to_string(),
            line(
                "10:00:00.000",
                "$GPGGA,100000.00,4124.8963,N,00209.3112,E,1,08,0.9,100.0,M,46.9,M,,*47",
            ),
            line(
                "10:00:10.000",
                "$GPGGA,100010.00,4124.8963,N,00209.3112,E,1,08,0.9,110.0,M,46.9,M,,*47",
            ),
            line(
                "10:00:11.000",
                "$GPRMC,100011.00,A,4124.8963,N,00209.3112,E,10.0,84.4,210716,,,A*6A",
            ),
        ]
        .concat();

        let (samples, reader) = read_all(&log);
        assert_eq!(samples.len(), 3);

        let gga: Vec<_> = samples.iter().filter(|s| s.kind == SentenceKind::Gga).collect();
        assert_eq!(gga.len(), 2);
        let vspeed: Vec<_> = samples.iter().filter_map(|s| s.vertical_speed).collect();
        assert_eq!(vspeed, vec![1.0]);

        let rmc = &samples[2];
        assert_eq!(rmc.kind, SentenceKind::Rmc);
        assert!((rmc.horizontal_speed.unwrap() - 5.144).abs() < 1e-3);
        assert_eq!(rmc.position.map(|p| p.altitude), Some(110.0));

        let summary = SessionSummary::from_samples(&samples);
        assert_eq!(summary.frames, 3);
        assert_eq!(summary.max_altitude, Some(110.0));
        assert_eq!(reader.frame_count(), 3);
        assert_eq!(reader.rejections().total(), 0);
    }

    #[test]
    fn malformed_gsa_does_not_stop_the_run() {
        let log = [
            HEADER.to_string(),
            line(
                "10:00:00.000",
                "$GPGGA,100000.00,4124.8963,N,00209.3112,E,1,08,0.9,100.0,M,46.9,M,,*47",
            ),
            line("10:00:00.500", "$GPGSA,A,3,04,05,,09,12,,,24,,,,2.5,1.3,2.1*39"),
            line("10:00:01.000", "$GPGSA,A,3,04,05,,09,12,,,24,,,,,2.5,1.3,2.1*39"),
            line(
                "10:00:02.000",
                "$GPGGA,100002.00,4124.8963,N,00209.3112,E,1,08,0.9,104.0,M,46.9,M,,*47",
            ),
        ]
        .concat();

        let (samples, reader) = read_all(&log);
        assert_eq!(samples.len(), 3);
        assert_eq!(reader.frame_count(), 3);
        assert_eq!(reader.rejections().malformed_frame, 1);
        assert_eq!(samples[1].pdop, Some(2.5));
        assert_eq!(samples[2].vertical_speed, Some(2.0));

        let summary = SessionSummary::from_samples(&samples);
        assert_eq!(summary.max_altitude, Some(104.0));
        assert_eq!(summary.max_vertical_speed, Some(2.0));
    }

    #[test]
    fn skips_noise_and_counts_it() {
        let log = [
            HEADER.to_string(),
            "garbage\n".to_string(),
            "RX 0 13/21/2016 10:00:00.000 COM3 $GPGSA,A,1,,,,,,,,,,,,,,,*1E\n".to_string(),
            line("10:00:00.000", "$GPGSV,3,1,11,03,03,111,00*74"),
            "TX 0 07/21/2016 10:00:00.000 COM3 Sent: $GPGGA,1,2,3\n".to_string(),
            line("10:00:01.000", "$GPGSA,A,1,,,,,,,,,,,,,,,*1E"),
        ]
        .concat();

        let (samples, reader) = read_all(&log);
        assert_eq!(samples.len(), 1);
        assert!(!samples[0].fix);
        assert_eq!(reader.frame_count(), 1);
        assert_eq!(
            reader.rejections(),
            Rejections {
                truncated: 1,
                malformed_timestamp: 1,
                malformed_frame: 0,
            }
        );
    }

    #[test]
    fn long_sentences_are_ignored_or_malformed_by_type() {
        let pubx = format!("$PUBX,03,{}", vec!["0"; 30].join(","));
        let gga = format!("$GPGGA,{}", vec!["1"; 25].join(","));
        let log = [
            HEADER.to_string(),
            line("10:00:00.000", &pubx),
            line("10:00:01.000", &gga),
        ]
        .concat();

        let (samples, reader) = read_all(&log);
        assert!(samples.is_empty());
        assert_eq!(reader.frame_count(), 0);
        assert_eq!(
            reader.rejections(),
            Rejections {
                truncated: 0,
                malformed_timestamp: 0,
                malformed_frame: 1,
            }
        );
    }

    #[test]
    fn header_is_skipped_even_if_it_is_a_sentence() {
        let log = line("10:00:01.000", "$GPGSA,A,1,,,,,,,,,,,,,,,*1E");
        let (samples, _) = read_all(&log);
        assert!(samples.is_empty());
    }

    #[test]
    fn reads_latin1_bytes() {
        let mut log = HEADER.as_bytes().to_vec();
        log.extend_from_slice(b"RX \xe9 07/21/2016 10:00:01.000 COM3 $GPGSA,A,1,,,,,,,,,,,,,,,*1E\r\n");
        let samples = TrackReader::new(&log[..])
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(samples.len(), 1);
    }

    #[test]
    fn missing_file_is_fatal() {
        assert_matches!(
            TrackReader::open("/nonexistent/stratos/gps.log"),
            Err(ReadError::Io(_))
        );
    }
}
