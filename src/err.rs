use std::{io, num};

quick_error! {
    /// Reasons a whole log line is skipped before any frame decoding happens.
    #[derive(Debug)]
    pub enum LineError {
        TruncatedLine(columns: usize) {
            description("Truncated line")
            display("Expected at least 6 columns, found {}", columns)
        }
        MalformedTimestamp(msg: &'static str) {
            description("Malformed capture timestamp")
            display("Could not decode capture timestamp: {}", msg)
        }
    }
}

quick_error! {
    /// Reasons a tokenized frame is rejected as malformed.
    #[derive(Debug)]
    pub enum ParseError {
        FieldCount(expected: usize, actual: usize) {
            description("Wrong number of fields")
            display("Expected {} fields, found {}", expected, actual)
        }
        UnexpectedValue(field: &'static str) {
            description("Unexpected value")
            display("Encountered unexpected value in field {}", field)
        }
        InvalidDir(field: &'static str) {
            description("Invalid cardinal direction")
            display("Invalid cardinal direction in field {}", field)
        }
        InvalidUnit {
            description("Invalid unit")
            display("Expected unit \"M\"")
        }
        InvalidDate {
            description("Invalid date")
            display("Date field does not describe a calendar day in 2000-2099")
        }
        NonFinite {
            description("Non-finite number")
            display("Encountered a number that is not finite")
        }
        Time(err: chrono::format::ParseError) {
            from()
            description("Time parsing error")
            display("Failed to parse field as time of day: {}", err)
            cause(err)
        }
        Int(err: num::ParseIntError) {
            from()
            description("Integer parsing error")
            display("{}", err)
            cause(err)
        }
        Float(err: num::ParseFloatError) {
            from()
            description("Float parsing error")
            display("{}", err)
            cause(err)
        }
        Coordinate(err: CoordinateParseError) {
            from()
            description("Coordinate parsing error")
            display("Could not parse field as coordinate: {}", err)
        }
    }
}

quick_error! {
    #[derive(Debug)]
    pub enum CoordinateParseError {
        InvalidInput(msg: &'static str) {
            description("Invalid input")
            display("Invalid input: {}", msg)
        }
        Degrees(err: num::ParseIntError) {
            from()
            description("Degrees parsing error")
            display("{}", err)
            cause(err)
        }
        DecimalMin(err: num::ParseFloatError) {
            from()
            description("Minutes parsing error")
            display("{}", err)
            cause(err)
        }
        InvalidCoord(val: f64, max: f64) {
            description("Invalid coordinate")
            display("Invalid coordinate: {} should be between {} and {}", val, max*-1.0, max)
        }
    }
}

quick_error! {
    /// Failures that end a run. Everything else is skipped line by line.
    #[derive(Debug)]
    pub enum ReadError {
        Io(err: io::Error) {
            from()
            description("I/O error")
            display("Encountered I/O error while reading the log: {}", err)
            cause(err)
        }
    }
}
