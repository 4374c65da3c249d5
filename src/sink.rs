//! # Actuation Sink
//!
//! Where event and report lines go. On the board this is the serial console;
//! on a desktop it is stdout. The line shapes are consumed by existing log
//! scrapers and are reproduced exactly:
//!
//! ```text
//! 2020-07-01 00:00:12 - Rain detected\r\n
//! 2020-07-01 00:01 - Accumulated rainfall: 1.0 mm\n
//! ```
//!
//! Delivery is best effort. The controller logs a failed write and moves on;
//! a lost line never changes the tick count.

use std::io::{self, Write};

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::Depth;

/// Tag appended to every event line.
pub const RAIN_DETECTED_TAG: &str = " - Rain detected";

/// Label between timestamp and depth on report lines.
pub const ACCUMULATED_RAINFALL_LABEL: &str = " - Accumulated rainfall: ";

const EVENT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const REPORT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Failures surfaced by a sink.
#[derive(Error, Debug)]
pub enum ActuationError {
    /// The output channel could not take the line
    #[error("actuation unavailable: {0}")]
    Unavailable(#[from] io::Error),
}

/// Output channel for rain notifications.
pub trait ActuationSink {
    /// Announce a single tick as it happens.
    fn notify_event(&mut self, timestamp: NaiveDateTime, tag: &str) -> Result<(), ActuationError>;

    /// Publish the depth accumulated over the window that just closed.
    fn notify_report(&mut self, timestamp: NaiveDateTime, depth: Depth)
        -> Result<(), ActuationError>;
}

/// `YYYY-MM-DD HH:MM:SS<tag>\r\n`
pub fn format_event_line(timestamp: NaiveDateTime, tag: &str) -> String {
    format!("{}{}\r\n", timestamp.format(EVENT_TIME_FORMAT), tag)
}

/// `YYYY-MM-DD HH:MM - Accumulated rainfall: <int>.<d> mm\n`
pub fn format_report_line(timestamp: NaiveDateTime, depth: Depth) -> String {
    format!(
        "{}{}{}\n",
        timestamp.format(REPORT_TIME_FORMAT),
        ACCUMULATED_RAINFALL_LABEL,
        depth
    )
}

/// Text sink over any byte writer (serial port, stdout, a buffer).
#[derive(Debug)]
pub struct SerialSink<W> {
    out: W,
}

impl<W: Write> SerialSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, line: &str) -> Result<(), ActuationError> {
        self.out.write_all(line.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> ActuationSink for SerialSink<W> {
    fn notify_event(&mut self, timestamp: NaiveDateTime, tag: &str) -> Result<(), ActuationError> {
        self.write_line(&format_event_line(timestamp, tag))
    }

    fn notify_report(
        &mut self,
        timestamp: NaiveDateTime,
        depth: Depth,
    ) -> Result<(), ActuationError> {
        self.write_line(&format_report_line(timestamp, depth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::default_epoch;

    struct BrokenPort;

    impl Write for BrokenPort {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "unplugged"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_event_line_shape() {
        let ts = default_epoch() + chrono::Duration::seconds(12);
        assert_eq!(
            format_event_line(ts, RAIN_DETECTED_TAG),
            "2020-07-01 00:00:12 - Rain detected\r\n"
        );
    }

    #[test]
    fn test_report_line_shape() {
        let ts = default_epoch() + chrono::Duration::minutes(61);
        assert_eq!(
            format_report_line(ts, Depth::from_ticks(2, 2)),
            "2020-07-01 01:01 - Accumulated rainfall: 0.4 mm\n"
        );
        assert!(format_report_line(ts, Depth::from_ticks(5, 2)).ends_with(": 1.0 mm\n"));
    }

    #[test]
    fn test_serial_sink_writes_lines_in_order() {
        let mut sink = SerialSink::new(Vec::new());
        let ts = default_epoch();
        sink.notify_event(ts, RAIN_DETECTED_TAG).unwrap();
        sink.notify_report(ts, Depth::from_tenths_mm(14)).unwrap();

        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(
            text,
            "2020-07-01 00:00:00 - Rain detected\r\n\
             2020-07-01 00:00 - Accumulated rainfall: 1.4 mm\n"
        );
    }

    #[test]
    fn test_broken_port_is_unavailable() {
        let mut sink = SerialSink::new(BrokenPort);
        let err = sink
            .notify_report(default_epoch(), Depth::default())
            .unwrap_err();
        assert!(matches!(err, ActuationError::Unavailable(_)));
        assert!(err.to_string().starts_with("actuation unavailable"));
    }
}
