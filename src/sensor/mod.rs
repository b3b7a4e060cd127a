//! Sensor input: line protocol and sample sources.
//!
//! The distance sensor's microcontroller prints one ASCII decimal reading
//! (millimetres) per line. The same link carries a `SPACE` control line when
//! the visitor presses the exhibit's language button.

use crate::error::SensorError;

pub mod replay;
pub mod serial;
pub mod synthetic;

pub use replay::ReplaySource;
pub use serial::{available_ports, SerialSource};
pub use synthetic::{SyntheticLift, SyntheticSource};

/// Control line that advances the display language
pub const NEXT_LANGUAGE_COMMAND: &str = "SPACE";

/// Longest partial line kept between reads before it is discarded
const MAX_PENDING_BYTES: usize = 4096;

/// A decoded line from the sensor link
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SensorLine {
    Distance(f64),
    NextLanguage,
}

/// Parse one line; `None` for anything that is neither a finite number nor `SPACE`
pub fn parse_line(line: &str) -> Option<SensorLine> {
    let trimmed = line.trim();
    if trimmed == NEXT_LANGUAGE_COMMAND {
        return Some(SensorLine::NextLanguage);
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(SensorLine::Distance(value)),
        _ => None,
    }
}

/// A raw line stamped with the time it was drained from the source
#[derive(Debug, Clone, PartialEq)]
pub struct TimedLine {
    pub line: String,
    pub timestamp_s: f64,
}

impl TimedLine {
    pub fn new(line: impl Into<String>, timestamp_s: f64) -> Self {
        Self {
            line: line.into(),
            timestamp_s,
        }
    }

    /// Format as a recorded-session record (`<timestamp_s>,<payload>`)
    pub fn to_record(&self) -> String {
        format!("{:.3},{}", self.timestamp_s, self.line)
    }
}

/// Trait implemented by everything that can feed the exhibit.
///
/// `poll` must return immediately with whatever is available; the display
/// tick calls it and cannot afford to block.
pub trait SampleSource {
    fn poll(&mut self, now_s: f64) -> Result<Vec<TimedLine>, SensorError>;

    /// Human readable origin for logs
    fn describe(&self) -> String;
}

/// Degraded-mode source used when no sensor is available
#[derive(Debug, Default)]
pub struct NullSource;

impl SampleSource for NullSource {
    fn poll(&mut self, _now_s: f64) -> Result<Vec<TimedLine>, SensorError> {
        Ok(Vec::new())
    }

    fn describe(&self) -> String {
        "no sensor (degraded mode)".to_string()
    }
}

/// Reassembles newline-delimited lines from arbitrary byte chunks
#[derive(Debug, Default)]
pub struct LineAssembler {
    pending: Vec<u8>,
}

impl LineAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and return every line it completed
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let raw: Vec<u8> = self.pending.drain(..=pos).collect();
            let text = String::from_utf8_lossy(&raw[..raw.len() - 1]);
            let text = text.trim_end_matches('\r');
            if !text.is_empty() {
                lines.push(text.to_string());
            }
        }

        if self.pending.len() > MAX_PENDING_BYTES {
            tracing::warn!(
                "[Sensor] Dropping {} bytes without a line terminator",
                self.pending.len()
            );
            self.pending.clear();
        }

        lines
    }

    /// Bytes waiting for a terminator
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}
