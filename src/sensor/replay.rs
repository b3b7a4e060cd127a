//! Recorded sensor sessions.
//!
//! A session file holds one record per line: `<timestamp_s>,<payload>`,
//! where the payload is exactly what the sensor printed (a distance, `SPACE`,
//! or garbage). Blank lines and `#` comments are ignored.

use std::collections::VecDeque;
use std::fs;
use std::path::Path;

use super::{SampleSource, TimedLine};
use crate::error::SensorError;

/// Replays a recorded session against the engine clock
#[derive(Debug, Clone)]
pub struct ReplaySource {
    origin: String,
    records: VecDeque<TimedLine>,
}

impl ReplaySource {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SensorError> {
        let origin = path.as_ref().display().to_string();
        let contents = fs::read_to_string(&path).map_err(|err| SensorError::ReplayLoadFailed {
            path: origin.clone(),
            reason: err.to_string(),
        })?;
        Self::parse(&contents, &origin)
    }

    /// Parse session text; `origin` only labels logs and errors
    pub fn parse(contents: &str, origin: &str) -> Result<Self, SensorError> {
        let mut records = Vec::new();
        for (index, raw) in contents.lines().enumerate() {
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let Some((stamp, payload)) = trimmed.split_once(',') else {
                tracing::warn!("[Replay] {}:{}: missing timestamp, skipped", origin, index + 1);
                continue;
            };
            match stamp.trim().parse::<f64>() {
                Ok(timestamp_s) if timestamp_s.is_finite() => {
                    records.push(TimedLine::new(payload, timestamp_s));
                }
                _ => {
                    tracing::warn!(
                        "[Replay] {}:{}: bad timestamp {:?}, skipped",
                        origin,
                        index + 1,
                        stamp
                    );
                }
            }
        }

        if records.is_empty() {
            return Err(SensorError::ReplayParse {
                path: origin.to_string(),
            });
        }

        // Stable sort keeps same-timestamp records in file order
        records.sort_by(|a, b| a.timestamp_s.total_cmp(&b.timestamp_s));

        tracing::debug!("[Replay] Loaded {} records from {}", records.len(), origin);
        Ok(Self {
            origin: origin.to_string(),
            records: records.into(),
        })
    }

    pub fn from_lines(origin: &str, lines: Vec<TimedLine>) -> Self {
        let mut records = lines;
        records.sort_by(|a, b| a.timestamp_s.total_cmp(&b.timestamp_s));
        Self {
            origin: origin.to_string(),
            records: records.into(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.records.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.records.is_empty()
    }

    /// Timestamp of the last record still queued
    pub fn end_time(&self) -> Option<f64> {
        self.records.back().map(|r| r.timestamp_s)
    }
}

impl SampleSource for ReplaySource {
    fn poll(&mut self, now_s: f64) -> Result<Vec<TimedLine>, SensorError> {
        let mut due = Vec::new();
        while self
            .records
            .front()
            .is_some_and(|record| record.timestamp_s <= now_s)
        {
            if let Some(record) = self.records.pop_front() {
                due.push(record);
            }
        }
        Ok(due)
    }

    fn describe(&self) -> String {
        format!("recorded session {}", self.origin)
    }
}
