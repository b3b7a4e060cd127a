//! Exhibit telemetry collector.
//!
//! The collector keeps a bounded history of engine events plus running
//! counters, so an operator (or the replay CLI) can see what happened
//! without trawling logs.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

pub mod events;

pub use events::MetricEvent;

/// Longest line kept verbatim in a `MalformedLine` event
const MAX_RECORDED_LINE: usize = 64;

/// Snapshot of collector state for CLI reporting.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TelemetrySnapshot {
    pub recent: Vec<MetricEvent>,
    pub total_events: u64,
    pub dropped_events: u64,
    pub counters: TelemetryCounters,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TelemetryCounters {
    pub samples_accepted: u64,
    pub samples_debounced: u64,
    pub malformed_lines: u64,
    pub tries_completed: u64,
    pub language_changes: u64,
}

/// Collector retaining a bounded history of events.
#[derive(Debug, Clone)]
pub struct TelemetryCollector {
    history: VecDeque<MetricEvent>,
    history_capacity: usize,
    total_events: u64,
    dropped_history: u64,
    counters: TelemetryCounters,
}

impl TelemetryCollector {
    pub fn new(history_capacity: usize) -> Self {
        let history_capacity = history_capacity.max(1);
        Self {
            history: VecDeque::with_capacity(history_capacity),
            history_capacity,
            total_events: 0,
            dropped_history: 0,
            counters: TelemetryCounters::default(),
        }
    }

    pub fn publish(&mut self, event: MetricEvent) {
        self.total_events += 1;
        match &event {
            MetricEvent::TryEnded { .. } => self.counters.tries_completed += 1,
            MetricEvent::MalformedLine { .. } => self.counters.malformed_lines += 1,
            MetricEvent::LanguageChanged { .. } => self.counters.language_changes += 1,
            _ => {}
        }

        if self.history.len() == self.history_capacity {
            self.history.pop_front();
            self.dropped_history += 1;
        }
        self.history.push_back(event);
    }

    pub fn record_sample(&mut self, debounced: bool) {
        if debounced {
            self.counters.samples_debounced += 1;
        } else {
            self.counters.samples_accepted += 1;
        }
    }

    pub fn record_malformed(&mut self, line: &str, timestamp_s: f64) {
        let line: String = line.chars().take(MAX_RECORDED_LINE).collect();
        self.publish(MetricEvent::MalformedLine { line, timestamp_s });
    }

    pub fn counters(&self) -> TelemetryCounters {
        self.counters
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        TelemetrySnapshot {
            recent: self.history.iter().cloned().collect(),
            total_events: self.total_events,
            dropped_events: self.dropped_history,
            counters: self.counters,
        }
    }
}

impl Default for TelemetryCollector {
    fn default() -> Self {
        Self::new(64)
    }
}
