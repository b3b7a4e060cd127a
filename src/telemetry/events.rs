//! Telemetry event types describing what the exhibit did, exposed to the
//! CLI replay report and logs.

use serde::{Deserialize, Serialize};

use crate::analysis::TrySummary;
use crate::display::Language;

/// Events recorded by the engine as it processes the sensor stream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum MetricEvent {
    TryStarted {
        timestamp_s: f64,
    },
    TryEnded {
        summary: TrySummary,
    },
    MalformedLine {
        line: String,
        timestamp_s: f64,
    },
    LanguageChanged {
        language: Language,
        timestamp_s: f64,
    },
    SourceDegraded {
        code: i32,
        reason: String,
    },
    DisplayReset {
        timestamp_s: f64,
    },
}
