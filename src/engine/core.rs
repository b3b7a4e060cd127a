//! ExhibitEngine: the exhibit controller.
//!
//! Owns the sensor source, the lift tracker, the display panel and the
//! telemetry collector, and ties them together once per display tick. The
//! CLI drives it either live (`run_until_shutdown`) or line by line
//! (`ingest_line`) for replays.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::MissedTickBehavior;

use crate::analysis::{Emission, LiftTracker, Sample, TrackerState};
use crate::config::ExhibitConfig;
use crate::display::{DisplayFrame, DisplayPanel, Language};
use crate::engine::clock::{SystemTimeSource, TimeSource};
use crate::error::{log_sensor_error, ErrorCode, SensorError};
use crate::sensor::{parse_line, NullSource, SampleSource, SensorLine, SerialSource};
use crate::telemetry::{MetricEvent, TelemetryCollector, TelemetrySnapshot};

/// Events kept in the telemetry history
const TELEMETRY_HISTORY: usize = 128;

/// Result of one display tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickReport {
    pub timestamp_s: f64,
    /// Tracker emissions for every sample drained this tick, in order
    pub emissions: Vec<Emission>,
    pub display_reset: bool,
    pub frame: DisplayFrame,
}

/// ExhibitEngine owns all controller state for one exhibit.
pub struct ExhibitEngine {
    config: ExhibitConfig,
    tracker: LiftTracker,
    panel: DisplayPanel,
    telemetry: TelemetryCollector,
    source: Box<dyn SampleSource>,
    time_source: Box<dyn TimeSource>,
    degraded: bool,
}

impl ExhibitEngine {
    pub fn new(
        config: ExhibitConfig,
        source: Box<dyn SampleSource>,
        time_source: Box<dyn TimeSource>,
    ) -> Self {
        let tracker = LiftTracker::from_config(&config.physics);
        let panel = DisplayPanel::new(&config.display, config.physics.mass_kg);
        tracing::info!("[Engine] Reading samples from {}", source.describe());

        Self {
            config,
            tracker,
            panel,
            telemetry: TelemetryCollector::new(TELEMETRY_HISTORY),
            source,
            time_source,
            degraded: false,
        }
    }

    /// Open the configured serial port, falling back to degraded mode if
    /// it is unavailable.
    pub fn with_serial(config: ExhibitConfig) -> Self {
        match SerialSource::open(&config.sensor) {
            Ok(serial) => Self::new(
                config,
                Box::new(serial),
                Box::new(SystemTimeSource::new()),
            ),
            Err(err) => {
                let mut engine = Self::new(
                    config,
                    Box::new(NullSource),
                    Box::new(SystemTimeSource::new()),
                );
                engine.enter_degraded_mode(&err, "open");
                engine
            }
        }
    }

    /// Run one display tick: drain the source, feed the tracker and refresh
    /// the panel.
    pub fn tick(&mut self) -> TickReport {
        let now = self.time_source.now_s();

        let lines = match self.source.poll(now) {
            Ok(lines) => lines,
            Err(err) => {
                self.enter_degraded_mode(&err, "poll");
                Vec::new()
            }
        };

        let mut emissions = Vec::with_capacity(lines.len());
        for timed in lines {
            if let Some(emission) = self.ingest_line(&timed.line, timed.timestamp_s) {
                emissions.push(emission);
            }
        }

        let display_reset = self.refresh_display(now);
        TickReport {
            timestamp_s: now,
            emissions,
            display_reset,
            frame: self.panel.frame(),
        }
    }

    /// Feed a single raw sensor line.
    ///
    /// Returns the tracker emission for distance readings. Language switches
    /// and malformed lines return `None`; malformed lines leave the tracker
    /// untouched.
    pub fn ingest_line(&mut self, line: &str, timestamp_s: f64) -> Option<Emission> {
        match parse_line(line) {
            Some(SensorLine::Distance(distance_mm)) => {
                Some(self.ingest_sample(Sample::new(distance_mm, timestamp_s)))
            }
            Some(SensorLine::NextLanguage) => {
                let language = self.panel.next_language();
                tracing::info!("[Engine] Language switched to {}", language.code());
                self.telemetry.publish(MetricEvent::LanguageChanged {
                    language,
                    timestamp_s,
                });
                None
            }
            None => {
                tracing::debug!("[Engine] Dropping malformed line {:?}", line);
                self.telemetry.record_malformed(line, timestamp_s);
                None
            }
        }
    }

    fn ingest_sample(&mut self, sample: Sample) -> Emission {
        let was_active = self.tracker.is_try_active();
        let emission = self.tracker.ingest(sample);

        self.telemetry
            .record_sample(matches!(emission, Emission::Debounced));
        if !was_active && self.tracker.is_try_active() {
            self.telemetry.publish(MetricEvent::TryStarted {
                timestamp_s: sample.timestamp_s,
            });
        }
        if let Emission::TryEnded(summary) = emission {
            self.telemetry.publish(MetricEvent::TryEnded { summary });
        }

        self.panel.apply(&emission, sample.timestamp_s);
        emission
    }

    /// Advance display timers without new samples; returns true when the
    /// idle reset cleared the panel.
    pub fn refresh_display(&mut self, now_s: f64) -> bool {
        let reset = self.panel.tick(now_s);
        if reset {
            if self.config.display.reset_tracker {
                tracing::info!("[Engine] Idle reset at t={:.3}s, tracker cleared", now_s);
                self.tracker.reset();
            }
            self.telemetry
                .publish(MetricEvent::DisplayReset { timestamp_s: now_s });
        }
        reset
    }

    fn enter_degraded_mode(&mut self, err: &SensorError, context: &str) {
        if self.degraded {
            return;
        }
        log_sensor_error(err, context);
        tracing::warn!(
            "[Engine] Sensor unavailable ({}), running without samples",
            self.source.describe()
        );
        self.telemetry.publish(MetricEvent::SourceDegraded {
            code: err.code(),
            reason: err.message(),
        });
        self.source = Box::new(NullSource);
        self.degraded = true;
    }

    /// Tick on the configured poll interval until Ctrl-C.
    ///
    /// `render` is called after every tick. The engine, and with it the
    /// serial handle, is dropped before this returns.
    pub async fn run_until_shutdown<F>(mut self, mut render: F) -> TelemetrySnapshot
    where
        F: FnMut(&TickReport),
    {
        let period = Duration::from_millis(self.config.sensor.poll_interval_ms.max(1));
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        tracing::info!(
            "[Engine] Running, tick every {} ms (Ctrl-C to stop)",
            period.as_millis()
        );
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let report = self.tick();
                    render(&report);
                }
                result = &mut shutdown => {
                    if let Err(err) = result {
                        tracing::warn!("[Engine] Failed to listen for Ctrl-C: {}", err);
                    }
                    break;
                }
            }
        }

        tracing::info!("[Engine] Shutting down, releasing {}", self.source.describe());
        self.telemetry.snapshot()
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub fn language(&self) -> Language {
        self.panel.language()
    }

    pub fn tracker_state(&self) -> TrackerState {
        self.tracker.state()
    }

    pub fn tracker(&self) -> &LiftTracker {
        &self.tracker
    }

    pub fn frame(&self) -> DisplayFrame {
        self.panel.frame()
    }

    pub fn config(&self) -> &ExhibitConfig {
        &self.config
    }

    pub fn telemetry(&self) -> TelemetrySnapshot {
        self.telemetry.snapshot()
    }
}
