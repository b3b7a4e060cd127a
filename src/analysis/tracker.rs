// LiftTracker - try segmentation and peak power estimation
//
// Turns an irregularly sampled distance stream into discrete lift attempts.
//
// Per sample:
// 1. Push the raw reading into the moving-average window
// 2. Debounce: samples closer than `debounce_s` to the previous accepted
//    sample stop here and leave the tracker state untouched
// 3. delta = |smoothed - last_smoothed|; delta > threshold means movement
// 4. Movement while IDLE starts a try, movement while ACTIVE raises the peak
// 5. Stillness while ACTIVE ends the try and freezes the last-try summary

use serde::{Deserialize, Serialize};

use crate::analysis::power::{PowerModel, PowerSample};
use crate::analysis::smoother::DistanceSmoother;
use crate::config::PhysicsConfig;

/// One raw distance reading stamped with the time it was received
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub distance_mm: f64,
    pub timestamp_s: f64,
}

impl Sample {
    pub fn new(distance_mm: f64, timestamp_s: f64) -> Self {
        Self {
            distance_mm,
            timestamp_s,
        }
    }
}

/// Instantaneous power reported for an accepted sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerReading {
    pub hp: f64,
    pub watts: f64,
    /// Whether a try is in progress after this sample
    pub try_active: bool,
}

impl PowerReading {
    fn idle() -> Self {
        Self {
            hp: 0.0,
            watts: 0.0,
            try_active: false,
        }
    }
}

/// Finalized statistics of the most recent try
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TrySummary {
    /// Highest instantaneous power seen during the try
    pub peak_hp: f64,
    pub peak_watts: f64,
    /// Seconds between the sample that started the try and the one that ended it
    pub duration_s: f64,
    /// Smoothed distance travelled between start and end of the try
    pub distance_mm: f64,
    /// Timestamp of the sample that ended the try
    pub ended_at_s: f64,
}

/// Result of feeding one sample to the tracker
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Emission {
    /// First sample ever; recorded as the baseline, nothing to report
    Baseline,
    /// Sample arrived too soon after the previous one and was discarded
    Debounced,
    /// Instantaneous power (zero while idle)
    PowerReading(PowerReading),
    /// A try just ended; instantaneous power is zero
    TryEnded(TrySummary),
}

impl Emission {
    /// Instantaneous horsepower to show for this sample
    pub fn instantaneous_hp(&self) -> f64 {
        match self {
            Emission::PowerReading(reading) => reading.hp,
            _ => 0.0,
        }
    }

    /// Baseline and debounced samples produce no display update
    pub fn is_skipped(&self) -> bool {
        matches!(self, Emission::Baseline | Emission::Debounced)
    }
}

/// Tracker phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TryPhase {
    Idle,
    Active,
}

/// Flat snapshot of the tracker for reporting
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackerState {
    pub last_smoothed_distance: Option<f64>,
    pub last_timestamp: f64,
    pub try_active: bool,
    pub try_start_time: Option<f64>,
    pub try_start_distance: Option<f64>,
    pub peak_power_in_try: f64,
    pub last_try_peak_power: f64,
    pub last_try_duration: f64,
    pub last_try_distance: f64,
}

/// Detection parameters, usually taken from [`PhysicsConfig`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerParams {
    pub distance_threshold_mm: f64,
    pub debounce_s: f64,
    pub min_time_diff_s: f64,
    pub smoothing_window: usize,
}

impl From<&PhysicsConfig> for TrackerParams {
    fn from(config: &PhysicsConfig) -> Self {
        Self {
            distance_threshold_mm: config.distance_threshold_mm,
            debounce_s: config.debounce_s,
            min_time_diff_s: config.min_time_diff_s,
            smoothing_window: config.smoothing_window,
        }
    }
}

impl Default for TrackerParams {
    fn default() -> Self {
        Self::from(&PhysicsConfig::default())
    }
}

#[derive(Debug, Clone, Copy)]
struct ActiveTry {
    start_time_s: f64,
    start_distance_mm: f64,
    peak: PowerSample,
}

/// IDLE/ACTIVE state machine over smoothed distance samples
#[derive(Debug, Clone)]
pub struct LiftTracker {
    params: TrackerParams,
    power_model: PowerModel,
    smoother: DistanceSmoother,
    last_distance_mm: Option<f64>,
    last_time_s: f64,
    active: Option<ActiveTry>,
    last_try: TrySummary,
    tries_completed: u64,
}

impl LiftTracker {
    pub fn new(params: TrackerParams, power_model: PowerModel) -> Self {
        Self {
            smoother: DistanceSmoother::new(params.smoothing_window),
            params,
            power_model,
            last_distance_mm: None,
            last_time_s: 0.0,
            active: None,
            last_try: TrySummary::default(),
            tries_completed: 0,
        }
    }

    pub fn from_config(config: &PhysicsConfig) -> Self {
        Self::new(TrackerParams::from(config), PowerModel::from_config(config))
    }

    /// Feed one sample and report what it means for the display
    pub fn ingest(&mut self, sample: Sample) -> Emission {
        let now = sample.timestamp_s;
        // Debounced readings still count toward the average
        let smoothed = self.smoother.push(sample.distance_mm);

        let Some(last_distance) = self.last_distance_mm else {
            self.last_distance_mm = Some(smoothed);
            self.last_time_s = now;
            tracing::debug!("[Tracker] Baseline {:.1} mm at t={:.3}s", smoothed, now);
            return Emission::Baseline;
        };

        let time_diff = (now - self.last_time_s).max(self.params.min_time_diff_s);
        if time_diff < self.params.debounce_s {
            return Emission::Debounced;
        }

        let delta = (smoothed - last_distance).abs();

        let emission = if delta > self.params.distance_threshold_mm {
            let power = self.power_model.power(delta, time_diff);
            match self.active.as_mut() {
                Some(active) => {
                    if power.hp > active.peak.hp {
                        active.peak = power;
                    }
                }
                None => {
                    tracing::debug!(
                        "[Tracker] Try started at t={:.3}s from {:.1} mm",
                        now,
                        smoothed
                    );
                    self.active = Some(ActiveTry {
                        start_time_s: now,
                        start_distance_mm: smoothed,
                        peak: power,
                    });
                }
            }
            Emission::PowerReading(PowerReading {
                hp: power.hp,
                watts: power.watts,
                try_active: true,
            })
        } else if let Some(active) = self.active.take() {
            let summary = TrySummary {
                peak_hp: active.peak.hp,
                peak_watts: active.peak.watts,
                duration_s: now - active.start_time_s,
                distance_mm: (smoothed - active.start_distance_mm).abs(),
                ended_at_s: now,
            };
            self.last_try = summary;
            self.tries_completed += 1;
            tracing::info!(
                "[Tracker] Try ended: peak={:.4} hp ({:.1} W), duration={:.2}s, distance={:.1} mm",
                summary.peak_hp,
                summary.peak_watts,
                summary.duration_s,
                summary.distance_mm
            );
            Emission::TryEnded(summary)
        } else {
            Emission::PowerReading(PowerReading::idle())
        };

        self.last_distance_mm = Some(smoothed);
        self.last_time_s = now;
        emission
    }

    pub fn phase(&self) -> TryPhase {
        if self.active.is_some() {
            TryPhase::Active
        } else {
            TryPhase::Idle
        }
    }

    pub fn is_try_active(&self) -> bool {
        self.active.is_some()
    }

    /// Peak power of the try in progress, zero while idle
    pub fn peak_in_try(&self) -> PowerSample {
        self.active
            .map(|active| active.peak)
            .unwrap_or(PowerSample::ZERO)
    }

    pub fn last_try(&self) -> &TrySummary {
        &self.last_try
    }

    pub fn tries_completed(&self) -> u64 {
        self.tries_completed
    }

    pub fn state(&self) -> TrackerState {
        TrackerState {
            last_smoothed_distance: self.last_distance_mm,
            last_timestamp: self.last_time_s,
            try_active: self.active.is_some(),
            try_start_time: self.active.map(|a| a.start_time_s),
            try_start_distance: self.active.map(|a| a.start_distance_mm),
            peak_power_in_try: self.peak_in_try().hp,
            last_try_peak_power: self.last_try.peak_hp,
            last_try_duration: self.last_try.duration_s,
            last_try_distance: self.last_try.distance_mm,
        }
    }

    /// Forget everything, including the smoothing window, last try and try count
    pub fn reset(&mut self) {
        self.smoother.reset();
        self.last_distance_mm = None;
        self.last_time_s = 0.0;
        self.active = None;
        self.last_try = TrySummary::default();
        self.tries_completed = 0;
    }
}

impl Default for LiftTracker {
    fn default() -> Self {
        Self::from_config(&PhysicsConfig::default())
    }
}

#[cfg(test)]
#[path = "tracker_tests.rs"]
mod tests;
