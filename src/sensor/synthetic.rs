//! Deterministic synthetic lifts for bench testing without the exhibit
//! hardware.
//!
//! The profile is rest → smooth rise → hold, optionally followed by a smooth
//! lowering back to rest (which the tracker counts as a second try). Noise is
//! triangular, generated from a seeded RNG so runs are reproducible.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{ReplaySource, SampleSource, TimedLine, NEXT_LANGUAGE_COMMAND};
use crate::error::SensorError;

/// Shape of a generated lift
#[derive(Debug, Clone)]
pub struct SyntheticLift {
    /// Sensor reading with the bar at rest (mm)
    pub rest_distance_mm: f64,
    /// How far the bar travels towards the sensor (mm)
    pub lift_height_mm: f64,
    pub rest_s: f64,
    pub rise_s: f64,
    pub hold_s: f64,
    /// Lower the bar back to rest after the hold
    pub lower: bool,
    pub sample_interval_s: f64,
    /// Peak amplitude of the reading noise (mm)
    pub noise_mm: f64,
    /// Emit a `SPACE` control line at this time
    pub language_switch_at_s: Option<f64>,
    pub seed: u64,
}

impl Default for SyntheticLift {
    fn default() -> Self {
        Self {
            rest_distance_mm: 1870.0,
            lift_height_mm: 600.0,
            rest_s: 1.0,
            rise_s: 0.8,
            hold_s: 1.5,
            lower: false,
            sample_interval_s: 0.1,
            noise_mm: 2.0,
            language_switch_at_s: None,
            seed: 7,
        }
    }
}

impl SyntheticLift {
    /// Total simulated duration in seconds
    pub fn duration_s(&self) -> f64 {
        let lowering = if self.lower {
            self.rise_s + self.rest_s
        } else {
            0.0
        };
        self.rest_s + self.rise_s + self.hold_s + lowering
    }

    /// Generate the full session as sensor lines
    pub fn generate(&self) -> Vec<TimedLine> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let interval = self.sample_interval_s.max(0.001);
        let steps = (self.duration_s() / interval).round() as usize;

        let mut lines = Vec::with_capacity(steps + 2);
        for step in 0..=steps {
            let t = step as f64 * interval;
            let noise = if self.noise_mm > 0.0 {
                // Triangular noise: mean of two uniforms
                let a: f64 = rng.gen_range(-self.noise_mm..=self.noise_mm);
                let b: f64 = rng.gen_range(-self.noise_mm..=self.noise_mm);
                (a + b) / 2.0
            } else {
                0.0
            };
            let distance = self.rest_distance_mm - self.displacement_at(t) + noise;
            lines.push(TimedLine::new(format!("{:.0}", distance), t));
        }

        if let Some(at) = self.language_switch_at_s {
            let index = lines.partition_point(|line| line.timestamp_s <= at);
            lines.insert(index, TimedLine::new(NEXT_LANGUAGE_COMMAND, at));
        }

        lines
    }

    fn displacement_at(&self, t: f64) -> f64 {
        let rise_start = self.rest_s;
        let rise_end = rise_start + self.rise_s;
        let lower_start = rise_end + self.hold_s;
        let lower_end = lower_start + self.rise_s;

        if t <= rise_start {
            0.0
        } else if t < rise_end {
            self.lift_height_mm * smoothstep((t - rise_start) / self.rise_s)
        } else if !self.lower || t <= lower_start {
            self.lift_height_mm
        } else if t < lower_end {
            self.lift_height_mm * (1.0 - smoothstep((t - lower_start) / self.rise_s))
        } else {
            0.0
        }
    }
}

fn smoothstep(x: f64) -> f64 {
    let x = x.clamp(0.0, 1.0);
    x * x * (3.0 - 2.0 * x)
}

/// Sample source that plays a generated lift against the engine clock
pub struct SyntheticSource {
    inner: ReplaySource,
}

impl SyntheticSource {
    pub fn new(lift: &SyntheticLift) -> Self {
        Self {
            inner: ReplaySource::from_lines("synthetic", lift.generate()),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.inner.is_exhausted()
    }
}

impl SampleSource for SyntheticSource {
    fn poll(&mut self, now_s: f64) -> Result<Vec<TimedLine>, SensorError> {
        self.inner.poll(now_s)
    }

    fn describe(&self) -> String {
        "synthetic lift".to_string()
    }
}
