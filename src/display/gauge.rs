use serde::{Deserialize, Serialize};

use crate::config::DisplayConfig;

/// Level within this distance of the target counts as arrived
const SETTLE_EPSILON: f64 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum GaugePhase {
    Rising,
    Holding { since_s: f64 },
}

/// Fill level of the horse bar, 0.0 (empty) to 1.0 (full).
///
/// The level eases towards the target on each tick, holds at the peak for a
/// moment, then drains. A zero reading or a new target value re-arms the
/// rise.
#[derive(Debug, Clone)]
pub struct FillGauge {
    min_hp: f64,
    max_hp: f64,
    rise_smoothing: f64,
    fall_smoothing: f64,
    hold_s: f64,
    level: f64,
    phase: GaugePhase,
    last_input_hp: Option<f64>,
}

impl FillGauge {
    pub fn new(config: &DisplayConfig) -> Self {
        Self {
            min_hp: config.min_hp,
            max_hp: config.max_hp,
            rise_smoothing: config.rise_smoothing.clamp(0.0, 1.0),
            fall_smoothing: config.fall_smoothing.clamp(0.0, 1.0),
            hold_s: config.hold_s,
            level: 0.0,
            phase: GaugePhase::Rising,
            last_input_hp: None,
        }
    }

    /// Normalized target for a horsepower reading
    pub fn target(&self, hp: f64) -> f64 {
        if self.max_hp <= self.min_hp {
            return 0.0;
        }
        ((hp - self.min_hp) / (self.max_hp - self.min_hp)).clamp(0.0, 1.0)
    }

    /// Advance one display tick
    pub fn update(&mut self, hp: f64, now_s: f64) -> f64 {
        if self.last_input_hp.is_some_and(|last| last != hp) {
            self.phase = GaugePhase::Rising;
        }
        self.last_input_hp = Some(hp);

        let target = self.target(hp);
        match self.phase {
            GaugePhase::Rising => {
                self.level += (target - self.level) * self.rise_smoothing;
                if self.level >= target - SETTLE_EPSILON {
                    self.phase = GaugePhase::Holding { since_s: now_s };
                }
            }
            GaugePhase::Holding { since_s } => {
                if now_s - since_s > self.hold_s {
                    self.level -= self.level * self.fall_smoothing;
                }
            }
        }
        self.level = self.level.clamp(0.0, 1.0);

        if hp <= self.min_hp {
            self.phase = GaugePhase::Rising;
        }
        self.level
    }

    pub fn level(&self) -> f64 {
        self.level
    }

    pub fn phase(&self) -> GaugePhase {
        self.phase
    }

    pub fn reset(&mut self) {
        self.level = 0.0;
        self.phase = GaugePhase::Rising;
        self.last_input_hp = None;
    }
}

impl Default for FillGauge {
    fn default() -> Self {
        Self::new(&DisplayConfig::default())
    }
}
