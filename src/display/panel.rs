use serde::{Deserialize, Serialize};

use super::gauge::FillGauge;
use super::language::{summary_text, Language};
use crate::analysis::{Emission, TrySummary};
use crate::config::DisplayConfig;

/// Everything a renderer needs for one refresh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayFrame {
    pub language: Language,
    pub heading: String,
    pub body: String,
    /// Fill level of the horse bar, 0.0 to 1.0
    pub gauge_level: f64,
    /// Instantaneous horsepower of the latest sample
    pub live_hp: f64,
    pub try_active: bool,
    pub summary: TrySummary,
}

impl DisplayFrame {
    /// Plain-text rendering for terminals
    pub fn render_text(&self, bar_width: usize) -> String {
        let bar_width = bar_width.max(1);
        let filled = ((self.gauge_level * bar_width as f64).round() as usize).min(bar_width);
        let bar = format!(
            "[{}{}] {:>3.0}%",
            "#".repeat(filled),
            ".".repeat(bar_width - filled),
            self.gauge_level * 100.0
        );
        let status = if self.try_active {
            format!("● {:.3} hp", self.live_hp)
        } else {
            "○".to_string()
        };
        format!("{}  {}\n{}\n{}", self.heading, status, self.body, bar)
    }
}

/// Presentation state: shown summary, language, fill gauge and idle reset.
///
/// The panel keeps its own copy of the summary so that clearing the screen
/// after an idle period does not touch the tracker.
#[derive(Debug, Clone)]
pub struct DisplayPanel {
    language: Language,
    gauge: FillGauge,
    mass_kg: f64,
    reset_after_s: f64,
    shown: TrySummary,
    shown_since_s: Option<f64>,
    live_hp: f64,
    try_active: bool,
}

impl DisplayPanel {
    pub fn new(config: &DisplayConfig, mass_kg: f64) -> Self {
        Self {
            language: Language::default(),
            gauge: FillGauge::new(config),
            mass_kg,
            reset_after_s: config.reset_after_s,
            shown: TrySummary::default(),
            shown_since_s: None,
            live_hp: 0.0,
            try_active: false,
        }
    }

    /// Fold one tracker emission into the panel
    pub fn apply(&mut self, emission: &Emission, now_s: f64) {
        match emission {
            Emission::TryEnded(summary) => {
                self.shown = *summary;
                self.shown_since_s = Some(now_s);
                self.live_hp = 0.0;
                self.try_active = false;
            }
            Emission::PowerReading(reading) => {
                self.live_hp = reading.hp;
                if reading.try_active && !self.try_active {
                    // A new try cancels the pending idle reset
                    self.shown_since_s = None;
                }
                self.try_active = reading.try_active;
            }
            Emission::Baseline | Emission::Debounced => {}
        }
    }

    /// Advance timers and the gauge; returns true when the idle reset fired
    pub fn tick(&mut self, now_s: f64) -> bool {
        let expired = self
            .shown_since_s
            .is_some_and(|since| now_s - since > self.reset_after_s);
        if expired {
            tracing::info!(
                "[Display] No new try for {:.0}s, clearing summary",
                self.reset_after_s
            );
            self.shown = TrySummary::default();
            self.shown_since_s = None;
        }
        self.gauge.update(self.shown.peak_hp, now_s);
        expired
    }

    pub fn next_language(&mut self) -> Language {
        self.language = self.language.next();
        self.language
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn shown_summary(&self) -> &TrySummary {
        &self.shown
    }

    pub fn frame(&self) -> DisplayFrame {
        DisplayFrame {
            language: self.language,
            heading: self.language.heading().to_string(),
            body: summary_text(self.language, self.mass_kg, &self.shown),
            gauge_level: self.gauge.level(),
            live_hp: self.live_hp,
            try_active: self.try_active,
            summary: self.shown,
        }
    }
}
