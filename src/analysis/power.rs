//! Mechanical power model.
//!
//! The bar is lifted against gravity, so the work done over one step is
//! `m * g * Δh`. Dividing by the step duration gives watts; one mechanical
//! horsepower is 745.7 W.

use serde::{Deserialize, Serialize};

use crate::config::PhysicsConfig;

/// Watts per mechanical horsepower
pub const WATTS_PER_HP: f64 = 745.7;

/// Standard gravity in m/s²
pub const STANDARD_GRAVITY: f64 = 9.81;

/// Power produced over one accepted step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerSample {
    pub watts: f64,
    pub hp: f64,
}

impl PowerSample {
    pub const ZERO: PowerSample = PowerSample { watts: 0.0, hp: 0.0 };
}

/// Converts a vertical displacement over a time step into power
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerModel {
    mass_kg: f64,
    gravity: f64,
}

impl PowerModel {
    pub fn new(mass_kg: f64, gravity: f64) -> Self {
        Self { mass_kg, gravity }
    }

    pub fn from_config(config: &PhysicsConfig) -> Self {
        Self::new(config.mass_kg, config.gravity)
    }

    pub fn mass_kg(&self) -> f64 {
        self.mass_kg
    }

    /// Force needed to hold the bar, in newtons
    pub fn force_newtons(&self) -> f64 {
        self.mass_kg * self.gravity
    }

    /// Power for moving `displacement_mm` in `time_s` seconds.
    ///
    /// Non-positive durations yield zero power.
    pub fn power(&self, displacement_mm: f64, time_s: f64) -> PowerSample {
        if time_s <= 0.0 {
            return PowerSample::ZERO;
        }
        let distance_m = displacement_mm.abs() / 1000.0;
        let watts = self.force_newtons() * distance_m / time_s;
        PowerSample {
            watts,
            hp: watts / WATTS_PER_HP,
        }
    }
}

impl Default for PowerModel {
    fn default() -> Self {
        Self::from_config(&PhysicsConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_formula() {
        let model = PowerModel::new(7.5, STANDARD_GRAVITY);
        // 60 mm in 0.15 s: 73.575 N * 0.06 m / 0.15 s = 29.43 W
        let sample = model.power(60.0, 0.15);
        assert!((sample.watts - 29.43).abs() < 1e-9);
        assert!((sample.hp - 29.43 / WATTS_PER_HP).abs() < 1e-12);
    }

    #[test]
    fn test_direction_does_not_matter() {
        let model = PowerModel::default();
        assert_eq!(model.power(-40.0, 0.2), model.power(40.0, 0.2));
    }

    #[test]
    fn test_zero_duration_is_zero_power() {
        let model = PowerModel::default();
        assert_eq!(model.power(100.0, 0.0), PowerSample::ZERO);
    }
}
