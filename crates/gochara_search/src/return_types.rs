//! Types for periodic-return search.

use gochara_core::Body;
use serde::{Deserialize, Serialize};

/// Configuration for a return search around an estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReturnConfig {
    /// Half-width of the coarse scan around the estimate, days (default 5).
    pub window_days: f64,
    /// Coarse scan step, days (default 0.5).
    pub step_days: f64,
    /// Bisection iterations once bracketed (default 25).
    pub max_iterations: u32,
}

impl Default for ReturnConfig {
    fn default() -> Self {
        Self {
            window_days: 5.0,
            step_days: 0.5,
            max_iterations: 25,
        }
    }
}

impl ReturnConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), &'static str> {
        if !self.window_days.is_finite() || self.window_days <= 0.0 {
            return Err("window_days must be positive");
        }
        if !self.step_days.is_finite() || self.step_days <= 0.0 {
            return Err("step_days must be positive");
        }
        if self.max_iterations == 0 {
            return Err("max_iterations must be > 0");
        }
        Ok(())
    }

    /// Time resolution of the bisection result, days.
    pub fn resolution_days(&self) -> f64 {
        let halvings = i32::try_from(self.max_iterations).unwrap_or(i32::MAX);
        self.step_days / 2f64.powi(halvings)
    }
}

/// A body reaching its target longitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReturnEvent {
    pub body: Body,
    /// Target longitude in degrees [0, 360).
    pub target_longitude_deg: f64,
    /// Event time as Julian Date.
    pub jd_tdb: f64,
    /// Longitude at `jd_tdb` in degrees [0, 360).
    pub longitude_deg: f64,
    /// Longitude speed at `jd_tdb`; negative for a retrograde pass.
    pub speed_deg_per_day: f64,
}
