//! Types for the transit alignment scan.

use gochara_core::{Body, ChartPoint};
use serde::{Deserialize, Serialize};

use crate::orb::OrbPolicy;

/// Identity of one tracked combination: moving body × reference point × relationship.
///
/// `relationship` indexes the ordered relationship set of the scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AlignmentKey {
    pub body: Body,
    pub point: ChartPoint,
    pub relationship: usize,
}

/// An alignment currently within orb.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveAlignment {
    /// First in-orb sample.
    pub entry_jd: f64,
    /// Smallest sampled deviation so far.
    pub best_deviation_deg: f64,
    /// Sample time of `best_deviation_deg`.
    pub best_jd: f64,
    /// Effective orb the alignment was detected with.
    pub orb_limit_deg: f64,
}

/// A finalized alignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentEvent {
    /// Moving body.
    pub body: Body,
    /// Fixed reference point.
    pub point: ChartPoint,
    /// Relationship name.
    pub relationship: String,
    /// Relationship target angle in degrees.
    pub relationship_angle_deg: f64,
    /// `min(entry sample, exact_jd)`.
    pub start_jd: f64,
    /// Refined instant of closest approach.
    pub exact_jd: f64,
    /// First out-of-orb sample; `None` when still in orb at window end.
    pub end_jd: Option<f64>,
    /// Deviation from the exact angle at `exact_jd`, degrees.
    pub deviation_deg: f64,
    /// Effective orb, degrees.
    pub orb_limit_deg: f64,
    /// 0-100, 100 at exactness.
    pub strength: u8,
}

impl AlignmentEvent {
    /// Still in orb when the scan window closed.
    pub fn is_censored(&self) -> bool {
        self.end_jd.is_none()
    }

    /// (body, point, relationship name) identity used by aggregation views.
    pub fn pair_key(&self) -> (Body, ChartPoint, &str) {
        (self.body, self.point, self.relationship.as_str())
    }
}

/// Closeness score: `clamp(round((1 − deviation/orb) × 100), 0, 100)`.
///
/// A zero orb scores 100.
pub fn alignment_strength(deviation_deg: f64, orb_limit_deg: f64) -> u8 {
    if orb_limit_deg == 0.0 {
        return 100;
    }
    let raw = ((1.0 - deviation_deg / orb_limit_deg) * 100.0).round();
    raw.clamp(0.0, 100.0) as u8
}

/// Configuration for a transit scan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    /// Sampling interval in days (default 0.5).
    pub step_days: f64,
    /// Multiplier on every base orb (default 0.5).
    pub orb_scale: f64,
    /// Half-width of the golden-section bracket around the best sample, days (default 1.0).
    /// Never narrower than one step.
    pub refine_window_days: f64,
    /// Golden-section stopping width in days (default 1e-4, ~8.6 s).
    pub refine_tolerance_days: f64,
    /// Golden-section iteration cap (default 30).
    pub refine_max_iterations: u32,
    /// Luminary / angle orb modifiers.
    #[serde(skip)]
    pub orbs: OrbPolicy,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            step_days: 0.5,
            orb_scale: 0.5,
            refine_window_days: 1.0,
            refine_tolerance_days: 1e-4,
            refine_max_iterations: 30,
            orbs: OrbPolicy::default(),
        }
    }
}

impl ScanConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), &'static str> {
        if !self.step_days.is_finite() || self.step_days <= 0.0 {
            return Err("step_days must be positive");
        }
        if !self.orb_scale.is_finite() || self.orb_scale <= 0.0 {
            return Err("orb_scale must be positive");
        }
        if !self.refine_window_days.is_finite() || self.refine_window_days <= 0.0 {
            return Err("refine_window_days must be positive");
        }
        if !self.refine_tolerance_days.is_finite() || self.refine_tolerance_days <= 0.0 {
            return Err("refine_tolerance_days must be positive");
        }
        if self.refine_max_iterations == 0 {
            return Err("refine_max_iterations must be > 0");
        }
        self.orbs.validate()
    }
}
