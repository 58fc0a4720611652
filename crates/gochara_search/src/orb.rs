//! Relationship definitions and the effective-orb policy.

use gochara_core::ChartPoint;
use serde::{Deserialize, Serialize};

/// A named target separation with its base tolerance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub name: String,
    /// Target separation in degrees, [0, 180].
    #[serde(rename = "angle")]
    pub angle_deg: f64,
    /// Base orb in degrees, > 0.
    #[serde(rename = "orb")]
    pub orb_deg: f64,
}

impl Relationship {
    pub fn new(name: impl Into<String>, angle_deg: f64, orb_deg: f64) -> Self {
        Self {
            name: name.into(),
            angle_deg,
            orb_deg,
        }
    }

    /// The 0° relationship, never formed between a body and its own natal point.
    pub fn is_conjunction(&self) -> bool {
        self.angle_deg == 0.0
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("relationship name must not be empty");
        }
        if !self.angle_deg.is_finite() || !(0.0..=180.0).contains(&self.angle_deg) {
            return Err("relationship angle must be in [0, 180]");
        }
        if !self.orb_deg.is_finite() || self.orb_deg <= 0.0 {
            return Err("relationship orb must be positive");
        }
        Ok(())
    }
}

/// The seven classical relationships in match-priority order.
pub fn default_relationships() -> Vec<Relationship> {
    vec![
        Relationship::new("Conjunction", 0.0, 8.0),
        Relationship::new("Opposition", 180.0, 8.0),
        Relationship::new("Trine", 120.0, 7.0),
        Relationship::new("Square", 90.0, 7.0),
        Relationship::new("Sextile", 60.0, 5.0),
        Relationship::new("Quincunx", 150.0, 2.5),
        Relationship::new("Semi-sextile", 30.0, 1.5),
    ]
}

/// Validate an ordered relationship set.
pub fn validate_relationships(rels: &[Relationship]) -> Result<(), &'static str> {
    if rels.is_empty() {
        return Err("at least one relationship is required");
    }
    rels.iter().try_for_each(Relationship::validate)
}

/// Find a relationship by case-insensitive name.
pub fn find_relationship<'a>(rels: &'a [Relationship], name: &str) -> Option<&'a Relationship> {
    rels.iter().find(|r| r.name.eq_ignore_ascii_case(name.trim()))
}

/// Orb modifiers for the participants of a pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrbPolicy {
    /// Applied when either participant is the Sun or Moon.
    pub luminary_factor: f64,
    /// Applied when either participant is the Ascendant or Midheaven.
    pub angle_factor: f64,
}

impl Default for OrbPolicy {
    fn default() -> Self {
        Self {
            luminary_factor: 1.25,
            angle_factor: 0.75,
        }
    }
}

impl OrbPolicy {
    pub fn validate(&self) -> Result<(), &'static str> {
        if !self.luminary_factor.is_finite() || self.luminary_factor <= 0.0 {
            return Err("luminary_factor must be positive");
        }
        if !self.angle_factor.is_finite() || self.angle_factor <= 0.0 {
            return Err("angle_factor must be positive");
        }
        Ok(())
    }

    /// Effective orb for `rel` between two participants.
    ///
    /// `base × scale`, then × luminary factor if either side is a luminary,
    /// then × angle factor if either side is an angle. Symmetric in `a`/`b`.
    pub fn effective_orb(&self, rel: &Relationship, a: ChartPoint, b: ChartPoint, scale: f64) -> f64 {
        let mut orb = rel.orb_deg * scale;
        if a.is_luminary() || b.is_luminary() {
            orb *= self.luminary_factor;
        }
        if a.is_angle() || b.is_angle() {
            orb *= self.angle_factor;
        }
        orb
    }
}
