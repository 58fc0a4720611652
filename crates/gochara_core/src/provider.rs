//! The ephemeris-provider seam.

use serde::{Deserialize, Serialize};

use crate::angle::normalize_360;
use crate::body::Body;
use crate::error::EphemerisError;

/// Geocentric ecliptic position of a body at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyPosition {
    /// Ecliptic longitude in degrees [0, 360).
    pub longitude_deg: f64,
    /// Ecliptic latitude in degrees.
    pub latitude_deg: f64,
    /// Distance in AU.
    pub distance_au: f64,
    /// Longitude speed in degrees per day (negative when retrograde).
    pub speed_deg_per_day: f64,
}

impl BodyPosition {
    pub fn is_retrograde(&self) -> bool {
        self.speed_deg_per_day < 0.0
    }
}

/// Source of body positions.
///
/// Implementations must accept arbitrary epochs (the root finders query
/// between scan samples), be deterministic, and be continuous in time for a
/// fixed body. Search code calls this once per body per sample and never
/// caches results across samples.
pub trait EphemerisProvider {
    /// Position of `body` at Julian Date `jd_tdb` on the provider's canonical scale.
    fn position(&self, body: Body, jd_tdb: f64) -> Result<BodyPosition, EphemerisError>;

    /// Longitude only.
    fn longitude(&self, body: Body, jd_tdb: f64) -> Result<f64, EphemerisError> {
        Ok(self.position(body, jd_tdb)?.longitude_deg)
    }
}

impl<P: EphemerisProvider + ?Sized> EphemerisProvider for &P {
    fn position(&self, body: Body, jd_tdb: f64) -> Result<BodyPosition, EphemerisError> {
        (**self).position(body, jd_tdb)
    }
}

/// Derive the South Node from a True Node position.
pub fn south_node_from(true_node: BodyPosition) -> BodyPosition {
    BodyPosition {
        longitude_deg: normalize_360(true_node.longitude_deg + 180.0),
        latitude_deg: -true_node.latitude_deg,
        ..true_node
    }
}
