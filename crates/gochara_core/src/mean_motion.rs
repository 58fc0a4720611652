//! Mean-motion ephemeris: every body moves uniformly in longitude.
//!
//! Longitudes follow `L(t) = L0 + n * (t - epoch)`. The default table holds
//! J2000 mean longitudes and mean daily motions, so results are degrees off
//! for the planets and never retrograde (except the nodes). Good enough for
//! demos; deterministic and cheap for tests, which usually replace bodies
//! with [`MeanMotionEphemeris::with_body`].

use std::collections::BTreeMap;

use gochara_time::J2000_JD;

use crate::angle::normalize_360;
use crate::body::Body;
use crate::error::EphemerisError;
use crate::provider::{BodyPosition, EphemerisProvider, south_node_from};

/// Linear elements of one body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanElements {
    pub epoch_jd: f64,
    /// Longitude at `epoch_jd`, degrees.
    pub longitude_deg: f64,
    /// Daily motion in longitude, degrees/day.
    pub rate_deg_per_day: f64,
    pub distance_au: f64,
}

impl MeanElements {
    pub const fn new(epoch_jd: f64, longitude_deg: f64, rate_deg_per_day: f64) -> Self {
        Self {
            epoch_jd,
            longitude_deg,
            rate_deg_per_day,
            distance_au: 1.0,
        }
    }

    pub const fn with_distance(self, distance_au: f64) -> Self {
        Self {
            distance_au,
            ..self
        }
    }

    fn at(&self, jd: f64) -> BodyPosition {
        BodyPosition {
            longitude_deg: normalize_360(
                self.longitude_deg + self.rate_deg_per_day * (jd - self.epoch_jd),
            ),
            latitude_deg: 0.0,
            distance_au: self.distance_au,
            speed_deg_per_day: self.rate_deg_per_day,
        }
    }
}

// (body, L0 at J2000, deg/day, mean distance AU)
const J2000_TABLE: [(Body, f64, f64, f64); 13] = [
    (Body::Sun, 280.46646, 0.985_647_36, 1.0),
    (Body::Moon, 218.3165, 13.176_396_48, 0.002_57),
    (Body::Mercury, 252.25084, 4.092_334_45, 1.0),
    (Body::Venus, 181.97973, 1.602_130_34, 1.0),
    (Body::Mars, 355.45332, 0.524_020_68, 1.52),
    (Body::Jupiter, 34.40438, 0.083_085_29, 5.2),
    (Body::Saturn, 49.94432, 0.033_444_14, 9.54),
    (Body::Uranus, 313.23218, 0.011_728_34, 19.19),
    (Body::Neptune, 304.88003, 0.005_981_03, 30.07),
    (Body::Pluto, 238.92881, 0.003_97, 39.48),
    (Body::Chiron, 251.0, 0.019_44, 13.7),
    (Body::TrueNode, 125.04452, -0.052_953_9, 0.002_57),
    (Body::Lilith, 263.3533, 0.111_404_1, 0.002_71),
];

/// Uniform-motion provider.
#[derive(Debug, Clone, Default)]
pub struct MeanMotionEphemeris {
    elements: BTreeMap<Body, MeanElements>,
}

impl MeanMotionEphemeris {
    /// Empty provider; add bodies with [`with_body`](Self::with_body).
    pub fn empty() -> Self {
        Self::default()
    }

    /// J2000 mean elements for every body (South Node derived).
    pub fn j2000() -> Self {
        let elements = J2000_TABLE
            .iter()
            .map(|&(body, lon, rate, dist)| {
                (body, MeanElements::new(J2000_JD, lon, rate).with_distance(dist))
            })
            .collect();
        Self { elements }
    }

    /// Add or replace a body.
    pub fn with_body(mut self, body: Body, elements: MeanElements) -> Self {
        self.elements.insert(body, elements);
        self
    }

    pub fn elements(&self, body: Body) -> Option<&MeanElements> {
        self.elements.get(&body)
    }
}

impl EphemerisProvider for MeanMotionEphemeris {
    fn position(&self, body: Body, jd_tdb: f64) -> Result<BodyPosition, EphemerisError> {
        if !jd_tdb.is_finite() {
            return Err(EphemerisError::EpochOutOfRange {
                body,
                epoch_jd: jd_tdb,
            });
        }
        match self.elements.get(&body) {
            Some(el) => Ok(el.at(jd_tdb)),
            None if body == Body::SouthNode => {
                Ok(south_node_from(self.position(Body::TrueNode, jd_tdb)?))
            }
            None => Err(EphemerisError::UnsupportedBody(body)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::ALL_BODIES;

    #[test]
    fn j2000_covers_every_body() {
        let eph = MeanMotionEphemeris::j2000();
        for body in ALL_BODIES {
            let pos = eph.position(body, J2000_JD + 1000.0).unwrap();
            assert!((0.0..360.0).contains(&pos.longitude_deg), "{body}");
        }
    }

    #[test]
    fn sun_at_epoch() {
        let eph = MeanMotionEphemeris::j2000();
        let lon = eph.longitude(Body::Sun, J2000_JD).unwrap();
        assert!((lon - 280.46646).abs() < 1e-9);
    }

    #[test]
    fn linear_motion_wraps() {
        let eph = MeanMotionEphemeris::empty()
            .with_body(Body::Mars, MeanElements::new(0.0, 350.0, 2.0));
        let pos = eph.position(Body::Mars, 10.0).unwrap();
        assert!((pos.longitude_deg - 10.0).abs() < 1e-9);
        assert_eq!(pos.speed_deg_per_day, 2.0);
    }

    #[test]
    fn nodes_are_retrograde_and_opposite() {
        let eph = MeanMotionEphemeris::j2000();
        let north = eph.position(Body::TrueNode, J2000_JD + 50.0).unwrap();
        let south = eph.position(Body::SouthNode, J2000_JD + 50.0).unwrap();
        assert!(north.is_retrograde());
        assert!((normalize_360(south.longitude_deg - north.longitude_deg) - 180.0).abs() < 1e-9);
    }

    #[test]
    fn missing_body_is_unsupported() {
        let eph = MeanMotionEphemeris::empty();
        assert_eq!(
            eph.position(Body::Venus, 0.0),
            Err(EphemerisError::UnsupportedBody(Body::Venus))
        );
    }

    #[test]
    fn non_finite_epoch_rejected() {
        let eph = MeanMotionEphemeris::j2000();
        assert!(eph.position(Body::Sun, f64::NAN).is_err());
    }
}
