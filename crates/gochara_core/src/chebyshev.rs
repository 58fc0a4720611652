//! Chebyshev-segment ephemeris.
//!
//! Each body carries a list of time segments; within a segment the unwrapped
//! ecliptic longitude, latitude and distance are Chebyshev expansions in the
//! normalised time `s ∈ [-1, 1]`. Longitude speed is the analytic derivative.
//!
//! File layout (JSON):
//!
//! ```json
//! { "bodies": { "Sun": [ { "start_jd": 2460000.5, "end_jd": 2460032.5,
//!                           "longitude": [340.1, 15.7, -0.01],
//!                           "latitude": [0.0], "distance": [0.99] } ] } }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::angle::normalize_360;
use crate::body::Body;
use crate::error::EphemerisError;
use crate::provider::{BodyPosition, EphemerisProvider, south_node_from};

/// Evaluate a Chebyshev expansion using the Clenshaw recurrence.
///
/// Given coefficients `[c_0, c_1, ..., c_{n-1}]` and normalised time
/// `s` in `[-1, 1]`, computes `sum(c_k * T_k(s))`.
pub fn clenshaw(coeffs: &[f64], s: f64) -> f64 {
    match coeffs {
        [] => 0.0,
        [c0] => *c0,
        _ => {
            let mut b_k1 = 0.0; // b_{k+1}
            let mut b_k2 = 0.0; // b_{k+2}
            let two_s = 2.0 * s;
            for &c_k in coeffs[1..].iter().rev() {
                let b_k = two_s * b_k1 - b_k2 + c_k;
                b_k2 = b_k1;
                b_k1 = b_k;
            }
            s * b_k1 - b_k2 + coeffs[0]
        }
    }
}

/// Derivative with respect to `s` of a Chebyshev expansion.
///
/// Forward recurrence on `T_k'(s) = 2 T_{k-1}(s) + 2 s T_{k-1}'(s) - T_{k-2}'(s)`.
pub fn clenshaw_derivative(coeffs: &[f64], s: f64) -> f64 {
    if coeffs.len() <= 1 {
        return 0.0;
    }
    let two_s = 2.0 * s;
    let (mut t_prev2, mut dt_prev2) = (1.0, 0.0);
    let (mut t_prev1, mut dt_prev1) = (s, 1.0);
    let mut result = coeffs[1];

    for &c_k in &coeffs[2..] {
        let t_k = two_s * t_prev1 - t_prev2;
        let dt_k = 2.0 * t_prev1 + two_s * dt_prev1 - dt_prev2;
        result += c_k * dt_k;
        t_prev2 = t_prev1;
        t_prev1 = t_k;
        dt_prev2 = dt_prev1;
        dt_prev1 = dt_k;
    }
    result
}

/// One time segment of a body's expansion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChebyshevSegment {
    pub start_jd: f64,
    pub end_jd: f64,
    /// Unwrapped longitude coefficients, degrees.
    pub longitude: Vec<f64>,
    /// Latitude coefficients, degrees.
    #[serde(default)]
    pub latitude: Vec<f64>,
    /// Distance coefficients, AU.
    #[serde(default)]
    pub distance: Vec<f64>,
}

impl ChebyshevSegment {
    fn validate(&self) -> Result<(), &'static str> {
        if !self.start_jd.is_finite() || !self.end_jd.is_finite() {
            return Err("segment bounds must be finite");
        }
        if self.end_jd <= self.start_jd {
            return Err("segment end_jd must be after start_jd");
        }
        if self.longitude.is_empty() {
            return Err("segment must carry longitude coefficients");
        }
        Ok(())
    }

    fn evaluate(&self, jd: f64) -> BodyPosition {
        let half_span = 0.5 * (self.end_jd - self.start_jd);
        let mid = self.start_jd + half_span;
        let s = ((jd - mid) / half_span).clamp(-1.0, 1.0);
        BodyPosition {
            longitude_deg: normalize_360(clenshaw(&self.longitude, s)),
            latitude_deg: clenshaw(&self.latitude, s),
            distance_au: clenshaw(&self.distance, s),
            speed_deg_per_day: clenshaw_derivative(&self.longitude, s) / half_span,
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
struct EphemerisFile {
    bodies: BTreeMap<String, Vec<ChebyshevSegment>>,
}

/// Ephemeris backed by per-body Chebyshev segments.
#[derive(Debug, Clone, Default)]
pub struct ChebyshevEphemeris {
    segments: BTreeMap<Body, Vec<ChebyshevSegment>>,
}

impl ChebyshevEphemeris {
    /// Build from segments; each body's segments are sorted by start time.
    pub fn new(
        mut segments: BTreeMap<Body, Vec<ChebyshevSegment>>,
    ) -> Result<Self, EphemerisError> {
        for (body, list) in segments.iter_mut() {
            for seg in list.iter() {
                seg.validate()
                    .map_err(|msg| EphemerisError::Data(format!("{body}: {msg}")))?;
            }
            list.sort_by(|a, b| a.start_jd.total_cmp(&b.start_jd));
        }
        Ok(Self { segments })
    }

    /// Parse the JSON layout described in the module docs.
    pub fn from_json(text: &str) -> Result<Self, EphemerisError> {
        let file: EphemerisFile = serde_json::from_str(text)?;
        let mut segments = BTreeMap::new();
        for (name, list) in file.bodies {
            let body: Body = name.parse()?;
            segments.insert(body, list);
        }
        Self::new(segments)
    }

    pub fn load(path: &Path) -> Result<Self, EphemerisError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Bodies with data (South Node is implied by True Node).
    pub fn bodies(&self) -> impl Iterator<Item = Body> + '_ {
        self.segments.keys().copied()
    }

    /// Covered `(start, end)` span for a body.
    pub fn coverage(&self, body: Body) -> Option<(f64, f64)> {
        let list = self.segments.get(&body)?;
        Some((list.first()?.start_jd, list.last()?.end_jd))
    }

    fn find_segment(&self, body: Body, jd: f64) -> Result<&ChebyshevSegment, EphemerisError> {
        let list = self
            .segments
            .get(&body)
            .ok_or(EphemerisError::UnsupportedBody(body))?;
        let idx = list.partition_point(|seg| seg.start_jd <= jd);
        idx.checked_sub(1)
            .map(|i| &list[i])
            .filter(|seg| jd <= seg.end_jd)
            .ok_or(EphemerisError::EpochOutOfRange {
                body,
                epoch_jd: jd,
            })
    }
}

impl EphemerisProvider for ChebyshevEphemeris {
    fn position(&self, body: Body, jd_tdb: f64) -> Result<BodyPosition, EphemerisError> {
        if body == Body::SouthNode && !self.segments.contains_key(&Body::SouthNode) {
            return Ok(south_node_from(self.position(Body::TrueNode, jd_tdb)?));
        }
        Ok(self.find_segment(body, jd_tdb)?.evaluate(jd_tdb))
    }
}
