//! Natal reference points and the chart-builder seam.

use serde::{Deserialize, Serialize};

use crate::angle::normalize_360;
use crate::body::{Body, ChartPoint};
use crate::error::EphemerisError;
use crate::provider::EphemerisProvider;

/// A fixed longitude sourced once per scan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferencePoint {
    pub point: ChartPoint,
    /// Longitude in degrees [0, 360).
    pub longitude_deg: f64,
}

impl ReferencePoint {
    pub fn new(point: ChartPoint, longitude_deg: f64) -> Self {
        Self {
            point,
            longitude_deg: normalize_360(longitude_deg),
        }
    }
}

/// The fixed targets of a transit scan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NatalChart {
    pub points: Vec<ReferencePoint>,
}

impl NatalChart {
    pub fn new(points: Vec<ReferencePoint>) -> Self {
        Self { points }
    }

    pub fn push(&mut self, point: ChartPoint, longitude_deg: f64) {
        self.points.push(ReferencePoint::new(point, longitude_deg));
    }

    pub fn get(&self, point: ChartPoint) -> Option<&ReferencePoint> {
        self.points.iter().find(|p| p.point == point)
    }

    /// Natal longitude of a body, if the chart carries it.
    pub fn body_longitude(&self, body: Body) -> Option<f64> {
        self.get(ChartPoint::Body(body)).map(|p| p.longitude_deg)
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }
}

/// Birth moment plus the chart angles.
///
/// Angles come from a house-system algorithm that lives outside this
/// workspace; callers pass them in when they have them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BirthEvent {
    pub jd_tdb: f64,
    pub ascendant_deg: Option<f64>,
    pub midheaven_deg: Option<f64>,
}

/// Builds the fixed reference chart for a birth event.
pub trait ChartBuilder {
    fn build(&self, birth: &BirthEvent) -> Result<NatalChart, EphemerisError>;
}

/// Chart builder that reads natal body longitudes from an ephemeris provider.
#[derive(Debug, Clone)]
pub struct EphemerisChartBuilder<P> {
    provider: P,
    bodies: Vec<Body>,
}

impl<P: EphemerisProvider> EphemerisChartBuilder<P> {
    pub fn new(provider: P, bodies: Vec<Body>) -> Self {
        Self { provider, bodies }
    }
}

impl<P: EphemerisProvider> ChartBuilder for EphemerisChartBuilder<P> {
    fn build(&self, birth: &BirthEvent) -> Result<NatalChart, EphemerisError> {
        let mut chart = NatalChart::default();
        for &body in &self.bodies {
            let pos = self.provider.position(body, birth.jd_tdb)?;
            chart.push(ChartPoint::Body(body), pos.longitude_deg);
        }
        if let Some(asc) = birth.ascendant_deg {
            chart.push(ChartPoint::Ascendant, asc);
        }
        if let Some(mc) = birth.midheaven_deg {
            chart.push(ChartPoint::Midheaven, mc);
        }
        Ok(chart)
    }
}
