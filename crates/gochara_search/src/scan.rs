//! Transit scan driver.
//!
//! Sweeps `[start, end]` on a fixed grid, queries each moving body once per
//! sample, and feeds every body × reference point × relationship deviation to
//! an [`AlignmentTracker`]. When an alignment leaves orb (or the window
//! closes) its exact instant is refined with a golden-section search on the
//! deviation function around the best sample.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};

use gochara_core::{
    ALL_BODIES, Body, ChartPoint, EphemerisProvider, NatalChart, ReferencePoint, separation,
};
use tracing::{debug, info, trace};

use crate::alignment::{AlignmentTracker, Transition};
use crate::alignment_types::{
    ActiveAlignment, AlignmentEvent, AlignmentKey, ScanConfig, alignment_strength,
};
use crate::error::SearchError;
use crate::orb::{Relationship, default_relationships, validate_relationships};
use crate::search_util::golden_section_min;

/// Inputs of one scan.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanRequest {
    /// Moving bodies, queried once per sample.
    pub bodies: Vec<Body>,
    /// Fixed reference points.
    pub chart: NatalChart,
    /// Ordered relationships; earlier entries win for a pair at a sample.
    pub relationships: Vec<Relationship>,
    pub start_jd: f64,
    pub end_jd: f64,
}

impl ScanRequest {
    /// All bodies against `chart` with the default relationship set.
    pub fn new(chart: NatalChart, start_jd: f64, end_jd: f64) -> Self {
        Self {
            bodies: ALL_BODIES.to_vec(),
            chart,
            relationships: default_relationships(),
            start_jd,
            end_jd,
        }
    }

    pub fn with_bodies(mut self, bodies: Vec<Body>) -> Self {
        self.bodies = bodies;
        self
    }

    pub fn with_relationships(mut self, relationships: Vec<Relationship>) -> Self {
        self.relationships = relationships;
        self
    }

    fn validate(&self) -> Result<(), SearchError> {
        if !self.start_jd.is_finite() || !self.end_jd.is_finite() {
            return Err(SearchError::InvalidInput(
                "scan window bounds must be finite".into(),
            ));
        }
        if self.end_jd < self.start_jd {
            return Err(SearchError::InvalidInput(format!(
                "scan end JD {} precedes start JD {}",
                self.end_jd, self.start_jd
            )));
        }
        if self.bodies.is_empty() {
            return Err(SearchError::InvalidInput("no moving bodies to scan".into()));
        }
        if self.chart.is_empty() {
            return Err(SearchError::InvalidInput("reference chart has no points".into()));
        }
        let mut seen = BTreeSet::new();
        if let Some(body) = self.bodies.iter().find(|b| !seen.insert(**b)) {
            return Err(SearchError::InvalidInput(format!(
                "moving body {body} listed twice"
            )));
        }
        // Alignments are keyed by point, so each point needs a single longitude.
        let mut seen = BTreeSet::new();
        if let Some(p) = self.chart.points.iter().find(|p| !seen.insert(p.point)) {
            return Err(SearchError::InvalidInput(format!(
                "reference point {} appears twice",
                p.point
            )));
        }
        if let Some(p) = self.chart.points.iter().find(|p| !p.longitude_deg.is_finite()) {
            return Err(SearchError::InvalidInput(format!(
                "reference point {} has a non-finite longitude",
                p.point
            )));
        }
        validate_relationships(&self.relationships).map_err(SearchError::InvalidConfig)
    }
}

/// Run a transit scan.
///
/// Returns finalized events in emission order: alignments that leave orb, in
/// sample order, then alignments still in orb at window end (right-censored,
/// `end_jd = None`) in key order.
pub fn scan_transits<P: EphemerisProvider + ?Sized>(
    provider: &P,
    request: &ScanRequest,
    config: &ScanConfig,
) -> Result<Vec<AlignmentEvent>, SearchError> {
    run_scan(provider, request, config, None)
}

/// [`scan_transits`] with a cancellation flag checked once per sample.
///
/// Aborts with [`SearchError::Cancelled`] once the flag is set.
pub fn scan_transits_with_cancel<P: EphemerisProvider + ?Sized>(
    provider: &P,
    request: &ScanRequest,
    config: &ScanConfig,
    cancel: &AtomicBool,
) -> Result<Vec<AlignmentEvent>, SearchError> {
    run_scan(provider, request, config, Some(cancel))
}

/// Run independent scans on the rayon pool. Results keep request order.
#[cfg(feature = "parallel")]
pub fn scan_transits_batch<P: EphemerisProvider + Sync + ?Sized>(
    provider: &P,
    requests: &[ScanRequest],
    config: &ScanConfig,
) -> Vec<Result<Vec<AlignmentEvent>, SearchError>> {
    use rayon::prelude::*;

    requests
        .par_iter()
        .map(|request| scan_transits(provider, request, config))
        .collect()
}

/// Number of steps after the first sample: `floor((end - start) / step)`.
fn sample_count(start_jd: f64, end_jd: f64, step_days: f64) -> u64 {
    // Absorb representation error so an exact multiple keeps its last sample.
    ((end_jd - start_jd) / step_days + 1e-9).floor() as u64
}

fn run_scan<P: EphemerisProvider + ?Sized>(
    provider: &P,
    request: &ScanRequest,
    config: &ScanConfig,
    cancel: Option<&AtomicBool>,
) -> Result<Vec<AlignmentEvent>, SearchError> {
    config.validate().map_err(SearchError::InvalidConfig)?;
    request.validate()?;

    let n = sample_count(request.start_jd, request.end_jd, config.step_days);
    info!(
        start_jd = request.start_jd,
        end_jd = request.end_jd,
        samples = n + 1,
        bodies = request.bodies.len(),
        points = request.chart.len(),
        relationships = request.relationships.len(),
        "transit scan started"
    );

    let mut tracker = AlignmentTracker::new();
    let mut events = Vec::new();
    let mut positions = Vec::with_capacity(request.bodies.len());

    for i in 0..=n {
        if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            info!(sample = i, "transit scan cancelled");
            return Err(SearchError::Cancelled);
        }
        let jd = request.start_jd + i as f64 * config.step_days;

        positions.clear();
        for &body in &request.bodies {
            positions.push((body, provider.longitude(body, jd)?));
        }

        for &(body, lon) in &positions {
            for reference in &request.chart.points {
                let sep = separation(lon, reference.longitude_deg);
                for (idx, rel) in request.relationships.iter().enumerate() {
                    if rel.is_conjunction() && reference.point.is_natal_of(body) {
                        continue;
                    }
                    let orb = config.orbs.effective_orb(
                        rel,
                        ChartPoint::Body(body),
                        reference.point,
                        config.orb_scale,
                    );
                    let key = AlignmentKey {
                        body,
                        point: reference.point,
                        relationship: idx,
                    };
                    let transition = tracker.observe(key, (sep - rel.angle_deg).abs(), orb, jd);
                    match &transition {
                        Transition::Idle => {}
                        Transition::Exited(active) => {
                            let event = finalize(
                                provider, body, reference, rel, active, Some(jd), request, config,
                            )?;
                            debug!(
                                body = %body,
                                point = %reference.point,
                                relationship = %rel.name,
                                exact_jd = event.exact_jd,
                                deviation_deg = event.deviation_deg,
                                "alignment finalized"
                            );
                            events.push(event);
                        }
                        other => {
                            trace!(
                                body = %body,
                                point = %reference.point,
                                relationship = %rel.name,
                                jd,
                                transition = ?other,
                                "alignment in orb"
                            );
                        }
                    }
                    if transition.ends_pair() {
                        break;
                    }
                }
            }
        }
    }

    let censored_start = events.len();
    for (key, active) in tracker.drain() {
        let Some(reference) = request.chart.get(key.point) else {
            continue;
        };
        let rel = &request.relationships[key.relationship];
        let event = finalize(provider, key.body, reference, rel, &active, None, request, config)?;
        debug!(
            body = %key.body,
            point = %key.point,
            relationship = %rel.name,
            exact_jd = event.exact_jd,
            "alignment open at window end"
        );
        events.push(event);
    }

    info!(
        events = events.len(),
        censored = events.len() - censored_start,
        "transit scan finished"
    );
    Ok(events)
}

/// Deviation from the exact relationship angle at `jd`.
fn deviation_at<P: EphemerisProvider + ?Sized>(
    provider: &P,
    body: Body,
    point_lon: f64,
    angle_deg: f64,
    jd: f64,
) -> Result<f64, SearchError> {
    let lon = provider.longitude(body, jd)?;
    Ok((separation(lon, point_lon) - angle_deg).abs())
}

#[allow(clippy::too_many_arguments)]
fn finalize<P: EphemerisProvider + ?Sized>(
    provider: &P,
    body: Body,
    reference: &ReferencePoint,
    rel: &Relationship,
    active: &ActiveAlignment,
    end_jd: Option<f64>,
    request: &ScanRequest,
    config: &ScanConfig,
) -> Result<AlignmentEvent, SearchError> {
    let half_width = config.refine_window_days.max(config.step_days);
    let lo = active.best_jd - half_width;
    let mut hi = active.best_jd + half_width;
    if end_jd.is_none() {
        hi = hi.min(request.end_jd).max(active.best_jd);
    }

    let dev = |jd| deviation_at(provider, body, reference.longitude_deg, rel.angle_deg, jd);
    let exact_jd = golden_section_min(
        dev,
        lo,
        hi,
        config.refine_tolerance_days,
        config.refine_max_iterations,
    )?;
    let deviation_deg = dev(exact_jd)?;

    Ok(AlignmentEvent {
        body,
        point: reference.point,
        relationship: rel.name.clone(),
        relationship_angle_deg: rel.angle_deg,
        start_jd: active.entry_jd.min(exact_jd),
        exact_jd,
        end_jd,
        deviation_deg,
        orb_limit_deg: active.orb_limit_deg,
        strength: alignment_strength(deviation_deg, active.orb_limit_deg),
    })
}
