//! Aggregation views over finalized alignment events.

use std::collections::BTreeMap;

use gochara_core::{Body, ChartPoint};
use gochara_time::calendar_day;
use serde::{Deserialize, Serialize};

use crate::alignment_types::AlignmentEvent;

/// `YYYY-MM-DD` of a Julian Date.
pub fn date_string(jd: f64) -> String {
    let (y, m, d) = calendar_day(jd);
    format!("{y:04}-{m:02}-{d:02}")
}

/// One line of a dated summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitSummary {
    /// Calendar date of the exact instant.
    pub date: String,
    pub body: Body,
    pub point: ChartPoint,
    pub relationship: String,
    pub deviation_deg: f64,
    pub orb_limit_deg: f64,
    pub strength: u8,
}

impl From<&AlignmentEvent> for TransitSummary {
    fn from(ev: &AlignmentEvent) -> Self {
        Self {
            date: date_string(ev.exact_jd),
            body: ev.body,
            point: ev.point,
            relationship: ev.relationship.clone(),
            deviation_deg: ev.deviation_deg,
            orb_limit_deg: ev.orb_limit_deg,
            strength: ev.strength,
        }
    }
}

fn by_deviation(a: &AlignmentEvent, b: &AlignmentEvent) -> std::cmp::Ordering {
    a.deviation_deg.total_cmp(&b.deviation_deg)
}

fn by_exact(a: &AlignmentEvent, b: &AlignmentEvent) -> std::cmp::Ordering {
    a.exact_jd.total_cmp(&b.exact_jd)
}

/// Tightest event per (body, point, relationship), sorted by deviation.
pub fn tightest_per_key(events: &[AlignmentEvent]) -> Vec<TransitSummary> {
    let mut best: BTreeMap<(Body, ChartPoint, &str), &AlignmentEvent> = BTreeMap::new();
    for ev in events {
        best.entry(ev.pair_key())
            .and_modify(|cur| {
                if ev.deviation_deg < cur.deviation_deg {
                    *cur = ev;
                }
            })
            .or_insert(ev);
    }
    let mut picked: Vec<&AlignmentEvent> = best.into_values().collect();
    picked.sort_by(|a, b| by_deviation(a, b));
    picked.into_iter().map(TransitSummary::from).collect()
}

/// Events whose exact instant falls in `[from_jd, to_jd)`, sorted by deviation.
pub fn exact_within(events: &[AlignmentEvent], from_jd: f64, to_jd: f64) -> Vec<AlignmentEvent> {
    let mut out: Vec<AlignmentEvent> = events
        .iter()
        .filter(|ev| ev.exact_jd >= from_jd && ev.exact_jd < to_jd)
        .cloned()
        .collect();
    out.sort_by(by_deviation);
    out
}

/// The `n` tightest events, then ordered by exact instant.
pub fn top_n(events: &[AlignmentEvent], n: usize) -> Vec<AlignmentEvent> {
    let mut out = events.to_vec();
    out.sort_by(by_deviation);
    out.truncate(n);
    out.sort_by(by_exact);
    out
}

/// All events ordered by exact instant.
pub fn chronological(events: &[AlignmentEvent]) -> Vec<AlignmentEvent> {
    let mut out = events.to_vec();
    out.sort_by(by_exact);
    out
}

/// Tightest event per (calendar day, body, point, relationship), chronological.
pub fn daily_tightest(events: &[AlignmentEvent]) -> Vec<TransitSummary> {
    let mut best: BTreeMap<(String, (Body, ChartPoint, &str)), &AlignmentEvent> = BTreeMap::new();
    for ev in events {
        best.entry((date_string(ev.exact_jd), ev.pair_key()))
            .and_modify(|cur| {
                if ev.deviation_deg < cur.deviation_deg {
                    *cur = ev;
                }
            })
            .or_insert(ev);
    }
    let mut picked: Vec<&AlignmentEvent> = best.into_values().collect();
    picked.sort_by(|a, b| by_exact(a, b));
    picked.into_iter().map(TransitSummary::from).collect()
}

/// The standard set of views for one scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitReport {
    pub window_start: String,
    pub window_end: String,
    /// Tightest per key.
    pub summary: Vec<TransitSummary>,
    /// Exact within one day of `now`.
    pub today: Vec<AlignmentEvent>,
    /// Exact within seven days of `now`.
    pub week: Vec<AlignmentEvent>,
    /// Top-N tightest, chronological.
    pub important: Vec<AlignmentEvent>,
    /// Every event, chronological.
    pub events: Vec<AlignmentEvent>,
}

impl TransitReport {
    pub fn build(
        events: &[AlignmentEvent],
        window_start_jd: f64,
        window_end_jd: f64,
        now_jd: f64,
        top: usize,
    ) -> Self {
        Self {
            window_start: date_string(window_start_jd),
            window_end: date_string(window_end_jd),
            summary: tightest_per_key(events),
            today: exact_within(events, now_jd, now_jd + 1.0),
            week: exact_within(events, now_jd, now_jd + 7.0),
            important: top_n(events, top),
            events: chronological(events),
        }
    }
}
