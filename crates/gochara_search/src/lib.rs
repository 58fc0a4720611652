//! Transit alignment search engine.
//!
//! This crate provides:
//! - Orb policy: relationship set and luminary/angle orb modifiers
//! - Transit scan: fixed-step sweep with a per-scan alignment state machine
//!   and golden-section refinement of each alignment's exact instant
//! - Periodic-return search (coarse bracket + bisection), incl. solar returns
//! - Aggregation views over scan output
//! - Sky snapshot: retrograde bodies and lunar metrics

pub mod alignment;
pub mod alignment_types;
pub mod error;
pub mod orb;
pub mod report;
pub mod return_search;
pub mod return_types;
pub mod scan;
pub mod search_util;
pub mod sky;
pub mod sky_types;

pub use alignment::{AlignmentTracker, Transition};
pub use alignment_types::{
    ActiveAlignment, AlignmentEvent, AlignmentKey, ScanConfig, alignment_strength,
};
pub use error::SearchError;
pub use orb::{
    OrbPolicy, Relationship, default_relationships, find_relationship, validate_relationships,
};
pub use report::{
    TransitReport, TransitSummary, chronological, daily_tightest, date_string, exact_within,
    tightest_per_key, top_n,
};
pub use return_search::{find_return, find_solar_return, return_chart, solar_return_estimate};
pub use return_types::{ReturnConfig, ReturnEvent};
#[cfg(feature = "parallel")]
pub use scan::scan_transits_batch;
pub use scan::{ScanRequest, scan_transits, scan_transits_with_cancel};
pub use search_util::{bisect_crossing, crosses_target, golden_section_min};
pub use sky::{lunar_metrics, retrogrades, sign_position, sky_snapshot};
pub use sky_types::{
    ALL_SIGNS, LunarMetrics, MoonPhase, RetrogradeBody, Sign, SignPosition, SkySnapshot,
};
