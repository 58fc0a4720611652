//! Ephemeris-provider contract for the transit engine.
//!
//! The search crates never compute planetary positions themselves. They ask an
//! [`EphemerisProvider`] for a [`BodyPosition`] at a Julian Date and a
//! [`ChartBuilder`] for the fixed [`NatalChart`] of a birth event. This crate
//! defines those seams plus two providers:
//! - [`ChebyshevEphemeris`]: per-body Chebyshev segments loaded from JSON
//! - [`MeanMotionEphemeris`]: uniform circular motion, for demos and tests

pub mod angle;
pub mod body;
pub mod chart;
pub mod chebyshev;
pub mod error;
pub mod mean_motion;
pub mod provider;

pub use angle::{normalize_360, normalize_to_pm180, separation};
pub use body::{ALL_BODIES, Body, ChartPoint};
pub use chart::{BirthEvent, ChartBuilder, EphemerisChartBuilder, NatalChart, ReferencePoint};
pub use chebyshev::{ChebyshevEphemeris, ChebyshevSegment, clenshaw, clenshaw_derivative};
pub use error::EphemerisError;
pub use mean_motion::{MeanElements, MeanMotionEphemeris};
pub use provider::{BodyPosition, EphemerisProvider, south_node_from};
