//! Calendar and Julian Date conversions for the transit engine.
//!
//! This crate provides:
//! - Julian Date ↔ Gregorian calendar conversions
//! - `UtcTime`, the civil date/time type accepted at the edges of the engine
//!
//! Scans themselves run on a bare `f64` Julian Date in whatever scale the
//! ephemeris provider declares canonical; conversion between civil and
//! dynamical scales is the provider's concern.

pub mod error;
pub mod julian;
pub mod utc_time;

pub use error::TimeError;
pub use julian::{
    J2000_JD, SECONDS_PER_DAY, calendar_day, calendar_to_jd, days_in_month, is_leap_year,
    jd_to_calendar,
};
pub use utc_time::UtcTime;
