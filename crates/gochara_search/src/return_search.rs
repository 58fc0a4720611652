//! Periodic-return search: when a body comes back to a target longitude.
//!
//! Coarse scan of `[estimate − window, estimate + window]` until two
//! consecutive samples bracket the target, then bisection.

use gochara_core::{
    BirthEvent, Body, ChartBuilder, EphemerisProvider, NatalChart, normalize_360,
};
use gochara_time::UtcTime;
use tracing::debug;

use crate::error::SearchError;
use crate::return_types::{ReturnConfig, ReturnEvent};
use crate::search_util::bisect_crossing;

/// Find the instant `body` passes `target_deg` near `estimate_jd`.
///
/// Returns `Ok(None)` when the body does not reach the target inside the
/// search window.
pub fn find_return<P: EphemerisProvider + ?Sized>(
    provider: &P,
    body: Body,
    target_deg: f64,
    estimate_jd: f64,
    config: &ReturnConfig,
) -> Result<Option<ReturnEvent>, SearchError> {
    config.validate().map_err(SearchError::InvalidConfig)?;
    if !target_deg.is_finite() {
        return Err(SearchError::InvalidInput(
            "return target longitude must be finite".into(),
        ));
    }
    if !estimate_jd.is_finite() {
        return Err(SearchError::InvalidInput(
            "return estimate must be a finite Julian Date".into(),
        ));
    }

    let target = normalize_360(target_deg);
    let found = bisect_crossing(
        |jd| provider.longitude(body, jd).map_err(SearchError::from),
        target,
        estimate_jd - config.window_days,
        estimate_jd + config.window_days,
        config.step_days,
        config.max_iterations,
    )?;

    let Some(jd_tdb) = found else {
        debug!(body = %body, target, estimate_jd, "no return inside window");
        return Ok(None);
    };
    let pos = provider.position(body, jd_tdb)?;
    debug!(body = %body, target, jd_tdb, "return found");
    Ok(Some(ReturnEvent {
        body,
        target_longitude_deg: target,
        jd_tdb,
        longitude_deg: pos.longitude_deg,
        speed_deg_per_day: pos.speed_deg_per_day,
    }))
}

/// Rough solar-return instant: the birth's civil date and time in `year`.
pub fn solar_return_estimate(birth: &UtcTime, year: i32) -> f64 {
    birth.with_year(year).to_jd()
}

/// The Sun's return to its natal longitude in `year`.
pub fn find_solar_return<P: EphemerisProvider + ?Sized>(
    provider: &P,
    birth: &UtcTime,
    natal_sun_deg: f64,
    year: i32,
    config: &ReturnConfig,
) -> Result<Option<ReturnEvent>, SearchError> {
    birth
        .validate()
        .map_err(|e| SearchError::InvalidInput(e.to_string()))?;
    find_return(
        provider,
        Body::Sun,
        natal_sun_deg,
        solar_return_estimate(birth, year),
        config,
    )
}

/// Build a chart for the return instant; angles are supplied by the caller.
pub fn return_chart<B: ChartBuilder + ?Sized>(
    builder: &B,
    event: &ReturnEvent,
    ascendant_deg: Option<f64>,
    midheaven_deg: Option<f64>,
) -> Result<NatalChart, SearchError> {
    let birth = BirthEvent {
        jd_tdb: event.jd_tdb,
        ascendant_deg,
        midheaven_deg,
    };
    Ok(builder.build(&birth)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gochara_core::{MeanElements, MeanMotionEphemeris};

    fn linear(lon0: f64, rate: f64) -> MeanMotionEphemeris {
        MeanMotionEphemeris::empty().with_body(Body::Mars, MeanElements::new(0.0, lon0, rate))
    }

    #[test]
    fn linear_offset_five_days() {
        // 1°/day from 170°, target 175°, estimate in the middle of a 10-day span.
        let eph = linear(170.0, 1.0);
        let config = ReturnConfig::default();
        let ev = find_return(&eph, Body::Mars, 175.0, 5.0, &config)
            .unwrap()
            .unwrap();
        assert!((ev.jd_tdb - 5.0).abs() <= config.resolution_days(), "jd = {}", ev.jd_tdb);
        assert!((ev.longitude_deg - 175.0).abs() < 1e-6);
    }

    #[test]
    fn retrograde_pass() {
        let eph = linear(20.0, -0.5);
        let ev = find_return(&eph, Body::Mars, 18.5, 2.0, &ReturnConfig::default())
            .unwrap()
            .unwrap();
        assert!((ev.jd_tdb - 3.0).abs() < 1e-6);
        assert!(ev.speed_deg_per_day < 0.0);
    }

    #[test]
    fn out_of_window_is_none() {
        let eph = linear(170.0, 1.0);
        let r = find_return(&eph, Body::Mars, 200.0, 5.0, &ReturnConfig::default()).unwrap();
        assert!(r.is_none());
    }

    #[test]
    fn target_is_normalized() {
        let eph = linear(170.0, 1.0);
        let ev = find_return(&eph, Body::Mars, 175.0 - 360.0, 5.0, &ReturnConfig::default())
            .unwrap()
            .unwrap();
        assert!((ev.target_longitude_deg - 175.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_nan_target() {
        let eph = linear(170.0, 1.0);
        assert!(matches!(
            find_return(&eph, Body::Mars, f64::NAN, 5.0, &ReturnConfig::default()),
            Err(SearchError::InvalidInput(_))
        ));
    }

    #[test]
    fn unsupported_body_is_an_error() {
        let eph = linear(170.0, 1.0);
        assert!(matches!(
            find_return(&eph, Body::Venus, 10.0, 5.0, &ReturnConfig::default()),
            Err(SearchError::Ephemeris(_))
        ));
    }

    #[test]
    fn sub_ulp_step_is_not_found() {
        let eph = MeanMotionEphemeris::empty()
            .with_body(Body::Mars, MeanElements::new(2460000.5, 170.0, 1.0));
        let config = ReturnConfig {
            step_days: 1e-10,
            ..ReturnConfig::default()
        };
        let r = find_return(&eph, Body::Mars, 175.0, 2460005.5, &config).unwrap();
        assert!(r.is_none());
    }

    #[test]
    fn estimate_keeps_time_of_day() {
        let birth = UtcTime::new(1990, 7, 14, 18, 0, 0.0);
        let est = solar_return_estimate(&birth, 2025);
        assert!((est - UtcTime::new(2025, 7, 14, 18, 0, 0.0).to_jd()).abs() < 1e-9);
    }
}
