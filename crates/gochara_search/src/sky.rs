//! Sky snapshot at one instant: retrograde bodies and lunar metrics.

use gochara_core::{Body, EphemerisProvider, normalize_360};

use crate::error::SearchError;
use crate::sky_types::{LunarMetrics, MoonPhase, RetrogradeBody, Sign, SignPosition, SkySnapshot};

/// Mean synodic month used for the Moon's age, days.
pub const SYNODIC_MONTH_DAYS: f64 = 29.53;
/// Closer than this (AU, ~364 600 km) counts as perigee.
pub const PERIGEE_THRESHOLD_AU: f64 = 0.00244;
/// Farther than this (AU, ~405 400 km) counts as apogee.
pub const APOGEE_THRESHOLD_AU: f64 = 0.00271;

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Split a longitude into sign and degrees/minutes/seconds.
pub fn sign_position(longitude_deg: f64) -> SignPosition {
    let lon = normalize_360(longitude_deg);
    let sign = Sign::from_longitude(lon);
    let degrees_in_sign = (lon - 30.0 * f64::from(sign.index())).max(0.0);
    let degree = degrees_in_sign.floor();
    let minutes = (degrees_in_sign - degree) * 60.0;
    let minute = minutes.floor();
    let second = ((minutes - minute) * 60.0).round().min(59.0);
    SignPosition {
        sign,
        degrees_in_sign,
        degree: degree as u32,
        minute: minute as u32,
        second: second as u32,
    }
}

/// Bodies with negative longitude speed at `jd_tdb`.
///
/// The nodes and Lilith always move backward (or oscillate) and are skipped.
pub fn retrogrades<P: EphemerisProvider + ?Sized>(
    provider: &P,
    bodies: &[Body],
    jd_tdb: f64,
) -> Result<Vec<RetrogradeBody>, SearchError> {
    let mut out = Vec::new();
    for &body in bodies.iter().filter(|b| !b.is_calculated_point()) {
        let pos = provider.position(body, jd_tdb)?;
        if pos.is_retrograde() {
            out.push(RetrogradeBody {
                body,
                sign: Sign::from_longitude(pos.longitude_deg),
                speed_deg_per_day: pos.speed_deg_per_day,
            });
        }
    }
    Ok(out)
}

/// Moon phase, illumination, age and distance flags at `jd_tdb`.
pub fn lunar_metrics<P: EphemerisProvider + ?Sized>(
    provider: &P,
    jd_tdb: f64,
) -> Result<LunarMetrics, SearchError> {
    let moon = provider.position(Body::Moon, jd_tdb)?;
    let sun = provider.position(Body::Sun, jd_tdb)?;

    let elongation_deg = normalize_360(moon.longitude_deg - sun.longitude_deg);
    let phase = MoonPhase::from_elongation(elongation_deg);
    let illumination_pct = round1((1.0 - elongation_deg.to_radians().cos()) / 2.0 * 100.0);
    let age_days = round1(elongation_deg * SYNODIC_MONTH_DAYS / 360.0);
    let moon_day = (age_days.floor() as u32 + 1).min(30);

    let within_perigee = moon.distance_au < PERIGEE_THRESHOLD_AU;
    let within_apogee = moon.distance_au > APOGEE_THRESHOLD_AU;

    Ok(LunarMetrics {
        moon_sign: Sign::from_longitude(moon.longitude_deg),
        phase,
        elongation_deg,
        illumination_pct,
        age_days,
        moon_day,
        within_perigee,
        within_apogee,
        is_supermoon: within_perigee && phase.is_new_or_full(),
    })
}

/// Retrogrades among `bodies` plus lunar metrics.
pub fn sky_snapshot<P: EphemerisProvider + ?Sized>(
    provider: &P,
    bodies: &[Body],
    jd_tdb: f64,
) -> Result<SkySnapshot, SearchError> {
    Ok(SkySnapshot {
        jd_tdb,
        retrogrades: retrogrades(provider, bodies, jd_tdb)?,
        lunar: lunar_metrics(provider, jd_tdb)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gochara_core::{MeanElements, MeanMotionEphemeris};

    fn sun_moon(sun: f64, moon: f64, moon_dist: f64) -> MeanMotionEphemeris {
        MeanMotionEphemeris::empty()
            .with_body(Body::Sun, MeanElements::new(0.0, sun, 1.0))
            .with_body(
                Body::Moon,
                MeanElements::new(0.0, moon, 13.0).with_distance(moon_dist),
            )
    }

    #[test]
    fn sign_position_splits_dms() {
        let p = sign_position(125.5125);
        assert_eq!(p.sign, Sign::Leo);
        assert_eq!((p.degree, p.minute, p.second), (5, 30, 45));
        assert!((p.degrees_in_sign - 5.5125).abs() < 1e-9);
    }

    #[test]
    fn sign_position_caps_rounded_seconds() {
        // 59.9999" rounds to 60 and is capped.
        let p = sign_position(10.0 + 59.0 / 60.0 + 59.9999 / 3600.0);
        assert_eq!((p.degree, p.minute, p.second), (10, 59, 59));
    }

    #[test]
    fn full_moon_metrics() {
        let eph = sun_moon(10.0, 190.0, 0.0026);
        let m = lunar_metrics(&eph, 0.0).unwrap();
        assert_eq!(m.phase, MoonPhase::FullMoon);
        assert_eq!(m.moon_sign, Sign::Libra);
        assert!((m.illumination_pct - 100.0).abs() < 1e-9);
        assert!((m.age_days - 14.8).abs() < 0.11);
        assert_eq!(m.moon_day, 15);
        assert!(!m.within_perigee && !m.within_apogee && !m.is_supermoon);
    }

    #[test]
    fn new_moon_at_perigee_is_super() {
        let eph = sun_moon(100.0, 101.0, 0.0024);
        let m = lunar_metrics(&eph, 0.0).unwrap();
        assert_eq!(m.phase, MoonPhase::NewMoon);
        assert!(m.within_perigee);
        assert!(m.is_supermoon);
        assert_eq!(m.moon_day, 1);
        assert!(m.illumination_pct < 0.1);
    }

    #[test]
    fn quarter_at_perigee_is_not_super() {
        let eph = sun_moon(0.0, 90.0, 0.0024);
        let m = lunar_metrics(&eph, 0.0).unwrap();
        assert_eq!(m.phase, MoonPhase::FirstQuarter);
        assert!((m.illumination_pct - 50.0).abs() < 1e-9);
        assert!(!m.is_supermoon);
    }

    #[test]
    fn apogee_flag() {
        let eph = sun_moon(0.0, 270.0, 0.0028);
        let m = lunar_metrics(&eph, 0.0).unwrap();
        assert!(m.within_apogee);
        assert_eq!(m.phase, MoonPhase::LastQuarter);
    }

    #[test]
    fn moon_day_caps_at_thirty() {
        let eph = sun_moon(0.0, 359.9, 0.0026);
        let m = lunar_metrics(&eph, 0.0).unwrap();
        assert!(m.moon_day <= 30);
    }

    #[test]
    fn retrogrades_skip_calculated_points() {
        let eph = MeanMotionEphemeris::empty()
            .with_body(Body::Mercury, MeanElements::new(0.0, 45.0, -0.8))
            .with_body(Body::Mars, MeanElements::new(0.0, 200.0, 0.5))
            .with_body(Body::TrueNode, MeanElements::new(0.0, 10.0, -0.05));
        let r = retrogrades(
            &eph,
            &[Body::Mercury, Body::Mars, Body::TrueNode, Body::SouthNode],
            0.0,
        )
        .unwrap();
        assert_eq!(r.len(), 1);
        assert_eq!(r[0].body, Body::Mercury);
        assert_eq!(r[0].sign, Sign::Taurus);
    }
}
