//! Shared numerical helpers: golden-section minimiser and crossing bisection.

use gochara_core::normalize_360;

/// Inverse golden ratio, (√5 − 1) / 2.
const INV_PHI: f64 = 0.618_033_988_749_894_8;

/// Locate the minimum of a unimodal `f` on `[a, b]`.
///
/// Stops when the bracket is narrower than `tolerance` or after `max_iter`
/// iterations and returns the bracket midpoint. Unimodality is assumed, not
/// checked; on a multi-modal interval the result is one local minimum.
pub fn golden_section_min<F, E>(
    mut f: F,
    mut a: f64,
    mut b: f64,
    tolerance: f64,
    max_iter: u32,
) -> Result<f64, E>
where
    F: FnMut(f64) -> Result<f64, E>,
{
    let mut c = b - INV_PHI * (b - a);
    let mut d = a + INV_PHI * (b - a);
    let mut f_c = f(c)?;
    let mut f_d = f(d)?;

    for _ in 0..max_iter {
        if (b - a).abs() < tolerance {
            break;
        }
        if f_c < f_d {
            b = d;
            d = c;
            f_d = f_c;
            c = b - INV_PHI * (b - a);
            f_c = f(c)?;
        } else {
            a = c;
            c = d;
            f_c = f_d;
            d = a + INV_PHI * (b - a);
            f_d = f(d)?;
        }
    }

    Ok(0.5 * (a + b))
}

/// Whether `target` lies on the short arc travelled from `from` to `to`.
///
/// Motion direction is inferred from the shorter way round: a forward span
/// over 180° is read as backward (retrograde) motion from `to` to `from`.
/// Endpoints are inclusive, and wrap through 0°/360° is handled.
pub fn crosses_target(from: f64, to: f64, target: f64) -> bool {
    let mut start = from;
    let mut span = normalize_360(to - from);
    if span > 180.0 {
        start = to;
        span = 360.0 - span;
    }
    normalize_360(target - start) <= span
}

/// Find the first instant in `[from, to]` where `lon(t)` passes `target_deg`.
///
/// Coarse-scans with `step` until two consecutive samples bracket the target
/// (per [`crosses_target`]), then bisects that bracket `max_iter` times.
/// Returns `Ok(None)` when no bracket is found, including when `step` is
/// too small to advance `t` at its magnitude.
pub fn bisect_crossing<F, E>(
    mut lon: F,
    target_deg: f64,
    from: f64,
    to: f64,
    step: f64,
    max_iter: u32,
) -> Result<Option<f64>, E>
where
    F: FnMut(f64) -> Result<f64, E>,
{
    let mut t_prev = from;
    let mut l_prev = lon(t_prev)?;

    while t_prev < to {
        let t_curr = (t_prev + step).min(to);
        if t_curr <= t_prev {
            return Ok(None);
        }
        let l_curr = lon(t_curr)?;

        if crosses_target(l_prev, l_curr, target_deg) {
            let (mut t_a, mut l_a, mut t_b) = (t_prev, l_prev, t_curr);
            for _ in 0..max_iter {
                let t_mid = 0.5 * (t_a + t_b);
                let l_mid = lon(t_mid)?;
                if crosses_target(l_a, l_mid, target_deg) {
                    t_b = t_mid;
                } else {
                    t_a = t_mid;
                    l_a = l_mid;
                }
            }
            return Ok(Some(0.5 * (t_a + t_b)));
        }

        t_prev = t_curr;
        l_prev = l_curr;
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use super::*;

    fn ok(v: f64) -> Result<f64, Infallible> {
        Ok(v)
    }

    #[test]
    fn golden_section_parabola() {
        let x = golden_section_min(|t| ok((t - 0.3).powi(2)), -1.0, 1.0, 1e-8, 200).unwrap();
        assert!((x - 0.3).abs() < 1e-7, "x = {x}");
    }

    #[test]
    fn golden_section_v_shape() {
        // |t - c| is the deviation profile of a linear pass through an exact angle.
        let x = golden_section_min(|t| ok((t - 2.75).abs()), 2.0, 4.0, 1e-4, 30).unwrap();
        assert!((x - 2.75).abs() < 1e-4, "x = {x}");
    }

    #[test]
    fn golden_section_respects_iteration_cap() {
        let mut calls = 0;
        let _ = golden_section_min(
            |t| {
                calls += 1;
                ok(t * t)
            },
            -1.0,
            1.0,
            0.0,
            5,
        );
        assert_eq!(calls, 2 + 5);
    }

    #[test]
    fn golden_section_minimum_at_edge() {
        let x = golden_section_min(|t| ok(t), 0.0, 1.0, 1e-6, 100).unwrap();
        assert!(x < 1e-5);
    }

    #[test]
    fn golden_section_propagates_errors() {
        let r: Result<f64, &str> = golden_section_min(|_| Err("boom"), 0.0, 1.0, 1e-6, 10);
        assert_eq!(r, Err("boom"));
    }

    #[test]
    fn crosses_forward_and_wrap() {
        assert!(crosses_target(170.0, 176.0, 175.0));
        assert!(!crosses_target(170.0, 174.0, 175.0));
        assert!(crosses_target(358.0, 2.0, 0.0));
        assert!(crosses_target(358.0, 2.0, 359.5));
        assert!(!crosses_target(358.0, 2.0, 180.0));
    }

    #[test]
    fn crosses_backward() {
        assert!(crosses_target(176.0, 170.0, 175.0));
        assert!(crosses_target(2.0, 358.0, 1.0));
        assert!(!crosses_target(176.0, 170.0, 169.0));
    }

    #[test]
    fn crosses_inclusive_endpoints() {
        assert!(crosses_target(170.0, 175.0, 175.0));
        assert!(crosses_target(175.0, 180.0, 175.0));
        assert!(crosses_target(175.0, 175.0, 175.0));
    }

    #[test]
    fn bisect_linear_motion() {
        // 1°/day from 170° at t=0, target 175° → t = 5.
        let t = bisect_crossing(|t| ok(normalize_360(170.0 + t)), 175.0, 0.0, 10.0, 0.5, 25)
            .unwrap()
            .unwrap();
        assert!((t - 5.0).abs() < 0.5 / f64::from(1u32 << 24), "t = {t}");
    }

    #[test]
    fn bisect_through_wrap() {
        let t = bisect_crossing(|t| ok(normalize_360(355.0 + 2.0 * t)), 3.0, 0.0, 10.0, 0.5, 25)
            .unwrap()
            .unwrap();
        assert!((t - 4.0).abs() < 1e-6, "t = {t}");
    }

    #[test]
    fn bisect_retrograde() {
        let t = bisect_crossing(|t| ok(normalize_360(20.0 - 0.5 * t)), 18.0, 0.0, 10.0, 0.5, 25)
            .unwrap()
            .unwrap();
        assert!((t - 4.0).abs() < 1e-6, "t = {t}");
    }

    #[test]
    fn bisect_step_below_float_spacing_terminates() {
        // At JD ~2.46e6 one ulp is ~4.7e-10 days; 1e-10 cannot move t.
        let mut calls = 0;
        let r = bisect_crossing(
            |t| {
                calls += 1;
                ok(normalize_360(t))
            },
            175.0,
            2460000.5,
            2460010.5,
            1e-10,
            25,
        )
        .unwrap();
        assert!(r.is_none());
        assert_eq!(calls, 1);
    }

    #[test]
    fn bisect_not_found_is_none() {
        let r = bisect_crossing(|t| ok(100.0 + t), 175.0, 0.0, 10.0, 0.5, 25).unwrap();
        assert!(r.is_none());
    }
}
