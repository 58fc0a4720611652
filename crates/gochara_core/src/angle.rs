//! Circle-aware angle arithmetic in degrees.

/// Normalize an angle to [0, 360) degrees.
pub fn normalize_360(deg: f64) -> f64 {
    let r = deg % 360.0;
    if r < 0.0 { r + 360.0 } else { r }
}

/// Normalize an angle to (-180, +180].
pub fn normalize_to_pm180(deg: f64) -> f64 {
    let mut d = deg % 360.0;
    if d > 180.0 {
        d -= 360.0;
    } else if d <= -180.0 {
        d += 360.0;
    }
    d
}

/// Shortest angular distance between two longitudes, in [0, 180].
pub fn separation(a: f64, b: f64) -> f64 {
    let d = (a - b).abs() % 360.0;
    if d > 180.0 { 360.0 - d } else { d }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_negative() {
        assert!((normalize_360(-10.0) - 350.0).abs() < 1e-12);
        assert!((normalize_360(730.0) - 10.0).abs() < 1e-10);
        assert!((normalize_360(360.0) - 0.0).abs() < 1e-12);
    }

    #[test]
    fn pm180_basic() {
        assert!((normalize_to_pm180(270.0) - (-90.0)).abs() < 1e-10);
        assert!((normalize_to_pm180(-180.0) - 180.0).abs() < 1e-10);
        assert!((normalize_to_pm180(450.0) - 90.0).abs() < 1e-10);
    }

    #[test]
    fn separation_wraps_through_zero() {
        assert!((separation(350.0, 10.0) - 20.0).abs() < 1e-12);
        assert!((separation(10.0, 350.0) - 20.0).abs() < 1e-12);
    }

    #[test]
    fn separation_is_symmetric_and_bounded() {
        let samples = [0.0, 0.5, 45.0, 179.9, 180.0, 180.1, 270.0, 359.99, -30.0, 725.0];
        for &a in &samples {
            for &b in &samples {
                let ab = separation(a, b);
                let ba = separation(b, a);
                assert!((ab - ba).abs() < 1e-9, "a={a} b={b}");
                assert!((0.0..=180.0).contains(&ab), "a={a} b={b} sep={ab}");
            }
        }
    }

    #[test]
    fn separation_of_opposition() {
        assert!((separation(100.0, 280.0) - 180.0).abs() < 1e-12);
    }
}
