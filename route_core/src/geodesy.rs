//! Great-circle distance and linear interpolation on lat/lon pairs.
//!
//! # Haversine (atan2 form)
//! a = sin²(Δφ/2) + cos φ₁ · cos φ₂ · sin²(Δλ/2)
//! d = 2R · atan2(√a, √(1−a))
//!
//! The atan2 form stays inside its domain for coincident and antipodal
//! points, where the arcsine form can see `a` drift just above 1.

use crate::types::GeoCoordinate;

/// Mean Earth radius (meters).
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance between `a` and `b`, in meters.
pub fn haversine_m(a: GeoCoordinate, b: GeoCoordinate) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let d_phi = (b.latitude - a.latitude).to_radians();
    let d_lambda = (b.longitude - a.longitude).to_radians();

    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    // Rounding can push h a hair outside [0, 1]
    let h = h.clamp(0.0, 1.0);
    2.0 * EARTH_RADIUS_M * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Total length of a polyline (meters).
pub fn path_length_m(points: &[GeoCoordinate]) -> f64 {
    points.windows(2).map(|w| haversine_m(w[0], w[1])).sum()
}

impl GeoCoordinate {
    /// Great-circle distance to `other` (meters).
    pub fn distance_to(&self, other: &GeoCoordinate) -> f64 {
        haversine_m(*self, *other)
    }

    /// Linear interpolation in degrees: `self·(1−t) + other·t` per axis.
    ///
    /// Only meaningful over short spans; `t = 0` returns `self` exactly.
    pub fn lerp(&self, other: &GeoCoordinate, t: f64) -> GeoCoordinate {
        GeoCoordinate::from_degrees(
            self.latitude * (1.0 - t) + other.latitude * t,
            self.longitude * (1.0 - t) + other.longitude * t,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn p(lat: f64, lon: f64) -> GeoCoordinate {
        GeoCoordinate::from_degrees(lat, lon)
    }

    #[test]
    fn zero_distance_to_self() {
        for c in [p(0.0, 0.0), p(18.5204, 73.8567), p(-89.9, 179.9), p(90.0, 0.0)] {
            assert_eq!(haversine_m(c, c), 0.0);
        }
    }

    #[test]
    fn symmetric() {
        let a = p(18.5793, 73.9822);
        let b = p(18.4906, 74.0251);
        assert_eq!(haversine_m(a, b), haversine_m(b, a));
        assert_eq!(a.distance_to(&b), haversine_m(a, b));
    }

    #[test]
    fn one_degree_of_longitude_at_equator() {
        // 2πR / 360
        let expected = 2.0 * std::f64::consts::PI * EARTH_RADIUS_M / 360.0;
        assert_abs_diff_eq!(haversine_m(p(0.0, 0.0), p(0.0, 1.0)), expected, epsilon = 1e-6);
    }

    #[test]
    fn antipodal_is_half_circumference() {
        let d = haversine_m(p(0.0, 0.0), p(0.0, 180.0));
        assert!(d.is_finite());
        assert_abs_diff_eq!(d, std::f64::consts::PI * EARTH_RADIUS_M, epsilon = 1e-3);
        let poles = haversine_m(p(90.0, 0.0), p(-90.0, 0.0));
        assert_abs_diff_eq!(poles, std::f64::consts::PI * EARTH_RADIUS_M, epsilon = 1e-3);
    }

    #[test]
    fn tiny_separation_is_stable() {
        // 1e-7 degree ≈ 1.1 cm
        let d = haversine_m(p(18.0, 73.0), p(18.0, 73.0000001));
        assert!(d > 0.0 && d < 0.02, "d = {d}");
    }

    #[test]
    fn path_length_sums_segments() {
        let pts = [p(0.0, 0.0), p(0.0, 0.001), p(0.001, 0.001)];
        let expected = haversine_m(pts[0], pts[1]) + haversine_m(pts[1], pts[2]);
        assert_abs_diff_eq!(path_length_m(&pts), expected, epsilon = 1e-9);
        assert_eq!(path_length_m(&pts[..1]), 0.0);
    }

    #[test]
    fn lerp_endpoints_and_midpoint() {
        let a = p(10.0, 20.0);
        let b = p(12.0, 26.0);
        assert_eq!(a.lerp(&b, 0.0), a);
        assert_eq!(a.lerp(&b, 0.5), p(11.0, 23.0));
        let end = a.lerp(&b, 1.0);
        assert_abs_diff_eq!(end.latitude, b.latitude, epsilon = 1e-12);
        assert_abs_diff_eq!(end.longitude, b.longitude, epsilon = 1e-12);
    }
}
