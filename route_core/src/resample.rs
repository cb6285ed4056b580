//! Route resampling: subdivide long segments so playback moves smoothly.
//!
//! Each original pair `(a, b)` with great-circle length `d` is split into
//! `steps = max(1, ⌈d / max_segment_m⌉)` equal-parameter substeps. Points are
//! interpolated linearly in lat/lon, which is close enough at a few meters
//! per substep. The last original point is appended untouched.

use crate::{
    error::{Result, RouteError},
    geodesy::haversine_m,
    types::{GeoCoordinate, Route},
};
use rayon::prelude::*;

/// Default maximum spacing between consecutive resampled points (meters).
pub const DEFAULT_MAX_SEGMENT_M: f64 = 6.0;

/// Upper bound on the size of a resampled route.
pub const MAX_RESAMPLED_POINTS: usize = 10_000_000;

/// Number of substeps for a pair `d` meters apart, as a float so callers can
/// bound it before allocating.
pub fn substep_count(d: f64, max_segment_m: f64) -> f64 {
    (d / max_segment_m).ceil().max(1.0)
}

/// Resample `route` so consecutive points are at most `max_segment_m` apart.
///
/// The first and last points of the result are bit-identical to the input's.
pub fn resample(route: &Route, max_segment_m: f64) -> Result<Route> {
    if !(max_segment_m.is_finite() && max_segment_m > 0.0) {
        return Err(RouteError::InvalidParameter {
            name: "max_segment_m",
            value: max_segment_m,
        });
    }

    let points = route.points();
    let steps: Vec<f64> = points
        .par_windows(2)
        .map(|w| substep_count(haversine_m(w[0], w[1]), max_segment_m))
        .collect();
    let total = steps.iter().sum::<f64>() + 1.0;
    if total > MAX_RESAMPLED_POINTS as f64 {
        tracing::warn!(total, max_segment_m, "resampled route would be too large");
        return Err(RouteError::InvalidParameter {
            name: "max_segment_m",
            value: max_segment_m,
        });
    }

    // Pairs are independent; collect() on an indexed parallel iterator keeps
    // original order, which timing and hazard placement rely on.
    let chunks: Vec<Vec<GeoCoordinate>> = points
        .par_windows(2)
        .zip(steps.par_iter())
        .map(|(w, &n)| subdivide(w[0], w[1], n as usize))
        .collect();

    let mut out = Vec::with_capacity(chunks.iter().map(Vec::len).sum::<usize>() + 1);
    for chunk in chunks {
        out.extend(chunk);
    }
    out.push(route.last());

    tracing::debug!(
        input = points.len(),
        output = out.len(),
        max_segment_m,
        "resampled route"
    );
    Route::new(out)
}

/// Points at `t = s / steps` for `s ∈ [0, steps)`; excludes `b`.
fn subdivide(a: GeoCoordinate, b: GeoCoordinate, steps: usize) -> Vec<GeoCoordinate> {
    (0..steps)
        .map(|s| a.lerp(&b, s as f64 / steps as f64))
        .collect()
}
