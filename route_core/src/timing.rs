//! Constant-speed timing model: one traversal duration per segment.

use crate::{
    error::{Result, RouteError},
    geodesy::haversine_m,
    types::Route,
};

/// Default vehicle speed (m/s), shared by generation and playback.
pub const DEFAULT_SPEED_MPS: f64 = 6.0;

/// Floor applied to every segment duration (seconds). Coincident points would
/// otherwise yield a zero-length segment the cursor can never interpolate.
pub const MIN_SEGMENT_DURATION_S: f64 = 0.01;

/// `distance / speed` for each consecutive pair, floored at
/// [`MIN_SEGMENT_DURATION_S`]. Length is `route.len() - 1`.
pub fn segment_durations(route: &Route, speed_mps: f64) -> Result<Vec<f64>> {
    if !(speed_mps.is_finite() && speed_mps > 0.0) {
        return Err(RouteError::InvalidParameter {
            name: "speed_mps",
            value: speed_mps,
        });
    }
    Ok(route
        .segments()
        .map(|(a, b)| (haversine_m(a, b) / speed_mps).max(MIN_SEGMENT_DURATION_S))
        .collect())
}

/// Total traversal time (seconds).
pub fn total_duration_s(durations: &[f64]) -> f64 {
    durations.iter().sum()
}
