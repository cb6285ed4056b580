//! Playback cursor: converts elapsed time into a position along the route.
//!
//! # State
//! - `segment_index ∈ [0, n]` where n = number of segments
//! - `elapsed_in_segment ∈ [0, duration[segment_index])`
//! - terminal when `segment_index == n`; position pinned to the last point
//!
//! # Tick
//! elapsed += dt; while not terminal and elapsed ≥ duration[i]:
//! elapsed −= duration[i], i += 1. A single delayed tick may therefore cross
//! any number of segments.

use crate::types::GeoCoordinate;

/// Absolute slack (seconds) when comparing elapsed time against a segment
/// duration. Summing thousands of tiny ticks lands a few ulps short of the
/// exact total; without this the cursor would stall one tick early.
pub const TIME_EPSILON_S: f64 = 1e-9;

/// Cursor over a route and its per-segment durations.
///
/// Borrows both slices read-only; all mutable state is local to the cursor.
#[derive(Clone, Debug)]
pub struct PlaybackCursor<'a> {
    route: &'a [GeoCoordinate],
    durations: &'a [f64],
    segment_index: usize,
    elapsed_in_segment: f64,
    /// Time consumed by segments already completed
    completed_time: f64,
    paused: bool,
}

impl<'a> PlaybackCursor<'a> {
    /// `durations.len()` must equal `route.len() - 1` and `route` must be
    /// non-empty; `Scene` and `SceneDataset` guarantee both.
    pub fn new(route: &'a [GeoCoordinate], durations: &'a [f64]) -> Self {
        debug_assert!(!route.is_empty());
        debug_assert_eq!(durations.len() + 1, route.len());
        Self {
            route,
            durations,
            segment_index: 0,
            elapsed_in_segment: 0.0,
            completed_time: 0.0,
            paused: false,
        }
    }

    /// Advance by `dt` seconds. Ignored while paused or finished, and for
    /// negative or non-finite `dt`.
    pub fn tick(&mut self, dt: f64) {
        if self.paused || self.is_finished() || !(dt.is_finite() && dt > 0.0) {
            return;
        }
        self.elapsed_in_segment += dt;
        while let Some(&duration) = self.durations.get(self.segment_index) {
            if self.elapsed_in_segment + TIME_EPSILON_S < duration {
                break;
            }
            self.elapsed_in_segment -= duration;
            self.completed_time += duration;
            self.segment_index += 1;
        }
        if self.is_finished() {
            self.elapsed_in_segment = 0.0;
        }
    }

    /// Current interpolated position.
    pub fn position(&self) -> GeoCoordinate {
        match self.durations.get(self.segment_index) {
            Some(&duration) => {
                let a = &self.route[self.segment_index];
                let b = &self.route[self.segment_index + 1];
                let frac = (self.elapsed_in_segment / duration).clamp(0.0, 1.0);
                a.lerp(b, frac)
            }
            None => self.route[self.route.len() - 1],
        }
    }

    pub fn is_finished(&self) -> bool {
        self.segment_index >= self.durations.len()
    }

    pub fn segment_index(&self) -> usize {
        self.segment_index
    }

    pub fn elapsed_in_segment(&self) -> f64 {
        self.elapsed_in_segment
    }

    /// Time since the start of the route (seconds).
    pub fn elapsed_total(&self) -> f64 {
        self.completed_time + self.elapsed_in_segment
    }

    /// Sum of all segment durations (seconds).
    pub fn total_duration(&self) -> f64 {
        self.durations.iter().sum()
    }

    /// Fraction of the total traversal time elapsed, in [0, 1].
    pub fn progress(&self) -> f64 {
        if self.is_finished() {
            return 1.0;
        }
        (self.elapsed_total() / self.total_duration()).clamp(0.0, 1.0)
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{timing::segment_durations, types::Route};
    use approx::assert_abs_diff_eq;

    fn p(lat: f64, lon: f64) -> GeoCoordinate {
        GeoCoordinate::from_degrees(lat, lon)
    }

    fn two_point() -> (Route, Vec<f64>) {
        let route = Route::new(vec![p(0.0, 0.0), p(0.0, 0.0001)]).unwrap();
        let durations = segment_durations(&route, 6.0).unwrap();
        (route, durations)
    }

    #[test]
    fn one_huge_tick_reaches_terminal() {
        let (route, durations) = two_point();
        let mut c = PlaybackCursor::new(route.points(), &durations);
        c.tick(durations[0]);
        assert!(c.is_finished());
        assert_eq!(c.position(), p(0.0, 0.0001));

        let mut c = PlaybackCursor::new(route.points(), &durations);
        c.tick(1.0e6);
        assert!(c.is_finished());
        assert_eq!(c.position(), p(0.0, 0.0001));
        assert_eq!(c.elapsed_in_segment(), 0.0);
    }

    #[test]
    fn many_tiny_ticks_reach_terminal() {
        let (route, durations) = two_point();
        for n in [3usize, 10, 97, 1000, 10_000] {
            let mut c = PlaybackCursor::new(route.points(), &durations);
            let dt = durations[0] / n as f64;
            for i in 0..n {
                assert!(!c.is_finished(), "finished early at tick {i} of {n}");
                c.tick(dt);
            }
            assert!(c.is_finished(), "not finished after {n} ticks");
            assert_eq!(c.position(), p(0.0, 0.0001));
        }
    }

    #[test]
    fn interpolates_within_segment() {
        let (route, durations) = two_point();
        let mut c = PlaybackCursor::new(route.points(), &durations);
        assert_eq!(c.position(), p(0.0, 0.0));
        c.tick(durations[0] / 2.0);
        let pos = c.position();
        assert_abs_diff_eq!(pos.longitude, 0.00005, epsilon = 1e-12);
        assert_eq!(pos.latitude, 0.0);
        assert_abs_diff_eq!(c.progress(), 0.5, epsilon = 1e-9);
    }

    #[test]
    fn large_tick_crosses_several_segments() {
        let route = [p(0.0, 0.0), p(0.0, 1.0), p(0.0, 2.0), p(0.0, 3.0)];
        let durations = [1.0, 2.0, 3.0];
        let mut c = PlaybackCursor::new(&route, &durations);
        assert_eq!(c.total_duration(), 6.0);
        c.tick(3.5);
        assert_eq!(c.segment_index(), 2);
        assert_abs_diff_eq!(c.elapsed_in_segment(), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(c.elapsed_total(), 3.5, epsilon = 1e-12);
        assert_abs_diff_eq!(c.position().longitude, 2.0 + 0.5 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn pause_freezes_elapsed() {
        let route = [p(0.0, 0.0), p(0.0, 1.0)];
        let durations = [10.0];
        let mut c = PlaybackCursor::new(&route, &durations);
        c.tick(2.0);
        c.pause();
        c.tick(5.0);
        assert!(c.is_paused());
        assert_eq!(c.elapsed_in_segment(), 2.0);
        c.toggle_pause();
        c.tick(1.0);
        assert_eq!(c.elapsed_in_segment(), 3.0);
    }

    #[test]
    fn ignores_invalid_dt_and_stays_terminal() {
        let route = [p(0.0, 0.0), p(0.0, 1.0)];
        let durations = [1.0];
        let mut c = PlaybackCursor::new(&route, &durations);
        c.tick(-1.0);
        c.tick(f64::NAN);
        assert_eq!(c.elapsed_total(), 0.0);
        c.tick(5.0);
        c.tick(5.0);
        assert!(c.is_finished());
        assert_eq!(c.segment_index(), 1);
        assert_eq!(c.progress(), 1.0);
    }
}
