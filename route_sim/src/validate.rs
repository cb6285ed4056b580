//! Offline validation of a generated dataset.
//!
//! Two passes, both deciding warnings through [`route_core::ProximityRule`]:
//! - every route point, for warning coverage
//! - a headless [`Playback`] run at a fixed tick; a hazard that never comes
//!   back as the warned nearest hazard is unreachable at that tick

use crate::playback::{Playback, PlaybackConfig};
use anyhow::Result;
use route_core::{Proximity, SceneDataset};
use serde::{Deserialize, Serialize};

/// Tick used for the playback pass (s); one 60 Hz frame.
pub const DEFAULT_SWEEP_TICK_S: f64 = 1.0 / 60.0;

/// Outcome of [`validate_dataset`].
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub route_points: usize,
    pub hazards: usize,
    /// Route points at which the warning is active
    pub warning_points: usize,
    /// Hazards never warned about during the playback pass
    pub unreachable_hazards: Vec<usize>,
    /// Hazards not lying on any route point
    pub off_route_hazards: Vec<usize>,
    /// Smallest distance between two distinct hazards (m)
    pub min_hazard_separation_m: Option<f64>,
    pub total_length_m: f64,
    pub total_duration_s: f64,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.unreachable_hazards.is_empty() && self.off_route_hazards.is_empty()
    }

    /// Share of route points under warning, in [0, 1].
    pub fn warning_fraction(&self) -> f64 {
        if self.route_points == 0 {
            0.0
        } else {
            self.warning_points as f64 / self.route_points as f64
        }
    }
}

/// Evaluate the proximity rule at every route point of `dataset`, then play
/// it through at `tick_s` and record which hazards ever raise a warning.
pub fn validate_dataset(dataset: &SceneDataset, tick_s: f64) -> Result<ValidationReport> {
    let rule = dataset.proximity_rule();
    let hazards = &dataset.hazards;

    let sweep: Vec<Option<Proximity>> = dataset
        .route
        .iter()
        .map(|pos| rule.evaluate(*pos, hazards))
        .collect();
    let warning_points = sweep.iter().flatten().filter(|p| p.is_warning).count();

    let played = Playback::new(dataset).run_to_end(&PlaybackConfig { tick_s, rate: 1.0 })?;
    let unreachable_hazards: Vec<usize> = (0..hazards.len())
        .filter(|i| played.hazards_warned.binary_search(i).is_err())
        .collect();
    let off_route_hazards: Vec<usize> = hazards
        .iter()
        .enumerate()
        .filter(|(_, h)| !dataset.route.contains(*h))
        .map(|(i, _)| i)
        .collect();

    let min_hazard_separation_m = hazards
        .iter()
        .enumerate()
        .flat_map(|(i, a)| hazards[i + 1..].iter().map(move |b| a.distance_to(b)))
        .min_by(f64::total_cmp);

    let report = ValidationReport {
        route_points: dataset.route.len(),
        hazards: hazards.len(),
        warning_points,
        unreachable_hazards,
        off_route_hazards,
        min_hazard_separation_m,
        total_length_m: dataset.total_length_m(),
        total_duration_s: dataset.total_duration_s(),
    };
    if !report.is_ok() {
        tracing::warn!(
            unreachable = ?report.unreachable_hazards,
            off_route = ?report.off_route_hazards,
            "dataset failed validation"
        );
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::{build_scene, SceneConfig};
    use route_core::{GeoCoordinate, Route};

    fn straight_route(n: usize) -> Route {
        Route::new(
            (0..n)
                .map(|i| GeoCoordinate::from_degrees(18.5, 73.9 + i as f64 * 0.001))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn generated_scene_validates() {
        let config = SceneConfig {
            seed: Some(3),
            hazard_count: 8,
            ..Default::default()
        };
        let scene = build_scene(&straight_route(10), &config).unwrap();
        let report = validate_dataset(&scene.dataset(), DEFAULT_SWEEP_TICK_S).unwrap();
        assert!(report.is_ok(), "{report:?}");
        assert_eq!(report.hazards, 8);
        assert_eq!(report.route_points, scene.route().len());
        assert!(report.warning_points >= 8);
        assert!(report.min_hazard_separation_m.unwrap() > 0.0);
        assert!(report.warning_fraction() > 0.0 && report.warning_fraction() <= 1.0);
    }

    #[test]
    fn off_route_hazard_is_flagged() {
        let route = straight_route(3);
        let mut ds = SceneDataset {
            route: route.points().to_vec(),
            hazards: vec![route.points()[1], GeoCoordinate::from_degrees(18.6, 73.9)],
            segment_durations: vec![18.0, 18.0],
            warning_distance: 80.0,
        };
        let report = validate_dataset(&ds, DEFAULT_SWEEP_TICK_S).unwrap();
        assert_eq!(report.off_route_hazards, vec![1]);
        // ~11 km off the road, never within 80 m
        assert_eq!(report.unreachable_hazards, vec![1]);
        assert!(!report.is_ok());

        ds.hazards.truncate(1);
        assert!(validate_dataset(&ds, DEFAULT_SWEEP_TICK_S).unwrap().is_ok());
    }

    #[test]
    fn zero_warning_distance_warns_only_on_hazard() {
        let route = straight_route(3);
        let ds = SceneDataset {
            route: route.points().to_vec(),
            hazards: vec![route.points()[2]],
            segment_durations: vec![18.0, 18.0],
            warning_distance: 0.0,
        };
        let report = validate_dataset(&ds, DEFAULT_SWEEP_TICK_S).unwrap();
        // the run ends pinned to the last point, exactly on the hazard
        assert!(report.is_ok());
        assert_eq!(report.warning_points, 1);
        assert_eq!(report.min_hazard_separation_m, None);
    }

    #[test]
    fn hazard_skipped_by_playback_ticks_is_unreachable() {
        let route = straight_route(21);
        let mut ds = SceneDataset {
            route: route.points().to_vec(),
            hazards: vec![route.points()[10]],
            segment_durations: vec![1.0; 20],
            warning_distance: 0.0,
        };
        // 0.7 s ticks over 1 s segments land on every 7th point, never on 10
        let report = validate_dataset(&ds, 0.7).unwrap();
        assert_eq!(report.warning_points, 1);
        assert_eq!(report.unreachable_hazards, vec![0]);
        assert!(!report.is_ok());

        ds.warning_distance = 80.0;
        assert!(validate_dataset(&ds, 0.7).unwrap().is_ok());
    }

    #[test]
    fn tick_too_short_is_an_error() {
        let route = straight_route(3);
        let ds = SceneDataset {
            route: route.points().to_vec(),
            hazards: vec![route.points()[1]],
            segment_durations: vec![18.0, 18.0],
            warning_distance: 80.0,
        };
        assert!(validate_dataset(&ds, 1e-17).is_err());
    }
}
