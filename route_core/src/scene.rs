//! Scene: the immutable product of one generation run, and its portable
//! dataset form consumed by any playback runtime.

use crate::{
    cursor::PlaybackCursor,
    error::{Result, RouteError},
    geodesy::path_length_m,
    proximity::ProximityRule,
    timing::total_duration_s,
    types::{GeoCoordinate, Route},
};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Scene
// ---------------------------------------------------------------------------

/// Resampled route, hazard sites, timing and warning configuration.
///
/// Hazards are identified by route index; their coordinates are derived.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Scene {
    route: Route,
    hazard_indices: Vec<usize>,
    segment_durations: Vec<f64>,
    warning_distance_m: f64,
    speed_mps: f64,
    /// Seed the hazard sample was drawn with
    seed: u64,
}

impl Scene {
    /// Assemble a scene, checking every cross-field invariant.
    pub fn new(
        route: Route,
        hazard_indices: Vec<usize>,
        segment_durations: Vec<f64>,
        warning_distance_m: f64,
        speed_mps: f64,
        seed: u64,
    ) -> Result<Self> {
        check_durations(route.len(), &segment_durations)?;
        check_warning_distance(warning_distance_m)?;
        if !(speed_mps.is_finite() && speed_mps > 0.0) {
            return Err(RouteError::InvalidParameter {
                name: "speed_mps",
                value: speed_mps,
            });
        }
        if let Some(&bad) = hazard_indices.iter().find(|&&i| i >= route.len()) {
            return Err(RouteError::InvalidScene(format!(
                "hazard index {bad} outside route of {} points",
                route.len()
            )));
        }
        if hazard_indices.windows(2).any(|w| w[0] >= w[1]) {
            return Err(RouteError::InvalidScene(
                "hazard indices must be distinct and ascending".into(),
            ));
        }
        Ok(Self {
            route,
            hazard_indices,
            segment_durations,
            warning_distance_m,
            speed_mps,
            seed,
        })
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn hazard_indices(&self) -> &[usize] {
        &self.hazard_indices
    }

    /// Hazard coordinates, in hazard-index order.
    pub fn hazards(&self) -> Vec<GeoCoordinate> {
        self.hazard_indices
            .iter()
            .map(|&i| self.route.points()[i])
            .collect()
    }

    pub fn segment_durations(&self) -> &[f64] {
        &self.segment_durations
    }

    pub fn warning_distance_m(&self) -> f64 {
        self.warning_distance_m
    }

    pub fn speed_mps(&self) -> f64 {
        self.speed_mps
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn total_length_m(&self) -> f64 {
        path_length_m(self.route.points())
    }

    pub fn total_duration_s(&self) -> f64 {
        total_duration_s(&self.segment_durations)
    }

    /// The four-field export consumed by playback runtimes.
    pub fn dataset(&self) -> SceneDataset {
        SceneDataset {
            route: self.route.points().to_vec(),
            hazards: self.hazards(),
            segment_durations: self.segment_durations.clone(),
            warning_distance: self.warning_distance_m,
        }
    }
}

// ---------------------------------------------------------------------------
// SceneDataset
// ---------------------------------------------------------------------------

/// Portable scene export. These four fields are the whole contract between
/// generation and any renderer or playback loop.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneDataset {
    /// `[latitude, longitude]` pairs
    pub route: Vec<GeoCoordinate>,
    pub hazards: Vec<GeoCoordinate>,
    /// Seconds per segment; `route.len() - 1` entries
    pub segment_durations: Vec<f64>,
    /// Meters
    pub warning_distance: f64,
}

impl SceneDataset {
    /// Check the invariants a loaded dataset must satisfy before playback.
    pub fn validate(&self) -> Result<()> {
        if self.route.len() < 2 {
            return Err(RouteError::RouteTooShort {
                found: self.route.len(),
            });
        }
        if let Some(bad) = self.route.iter().chain(&self.hazards).find(|c| !c.is_valid()) {
            return Err(RouteError::CoordinateOutOfRange {
                latitude: bad.latitude,
                longitude: bad.longitude,
            });
        }
        check_durations(self.route.len(), &self.segment_durations)?;
        check_warning_distance(self.warning_distance)
    }

    pub fn proximity_rule(&self) -> ProximityRule {
        ProximityRule::new(self.warning_distance)
    }

    /// Fresh cursor at the start of the route.
    pub fn cursor(&self) -> PlaybackCursor<'_> {
        PlaybackCursor::new(&self.route, &self.segment_durations)
    }

    pub fn total_length_m(&self) -> f64 {
        path_length_m(&self.route)
    }

    pub fn total_duration_s(&self) -> f64 {
        total_duration_s(&self.segment_durations)
    }
}

fn check_durations(route_len: usize, durations: &[f64]) -> Result<()> {
    if durations.len() + 1 != route_len {
        return Err(RouteError::InvalidScene(format!(
            "{} segment durations for {route_len} route points",
            durations.len()
        )));
    }
    if let Some(bad) = durations.iter().find(|d| !(d.is_finite() && **d > 0.0)) {
        return Err(RouteError::InvalidScene(format!(
            "segment duration must be positive, got {bad}"
        )));
    }
    Ok(())
}

fn check_warning_distance(d: f64) -> Result<()> {
    if d.is_finite() && d >= 0.0 {
        Ok(())
    } else {
        Err(RouteError::InvalidParameter {
            name: "warning_distance_m",
            value: d,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::segment_durations;

    fn p(lat: f64, lon: f64) -> GeoCoordinate {
        GeoCoordinate::from_degrees(lat, lon)
    }

    fn route(n: usize) -> Route {
        Route::new((0..n).map(|i| p(0.0, i as f64 * 0.00005)).collect()).unwrap()
    }

    #[test]
    fn builds_valid_scene() {
        let r = route(20);
        let d = segment_durations(&r, 6.0).unwrap();
        let scene = Scene::new(r.clone(), vec![5, 9, 13], d, 80.0, 6.0, 42).unwrap();
        assert_eq!(scene.hazards(), vec![r.points()[5], r.points()[9], r.points()[13]]);
        assert_eq!(scene.segment_durations().len(), 19);
    }

    #[test]
    fn rejects_broken_invariants() {
        let r = route(10);
        let d = segment_durations(&r, 6.0).unwrap();

        let short = d[..8].to_vec();
        assert!(Scene::new(r.clone(), vec![], short, 80.0, 6.0, 0).is_err());

        let mut zero = d.clone();
        zero[3] = 0.0;
        assert!(Scene::new(r.clone(), vec![], zero, 80.0, 6.0, 0).is_err());

        assert!(Scene::new(r.clone(), vec![10], d.clone(), 80.0, 6.0, 0).is_err());
        assert!(Scene::new(r.clone(), vec![6, 6], d.clone(), 80.0, 6.0, 0).is_err());
        assert!(Scene::new(r.clone(), vec![7, 6], d.clone(), 80.0, 6.0, 0).is_err());
        assert!(Scene::new(r, vec![], d, -1.0, 6.0, 0).is_err());
    }

    #[test]
    fn dataset_uses_camel_case_contract() {
        let r = route(3);
        let d = segment_durations(&r, 6.0).unwrap();
        let scene = Scene::new(r, vec![1], d, 80.0, 6.0, 7).unwrap();
        let json = serde_json::to_value(scene.dataset()).unwrap();
        let obj = json.as_object().unwrap();
        let mut keys: Vec<_> = obj.keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, ["hazards", "route", "segmentDurations", "warningDistance"]);
        assert_eq!(obj["route"][1], serde_json::json!([0.0, 0.00005]));
        assert_eq!(obj["hazards"][0], serde_json::json!([0.0, 0.00005]));
        assert_eq!(obj["warningDistance"], serde_json::json!(80.0));
    }

    #[test]
    fn dataset_validation() {
        let mut ds = SceneDataset {
            route: vec![p(0.0, 0.0), p(0.0, 0.001)],
            hazards: vec![],
            segment_durations: vec![18.5],
            warning_distance: 80.0,
        };
        assert!(ds.validate().is_ok());
        ds.segment_durations.push(1.0);
        assert!(ds.validate().is_err());
        ds.route.truncate(1);
        assert_eq!(ds.validate(), Err(RouteError::RouteTooShort { found: 1 }));
    }

    #[test]
    fn dataset_rejects_out_of_range_coordinates() {
        let mut ds = SceneDataset {
            route: vec![p(0.0, 0.0), p(0.0, 0.001)],
            hazards: vec![p(95.0, 0.0)],
            segment_durations: vec![18.5],
            warning_distance: 80.0,
        };
        assert_eq!(
            ds.validate(),
            Err(RouteError::CoordinateOutOfRange {
                latitude: 95.0,
                longitude: 0.0
            })
        );
        ds.hazards.clear();
        ds.route[1] = p(0.0, 181.0);
        assert!(matches!(ds.validate(), Err(RouteError::CoordinateOutOfRange { .. })));
    }
}
