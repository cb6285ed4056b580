//! Scene generation: markup → extracted waypoints → resampled route →
//! durations + hazards → [`Scene`].
//!
//! All scenes are deterministic given the same markup, config and seed.

use crate::hazards::{HazardPlacer, DEFAULT_HAZARD_COUNT};
use route_core::{
    extract::{extract_coordinates, CoordinateEncoding},
    proximity::DEFAULT_WARNING_DISTANCE_M,
    resample::{resample, DEFAULT_MAX_SEGMENT_M},
    timing::{segment_durations, DEFAULT_SPEED_MPS},
    types::Route,
    Result, Scene,
};
use serde::{Deserialize, Serialize};

/// Parameters of one generation run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Maximum spacing between resampled points (m)
    pub max_segment_m: f64,
    /// Constant vehicle speed (m/s)
    pub speed_mps: f64,
    /// Warning radius around each hazard (m)
    pub warning_distance_m: f64,
    /// Requested hazard count (clamped by route length)
    pub hazard_count: usize,
    /// Hazard RNG seed; `None` draws one from system entropy
    pub seed: Option<u64>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            max_segment_m: DEFAULT_MAX_SEGMENT_M,
            speed_mps: DEFAULT_SPEED_MPS,
            warning_distance_m: DEFAULT_WARNING_DISTANCE_M,
            hazard_count: DEFAULT_HAZARD_COUNT,
            seed: None,
        }
    }
}

/// Scene plus what the extraction step observed, for reporting.
#[derive(Clone, Debug)]
pub struct GeneratedScene {
    pub scene: Scene,
    /// Waypoints recovered from the markup
    pub waypoint_count: usize,
    /// Malformed tokens skipped during extraction
    pub skipped_tokens: usize,
    pub encoding: CoordinateEncoding,
}

/// Run the full generation pipeline on raw route markup.
pub fn generate_from_markup(markup: &str, config: &SceneConfig) -> Result<GeneratedScene> {
    let extraction = extract_coordinates(markup)?;
    if extraction.skipped > 0 {
        tracing::warn!(
            skipped = extraction.skipped,
            "skipped malformed coordinate tokens"
        );
    }
    let waypoint_count = extraction.coordinates.len();
    let route = Route::new(extraction.coordinates)?;
    let scene = build_scene(&route, config)?;
    Ok(GeneratedScene {
        scene,
        waypoint_count,
        skipped_tokens: extraction.skipped,
        encoding: extraction.encoding,
    })
}

/// Resample `raw`, time it and place hazards.
pub fn build_scene(raw: &Route, config: &SceneConfig) -> Result<Scene> {
    let route = resample(raw, config.max_segment_m)?;
    let durations = segment_durations(&route, config.speed_mps)?;

    let mut placer = match config.seed {
        Some(seed) => HazardPlacer::new(seed),
        None => {
            let placer = HazardPlacer::from_entropy();
            tracing::info!(seed = placer.seed(), "no seed given, drew one from entropy");
            placer
        }
    };
    let hazard_indices = placer.place(route.len(), config.hazard_count);

    tracing::info!(
        waypoints = raw.len(),
        points = route.len(),
        hazards = hazard_indices.len(),
        seed = placer.seed(),
        "scene built"
    );

    Scene::new(
        route,
        hazard_indices,
        durations,
        config.warning_distance_m,
        config.speed_mps,
        placer.seed(),
    )
}
