//! Proximity warning rule: nearest hazard and whether it is within range.
//!
//! This is the only implementation of the rule. Offline validation and the
//! playback loop both call [`ProximityRule::evaluate`], so they cannot drift.
//!
//! # Rule
//! nearest = argmin_i haversine(position, hazard[i])   (first index on ties)
//! warning = distance(nearest) ≤ warning_distance_m
//!
//! There is no hysteresis: the warning flips exactly at the threshold.

use crate::types::GeoCoordinate;
use serde::{Deserialize, Serialize};

/// Default warning radius (meters).
pub const DEFAULT_WARNING_DISTANCE_M: f64 = 80.0;

/// Result of evaluating one position against the hazard set.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Proximity {
    /// Index into the hazard slice passed to `evaluate`
    pub nearest_index: usize,
    /// Great-circle distance to that hazard (meters)
    pub distance_m: f64,
    pub is_warning: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProximityRule {
    pub warning_distance_m: f64,
}

impl Default for ProximityRule {
    fn default() -> Self {
        Self {
            warning_distance_m: DEFAULT_WARNING_DISTANCE_M,
        }
    }
}

impl ProximityRule {
    pub fn new(warning_distance_m: f64) -> Self {
        Self { warning_distance_m }
    }

    /// Evaluate `position` against `hazards`. `None` when there are no hazards.
    pub fn evaluate(&self, position: GeoCoordinate, hazards: &[GeoCoordinate]) -> Option<Proximity> {
        let (nearest_index, distance_m) = nearest_hazard(position, hazards)?;
        Some(Proximity {
            nearest_index,
            distance_m,
            is_warning: distance_m <= self.warning_distance_m,
        })
    }
}

/// Linear scan for the closest hazard; strict `<` keeps the first minimum.
pub fn nearest_hazard(position: GeoCoordinate, hazards: &[GeoCoordinate]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (i, h) in hazards.iter().enumerate() {
        let d = position.distance_to(h);
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((i, d)),
        }
    }
    best
}
