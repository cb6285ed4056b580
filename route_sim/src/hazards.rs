//! Hazard placement: pick distinct route indices as synthetic hazard sites.
//!
//! # Policy
//! - count  = max(1, min(requested, L / 4))
//! - window = [5, max(6, L − 6)), so hazards stay clear of both route ends
//! - draw   = `count` distinct indices, uniform over the window, sorted
//!
//! Routes shorter than the margins get the window clamped to the interior
//! `[1, L − 1)` and the count clamped to the window size, so a hazard never
//! sits on the first or last point. A two-point route has no interior and
//! gets no hazards. Every draw comes from a seeded `ChaCha8Rng`, so a seed
//! fully determines the result.

use rand::{seq::index, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::ops::Range;

/// Default number of hazards requested per scene.
pub const DEFAULT_HAZARD_COUNT: usize = 10;

/// Indices excluded at the start of the route.
const HEAD_MARGIN: usize = 5;
/// Indices excluded at the end of the route.
const TAIL_MARGIN: usize = 6;

/// Number of hazards actually placed for a route of `route_len` points.
pub fn effective_count(route_len: usize, requested: usize) -> usize {
    requested.min(route_len / 4).max(1)
}

/// Candidate index window for a route of `route_len` points.
pub fn candidate_window(route_len: usize) -> Range<usize> {
    let end = route_len
        .saturating_sub(TAIL_MARGIN)
        .max(HEAD_MARGIN + 1)
        .min(route_len.saturating_sub(1));
    if end <= 1 {
        return 0..0;
    }
    HEAD_MARGIN.min(end - 1)..end
}

/// Seeded hazard sampler.
pub struct HazardPlacer {
    seed: u64,
    rng: ChaCha8Rng,
}

impl HazardPlacer {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Seed drawn from system entropy. Read it back with [`Self::seed`] to
    /// reproduce the run.
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Draw hazard indices for a route of `route_len` points, ascending.
    pub fn place(&mut self, route_len: usize, requested: usize) -> Vec<usize> {
        let window = candidate_window(route_len);
        if window.is_empty() {
            return Vec::new();
        }
        let wanted = effective_count(route_len, requested);
        let count = wanted.min(window.len());
        if count < wanted {
            tracing::debug!(wanted, count, route_len, "hazard count clamped to window");
        }

        let mut picked: Vec<usize> = index::sample(&mut self.rng, window.len(), count)
            .into_iter()
            .map(|i| window.start + i)
            .collect();
        picked.sort_unstable();
        picked
    }
}
