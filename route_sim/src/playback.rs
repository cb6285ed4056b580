//! Playback session: advances the cursor tick by tick and evaluates the
//! proximity rule at every new position.
//!
//! The session is the runtime counterpart of [`crate::validate`]: both call
//! [`ProximityRule::evaluate`] and nothing else to decide a warning.

use anyhow::{bail, Result};
use route_core::{GeoCoordinate, PlaybackCursor, Proximity, ProximityRule, SceneDataset};
use serde::{Deserialize, Serialize};

/// Slowest and fastest accepted rate multipliers.
pub const MIN_RATE: f64 = 0.125;
pub const MAX_RATE: f64 = 64.0;

/// Shortest wall-clock tick `run_to_end` accepts (s).
pub const MIN_TICK_S: f64 = 1e-6;
/// Tick budget for one `run_to_end` call.
pub const MAX_TICKS: u64 = 100_000_000;

/// Current playback mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayMode {
    #[default]
    Playing,
    Paused,
}

/// Playback parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Wall-clock tick length (s); a display refresh at 60 Hz by default
    pub tick_s: f64,
    /// Simulation seconds per wall-clock second
    pub rate: f64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            tick_s: 1.0 / 60.0,
            rate: 1.0,
        }
    }
}

/// Warning state changes, emitted on the tick they happen.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum WarningEvent {
    /// Warning switched on, or moved to a different nearest hazard
    Raised {
        time: f64,
        hazard: usize,
        distance_m: f64,
    },
    Cleared {
        time: f64,
    },
}

/// Everything a renderer needs after one tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlaybackFrame {
    /// Simulation time (s)
    pub time: f64,
    pub position: GeoCoordinate,
    pub segment_index: usize,
    pub proximity: Option<Proximity>,
    pub finished: bool,
}

impl PlaybackFrame {
    pub fn is_warning(&self) -> bool {
        self.proximity.is_some_and(|p| p.is_warning)
    }

    /// Hazard to highlight, if a warning is active.
    pub fn highlighted_hazard(&self) -> Option<usize> {
        self.proximity
            .filter(|p| p.is_warning)
            .map(|p| p.nearest_index)
    }
}

/// Totals collected over a full run.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PlaybackSummary {
    pub ticks: u64,
    /// Simulation time at the end of the run (s)
    pub sim_time_s: f64,
    /// Simulation time spent with the warning on (s)
    pub warning_time_s: f64,
    /// Number of times the warning was raised
    pub warnings_raised: usize,
    /// Distinct hazards that triggered a warning, ascending
    pub hazards_warned: Vec<usize>,
    /// Closest approach to any hazard (m)
    pub min_distance_m: Option<f64>,
    pub events: Vec<WarningEvent>,
}

/// One playback run over a dataset.
pub struct Playback<'a> {
    cursor: PlaybackCursor<'a>,
    hazards: &'a [GeoCoordinate],
    rule: ProximityRule,
    rate: f64,
    /// Hazard currently warned about
    active: Option<usize>,
    pending: Vec<WarningEvent>,
}

impl<'a> Playback<'a> {
    pub fn new(dataset: &'a SceneDataset) -> Self {
        Self {
            cursor: dataset.cursor(),
            hazards: &dataset.hazards,
            rule: dataset.proximity_rule(),
            rate: 1.0,
            active: None,
            pending: Vec::new(),
        }
    }

    /// Set the rate multiplier, clamped to [`MIN_RATE`, `MAX_RATE`].
    pub fn set_rate(&mut self, rate: f64) {
        self.rate = if rate.is_finite() {
            rate.clamp(MIN_RATE, MAX_RATE)
        } else {
            1.0
        };
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn mode(&self) -> PlayMode {
        if self.cursor.is_paused() {
            PlayMode::Paused
        } else {
            PlayMode::Playing
        }
    }

    pub fn set_mode(&mut self, mode: PlayMode) {
        match mode {
            PlayMode::Playing => self.cursor.resume(),
            PlayMode::Paused => self.cursor.pause(),
        }
    }

    pub fn toggle_pause(&mut self) {
        self.cursor.toggle_pause();
    }

    pub fn is_finished(&self) -> bool {
        self.cursor.is_finished()
    }

    /// Simulation time since the start of the route (s). Stops advancing
    /// while paused and once the route is complete.
    pub fn sim_time(&self) -> f64 {
        self.cursor.elapsed_total()
    }

    /// Current frame without advancing.
    pub fn frame(&self) -> PlaybackFrame {
        let position = self.cursor.position();
        PlaybackFrame {
            time: self.sim_time(),
            position,
            segment_index: self.cursor.segment_index(),
            proximity: self.rule.evaluate(position, self.hazards),
            finished: self.cursor.is_finished(),
        }
    }

    /// Advance by `wall_dt` seconds of wall-clock time.
    pub fn tick(&mut self, wall_dt: f64) -> PlaybackFrame {
        self.cursor.tick(wall_dt * self.rate);
        let frame = self.frame();
        self.track_warning(&frame);
        frame
    }

    /// Drain warning transitions seen since the last call.
    pub fn take_events(&mut self) -> Vec<WarningEvent> {
        std::mem::take(&mut self.pending)
    }

    /// Tick at `config` until the route is complete.
    ///
    /// Fails on a tick shorter than [`MIN_TICK_S`], or when finishing would
    /// take more than [`MAX_TICKS`] ticks.
    pub fn run_to_end(&mut self, config: &PlaybackConfig) -> Result<PlaybackSummary> {
        let tick_s = config.tick_s;
        if !(tick_s.is_finite() && tick_s >= MIN_TICK_S) {
            bail!("tick must be at least {MIN_TICK_S} s, got {tick_s}");
        }
        self.set_rate(config.rate);
        let remaining = self.cursor.total_duration() - self.sim_time();
        let needed = (remaining / (tick_s * self.rate)).ceil();
        if needed > MAX_TICKS as f64 {
            bail!(
                "{remaining:.1} s of route at {tick_s} s ticks (rate x{}) needs {needed:.0} ticks, limit is {MAX_TICKS}",
                self.rate
            );
        }
        self.set_mode(PlayMode::Playing);
        let mut summary = PlaybackSummary::default();
        let mut warned = std::collections::BTreeSet::new();

        // Evaluate the starting position before the first tick
        let mut prev = self.frame();
        self.track_warning(&prev);
        accumulate_distance(&mut summary, &prev);
        if let Some(h) = prev.highlighted_hazard() {
            warned.insert(h);
        }

        while !prev.finished {
            if summary.ticks >= MAX_TICKS {
                bail!("playback did not finish within {MAX_TICKS} ticks");
            }
            let frame = self.tick(tick_s);
            summary.ticks += 1;
            if prev.is_warning() {
                summary.warning_time_s += frame.time - prev.time;
            }
            accumulate_distance(&mut summary, &frame);
            if let Some(h) = frame.highlighted_hazard() {
                warned.insert(h);
            }
            prev = frame;
        }

        summary.sim_time_s = self.sim_time();
        summary.events = self.take_events();
        summary.warnings_raised = summary
            .events
            .iter()
            .filter(|e| matches!(e, WarningEvent::Raised { .. }))
            .count();
        summary.hazards_warned = warned.into_iter().collect();
        tracing::info!(
            ticks = summary.ticks,
            sim_time_s = summary.sim_time_s,
            warnings = summary.warnings_raised,
            "playback finished"
        );
        Ok(summary)
    }

    fn track_warning(&mut self, frame: &PlaybackFrame) {
        let now = frame.highlighted_hazard();
        if now == self.active {
            return;
        }
        match (now, frame.proximity) {
            (Some(hazard), Some(p)) => {
                tracing::debug!(time = frame.time, hazard, distance_m = p.distance_m, "warning raised");
                self.pending.push(WarningEvent::Raised {
                    time: frame.time,
                    hazard,
                    distance_m: p.distance_m,
                });
            }
            _ => {
                tracing::debug!(time = frame.time, "warning cleared");
                self.pending.push(WarningEvent::Cleared { time: frame.time });
            }
        }
        self.active = now;
    }
}

fn accumulate_distance(summary: &mut PlaybackSummary, frame: &PlaybackFrame) {
    if let Some(p) = frame.proximity {
        summary.min_distance_m = Some(match summary.min_distance_m {
            Some(d) => d.min(p.distance_m),
            None => p.distance_m,
        });
    }
}
