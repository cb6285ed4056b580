//! `route_core` — Geometry behind the route simulation.
//!
//! # Module layout
//! - [`types`]     — `GeoCoordinate`, `Route`
//! - [`error`]     — `RouteError` and the crate `Result`
//! - [`extract`]   — KML coordinate extraction (`gx:coord` / `coordinates`)
//! - [`geodesy`]   — Haversine distance, path length, lat/lon interpolation
//! - [`resample`]  — Subdivide a route to a maximum point spacing
//! - [`timing`]    — Constant-speed per-segment durations
//! - [`proximity`] — Nearest-hazard warning rule (offline and online)
//! - [`cursor`]    — Time-driven playback position
//! - [`scene`]     — `Scene` and its portable `SceneDataset` export

pub mod cursor;
pub mod error;
pub mod extract;
pub mod geodesy;
pub mod proximity;
pub mod resample;
pub mod scene;
pub mod timing;
pub mod types;

pub use cursor::PlaybackCursor;
pub use error::{Result, RouteError};
pub use extract::{extract_coordinates, CoordinateEncoding, Extraction};
pub use geodesy::{haversine_m, path_length_m, EARTH_RADIUS_M};
pub use proximity::{Proximity, ProximityRule};
pub use resample::resample;
pub use scene::{Scene, SceneDataset};
pub use timing::segment_durations;
pub use types::{GeoCoordinate, Route};
