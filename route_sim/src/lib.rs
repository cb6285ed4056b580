//! `route_sim` — Scene generation and playback: hazard placement, scene
//! building, artifact I/O, offline validation, tick-driven playback.

pub mod hazards;
pub mod playback;
pub mod replay;
pub mod scenario;
pub mod validate;

pub use hazards::HazardPlacer;
pub use playback::{Playback, PlaybackConfig, PlaybackFrame, PlaybackSummary, WarningEvent};
pub use replay::{load_scene, save_scene};
pub use scenario::{build_scene, generate_from_markup, GeneratedScene, SceneConfig};
pub use validate::{validate_dataset, ValidationReport};
