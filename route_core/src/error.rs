//! Error type shared by every `route_core` operation.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RouteError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteError {
    /// Neither coordinate encoding produced a single usable coordinate.
    #[error("no coordinates found in route markup")]
    EmptyRoute,

    #[error("route needs at least 2 points, found {found}")]
    RouteTooShort { found: usize },

    #[error("coordinate out of range: lat={latitude}, lon={longitude}")]
    CoordinateOutOfRange { latitude: f64, longitude: f64 },

    #[error("invalid parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("invalid scene: {0}")]
    InvalidScene(String),
}
