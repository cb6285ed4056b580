//! Fundamental types used across the entire workspace.

use crate::error::{Result, RouteError};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// GeoCoordinate
// ---------------------------------------------------------------------------

/// A point on the Earth's surface, in decimal degrees.
///
/// Serialized as a `[latitude, longitude]` pair, which is the order every
/// consumer of the exported dataset expects.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct GeoCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoCoordinate {
    /// Checked constructor: rejects non-finite values and values outside
    /// latitude ∈ [-90, 90], longitude ∈ [-180, 180].
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        let lat_ok = latitude.is_finite() && (-90.0..=90.0).contains(&latitude);
        let lon_ok = longitude.is_finite() && (-180.0..=180.0).contains(&longitude);
        if lat_ok && lon_ok {
            Ok(Self {
                latitude,
                longitude,
            })
        } else {
            Err(RouteError::CoordinateOutOfRange {
                latitude,
                longitude,
            })
        }
    }

    /// Unchecked constructor, for values derived from already valid points.
    pub const fn from_degrees(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// True if both axes lie within their valid ranges.
    pub fn is_valid(&self) -> bool {
        Self::new(self.latitude, self.longitude).is_ok()
    }
}

impl From<[f64; 2]> for GeoCoordinate {
    fn from([latitude, longitude]: [f64; 2]) -> Self {
        Self::from_degrees(latitude, longitude)
    }
}

impl From<GeoCoordinate> for [f64; 2] {
    fn from(c: GeoCoordinate) -> Self {
        [c.latitude, c.longitude]
    }
}

impl fmt::Display for GeoCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

// ---------------------------------------------------------------------------
// Route
// ---------------------------------------------------------------------------

/// Ordered polyline from origin to destination. Always at least two points.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<GeoCoordinate>", into = "Vec<GeoCoordinate>")]
pub struct Route {
    points: Vec<GeoCoordinate>,
}

impl Route {
    pub fn new(points: Vec<GeoCoordinate>) -> Result<Self> {
        if points.len() < 2 {
            return Err(RouteError::RouteTooShort {
                found: points.len(),
            });
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[GeoCoordinate] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false for a constructed route.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of segments (consecutive point pairs).
    pub fn segment_count(&self) -> usize {
        self.points.len() - 1
    }

    pub fn first(&self) -> GeoCoordinate {
        self.points[0]
    }

    pub fn last(&self) -> GeoCoordinate {
        self.points[self.points.len() - 1]
    }

    /// Iterate over `(route[i], route[i + 1])` pairs.
    pub fn segments(&self) -> impl Iterator<Item = (GeoCoordinate, GeoCoordinate)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }
}

impl TryFrom<Vec<GeoCoordinate>> for Route {
    type Error = RouteError;

    fn try_from(points: Vec<GeoCoordinate>) -> Result<Self> {
        Route::new(points)
    }
}

impl From<Route> for Vec<GeoCoordinate> {
    fn from(route: Route) -> Self {
        route.points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checked_constructor_rejects_out_of_range() {
        assert!(GeoCoordinate::new(18.5, 73.9).is_ok());
        assert!(GeoCoordinate::new(90.0, -180.0).is_ok());
        assert_eq!(
            GeoCoordinate::new(91.0, 0.0),
            Err(RouteError::CoordinateOutOfRange {
                latitude: 91.0,
                longitude: 0.0
            })
        );
        assert!(GeoCoordinate::new(0.0, 180.5).is_err());
        assert!(GeoCoordinate::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn coordinate_serializes_as_lat_lon_pair() {
        let c = GeoCoordinate::from_degrees(18.52, 73.85);
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, "[18.52,73.85]");
        let back: GeoCoordinate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn route_requires_two_points() {
        let p = GeoCoordinate::from_degrees(0.0, 0.0);
        assert_eq!(
            Route::new(vec![p]),
            Err(RouteError::RouteTooShort { found: 1 })
        );
        let route = Route::new(vec![p, p]).unwrap();
        assert_eq!(route.segment_count(), 1);
        assert_eq!(route.segments().count(), 1);
    }

    #[test]
    fn route_deserialization_enforces_length() {
        let err = serde_json::from_str::<Route>("[[1.0, 2.0]]");
        assert!(err.is_err());
        let ok: Route = serde_json::from_str("[[1.0, 2.0], [1.5, 2.5]]").unwrap();
        assert_eq!(ok.last(), GeoCoordinate::from_degrees(1.5, 2.5));
    }
}
