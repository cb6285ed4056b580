//! Coordinate extraction from KML route markup.
//!
//! # Recognised encodings
//! - `<gx:coord>lon lat [alt]</gx:coord>`: one point per element, whitespace
//!   separated. Tried first.
//! - `<coordinates>lon,lat[,alt] lon,lat[,alt] …</coordinates>`: many comma
//!   tokens per block, separated by whitespace. Used only when the first
//!   encoding produced nothing.
//!
//! Both encodings put longitude first; points are stored latitude first.
//! Malformed or out-of-range tokens are skipped and counted, never fatal.

use crate::{
    error::{Result, RouteError},
    types::GeoCoordinate,
};
use regex::Regex;
use std::sync::OnceLock;

/// Which markup encoding the coordinates came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CoordinateEncoding {
    GxCoord,
    Coordinates,
}

/// Output of a successful extraction.
#[derive(Clone, Debug, PartialEq)]
pub struct Extraction {
    /// Points in document order, duplicates preserved
    pub coordinates: Vec<GeoCoordinate>,
    /// Tokens that looked like coordinates but could not be used
    pub skipped: usize,
    pub encoding: CoordinateEncoding,
}

fn gx_coord_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<gx:coord>(.*?)</gx:coord>").expect("valid regex"))
}

fn coordinates_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<coordinates>(.*?)</coordinates>").expect("valid regex"))
}

/// Extract an ordered coordinate list from route markup.
///
/// Fails with [`RouteError::EmptyRoute`] when neither encoding yields a
/// usable point.
pub fn extract_coordinates(text: &str) -> Result<Extraction> {
    let mut skipped = 0;

    let mut coordinates = Vec::new();
    for cap in gx_coord_re().captures_iter(text) {
        let parts: Vec<&str> = cap[1].split_whitespace().collect();
        match parse_lon_lat(&parts) {
            Some(c) => coordinates.push(c),
            None => skipped += 1,
        }
    }
    if !coordinates.is_empty() {
        return Ok(finish(coordinates, skipped, CoordinateEncoding::GxCoord));
    }

    for cap in coordinates_re().captures_iter(text) {
        for token in cap[1].split_whitespace() {
            let parts: Vec<&str> = token.split(',').collect();
            match parse_lon_lat(&parts) {
                Some(c) => coordinates.push(c),
                None => skipped += 1,
            }
        }
    }
    if coordinates.is_empty() {
        tracing::debug!(skipped, "no usable coordinates in markup");
        return Err(RouteError::EmptyRoute);
    }
    Ok(finish(coordinates, skipped, CoordinateEncoding::Coordinates))
}

fn finish(coordinates: Vec<GeoCoordinate>, skipped: usize, encoding: CoordinateEncoding) -> Extraction {
    tracing::debug!(
        count = coordinates.len(),
        skipped,
        ?encoding,
        "extracted route coordinates"
    );
    Extraction {
        coordinates,
        skipped,
        encoding,
    }
}

/// `[lon, lat, (alt)…]` → latitude-first coordinate. Altitude is ignored.
fn parse_lon_lat(parts: &[&str]) -> Option<GeoCoordinate> {
    if parts.len() < 2 {
        return None;
    }
    let lon: f64 = parts[0].trim().parse().ok()?;
    let lat: f64 = parts[1].trim().parse().ok()?;
    GeoCoordinate::new(lat, lon).ok()
}
