//! Provider-agnostic isochrone value types.
//!
//! These are plain immutable records. Geometry is kept exactly as the
//! backend returned it; no reprojection or ring validation happens here.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// A point on the map, in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    /// Create a location from latitude and longitude.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Whether both coordinates are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }
}

impl From<(f64, f64)> for Location {
    /// Interprets the tuple as `(lat, lon)`.
    fn from((lat, lon): (f64, f64)) -> Self {
        Self::new(lat, lon)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}

/// A single isochrone ring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Isochrone {
    /// Raw coordinate structure (polygon or multipolygon) from the backend.
    pub geometry: Value,

    /// Travel time in seconds this ring corresponds to.
    pub interval: u32,

    /// The location the isochrone was requested for.
    pub center: Location,
}

/// An ordered collection of isochrones plus the raw backend payload.
///
/// The default value has no records and no payload, and stands for
/// "no result" (a dry run, or a transport that returned no body).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Isochrones {
    isochrones: Vec<Isochrone>,
    raw: Option<Value>,
}

impl Isochrones {
    /// Wrap parsed records together with the response they came from.
    pub fn new(isochrones: Vec<Isochrone>, raw: Value) -> Self {
        Self {
            isochrones,
            raw: Some(raw),
        }
    }

    /// The records, in the same order as the requested intervals.
    pub fn isochrones(&self) -> &[Isochrone] {
        &self.isochrones
    }

    /// The untouched backend response, if there was one.
    pub fn raw(&self) -> Option<&Value> {
        self.raw.as_ref()
    }

    pub fn len(&self) -> usize {
        self.isochrones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.isochrones.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Isochrone> {
        self.isochrones.iter()
    }
}

impl<'a> IntoIterator for &'a Isochrones {
    type Item = &'a Isochrone;
    type IntoIter = std::slice::Iter<'a, Isochrone>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for Isochrones {
    type Item = Isochrone;
    type IntoIter = std::vec::IntoIter<Isochrone>;

    fn into_iter(self) -> Self::IntoIter {
        self.isochrones.into_iter()
    }
}
