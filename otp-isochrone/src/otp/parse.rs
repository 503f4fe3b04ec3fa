//! Parsing of OTP isochrone responses.
//!
//! OTP answers with a GeoJSON feature collection whose features carry no
//! interval tag. Feature `i` is taken to belong to `intervals[i]`, so the
//! two lists must have the same length.

use serde::Deserialize;
use serde_json::Value;

use crate::isochrone::{Isochrone, Isochrones, Location};

use super::error::IsochroneError;

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    coordinates: Option<Value>,
}

/// Turn a transport reply into isochrones.
///
/// `None` means the transport had no body to give (a dry run, for
/// instance) and yields an empty result. Anything else must be a feature
/// collection with one feature per interval.
pub fn parse_isochrones(
    response: Option<Value>,
    intervals: &[u32],
    location: Location,
) -> Result<Isochrones, IsochroneError> {
    let Some(raw) = response else {
        return Ok(Isochrones::default());
    };

    if !raw.is_object() {
        return Err(IsochroneError::malformed(
            "expected a JSON object with `features`",
        ));
    }

    let collection = FeatureCollection::deserialize(&raw)
        .map_err(|e| IsochroneError::malformed(e.to_string()))?;

    if collection.features.len() != intervals.len() {
        return Err(IsochroneError::malformed(format!(
            "got {} features for {} intervals",
            collection.features.len(),
            intervals.len()
        )));
    }

    let isochrones = collection
        .features
        .into_iter()
        .zip(intervals)
        .enumerate()
        .map(|(idx, (feature, &interval))| {
            feature
                .geometry
                .and_then(|g| g.coordinates)
                .map(|geometry| Isochrone {
                    geometry,
                    interval,
                    center: location,
                })
                .ok_or_else(|| {
                    IsochroneError::malformed(format!("feature {idx} has no geometry coordinates"))
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Isochrones::new(isochrones, raw))
}
