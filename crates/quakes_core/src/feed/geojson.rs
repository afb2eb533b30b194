//! USGS GeoJSON feature collection decoding.

use super::{FeedBatch, FeedResult};
use crate::model::quake::{Quake, QuakeId, QuakeLocation};
use chrono::{TimeZone, Utc};
use log::debug;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    properties: Properties,
    geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
struct Properties {
    mag: Option<f64>,
    place: Option<String>,
    /// Epoch milliseconds.
    time: Option<i64>,
    code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    /// `[longitude, latitude, depth]`.
    coordinates: Vec<f64>,
}

/// Decodes a feature collection, skipping incomplete or invalid features.
///
/// # Errors
/// - Returns `FeedError::Decode` when the document is not a feature collection.
pub fn decode_feature_collection(text: &str) -> FeedResult<FeedBatch> {
    let collection: FeatureCollection = serde_json::from_str(text)?;
    let mut batch = FeedBatch::default();

    for feature in collection.features {
        match feature_to_quake(feature) {
            Some(quake) => batch.quakes.push(quake),
            None => batch.skipped += 1,
        }
    }

    if batch.skipped > 0 {
        debug!(
            "event=feed_decode module=feed status=partial decoded={} skipped={}",
            batch.quakes.len(),
            batch.skipped
        );
    }

    Ok(batch)
}

fn feature_to_quake(feature: Feature) -> Option<Quake> {
    let Properties {
        mag,
        place,
        time,
        code,
    } = feature.properties;
    let coordinates = feature.geometry?.coordinates;
    let (longitude, latitude) = match coordinates.as_slice() {
        [longitude, latitude, ..] => (*longitude, *latitude),
        _ => return None,
    };

    let quake = Quake::new(
        QuakeId::new(code?),
        mag?,
        Utc.timestamp_millis_opt(time?).single()?,
        QuakeLocation::new(place?, longitude, latitude),
    );
    quake.validate().ok()?;
    Some(quake)
}
