//! Geometry cells: WKT → GeoJSON feature collection.
//!
//! The coordinate bounds are longitude in [-180, 360] and latitude in
//! [-90, 180]. They are looser than WGS84 and kept as they are.

use bus_model::{GeometryProbe, StoreError};
use serde_json::{Value, json};
use tracing::debug;

use crate::wkt::parse_wkt;

const MIN_LONGITUDE: f64 = -180.0;
const MAX_LONGITUDE: f64 = 360.0;
const MIN_LATITUDE: f64 = -90.0;
const MAX_LATITUDE: f64 = 180.0;

/// Recursive shape check over a GeoJSON value.
///
/// A list made only of numbers is a coordinate and must be a 2-D position
/// within bounds. Any other list fails when two consecutive positions are
/// equal, then checks its items.
pub fn shape_check(value: &Value) -> bool {
    match value {
        Value::Object(map) => map.values().all(shape_check),
        Value::Array(items) => {
            if items.iter().all(Value::is_number) {
                return position_in_bounds(items);
            }
            let mut last: Option<&Vec<Value>> = None;
            for item in items {
                let Value::Array(position) = item else {
                    continue;
                };
                if position.len() != 2 {
                    continue;
                }
                if last == Some(position) {
                    return false;
                }
                last = Some(position);
            }
            items.iter().all(shape_check)
        }
        _ => true,
    }
}

fn position_in_bounds(items: &[Value]) -> bool {
    let [longitude, latitude] = items else {
        return false;
    };
    let (Some(longitude), Some(latitude)) = (longitude.as_f64(), latitude.as_f64()) else {
        return false;
    };
    (MIN_LONGITUDE..=MAX_LONGITUDE).contains(&longitude)
        && (MIN_LATITUDE..=MAX_LATITUDE).contains(&latitude)
}

/// Wraps a geometry in a one-feature collection.
pub fn feature_collection(geometry: Value) -> Value {
    json!({
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": {"nodeId": null},
            "geometry": geometry,
        }]
    })
}

/// Converts a WKT cell into a feature collection accepted by the probe.
///
/// Text that does not parse is retried as the body of a `POINT`, so bare
/// `lon lat` pairs are accepted. Returns `None` when the text is not a
/// usable geometry.
pub fn geojson_from_wkt(text: &str, probe: &dyn GeometryProbe) -> Result<Option<Value>, StoreError> {
    let parsed = parse_wkt(text).or_else(|_| parse_wkt(&format!("POINT({text})")));
    let geometry = match parsed {
        Ok(geometry) => geometry,
        Err(err) => {
            debug!(error = %err, "not a WKT geometry");
            return Ok(None);
        }
    };
    if !shape_check(&geometry) {
        return Ok(None);
    }
    let collection = feature_collection(geometry);
    if probe.accepts(&collection)? {
        Ok(Some(collection))
    } else {
        Ok(None)
    }
}

/// Records the owning node id in every feature of a collection.
pub fn stamp_node_id(collection: &mut Value, nodeid: &str) {
    let Some(features) = collection.get_mut("features").and_then(Value::as_array_mut) else {
        return;
    };
    for feature in features {
        if let Some(properties) = feature.get_mut("properties").and_then(Value::as_object_mut) {
            properties.insert("nodeId".to_string(), Value::String(nodeid.to_string()));
        }
    }
}
