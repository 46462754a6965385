//! Mapping of Overpass JSON `elements` into [`RawResult`] records.
//!
//! Works on `serde_json::Value` rather than typed structs: Overpass elements
//! are loosely shaped (nodes carry `lat`/`lon`, ways and relations carry a
//! `center` object) and a single bad element must never fail the whole
//! response.

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;
use sk8map_core::{Coordinate, RawResult};

/// Parse the `elements` array of an Overpass response.
///
/// A missing or non-array `elements` field yields an empty list. Elements
/// without an integer `id` or without a usable coordinate are dropped.
/// Duplicate ids collapse to the last occurrence, kept at the position where
/// the id was first seen.
#[must_use]
pub fn parse_elements(payload: &Value) -> Vec<RawResult> {
    let Some(elements) = payload.get("elements").and_then(Value::as_array) else {
        tracing::debug!("overpass response has no elements array");
        return Vec::new();
    };

    dedupe_last_wins(elements.iter().filter_map(map_element))
}

fn map_element(element: &Value) -> Option<RawResult> {
    let Some(id) = element.get("id").and_then(Value::as_i64) else {
        tracing::debug!(%element, "dropping element without integer id");
        return None;
    };

    let Some(coordinate) = resolve_coordinate(element) else {
        tracing::debug!(id, "dropping element without coordinates");
        return None;
    };

    let tags = element.get("tags").and_then(Value::as_object);
    let name = tags
        .and_then(|t| t.get("name"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let attributes: BTreeMap<String, String> = tags
        .into_iter()
        .flatten()
        .filter_map(|(key, value)| value.as_str().map(|v| (key.clone(), v.to_string())))
        .collect();

    Some(RawResult {
        id,
        name,
        coordinate,
        attributes,
    })
}

/// Direct `lat`/`lon` first, then the `center` object Overpass attaches to
/// ways and relations for `out center`.
fn resolve_coordinate(element: &Value) -> Option<Coordinate> {
    lat_lon(element).or_else(|| element.get("center").and_then(lat_lon))
}

fn lat_lon(value: &Value) -> Option<Coordinate> {
    let lat = value.get("lat").and_then(Value::as_f64)?;
    let lon = value.get("lon").and_then(Value::as_f64)?;
    Some(Coordinate::new(lat, lon))
}

fn dedupe_last_wins<I>(results: I) -> Vec<RawResult>
where
    I: IntoIterator<Item = RawResult>,
{
    let mut slots: HashMap<i64, usize> = HashMap::new();
    let mut unique: Vec<RawResult> = Vec::new();

    for result in results {
        if let Some(&slot) = slots.get(&result.id) {
            unique[slot] = result;
        } else {
            slots.insert(result.id, unique.len());
            unique.push(result);
        }
    }

    unique
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
