//! Derived per-result attributes relative to a reference point.

use sk8map_core::{haversine_miles, Coordinate, EnrichedResult, RawResult};

/// Attach distance and indoor classification to every result.
#[must_use]
pub fn enrich(results: &[RawResult], reference: Coordinate) -> Vec<EnrichedResult> {
    results
        .iter()
        .map(|raw| EnrichedResult {
            distance_miles: haversine_miles(reference, raw.coordinate),
            is_indoor: is_indoor(raw),
            raw: raw.clone(),
        })
        .collect()
}

/// `indoor=yes` in any casing. Untagged parks count as outdoor.
#[must_use]
pub fn is_indoor(raw: &RawResult) -> bool {
    raw.attribute("indoor")
        .is_some_and(|value| value.to_lowercase() == "yes")
}
