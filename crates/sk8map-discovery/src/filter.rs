//! Category filtering and distance ordering of enriched results.

use sk8map_core::{EnrichedResult, FilterState};

/// Keep the results admitted by `filter`, nearest first.
///
/// The sort is stable, so equidistant results keep their input order.
#[must_use]
pub fn apply_filter(enriched: &[EnrichedResult], filter: FilterState) -> Vec<EnrichedResult> {
    let mut view: Vec<EnrichedResult> = enriched
        .iter()
        .filter(|result| filter.admits(result.is_indoor))
        .cloned()
        .collect();
    view.sort_by(|a, b| a.distance_miles.total_cmp(&b.distance_miles));
    view
}
