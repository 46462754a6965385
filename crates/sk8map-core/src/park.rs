//! Skatepark result types shared by the query client and the discovery pipeline.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// Label shown for parks whose `name` tag is missing or empty.
pub const FALLBACK_LABEL: &str = "Skatepark";

/// One skatepark as returned by the data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawResult {
    /// OSM element id, unique within a single query response.
    pub id: i64,
    /// Value of the `name` tag; empty when absent.
    pub name: String,
    pub coordinate: Coordinate,
    /// All string-valued OSM tags on the element.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl RawResult {
    #[must_use]
    pub fn display_label(&self) -> &str {
        if self.name.is_empty() {
            FALLBACK_LABEL
        } else {
            &self.name
        }
    }

    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

/// A [`RawResult`] with attributes derived relative to the user's position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedResult {
    #[serde(flatten)]
    pub raw: RawResult,
    pub distance_miles: f64,
    pub is_indoor: bool,
}

impl EnrichedResult {
    #[must_use]
    pub fn id(&self) -> i64 {
        self.raw.id
    }

    #[must_use]
    pub fn coordinate(&self) -> Coordinate {
        self.raw.coordinate
    }
}

/// Category toggles controlled by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub show_indoor: bool,
    pub show_outdoor: bool,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            show_indoor: true,
            show_outdoor: true,
        }
    }
}

impl FilterState {
    #[must_use]
    pub fn admits(&self, is_indoor: bool) -> bool {
        if is_indoor {
            self.show_indoor
        } else {
            self.show_outdoor
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn park(name: &str) -> RawResult {
        RawResult {
            id: 1,
            name: name.to_string(),
            coordinate: Coordinate::new(0.0, 0.0),
            attributes: BTreeMap::new(),
        }
    }

    #[test]
    fn display_label_falls_back_when_name_empty() {
        assert_eq!(park("").display_label(), "Skatepark");
        assert_eq!(park("Burnside").display_label(), "Burnside");
    }

    #[test]
    fn default_filter_shows_everything() {
        let filter = FilterState::default();
        assert!(filter.admits(true));
        assert!(filter.admits(false));
    }

    #[test]
    fn filter_admits_by_category() {
        let outdoor_only = FilterState {
            show_indoor: false,
            show_outdoor: true,
        };
        assert!(!outdoor_only.admits(true));
        assert!(outdoor_only.admits(false));
    }

    #[test]
    fn enriched_result_serializes_flat() {
        let enriched = EnrichedResult {
            raw: park("Burnside"),
            distance_miles: 1.5,
            is_indoor: false,
        };
        let json = serde_json::to_value(&enriched).unwrap();
        assert_eq!(json["name"], "Burnside");
        assert_eq!(json["distance_miles"], 1.5);
        assert_eq!(json["coordinate"]["lat"], 0.0);
    }
}
