#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Meters in one statute mile, as used for the search radius conversion.
pub const METERS_PER_MILE: f64 = 1609.34;

/// Search radius used when `SK8MAP_SEARCH_RADIUS_MILES` is unset.
pub const DEFAULT_SEARCH_RADIUS_MILES: f64 = 100.0;

/// Convert a radius in miles to whole meters (100 miles => 160934).
///
/// Callers pass a positive, finite distance.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn miles_to_meters(miles: f64) -> u32 {
    (miles * METERS_PER_MILE).round() as u32
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Overpass API interpreter endpoint.
    pub overpass_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub search_radius_miles: f64,
    pub location_timeout_secs: u64,
}

impl AppConfig {
    /// Search radius expressed in whole meters.
    #[must_use]
    pub fn search_radius_meters(&self) -> u32 {
        miles_to_meters(self.search_radius_miles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_radius(miles: f64) -> AppConfig {
        AppConfig {
            env: Environment::Test,
            log_level: "info".to_string(),
            overpass_url: "http://localhost".to_string(),
            request_timeout_secs: 30,
            user_agent: "test".to_string(),
            search_radius_miles: miles,
            location_timeout_secs: 10,
        }
    }

    #[test]
    fn hundred_miles_is_160934_meters() {
        assert_eq!(config_with_radius(100.0).search_radius_meters(), 160_934);
    }

    #[test]
    fn fractional_radius_rounds() {
        assert_eq!(config_with_radius(0.5).search_radius_meters(), 805);
    }

    #[test]
    fn default_radius_converts_to_160934_meters() {
        assert_eq!(miles_to_meters(DEFAULT_SEARCH_RADIUS_MILES), 160_934);
    }

    #[test]
    fn environment_display() {
        assert_eq!(Environment::Production.to_string(), "production");
    }
}
