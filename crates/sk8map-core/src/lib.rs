pub mod app_config;
pub mod config;
pub mod geo;
pub mod park;

pub use app_config::{
    miles_to_meters, AppConfig, Environment, DEFAULT_SEARCH_RADIUS_MILES, METERS_PER_MILE,
};
pub use config::{build_app_config, load_app_config, load_app_config_from_env};
pub use geo::{haversine_miles, Bounds, Coordinate, EARTH_RADIUS_KM, MILES_PER_KM};
pub use park::{EnrichedResult, FilterState, RawResult, FALLBACK_LABEL};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
