use sk8map_overpass::OverpassError;
use thiserror::Error;

/// Shown for any failed park query; the underlying cause is only logged.
pub const QUERY_FAILED_MESSAGE: &str = "Failed to load skateparks. Please try again.";

const LOCATION_UNAVAILABLE_MESSAGE: &str = "Geolocation is not supported on this device.";

/// Shown when the platform reports a location failure without a message.
const LOCATION_FALLBACK_MESSAGE: &str = "Unable to get your location.";

/// Failures that end the current discovery attempt.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("location services are not available on this device")]
    LocationUnavailable,

    #[error("location error: {0}")]
    LocationError(String),

    #[error("skatepark query failed: {0}")]
    QueryFailed(#[from] OverpassError),
}

impl DiscoveryError {
    /// The single message surfaced to the user for this failure.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::LocationUnavailable => LOCATION_UNAVAILABLE_MESSAGE.to_string(),
            Self::LocationError(message) if message.trim().is_empty() => {
                LOCATION_FALLBACK_MESSAGE.to_string()
            }
            Self::LocationError(message) => message.clone(),
            Self::QueryFailed(_) => QUERY_FAILED_MESSAGE.to_string(),
        }
    }
}
