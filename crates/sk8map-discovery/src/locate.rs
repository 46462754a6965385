//! One-shot position acquisition over a platform geolocation capability.

use std::future::Future;
use std::time::Duration;

use sk8map_core::Coordinate;

use crate::error::DiscoveryError;

/// Options passed to the platform for a single fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
    /// Oldest cached fix the platform may return; zero forces a fresh fix.
    pub max_age: Duration,
}

impl Default for FixOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(10),
            max_age: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionErrorCode {
    PermissionDenied,
    PositionUnavailable,
    Timeout,
}

/// A failure reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionError {
    pub code: PositionErrorCode,
    pub message: String,
}

impl PositionError {
    #[must_use]
    pub fn new(code: PositionErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Platform geolocation capability.
///
/// Implementations deliver at most one outcome per `request_fix` call.
pub trait PositionProvider {
    /// Whether the platform offers location at all.
    fn is_available(&self) -> bool;

    fn request_fix(
        &self,
        options: FixOptions,
    ) -> impl Future<Output = Result<Coordinate, PositionError>> + Send;
}

/// Acquires a single reference point from a [`PositionProvider`].
pub struct GeoLocator<P> {
    provider: P,
    options: FixOptions,
}

impl<P: PositionProvider> GeoLocator<P> {
    pub fn new(provider: P) -> Self {
        Self::with_options(provider, FixOptions::default())
    }

    pub fn with_options(provider: P, options: FixOptions) -> Self {
        Self { provider, options }
    }

    /// Request one fresh fix.
    ///
    /// The configured timeout is handed to the provider and also enforced
    /// here, so a provider that never answers still resolves.
    ///
    /// # Errors
    ///
    /// - [`DiscoveryError::LocationUnavailable`] if the provider reports no capability.
    /// - [`DiscoveryError::LocationError`] for any platform failure or local timeout. The
    ///   platform message is kept as reported, even when empty.
    pub async fn acquire(&self) -> Result<Coordinate, DiscoveryError> {
        if !self.provider.is_available() {
            tracing::warn!("geolocation capability unavailable");
            return Err(DiscoveryError::LocationUnavailable);
        }

        let request = self.provider.request_fix(self.options);
        let fix = tokio::time::timeout(self.options.timeout, request).await;

        match fix {
            Ok(Ok(point)) => {
                tracing::info!(lat = point.lat, lon = point.lon, "location fix acquired");
                Ok(point)
            }
            Ok(Err(error)) => {
                tracing::warn!(code = ?error.code, message = %error.message, "location fix failed");
                Err(DiscoveryError::LocationError(error.message))
            }
            Err(_) => {
                tracing::warn!(timeout = ?self.options.timeout, "location fix timed out");
                Err(DiscoveryError::LocationError("Timeout expired".to_string()))
            }
        }
    }
}
