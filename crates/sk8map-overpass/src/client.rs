//! HTTP client for the Overpass API interpreter endpoint.

use std::time::Duration;

use reqwest::{Client, Url};
use sk8map_core::{AppConfig, Coordinate, RawResult};

use crate::error::OverpassError;
use crate::parse::parse_elements;
use crate::query::{build_query, encode_form_body, FORM_CONTENT_TYPE};

pub const DEFAULT_ENDPOINT: &str = "https://overpass-api.de/api/interpreter";

/// Client for skatepark area queries against an Overpass interpreter.
///
/// Each [`OverpassClient::query`] issues exactly one POST. Non-2xx responses,
/// transport failures, and non-JSON bodies are errors; individual malformed
/// elements inside a successful response are dropped instead.
pub struct OverpassClient {
    client: Client,
    endpoint: Url,
}

impl OverpassClient {
    /// Creates a client pointed at the public Overpass interpreter.
    ///
    /// # Errors
    ///
    /// Returns [`OverpassError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, OverpassError> {
        Self::with_endpoint(DEFAULT_ENDPOINT, timeout_secs, user_agent)
    }

    /// Creates a client from the loaded application config.
    ///
    /// # Errors
    ///
    /// See [`OverpassClient::with_endpoint`].
    pub fn from_config(config: &AppConfig) -> Result<Self, OverpassError> {
        Self::with_endpoint(
            &config.overpass_url,
            config.request_timeout_secs,
            &config.user_agent,
        )
    }

    /// Creates a client with a custom interpreter URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`OverpassError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`OverpassError::InvalidEndpoint`] if `endpoint` is not an
    /// absolute http(s) URL.
    pub fn with_endpoint(
        endpoint: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, OverpassError> {
        let parsed = Url::parse(endpoint).map_err(|e| OverpassError::InvalidEndpoint {
            url: endpoint.to_owned(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(OverpassError::InvalidEndpoint {
                url: endpoint.to_owned(),
                reason: format!("unsupported scheme \"{}\"", parsed.scheme()),
            });
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            endpoint: parsed,
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    /// Queries skateparks within `radius_meters` of `center`.
    ///
    /// # Errors
    ///
    /// - [`OverpassError::UnexpectedStatus`] for any non-2xx response.
    /// - [`OverpassError::Http`] on network or TLS failure.
    /// - [`OverpassError::Deserialize`] if the body is not JSON.
    pub async fn query(
        &self,
        center: Coordinate,
        radius_meters: u32,
    ) -> Result<Vec<RawResult>, OverpassError> {
        let query = build_query(center, radius_meters);
        tracing::debug!(
            endpoint = %self.endpoint,
            lat = center.lat,
            lon = center.lon,
            radius_meters,
            "issuing overpass query"
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(reqwest::header::CONTENT_TYPE, FORM_CONTENT_TYPE)
            .header(reqwest::header::ACCEPT, "application/json")
            .body(encode_form_body(&query))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(OverpassError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.endpoint.to_string(),
            });
        }

        let body = response.text().await?;
        let payload = serde_json::from_str::<serde_json::Value>(&body).map_err(|e| {
            OverpassError::Deserialize {
                context: format!("overpass response from {}", self.endpoint),
                source: e,
            }
        })?;

        let results = parse_elements(&payload);
        tracing::info!(
            count = results.len(),
            radius_meters,
            "overpass query returned"
        );
        Ok(results)
    }
}
