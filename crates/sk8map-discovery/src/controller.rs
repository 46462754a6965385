//! Discovery session state machine.
//!
//! ```text
//! Idle -> Locating -> LocationFailed
//!                  -> Located -> Querying -> QueryFailed
//!                                         -> Ready <-> (filter toggles)
//! ```
//!
//! Each outstanding fix or query carries a [`RequestToken`]. An outcome whose
//! token is no longer current, or that arrives outside the state it was
//! issued for, is dropped without touching any state.

use sk8map_core::{
    miles_to_meters, Coordinate, EnrichedResult, FilterState, RawResult,
    DEFAULT_SEARCH_RADIUS_MILES,
};
use sk8map_overpass::OverpassClient;

use crate::enrich::enrich;
use crate::error::DiscoveryError;
use crate::filter::apply_filter;
use crate::locate::{GeoLocator, PositionProvider};
use crate::markers::{MapSurface, MarkerSync};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryState {
    Idle,
    Locating,
    LocationFailed,
    Located,
    Querying,
    QueryFailed,
    Ready,
}

impl DiscoveryState {
    #[must_use]
    pub fn is_loading(self) -> bool {
        matches!(self, Self::Locating | Self::Querying)
    }
}

impl std::fmt::Display for DiscoveryState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Locating => "locating",
            Self::LocationFailed => "location_failed",
            Self::Located => "located",
            Self::Querying => "querying",
            Self::QueryFailed => "query_failed",
            Self::Ready => "ready",
        };
        f.write_str(name)
    }
}

/// Identifies one outstanding fix or query request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

/// The query the caller must issue after a successful fix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryRequest {
    pub token: RequestToken,
    pub center: Coordinate,
    pub radius_meters: u32,
}

/// Owns all mutable discovery state for one map session.
pub struct DiscoveryController<M: MapSurface> {
    state: DiscoveryState,
    filter: FilterState,
    reference: Option<Coordinate>,
    raw: Vec<RawResult>,
    view: Vec<EnrichedResult>,
    markers: MarkerSync<M>,
    error: Option<String>,
    generation: u64,
    radius_meters: u32,
}

impl<M: MapSurface> DiscoveryController<M> {
    /// A controller searching the default radius.
    pub fn new(surface: M) -> Self {
        Self::with_radius(surface, miles_to_meters(DEFAULT_SEARCH_RADIUS_MILES))
    }

    pub fn with_radius(surface: M, radius_meters: u32) -> Self {
        Self {
            state: DiscoveryState::Idle,
            filter: FilterState::default(),
            reference: None,
            raw: Vec::new(),
            view: Vec::new(),
            markers: MarkerSync::new(surface),
            error: None,
            generation: 0,
            radius_meters,
        }
    }

    #[must_use]
    pub fn state(&self) -> DiscoveryState {
        self.state
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    /// The user-facing message for the last failure, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn filter(&self) -> FilterState {
        self.filter
    }

    #[must_use]
    pub fn reference(&self) -> Option<Coordinate> {
        self.reference
    }

    #[must_use]
    pub fn raw_results(&self) -> &[RawResult] {
        &self.raw
    }

    /// Filtered results, nearest first.
    #[must_use]
    pub fn view(&self) -> &[EnrichedResult] {
        &self.view
    }

    #[must_use]
    pub fn markers(&self) -> &MarkerSync<M> {
        &self.markers
    }

    /// Start a location attempt.
    ///
    /// Returns `None` while a fix or query is still outstanding; only one
    /// request may be in flight at a time.
    pub fn begin_locating(&mut self) -> Option<RequestToken> {
        if self.state.is_loading() {
            tracing::warn!(state = %self.state, "discovery already in progress");
            return None;
        }
        self.error = None;
        let token = self.next_token();
        self.transition(DiscoveryState::Locating);
        Some(token)
    }

    /// Commit the outcome of a location fix.
    ///
    /// On success the map is centered on the fix and the returned
    /// [`QueryRequest`] describes the query to issue next.
    pub fn on_fix(
        &mut self,
        token: RequestToken,
        outcome: Result<Coordinate, DiscoveryError>,
    ) -> Option<QueryRequest> {
        if !self.accepts(token, DiscoveryState::Locating) {
            return None;
        }

        match outcome {
            Err(error) => {
                self.fail(DiscoveryState::LocationFailed, &error);
                None
            }
            Ok(point) => {
                self.reference = Some(point);
                self.transition(DiscoveryState::Located);
                self.markers.ensure_base(point);

                let token = self.next_token();
                self.transition(DiscoveryState::Querying);
                Some(QueryRequest {
                    token,
                    center: point,
                    radius_meters: self.radius_meters,
                })
            }
        }
    }

    /// Commit the outcome of a park query.
    ///
    /// Returns `false` when the outcome was stale and discarded.
    pub fn on_query_result(
        &mut self,
        token: RequestToken,
        outcome: Result<Vec<RawResult>, DiscoveryError>,
    ) -> bool {
        if !self.accepts(token, DiscoveryState::Querying) {
            return false;
        }

        match outcome {
            Err(error) => {
                self.raw.clear();
                self.view.clear();
                self.markers.sync(&self.view);
                self.fail(DiscoveryState::QueryFailed, &error);
            }
            Ok(results) => {
                tracing::info!(count = results.len(), "skatepark results received");
                self.raw = results;
                self.transition(DiscoveryState::Ready);
                self.refresh_view();
            }
        }
        true
    }

    pub fn set_show_indoor(&mut self, show: bool) {
        self.set_filter(FilterState {
            show_indoor: show,
            ..self.filter
        });
    }

    pub fn set_show_outdoor(&mut self, show: bool) {
        self.set_filter(FilterState {
            show_outdoor: show,
            ..self.filter
        });
    }

    /// Record new filter toggles and, once a reference point exists, rebuild
    /// the view so it always matches the current toggles.
    pub fn set_filter(&mut self, filter: FilterState) {
        self.filter = filter;
        tracing::debug!(
            show_indoor = filter.show_indoor,
            show_outdoor = filter.show_outdoor,
            state = %self.state,
            "filter changed"
        );
        if self.reference.is_some() {
            self.refresh_view();
        }
    }

    /// Move the map to a result from the current result set.
    ///
    /// Returns `false` if `id` is not part of the current results.
    pub fn focus(&mut self, id: i64) -> bool {
        let Some(at) = self
            .raw
            .iter()
            .find(|result| result.id == id)
            .map(|result| result.coordinate)
        else {
            tracing::debug!(id, "focus requested for unknown result");
            return false;
        };
        self.markers.focus(id, at);
        true
    }

    /// Run a full session: locate, query, and commit.
    ///
    /// Returns the state the session settled in.
    pub async fn run<P: PositionProvider>(
        &mut self,
        locator: &GeoLocator<P>,
        client: &OverpassClient,
    ) -> DiscoveryState {
        let Some(token) = self.begin_locating() else {
            return self.state;
        };

        let fix = locator.acquire().await;
        let Some(request) = self.on_fix(token, fix) else {
            return self.state;
        };

        let outcome = client
            .query(request.center, request.radius_meters)
            .await
            .map_err(DiscoveryError::from);
        self.on_query_result(request.token, outcome);
        self.state
    }

    fn refresh_view(&mut self) {
        let Some(reference) = self.reference else {
            return;
        };
        let enriched = enrich(&self.raw, reference);
        self.view = apply_filter(&enriched, self.filter);
        self.markers.sync(&self.view);
        tracing::info!(
            total = self.raw.len(),
            displayed = self.view.len(),
            "result view refreshed"
        );
    }

    fn accepts(&self, token: RequestToken, expected: DiscoveryState) -> bool {
        let current = token.0 == self.generation && self.state == expected;
        if !current {
            tracing::warn!(
                token = token.0,
                generation = self.generation,
                state = %self.state,
                expected = %expected,
                "discarding stale outcome"
            );
        }
        current
    }

    fn fail(&mut self, state: DiscoveryState, error: &DiscoveryError) {
        tracing::warn!(%error, state = %state, "discovery failed");
        self.error = Some(error.user_message());
        self.transition(state);
    }

    fn next_token(&mut self) -> RequestToken {
        self.generation += 1;
        RequestToken(self.generation)
    }

    fn transition(&mut self, next: DiscoveryState) {
        tracing::info!(from = %self.state, to = %next, "discovery state change");
        self.state = next;
    }
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;
