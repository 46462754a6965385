//! Terminal stand-ins for the map surface and the platform geolocation.

use std::future::Future;
use std::time::Duration;

use sk8map_core::{Bounds, Coordinate};
use sk8map_discovery::{FixOptions, MapSurface, PositionError, PositionErrorCode, PositionProvider};

/// Map surface that narrates every rendering call through `tracing`.
#[derive(Debug, Default)]
pub(crate) struct ConsoleMap {
    next_handle: u32,
    live: usize,
}

impl ConsoleMap {
    pub(crate) fn live_markers(&self) -> usize {
        self.live
    }
}

impl MapSurface for ConsoleMap {
    type Marker = u32;

    fn create_view(&mut self, center: Coordinate, zoom: u8) {
        tracing::info!(lat = center.lat, lon = center.lon, zoom, "map view created");
    }

    fn set_view(&mut self, center: Coordinate, zoom: u8) {
        tracing::info!(
            lat = center.lat,
            lon = center.lon,
            zoom,
            "map view recentered"
        );
    }

    fn add_marker(&mut self, at: Coordinate, title: &str) -> u32 {
        self.next_handle += 1;
        self.live += 1;
        tracing::debug!(
            handle = self.next_handle,
            title,
            lat = at.lat,
            lon = at.lon,
            "marker added"
        );
        self.next_handle
    }

    fn move_marker(&mut self, marker: &mut u32, at: Coordinate) {
        tracing::debug!(handle = *marker, lat = at.lat, lon = at.lon, "marker moved");
    }

    fn remove_marker(&mut self, marker: u32) {
        self.live = self.live.saturating_sub(1);
        tracing::debug!(handle = marker, "marker removed");
    }

    fn bind_popup(&mut self, marker: &mut u32, content: &str) {
        tracing::trace!(handle = *marker, content, "popup bound");
    }

    fn open_popup(&mut self, marker: &u32) {
        tracing::info!(handle = *marker, "popup opened");
    }

    fn fit_bounds(&mut self, bounds: Bounds, max_zoom: u8) {
        tracing::info!(
            south = bounds.south_west.lat,
            west = bounds.south_west.lon,
            north = bounds.north_east.lat,
            east = bounds.north_east.lon,
            max_zoom,
            "viewport fit"
        );
    }

    fn fly_to(&mut self, center: Coordinate, zoom: u8, duration: Duration) {
        tracing::info!(lat = center.lat, lon = center.lon, zoom, ?duration, "flying to");
    }
}

/// A position supplied on the command line or through the environment.
///
/// With no origin the provider reports that location is unavailable.
pub(crate) struct StaticPosition {
    origin: Option<Coordinate>,
}

impl StaticPosition {
    pub(crate) fn new(origin: Option<Coordinate>) -> Self {
        Self { origin }
    }
}

impl PositionProvider for StaticPosition {
    fn is_available(&self) -> bool {
        self.origin.is_some()
    }

    fn request_fix(
        &self,
        _options: FixOptions,
    ) -> impl Future<Output = Result<Coordinate, PositionError>> + Send {
        let outcome = self.origin.ok_or_else(|| {
            PositionError::new(
                PositionErrorCode::PositionUnavailable,
                "no origin configured",
            )
        });
        std::future::ready(outcome)
    }
}
