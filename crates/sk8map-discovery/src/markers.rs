//! Reconciliation of map markers with the current result view.
//!
//! The rendering layer is reached only through [`MapSurface`]. Marker handles
//! are owned by [`MarkerSync`] in a table keyed by result id and never handed
//! back out; callers observe the displayed set through
//! [`MarkerSync::displayed_ids`].

use std::collections::{BTreeSet, HashMap, HashSet};
use std::time::Duration;

use sk8map_core::{Bounds, Coordinate, EnrichedResult};

/// Zoom used when the view is first created or recentered on the user.
pub const BASE_ZOOM: u8 = 13;
/// Upper zoom bound when fitting the view around results.
pub const MAX_FIT_ZOOM: u8 = 16;
/// Zoom used when focusing on a single result.
pub const FOCUS_ZOOM: u8 = 16;
/// Fraction of the bounds span added on every side before fitting.
pub const FIT_PADDING: f64 = 0.2;
pub const FOCUS_DURATION: Duration = Duration::from_millis(750);
pub const USER_MARKER_LABEL: &str = "You are here";

/// The operations this pipeline needs from a map renderer.
pub trait MapSurface {
    /// Opaque per-marker handle.
    type Marker;

    fn create_view(&mut self, center: Coordinate, zoom: u8);
    fn set_view(&mut self, center: Coordinate, zoom: u8);
    fn add_marker(&mut self, at: Coordinate, title: &str) -> Self::Marker;
    fn move_marker(&mut self, marker: &mut Self::Marker, at: Coordinate);
    fn remove_marker(&mut self, marker: Self::Marker);
    fn bind_popup(&mut self, marker: &mut Self::Marker, content: &str);
    fn open_popup(&mut self, marker: &Self::Marker);
    fn fit_bounds(&mut self, bounds: Bounds, max_zoom: u8);
    fn fly_to(&mut self, center: Coordinate, zoom: u8, duration: Duration);
}

struct Placed<H> {
    handle: H,
    at: Coordinate,
    label: String,
}

/// Keeps the markers on a [`MapSurface`] equal to the last synced view.
pub struct MarkerSync<M: MapSurface> {
    surface: M,
    view_created: bool,
    user: Option<Placed<M::Marker>>,
    placed: HashMap<i64, Placed<M::Marker>>,
}

impl<M: MapSurface> MarkerSync<M> {
    pub fn new(surface: M) -> Self {
        Self {
            surface,
            view_created: false,
            user: None,
            placed: HashMap::new(),
        }
    }

    /// Create or recenter the base view on `point` and place the user marker there.
    pub fn ensure_base(&mut self, point: Coordinate) {
        if self.view_created {
            self.surface.set_view(point, BASE_ZOOM);
        } else {
            self.surface.create_view(point, BASE_ZOOM);
            self.view_created = true;
        }

        if let Some(user) = self.user.as_mut() {
            self.surface.move_marker(&mut user.handle, point);
            user.at = point;
        } else {
            let mut handle = self.surface.add_marker(point, USER_MARKER_LABEL);
            self.surface.bind_popup(&mut handle, USER_MARKER_LABEL);
            self.user = Some(Placed {
                handle,
                at: point,
                label: USER_MARKER_LABEL.to_string(),
            });
        }
    }

    /// Make the displayed markers match `view` exactly.
    ///
    /// Markers absent from `view` are removed, new ids get a marker with a
    /// popup, and kept markers follow coordinate or label changes. A non-empty
    /// view then fits the viewport around every result plus the user marker.
    pub fn sync(&mut self, view: &[EnrichedResult]) {
        let wanted: HashSet<i64> = view.iter().map(EnrichedResult::id).collect();

        let stale: Vec<i64> = self
            .placed
            .keys()
            .filter(|id| !wanted.contains(*id))
            .copied()
            .collect();
        for id in &stale {
            if let Some(placed) = self.placed.remove(id) {
                self.surface.remove_marker(placed.handle);
            }
        }

        let mut added = 0usize;
        let mut updated = 0usize;
        for result in view {
            let id = result.id();
            let at = result.coordinate();
            let label = result.raw.display_label();

            let (relabel, moved) = match self.placed.get(&id) {
                None => {
                    self.place(id, at, label);
                    added += 1;
                    continue;
                }
                Some(placed) => (placed.label != label, placed.at != at),
            };

            if relabel {
                // Titles are fixed at creation, so a rename needs a fresh marker.
                if let Some(old) = self.placed.remove(&id) {
                    self.surface.remove_marker(old.handle);
                }
                self.place(id, at, label);
                updated += 1;
            } else if moved {
                if let Some(placed) = self.placed.get_mut(&id) {
                    self.surface.move_marker(&mut placed.handle, at);
                    placed.at = at;
                }
                updated += 1;
            }
        }

        tracing::debug!(
            removed = stale.len(),
            added,
            updated,
            displayed = self.placed.len(),
            "markers synced"
        );

        if !view.is_empty() {
            self.fit_to_view(view);
        }
    }

    /// Fly to a result and open its popup when it has a marker.
    ///
    /// Results without a marker (filtered out or not yet synced) still move
    /// the view to `at`.
    pub fn focus(&mut self, id: i64, at: Coordinate) {
        self.surface.fly_to(at, FOCUS_ZOOM, FOCUS_DURATION);
        if let Some(placed) = self.placed.get(&id) {
            self.surface.open_popup(&placed.handle);
        } else {
            tracing::debug!(id, "focus on result without a marker");
        }
    }

    #[must_use]
    pub fn displayed_ids(&self) -> BTreeSet<i64> {
        self.placed.keys().copied().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.placed.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.placed.is_empty()
    }

    #[must_use]
    pub fn user_position(&self) -> Option<Coordinate> {
        self.user.as_ref().map(|user| user.at)
    }

    pub fn surface(&self) -> &M {
        &self.surface
    }

    fn place(&mut self, id: i64, at: Coordinate, label: &str) {
        let mut handle = self.surface.add_marker(at, label);
        self.surface.bind_popup(&mut handle, label);
        self.placed.insert(
            id,
            Placed {
                handle,
                at,
                label: label.to_string(),
            },
        );
    }

    fn fit_to_view(&mut self, view: &[EnrichedResult]) {
        let points = view
            .iter()
            .map(EnrichedResult::coordinate)
            .chain(self.user_position());
        if let Some(bounds) = Bounds::from_points(points) {
            self.surface.fit_bounds(bounds.pad(FIT_PADDING), MAX_FIT_ZOOM);
        }
    }
}

#[cfg(test)]
#[path = "markers_test.rs"]
mod tests;
