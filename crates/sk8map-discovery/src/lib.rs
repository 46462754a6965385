//! Skatepark discovery pipeline: locate the user, query nearby parks, derive
//! distance and category, filter, and keep map markers in step with the view.

pub mod controller;
pub mod enrich;
pub mod error;
pub mod filter;
pub mod locate;
pub mod markers;

pub use controller::{DiscoveryController, DiscoveryState, QueryRequest, RequestToken};
pub use enrich::{enrich, is_indoor};
pub use error::DiscoveryError;
pub use filter::apply_filter;
pub use locate::{FixOptions, GeoLocator, PositionError, PositionErrorCode, PositionProvider};
pub use markers::{MapSurface, MarkerSync, BASE_ZOOM, FOCUS_ZOOM, MAX_FIT_ZOOM};
