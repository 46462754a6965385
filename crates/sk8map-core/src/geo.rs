//! Geographic primitives: coordinates, great-circle distance, bounding boxes.

use serde::{Deserialize, Serialize};

/// Mean Earth radius used for all distance calculations.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Fixed kilometer-to-mile conversion factor.
pub const MILES_PER_KM: f64 = 0.621_371;

/// A WGS84 point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lon): (f64, f64)) -> Self {
        Self::new(lat, lon)
    }
}

/// Great-circle distance in miles between two points (haversine on a
/// 6371 km sphere).
#[must_use]
pub fn haversine_miles(from: Coordinate, to: Coordinate) -> f64 {
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lon = (to.lon - from.lon).to_radians();
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c * MILES_PER_KM
}

/// Axis-aligned lat/lon rectangle, grown point by point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub south_west: Coordinate,
    pub north_east: Coordinate,
}

impl Bounds {
    /// A degenerate box containing only `point`.
    #[must_use]
    pub const fn from_point(point: Coordinate) -> Self {
        Self {
            south_west: point,
            north_east: point,
        }
    }

    /// Smallest box containing every point, or `None` for an empty iterator.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Coordinate>,
    {
        let mut iter = points.into_iter();
        let mut bounds = Self::from_point(iter.next()?);
        for point in iter {
            bounds.extend(point);
        }
        Some(bounds)
    }

    pub fn extend(&mut self, point: Coordinate) {
        self.south_west.lat = self.south_west.lat.min(point.lat);
        self.south_west.lon = self.south_west.lon.min(point.lon);
        self.north_east.lat = self.north_east.lat.max(point.lat);
        self.north_east.lon = self.north_east.lon.max(point.lon);
    }

    /// Grow each edge outward by `ratio` times the box's span on that axis.
    #[must_use]
    pub fn pad(&self, ratio: f64) -> Self {
        let lat_buffer = (self.north_east.lat - self.south_west.lat).abs() * ratio;
        let lon_buffer = (self.north_east.lon - self.south_west.lon).abs() * ratio;
        Self {
            south_west: Coordinate::new(
                self.south_west.lat - lat_buffer,
                self.south_west.lon - lon_buffer,
            ),
            north_east: Coordinate::new(
                self.north_east.lat + lat_buffer,
                self.north_east.lon + lon_buffer,
            ),
        }
    }
}
