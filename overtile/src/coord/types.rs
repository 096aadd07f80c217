//! Coordinate type definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Web Mercator valid latitude range
pub const MIN_LAT: f64 = -85.05112878;
pub const MAX_LAT: f64 = 85.05112878;

/// Valid longitude range
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Deepest zoom level whose tile count per axis still fits in a `u32`.
pub const MAX_ZOOM: u8 = 30;

/// Tile address in the Web Mercator / Slippy Map pyramid.
///
/// Row 0 is the northern edge of the map; rows grow southward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileAddress {
    /// X coordinate (east-west), 0 at west
    pub x: u32,
    /// Y coordinate (north-south), 0 at north
    pub y: u32,
    /// Zoom level
    pub zoom: u8,
}

impl TileAddress {
    /// Creates an address without validating it.
    pub const fn new(x: u32, y: u32, zoom: u8) -> Self {
        Self { x, y, zoom }
    }

    /// Number of tiles along each axis at this address's zoom level.
    #[inline]
    pub fn tiles_per_axis(&self) -> u64 {
        1u64 << self.zoom.min(MAX_ZOOM)
    }

    /// Checks the `x, y < 2^zoom` invariant.
    pub fn validate(&self) -> Result<(), CoordError> {
        if self.zoom > MAX_ZOOM {
            return Err(CoordError::InvalidZoom(self.zoom));
        }
        let n = self.tiles_per_axis();
        if u64::from(self.x) >= n || u64::from(self.y) >= n {
            return Err(CoordError::AddressOutOfRange {
                x: self.x,
                y: self.y,
                zoom: self.zoom,
            });
        }
        Ok(())
    }

    /// Returns the ancestor of this tile at `zoom`, or `None` if `zoom` is deeper.
    pub fn ancestor_at(&self, zoom: u8) -> Option<TileAddress> {
        if zoom > self.zoom {
            return None;
        }
        let shift = self.zoom - zoom;
        Some(TileAddress {
            x: self.x >> shift,
            y: self.y >> shift,
            zoom,
        })
    }
}

/// Canonical `x,y,zoom` form, shared by logs and cache diagnostics.
impl fmt::Display for TileAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.x, self.y, self.zoom)
    }
}

/// A coordinate pair; degrees (x = longitude, y = latitude) or normalized
/// tile units depending on context.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CoordinatePair {
    pub x: f64,
    pub y: f64,
}

impl CoordinatePair {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Geographic bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoExtent {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl GeoExtent {
    /// Midpoint of the box in degrees.
    pub fn center(&self) -> CoordinatePair {
        CoordinatePair {
            x: (self.west + self.east) / 2.0,
            y: (self.north + self.south) / 2.0,
        }
    }

    pub fn north_west(&self) -> CoordinatePair {
        CoordinatePair::new(self.west, self.north)
    }

    pub fn north_east(&self) -> CoordinatePair {
        CoordinatePair::new(self.east, self.north)
    }

    pub fn south_west(&self) -> CoordinatePair {
        CoordinatePair::new(self.west, self.south)
    }

    pub fn south_east(&self) -> CoordinatePair {
        CoordinatePair::new(self.east, self.south)
    }

    /// Returns true if the point lies inside the box (edges inclusive).
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.west..=self.east).contains(&lon) && (self.south..=self.north).contains(&lat)
    }
}

/// Rectangle in normalized tile units.
///
/// Uses tile-local orientation: `top` is the northern edge and Y grows
/// southward, so `top <= bottom` for any sub-window of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl NormalizedRect {
    /// The whole tile, `(0, 0) - (1, 1)`.
    pub const FULL: NormalizedRect = NormalizedRect {
        left: 0.0,
        top: 0.0,
        right: 1.0,
        bottom: 1.0,
    };

    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn is_full(&self) -> bool {
        *self == Self::FULL
    }
}

impl Default for NormalizedRect {
    fn default() -> Self {
        Self::FULL
    }
}

/// Errors that can occur in projection math.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordError {
    /// Zoom level deeper than the pyramid can address
    #[error("Invalid zoom level: {0} (must be between 0 and 30)")]
    InvalidZoom(u8),

    /// Column or row outside `0..2^zoom`
    #[error("Invalid tile address {x},{y},{zoom}: x and y must be below 2^{zoom}")]
    AddressOutOfRange { x: u32, y: u32, zoom: u8 },

    /// Rescale requested from an empty input range
    #[error("Cannot rescale from an empty range (min = max = {0})")]
    DegenerateRange(f64),
}
