//! Overzoom resolution.
//!
//! When a caller asks for a deeper zoom than the source stores, the tile is
//! served from the ancestor at the source's maximum zoom, cropped to the
//! sub-rectangle the requested tile occupies inside it.
//!
//! ```text
//!   ancestor at max_zoom (normalized)
//!   (0,0) ┌───────────────┐
//!         │   ┌───┐       │   extent = (left, top, right, bottom)
//!         │   │req│       │   top is north; Y grows southward, matching
//!         │   └───┘       │   the decoder's raw coordinate convention
//!         └───────────────┘ (1,1)
//! ```

use crate::coord::{
    convert_range, lat_lon_to_tile, tile_bounds, CoordError, CoordinatePair, GeoExtent,
    NormalizedRect, TileAddress,
};
use crate::error::TileError;
use std::fmt;
use std::str::FromStr;

/// What to do when the source does not advertise a maximum zoom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverzoomPolicy {
    /// Never overzoom; every request is looked up directly.
    #[default]
    Passthrough,
    /// Reject requests with [`TileError::MaxZoomUnknown`].
    FailFast,
}

impl OverzoomPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverzoomPolicy::Passthrough => "passthrough",
            OverzoomPolicy::FailFast => "fail",
        }
    }
}

impl fmt::Display for OverzoomPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OverzoomPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "passthrough" => Ok(OverzoomPolicy::Passthrough),
            "fail" | "fail_fast" | "failfast" => Ok(OverzoomPolicy::FailFast),
            other => Err(format!(
                "unknown overzoom policy '{}' (expected 'passthrough' or 'fail')",
                other
            )),
        }
    }
}

/// Outcome of resolving a requested address.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    /// Address actually fetched and decoded
    pub effective: TileAddress,
    /// Window of the effective tile covering the requested one
    pub extent: NormalizedRect,
    /// True when `effective` is an ancestor of the request
    pub over_zoomed: bool,
}

impl Resolution {
    /// A direct lookup with no transform.
    pub fn direct(address: TileAddress) -> Self {
        Self {
            effective: address,
            extent: NormalizedRect::FULL,
            over_zoomed: false,
        }
    }
}

/// Resolves `requested` against the source's maximum zoom.
///
/// Requests at or below `max_zoom` pass through unchanged. Deeper requests map
/// to the `max_zoom` ancestor containing the requested tile's center, with the
/// extent computed from the geographic bounds of both tiles.
///
/// # Errors
///
/// - [`TileError::InvalidAddress`] if `requested` violates `x, y < 2^zoom`
/// - [`TileError::MaxZoomUnknown`] if `max_zoom` is `None` under
///   [`OverzoomPolicy::FailFast`]
/// - [`TileError::Projection`] if the ancestor bounds are degenerate
pub fn resolve(
    requested: &TileAddress,
    max_zoom: Option<u8>,
    policy: OverzoomPolicy,
) -> Result<Resolution, TileError> {
    requested.validate().map_err(TileError::InvalidAddress)?;

    let max_zoom = match (max_zoom, policy) {
        (Some(max_zoom), _) => max_zoom,
        (None, OverzoomPolicy::Passthrough) => return Ok(Resolution::direct(*requested)),
        (None, OverzoomPolicy::FailFast) => return Err(TileError::MaxZoomUnknown),
    };

    if requested.zoom <= max_zoom {
        return Ok(Resolution::direct(*requested));
    }

    let bounds = tile_bounds(requested);
    let center = bounds.center();
    let bigger = lat_lon_to_tile(center.y, center.x, max_zoom);
    let bigger_bounds = tile_bounds(&bigger);

    let extent = window(bounds.north_west(), bounds.south_east(), &bigger_bounds)
        .map_err(TileError::Projection)?;

    Ok(Resolution {
        effective: bigger,
        extent,
        over_zoomed: true,
    })
}

/// Rescales two corners into `outer`'s normalized frame (north -> 0, south -> 1).
fn window(
    north_west: CoordinatePair,
    south_east: CoordinatePair,
    outer: &GeoExtent,
) -> Result<NormalizedRect, CoordError> {
    Ok(NormalizedRect {
        left: convert_range(north_west.x, outer.west, outer.east, 0.0, 1.0)?,
        top: convert_range(north_west.y, outer.north, outer.south, 0.0, 1.0)?,
        right: convert_range(south_east.x, outer.west, outer.east, 0.0, 1.0)?,
        bottom: convert_range(south_east.y, outer.north, outer.south, 0.0, 1.0)?,
    })
}
