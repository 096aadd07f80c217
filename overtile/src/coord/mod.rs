//! Projection math for the spherical Web Mercator tile pyramid.
//!
//! Converts between geographic coordinates (latitude/longitude), tile
//! addresses and the geographic footprint of a tile. Tile (0, 0) at zoom 0
//! covers the whole world and every zoom level doubles the resolution on
//! both axes. All functions are pure.

mod types;

pub use types::{
    CoordError, CoordinatePair, GeoExtent, NormalizedRect, TileAddress, MAX_LAT, MAX_LON,
    MAX_ZOOM, MIN_LAT, MIN_LON,
};

use std::f64::consts::PI;

/// Returns the geographic bounding box covered by a tile.
///
/// The result is inverse-consistent with [`lat_lon_to_tile`]: the center of
/// the returned box maps back to the same address at the same zoom.
pub fn tile_bounds(tile: &TileAddress) -> GeoExtent {
    let n = tile.tiles_per_axis() as f64;

    GeoExtent {
        west: column_to_lon(tile.x as f64, n),
        east: column_to_lon(tile.x as f64 + 1.0, n),
        north: row_to_lat(tile.y as f64, n),
        south: row_to_lat(tile.y as f64 + 1.0, n),
    }
}

/// Maps a geographic point to the tile containing it at `zoom`.
///
/// Longitude wraps at ±180°. Latitude is clamped to the Mercator-valid range
/// (±85.05112878°) rather than rejected, so this never fails. Zoom levels
/// above [`MAX_ZOOM`] are clamped to it.
#[inline]
pub fn lat_lon_to_tile(lat: f64, lon: f64, zoom: u8) -> TileAddress {
    let zoom = zoom.min(MAX_ZOOM);
    let n = (1u64 << zoom) as f64;
    let max_index = n - 1.0;

    let lat = clamp_latitude(lat);
    let lon = wrap_longitude(lon);

    let col = ((lon + 180.0) / 360.0 * n).floor().clamp(0.0, max_index);

    let lat_rad = lat.to_radians();
    let row = ((1.0 - lat_rad.tan().asinh() / PI) / 2.0 * n)
        .floor()
        .clamp(0.0, max_index);

    TileAddress {
        x: col as u32,
        y: row as u32,
        zoom,
    }
}

/// Affine rescale of `value` from `[in_min, in_max]` to `[out_min, out_max]`.
///
/// Inverted ranges are allowed on either side. Values outside the input range
/// extrapolate linearly.
///
/// # Errors
///
/// Returns [`CoordError::DegenerateRange`] when `in_min == in_max`.
#[inline]
pub fn convert_range(
    value: f64,
    in_min: f64,
    in_max: f64,
    out_min: f64,
    out_max: f64,
) -> Result<f64, CoordError> {
    let span = in_max - in_min;
    if span == 0.0 {
        return Err(CoordError::DegenerateRange(in_min));
    }
    Ok((value - in_min) / span * (out_max - out_min) + out_min)
}

/// Clamps a latitude into the Web Mercator domain.
#[inline]
pub fn clamp_latitude(lat: f64) -> f64 {
    lat.clamp(MIN_LAT, MAX_LAT)
}

/// Wraps a longitude into `[-180, 180)`.
#[inline]
pub fn wrap_longitude(lon: f64) -> f64 {
    if (MIN_LON..MAX_LON).contains(&lon) {
        return lon;
    }
    (lon + 180.0).rem_euclid(360.0) - 180.0
}

fn column_to_lon(col: f64, n: f64) -> f64 {
    col / n * 360.0 - 180.0
}

fn row_to_lat(row: f64, n: f64) -> f64 {
    (PI * (1.0 - 2.0 * row / n)).sinh().atan().to_degrees()
}

#[cfg(test)]
mod tests;
