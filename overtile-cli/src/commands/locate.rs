//! Locate command - which tile covers a coordinate.

use overtile::coord::{lat_lon_to_tile, tile_bounds, TileAddress};

pub fn run(lat: f64, lon: f64, zoom: u8) {
    let tile = lat_lon_to_tile(lat, lon, zoom);
    print!("{}", describe(lat, lon, &tile));
}

pub fn describe(lat: f64, lon: f64, tile: &TileAddress) -> String {
    let bounds = tile_bounds(tile);
    format!(
        "Location: {}, {}\nTile:     x={} y={} zoom={}\nBounds:   west {:.6}, south {:.6}, east {:.6}, north {:.6}\n",
        lat, lon, tile.x, tile.y, tile.zoom, bounds.west, bounds.south, bounds.east, bounds.north
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_new_york() {
        let tile = lat_lon_to_tile(40.7128, -74.0060, 16);
        let text = describe(40.7128, -74.0060, &tile);
        assert!(text.contains("x=19295 y=24640 zoom=16"));
        assert!(text.contains("west -74.0"));
    }
}
