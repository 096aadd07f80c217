//! Tests for projection math

use super::*;

fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {} to be within {} of {}",
        actual,
        tolerance,
        expected
    );
}

#[test]
fn test_new_york_city_at_zoom_16() {
    // New York City: 40.7128°N, 74.0060°W
    let tile = lat_lon_to_tile(40.7128, -74.0060, 16);
    assert_eq!(tile.x, 19295);
    assert_eq!(tile.y, 24640);
    assert_eq!(tile.zoom, 16);
}

#[test]
fn test_london_at_zoom_10() {
    let tile = lat_lon_to_tile(51.5074, -0.1278, 10);
    assert_eq!(tile, TileAddress::new(511, 340, 10));
}

#[test]
fn test_equator_prime_meridian() {
    // At zoom 1 the origin sits on the corner shared by all four tiles.
    let tile = lat_lon_to_tile(0.0, 0.0, 1);
    assert_eq!(tile, TileAddress::new(1, 1, 1));
}

#[test]
fn test_zoom_zero_is_whole_world() {
    assert_eq!(lat_lon_to_tile(45.0, 120.0, 0), TileAddress::new(0, 0, 0));
    assert_eq!(lat_lon_to_tile(-80.0, -170.0, 0), TileAddress::new(0, 0, 0));

    let bounds = tile_bounds(&TileAddress::new(0, 0, 0));
    assert_close(bounds.west, -180.0, 1e-9);
    assert_close(bounds.east, 180.0, 1e-9);
    assert_close(bounds.north, MAX_LAT, 1e-6);
    assert_close(bounds.south, MIN_LAT, 1e-6);
}

#[test]
fn test_latitude_is_clamped_not_rejected() {
    let north_pole = lat_lon_to_tile(90.0, 0.0, 4);
    assert_eq!(north_pole.y, 0);

    let south_pole = lat_lon_to_tile(-90.0, 0.0, 4);
    assert_eq!(south_pole.y, 15);
}

#[test]
fn test_longitude_wraps() {
    assert_eq!(lat_lon_to_tile(10.0, 190.0, 3), lat_lon_to_tile(10.0, -170.0, 3));
    assert_eq!(lat_lon_to_tile(10.0, -540.0, 3), lat_lon_to_tile(10.0, -180.0, 3));
    // The antimeridian belongs to the western edge after wrapping.
    assert_eq!(lat_lon_to_tile(10.0, 180.0, 3).x, 0);
}

#[test]
fn test_wrap_longitude_values() {
    assert_close(wrap_longitude(0.0), 0.0, 1e-12);
    assert_close(wrap_longitude(181.0), -179.0, 1e-9);
    assert_close(wrap_longitude(-181.0), 179.0, 1e-9);
    assert_close(wrap_longitude(360.0), 0.0, 1e-9);
}

#[test]
fn test_tile_bounds_ordering() {
    let bounds = tile_bounds(&TileAddress::new(19295, 24640, 16));
    assert!(bounds.west < bounds.east);
    assert!(bounds.south < bounds.north);
    assert!(bounds.contains(40.7128, -74.0060));
}

#[test]
fn test_tile_bounds_share_edges_with_neighbours() {
    let a = tile_bounds(&TileAddress::new(10, 20, 6));
    let right = tile_bounds(&TileAddress::new(11, 20, 6));
    let below = tile_bounds(&TileAddress::new(10, 21, 6));

    assert_close(a.east, right.west, 1e-12);
    assert_close(a.south, below.north, 1e-12);
}

#[test]
fn test_center_roundtrip_all_tiles_low_zoom() {
    for zoom in 0..=6u8 {
        let n = 1u32 << zoom;
        for x in 0..n {
            for y in 0..n {
                let addr = TileAddress::new(x, y, zoom);
                let center = tile_bounds(&addr).center();
                assert_eq!(
                    lat_lon_to_tile(center.y, center.x, zoom),
                    addr,
                    "center of {} should map back to itself",
                    addr
                );
            }
        }
    }
}

#[test]
fn test_center_roundtrip_deep_zoom() {
    let samples = [
        TileAddress::new(0, 0, 18),
        TileAddress::new(262_143, 262_143, 18),
        TileAddress::new(131_072, 87_381, 18),
        TileAddress::new(1_234_567, 2_345_678, 22),
        TileAddress::new(19295, 24640, 16),
    ];

    for addr in samples {
        let center = tile_bounds(&addr).center();
        assert_eq!(lat_lon_to_tile(center.y, center.x, addr.zoom), addr);
    }
}

#[test]
fn test_convert_range_basic() {
    assert_close(convert_range(5.0, 0.0, 10.0, 0.0, 1.0).unwrap(), 0.5, 1e-12);
    assert_close(convert_range(0.25, 0.0, 0.5, 0.0, 1.0).unwrap(), 0.5, 1e-12);
}

#[test]
fn test_convert_range_inverted_input() {
    // North maps to 0 and south maps to 1.
    let value = convert_range(40.0, 50.0, 30.0, 0.0, 1.0).unwrap();
    assert_close(value, 0.5, 1e-12);
}

#[test]
fn test_convert_range_extrapolates() {
    assert_close(convert_range(1.5, 0.0, 1.0, 0.0, 2.0).unwrap(), 3.0, 1e-12);
    assert_close(convert_range(-1.0, 0.0, 1.0, 0.0, 1.0).unwrap(), -1.0, 1e-12);
}

#[test]
fn test_convert_range_degenerate() {
    assert_eq!(
        convert_range(1.0, 2.0, 2.0, 0.0, 1.0),
        Err(CoordError::DegenerateRange(2.0))
    );
}

#[test]
fn test_validate_address() {
    assert!(TileAddress::new(0, 0, 0).validate().is_ok());
    assert!(TileAddress::new(3, 3, 2).validate().is_ok());
    assert!(matches!(
        TileAddress::new(4, 0, 2).validate(),
        Err(CoordError::AddressOutOfRange { .. })
    ));
    assert!(matches!(
        TileAddress::new(0, 1, 0).validate(),
        Err(CoordError::AddressOutOfRange { .. })
    ));
    assert_eq!(
        TileAddress::new(0, 0, 31).validate(),
        Err(CoordError::InvalidZoom(31))
    );
}

#[test]
fn test_ancestor_at() {
    let tile = TileAddress::new(1234, 567, 12);
    assert_eq!(tile.ancestor_at(12), Some(tile));
    assert_eq!(tile.ancestor_at(10), Some(TileAddress::new(308, 141, 10)));
    assert_eq!(tile.ancestor_at(13), None);
}

#[test]
fn test_address_display_is_canonical() {
    assert_eq!(TileAddress::new(3, 5, 7).to_string(), "3,5,7");
}

#[test]
fn test_normalized_rect_full() {
    assert!(NormalizedRect::FULL.is_full());
    assert_eq!(NormalizedRect::default(), NormalizedRect::FULL);
    let half = NormalizedRect::new(0.0, 0.0, 0.5, 0.5);
    assert!(!half.is_full());
    assert_close(half.width(), 0.5, 1e-12);
    assert_close(half.height(), 0.5, 1e-12);
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    fn any_address() -> impl Strategy<Value = TileAddress> {
        (0u8..=MAX_ZOOM).prop_flat_map(|zoom| {
            let n = 1u32 << zoom;
            (0..n, 0..n).prop_map(move |(x, y)| TileAddress::new(x, y, zoom))
        })
    }

    proptest! {
        /// Property: the center of any tile maps back to that tile.
        #[test]
        fn prop_round_trip_consistency(address in any_address()) {
            let center = tile_bounds(&address).center();
            prop_assert_eq!(lat_lon_to_tile(center.y, center.x, address.zoom), address);
        }

        /// Property: every tile has a non-empty footprint inside the projection limits.
        #[test]
        fn prop_bounds_are_ordered(address in any_address()) {
            let bounds = tile_bounds(&address);
            prop_assert!(bounds.west < bounds.east);
            prop_assert!(bounds.south < bounds.north);
            prop_assert!(bounds.west >= MIN_LON && bounds.east <= MAX_LON);
            prop_assert!(bounds.south >= MIN_LAT - 1e-9 && bounds.north <= MAX_LAT + 1e-9);
        }

        /// Property: any coordinate, however far out of range, lands on a valid tile.
        #[test]
        fn prop_any_coordinate_yields_valid_address(
            lat in -90.0f64..=90.0,
            lon in -540.0f64..540.0,
            zoom in 0u8..=MAX_ZOOM,
        ) {
            let address = lat_lon_to_tile(lat, lon, zoom);
            prop_assert!(address.validate().is_ok());
            prop_assert_eq!(address.zoom, zoom);
        }
    }
}
