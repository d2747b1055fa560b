//! Tests for tile conversion

use super::*;

#[test]
fn test_berlin_at_level_12() {
    // Berlin: 52.5°N, 13.4°E
    let tile = to_tile(52.5, 13.4, 12).unwrap();
    assert_eq!(tile.x, 2200);
    assert_eq!(tile.y, 1621);
    assert_eq!(tile.level, 12);
    assert_eq!(tile.id(), TileId(23618402));
}

#[test]
fn test_porto_at_level_12() {
    let id = tile_id_from_coordinates(41.1185338888889, -8.62504861111111, 12).unwrap();
    assert_eq!(id, TileId(20439899));
}

#[test]
fn test_level_zero_is_single_tile() {
    assert_eq!(to_tile(-90.0, -180.0, 0).unwrap().id(), TileId(1));
    assert_eq!(to_tile(90.0, 180.0, 0).unwrap().id(), TileId(1));
    assert_eq!(to_tile(0.0, 0.0, 0).unwrap().id(), TileId(1));
}

#[test]
fn test_level_one_has_two_columns_one_row() {
    let west = to_tile(10.0, -90.0, 1).unwrap();
    let east = to_tile(10.0, 90.0, 1).unwrap();
    assert_eq!((west.x, west.y), (0, 0));
    assert_eq!((east.x, east.y), (1, 0));
    assert_eq!(east.id(), TileId(5));
}

#[test]
fn test_world_edges_clamp_into_last_tile() {
    let tile = to_tile(90.0, 180.0, 4).unwrap();
    assert_eq!(tile.x, columns_at(4) - 1);
    assert_eq!(tile.y, rows_at(4) - 1);
}

#[test]
fn test_invalid_latitude() {
    let result = to_tile(90.5, 0.0, 10);
    assert!(matches!(result, Err(CoordError::InvalidLatitude(_))));
}

#[test]
fn test_invalid_longitude() {
    let result = to_tile(0.0, -180.1, 10);
    assert!(matches!(result, Err(CoordError::InvalidLongitude(_))));
}

#[test]
fn test_invalid_level() {
    let result = to_tile(0.0, 0.0, MAX_LEVEL + 1);
    assert!(matches!(result, Err(CoordError::InvalidLevel(_))));
}

#[test]
fn test_nan_is_rejected() {
    assert!(to_tile(f64::NAN, 0.0, 10).is_err());
    assert!(to_tile(0.0, f64::NAN, 10).is_err());
}

#[test]
fn test_tile_id_decodes_to_column_row_level() {
    let tile = TileId(23618402).tile().unwrap();
    assert_eq!(tile, HereTile { x: 2200, y: 1621, level: 12 });
    assert_eq!(TileId(23618403).tile().unwrap().x, 2201);
}

#[test]
fn test_tile_id_level() {
    assert_eq!(TileId(1).level(), Some(0));
    assert_eq!(TileId(23618402).level(), Some(12));
    // Marker bit at an odd position
    assert_eq!(TileId(2).level(), None);
    assert_eq!(TileId(0).level(), None);
}

#[test]
fn test_tile_id_with_row_beyond_grid_is_invalid() {
    // Level 1 has a single row, so y = 1 does not exist
    let id = HereTile { x: 0, y: 1, level: 1 }.id();
    assert!(matches!(id.tile(), Err(CoordError::InvalidTileId(_))));
}

#[test]
fn test_tile_id_from_str() {
    assert_eq!("23618402".parse::<TileId>().unwrap(), TileId(23618402));
    assert!(matches!(
        "berlin".parse::<TileId>(),
        Err(CoordError::MalformedTileId(_))
    ));
    assert!(matches!(
        "-5".parse::<TileId>(),
        Err(CoordError::MalformedTileId(_))
    ));
    for text in ["+23618402", " 23618402", "23618402 ", "23_618_402", ""] {
        assert!(
            matches!(text.parse::<TileId>(), Err(CoordError::MalformedTileId(_))),
            "{text:?} should be rejected"
        );
    }
    assert!(matches!(
        "2".parse::<TileId>(),
        Err(CoordError::InvalidTileId(2))
    ));
}

#[test]
fn test_quadkey_of_known_tile() {
    let tile = TileId(23618402).tile().unwrap();
    assert_eq!(tile.quadkey(), "122012031202");
    assert_eq!(HereTile::from_quadkey("122012031202").unwrap(), tile);
}

#[test]
fn test_quadkey_of_level_zero_is_empty() {
    let tile = HereTile { x: 0, y: 0, level: 0 };
    assert_eq!(tile.quadkey(), "");
    assert_eq!(HereTile::from_quadkey("").unwrap(), tile);
}

#[test]
fn test_invalid_quadkey() {
    assert!(matches!(
        HereTile::from_quadkey("1204"),
        Err(CoordError::InvalidQuadkey(_))
    ));
    let too_long = "0".repeat(usize::from(MAX_LEVEL) + 1);
    assert!(matches!(
        HereTile::from_quadkey(&too_long),
        Err(CoordError::InvalidQuadkey(_))
    ));
}

#[test]
fn test_bounds_of_known_tile() {
    let bounds = TileId(23618402).tile().unwrap().bounds();
    let size = tile_size_degrees(12);
    assert!((bounds.west - (2200.0 * size - 180.0)).abs() < 1e-9);
    assert!((bounds.south - (1621.0 * size - 90.0)).abs() < 1e-9);
    assert!((bounds.east - bounds.west - size).abs() < 1e-9);
    assert!(bounds.contains(52.5, 13.4));
}

#[test]
fn test_level_zero_bounds_clip_to_pole() {
    let bounds = HereTile { x: 0, y: 0, level: 0 }.bounds();
    assert_eq!(bounds.north, MAX_LAT);
    assert_eq!(bounds.east, MAX_LON);
}

#[test]
fn test_parent() {
    let tile = TileId(23618402).tile().unwrap();
    let parent = tile.parent().unwrap();
    assert_eq!(parent, HereTile { x: 1100, y: 810, level: 11 });
    assert!(HereTile { x: 0, y: 0, level: 0 }.parent().is_none());
}

#[test]
fn test_tile_range_inside_single_tile() {
    let size = tile_size_degrees(10);
    let west = -180.0 + 100.25 * size;
    let south = -90.0 + 50.25 * size;
    let range = tile_range(west, south, west + size / 4.0, south + size / 4.0, 10).unwrap();
    assert_eq!(range.len(), 1);
    assert_eq!((range.min_x, range.min_y), (100, 50));
}

#[test]
fn test_tile_range_includes_edge_touching_tiles() {
    // A box whose edges sit exactly on tile boundaries touches one extra
    // ring of tiles on every side.
    let size = tile_size_degrees(10);
    let west = -180.0 + 100.0 * size;
    let south = -90.0 + 50.0 * size;
    let range = tile_range(west, south, west + size, south + size, 10).unwrap();
    assert_eq!((range.min_x, range.max_x), (99, 101));
    assert_eq!((range.min_y, range.max_y), (49, 51));
    assert_eq!(range.len(), 9);
}

#[test]
fn test_tile_range_whole_world() {
    let range = tile_range(-180.0, -90.0, 180.0, 90.0, 3).unwrap();
    assert_eq!(range.len(), u64::from(columns_at(3) * rows_at(3)));
    assert_eq!(range.tiles().count() as u64, range.len());
}

#[test]
fn test_tile_range_rejects_out_of_range_input() {
    assert!(tile_range(-181.0, 0.0, 0.0, 1.0, 5).is_err());
    assert!(tile_range(0.0, 0.0, 1.0, 91.0, 5).is_err());
}

// Property-based tests using proptest
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_point_lies_in_its_tile(
            lat in -90.0..=90.0_f64,
            lng in -180.0..=180.0_f64,
            level in 0u8..=20
        ) {
            let tile = to_tile(lat, lng, level)?;
            prop_assert!(
                tile.bounds().contains(lat, lng),
                "({}, {}) not inside {} {:?}",
                lat, lng, tile, tile.bounds()
            );
        }

        #[test]
        fn test_id_roundtrip(
            x_raw in 0u32..u32::MAX,
            y_raw in 0u32..u32::MAX,
            level in 0u8..=MAX_LEVEL
        ) {
            let tile = HereTile::new(x_raw % columns_at(level), y_raw % rows_at(level), level)?;
            prop_assert_eq!(tile.id().tile()?, tile);
            prop_assert_eq!(tile.id().level(), Some(level));
        }

        #[test]
        fn test_quadkey_roundtrip(
            x_raw in 0u32..u32::MAX,
            y_raw in 0u32..u32::MAX,
            level in 0u8..=MAX_LEVEL
        ) {
            let tile = HereTile::new(x_raw % columns_at(level), y_raw % rows_at(level), level)?;
            let quadkey = tile.quadkey();
            prop_assert_eq!(quadkey.len(), usize::from(level));
            prop_assert_eq!(HereTile::from_quadkey(&quadkey)?, tile);
        }

        #[test]
        fn test_parent_contains_child(
            lat in -89.0..89.0_f64,
            lng in -179.0..179.0_f64,
            level in 2u8..=20
        ) {
            let child = to_tile(lat, lng, level)?;
            let parent = child.parent().unwrap();
            prop_assert_eq!(parent, to_tile(lat, lng, level - 1)?);
        }

        #[test]
        fn test_longitude_monotonic(
            lat in 0.0..1.0_f64,
            lng1 in -180.0..-90.0_f64,
            lng2 in -90.0..0.0_f64,
            level in 10u8..=15
        ) {
            // For fixed latitude, increasing longitude never decreases the column
            let tile1 = to_tile(lat, lng1, level)?;
            let tile2 = to_tile(lat, lng2, level)?;
            prop_assert!(tile1.x <= tile2.x);
        }
    }
}
