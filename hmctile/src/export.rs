//! GeoJSON export of resolved tile sets, for checking a target on a map.

use std::fs;
use std::path::{Path, PathBuf};

use geojson::{Feature, FeatureCollection, GeoJson, Geometry, JsonObject, JsonValue, Value};
use thiserror::Error;
use tracing::info;

use crate::coord::{CoordError, HereTile, TileId};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Coord(#[from] CoordError),

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// One Polygon feature per tile, with `tile_id`, `level`, `x`, `y` and
/// `quadkey` properties.
pub fn tiles_to_feature_collection<'a>(
    tiles: impl IntoIterator<Item = &'a TileId>,
) -> Result<FeatureCollection, CoordError> {
    let features = tiles
        .into_iter()
        .map(|id| id.tile().map(|tile| tile_feature(*id, &tile)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}

/// Writes the tiles as a GeoJSON FeatureCollection file.
pub fn write_tiles_geojson<'a>(
    path: &Path,
    tiles: impl IntoIterator<Item = &'a TileId>,
) -> Result<(), ExportError> {
    let collection = tiles_to_feature_collection(tiles)?;
    let count = collection.features.len();
    let text = GeoJson::FeatureCollection(collection).to_string();

    fs::write(path, text).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), tiles = count, "Wrote tile GeoJSON");
    Ok(())
}

fn tile_feature(id: TileId, tile: &HereTile) -> Feature {
    let b = tile.bounds();
    let ring = vec![
        vec![b.west, b.south],
        vec![b.east, b.south],
        vec![b.east, b.north],
        vec![b.west, b.north],
        vec![b.west, b.south],
    ];

    let mut properties = JsonObject::new();
    properties.insert("tile_id".to_string(), JsonValue::from(id.0));
    properties.insert("level".to_string(), JsonValue::from(tile.level));
    properties.insert("x".to_string(), JsonValue::from(tile.x));
    properties.insert("y".to_string(), JsonValue::from(tile.y));
    properties.insert("quadkey".to_string(), JsonValue::from(tile.quadkey()));

    Feature {
        bbox: Some(vec![b.west, b.south, b.east, b.north]),
        geometry: Some(Geometry::new(Value::Polygon(vec![ring]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_properties() {
        let tiles = [TileId(23618402)];
        let collection = tiles_to_feature_collection(&tiles).unwrap();
        assert_eq!(collection.features.len(), 1);

        let feature = &collection.features[0];
        let properties = feature.properties.as_ref().unwrap();
        assert_eq!(properties["tile_id"], JsonValue::from(23618402u64));
        assert_eq!(properties["level"], JsonValue::from(12));
        assert_eq!(properties["x"], JsonValue::from(2200));
        assert_eq!(properties["y"], JsonValue::from(1621));
        assert_eq!(properties["quadkey"], JsonValue::from("122012031202"));

        match &feature.geometry.as_ref().unwrap().value {
            Value::Polygon(rings) => {
                assert_eq!(rings.len(), 1);
                assert_eq!(rings[0].len(), 5);
                assert_eq!(rings[0][0], rings[0][4]);
            }
            other => panic!("expected polygon, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_tile_id() {
        let tiles = [TileId(0)];
        assert!(tiles_to_feature_collection(&tiles).is_err());
    }

    #[test]
    fn test_write_file_parses_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiles.geojson");
        let tiles = [TileId(23618402), TileId(23618403)];

        write_tiles_geojson(&path, &tiles).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        match text.parse::<GeoJson>().unwrap() {
            GeoJson::FeatureCollection(collection) => assert_eq!(collection.features.len(), 2),
            other => panic!("expected feature collection, got {:?}", other),
        }
    }
}
