//! Tiling backend built on the HERE tile grid.

use std::collections::BTreeSet;

use geo::{BoundingRect, Intersects, MultiPolygon, Rect};
use tracing::debug;

use super::{CountryBoundaries, GeometryBackend, TargetGeometry};
use crate::coord::{self, CoordError, HereTile, TileId, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

/// [`GeometryBackend`] using the HERE tiling scheme and a country boundary table.
#[derive(Debug, Clone, Default)]
pub struct HereTileBackend {
    boundaries: CountryBoundaries,
}

impl HereTileBackend {
    pub fn new(boundaries: CountryBoundaries) -> Self {
        Self { boundaries }
    }

    /// Backend with the boundary table bundled with the crate.
    pub fn with_builtin_boundaries() -> Result<Self, super::BoundaryError> {
        Ok(Self::new(CountryBoundaries::builtin()?))
    }

    pub fn boundaries(&self) -> &CountryBoundaries {
        &self.boundaries
    }
}

impl GeometryBackend for HereTileBackend {
    fn tiles_intersecting(
        &self,
        geometry: &TargetGeometry,
        level: u8,
    ) -> Result<BTreeSet<TileId>, CoordError> {
        match geometry {
            TargetGeometry::Point(point) => {
                let id = coord::tile_id_from_coordinates(point.lat, point.lng, level)?;
                Ok(BTreeSet::from([id]))
            }
            TargetGeometry::Box(bbox) => {
                let mut tiles = BTreeSet::new();
                for part in bbox.split_at_antimeridian() {
                    let range =
                        coord::tile_range(part.west, part.south, part.east, part.north, level)?;
                    tiles.extend(range.tiles().map(|tile| tile.id()));
                }
                Ok(tiles)
            }
            TargetGeometry::Area(area) => tiles_intersecting_area(area, level),
        }
    }

    fn boundary_of(&self, country_code: &str) -> Option<MultiPolygon<f64>> {
        self.boundaries.get(country_code).cloned()
    }
}

/// Tiles intersecting a polygonal area.
///
/// Candidates come from the area's bounding rectangle; each candidate footprint
/// is then tested against the polygons themselves.
pub fn tiles_intersecting_area(
    area: &MultiPolygon<f64>,
    level: u8,
) -> Result<BTreeSet<TileId>, CoordError> {
    let Some(extent) = area.bounding_rect() else {
        return Ok(BTreeSet::new());
    };

    let min = extent.min();
    let max = extent.max();
    let range = coord::tile_range(
        min.x.clamp(MIN_LON, MAX_LON),
        min.y.clamp(MIN_LAT, MAX_LAT),
        max.x.clamp(MIN_LON, MAX_LON),
        max.y.clamp(MIN_LAT, MAX_LAT),
        level,
    )?;

    debug!(
        level,
        candidates = range.len(),
        "Testing candidate tiles against area"
    );

    let tiles = range
        .tiles()
        .filter(|tile| area.intersects(&footprint(tile)))
        .map(|tile| tile.id())
        .collect();
    Ok(tiles)
}

/// A tile footprint as a `geo` rectangle (x = longitude, y = latitude).
pub fn footprint(tile: &HereTile) -> Rect<f64> {
    let bounds = tile.bounds();
    Rect::new(
        (bounds.west, bounds.south),
        (bounds.east, bounds.north),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::tile_size_degrees;
    use crate::geometry::{BoundingBox, GeoCoordinate};
    use geo::{polygon, MultiPolygon};

    fn backend() -> HereTileBackend {
        HereTileBackend::default()
    }

    #[test]
    fn test_point_yields_single_tile() {
        let tiles = backend()
            .tiles_intersecting(&TargetGeometry::Point(GeoCoordinate::new(52.5, 13.4)), 12)
            .unwrap();
        assert_eq!(tiles, BTreeSet::from([TileId(23618402)]));
    }

    #[test]
    fn test_box_crossing_antimeridian_wraps() {
        let bbox = BoundingBox::new(179.9, 10.0, -179.9, 10.1);
        let tiles = backend()
            .tiles_intersecting(&TargetGeometry::Box(bbox), 8)
            .unwrap();

        let columns: BTreeSet<u32> = tiles.iter().map(|id| id.tile().unwrap().x).collect();
        let last = coord::columns_at(8) - 1;
        assert_eq!(columns, BTreeSet::from([0, last]));
    }

    #[test]
    fn test_area_skips_tiles_outside_polygon() {
        // A right triangle spanning a 4x4 block of level-10 tiles: the tiles
        // in the far corner of its bounding box lie outside it.
        let size = tile_size_degrees(10);
        let (w, s) = (10.0 * size + 0.01, 10.0 * size + 0.01);
        let (e, n) = (w + 3.5 * size, s + 3.5 * size);
        let triangle = polygon![(x: w, y: s), (x: e, y: s), (x: w, y: n), (x: w, y: s)];
        let area = MultiPolygon::new(vec![triangle]);

        let tiles = tiles_intersecting_area(&area, 10).unwrap();
        let range = coord::tile_range(w, s, e, n, 10).unwrap();
        assert!(!tiles.is_empty());
        assert!((tiles.len() as u64) < range.len());

        for id in &tiles {
            let tile = id.tile().unwrap();
            assert!(area.intersects(&footprint(&tile)));
        }
    }

    #[test]
    fn test_area_edge_on_tile_boundary_includes_neighbour() {
        // East edge sits exactly on the line between columns 600 and 601
        let size = tile_size_degrees(10);
        let west = 600.0 * size - 180.0 + 0.1;
        let east = 601.0 * size - 180.0;
        let south = 300.0 * size - 90.0 + 0.1;
        let north = south + 0.1;
        let square = polygon![
            (x: west, y: south),
            (x: east, y: south),
            (x: east, y: north),
            (x: west, y: north),
            (x: west, y: south),
        ];

        let tiles = tiles_intersecting_area(&MultiPolygon::new(vec![square]), 10).unwrap();
        let columns: BTreeSet<u32> = tiles.iter().map(|id| id.tile().unwrap().x).collect();
        let rows: BTreeSet<u32> = tiles.iter().map(|id| id.tile().unwrap().y).collect();
        assert_eq!(columns, BTreeSet::from([600, 601]));
        assert_eq!(rows, BTreeSet::from([300]));
    }

    #[test]
    fn test_empty_area_has_no_tiles() {
        let area: MultiPolygon<f64> = MultiPolygon::new(vec![]);
        assert!(tiles_intersecting_area(&area, 12).unwrap().is_empty());
    }

    #[test]
    fn test_boundary_lookup_uses_table() {
        let backend = HereTileBackend::with_builtin_boundaries().unwrap();
        assert!(backend.boundary_of("TWN").is_some());
        assert!(backend.boundary_of("twn").is_some());
        assert!(backend.boundary_of("ZZZ").is_none());
    }
}
