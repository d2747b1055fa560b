//! Coordinate conversion module
//!
//! Provides conversions between geographic coordinates (latitude/longitude)
//! and tiles of the HERE tiling scheme: column/row addresses, long-key tile
//! ids and quadkey strings.

mod types;

pub use types::{
    columns_at, rows_at, tile_size_degrees, CoordError, HereTile, TileBounds, TileId, MAX_LAT,
    MAX_LEVEL, MAX_LON, MIN_LAT, MIN_LEVEL, MIN_LON,
};

/// Converts geographic coordinates to the tile containing them.
///
/// Points on a shared tile edge belong to the tile to their north-east;
/// the eastern and northern edges of the world clamp into the last
/// column and row.
///
/// # Arguments
///
/// * `lat` - Latitude in degrees (-90.0 to 90.0)
/// * `lng` - Longitude in degrees (-180.0 to 180.0)
/// * `level` - Tiling level (0 to 30)
#[inline]
pub fn to_tile(lat: f64, lng: f64, level: u8) -> Result<HereTile, CoordError> {
    validate_lat(lat)?;
    validate_lng(lng)?;
    validate_level(level)?;

    let size = tile_size_degrees(level);
    let x = column_floor(lng, size).min(columns_at(level) - 1);
    let y = row_floor(lat, size).min(rows_at(level) - 1);

    Ok(HereTile { x, y, level })
}

/// Converts geographic coordinates to the id of the tile containing them.
#[inline]
pub fn tile_id_from_coordinates(lat: f64, lng: f64, level: u8) -> Result<TileId, CoordError> {
    to_tile(lat, lng, level).map(|tile| tile.id())
}

/// Returns the range of tiles whose footprint intersects the given box.
///
/// Intersection is inclusive: a tile that only shares an edge or corner with
/// the box is part of the range. The box must not cross the antimeridian
/// (`west <= east`, `south <= north`).
pub fn tile_range(
    west: f64,
    south: f64,
    east: f64,
    north: f64,
    level: u8,
) -> Result<TileRange, CoordError> {
    validate_lng(west)?;
    validate_lng(east)?;
    validate_lat(south)?;
    validate_lat(north)?;
    validate_level(level)?;

    let size = tile_size_degrees(level);
    let max_x = columns_at(level) - 1;
    let max_y = rows_at(level) - 1;

    Ok(TileRange {
        level,
        min_x: column_ceil(west, size).saturating_sub(1).min(max_x),
        max_x: column_floor(east, size).min(max_x),
        min_y: row_ceil(south, size).saturating_sub(1).min(max_y),
        max_y: row_floor(north, size).min(max_y),
    })
}

/// A rectangular block of tiles at one level, bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRange {
    pub level: u8,
    pub min_x: u32,
    pub max_x: u32,
    pub min_y: u32,
    pub max_y: u32,
}

impl TileRange {
    /// Number of tiles in the range.
    pub fn len(&self) -> u64 {
        if self.is_empty() {
            return 0;
        }
        u64::from(self.max_x - self.min_x + 1) * u64::from(self.max_y - self.min_y + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    /// Iterates the tiles row by row, south to north.
    pub fn tiles(self) -> impl Iterator<Item = HereTile> {
        let TileRange {
            level,
            min_x,
            max_x,
            min_y,
            max_y,
        } = self;
        (min_y..=max_y).flat_map(move |y| (min_x..=max_x).map(move |x| HereTile { x, y, level }))
    }
}

fn validate_lat(lat: f64) -> Result<(), CoordError> {
    if !(MIN_LAT..=MAX_LAT).contains(&lat) {
        return Err(CoordError::InvalidLatitude(lat));
    }
    Ok(())
}

fn validate_lng(lng: f64) -> Result<(), CoordError> {
    if !(MIN_LON..=MAX_LON).contains(&lng) {
        return Err(CoordError::InvalidLongitude(lng));
    }
    Ok(())
}

fn validate_level(level: u8) -> Result<(), CoordError> {
    if level > MAX_LEVEL {
        return Err(CoordError::InvalidLevel(level));
    }
    Ok(())
}

// The offsets below are non-negative once the inputs are validated, so the
// float-to-int casts never saturate at zero by accident.

fn column_floor(lng: f64, size: f64) -> u32 {
    ((lng - MIN_LON) / size).floor() as u32
}

fn column_ceil(lng: f64, size: f64) -> u32 {
    ((lng - MIN_LON) / size).ceil() as u32
}

fn row_floor(lat: f64, size: f64) -> u32 {
    ((lat - MIN_LAT) / size).floor() as u32
}

fn row_ceil(lat: f64, size: f64) -> u32 {
    ((lat - MIN_LAT) / size).ceil() as u32
}

#[cfg(test)]
mod tests;
