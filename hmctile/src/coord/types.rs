//! Tile type definitions for the HERE tiling scheme.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Valid latitude range (the HERE grid covers the full globe, not just Web Mercator).
pub const MIN_LAT: f64 = -90.0;
pub const MAX_LAT: f64 = 90.0;

/// Valid longitude range
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Supported tiling levels.
///
/// Level 30 keeps the long key (marker bit at `2 * level`) inside 61 bits.
pub const MIN_LEVEL: u8 = 0;
pub const MAX_LEVEL: u8 = 30;

/// A tile address at a given level of the HERE tiling scheme.
///
/// At level `L` every tile is `360 / 2^L` degrees square. Column `x` counts
/// eastwards from -180°, row `y` counts northwards from -90°.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HereTile {
    /// Column, 0 at the antimeridian (west)
    pub x: u32,
    /// Row, 0 at the south pole
    pub y: u32,
    /// Tiling level (0-30)
    pub level: u8,
}

impl HereTile {
    /// Creates a tile, checking that the column and row exist at this level.
    pub fn new(x: u32, y: u32, level: u8) -> Result<Self, CoordError> {
        if level > MAX_LEVEL {
            return Err(CoordError::InvalidLevel(level));
        }
        if x >= columns_at(level) || y >= rows_at(level) {
            return Err(CoordError::TileOutOfRange { x, y, level });
        }
        Ok(Self { x, y, level })
    }

    /// Returns the long-key identifier of this tile.
    pub fn id(&self) -> TileId {
        let mut key = 0u64;
        for bit in 0..self.level {
            key |= u64::from((self.x >> bit) & 1) << (2 * bit);
            key |= u64::from((self.y >> bit) & 1) << (2 * bit + 1);
        }
        TileId(key | (1u64 << (2 * u32::from(self.level))))
    }

    /// Returns the geographic footprint of this tile.
    ///
    /// Level 0 is a single 360° square, so its northern edge lies beyond the
    /// pole; the footprint is clipped to [`MAX_LAT`].
    pub fn bounds(&self) -> TileBounds {
        let size = tile_size_degrees(self.level);
        let west = f64::from(self.x) * size + MIN_LON;
        let south = f64::from(self.y) * size + MIN_LAT;
        TileBounds {
            west,
            south,
            east: (west + size).min(MAX_LON),
            north: (south + size).min(MAX_LAT),
        }
    }

    /// Returns the tile one level up that contains this tile.
    pub fn parent(&self) -> Option<HereTile> {
        if self.level == 0 {
            return None;
        }
        Some(HereTile {
            x: self.x >> 1,
            y: self.y >> 1,
            level: self.level - 1,
        })
    }

    /// Returns the quadkey string: the Morton code as `level` base-4 digits.
    pub fn quadkey(&self) -> String {
        let morton = self.id().morton();
        (0..self.level)
            .rev()
            .map(|digit| {
                let value = (morton >> (2 * u32::from(digit))) & 0b11;
                char::from(b'0' + value as u8)
            })
            .collect()
    }

    /// Parses a quadkey string back into a tile.
    pub fn from_quadkey(quadkey: &str) -> Result<Self, CoordError> {
        if quadkey.len() > usize::from(MAX_LEVEL) {
            return Err(CoordError::InvalidQuadkey(quadkey.to_string()));
        }
        let mut morton = 0u64;
        for c in quadkey.chars() {
            let digit = c
                .to_digit(4)
                .ok_or_else(|| CoordError::InvalidQuadkey(quadkey.to_string()))?;
            morton = (morton << 2) | u64::from(digit);
        }
        // Length was checked against MAX_LEVEL above
        let level = quadkey.len() as u8;
        TileId(morton | (1u64 << (2 * u32::from(level)))).tile()
    }
}

impl fmt::Display for HereTile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.level, self.x, self.y)
    }
}

/// HERE tile identifier ("long key").
///
/// The Morton interleave of the column (even bits) and row (odd bits), with a
/// marker bit at position `2 * level` so the level can be recovered from the
/// key alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub u64);

impl TileId {
    /// Returns the level encoded in the key, or `None` for a malformed key.
    pub fn level(&self) -> Option<u8> {
        if self.0 == 0 {
            return None;
        }
        let bit_length = 64 - self.0.leading_zeros();
        // The marker bit always sits at an even position
        if (bit_length - 1) % 2 != 0 {
            return None;
        }
        let level = (bit_length - 1) / 2;
        if level > u32::from(MAX_LEVEL) {
            return None;
        }
        Some(level as u8)
    }

    /// Decodes the key into column, row and level.
    pub fn tile(&self) -> Result<HereTile, CoordError> {
        let level = self.level().ok_or(CoordError::InvalidTileId(self.0))?;
        let morton = self.morton();
        let mut x = 0u32;
        let mut y = 0u32;
        for bit in 0..level {
            x |= (((morton >> (2 * bit)) & 1) as u32) << bit;
            y |= (((morton >> (2 * bit + 1)) & 1) as u32) << bit;
        }
        HereTile::new(x, y, level).map_err(|_| CoordError::InvalidTileId(self.0))
    }

    /// Returns the key without its level marker bit.
    fn morton(&self) -> u64 {
        match self.level() {
            Some(level) => self.0 ^ (1u64 << (2 * u32::from(level))),
            None => 0,
        }
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TileId {
    type Err = CoordError;

    /// Accepts plain decimal digits only: no sign, padding or separators.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CoordError::MalformedTileId(s.to_string()));
        }
        let raw: u64 = s
            .parse()
            .map_err(|_| CoordError::MalformedTileId(s.to_string()))?;
        let id = TileId(raw);
        id.tile()?;
        Ok(id)
    }
}

/// Geographic footprint of a tile, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileBounds {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl TileBounds {
    /// Returns the center point as `(lat, lng)`.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.south + self.north) / 2.0,
            (self.west + self.east) / 2.0,
        )
    }

    /// Inclusive containment: points on the edge are inside.
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        (self.south..=self.north).contains(&lat) && (self.west..=self.east).contains(&lng)
    }
}

/// Number of tile columns at a level.
#[inline]
pub fn columns_at(level: u8) -> u32 {
    1u32 << level
}

/// Number of tile rows at a level (the grid is twice as wide as it is tall).
#[inline]
pub fn rows_at(level: u8) -> u32 {
    if level == 0 {
        1
    } else {
        1u32 << (level - 1)
    }
}

/// Edge length of a tile at a level, in degrees.
#[inline]
pub fn tile_size_degrees(level: u8) -> f64 {
    360.0 / f64::from(columns_at(level))
}

/// Errors that can occur during tile conversion.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordError {
    #[error("Invalid latitude: {0} (must be between {} and {})", MIN_LAT, MAX_LAT)]
    InvalidLatitude(f64),

    #[error("Invalid longitude: {0} (must be between {} and {})", MIN_LON, MAX_LON)]
    InvalidLongitude(f64),

    #[error("Invalid tiling level: {0} (must be between {} and {})", MIN_LEVEL, MAX_LEVEL)]
    InvalidLevel(u8),

    #[error("Tile {x}/{y} does not exist at level {level}")]
    TileOutOfRange { x: u32, y: u32, level: u8 },

    /// The key has no valid level marker bit.
    #[error("Invalid tile id: {0}")]
    InvalidTileId(u64),

    /// The text is not an unsigned integer.
    #[error("Malformed tile id: '{0}'")]
    MalformedTileId(String),

    #[error("Invalid quadkey: '{0}' (must contain only digits 0-3 and length <= {})", MAX_LEVEL)]
    InvalidQuadkey(String),
}
