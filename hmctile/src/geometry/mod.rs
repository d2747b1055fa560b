//! Target geometries and the backend that maps them onto tiles.
//!
//! The resolver never does tiling math or boundary lookups itself; it asks a
//! [`GeometryBackend`]. [`HereTileBackend`] is the real implementation, tests
//! substitute their own with fake boundary data.

mod backend;
mod boundaries;

pub use backend::{footprint, tiles_intersecting_area, HereTileBackend};
pub use boundaries::{BoundaryError, CountryBoundaries};

use std::collections::BTreeSet;

use geo::MultiPolygon;

use crate::coord::{CoordError, TileId};

/// A geographic point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoCoordinate {
    pub lat: f64,
    pub lng: f64,
}

impl GeoCoordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// An axis-aligned box in degrees.
///
/// `west > east` describes a box that crosses the antimeridian.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl BoundingBox {
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// Whether the box wraps around the 180° meridian.
    pub fn crosses_antimeridian(&self) -> bool {
        self.west > self.east
    }

    /// East-west extent in degrees, measured eastward across the antimeridian
    /// for wrapped boxes.
    pub fn width_degrees(&self) -> f64 {
        if self.crosses_antimeridian() {
            (180.0 - self.west) + (self.east + 180.0)
        } else {
            self.east - self.west
        }
    }

    /// Splits the box at the antimeridian into boxes with `west <= east`.
    pub fn split_at_antimeridian(&self) -> Vec<BoundingBox> {
        if !self.crosses_antimeridian() {
            return vec![*self];
        }
        vec![
            BoundingBox::new(self.west, self.south, 180.0, self.north),
            BoundingBox::new(-180.0, self.south, self.east, self.north),
        ]
    }
}

/// Geometry handed to a [`GeometryBackend`].
#[derive(Debug, Clone, PartialEq)]
pub enum TargetGeometry {
    Point(GeoCoordinate),
    Box(BoundingBox),
    Area(MultiPolygon<f64>),
}

/// Capability the resolver depends on for all spatial work.
pub trait GeometryBackend {
    /// Returns every tile at `level` whose footprint intersects `geometry`.
    ///
    /// Intersection is inclusive: shared edges and corners count. A point
    /// always yields exactly one tile.
    fn tiles_intersecting(
        &self,
        geometry: &TargetGeometry,
        level: u8,
    ) -> Result<BTreeSet<TileId>, CoordError>;

    /// Returns the boundary of a country by ISO 3166-1 alpha-3 code.
    fn boundary_of(&self, country_code: &str) -> Option<MultiPolygon<f64>>;
}

impl<B: GeometryBackend + ?Sized> GeometryBackend for &B {
    fn tiles_intersecting(
        &self,
        geometry: &TargetGeometry,
        level: u8,
    ) -> Result<BTreeSet<TileId>, CoordError> {
        (**self).tiles_intersecting(geometry, level)
    }

    fn boundary_of(&self, country_code: &str) -> Option<MultiPolygon<f64>> {
        (**self).boundary_of(country_code)
    }
}
