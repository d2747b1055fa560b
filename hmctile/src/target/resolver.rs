//! Target resolver implementation.

use std::collections::BTreeSet;

use tracing::debug;

use super::{GeographyTarget, ResolveError};
use crate::coord::{TileId, MAX_LAT, MAX_LEVEL, MAX_LON, MIN_LAT, MIN_LON};
use crate::geometry::{BoundingBox, GeoCoordinate, GeometryBackend, TargetGeometry};

/// Turns [`GeographyTarget`]s into tile sets using an injected backend.
///
/// Resolution is pure: the same target and level always produce the same
/// set, and nothing is fetched or written.
#[derive(Debug, Clone)]
pub struct Resolver<B> {
    backend: B,
}

impl<B: GeometryBackend> Resolver<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Resolves a target into the tiles to fetch at `level`.
    ///
    /// # Errors
    ///
    /// * [`ResolveError::InvalidTarget`] for out-of-range or degenerate
    ///   geometry, empty lists, and malformed tile ids or country codes.
    /// * [`ResolveError::UnsupportedCountry`] when the backend has no
    ///   boundary for a country code.
    pub fn resolve(
        &self,
        target: &GeographyTarget,
        level: u8,
    ) -> Result<BTreeSet<TileId>, ResolveError> {
        if level > MAX_LEVEL {
            return Err(ResolveError::InvalidTarget(format!(
                "tiling level {level} exceeds maximum {MAX_LEVEL}"
            )));
        }

        let tiles = match target {
            GeographyTarget::Coordinate(point) => self.resolve_coordinate(point, level)?,
            GeographyTarget::BoundingBox(bbox) => self.resolve_bounding_box(bbox, level)?,
            GeographyTarget::TileIdList(ids) => resolve_tile_ids(ids, level)?,
            GeographyTarget::CountryList(codes) => self.resolve_countries(codes, level)?,
        };

        debug!(
            kind = target.kind(),
            level,
            tiles = tiles.len(),
            "Resolved target"
        );
        Ok(tiles)
    }

    fn resolve_coordinate(
        &self,
        point: &GeoCoordinate,
        level: u8,
    ) -> Result<BTreeSet<TileId>, ResolveError> {
        validate_lat("lat", point.lat)?;
        validate_lng("lng", point.lng)?;
        Ok(self
            .backend
            .tiles_intersecting(&TargetGeometry::Point(*point), level)?)
    }

    fn resolve_bounding_box(
        &self,
        bbox: &BoundingBox,
        level: u8,
    ) -> Result<BTreeSet<TileId>, ResolveError> {
        validate_lng("west", bbox.west)?;
        validate_lng("east", bbox.east)?;
        validate_lat("south", bbox.south)?;
        validate_lat("north", bbox.north)?;

        if bbox.south >= bbox.north {
            return Err(ResolveError::InvalidTarget(format!(
                "bounding box south ({}) must be less than north ({})",
                bbox.south, bbox.north
            )));
        }
        // west > east is a box crossing the antimeridian; only zero width is degenerate
        if bbox.width_degrees() <= 0.0 {
            return Err(ResolveError::InvalidTarget(format!(
                "bounding box from west {} to east {} has no width",
                bbox.west, bbox.east
            )));
        }

        Ok(self
            .backend
            .tiles_intersecting(&TargetGeometry::Box(*bbox), level)?)
    }

    fn resolve_countries(
        &self,
        codes: &[String],
        level: u8,
    ) -> Result<BTreeSet<TileId>, ResolveError> {
        if codes.is_empty() {
            return Err(ResolveError::InvalidTarget(
                "country list is empty".to_string(),
            ));
        }

        // Look every boundary up before doing any tiling work
        let mut areas = Vec::with_capacity(codes.len());
        let mut seen = BTreeSet::new();
        for raw in codes {
            let code = normalize_country_code(raw)?;
            if !seen.insert(code.clone()) {
                continue;
            }
            let area = self
                .backend
                .boundary_of(&code)
                .filter(|area| !area.0.is_empty())
                .ok_or_else(|| ResolveError::UnsupportedCountry(code.clone()))?;
            areas.push((code, area));
        }

        let mut tiles = BTreeSet::new();
        for (code, area) in areas {
            let country_tiles = self
                .backend
                .tiles_intersecting(&TargetGeometry::Area(area), level)?;
            debug!(country = %code, tiles = country_tiles.len(), "Resolved country");
            tiles.extend(country_tiles);
        }
        Ok(tiles)
    }
}

/// Validates explicit tile ids for `level` and returns them as a set.
fn resolve_tile_ids(ids: &[String], level: u8) -> Result<BTreeSet<TileId>, ResolveError> {
    if ids.is_empty() {
        return Err(ResolveError::InvalidTarget(
            "tile id list is empty".to_string(),
        ));
    }

    ids.iter()
        .map(|raw| {
            let id: TileId = raw
                .parse()
                .map_err(|e| ResolveError::InvalidTarget(format!("tile id '{raw}': {e}")))?;
            match id.level() {
                Some(found) if found == level => Ok(id),
                Some(found) => Err(ResolveError::InvalidTarget(format!(
                    "tile id {id} is at level {found}, expected level {level}"
                ))),
                None => Err(ResolveError::InvalidTarget(format!("tile id {id} has no level"))),
            }
        })
        .collect()
}

fn normalize_country_code(raw: &str) -> Result<String, ResolveError> {
    let code = raw.trim();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ResolveError::InvalidTarget(format!(
            "'{raw}' is not an ISO 3166-1 alpha-3 country code"
        )));
    }
    Ok(code.to_ascii_uppercase())
}

fn validate_lat(field: &str, value: f64) -> Result<(), ResolveError> {
    if !(MIN_LAT..=MAX_LAT).contains(&value) {
        return Err(ResolveError::InvalidTarget(format!(
            "{field} {value} is outside [{MIN_LAT}, {MAX_LAT}]"
        )));
    }
    Ok(())
}

fn validate_lng(field: &str, value: f64) -> Result<(), ResolveError> {
    if !(MIN_LON..=MAX_LON).contains(&value) {
        return Err(ResolveError::InvalidTarget(format!(
            "{field} {value} is outside [{MIN_LON}, {MAX_LON}]"
        )));
    }
    Ok(())
}
