//! Geography targets and their resolution into tile sets.
//!
//! A [`GeographyTarget`] is the declarative "what area do I want" part of a
//! download configuration. The [`Resolver`] turns it into the concrete,
//! deduplicated set of [`TileId`]s to request from the catalog:
//!
//! ```text
//! Coordinate   ──► the one tile containing the point
//! BoundingBox  ──► every tile touching the box (antimeridian wraps)
//! TileIdList   ──► the ids themselves, validated for the level
//! CountryList  ──► every tile touching any of the countries' boundaries
//! ```

mod error;
mod resolver;

pub use error::ResolveError;
pub use resolver::Resolver;

use std::collections::BTreeSet;

use crate::config::{Catalog, Config};
use crate::coord::TileId;
use crate::geometry::{BoundingBox, GeoCoordinate};

/// Declarative description of the area to download.
#[derive(Debug, Clone, PartialEq)]
pub enum GeographyTarget {
    /// The tile containing a single point.
    Coordinate(GeoCoordinate),
    /// Every tile intersecting a box.
    BoundingBox(BoundingBox),
    /// Explicit tile ids, as written in the configuration.
    TileIdList(Vec<String>),
    /// Every tile intersecting the listed countries (ISO 3166-1 alpha-3).
    CountryList(Vec<String>),
}

impl GeographyTarget {
    /// Short name of the variant, as used in configuration files.
    pub fn kind(&self) -> &'static str {
        match self {
            GeographyTarget::Coordinate(_) => "coordinate",
            GeographyTarget::BoundingBox(_) => "bounding_box",
            GeographyTarget::TileIdList(_) => "tile_id_list",
            GeographyTarget::CountryList(_) => "country",
        }
    }
}

/// Everything the fetch stage needs: which tiles, which layers, which version.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRequest {
    pub catalog: Catalog,
    pub tiles: BTreeSet<TileId>,
    pub layers: Vec<String>,
    /// `None` means the latest catalog version, looked up at fetch time.
    pub version: Option<u64>,
}

impl ResolvedRequest {
    /// Pairs resolved tiles with the catalog, layers and version of `config`.
    pub fn for_config(config: &Config, tiles: BTreeSet<TileId>) -> Self {
        Self {
            catalog: config.catalog,
            tiles,
            layers: config.layers.clone(),
            version: config.version,
        }
    }

    /// Number of (layer, tile) requests this will issue.
    pub fn request_count(&self) -> usize {
        self.tiles.len() * self.layers.len()
    }
}
