//! On-disk shape of the YAML configuration.
//!
//! These types mirror the file one to one and are deliberately loose
//! (versions and tile ids may be numbers or strings). [`super::Config`]
//! is the validated form the rest of the crate works with.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::{Catalog, DownloadMethod};

/// Top-level document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub catalog: Catalog,
    /// Catalog version; `null` or absent means latest.
    #[serde(default)]
    pub version: Option<VersionValue>,
    pub download_method: DownloadMethod,
    pub target: TargetSection,
    pub layers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    /// GeoJSON file with country boundaries, replacing the built-in table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boundaries: Option<PathBuf>,
}

impl ConfigFile {
    /// The document written by `hmctile init`.
    pub fn sample() -> Self {
        Self {
            catalog: Catalog::HmcRib2,
            version: None,
            download_method: DownloadMethod::OlpCli,
            target: TargetSection::BoundingBox {
                bounding_box: BoundingBoxSection {
                    west: 97.735,
                    south: 9.591,
                    east: 106.087,
                    north: 20.981,
                },
            },
            layers: vec![
                "adas-attributes".to_string(),
                "topology-geometry".to_string(),
                "navigation-attributes".to_string(),
                "advanced-navigation-attributes".to_string(),
            ],
            output_dir: None,
            boundaries: None,
        }
    }
}

/// A version written either as a number or as a numeric string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VersionValue {
    Number(u64),
    Text(String),
}

/// The `target` block, discriminated by its `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TargetSection {
    Coordinate { coordinate: CoordinateSection },
    BoundingBox { bounding_box: BoundingBoxSection },
    TileIdList { tile_ids: Vec<TileIdValue> },
    Country { countries: Vec<String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinateSection {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBoxSection {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

/// A tile id written either as a number or as a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TileIdValue {
    Number(u64),
    Text(String),
}

impl TileIdValue {
    pub fn to_id_string(&self) -> String {
        match self {
            TileIdValue::Number(n) => n.to_string(),
            TileIdValue::Text(s) => s.clone(),
        }
    }
}
