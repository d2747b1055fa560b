//! Download configuration.
//!
//! A YAML file names the catalog, version, download method, target area and
//! layers. It is parsed once into [`ConfigFile`], validated into an
//! immutable [`Config`], and never touched again:
//!
//! ```yaml
//! catalog: HMC_RIB_2
//! version: null
//! download_method: OLP_CLI
//! target:
//!   type: bounding_box
//!   bounding_box: { west: 97.735, south: 9.591, east: 106.087, north: 20.981 }
//! layers:
//!   - topology-geometry
//! ```

mod catalog;
mod file;

pub use catalog::{Catalog, DownloadMethod};
pub use file::{
    BoundingBoxSection, ConfigFile, CoordinateSection, TargetSection, TileIdValue, VersionValue,
};

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::geometry::{BoundingBox, GeoCoordinate};
use crate::target::GeographyTarget;

/// Output directory used when the file does not name one.
pub const DEFAULT_OUTPUT_DIR: &str = "decoded";

/// File name `hmctile init` writes by default.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Errors loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The document is not valid YAML or does not have the expected shape.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The document parsed but its values are unusable.
    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("failed to serialize config: {0}")]
    Serialize(#[source] serde_yaml::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Validated download configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub catalog: Catalog,
    /// `None` selects the latest catalog version.
    pub version: Option<u64>,
    pub download_method: DownloadMethod,
    pub target: GeographyTarget,
    pub layers: Vec<String>,
    pub output_dir: PathBuf,
    pub boundaries: Option<PathBuf>,
}

impl Config {
    /// Reads and validates a configuration file.
    ///
    /// A relative `boundaries` path is taken relative to the file's directory.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_yaml_str(&text)?;

        if let (Some(boundaries), Some(parent)) = (config.boundaries.as_mut(), path.parent()) {
            if boundaries.is_relative() {
                *boundaries = parent.join(&*boundaries);
            }
        }

        debug!(
            path = %path.display(),
            catalog = %config.catalog,
            method = %config.download_method,
            target = config.target.kind(),
            layers = config.layers.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    pub fn from_yaml_str(text: &str) -> ConfigResult<Self> {
        let file: ConfigFile = serde_yaml::from_str(text)?;
        Self::try_from(file)
    }

    /// Tiling level of the configured catalog.
    pub fn tile_level(&self) -> u8 {
        self.catalog.tile_level()
    }

    /// Replaces the output directory, as the `--output-dir` flag does.
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }
}

impl TryFrom<ConfigFile> for Config {
    type Error = ConfigError;

    fn try_from(file: ConfigFile) -> ConfigResult<Self> {
        let version = file.version.as_ref().map(parse_version).transpose()?;

        if file.layers.is_empty() {
            return Err(ConfigError::Invalid("layers must not be empty".to_string()));
        }
        let layers = file
            .layers
            .iter()
            .map(|layer| {
                let layer = layer.trim();
                if layer.is_empty() {
                    Err(ConfigError::Invalid("layer names must not be blank".to_string()))
                } else {
                    Ok(layer.to_string())
                }
            })
            .collect::<ConfigResult<Vec<_>>>()?;

        Ok(Self {
            catalog: file.catalog,
            version,
            download_method: file.download_method,
            target: target_from_section(file.target),
            layers,
            output_dir: file
                .output_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            boundaries: file.boundaries,
        })
    }
}

/// Renders the sample configuration as YAML.
pub fn sample_yaml() -> ConfigResult<String> {
    serde_yaml::to_string(&ConfigFile::sample()).map_err(ConfigError::Serialize)
}

fn parse_version(value: &VersionValue) -> ConfigResult<u64> {
    match value {
        VersionValue::Number(n) => Ok(*n),
        VersionValue::Text(text) => text.trim().parse().map_err(|_| {
            ConfigError::Invalid(format!(
                "version '{text}' is not a non-negative integer"
            ))
        }),
    }
}

fn target_from_section(section: TargetSection) -> GeographyTarget {
    match section {
        TargetSection::Coordinate { coordinate } => {
            GeographyTarget::Coordinate(GeoCoordinate::new(coordinate.lat, coordinate.lng))
        }
        TargetSection::BoundingBox { bounding_box: b } => {
            GeographyTarget::BoundingBox(BoundingBox::new(b.west, b.south, b.east, b.north))
        }
        TargetSection::TileIdList { tile_ids } => {
            GeographyTarget::TileIdList(tile_ids.iter().map(TileIdValue::to_id_string).collect())
        }
        TargetSection::Country { countries } => GeographyTarget::CountryList(countries),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BBOX_CONFIG: &str = "
catalog: HMC_RIB_2
version: null
download_method: OLP_CLI
target:
  type: bounding_box
  bounding_box:
    west: 97.735
    south: 9.591
    east: 106.087
    north: 20.981
layers:
  - adas-attributes
  - topology-geometry
";

    #[test]
    fn test_parse_bounding_box_config() {
        let config = Config::from_yaml_str(BBOX_CONFIG).unwrap();
        assert_eq!(config.catalog, Catalog::HmcRib2);
        assert_eq!(config.version, None);
        assert_eq!(config.download_method, DownloadMethod::OlpCli);
        assert_eq!(
            config.target,
            GeographyTarget::BoundingBox(BoundingBox::new(97.735, 9.591, 106.087, 20.981))
        );
        assert_eq!(config.layers, vec!["adas-attributes", "topology-geometry"]);
        assert_eq!(config.output_dir, PathBuf::from("decoded"));
        assert_eq!(config.tile_level(), 12);
    }

    #[test]
    fn test_parse_coordinate_config() {
        let config = Config::from_yaml_str(
            "
catalog: HDLM_WEU_2
version: 5
download_method: DATA_SDK
target:
  type: coordinate
  coordinate: { lat: 52.5, lng: 13.4 }
layers: [lane-topology]
output_dir: /tmp/tiles
",
        )
        .unwrap();
        assert_eq!(config.version, Some(5));
        assert_eq!(config.tile_level(), 14);
        assert_eq!(
            config.target,
            GeographyTarget::Coordinate(GeoCoordinate::new(52.5, 13.4))
        );
        assert_eq!(config.output_dir, PathBuf::from("/tmp/tiles"));
    }

    #[test]
    fn test_tile_ids_accept_numbers_and_strings() {
        let config = Config::from_yaml_str(
            "
catalog: HMC_RIB_2
download_method: OLP_CLI
target:
  type: tile_id_list
  tile_ids: [23618402, '23618403']
layers: [topology-geometry]
",
        )
        .unwrap();
        assert_eq!(
            config.target,
            GeographyTarget::TileIdList(vec!["23618402".to_string(), "23618403".to_string()])
        );
    }

    #[test]
    fn test_country_target_and_string_version() {
        let config = Config::from_yaml_str(
            "
catalog: HMC_EXT_REF_2
version: '42'
download_method: DATA_SDK
target:
  type: country
  countries: [TWN, PRT]
layers: [external-reference-attributes]
boundaries: borders.geojson
",
        )
        .unwrap();
        assert_eq!(config.version, Some(42));
        assert_eq!(
            config.target,
            GeographyTarget::CountryList(vec!["TWN".to_string(), "PRT".to_string()])
        );
        assert_eq!(config.boundaries, Some(PathBuf::from("borders.geojson")));
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let text = format!("{BBOX_CONFIG}comment: unused\n");
        assert!(Config::from_yaml_str(&text).is_ok());
    }

    #[test]
    fn test_missing_required_field() {
        let text = BBOX_CONFIG.replace("download_method: OLP_CLI\n", "");
        let result = Config::from_yaml_str(&text);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_unknown_target_type() {
        let text = BBOX_CONFIG.replace("type: bounding_box", "type: polygon");
        let result = Config::from_yaml_str(&text);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_unknown_download_method() {
        let text = BBOX_CONFIG.replace("OLP_CLI", "FTP");
        assert!(matches!(
            Config::from_yaml_str(&text),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_empty_layers_are_invalid() {
        let text = "
catalog: HMC_RIB_2
download_method: OLP_CLI
target:
  type: coordinate
  coordinate: { lat: 0.0, lng: 0.0 }
layers: []
";
        assert!(matches!(
            Config::from_yaml_str(text),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_non_numeric_version_is_invalid() {
        let text = BBOX_CONFIG.replace("version: null", "version: latest");
        assert!(matches!(
            Config::from_yaml_str(&text),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_sample_parses_back() {
        let yaml = sample_yaml().unwrap();
        let config = Config::from_yaml_str(&yaml).unwrap();
        let expected = Config::from_yaml_str(BBOX_CONFIG).unwrap();
        assert!(yaml.contains("version: null"));
        assert_eq!(config.catalog, expected.catalog);
        assert_eq!(config.download_method, expected.download_method);
        assert_eq!(config.target, expected.target);
        assert_eq!(config.layers.len(), 4);
    }

    #[test]
    fn test_load_resolves_relative_boundaries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let text = format!("{BBOX_CONFIG}boundaries: borders.geojson\n");
        fs::write(&path, text).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.boundaries, Some(dir.path().join("borders.geojson")));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load(&dir.path().join("absent.yaml"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_output_dir_override() {
        let config = Config::from_yaml_str(BBOX_CONFIG)
            .unwrap()
            .with_output_dir("elsewhere");
        assert_eq!(config.output_dir, PathBuf::from("elsewhere"));
    }
}
