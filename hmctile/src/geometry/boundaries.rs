//! Country boundary polygons keyed by ISO 3166-1 alpha-3 code.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use geo::{Coord, LineString, MultiPolygon, Polygon};
use geojson::{Feature, GeoJson, Value};
use thiserror::Error;
use tracing::debug;

/// Admin-0 outlines at 1:110m scale bundled with the crate.
const BUILTIN_BOUNDARIES: &str = include_str!("../../assets/country_boundaries.geojson");

/// Property names searched, in order, for a feature's alpha-3 code.
const CODE_PROPERTIES: [&str; 5] = ["iso_a3", "ISO_A3", "adm0_a3", "ADM0_A3", "iso3"];

/// Errors loading boundary data.
#[derive(Debug, Error)]
pub enum BoundaryError {
    #[error("failed to read boundary file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid boundary GeoJSON: {0}")]
    GeoJson(#[from] geojson::Error),

    #[error("invalid boundary feature: {0}")]
    InvalidFeature(String),
}

/// Boundary table: alpha-3 code (upper case) to polygons.
#[derive(Debug, Clone, Default)]
pub struct CountryBoundaries {
    countries: BTreeMap<String, MultiPolygon<f64>>,
}

impl CountryBoundaries {
    /// The admin-0 table shipped with the crate.
    pub fn builtin() -> Result<Self, BoundaryError> {
        Self::from_geojson_str(BUILTIN_BOUNDARIES)
    }

    /// Loads a GeoJSON file of country features.
    pub fn from_file(path: &Path) -> Result<Self, BoundaryError> {
        let text = fs::read_to_string(path).map_err(|source| BoundaryError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let boundaries = Self::from_geojson_str(&text)?;
        debug!(
            path = %path.display(),
            countries = boundaries.len(),
            "Loaded country boundaries"
        );
        Ok(boundaries)
    }

    /// Parses a FeatureCollection (or a single Feature).
    ///
    /// Features without an alpha-3 code property are ignored; several
    /// features with the same code are merged.
    pub fn from_geojson_str(text: &str) -> Result<Self, BoundaryError> {
        let features = match text.parse::<GeoJson>()? {
            GeoJson::FeatureCollection(collection) => collection.features,
            GeoJson::Feature(feature) => vec![feature],
            GeoJson::Geometry(_) => {
                return Err(BoundaryError::InvalidFeature(
                    "expected a Feature or FeatureCollection, found a bare geometry".to_string(),
                ))
            }
        };

        let mut boundaries = Self::default();
        for feature in &features {
            let Some(code) = feature_code(feature) else {
                continue;
            };
            let polygons = feature_polygons(feature, &code)?;
            boundaries.insert(&code, polygons);
        }
        Ok(boundaries)
    }

    /// Adds polygons for a country, merging with any already present.
    pub fn insert(&mut self, code: &str, polygons: MultiPolygon<f64>) {
        self.countries
            .entry(code.to_ascii_uppercase())
            .or_insert_with(|| MultiPolygon::new(Vec::new()))
            .0
            .extend(polygons.0);
    }

    /// Case-insensitive lookup.
    pub fn get(&self, code: &str) -> Option<&MultiPolygon<f64>> {
        self.countries.get(&code.to_ascii_uppercase())
    }

    /// Codes with boundary data, sorted.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.countries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }
}

fn feature_code(feature: &Feature) -> Option<String> {
    let properties = feature.properties.as_ref()?;
    CODE_PROPERTIES
        .iter()
        .filter_map(|key| properties.get(*key))
        .filter_map(|value| value.as_str())
        .map(str::trim)
        .find(|code| code.len() == 3)
        .map(str::to_ascii_uppercase)
}

fn feature_polygons(feature: &Feature, code: &str) -> Result<MultiPolygon<f64>, BoundaryError> {
    let geometry = feature
        .geometry
        .as_ref()
        .ok_or_else(|| BoundaryError::InvalidFeature(format!("{code} has no geometry")))?;

    let polygons = match &geometry.value {
        Value::Polygon(rings) => vec![polygon_from_rings(rings, code)?],
        Value::MultiPolygon(polygons) => polygons
            .iter()
            .map(|rings| polygon_from_rings(rings, code))
            .collect::<Result<Vec<_>, _>>()?,
        _ => {
            return Err(BoundaryError::InvalidFeature(format!(
                "{code} has a non-polygonal geometry, expected Polygon or MultiPolygon"
            )))
        }
    };
    Ok(MultiPolygon::new(polygons))
}

fn polygon_from_rings(rings: &[Vec<Vec<f64>>], code: &str) -> Result<Polygon<f64>, BoundaryError> {
    let mut rings = rings.iter().map(|ring| line_string_from_ring(ring, code));
    let exterior = rings
        .next()
        .ok_or_else(|| BoundaryError::InvalidFeature(format!("{code} has an empty polygon")))??;
    let interiors = rings.collect::<Result<Vec<_>, _>>()?;
    Ok(Polygon::new(exterior, interiors))
}

fn line_string_from_ring(ring: &[Vec<f64>], code: &str) -> Result<LineString<f64>, BoundaryError> {
    ring.iter()
        .map(|position| match position.as_slice() {
            [x, y, ..] => Ok(Coord { x: *x, y: *y }),
            _ => Err(BoundaryError::InvalidFeature(format!(
                "{code} has a position with fewer than two coordinates"
            ))),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(LineString::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_FEATURES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "ISO_A3": "abc" },
                "geometry": { "type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,0]]] }
            },
            {
                "type": "Feature",
                "properties": { "adm0_a3": "ABC" },
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [[[[5,5],[6,5],[6,6],[5,5]]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "name": "no code" },
                "geometry": { "type": "Polygon", "coordinates": [[[9,9],[8,9],[8,8],[9,9]]] }
            }
        ]
    }"#;

    #[test]
    fn test_builtin_table_loads() {
        let boundaries = CountryBoundaries::builtin().unwrap();
        assert!(boundaries.get("TWN").is_some());
        assert!(boundaries.get("PRT").is_some());
        assert!(boundaries.get("PHL").is_some());
        assert!(boundaries.get("SGP").is_some());
        assert!(boundaries.len() > 170);
    }

    #[test]
    fn test_features_with_same_code_are_merged() {
        let boundaries = CountryBoundaries::from_geojson_str(TWO_FEATURES).unwrap();
        assert_eq!(boundaries.len(), 1);
        assert_eq!(boundaries.get("abc").unwrap().0.len(), 2);
        assert_eq!(boundaries.codes().collect::<Vec<_>>(), vec!["ABC"]);
    }

    #[test]
    fn test_bare_geometry_is_rejected() {
        let result = CountryBoundaries::from_geojson_str(
            r#"{ "type": "Point", "coordinates": [1, 2] }"#,
        );
        assert!(matches!(result, Err(BoundaryError::InvalidFeature(_))));
    }

    #[test]
    fn test_line_geometry_is_rejected() {
        let result = CountryBoundaries::from_geojson_str(
            r#"{
                "type": "Feature",
                "properties": { "iso_a3": "XYZ" },
                "geometry": { "type": "LineString", "coordinates": [[0,0],[1,1]] }
            }"#,
        );
        assert!(matches!(result, Err(BoundaryError::InvalidFeature(_))));
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        let result = CountryBoundaries::from_geojson_str("not json");
        assert!(matches!(result, Err(BoundaryError::GeoJson(_))));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("countries.geojson");
        fs::write(&path, TWO_FEATURES).unwrap();

        let boundaries = CountryBoundaries::from_file(&path).unwrap();
        assert!(boundaries.get("ABC").is_some());

        let missing = CountryBoundaries::from_file(&dir.path().join("missing.geojson"));
        assert!(matches!(missing, Err(BoundaryError::Read { .. })));
    }
}
