//! GeoJSON file source.
//!
//! Reads a FeatureCollection of LineString/MultiLineString features. Every
//! `open` re-reads and re-parses the file, so both import passes observe
//! identical data. Scalar properties (string, number, boolean) become string
//! attributes; null and structured properties are dropped.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use geo::{Coord, LineString};
use log::{debug, warn};
use serde_json::Value;

use crate::error::{ImportError, Result};
use crate::source::{LineFeature, LineSource};

/// File-backed line source over a GeoJSON FeatureCollection.
#[derive(Debug, Clone)]
pub struct GeoJsonSource {
    path: PathBuf,
}

impl GeoJsonSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_features(&self) -> Result<Vec<LineFeature>> {
        let text = fs::read_to_string(&self.path)?;
        let root: Value = serde_json::from_str(&text)?;
        let features = root.get("features").and_then(Value::as_array).ok_or_else(|| {
            ImportError::InvalidGeoJson(format!(
                "{}: missing \"features\" array",
                self.path.display()
            ))
        })?;

        let mut out = Vec::with_capacity(features.len());
        for feature in features {
            if let Some(parsed) = parse_feature(feature) {
                out.push(parsed);
            }
        }
        Ok(out)
    }
}

impl LineSource for GeoJsonSource {
    fn open(&self) -> Result<Box<dyn Iterator<Item = Result<LineFeature>> + '_>> {
        Ok(Box::new(self.read_features()?.into_iter().map(Ok)))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

fn parse_feature(feature: &Value) -> Option<LineFeature> {
    let geometry = feature.get("geometry")?;
    let parsed = match geometry.get("type").and_then(Value::as_str) {
        Some("LineString") => geometry
            .get("coordinates")
            .and_then(parse_line)
            .map(|line| vec![line]),
        Some("MultiLineString") => geometry
            .get("coordinates")
            .and_then(Value::as_array)
            .and_then(|lines| lines.iter().map(parse_line).collect::<Option<Vec<_>>>()),
        other => {
            debug!("skipping {} geometry", other.unwrap_or("null"));
            return None;
        }
    };
    let Some(paths) = parsed else {
        warn!(
            "skipping line feature with malformed coordinates (id {})",
            feature
                .pointer("/properties/osm_id")
                .map(Value::to_string)
                .unwrap_or_else(|| "unknown".to_string())
        );
        return None;
    };

    let attributes = feature
        .get("properties")
        .and_then(Value::as_object)
        .map(collect_attributes)
        .unwrap_or_default();

    Some(LineFeature::new(paths, attributes))
}

fn parse_line(coordinates: &Value) -> Option<LineString<f64>> {
    let positions = coordinates.as_array()?;
    let mut coords = Vec::with_capacity(positions.len());
    for position in positions {
        let parts = position.as_array()?;
        let x = parts.first()?.as_f64()?;
        let y = parts.get(1)?.as_f64()?;
        coords.push(Coord { x, y });
    }
    Some(LineString::from(coords))
}

fn collect_attributes(properties: &serde_json::Map<String, Value>) -> HashMap<String, String> {
    let mut attributes = HashMap::with_capacity(properties.len());
    for (key, value) in properties {
        let text = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => continue,
        };
        attributes.insert(key.clone(), text);
    }
    attributes
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": {
                    "type": "LineString",
                    "coordinates": [[106.0, 10.0], [106.1, 10.1]]
                },
                "properties": {"osm_id": 11, "road_class": "2", "name": "A", "notes": null}
            },
            {
                "type": "Feature",
                "geometry": {
                    "type": "MultiLineString",
                    "coordinates": [
                        [[106.2, 10.2], [106.3, 10.3]],
                        [[106.4, 10.4], [106.5, 10.5]]
                    ]
                },
                "properties": {"osm_id": 12, "oneway": "f"}
            },
            {
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [106.0, 10.0]},
                "properties": {"osm_id": 13}
            }
        ]
    }"#;

    fn write_sample(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_reads_line_features_and_skips_points() {
        let file = write_sample(SAMPLE);
        let source = GeoJsonSource::new(file.path());
        let features: Vec<_> = source.open().unwrap().map(|f| f.unwrap()).collect();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0].paths.len(), 1);
        assert_eq!(features[1].paths.len(), 2);
    }

    #[test]
    fn test_scalar_properties_become_strings() {
        let file = write_sample(SAMPLE);
        let source = GeoJsonSource::new(file.path());
        let features: Vec<_> = source.open().unwrap().map(|f| f.unwrap()).collect();
        assert_eq!(features[0].attribute("osm_id"), Some("11"));
        assert_eq!(features[0].attribute("road_class"), Some("2"));
        assert_eq!(features[0].attribute("name"), Some("A"));
        assert_eq!(features[0].attribute("notes"), None);
        assert_eq!(features[0].external_id(), 11);
    }

    #[test]
    fn test_reopen_rereads_file() {
        let file = write_sample(SAMPLE);
        let source = GeoJsonSource::new(file.path());
        assert_eq!(source.open().unwrap().count(), 2);
        assert_eq!(source.open().unwrap().count(), 2);
    }

    #[test]
    fn test_malformed_coordinates_skip_only_that_feature() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "geometry": {"type": "LineString"},
                    "properties": {"osm_id": 21}
                },
                {
                    "type": "Feature",
                    "geometry": {
                        "type": "LineString",
                        "coordinates": [[106.0, "ten"], [106.1, 10.1]]
                    },
                    "properties": {"osm_id": 22}
                },
                {
                    "type": "Feature",
                    "geometry": {
                        "type": "MultiLineString",
                        "coordinates": [[[106.0], [106.1, 10.1]]]
                    },
                    "properties": {"osm_id": 23}
                },
                {
                    "type": "Feature",
                    "geometry": {
                        "type": "LineString",
                        "coordinates": [[106.0, 10.0], [106.1, 10.1]]
                    },
                    "properties": {"osm_id": 24}
                }
            ]
        }"#;
        let file = write_sample(json);
        let source = GeoJsonSource::new(file.path());
        let features: Vec<_> = source.open().unwrap().map(|f| f.unwrap()).collect();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].external_id(), 24);
    }

    #[test]
    fn test_missing_features_array_is_fatal() {
        let file = write_sample(r#"{"type": "FeatureCollection"}"#);
        let source = GeoJsonSource::new(file.path());
        let err = source.open().err().expect("open should fail");
        match err {
            ImportError::InvalidGeoJson(msg) => assert!(msg.contains("features")),
            other => panic!("expected InvalidGeoJson, got {other}"),
        }
    }

    #[test]
    fn test_malformed_json_is_fatal() {
        let file = write_sample("{ not json");
        let source = GeoJsonSource::new(file.path());
        assert!(matches!(source.open(), Err(ImportError::Json(_))));
    }
}
