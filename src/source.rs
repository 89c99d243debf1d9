//! Line feature input abstraction.
//!
//! The import runs two full scans over the same data. A [`LineSource`] is
//! therefore opened once per pass; each `open` must yield the complete
//! feature sequence from the start. Dropping the returned iterator is the
//! deterministic close.

use std::collections::HashMap;

use geo::LineString;

use crate::error::Result;

/// One input road: its coordinate sequences plus named attributes.
///
/// A single feature may contribute several disjoint sequences
/// (MultiLineString geometry); each is walked independently.
#[derive(Debug, Clone)]
pub struct LineFeature {
    pub paths: Vec<LineString<f64>>,
    pub attributes: HashMap<String, String>,
}

impl LineFeature {
    pub fn new(paths: Vec<LineString<f64>>, attributes: HashMap<String, String>) -> Self {
        Self { paths, attributes }
    }

    /// Attribute value for `key`, if present.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Stable external identifier parsed from the `osm_id` attribute.
    /// Absent or unparsable ids degrade to 0 without error.
    pub fn external_id(&self) -> i64 {
        self.attribute("osm_id")
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(0)
    }
}

/// Forward-only source of line features, opened fresh for every pass.
pub trait LineSource {
    /// Opens a new scan over the full feature sequence.
    fn open(&self) -> Result<Box<dyn Iterator<Item = Result<LineFeature>> + '_>>;

    /// Human-readable origin, used in logs and error messages.
    fn describe(&self) -> String;
}

/// In-memory source; the substitution fixture for tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    features: Vec<LineFeature>,
}

impl MemorySource {
    pub fn new(features: Vec<LineFeature>) -> Self {
        Self { features }
    }
}

impl LineSource for MemorySource {
    fn open(&self) -> Result<Box<dyn Iterator<Item = Result<LineFeature>> + '_>> {
        Ok(Box::new(self.features.iter().cloned().map(Ok)))
    }

    fn describe(&self) -> String {
        format!("memory source ({} features)", self.features.len())
    }
}
