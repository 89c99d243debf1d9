//! Attribute mapping: raw feature attributes → the standard edge vocabulary.
//!
//! Input keys recognized on a line feature:
//!   osm_id        stable external identifier (absent/unparsable → 0)
//!   max_width     maximum roadbed width in meters, numeric
//!   min_width     minimum roadbed width in meters, numeric
//!   province_id   top-tier region id, integer, absent → "0"
//!   district_id   mid-tier region id, integer, absent → "0"
//!   commune_id    low-tier region id, integer, absent → "0"
//!   road_class    discrete code 1-7, mapped to a highway label
//!   maxspeed      speed limit, dropped when it trims to "0"
//!   oneway        b (both) / t (against digitization) / f (forward)
//!
//! plus a configurable pass-through list copied verbatim, with a placeholder
//! substituted for absent keys so the encoding engine always sees the same
//! tag set per key.

use std::collections::BTreeMap;

use crate::error::{ImportError, Result};
use crate::source::LineFeature;

/// Label substituted when a road-class code is unrecognized or absent.
const DEFAULT_ROAD_CLASS: &str = "primary";

/// Region id substituted when an administrative tier is absent.
const ABSENT_REGION_ID: &str = "0";

/// Placeholder for configured pass-through keys missing from a feature.
const MISSING_VALUE: &str = "unnamed";

/// A mapped tag value: verbatim text or a parsed number.
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    Text(String),
    Number(f64),
}

impl TagValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TagValue::Text(s) => Some(s),
            TagValue::Number(_) => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            TagValue::Number(n) => Some(*n),
            TagValue::Text(_) => None,
        }
    }
}

impl From<&str> for TagValue {
    fn from(value: &str) -> Self {
        TagValue::Text(value.to_string())
    }
}

impl From<String> for TagValue {
    fn from(value: String) -> Self {
        TagValue::Text(value)
    }
}

impl From<f64> for TagValue {
    fn from(value: f64) -> Self {
        TagValue::Number(value)
    }
}

/// A candidate edge's mapped attribute set, as the encoding engine sees it.
#[derive(Debug, Clone, Default)]
pub struct MappedWay {
    id: i64,
    tags: BTreeMap<String, TagValue>,
}

impl MappedWay {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            tags: BTreeMap::new(),
        }
    }

    /// External identifier of the feature this way was mapped from.
    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn set_tag(&mut self, key: impl Into<String>, value: impl Into<TagValue>) {
        self.tags.insert(key.into(), value.into());
    }

    pub fn tag(&self, key: &str) -> Option<&TagValue> {
        self.tags.get(key)
    }

    /// Text value of a tag; `None` for absent or numeric tags.
    pub fn tag_str(&self, key: &str) -> Option<&str> {
        self.tags.get(key).and_then(TagValue::as_str)
    }

    /// Numeric value of a tag; `None` for absent or text tags.
    pub fn tag_f64(&self, key: &str) -> Option<f64> {
        self.tags.get(key).and_then(TagValue::as_f64)
    }

    pub fn has_tag(&self, key: &str) -> bool {
        self.tags.contains_key(key)
    }
}

/// Maps one feature's raw attributes (plus the already-sanitized edge
/// distance) to the standard vocabulary. Pure; called once per candidate
/// edge.
pub fn map_attributes(
    feature: &LineFeature,
    distance: f64,
    tags_to_copy: &[String],
) -> Result<MappedWay> {
    let id = feature.external_id();
    let mut way = MappedWay::new(id);

    way.set_tag("estimated_distance", distance);

    if let Some(raw) = feature.attribute("max_width") {
        way.set_tag("max_width", parse_numeric(id, "max_width", raw)?);
    }
    if let Some(raw) = feature.attribute("min_width") {
        way.set_tag("min_width", parse_numeric(id, "min_width", raw)?);
    }

    for key in ["province_id", "district_id", "commune_id"] {
        match feature.attribute(key) {
            Some(raw) => {
                validate_region_id(id, key, raw)?;
                way.set_tag(key, raw);
            }
            None => way.set_tag(key, ABSENT_REGION_ID),
        }
    }

    way.set_tag("highway", road_class_label(feature.attribute("road_class")));

    if let Some(raw) = feature.attribute("maxspeed") {
        if raw.trim() != "0" {
            way.set_tag("maxspeed", raw);
        }
    }

    for key in tags_to_copy {
        match feature.attribute(key) {
            Some(raw) => way.set_tag(key.as_str(), raw),
            None => way.set_tag(key.as_str(), MISSING_VALUE),
        }
    }

    if let Some(raw) = feature.attribute("oneway") {
        way.set_tag("oneway", map_oneway(id, raw)?);
    }

    Ok(way)
}

/// Road-class code → highway label. Unrecognized and absent codes fall back
/// to the default.
fn road_class_label(code: Option<&str>) -> &'static str {
    match code {
        Some("1") => "motorway",
        Some("2") => "primary",
        Some("3") => "secondary",
        Some("4") | Some("5") => "tertiary",
        Some("6") => "residential",
        Some("7") => "unclassified",
        _ => DEFAULT_ROAD_CLASS,
    }
}

/// Direction-of-travel code → normalized oneway value. `b` allows both
/// directions, `t` is one-way against the digitization direction, `f` is
/// one-way along it. Anything else is fatal.
fn map_oneway(feature_id: i64, raw: &str) -> Result<&'static str> {
    match raw.trim().to_lowercase().as_str() {
        "b" => Ok("no"),
        "t" => Ok("-1"),
        "f" => Ok("yes"),
        other => Err(ImportError::UnrecognizedOneway {
            feature_id,
            value: other.to_string(),
        }),
    }
}

/// Whitespace-tolerant float parse; malformed text is fatal.
fn parse_numeric(feature_id: i64, key: &str, raw: &str) -> Result<f64> {
    raw.trim().parse().map_err(|_| ImportError::MalformedNumber {
        feature_id,
        key: key.to_string(),
        value: raw.to_string(),
    })
}

/// Region ids must be non-negative integer text, matching what the encoding
/// engine can represent; the value itself is copied verbatim so the engine
/// sees exactly what the source held.
fn validate_region_id(feature_id: i64, key: &str, raw: &str) -> Result<()> {
    raw.parse::<u64>()
        .map(|_| ())
        .map_err(|_| ImportError::MalformedNumber {
            feature_id,
            key: key.to_string(),
            value: raw.to_string(),
        })
}
