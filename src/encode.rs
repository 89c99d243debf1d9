//! Encoding engine: mapped attributes → 64-bit edge flags.
//!
//! Flag layout used by [`StandardEncoder`]:
//!
//! ```text
//! bit  0        forward access
//! bit  1        reverse access
//! bits 2-4      road class code (1-6, see below)
//! bits 8-15     speed in km/h
//! bits 16-31    district id
//! bits 32-47    commune id
//! bits 48-63    province id
//! ```
//!
//! Road class codes: motorway=1, primary=2, secondary=3, tertiary=4,
//! residential=5, unclassified=6. Region ids saturate at 16 bits.

use serde::{Deserialize, Serialize};

use crate::mapper::MappedWay;

/// Accept/encode gate applied to every candidate edge.
pub trait EncodingEngine {
    /// Whether this way belongs in the graph at all.
    fn accept(&self, way: &MappedWay) -> bool;

    /// Packs the mapped attributes into flags. Empty flags mean reject.
    fn encode(&self, way: &MappedWay) -> EdgeFlags;
}

/// Opaque encoded edge attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EdgeFlags(u64);

impl EdgeFlags {
    pub const EMPTY: EdgeFlags = EdgeFlags(0);

    pub fn new(bits: u64) -> Self {
        EdgeFlags(bits)
    }

    pub fn bits(self) -> u64 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

const ACCESS_FWD: u64 = 1;
const ACCESS_REV: u64 = 1 << 1;
const CLASS_SHIFT: u32 = 2;
const SPEED_SHIFT: u32 = 8;
const DISTRICT_SHIFT: u32 = 16;
const COMMUNE_SHIFT: u32 = 32;
const PROVINCE_SHIFT: u32 = 48;
const REGION_MASK: u64 = 0xFFFF;

/// Default encoder over the mapped vocabulary: access/oneway, road class,
/// speed and the three administrative tiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardEncoder;

impl StandardEncoder {
    pub fn new() -> Self {
        StandardEncoder
    }
}

impl EncodingEngine for StandardEncoder {
    fn accept(&self, way: &MappedWay) -> bool {
        way.tag_str("highway").and_then(class_code).is_some()
    }

    fn encode(&self, way: &MappedWay) -> EdgeFlags {
        let highway = match way.tag_str("highway") {
            Some(label) => label,
            None => return EdgeFlags::EMPTY,
        };
        let class = match class_code(highway) {
            Some(code) => code,
            None => return EdgeFlags::EMPTY,
        };

        let (fwd, rev) = match way.tag_str("oneway") {
            Some("yes") => (true, false),
            Some("-1") => (false, true),
            _ => (true, true),
        };

        let mut bits = 0u64;
        if fwd {
            bits |= ACCESS_FWD;
        }
        if rev {
            bits |= ACCESS_REV;
        }
        bits |= class << CLASS_SHIFT;
        bits |= speed_kmh(way, highway) << SPEED_SHIFT;
        bits |= region_bits(way, "district_id") << DISTRICT_SHIFT;
        bits |= region_bits(way, "commune_id") << COMMUNE_SHIFT;
        bits |= region_bits(way, "province_id") << PROVINCE_SHIFT;
        EdgeFlags(bits)
    }
}

fn class_code(label: &str) -> Option<u64> {
    match label {
        "motorway" => Some(1),
        "primary" => Some(2),
        "secondary" => Some(3),
        "tertiary" => Some(4),
        "residential" => Some(5),
        "unclassified" => Some(6),
        _ => None,
    }
}

/// Speed limit in km/h: the `maxspeed` tag when it parses to a positive
/// number, else a per-class default.
fn speed_kmh(way: &MappedWay, highway: &str) -> u64 {
    let tagged = way
        .tag_str("maxspeed")
        .and_then(|raw| raw.trim().parse::<f64>().ok())
        .filter(|speed| *speed > 0.0);

    let speed = tagged.unwrap_or_else(|| default_speed(highway));
    speed.round().clamp(1.0, 255.0) as u64
}

fn default_speed(highway: &str) -> f64 {
    match highway {
        "motorway" => 120.0,
        "primary" => 80.0,
        "secondary" => 60.0,
        "tertiary" => 50.0,
        "residential" => 30.0,
        _ => 50.0,
    }
}

fn region_bits(way: &MappedWay, key: &str) -> u64 {
    way.tag_str(key)
        .and_then(|raw| raw.parse::<u64>().ok())
        .map(|id| id.min(REGION_MASK))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn way(tags: &[(&str, &str)]) -> MappedWay {
        let mut way = MappedWay::new(1);
        for (key, value) in tags {
            way.set_tag(*key, *value);
        }
        way
    }

    #[test]
    fn test_accepts_known_labels_only() {
        let encoder = StandardEncoder::new();
        assert!(encoder.accept(&way(&[("highway", "primary")])));
        assert!(encoder.accept(&way(&[("highway", "motorway")])));
        assert!(!encoder.accept(&way(&[("highway", "footway")])));
        assert!(!encoder.accept(&way(&[])));
    }

    #[test]
    fn test_both_directions_by_default() {
        let flags = StandardEncoder::new().encode(&way(&[("highway", "primary")]));
        assert_eq!(flags.bits() & ACCESS_FWD, ACCESS_FWD);
        assert_eq!(flags.bits() & ACCESS_REV, ACCESS_REV);
    }

    #[test]
    fn test_oneway_forward_clears_reverse() {
        let flags =
            StandardEncoder::new().encode(&way(&[("highway", "primary"), ("oneway", "yes")]));
        assert_eq!(flags.bits() & ACCESS_FWD, ACCESS_FWD);
        assert_eq!(flags.bits() & ACCESS_REV, 0);
    }

    #[test]
    fn test_oneway_reverse_clears_forward() {
        let flags =
            StandardEncoder::new().encode(&way(&[("highway", "primary"), ("oneway", "-1")]));
        assert_eq!(flags.bits() & ACCESS_FWD, 0);
        assert_eq!(flags.bits() & ACCESS_REV, ACCESS_REV);
    }

    #[test]
    fn test_class_code_packed() {
        let flags = StandardEncoder::new().encode(&way(&[("highway", "residential")]));
        assert_eq!((flags.bits() >> CLASS_SHIFT) & 0x7, 5);
    }

    #[test]
    fn test_speed_from_maxspeed_else_default() {
        let encoder = StandardEncoder::new();
        let tagged = encoder.encode(&way(&[("highway", "primary"), ("maxspeed", "90")]));
        assert_eq!((tagged.bits() >> SPEED_SHIFT) & 0xFF, 90);

        let defaulted = encoder.encode(&way(&[("highway", "residential")]));
        assert_eq!((defaulted.bits() >> SPEED_SHIFT) & 0xFF, 30);

        let unparsable = encoder.encode(&way(&[("highway", "primary"), ("maxspeed", "fast")]));
        assert_eq!((unparsable.bits() >> SPEED_SHIFT) & 0xFF, 80);
    }

    #[test]
    fn test_region_ids_packed_and_saturated() {
        let flags = StandardEncoder::new().encode(&way(&[
            ("highway", "primary"),
            ("district_id", "776"),
            ("commune_id", "27100"),
            ("province_id", "90000"),
        ]));
        assert_eq!((flags.bits() >> DISTRICT_SHIFT) & REGION_MASK, 776);
        assert_eq!((flags.bits() >> COMMUNE_SHIFT) & REGION_MASK, 27100);
        assert_eq!((flags.bits() >> PROVINCE_SHIFT) & REGION_MASK, 0xFFFF);
    }

    #[test]
    fn test_unknown_highway_encodes_empty() {
        let flags = StandardEncoder::new().encode(&way(&[("highway", "construction")]));
        assert!(flags.is_empty());
        assert!(EdgeFlags::EMPTY.is_empty());
    }
}
