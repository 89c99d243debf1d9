//! Coordinate rounding and the coordinate→role table.
//!
//! Every coordinate is rounded to 6 decimal digits before any comparison or
//! storage, held as fixed-point microdegrees so equality and hashing are
//! exact. Rounding is the sole coincidence-detection mechanism: two inputs
//! that agree through the 6th decimal digit are the same coordinate.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Junction node identifier, allocated densely starting at [`FIRST_NODE_ID`].
pub type NodeId = u32;

/// The first node id handed out by the classifier.
pub const FIRST_NODE_ID: NodeId = 1;

/// A 2D coordinate rounded to 6 decimal digits, in microdegrees.
///
/// Identity is 2D: an elevation in the input geometry plays no part in
/// coincidence detection and is not carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoundedCoord {
    lat_e6: i32,
    lon_e6: i32,
}

impl RoundedCoord {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat_e6: round_e6(lat),
            lon_e6: round_e6(lon),
        }
    }

    pub fn lat(&self) -> f64 {
        self.lat_e6 as f64 * 1e-6
    }

    pub fn lon(&self) -> f64 {
        self.lon_e6 as f64 * 1e-6
    }
}

impl From<geo::Coord<f64>> for RoundedCoord {
    fn from(c: geo::Coord<f64>) -> Self {
        Self::new(c.y, c.x)
    }
}

fn round_e6(degrees: f64) -> i32 {
    (degrees * 1e6).round() as i32
}

/// Role of a rounded coordinate within the network being built.
///
/// Transitions only move forward: `Unclassified → Pillar → Node`, or
/// directly `Unclassified → Node`. A coordinate never reverts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordState {
    /// Not seen yet, or seen only as an unconfirmed interior point.
    Unclassified,
    /// Interior shape point of exactly one line so far.
    Pillar,
    /// Junction node with its allocated id.
    Node(NodeId),
}

/// Coordinate→role table populated by the junction detection pass.
///
/// Sized proportionally to the number of distinct coordinates in the input;
/// built once per import run and dropped when edge assembly finishes.
#[derive(Debug, Default)]
pub struct CoordClassifier {
    states: FxHashMap<RoundedCoord, CoordState>,
    next_node: NodeId,
}

impl CoordClassifier {
    pub fn new() -> Self {
        Self {
            states: FxHashMap::default(),
            next_node: FIRST_NODE_ID,
        }
    }

    /// Current role of a coordinate; unseen coordinates are `Unclassified`.
    pub fn state(&self, coord: &RoundedCoord) -> CoordState {
        self.states
            .get(coord)
            .copied()
            .unwrap_or(CoordState::Unclassified)
    }

    /// Marks a coordinate as a pillar. Never downgrades an existing role.
    pub fn mark_pillar(&mut self, coord: RoundedCoord) {
        self.states.entry(coord).or_insert(CoordState::Pillar);
    }

    /// Returns the coordinate's node id, allocating the next sequential id
    /// if it is not a node yet.
    pub fn ensure_node(&mut self, coord: RoundedCoord) -> NodeId {
        if let CoordState::Node(id) = self.state(&coord) {
            return id;
        }
        let id = self.next_node;
        self.next_node += 1;
        self.states.insert(coord, CoordState::Node(id));
        id
    }

    /// Number of junction nodes allocated so far.
    pub fn node_count(&self) -> u32 {
        self.next_node - FIRST_NODE_ID
    }

    /// Number of distinct coordinates seen so far.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounding_beyond_sixth_digit_is_identical() {
        let a = RoundedCoord::new(10.1234561, 106.7654329);
        let b = RoundedCoord::new(10.1234564, 106.7654327);
        assert_eq!(a, b);
    }

    #[test]
    fn test_sixth_digit_distinguishes() {
        let a = RoundedCoord::new(10.123456, 106.765432);
        let b = RoundedCoord::new(10.123457, 106.765432);
        assert_ne!(a, b);
    }

    #[test]
    fn test_lat_lon_round_trip() {
        let c = RoundedCoord::new(21.028511, 105.804817);
        assert!((c.lat() - 21.028511).abs() < 1e-9);
        assert!((c.lon() - 105.804817).abs() < 1e-9);
    }

    #[test]
    fn test_from_geo_coord_swaps_axes() {
        let c = RoundedCoord::from(geo::Coord {
            x: 105.804817,
            y: 21.028511,
        });
        assert!((c.lon() - 105.804817).abs() < 1e-9);
        assert!((c.lat() - 21.028511).abs() < 1e-9);
    }

    #[test]
    fn test_unseen_is_unclassified() {
        let classifier = CoordClassifier::new();
        let c = RoundedCoord::new(1.0, 2.0);
        assert_eq!(classifier.state(&c), CoordState::Unclassified);
    }

    #[test]
    fn test_node_ids_dense_from_one() {
        let mut classifier = CoordClassifier::new();
        let a = RoundedCoord::new(1.0, 1.0);
        let b = RoundedCoord::new(2.0, 2.0);
        assert_eq!(classifier.ensure_node(a), 1);
        assert_eq!(classifier.ensure_node(b), 2);
        assert_eq!(classifier.node_count(), 2);
    }

    #[test]
    fn test_ensure_node_is_idempotent() {
        let mut classifier = CoordClassifier::new();
        let c = RoundedCoord::new(1.0, 1.0);
        let first = classifier.ensure_node(c);
        let second = classifier.ensure_node(c);
        assert_eq!(first, second);
        assert_eq!(classifier.node_count(), 1);
    }

    #[test]
    fn test_pillar_promoted_to_node() {
        let mut classifier = CoordClassifier::new();
        let c = RoundedCoord::new(1.0, 1.0);
        classifier.mark_pillar(c);
        assert_eq!(classifier.state(&c), CoordState::Pillar);
        let id = classifier.ensure_node(c);
        assert_eq!(classifier.state(&c), CoordState::Node(id));
    }

    #[test]
    fn test_mark_pillar_never_downgrades() {
        let mut classifier = CoordClassifier::new();
        let c = RoundedCoord::new(1.0, 1.0);
        let id = classifier.ensure_node(c);
        classifier.mark_pillar(c);
        assert_eq!(classifier.state(&c), CoordState::Node(id));
    }

    #[test]
    fn test_same_coordinate_two_sources_same_id() {
        let mut classifier = CoordClassifier::new();
        let from_line_a = RoundedCoord::new(10.762622, 106.660172);
        let from_line_b = RoundedCoord::new(10.7626224, 106.6601716);
        let id_a = classifier.ensure_node(from_line_a);
        let id_b = classifier.ensure_node(from_line_b);
        assert_eq!(id_a, id_b);
    }
}
