//! Edge assembly: the second full scan over the line features.
//!
//! Re-walks every coordinate sequence against the classifier built by
//! junction detection, splitting it into candidate edges at junction nodes.
//! Each candidate is mapped and handed to the emitter; the classifier is
//! consumed by the pass and dropped when it returns.

use log::{info, warn};

use crate::coord::{CoordClassifier, CoordState, RoundedCoord};
use crate::emit::{EdgeEmitter, EdgeObserver};
use crate::encode::EncodingEngine;
use crate::error::Result;
use crate::geo::way_length;
use crate::graph::GraphStorage;
use crate::import::ImportConfig;
use crate::mapper::map_attributes;
use crate::source::LineSource;

const PROGRESS_INTERVAL: u64 = 1_000_000;

/// Counters accumulated across the edge assembly pass.
#[derive(Debug, Default, Clone, Copy)]
pub struct AssembleStats {
    /// Candidate edges walked out of the geometry, committed or not.
    pub candidate_edges: u64,
    /// Candidates that passed the encoding gate and reached storage.
    pub committed_edges: u64,
    /// Degenerate distances replaced by the configured floor.
    pub floored_distances: u64,
    /// NaN distances replaced by the configured fallback.
    pub nan_distances: u64,
}

/// Second pass: splits every sequence into edges at junction nodes.
///
/// Requires a fresh scan from `source`; the classifier is taken by value
/// and released when the pass completes.
pub fn assemble_edges<S, E, G>(
    source: &S,
    classifier: CoordClassifier,
    config: &ImportConfig,
    encoding: &E,
    storage: &mut G,
    observers: &mut [Box<dyn EdgeObserver>],
) -> Result<AssembleStats>
where
    S: LineSource,
    E: EncodingEngine,
    G: GraphStorage,
{
    let mut emitter = EdgeEmitter::new(encoding, storage, observers);
    let mut stats = AssembleStats::default();

    for feature in source.open()? {
        let feature = feature?;
        for path in &feature.paths {
            let mut start_node = None;
            let mut pillars: Vec<RoundedCoord> = Vec::new();

            for raw in path.coords() {
                let point = RoundedCoord::from(*raw);
                let Some(from) = start_node else {
                    match classifier.state(&point) {
                        CoordState::Node(id) => start_node = Some((id, point)),
                        // Unreachable when both passes scan the same data;
                        // a live source that changed between opens gets its
                        // sequence dropped instead of garbage node ids.
                        _ => {
                            warn!(
                                "sequence head {},{} is not a junction node, \
                                 skipping sequence of feature {}",
                                point.lat(),
                                point.lon(),
                                feature.external_id()
                            );
                            break;
                        }
                    };
                    continue;
                };

                match classifier.state(&point) {
                    CoordState::Node(to) => {
                        let raw_length = way_length(from.1, &pillars, point);
                        let distance =
                            sanitize_distance(raw_length, feature.external_id(), config, &mut stats);
                        let way = map_attributes(&feature, distance, &config.tags_to_copy)?;
                        if emitter.emit(from.0, to, &way, distance, &pillars).is_some() {
                            stats.committed_edges += 1;
                        }

                        stats.candidate_edges += 1;
                        if stats.candidate_edges % PROGRESS_INTERVAL == 0 {
                            info!("{} candidate edges assembled", stats.candidate_edges);
                        }

                        start_node = Some((to, point));
                        pillars.clear();
                    }
                    _ => pillars.push(point),
                }
            }
        }
    }

    info!(
        "edge assembly committed {} of {} candidates",
        stats.committed_edges, stats.candidate_edges
    );
    Ok(stats)
}

/// Degenerate and defect handling for a computed edge length.
///
/// The floor replaces near-zero sums (two paths that should have crossed in
/// one identical point often end up in two very close ones). NaN is a defect
/// in the input or the arithmetic; it is substituted, logged and counted
/// rather than aborting the run. The floor comparison runs first, so a NaN
/// falls through it and is caught by the second check.
fn sanitize_distance(
    raw: f64,
    feature_id: i64,
    config: &ImportConfig,
    stats: &mut AssembleStats,
) -> f64 {
    let mut distance = raw;

    if distance < config.distance_floor_m {
        stats.floored_distances += 1;
        distance = config.distance_floor_m;
    }

    if distance.is_nan() {
        warn!(
            "illegal edge distance in feature {feature_id}, reset to {}m",
            config.nan_fallback_m
        );
        stats.nan_distances += 1;
        distance = config.nan_fallback_m;
    }

    distance
}
