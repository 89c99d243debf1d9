//! Junction detection: the first full scan over the line features.
//!
//! Classifies every rounded coordinate. Sequence endpoints and coordinates
//! revisited across sequences become junction nodes with dense ids; interior
//! points seen once are pillars. Emits no edges.

use log::info;
use rustc_hash::FxHashSet;

use crate::coord::{CoordClassifier, CoordState, RoundedCoord};
use crate::error::{ImportError, Result};
use crate::graph::GraphStorage;
use crate::source::LineSource;

const PROGRESS_INTERVAL: u64 = 100_000;

/// First pass: discovers every junction node.
///
/// Every allocated node is recorded in `storage` together with its
/// coordinate. Returns the populated classifier for edge assembly, or
/// `EmptyDataset` when the source yielded no usable geometry.
pub fn detect_junctions<S, G>(source: &S, storage: &mut G) -> Result<CoordClassifier>
where
    S: LineSource,
    G: GraphStorage,
{
    let mut classifier = CoordClassifier::new();
    let mut seen: FxHashSet<RoundedCoord> = FxHashSet::default();
    let mut processed: u64 = 0;

    for feature in source.open()? {
        let feature = feature?;
        for path in &feature.paths {
            // A repeat inside one sequence (duplicate point, closed ring)
            // must not promote its coordinate.
            seen.clear();
            let len = path.0.len();
            for (i, raw) in path.coords().enumerate() {
                let point = RoundedCoord::from(*raw);
                if !seen.insert(point) {
                    continue;
                }

                match classifier.state(&point) {
                    CoordState::Node(_) => continue,
                    state => {
                        if i == 0 || i + 1 == len || state == CoordState::Pillar {
                            // First or last point of the sequence, or already
                            // seen inside another sequence.
                            let node = classifier.ensure_node(point);
                            storage.add_node(node, point);
                        } else {
                            classifier.mark_pillar(point);
                        }
                    }
                }

                processed += 1;
                if processed % PROGRESS_INTERVAL == 0 {
                    info!(
                        "{} coordinates classified, {} distinct",
                        processed,
                        classifier.len()
                    );
                }
            }
        }
    }

    if classifier.node_count() == 0 {
        return Err(ImportError::EmptyDataset {
            origin: source.describe(),
        });
    }

    info!("junction detection found {} nodes", classifier.node_count());
    Ok(classifier)
}
