//! Import driver: configuration plus the two-pass run.

use log::info;

use crate::assemble::assemble_edges;
use crate::emit::EdgeObserver;
use crate::encode::EncodingEngine;
use crate::error::Result;
use crate::graph::GraphStorage;
use crate::junctions::detect_junctions;
use crate::source::LineSource;

/// Tunable parameters of an import run.
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Attribute names copied verbatim onto every mapped way.
    pub tags_to_copy: Vec<String>,
    /// Minimum edge distance in meters; substituted for degenerate edges.
    pub distance_floor_m: f64,
    /// Distance in meters substituted when a computed length is NaN.
    pub nan_fallback_m: f64,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            tags_to_copy: Vec::new(),
            distance_floor_m: 0.0001,
            nan_fallback_m: 1.0,
        }
    }
}

/// Counters reported after a completed run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportSummary {
    pub nodes: u32,
    pub candidate_edges: u64,
    pub committed_edges: u64,
    pub floored_distances: u64,
    pub nan_distances: u64,
}

/// Owns the collaborators of one import run and executes both passes.
pub struct Importer<E, G> {
    config: ImportConfig,
    encoding: E,
    storage: G,
    observers: Vec<Box<dyn EdgeObserver>>,
}

impl<E: EncodingEngine, G: GraphStorage> Importer<E, G> {
    pub fn new(config: ImportConfig, encoding: E, storage: G) -> Self {
        Self {
            config,
            encoding,
            storage,
            observers: Vec::new(),
        }
    }

    /// Registers an observer. Observers are notified per committed edge in
    /// registration order; all registration happens before `run`.
    pub fn add_observer(&mut self, observer: Box<dyn EdgeObserver>) {
        self.observers.push(observer);
    }

    /// Runs junction detection then edge assembly against `source`,
    /// returning the populated storage and the run counters.
    ///
    /// Fatal errors abort the run; whatever storage already holds at that
    /// point is returned to the caller only through the error-free path, and
    /// no rollback is attempted.
    pub fn run<S: LineSource>(mut self, source: &S) -> Result<(G, ImportSummary)> {
        info!("start creating graph from {}", source.describe());

        let classifier = detect_junctions(source, &mut self.storage)?;
        let nodes = classifier.node_count();

        let stats = assemble_edges(
            source,
            classifier,
            &self.config,
            &self.encoding,
            &mut self.storage,
            &mut self.observers,
        )?;

        info!(
            "finished reading, zero distance counter {}",
            stats.floored_distances
        );

        Ok((
            self.storage,
            ImportSummary {
                nodes,
                candidate_edges: stats.candidate_edges,
                committed_edges: stats.committed_edges,
                floored_distances: stats.floored_distances,
                nan_distances: stats.nan_distances,
            },
        ))
    }
}
