//! Edge emission: the accept/encode gate and the storage commit.

use crate::coord::{NodeId, RoundedCoord};
use crate::encode::EncodingEngine;
use crate::graph::{EdgeId, GraphStorage};
use crate::mapper::MappedWay;

/// Callback invoked synchronously after every committed edge, in
/// registration order.
pub trait EdgeObserver {
    fn on_edge_added(&mut self, way: &MappedWay, edge: EdgeId);
}

/// Commits accepted candidate edges to storage and notifies observers.
///
/// The storage edge is created only after both gates pass; a rejected
/// candidate touches neither storage nor observers.
pub struct EdgeEmitter<'a, E, G> {
    encoding: &'a E,
    storage: &'a mut G,
    observers: &'a mut [Box<dyn EdgeObserver>],
}

impl<'a, E: EncodingEngine, G: GraphStorage> EdgeEmitter<'a, E, G> {
    pub fn new(
        encoding: &'a E,
        storage: &'a mut G,
        observers: &'a mut [Box<dyn EdgeObserver>],
    ) -> Self {
        Self {
            encoding,
            storage,
            observers,
        }
    }

    /// Runs one candidate edge through the gate. Returns the committed edge
    /// handle, or `None` when the encoding engine filtered the candidate out
    /// (an expected outcome, not an error).
    pub fn emit(
        &mut self,
        from: NodeId,
        to: NodeId,
        way: &MappedWay,
        distance: f64,
        pillars: &[RoundedCoord],
    ) -> Option<EdgeId> {
        if !self.encoding.accept(way) {
            return None;
        }
        let flags = self.encoding.encode(way);
        if flags.is_empty() {
            return None;
        }

        let edge = self.storage.create_edge(from, to);
        self.storage.set_distance(edge, distance);
        self.storage.set_flags(edge, flags);
        self.storage.set_geometry(edge, pillars);

        for observer in self.observers.iter_mut() {
            observer.on_edge_added(way, edge);
        }
        Some(edge)
    }
}
