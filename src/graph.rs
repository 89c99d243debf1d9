//! Graph storage: the contract the import writes into, plus the bundled
//! in-memory implementation with binary persistence.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::coord::{NodeId, RoundedCoord};
use crate::encode::EdgeFlags;
use crate::error::Result;

/// Edge handle, allocated in creation order starting at 0.
pub type EdgeId = u32;

/// What the import requires from a graph backend.
///
/// Nodes arrive during junction detection, edges during edge assembly; the
/// setters are always called on a handle returned by `create_edge` within
/// the same run.
pub trait GraphStorage {
    /// Records a junction node and its coordinate.
    fn add_node(&mut self, node: NodeId, coord: RoundedCoord);

    /// Creates an edge between two junction nodes, returning its handle.
    fn create_edge(&mut self, from: NodeId, to: NodeId) -> EdgeId;

    fn set_distance(&mut self, edge: EdgeId, meters: f64);

    fn set_flags(&mut self, edge: EdgeId, flags: EdgeFlags);

    /// Intermediate shape of the edge: pillar points only, endpoints
    /// excluded.
    fn set_geometry(&mut self, edge: EdgeId, pillars: &[RoundedCoord]);
}

/// One committed edge as held by [`MemoryGraph`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredEdge {
    pub from: NodeId,
    pub to: NodeId,
    pub distance_m: f64,
    pub flags: EdgeFlags,
    pub geometry: Vec<RoundedCoord>,
}

/// In-memory graph with bincode save/load.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct MemoryGraph {
    nodes: HashMap<NodeId, RoundedCoord>,
    edges: Vec<StoredEdge>,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn node(&self, node: NodeId) -> Option<RoundedCoord> {
        self.nodes.get(&node).copied()
    }

    pub fn edge(&self, edge: EdgeId) -> Option<&StoredEdge> {
        self.edges.get(edge as usize)
    }

    pub fn edges(&self) -> &[StoredEdge] {
        &self.edges
    }

    /// Number of edges incident to a node. Loop edges count once.
    pub fn degree(&self, node: NodeId) -> usize {
        self.edges
            .iter()
            .filter(|e| e.from == node || e.to == node)
            .count()
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        bincode::serialize_into(writer, self)?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let graph = bincode::deserialize_from(reader)?;
        Ok(graph)
    }
}

impl GraphStorage for MemoryGraph {
    fn add_node(&mut self, node: NodeId, coord: RoundedCoord) {
        self.nodes.insert(node, coord);
    }

    fn create_edge(&mut self, from: NodeId, to: NodeId) -> EdgeId {
        self.edges.push(StoredEdge {
            from,
            to,
            distance_m: 0.0,
            flags: EdgeFlags::EMPTY,
            geometry: Vec::new(),
        });
        (self.edges.len() - 1) as EdgeId
    }

    fn set_distance(&mut self, edge: EdgeId, meters: f64) {
        if let Some(stored) = self.edges.get_mut(edge as usize) {
            stored.distance_m = meters;
        }
    }

    fn set_flags(&mut self, edge: EdgeId, flags: EdgeFlags) {
        if let Some(stored) = self.edges.get_mut(edge as usize) {
            stored.flags = flags;
        }
    }

    fn set_geometry(&mut self, edge: EdgeId, pillars: &[RoundedCoord]) {
        if let Some(stored) = self.edges.get_mut(edge as usize) {
            stored.geometry = pillars.to_vec();
        }
    }
}
