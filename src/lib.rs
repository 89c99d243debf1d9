//! Builds a routable graph from raw road polylines.
//!
//! Two sequential passes over a [`LineSource`] turn unordered line features
//! into junction nodes and directed edges: junction detection classifies
//! every rounded coordinate, edge assembly splits each polyline at the
//! discovered junctions, maps its attributes into a standard vocabulary and
//! commits accepted edges to a [`GraphStorage`] backend.
//!
//! ```no_run
//! use roadgraph::{GeoJsonSource, ImportConfig, Importer, MemoryGraph, StandardEncoder};
//!
//! # fn main() -> roadgraph::Result<()> {
//! let source = GeoJsonSource::new("roads.geojson");
//! let importer = Importer::new(
//!     ImportConfig::default(),
//!     StandardEncoder::new(),
//!     MemoryGraph::new(),
//! );
//! let (graph, summary) = importer.run(&source)?;
//! println!("{} nodes, {} edges", summary.nodes, graph.edge_count());
//! # Ok(())
//! # }
//! ```

pub mod assemble;
pub mod coord;
pub mod emit;
pub mod encode;
pub mod error;
pub mod geo;
pub mod geojson;
pub mod graph;
pub mod import;
pub mod junctions;
pub mod mapper;
pub mod source;

pub use assemble::AssembleStats;
pub use coord::{CoordClassifier, CoordState, NodeId, RoundedCoord, FIRST_NODE_ID};
pub use emit::EdgeObserver;
pub use encode::{EdgeFlags, EncodingEngine, StandardEncoder};
pub use error::{ImportError, Result};
pub use geojson::GeoJsonSource;
pub use graph::{EdgeId, GraphStorage, MemoryGraph, StoredEdge};
pub use import::{ImportConfig, ImportSummary, Importer};
pub use mapper::{map_attributes, MappedWay, TagValue};
pub use source::{LineFeature, LineSource, MemorySource};
