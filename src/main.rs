//! Command-line interface for the roadgraph library.
//!
//! `import` builds a graph from a GeoJSON roads file and saves it;
//! `info` prints statistics for a saved graph.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::error;
use roadgraph::{GeoJsonSource, ImportConfig, Importer, MemoryGraph, StandardEncoder};

#[derive(Parser)]
#[command(name = "roadgraph")]
#[command(about = "Builds a routable graph from raw road polylines", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a graph from a GeoJSON roads file
    Import {
        /// Input GeoJSON FeatureCollection
        input: PathBuf,
        /// Output graph file (defaults to the input with a .graph extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Attribute names copied verbatim onto every edge
        #[arg(long, value_delimiter = ',')]
        tags_to_copy: Vec<String>,
        /// Minimum edge distance in meters
        #[arg(long, default_value_t = 0.0001)]
        distance_floor: f64,
        /// Distance in meters substituted for a NaN edge length
        #[arg(long, default_value_t = 1.0)]
        nan_fallback: f64,
    },
    /// Print statistics for a saved graph
    Info {
        /// Graph file written by `import`
        graph: PathBuf,
    },
}

fn main() {
    // Logging goes to stderr so piped output stays clean.
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Stderr)
        .init();

    if let Err(e) = run() {
        error!("❌ Error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Import {
            input,
            output,
            tags_to_copy,
            distance_floor,
            nan_fallback,
        } => {
            let output = output.unwrap_or_else(|| default_output(&input));
            let config = ImportConfig {
                tags_to_copy,
                distance_floor_m: distance_floor,
                nan_fallback_m: nan_fallback,
            };
            import(&input, &output, config)
        }
        Commands::Info { graph } => info(&graph),
    }
}

fn import(input: &Path, output: &Path, config: ImportConfig) -> Result<()> {
    eprintln!("🗺️  Importing {}", input.display());
    let start = Instant::now();

    let source = GeoJsonSource::new(input);
    let importer = Importer::new(config, StandardEncoder::new(), MemoryGraph::new());
    let (graph, summary) = importer
        .run(&source)
        .with_context(|| format!("importing {}", input.display()))?;

    println!("✅ Import complete in {:.2}s", start.elapsed().as_secs_f64());
    println!("  Nodes: {}", summary.nodes);
    println!(
        "  Edges: {} committed of {} candidates",
        summary.committed_edges, summary.candidate_edges
    );
    if summary.floored_distances > 0 {
        println!("  Floored distances: {}", summary.floored_distances);
    }
    if summary.nan_distances > 0 {
        println!("  NaN distances substituted: {}", summary.nan_distances);
    }

    graph
        .save(output)
        .with_context(|| format!("saving {}", output.display()))?;
    println!("💾 Saved to {}", output.display());

    Ok(())
}

fn info(path: &Path) -> Result<()> {
    let graph =
        MemoryGraph::load(path).with_context(|| format!("loading {}", path.display()))?;

    let total_m: f64 = graph.edges().iter().map(|e| e.distance_m).sum();

    println!("Nodes: {}", graph.node_count());
    println!("Edges: {}", graph.edge_count());
    println!("Total edge length: {:.1} km", total_m / 1000.0);

    Ok(())
}

/// Default output path: the input with its extension replaced by `.graph`.
fn default_output(input: &Path) -> PathBuf {
    input.with_extension("graph")
}
