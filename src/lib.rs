//! Generator for ABCD (Artificial Benchmark for Community Detection) random
//! graphs: simple undirected graphs with a prescribed degree sequence, a
//! prescribed community-size sequence, and a tunable fraction of edges
//! crossing community boundaries. Every vertex carries a ground-truth
//! community label, which makes the output suitable for benchmarking
//! community-detection algorithms.

pub mod algorithm;
pub mod assign;
pub mod config;
pub mod edge_set;
pub mod edge_writer;
pub mod params;
pub mod sampling;

use rand::{Rng, SeedableRng};

use crate::params::Params;

/// Vertex index in `0..n`.
pub type Node = u32;
/// Undirected edge stored as `(min, max)`.
pub type Edge = (Node, Node);

pub mod prelude {
    pub use super::{generate, Edge, Error, GeneratedGraph, Node, Result};
    pub use crate::params::Params;
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("inconsistent configuration: {0}")]
    ConfigInconsistent(String),
    #[error("no community is large enough for a vertex of degree {degree}")]
    InfeasibleCluster { degree: u32 },
    #[error("no remaining capacity among admissible communities for vertex {vertex}")]
    NoSlot { vertex: usize },
    #[error("mixing parameter too large: derived background fraction {xi} is not below 1")]
    MuTooLarge { xi: f64 },
    #[error("sampling did not produce an admissible sequence in {0} attempts")]
    SamplingExceeded(usize),
    #[error("malformed configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// A generated graph: simple undirected edges plus the ground-truth
/// community of every vertex.
#[derive(Debug, Clone)]
pub struct GeneratedGraph {
    /// Normalized `(a, b)` pairs with `a < b`, lexicographically sorted.
    pub edges: Vec<Edge>,
    /// Community id of each vertex, in `0..k`.
    pub clusters: Vec<u32>,
    /// Collisions the configuration-model rewiring failed to resolve; the
    /// corresponding edges are missing from `edges`.
    pub unresolved: usize,
}

/// Runs the full pipeline: community assignment followed by the selected
/// edge-placement engine.
///
/// `rng` drives every random choice. Worker streams are reseeded from it
/// once per task before the pool starts, so a fixed seed reproduces the
/// same graph regardless of thread count or scheduling.
pub fn generate<R: Rng + SeedableRng>(
    params: &Params,
    rng: &mut R,
    num_threads: usize,
) -> Result<GeneratedGraph> {
    let clusters = assign::assign_clusters(params, rng)?;
    let mut graph = if params.is_cl() {
        algorithm::chung_lu::run(params, &clusters, rng, num_threads)?
    } else {
        algorithm::config_model::run(params, &clusters, rng, num_threads)?
    };
    graph.edges.sort_unstable();
    Ok(graph)
}
