//! Writers for the on-disk graph formats.
//!
//! Vertices and communities are 0-based in memory; every writer shifts ids
//! up by one so the files use the conventional 1-based indexing.

use std::io::{self, Write};

use crate::Edge;

/// Writes one edge per line as `a<TAB>b`.
pub fn write_edge_list<W: Write>(mut out: W, edges: &[Edge]) -> io::Result<()> {
    for &(a, b) in edges {
        writeln!(out, "{}\t{}", a + 1, b + 1)?;
    }
    out.flush()
}

/// Writes one `vertex<TAB>community` line per vertex, in vertex order.
pub fn write_communities<W: Write>(mut out: W, clusters: &[u32]) -> io::Result<()> {
    for (v, &c) in clusters.iter().enumerate() {
        writeln!(out, "{}\t{}", v + 1, c + 1)?;
    }
    out.flush()
}

/// Writes one integer per line.
pub fn write_sequence<W: Write>(mut out: W, values: &[u32]) -> io::Result<()> {
    for &v in values {
        writeln!(out, "{}", v)?;
    }
    out.flush()
}

/// Per-vertex degree counts of an edge list over `n` vertices.
pub fn degree_sequence(n: usize, edges: &[Edge]) -> Vec<u32> {
    let mut degrees = vec![0u32; n];
    for &(a, b) in edges {
        degrees[a as usize] += 1;
        degrees[b as usize] += 1;
    }
    degrees
}
