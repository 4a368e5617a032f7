//! Chung-Lu edge placement: independent weighted pair sampling.

use std::collections::HashSet;

use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, WeightedAliasIndex};

use super::{cluster_weights, member_lists, run_tasks, Background};
use crate::edge_set::ordered;
use crate::params::Params;
use crate::sampling::randround;
use crate::{Edge, Error, GeneratedGraph, Node, Result};

/// Lays down edges by drawing endpoint pairs with probability proportional
/// to their degrees, per community first and then from the background
/// distribution until half the degree mass is realized.
pub(crate) fn run<R: Rng + SeedableRng>(
    params: &Params,
    clusters: &[u32],
    rng: &mut R,
    num_threads: usize,
) -> Result<GeneratedGraph> {
    let w = params.degrees();
    let (weight, total) = cluster_weights(params, clusters);
    let background = Background::resolve(params, &weight, total)?;
    let members = member_lists(params, clusters);

    let locals = run_tasks(rng, members.len(), num_threads, |c, rng: &mut R| {
        fill_cluster(rng, &members[c], w, background.fraction(c))
    });

    let mut edges: HashSet<Edge> = HashSet::with_capacity((total / 2) as usize);
    for local in locals {
        edges.extend(local?);
    }

    // The background phase tops the graph up to half the total degree mass;
    // collisions with existing edges are simply drawn again.
    if (edges.len() as u64) * 2 < total {
        let weights: Vec<f64> = clusters
            .iter()
            .zip(w)
            .map(|(&c, &d)| background.fraction(c as usize) * d as f64)
            .collect();
        let dist = WeightedAliasIndex::new(weights)
            .map_err(|e| Error::ConfigInconsistent(format!("background weights: {}", e)))?;
        while (edges.len() as u64) * 2 < total {
            let deficit = total - 2 * edges.len() as u64;
            for _ in 0..(deficit + 1) / 2 {
                let a = dist.sample(rng) as Node;
                let b = dist.sample(rng) as Node;
                if a != b {
                    edges.insert(ordered(a, b));
                }
            }
        }
    }

    Ok(GeneratedGraph {
        edges: edges.into_iter().collect(),
        clusters: clusters.to_vec(),
        unresolved: 0,
    })
}

/// Fills one community with intra-community edges up to a randomized
/// rounding of its share of the degree mass.
fn fill_cluster<R: Rng>(
    rng: &mut R,
    members: &[Node],
    w: &[u32],
    xi: f64,
) -> Result<HashSet<Edge>> {
    let weights: Vec<f64> = members.iter().map(|&v| w[v as usize] as f64).collect();
    let mass: f64 = weights.iter().sum();
    let target = randround(rng, (1.0 - xi) * mass / 2.0) as usize;
    let mut edges = HashSet::with_capacity(target);
    if target == 0 {
        return Ok(edges);
    }
    let dist = WeightedAliasIndex::new(weights)
        .map_err(|e| Error::ConfigInconsistent(format!("community weights: {}", e)))?;
    while edges.len() < target {
        for _ in 0..target - edges.len() {
            let a = members[dist.sample(rng)];
            let b = members[dist.sample(rng)];
            if a != b {
                edges.insert(ordered(a, b));
            }
        }
    }
    Ok(edges)
}
