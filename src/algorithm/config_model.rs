//! Configuration-model edge placement: stub matching followed by collision
//! rewiring at community, background, and cross-set scope.

use std::collections::VecDeque;

use itertools::Itertools;
use log::{info, warn};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::{cluster_weights, member_lists, run_tasks, Background};
use crate::edge_set::{ordered, EdgeSet};
use crate::params::Params;
use crate::sampling::randround;
use crate::{Edge, GeneratedGraph, Node, Result};

/// Realizes the degree sequence exactly by splitting each degree into
/// intra-community and background stubs, matching both pools, and rewiring
/// the self-loops and duplicates the matching produced.
pub(crate) fn run<R: Rng + SeedableRng>(
    params: &Params,
    clusters: &[u32],
    rng: &mut R,
    num_threads: usize,
) -> Result<GeneratedGraph> {
    let (weight, total) = cluster_weights(params, clusters);
    let background = Background::resolve(params, &weight, total)?;
    let members = member_lists(params, clusters);
    let k = members.len();

    let w_internal = split_degrees(params, &background, &members, rng);
    let w_background: Vec<u32> = params
        .degrees()
        .iter()
        .zip(&w_internal)
        .map(|(&d, &i)| d - i)
        .collect();

    // Task 0 pairs the background pool; tasks 1..=k pair and locally rewire
    // one community each.
    let everyone: Vec<Node> = (0..params.num_vertices() as Node).collect();
    let outcomes = run_tasks(rng, k + 1, num_threads, |id, rng: &mut R| {
        if id == 0 {
            pair_stubs(rng, &everyone, &w_background)
        } else {
            let vertices = &members[id - 1];
            let stubs: u64 = vertices
                .iter()
                .map(|&v| w_internal[v as usize] as u64)
                .sum();
            let (mut edges, mut recycle) = pair_stubs(rng, vertices, &w_internal);
            rewire(rng, &mut edges, &mut recycle, stubs, |edges, e| {
                !edges.contains(&e)
            });
            (edges, recycle)
        }
    });

    let mut outcomes = outcomes.into_iter();
    let (mut pool, mut recycle) = outcomes.next().expect("background task always runs");
    if !recycle.is_empty() {
        info!("{} collisions after background stub matching", recycle.len());
    }

    let mut cluster_sets = Vec::with_capacity(k);
    let mut local_residue = 0usize;
    for (edges, mut residue) in outcomes {
        local_residue += residue.len();
        recycle.append(&mut residue);
        cluster_sets.push(edges);
    }
    if local_residue > 0 {
        warn!(
            "{} community collisions survived local rewiring",
            local_residue
        );
    }

    // Background edges that also exist inside a community set go back into
    // the queue before the global pass.
    let duplicated = pool
        .iter()
        .copied()
        .filter(|&(a, b)| {
            let c = clusters[a as usize];
            c == clusters[b as usize] && cluster_sets[c as usize].contains(&(a, b))
        })
        .collect_vec();
    for e in duplicated {
        pool.remove(&e);
        recycle.push_back(e);
    }

    // Global pass over the background pool. Candidates falling inside a
    // community must also miss that community's set, which keeps the sets
    // pairwise disjoint from here on.
    let background_stubs: u64 = w_background.iter().map(|&d| d as u64).sum();
    rewire(rng, &mut pool, &mut recycle, background_stubs, |pool, e| {
        if pool.contains(&e) {
            return false;
        }
        let (a, b) = e;
        let c = clusters[a as usize];
        c != clusters[b as usize] || !cluster_sets[c as usize].contains(&e)
    });

    cluster_sets.push(pool);
    last_resort(rng, &mut cluster_sets, &mut recycle, total);

    let unresolved = recycle.len();
    if unresolved > 0 {
        warn!(
            "{} unresolved collisions dropped ({:.6} of the degree mass)",
            unresolved,
            2.0 * unresolved as f64 / total as f64
        );
    }

    let mut edges = Vec::with_capacity((total / 2) as usize);
    for set in &cluster_sets {
        edges.extend_from_slice(set.as_slice());
    }

    Ok(GeneratedGraph {
        edges,
        clusters: clusters.to_vec(),
        unresolved,
    })
}

/// Splits every degree into an intra-community part and a background part.
///
/// All but one vertex per community round their raw internal weight
/// randomly; the vertex of maximum raw weight absorbs the parity correction
/// so the community's stub count comes out even.
fn split_degrees<R: Rng>(
    params: &Params,
    background: &Background,
    members: &[Vec<Node>],
    rng: &mut R,
) -> Vec<u32> {
    let w = params.degrees();
    let mut internal = vec![0u32; w.len()];
    for (c, vertices) in members.iter().enumerate() {
        if vertices.is_empty() {
            continue;
        }
        let keep = 1.0 - background.fraction(c);
        let heaviest = vertices
            .iter()
            .position_max_by_key(|&&v| w[v as usize])
            .expect("community is non-empty");
        let mut sum = 0u64;
        for (pos, &v) in vertices.iter().enumerate() {
            if pos == heaviest {
                continue;
            }
            let part = randround(rng, keep * w[v as usize] as f64) as u32;
            internal[v as usize] = part;
            sum += part as u64;
        }
        let v = vertices[heaviest] as usize;
        let mut part = (keep * w[v] as f64).floor() as u64;
        if (sum + part) % 2 == 1 {
            if part < w[v] as u64 {
                part += 1;
            } else {
                part = part.saturating_sub(1);
            }
        }
        internal[v] = part as u32;
    }
    internal
}

/// Expands per-vertex stub counts into a shuffled stub array and matches
/// consecutive stubs. Self-loops and duplicates land in the recycle queue.
fn pair_stubs<R: Rng>(
    rng: &mut R,
    vertices: &[Node],
    stubs_per_vertex: &[u32],
) -> (EdgeSet, VecDeque<Edge>) {
    let mut stubs: Vec<Node> = Vec::new();
    for &v in vertices {
        let count = stubs_per_vertex[v as usize] as usize;
        stubs.extend(std::iter::repeat(v).take(count));
    }
    stubs.shuffle(rng);

    let mut edges = EdgeSet::with_capacity(stubs.len() / 2);
    let mut recycle = VecDeque::new();
    for pair in stubs.chunks_exact(2) {
        let e = ordered(pair[0], pair[1]);
        if e.0 == e.1 || !edges.insert(e) {
            recycle.push_back(e);
        }
    }
    (edges, recycle)
}

/// Bounded-progress rewiring.
///
/// Queued collisions are recombined with partners drawn from the queue or
/// from the accepted set. The sweep budget resets only while the queue
/// keeps shrinking, so the loop always halts; whatever is left in the queue
/// afterwards stays unplaced.
fn rewire<R, A>(
    rng: &mut R,
    edges: &mut EdgeSet,
    recycle: &mut VecDeque<Edge>,
    stubs: u64,
    mut accept: A,
) where
    R: Rng,
    A: FnMut(&EdgeSet, Edge) -> bool,
{
    if stubs == 0 {
        return;
    }
    let mut last = recycle.len();
    let mut budget = last as isize;
    while !recycle.is_empty() {
        budget -= 1;
        if budget < 0 {
            if recycle.len() < last {
                last = recycle.len();
                budget = last as isize;
            } else {
                break;
            }
        }
        let p1 = recycle.pop_front().expect("queue checked non-empty");
        let mut placed = false;
        for _ in 0..(stubs / 2).max(1) {
            let from_queue =
                rng.gen_bool((2.0 * recycle.len() as f64 / stubs as f64).min(1.0));
            let (p2, queue_slot) = if from_queue && !recycle.is_empty() {
                let at = rng.gen_range(0..recycle.len());
                (recycle[at], Some(at))
            } else if let Some(e) = edges.choose(rng) {
                (e, None)
            } else {
                continue;
            };
            let (n1, n2) = recombine(rng, p1, p2);
            if n1 == n2 || n1.0 == n1.1 || n2.0 == n2.1 {
                continue;
            }
            if !accept(edges, n1) || !accept(edges, n2) {
                continue;
            }
            match queue_slot {
                Some(at) => {
                    recycle.swap_remove_back(at);
                }
                None => {
                    edges.remove(&p2);
                }
            }
            edges.insert(n1);
            edges.insert(n2);
            placed = true;
            break;
        }
        if !placed {
            recycle.push_back(p1);
        }
    }
}

/// Final pass: partners come from any of the edge sets, weighted by size,
/// and a candidate must be absent from every set.
fn last_resort<R: Rng>(
    rng: &mut R,
    sets: &mut [EdgeSet],
    recycle: &mut VecDeque<Edge>,
    total_stubs: u64,
) {
    let mut last = recycle.len();
    let mut budget = last as isize;
    while !recycle.is_empty() {
        budget -= 1;
        if budget < 0 {
            if recycle.len() < last {
                last = recycle.len();
                budget = last as isize;
            } else {
                break;
            }
        }
        let p1 = recycle.pop_front().expect("queue checked non-empty");
        let mut placed = false;
        for _ in 0..(total_stubs / 2).max(1) {
            let available: u64 = sets.iter().map(|s| s.len() as u64).sum();
            if available == 0 {
                break;
            }
            let mut at = rng.gen_range(0..available);
            let mut which = 0usize;
            for (i, set) in sets.iter().enumerate() {
                if at < set.len() as u64 {
                    which = i;
                    break;
                }
                at -= set.len() as u64;
            }
            let p2 = sets[which].choose(rng).expect("chosen set is non-empty");
            let (n1, n2) = recombine(rng, p1, p2);
            if n1 == n2 || n1.0 == n1.1 || n2.0 == n2.1 {
                continue;
            }
            if sets.iter().any(|s| s.contains(&n1) || s.contains(&n2)) {
                continue;
            }
            sets[which].remove(&p2);
            sets[which].insert(n1);
            sets[which].insert(n2);
            placed = true;
            break;
        }
        if !placed {
            recycle.push_back(p1);
        }
    }
}

/// Splices two pairs into two new pairs, matching either the aligned or the
/// crossed endpoints with equal probability.
fn recombine<R: Rng>(rng: &mut R, p1: Edge, p2: Edge) -> (Edge, Edge) {
    if rng.gen_bool(0.5) {
        (ordered(p1.0, p2.0), ordered(p1.1, p2.1))
    } else {
        (ordered(p1.0, p2.1), ordered(p1.1, p2.0))
    }
}
