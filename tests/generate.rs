use std::collections::HashSet;

use pcg_rand::Pcg64;
use rand::SeedableRng;

use abcd_gen::edge_writer::degree_sequence;
use abcd_gen::params::Params;
use abcd_gen::{generate, sampling, Error, GeneratedGraph};

fn assert_simple(graph: &GeneratedGraph, n: u32) {
    let mut seen = HashSet::new();
    for &(a, b) in &graph.edges {
        assert!(a < b, "edge ({}, {}) is not normalized", a, b);
        assert!(b < n, "endpoint {} out of range", b);
        assert!(seen.insert((a, b)), "duplicate edge ({}, {})", a, b);
    }
}

fn community_counts(clusters: &[u32], k: usize) -> Vec<u32> {
    let mut counts = vec![0u32; k];
    for &c in clusters {
        counts[c as usize] += 1;
    }
    counts.sort_unstable_by(|a, b| b.cmp(a));
    counts
}

fn small_params(is_cl: bool) -> Params {
    Params::new(
        vec![3, 3, 2, 2, 1, 1],
        vec![4, 2],
        Some(0.2),
        None,
        is_cl,
        false,
    )
    .unwrap()
}

#[test]
fn chung_lu_realizes_half_the_degree_mass() {
    let params = small_params(true);
    let mut rng = Pcg64::seed_from_u64(1);
    let graph = generate(&params, &mut rng, 2).unwrap();

    assert_eq!(graph.edges.len(), 6);
    assert_eq!(graph.unresolved, 0);
    assert_simple(&graph, 6);
    assert_eq!(community_counts(&graph.clusters, 2), vec![4, 2]);
    assert!(graph.edges.windows(2).all(|p| p[0] < p[1]), "edges sorted");
}

#[test]
fn config_model_realizes_the_exact_degree_sequence() {
    let params = small_params(false);
    let mut intra_total = 0usize;
    let mut edge_total = 0usize;
    for seed in 1..=20 {
        let mut rng = Pcg64::seed_from_u64(seed);
        let graph = generate(&params, &mut rng, 2).unwrap();

        assert_simple(&graph, 6);
        assert_eq!(graph.edges.len() + graph.unresolved, 6);
        if graph.unresolved == 0 {
            assert_eq!(degree_sequence(6, &graph.edges), params.degrees());
        }
        edge_total += graph.edges.len();
        intra_total += graph
            .edges
            .iter()
            .filter(|&&(a, b)| graph.clusters[a as usize] == graph.clusters[b as usize])
            .count();
    }
    // With mu = 0.2 roughly four of five edges stay inside a community,
    // counting background edges that land there by chance.
    assert!(
        3 * intra_total >= 2 * edge_total,
        "expected mostly intra-community edges: {} of {}",
        intra_total,
        edge_total
    );
}

#[test]
fn xi_with_local_mixing_is_rejected() {
    let err = Params::new(vec![2, 2], vec![2], None, Some(0.1), false, true).unwrap_err();
    assert!(matches!(err, Error::ConfigInconsistent(_)));
}

#[test]
fn oversized_mu_is_rejected() {
    let mut w = vec![10];
    w.extend(std::iter::repeat(1).take(21));
    let params = Params::new(w, vec![11, 11], Some(0.99), None, true, false).unwrap();
    let mut rng = Pcg64::seed_from_u64(1);
    let err = generate(&params, &mut rng, 1).unwrap_err();
    assert!(matches!(err, Error::MuTooLarge { .. }));
}

#[test]
fn mismatched_community_cover_is_rejected() {
    let err = Params::new(vec![1; 5], vec![3, 3], Some(0.2), None, true, false).unwrap_err();
    assert!(matches!(err, Error::ConfigInconsistent(_)));
}

#[test]
fn same_seed_reproduces_the_graph() {
    for is_cl in [true, false] {
        let run = || {
            let params = small_params(is_cl);
            let mut rng = Pcg64::seed_from_u64(7);
            generate(&params, &mut rng, 3).unwrap()
        };
        let first = run();
        let second = run();
        assert_eq!(first.edges, second.edges);
        assert_eq!(first.clusters, second.clusters);
        assert_eq!(first.unresolved, second.unresolved);
    }
}

#[test]
fn config_model_on_sampled_sequences() {
    let mut rng = Pcg64::seed_from_u64(42);
    let degrees = sampling::sample_degrees(&mut rng, 2.5, 2, 12, 120, 1000).unwrap();
    let sizes = sampling::sample_community_sizes(&mut rng, 1.5, 20, 60, 120, 1000).unwrap();
    let total: u64 = degrees.iter().map(|&d| u64::from(d)).sum();
    let k = sizes.len();

    let params = Params::new(degrees, sizes.clone(), Some(0.3), None, false, false).unwrap();
    let graph = generate(&params, &mut rng, 4).unwrap();

    assert_simple(&graph, 120);
    assert_eq!(graph.edges.len() + graph.unresolved, (total / 2) as usize);
    assert_eq!(community_counts(&graph.clusters, k), sizes);

    let realized = degree_sequence(120, &graph.edges);
    for (v, (&got, &want)) in realized.iter().zip(params.degrees()).enumerate() {
        assert!(got <= want, "vertex {} exceeds its degree: {} > {}", v, got, want);
    }
    if graph.unresolved == 0 {
        assert_eq!(realized, params.degrees());
    }
}

#[test]
fn chung_lu_with_local_mixing_on_sampled_sequences() {
    let mut rng = Pcg64::seed_from_u64(11);
    let degrees = sampling::sample_degrees(&mut rng, 2.5, 2, 10, 100, 1000).unwrap();
    let sizes = sampling::sample_community_sizes(&mut rng, 1.5, 25, 60, 100, 1000).unwrap();
    let total: u64 = degrees.iter().map(|&d| u64::from(d)).sum();
    let k = sizes.len();

    let params = Params::new(degrees, sizes.clone(), Some(0.25), None, true, true).unwrap();
    let graph = generate(&params, &mut rng, 4).unwrap();

    assert_simple(&graph, 100);
    assert_eq!(community_counts(&graph.clusters, k), sizes);
    assert!(2 * graph.edges.len() as u64 >= total);
}

#[test]
fn xi_parameterization_runs_both_engines() {
    for is_cl in [true, false] {
        let params = Params::new(
            vec![3, 3, 2, 2, 1, 1],
            vec![4, 2],
            None,
            Some(0.4),
            is_cl,
            false,
        )
        .unwrap();
        let mut rng = Pcg64::seed_from_u64(5);
        let graph = generate(&params, &mut rng, 2).unwrap();
        assert_simple(&graph, 6);
        assert_eq!(graph.edges.len() + graph.unresolved, 6);
    }
}
