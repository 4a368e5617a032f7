//! Assignment of vertices to communities.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use crate::params::{Mixing, Params};
use crate::{Error, Result};

/// Assigns every vertex to a community, heaviest degree first.
///
/// A vertex is only admissible in communities large enough to absorb its
/// expected intra-community degree; among those the choice is uniform,
/// weighted by remaining capacity. Processing vertices in descending degree
/// order keeps the admissible frontier monotone, so it is advanced with a
/// single sweep over the size list.
pub fn assign_clusters<R: Rng>(params: &Params, rng: &mut R) -> Result<Vec<u32>> {
    let w = params.degrees();
    let s = params.community_sizes();
    let n = params.num_vertices();
    let k = params.num_communities();

    let mul = match params.mixing() {
        Mixing::Mu(mu) => 1.0 - mu,
        Mixing::Xi(xi) => {
            let phi = 1.0
                - s.iter()
                    .map(|&c| {
                        let share = c as f64 / n as f64;
                        share * share
                    })
                    .sum::<f64>();
            1.0 - xi * phi
        }
    };

    let mut slots = s.to_vec();
    let mut clusters = Vec::with_capacity(n);
    let mut frontier = 0usize;
    for (i, &wi) in w.iter().enumerate() {
        while frontier < k && mul * wi as f64 + 1.0 <= s[frontier] as f64 {
            frontier += 1;
        }
        if frontier == 0 {
            return Err(Error::InfeasibleCluster { degree: wi });
        }
        let dist = WeightedIndex::new(slots[..frontier].iter().map(|&c| c as u64))
            .map_err(|_| Error::NoSlot { vertex: i })?;
        let loc = dist.sample(rng);
        clusters.push(loc as u32);
        slots[loc] -= 1;
    }
    Ok(clusters)
}
