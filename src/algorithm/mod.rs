//! Edge-placement engines and the worker pool they share.

use std::sync::Mutex;
use std::thread;

use crossbeam::channel;
use itertools::Itertools;
use rand::{Rng, SeedableRng};

use crate::params::{Mixing, Params};
use crate::{Error, Node, Result};

pub mod chung_lu;
pub mod config_model;

/// Background-graph fraction per community, derived from `mu` or passed
/// through from `xi`.
#[derive(Debug)]
pub(crate) enum Background {
    Global(f64),
    PerCluster(Vec<f64>),
}

impl Background {
    /// Derives the fraction of each vertex's degree that feeds the
    /// background graph. With local mixing every community gets its own
    /// fraction; otherwise one global value applies.
    pub(crate) fn resolve(
        params: &Params,
        cluster_weight: &[u64],
        total: u64,
    ) -> Result<Self> {
        let total = total as f64;
        match (params.mixing(), params.is_local()) {
            (Mixing::Xi(xi), _) => Ok(Background::Global(xi)),
            (Mixing::Mu(mu), true) => {
                let fractions = cluster_weight
                    .iter()
                    .map(|&cw| mu / (1.0 - cw as f64 / total))
                    .collect_vec();
                if let Some(&worst) = fractions.iter().find(|f| !(**f < 1.0)) {
                    return Err(Error::MuTooLarge { xi: worst });
                }
                Ok(Background::PerCluster(fractions))
            }
            (Mixing::Mu(mu), false) => {
                let concentration: f64 = cluster_weight
                    .iter()
                    .map(|&cw| {
                        let share = cw as f64 / total;
                        share * share
                    })
                    .sum();
                let xi = mu / (1.0 - concentration);
                if !(xi < 1.0) {
                    return Err(Error::MuTooLarge { xi });
                }
                Ok(Background::Global(xi))
            }
        }
    }

    pub(crate) fn fraction(&self, cluster: usize) -> f64 {
        match self {
            Background::Global(xi) => *xi,
            Background::PerCluster(fractions) => fractions[cluster],
        }
    }
}

/// Degree mass per community and the overall total.
pub(crate) fn cluster_weights(params: &Params, clusters: &[u32]) -> (Vec<u64>, u64) {
    let mut weight = vec![0u64; params.num_communities()];
    for (&c, &d) in clusters.iter().zip(params.degrees()) {
        weight[c as usize] += d as u64;
    }
    let total = weight.iter().sum();
    (weight, total)
}

/// Vertex lists per community, in vertex order.
pub(crate) fn member_lists(params: &Params, clusters: &[u32]) -> Vec<Vec<Node>> {
    let mut members = vec![Vec::new(); params.num_communities()];
    for (v, &c) in clusters.iter().enumerate() {
        members[c as usize].push(v as Node);
    }
    members
}

/// Runs `num_tasks` independent jobs on a fixed pool of worker threads.
///
/// Task ids are distributed through a channel. Every task owns an RNG
/// stream seeded from a dedicated draw off the master generator taken
/// before the pool starts, so the output is a function of the master seed
/// alone. Results are collected under one mutex, held only for the append,
/// and handed back in task order.
pub(crate) fn run_tasks<R, T, F>(
    rng: &mut R,
    num_tasks: usize,
    num_threads: usize,
    task: F,
) -> Vec<T>
where
    R: Rng + SeedableRng,
    T: Send,
    F: Fn(usize, &mut R) -> T + Sync,
{
    let seeds: Vec<u64> = (0..num_tasks).map(|_| rng.gen()).collect_vec();
    let num_threads = num_threads.clamp(1, num_tasks.max(1));

    let (tx, rx) = channel::unbounded();
    for id in 0..num_tasks {
        tx.send(id).unwrap();
    }
    drop(tx);

    let outputs = Mutex::new(Vec::with_capacity(num_tasks));
    thread::scope(|scope| {
        for _ in 0..num_threads {
            let rx = rx.clone();
            let task = &task;
            let seeds = &seeds;
            let outputs = &outputs;
            scope.spawn(move || {
                while let Ok(id) = rx.recv() {
                    let mut rng = R::seed_from_u64(seeds[id]);
                    let out = task(id, &mut rng);
                    outputs.lock().unwrap().push((id, out));
                }
            });
        }
    });

    let mut outputs = outputs.into_inner().unwrap();
    outputs.sort_unstable_by_key(|&(id, _)| id);
    outputs.into_iter().map(|(_, out)| out).collect()
}
