//! Validated generator parameters.

use crate::{Error, Result};

/// Mixing requirement: either the expected fraction `mu` of a vertex's
/// edges leaving its community, or the background-graph fraction `xi`
/// directly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mixing {
    Mu(f64),
    Xi(f64),
}

/// Immutable inputs for one generator run.
///
/// The degree sequence `w` and the community-size sequence `s` are kept
/// sorted descending; community sizes must cover every vertex exactly.
#[derive(Debug, Clone)]
pub struct Params {
    w: Vec<u32>,
    s: Vec<u32>,
    mixing: Mixing,
    is_cl: bool,
    is_local: bool,
}

impl Params {
    /// Validates and normalizes the inputs, sorting both sequences
    /// descending on intake.
    pub fn new(
        mut w: Vec<u32>,
        mut s: Vec<u32>,
        mu: Option<f64>,
        xi: Option<f64>,
        is_cl: bool,
        is_local: bool,
    ) -> Result<Self> {
        let n = w.len() as u64;
        let covered: u64 = s.iter().map(|&c| c as u64).sum();
        if covered != n {
            return Err(Error::ConfigInconsistent(format!(
                "community sizes cover {} vertices but there are {}",
                covered, n
            )));
        }
        let mixing = match (mu, xi) {
            (Some(mu), None) => Mixing::Mu(mu),
            (None, Some(xi)) => Mixing::Xi(xi),
            (Some(_), Some(_)) => {
                return Err(Error::ConfigInconsistent("both mu and xi supplied".into()))
            }
            (None, None) => {
                return Err(Error::ConfigInconsistent(
                    "neither mu nor xi supplied".into(),
                ))
            }
        };
        let value = match mixing {
            Mixing::Mu(v) | Mixing::Xi(v) => v,
        };
        if !(0.0..=1.0).contains(&value) {
            return Err(Error::ConfigInconsistent(format!(
                "mixing parameter {} outside [0, 1]",
                value
            )));
        }
        if is_local && matches!(mixing, Mixing::Xi(_)) {
            return Err(Error::ConfigInconsistent(
                "xi cannot be combined with local mixing".into(),
            ));
        }
        w.sort_unstable_by(|a, b| b.cmp(a));
        s.sort_unstable_by(|a, b| b.cmp(a));
        Ok(Self {
            w,
            s,
            mixing,
            is_cl,
            is_local,
        })
    }

    /// Per-vertex degrees, descending.
    pub fn degrees(&self) -> &[u32] {
        &self.w
    }

    /// Community sizes, descending.
    pub fn community_sizes(&self) -> &[u32] {
        &self.s
    }

    pub fn num_vertices(&self) -> usize {
        self.w.len()
    }

    pub fn num_communities(&self) -> usize {
        self.s.len()
    }

    pub fn mixing(&self) -> Mixing {
        self.mixing
    }

    pub fn is_cl(&self) -> bool {
        self.is_cl
    }

    pub fn is_local(&self) -> bool {
        self.is_local
    }

    /// Sum of all degrees, twice the target edge count.
    pub fn total_weight(&self) -> u64 {
        self.w.iter().map(|&d| d as u64).sum()
    }
}
