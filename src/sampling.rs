//! Sampling primitives: randomized rounding and the truncated power-law
//! samplers that produce the degree and community-size sequences.

use rand::Rng;
use rand_distr::{Distribution, WeightedAliasIndex};

use crate::{Error, Result};

/// Rounds `x >= 0` up with probability equal to its fractional part.
///
/// Integers round to themselves, so the expectation of the result is `x`.
pub fn randround<R: Rng>(rng: &mut R, x: f64) -> u64 {
    debug_assert!(x >= 0.0);
    let floor = x.floor();
    floor as u64 + rng.gen_bool(x - floor) as u64
}

/// Discrete truncated power law `p(v) ∝ v^(-tau)` on `[lo, hi]`.
pub struct PowerLaw {
    lo: u32,
    dist: WeightedAliasIndex<f64>,
}

impl PowerLaw {
    pub fn new(tau: f64, lo: u32, hi: u32) -> Result<Self> {
        if lo == 0 || lo > hi {
            return Err(Error::ConfigInconsistent(format!(
                "power-law support [{}, {}] is empty or starts at zero",
                lo, hi
            )));
        }
        let weights = (lo..=hi).map(|v| (v as f64).powf(-tau)).collect();
        let dist = WeightedAliasIndex::new(weights)
            .map_err(|e| Error::ConfigInconsistent(format!("power-law weights: {}", e)))?;
        Ok(Self { lo, dist })
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> u32 {
        self.lo + self.dist.sample(rng) as u32
    }
}

/// Samples `n` degrees from a truncated power law, redrawing until their
/// sum is even, and returns them sorted descending.
pub fn sample_degrees<R: Rng>(
    rng: &mut R,
    tau: f64,
    lo: u32,
    hi: u32,
    n: usize,
    max_iter: usize,
) -> Result<Vec<u32>> {
    let dist = PowerLaw::new(tau, lo, hi)?;
    for _ in 0..max_iter {
        let mut degrees: Vec<u32> = (0..n).map(|_| dist.sample(rng)).collect();
        if degrees.iter().map(|&d| d as u64).sum::<u64>() % 2 == 0 {
            degrees.sort_unstable_by(|a, b| b.cmp(a));
            return Ok(degrees);
        }
    }
    Err(Error::SamplingExceeded(max_iter))
}

/// Samples community sizes from a truncated power law until they cover
/// exactly `n` vertices, sorted descending.
///
/// Sizes are drawn until the running total reaches `n`; an overshoot is
/// taken out of the last community if it stays at least `lo`, otherwise
/// the whole sequence is redrawn.
pub fn sample_community_sizes<R: Rng>(
    rng: &mut R,
    tau: f64,
    lo: u32,
    hi: u32,
    n: usize,
    max_iter: usize,
) -> Result<Vec<u32>> {
    let dist = PowerLaw::new(tau, lo, hi)?;
    let n = n as u64;
    for _ in 0..max_iter {
        let mut sizes: Vec<u32> = Vec::new();
        let mut covered = 0u64;
        while covered < n {
            let c = dist.sample(rng);
            sizes.push(c);
            covered += c as u64;
        }
        let excess = (covered - n) as u32;
        if excess > 0 {
            match sizes.last_mut() {
                Some(last) if *last >= lo + excess => *last -= excess,
                _ => continue,
            }
        }
        sizes.sort_unstable_by(|a, b| b.cmp(a));
        return Ok(sizes);
    }
    Err(Error::SamplingExceeded(max_iter))
}

#[cfg(test)]
mod test {
    use super::*;
    use pcg_rand::Pcg64;
    use rand::SeedableRng;

    #[test]
    fn randround_is_exact_on_integers() {
        let mut rng = Pcg64::seed_from_u64(1);
        for v in 0..20 {
            assert_eq!(randround(&mut rng, v as f64), v);
        }
    }

    #[test]
    fn randround_stays_within_one() {
        let mut rng = Pcg64::seed_from_u64(2);
        for _ in 0..200 {
            let r = randround(&mut rng, 2.4);
            assert!(r == 2 || r == 3);
        }
    }

    #[test]
    fn power_law_respects_support() {
        let mut rng = Pcg64::seed_from_u64(3);
        let dist = PowerLaw::new(2.5, 3, 9).unwrap();
        for _ in 0..500 {
            let v = dist.sample(&mut rng);
            assert!((3..=9).contains(&v));
        }
    }

    #[test]
    fn power_law_rejects_bad_support() {
        assert!(PowerLaw::new(2.5, 0, 5).is_err());
        assert!(PowerLaw::new(2.5, 6, 5).is_err());
    }

    #[test]
    fn degrees_are_even_and_sorted() {
        let mut rng = Pcg64::seed_from_u64(4);
        let degrees = sample_degrees(&mut rng, 2.5, 2, 10, 101, 1000).unwrap();
        assert_eq!(degrees.len(), 101);
        assert_eq!(degrees.iter().map(|&d| d as u64).sum::<u64>() % 2, 0);
        assert!(degrees.windows(2).all(|p| p[0] >= p[1]));
    }

    #[test]
    fn community_sizes_cover_exactly_n() {
        let mut rng = Pcg64::seed_from_u64(5);
        let sizes = sample_community_sizes(&mut rng, 1.5, 10, 40, 237, 1000).unwrap();
        assert_eq!(sizes.iter().map(|&c| u64::from(c)).sum::<u64>(), 237);
        assert!(sizes.iter().all(|&c| (10..=40).contains(&c)));
        assert!(sizes.windows(2).all(|p| p[0] >= p[1]));
    }

    #[test]
    fn community_sizes_give_up_when_n_is_unreachable() {
        // Multiples of 3 can never hit 5, so the shrink rule never applies.
        let mut rng = Pcg64::seed_from_u64(6);
        let err = sample_community_sizes(&mut rng, 1.5, 3, 3, 5, 25).unwrap_err();
        assert!(matches!(err, Error::SamplingExceeded(25)));
    }
}
