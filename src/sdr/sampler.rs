//! Random SDR sampling without replacement.
//!
//! Partial Fisher–Yates over an owned pool of `0..n`: each pick swaps the
//! chosen slot to the end of a shrinking window. Swaps keep the pool a
//! permutation of `0..n`, so the next call starts from the full window
//! without refilling it.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::sdr::sdr::Sdr;

/// Owns the shuffle pool and the generator used to draw random SDRs.
pub struct SdrSampler {
    /// Universe size.
    n: usize,

    /// Permutation of `0..n`, reused across calls.
    pool: Vec<usize>,

    rng: StdRng,
}

impl SdrSampler {
    /// Create a sampler seeded from OS entropy.
    pub fn new(n: usize) -> Self {
        Self::with_rng(n, StdRng::from_entropy())
    }

    /// Create a reproducible sampler.
    pub fn seeded(n: usize, seed: u64) -> Self {
        Self::with_rng(n, StdRng::seed_from_u64(seed))
    }

    fn with_rng(n: usize, rng: StdRng) -> Self {
        Self {
            n,
            pool: (0..n).collect(),
            rng,
        }
    }

    /// Universe size this sampler draws from.
    pub fn universe(&self) -> usize {
        self.n
    }

    /// Draw `p` distinct positions from `[0, n)`, sorted ascending.
    ///
    /// `p` larger than `n` is clamped to `n`.
    pub fn random(&mut self, p: usize) -> Sdr {
        let picked = partial_shuffle(&mut self.pool, p, &mut self.rng);
        Sdr::from_sorted_unchecked(self.n, picked)
    }
}

/// One-shot sampling with a caller-supplied generator.
pub fn random_sdr<R: Rng + ?Sized>(n: usize, p: usize, rng: &mut R) -> Sdr {
    let mut pool: Vec<usize> = (0..n).collect();
    let picked = partial_shuffle(&mut pool, p, rng);
    Sdr::from_sorted_unchecked(n, picked)
}

/// Pick `p` values from `pool` uniformly without replacement and return them
/// sorted. The whole pool is eligible on entry.
fn partial_shuffle<R: Rng + ?Sized>(pool: &mut [usize], p: usize, rng: &mut R) -> Vec<usize> {
    let p = p.min(pool.len());
    let mut remaining = pool.len();
    let mut picked = Vec::with_capacity(p);

    for _ in 0..p {
        let r = rng.gen_range(0..remaining);
        picked.push(pool[r]);
        pool.swap(r, remaining - 1);
        remaining -= 1;
    }

    picked.sort_unstable();
    picked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_valid(s: &Sdr, n: usize, p: usize) {
        assert_eq!(s.len(), p);
        assert_eq!(s.universe(), n);
        assert!(s.positions().windows(2).all(|w| w[0] < w[1]), "{:?}", s);
        assert!(s.positions().iter().all(|&x| x < n));
    }

    #[test]
    fn test_random_is_valid() {
        let mut sampler = SdrSampler::seeded(1000, 7);
        for _ in 0..200 {
            let s = sampler.random(10);
            assert_valid(&s, 1000, 10);
        }
    }

    #[test]
    fn test_pool_not_exhausted_across_calls() {
        // 5 calls of 4 from a universe of 10 would exhaust a non-reset pool.
        let mut sampler = SdrSampler::seeded(10, 3);
        for _ in 0..5 {
            assert_valid(&sampler.random(4), 10, 4);
        }
    }

    #[test]
    fn test_full_universe() {
        let mut sampler = SdrSampler::seeded(16, 1);
        let s = sampler.random(16);
        assert_eq!(s.positions(), (0..16).collect::<Vec<_>>().as_slice());
    }

    #[test]
    fn test_p_clamped_to_n() {
        let mut sampler = SdrSampler::seeded(5, 1);
        assert_valid(&sampler.random(9), 5, 5);
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let mut a = SdrSampler::seeded(500, 42);
        let mut b = SdrSampler::seeded(500, 42);
        for _ in 0..10 {
            assert_eq!(a.random(8), b.random(8));
        }
    }

    #[test]
    fn test_random_sdr_covers_universe() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut seen = vec![false; 20];
        for _ in 0..200 {
            let s = random_sdr(20, 3, &mut rng);
            assert_valid(&s, 20, 3);
            for &x in s.positions() {
                seen[x] = true;
            }
        }
        assert!(seen.iter().all(|&b| b), "every position should be drawn eventually");
    }
}
