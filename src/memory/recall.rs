//! Recall projection: collapse the tensor onto the unknown axis.
//!
//! Given the two known parts of a triple, every pair `(a, b)` of their
//! positions selects one fibre along the unknown axis. Summing those `p²`
//! fibres gives a dense score per candidate position, which the binarizer
//! turns back into an SDR. Cost is `O(p² · n)`; the cube is only read.
//!
//! The parallel variant splits the candidate range into chunks and lets
//! rayon fill each chunk from the same fibres, so both variants produce
//! identical scores.

use std::fmt;

use ndarray::{s, Array1};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::memory::tensor::CountingTensor;
use crate::sdr::sdr::Sdr;

/// Candidate positions handed to one rayon task.
const CHUNK: usize = 128;

/// One of the three parts of a triple.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        f.write_str(name)
    }
}

/// Sum the fibres along `axis` selected by every pair in `a × b`.
///
/// `a` and `b` are the known parts in axis order: `(y, z)` for `Axis::X`,
/// `(x, z)` for `Axis::Y`, `(x, y)` for `Axis::Z`.
pub fn project(tensor: &CountingTensor, axis: Axis, a: &Sdr, b: &Sdr) -> Array1<u32> {
    let mut scores = Array1::<u32>::zeros(tensor.universe());
    for &u in a.positions() {
        for &v in b.positions() {
            let fibre = tensor.fibre(axis, u, v);
            scores.zip_mut_with(&fibre, |s, &c| *s += c as u32);
        }
    }
    scores
}

/// Same result as [`project`], with the candidate range split across threads.
pub fn project_parallel(tensor: &CountingTensor, axis: Axis, a: &Sdr, b: &Sdr) -> Array1<u32> {
    let n = tensor.universe();
    let pairs: Vec<(usize, usize)> = a
        .positions()
        .iter()
        .flat_map(|&u| b.positions().iter().map(move |&v| (u, v)))
        .collect();

    let mut scores = vec![0u32; n];
    scores
        .par_chunks_mut(CHUNK)
        .enumerate()
        .for_each(|(chunk_idx, chunk)| {
            let start = chunk_idx * CHUNK;
            let end = start + chunk.len();
            for &(u, v) in &pairs {
                let fibre = tensor.fibre(axis, u, v);
                for (s, &c) in chunk.iter_mut().zip(fibre.slice(s![start..end]).iter()) {
                    *s += c as u32;
                }
            }
        });

    Array1::from(scores)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::sdr::sampler::random_sdr;

    fn sdr(n: usize, p: &[usize]) -> Sdr {
        Sdr::from_positions(n, p.iter().copied()).unwrap()
    }

    #[test]
    fn test_project_single_triple() {
        let mut t = CountingTensor::new(20).unwrap();
        let (x, y, z) = (sdr(20, &[1, 2]), sdr(20, &[3, 4]), sdr(20, &[5, 6]));
        t.increment_product(x.positions(), y.positions(), z.positions());

        let scores = project(&t, Axis::Z, &x, &y);
        assert_eq!(scores[5], 4);
        assert_eq!(scores[6], 4);
        assert_eq!(scores.sum(), 8);

        let scores = project(&t, Axis::X, &y, &z);
        assert_eq!(scores[1], 4);
        assert_eq!(scores[2], 4);

        let scores = project(&t, Axis::Y, &x, &z);
        assert_eq!(scores[3], 4);
        assert_eq!(scores[4], 4);
    }

    #[test]
    fn test_project_empty_known_part() {
        let mut t = CountingTensor::new(10).unwrap();
        t.increment_product(&[1], &[2], &[3]);
        let scores = project(&t, Axis::Z, &sdr(10, &[1]), &Sdr::new(10));
        assert_eq!(scores.sum(), 0);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let n = 300;
        let mut rng = StdRng::seed_from_u64(11);
        let mut t = CountingTensor::new(n).unwrap();
        for _ in 0..50 {
            let (x, y, z) = (
                random_sdr(n, 6, &mut rng),
                random_sdr(n, 6, &mut rng),
                random_sdr(n, 6, &mut rng),
            );
            t.increment_product(x.positions(), y.positions(), z.positions());
        }
        let a = random_sdr(n, 6, &mut rng);
        let b = random_sdr(n, 6, &mut rng);
        for axis in Axis::ALL {
            assert_eq!(
                project(&t, axis, &a, &b),
                project_parallel(&t, axis, &a, &b),
                "axis {}",
                axis
            );
        }
    }

    #[test]
    fn test_axis_display() {
        assert_eq!(Axis::X.to_string(), "x");
        assert_eq!(Axis::Z.to_string(), "z");
    }
}
