//! Core SDR value type and sparse-set operations.
//!
//! An SDR holds its active positions as a strictly ascending `Vec<usize>`.
//! Set operations are merge-joins over the two sorted lists, so they cost
//! `O(|x| + |y|)` regardless of the universe size.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TriadicError};

/// A sparse set of positions drawn from the universe `[0, n)`.
///
/// Deserialization goes through [`Sdr::from_positions`], so a decoded SDR
/// upholds the same invariants as a constructed one.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawSdr")]
pub struct Sdr {
    /// Universe size.
    n: usize,

    /// Active positions, strictly ascending.
    positions: Vec<usize>,
}

/// Unvalidated wire shape of an [`Sdr`].
#[derive(Deserialize)]
struct RawSdr {
    n: usize,
    positions: Vec<usize>,
}

impl TryFrom<RawSdr> for Sdr {
    type Error = TriadicError;

    fn try_from(raw: RawSdr) -> Result<Self> {
        Sdr::from_positions(raw.n, raw.positions)
    }
}

impl Sdr {
    /// Create an empty SDR over a universe of size `n`.
    pub fn new(n: usize) -> Self {
        Self {
            n,
            positions: Vec::new(),
        }
    }

    /// Build an SDR from arbitrary positions.
    ///
    /// Input is sorted and de-duplicated. Any position `>= n` is rejected.
    pub fn from_positions(n: usize, positions: impl IntoIterator<Item = usize>) -> Result<Self> {
        let mut positions: Vec<usize> = positions.into_iter().collect();
        if let Some(&position) = positions.iter().find(|&&p| p >= n) {
            return Err(TriadicError::PositionOutOfRange { position, n });
        }
        positions.sort_unstable();
        positions.dedup();
        Ok(Self { n, positions })
    }

    /// Build an SDR from positions already known to be ascending, unique and
    /// in range. Checked in debug builds only.
    pub(crate) fn from_sorted_unchecked(n: usize, positions: Vec<usize>) -> Self {
        debug_assert!(positions.windows(2).all(|w| w[0] < w[1]));
        debug_assert!(positions.last().map_or(true, |&p| p < n));
        Self { n, positions }
    }

    /// Universe size.
    pub fn universe(&self) -> usize {
        self.n
    }

    /// Active positions in ascending order.
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    /// Number of active positions.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Membership test (binary search).
    pub fn contains(&self, position: usize) -> bool {
        self.positions.binary_search(&position).is_ok()
    }

    /// Check that every position is valid for a universe of size `n`.
    pub fn check_universe(&self, n: usize) -> Result<()> {
        if self.n != n {
            return Err(TriadicError::UniverseMismatch {
                expected: n,
                found: self.n,
            });
        }
        match self.positions.iter().find(|&&p| p >= n) {
            Some(&position) => Err(TriadicError::PositionOutOfRange { position, n }),
            None => Ok(()),
        }
    }

    /// Number of positions shared with `other`.
    pub fn overlap(&self, other: &Sdr) -> usize {
        let (mut i, mut j, mut shared) = (0, 0, 0);
        while i < self.positions.len() && j < other.positions.len() {
            match self.positions[i].cmp(&other.positions[j]) {
                Ordering::Equal => {
                    shared += 1;
                    i += 1;
                    j += 1;
                }
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
            }
        }
        shared
    }

    /// Sparse Hamming distance: positions present in exactly one of the two sets.
    pub fn distance(&self, other: &Sdr) -> usize {
        distance(self, other)
    }

    /// Positions rendered 1-indexed and space separated, as on the wire.
    pub fn to_wire(&self) -> String {
        self.positions
            .iter()
            .map(|p| (p + 1).to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Symmetric-difference size of two SDRs.
///
/// Starts from `|x| + |y|` and subtracts two for every shared position.
pub fn distance(x: &Sdr, y: &Sdr) -> usize {
    let (a, b) = (&x.positions, &y.positions);
    let (mut i, mut j) = (0, 0);
    let mut h = a.len() + b.len();

    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Equal => {
                h -= 2;
                i += 1;
                j += 1;
            }
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
        }
    }
    h
}

impl fmt::Debug for Sdr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sdr(n={}, p={}, {:?})", self.n, self.positions.len(), self.positions)
    }
}

impl fmt::Display for Sdr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sdr(n: usize, p: &[usize]) -> Sdr {
        Sdr::from_positions(n, p.iter().copied()).unwrap()
    }

    #[test]
    fn test_new_is_empty() {
        let s = Sdr::new(100);
        assert!(s.is_empty());
        assert_eq!(s.universe(), 100);
    }

    #[test]
    fn test_from_positions_sorts_and_dedups() {
        let s = sdr(50, &[9, 3, 3, 41, 0]);
        assert_eq!(s.positions(), &[0, 3, 9, 41]);
        assert_eq!(s.len(), 4);
    }

    #[test]
    fn test_from_positions_rejects_out_of_range() {
        let err = Sdr::from_positions(10, [1, 10]).unwrap_err();
        assert_eq!(err, TriadicError::PositionOutOfRange { position: 10, n: 10 });
    }

    #[test]
    fn test_distance_identical_is_zero() {
        let a = sdr(100, &[1, 5, 9, 70]);
        assert_eq!(distance(&a, &a), 0);
    }

    #[test]
    fn test_distance_disjoint() {
        let a = sdr(100, &[1, 2, 3]);
        let b = sdr(100, &[4, 5]);
        assert_eq!(distance(&a, &b), 5);
    }

    #[test]
    fn test_distance_matches_set_formula() {
        let a = sdr(100, &[1, 4, 9, 16, 25, 36, 49]);
        let b = sdr(100, &[2, 4, 8, 16, 32, 64]);
        let expected = a.len() + b.len() - 2 * a.overlap(&b);
        assert_eq!(a.overlap(&b), 2);
        assert_eq!(distance(&a, &b), expected);
        assert_eq!(distance(&a, &b), distance(&b, &a));
    }

    #[test]
    fn test_distance_with_empty() {
        let a = sdr(100, &[7, 8]);
        assert_eq!(distance(&a, &Sdr::new(100)), 2);
        assert_eq!(distance(&Sdr::new(100), &Sdr::new(100)), 0);
    }

    #[test]
    fn test_contains() {
        let a = sdr(100, &[10, 20, 30]);
        assert!(a.contains(20));
        assert!(!a.contains(21));
    }

    #[test]
    fn test_check_universe() {
        let a = sdr(100, &[10]);
        assert!(a.check_universe(100).is_ok());
        assert_eq!(
            a.check_universe(50),
            Err(TriadicError::UniverseMismatch { expected: 50, found: 100 })
        );
    }

    #[test]
    fn test_deserialize_validates_positions() {
        let err = serde_json::from_str::<Sdr>(r#"{"n":10,"positions":[50,3]}"#).unwrap_err();
        assert!(err.to_string().contains("out of range"), "{}", err);

        let s: Sdr = serde_json::from_str(r#"{"n":10,"positions":[7,3,7]}"#).unwrap();
        assert_eq!(s.positions(), &[3, 7]);
        assert!(s.check_universe(10).is_ok());
    }

    #[test]
    fn test_serde_round_trip() {
        let a = sdr(100, &[0, 36, 99]);
        let json = serde_json::to_string(&a).unwrap();
        assert_eq!(serde_json::from_str::<Sdr>(&json).unwrap(), a);
    }

    #[test]
    fn test_wire_is_one_indexed() {
        let a = sdr(100, &[0, 36, 99]);
        assert_eq!(a.to_wire(), "1 37 100");
        assert_eq!(Sdr::new(10).to_string(), "");
    }
}
