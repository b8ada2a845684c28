//! Rank-threshold binarization.
//!
//! Converts a dense score vector into an SDR by keeping every position whose
//! score reaches the `k`-th largest value. Ties at that value are all kept,
//! so the result holds *at least* `k` positions whenever `k` positions have
//! non-zero support; its size lies in `[k, n]`. The threshold never drops
//! below 1, so zero-score background is never selected.

use crate::sdr::sdr::Sdr;

/// The score a position needs to be selected: the `k`-th largest score,
/// floored at 1. `k` is clamped to `[1, n]`.
pub fn rank_threshold(scores: &[u32], k: usize) -> u32 {
    if scores.is_empty() {
        return 1;
    }
    let k = k.clamp(1, scores.len());
    let mut sorted = scores.to_vec();
    let rank = sorted.len() - k;
    let kth = *sorted.select_nth_unstable(rank).1;
    kth.max(1)
}

/// Select every position whose score is at or above the rank threshold.
///
/// `k == 0` yields an empty SDR.
pub fn binarize(scores: &[u32], k: usize) -> Sdr {
    let n = scores.len();
    if k == 0 {
        return Sdr::new(n);
    }
    let threshold = rank_threshold(scores, k);
    let positions = scores
        .iter()
        .enumerate()
        .filter(|(_, &s)| s >= threshold)
        .map(|(i, _)| i)
        .collect();
    Sdr::from_sorted_unchecked(n, positions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_k_without_ties() {
        let scores = [0, 9, 3, 7, 1, 8, 0, 2];
        let s = binarize(&scores, 3);
        assert_eq!(s.positions(), &[1, 3, 5]);
    }

    #[test]
    fn test_ties_inflate_result() {
        let scores = [5, 1, 5, 5, 0, 2];
        let s = binarize(&scores, 2);
        assert_eq!(s.positions(), &[0, 2, 3]);
    }

    #[test]
    fn test_all_zero_is_empty() {
        let scores = vec![0u32; 64];
        assert!(binarize(&scores, 10).is_empty());
        assert_eq!(rank_threshold(&scores, 10), 1);
    }

    #[test]
    fn test_sparse_support_not_padded_with_zeros() {
        // Fewer than k positions have support: threshold is forced to 1.
        let mut scores = vec![0u32; 100];
        scores[4] = 3;
        scores[60] = 1;
        let s = binarize(&scores, 10);
        assert_eq!(s.positions(), &[4, 60]);
    }

    #[test]
    fn test_k_larger_than_n() {
        let scores = [2, 0, 4];
        assert_eq!(binarize(&scores, 10).positions(), &[0, 2]);
    }

    #[test]
    fn test_k_zero() {
        assert!(binarize(&[3, 4, 5], 0).is_empty());
    }

    #[test]
    fn test_output_universe_matches_input() {
        let s = binarize(&[0, 1, 0, 0], 1);
        assert_eq!(s.universe(), 4);
        assert_eq!(s.positions(), &[1]);
    }
}
