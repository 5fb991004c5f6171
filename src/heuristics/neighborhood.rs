//! Segment reversal neighborhood.
//!
//! A move picks two positions `i <= j` and reverses `tour[i..=j]`. This is
//! the classic 2-opt style move; `i == j` leaves the tour unchanged and
//! `i = 0, j = n - 1` reverses the whole tour.

use crate::heuristics::random::RandomSource;

/// Random segment reversal move generator
#[derive(Debug, Clone, Copy, Default)]
pub struct SegmentReversal;

impl SegmentReversal {
    pub fn new() -> Self {
        SegmentReversal
    }

    /// Draw two positions independently from `0..n` and order them
    #[inline]
    pub fn pick<R: RandomSource + ?Sized>(&self, n: usize, rng: &mut R) -> (usize, usize) {
        let a = rng.next_index(n);
        let b = rng.next_index(n);
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }

    /// Build a candidate tour without touching `tour`.
    /// Returns the candidate and the reversed bounds.
    pub fn propose<R: RandomSource + ?Sized>(
        &self,
        tour: &[usize],
        rng: &mut R,
    ) -> (Vec<usize>, usize, usize) {
        let (i, j) = self.pick(tour.len(), rng);
        (reverse_segment(tour, i, j), i, j)
    }
}

/// Copy of `tour` with positions `i..=j` reversed.
///
/// Panics unless `i <= j < tour.len()`.
pub fn reverse_segment(tour: &[usize], i: usize, j: usize) -> Vec<usize> {
    let mut candidate = Vec::with_capacity(tour.len());
    reverse_segment_into(tour, i, j, &mut candidate);
    candidate
}

/// Same as [`reverse_segment`] but writes into a reused buffer
pub fn reverse_segment_into(tour: &[usize], i: usize, j: usize, out: &mut Vec<usize>) {
    assert!(i <= j && j < tour.len(), "invalid reversal bounds ({}, {}) for {} positions", i, j, tour.len());
    out.clear();
    out.extend_from_slice(tour);
    out[i..=j].reverse();
}

/// Length change caused by reversing `tour[i..=j]`, in O(1).
///
/// Only the two edges at the segment boundaries change, which holds for
/// symmetric matrices only. Reversing nothing or the whole tour gives 0.
pub fn reversal_delta(tour: &[usize], i: usize, j: usize, matrix: &[Vec<f64>]) -> f64 {
    let n = tour.len();
    if i == j || (i == 0 && j == n - 1) {
        return 0.0;
    }

    let prev = tour[(i + n - 1) % n];
    let next = tour[(j + 1) % n];
    let first = tour[i];
    let last = tour[j];

    matrix[prev][last] + matrix[first][next] - matrix[prev][first] - matrix[last][next]
}
