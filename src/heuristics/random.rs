//! Random source abstraction used by the search.
//!
//! The annealer only needs two kinds of draws, so it depends on this small
//! trait instead of a concrete generator. Every `rand::Rng` implements it;
//! tests can plug in scripted sources.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

pub trait RandomSource {
    /// Uniform index in `0..upper`. `upper` must be positive.
    fn next_index(&mut self, upper: usize) -> usize;

    /// Uniform real in `[0, 1)`
    fn next_unit(&mut self) -> f64;
}

impl<R: Rng + ?Sized> RandomSource for R {
    #[inline]
    fn next_index(&mut self, upper: usize) -> usize {
        self.gen_range(0..upper)
    }

    #[inline]
    fn next_unit(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// ChaCha8 generator seeded from `seed`, or from OS entropy when `None`.
/// Returns the seed actually used so a run can be replayed.
pub fn seeded_rng(seed: Option<u64>) -> (ChaCha8Rng, u64) {
    let seed = seed.unwrap_or_else(rand::random);
    (ChaCha8Rng::seed_from_u64(seed), seed)
}

/// Uniformly random permutation of `0..n` (Fisher-Yates)
pub fn random_permutation<R: RandomSource + ?Sized>(n: usize, rng: &mut R) -> Vec<usize> {
    let mut tour: Vec<usize> = (0..n).collect();
    for i in (1..n).rev() {
        let j = rng.next_index(i + 1);
        tour.swap(i, j);
    }
    tour
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permutation_is_complete() {
        let (mut rng, _) = seeded_rng(Some(7));
        for n in 0..20 {
            let mut tour = random_permutation(n, &mut rng);
            tour.sort_unstable();
            assert_eq!(tour, (0..n).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let (mut a, seed_a) = seeded_rng(Some(123));
        let (mut b, seed_b) = seeded_rng(Some(123));
        assert_eq!(seed_a, seed_b);
        assert_eq!(random_permutation(50, &mut a), random_permutation(50, &mut b));
        assert_eq!(a.next_unit(), b.next_unit());
    }

    #[test]
    fn test_draw_ranges() {
        let (mut rng, _) = seeded_rng(Some(99));
        for _ in 0..1000 {
            assert!(rng.next_index(5) < 5);
            let u = rng.next_unit();
            assert!((0.0..1.0).contains(&u));
        }
    }
}
