use log::{debug, warn};
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{KMeansError, Result};
use crate::vector::{squared_distance, VectorMatrix};

/// Seed of the generator behind reproducible runs.
pub const DEFAULT_SEED: u64 = 0;

pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Squared distance from every vector to its nearest chosen centroid.
///
/// Owned by a single seeding run and folded forward one centroid at a time,
/// so each step costs O(N·D) regardless of how many centroids exist.
#[derive(Debug)]
pub struct MinDistances {
    values: Vec<f64>,
}

impl MinDistances {
    pub fn new(len: usize) -> Self {
        MinDistances {
            values: vec![f64::INFINITY; len],
        }
    }

    pub fn absorb(&mut self, matrix: &VectorMatrix, centroid: usize) {
        let center = matrix.row(centroid);
        for (value, row) in self.values.iter_mut().zip(matrix.iter()) {
            let dist = squared_distance(row, center);
            if dist < *value {
                *value = dist;
            }
        }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

/// Normalises the distances into a probability distribution.
///
/// Returns `None` when the distances sum to zero (every vector sits on a
/// chosen centroid) or overflow, leaving the caller to pick a fallback.
pub fn probabilities(min_dist: &[f64]) -> Option<Vec<f64>> {
    let total: f64 = min_dist.iter().sum();
    if !(total > 0.0) || !total.is_finite() {
        return None;
    }
    Some(min_dist.iter().map(|d| d / total).collect())
}

/// k-means++ seeding: picks `k` distinct row indices of `matrix`.
///
/// The first index is uniform over all rows; each further index is drawn
/// with probability proportional to its squared distance to the nearest
/// index already chosen. Indices are returned in selection order.
pub fn select_seeds<R: Rng + ?Sized>(
    matrix: &VectorMatrix,
    k: usize,
    rng: &mut R,
) -> Result<Vec<usize>> {
    let n = matrix.len();
    if k < 1 || k >= n {
        return Err(KMeansError::InvalidK { k, n });
    }

    let mut seeds = Vec::with_capacity(k);
    let mut selected = vec![false; n];
    let mut min_dist = MinDistances::new(n);

    let first = rng.gen_range(0..n);
    seeds.push(first);
    selected[first] = true;
    debug!("seed 0: index {}", first);

    while seeds.len() < k {
        let latest = seeds[seeds.len() - 1];
        min_dist.absorb(matrix, latest);

        let distances = min_dist.as_slice();
        let overflowed: Vec<usize> = (0..n).filter(|&i| distances[i].is_infinite()).collect();
        let next = if !overflowed.is_empty() {
            // An infinite squared distance outweighs every finite one.
            debug!(
                "{} squared distances overflow, drawing among those only",
                overflowed.len()
            );
            overflowed[rng.gen_range(0..overflowed.len())]
        } else {
            match probabilities(distances).and_then(|probs| WeightedIndex::new(&probs).ok()) {
                Some(dist) => dist.sample(rng),
                None => {
                    // Only coincident vectors remain; draw uniformly among the unused ones.
                    let unused: Vec<usize> = (0..n).filter(|&i| !selected[i]).collect();
                    warn!(
                        "all vectors coincide with chosen centroids, \
                         picking seed {} uniformly from {} candidates",
                        seeds.len(),
                        unused.len()
                    );
                    unused[rng.gen_range(0..unused.len())]
                }
            }
        };

        debug_assert!(!selected[next]);
        debug!("seed {}: index {}", seeds.len(), next);
        selected[next] = true;
        seeds.push(next);
    }

    Ok(seeds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use std::collections::HashSet;

    fn matrix(rows: &[&[f64]]) -> VectorMatrix {
        VectorMatrix::from_rows(rows.iter().map(|r| r.to_vec()).collect()).unwrap()
    }

    fn grid(n: usize) -> VectorMatrix {
        VectorMatrix::from_rows(
            (0..n)
                .map(|i| vec![(i % 7) as f64, (i / 7) as f64 * 1.5, (i * i % 11) as f64])
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn seeds_are_distinct_and_in_range() {
        let data = grid(40);
        for seed in 0..20 {
            for k in [1, 2, 5, 39] {
                let seeds = select_seeds(&data, k, &mut seeded_rng(seed)).unwrap();
                assert_eq!(seeds.len(), k);
                assert!(seeds.iter().all(|&i| i < data.len()));
                assert_eq!(seeds.iter().collect::<HashSet<_>>().len(), k);
            }
        }
    }

    #[test]
    fn fixed_seed_is_reproducible() {
        let data = grid(64);
        let a = select_seeds(&data, 8, &mut seeded_rng(DEFAULT_SEED)).unwrap();
        let b = select_seeds(&data, 8, &mut seeded_rng(DEFAULT_SEED)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn zero_generator_takes_first_positive_weight() {
        // An all-zero generator draws index 0 first, then the lowest index
        // whose probability is non-zero.
        let data = matrix(&[&[0.0], &[0.0], &[5.0], &[9.0]]);
        let seeds = select_seeds(&data, 3, &mut StepRng::new(0, 0)).unwrap();
        assert_eq!(seeds, vec![0, 2, 3]);
    }

    #[test]
    fn far_point_wins_once_near_points_are_covered() {
        let data = matrix(&[&[0.0, 0.0], &[0.0, 0.0], &[0.0, 0.0], &[100.0, 100.0]]);
        for seed in 0..10 {
            let seeds = select_seeds(&data, 2, &mut seeded_rng(seed)).unwrap();
            if seeds[0] != 3 {
                assert_eq!(seeds[1], 3);
            }
        }
    }

    #[test]
    fn overflowing_distance_outweighs_finite_ones() {
        // (1e200)^2 overflows to infinity; the far row must still win every draw.
        let data = matrix(&[&[0.0], &[1.0], &[1e200]]);
        assert_eq!(
            select_seeds(&data, 2, &mut StepRng::new(0, 0)).unwrap(),
            vec![0, 2]
        );
        for seed in 0..200 {
            let seeds = select_seeds(&data, 2, &mut seeded_rng(seed)).unwrap();
            if seeds[0] != 2 {
                assert_eq!(seeds[1], 2, "seed {} picked {:?}", seed, seeds);
            }
        }
    }

    #[test]
    fn identical_vectors_fall_back_to_uniform() {
        let data = VectorMatrix::from_rows(vec![vec![1.0, 1.0]; 5]).unwrap();
        let seeds = select_seeds(&data, 2, &mut StepRng::new(0, 0)).unwrap();
        assert_eq!(seeds, vec![0, 1]);

        let seeds = select_seeds(&data, 4, &mut seeded_rng(7)).unwrap();
        assert_eq!(seeds.iter().collect::<HashSet<_>>().len(), 4);
    }

    #[test]
    fn k_must_be_below_n() {
        let data = matrix(&[&[0.0, 0.0, 0.0], &[10.0, 10.0, 10.0]]);
        assert!(matches!(
            select_seeds(&data, 2, &mut seeded_rng(0)),
            Err(KMeansError::InvalidK { k: 2, n: 2 })
        ));
        assert!(matches!(
            select_seeds(&data, 0, &mut seeded_rng(0)),
            Err(KMeansError::InvalidK { k: 0, n: 2 })
        ));
        assert_eq!(select_seeds(&data, 1, &mut seeded_rng(0)).unwrap().len(), 1);
    }

    #[test]
    fn probabilities_sum_to_one() {
        let probs = probabilities(&[0.0, 1.0, 4.0, 2.5, 0.125]).unwrap();
        assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!(probs.iter().all(|&p| p >= 0.0));
        assert_eq!(probs[0], 0.0);
    }

    #[test]
    fn zero_distances_have_no_distribution() {
        assert!(probabilities(&[0.0, 0.0, 0.0]).is_none());
    }

    #[test]
    fn running_minimum_keeps_nearest_centroid() {
        let data = matrix(&[&[0.0], &[4.0], &[10.0]]);
        let mut min_dist = MinDistances::new(3);
        min_dist.absorb(&data, 0);
        assert_eq!(min_dist.as_slice(), &[0.0, 16.0, 100.0]);
        min_dist.absorb(&data, 2);
        assert_eq!(min_dist.as_slice(), &[0.0, 16.0, 0.0]);
    }
}
