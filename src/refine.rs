use log::{debug, warn};
use ordered_float::OrderedFloat;
use rayon::prelude::*;

use crate::error::RefinementError;
use crate::vector::{squared_distance, VectorMatrix};

/// Centroid movement (Euclidean) at or below which refinement stops early.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Everything a refiner receives: bounds, the seed indices and the matrix
/// the seeds index into.
#[derive(Clone, Copy, Debug)]
pub struct RefineRequest<'a> {
    pub k: usize,
    pub max_iter: usize,
    pub dimension: usize,
    pub vector_count: usize,
    pub seeds: &'a [usize],
    pub vectors: &'a VectorMatrix,
}

impl<'a> RefineRequest<'a> {
    pub fn new(max_iter: usize, seeds: &'a [usize], vectors: &'a VectorMatrix) -> Self {
        RefineRequest {
            k: seeds.len(),
            max_iter,
            dimension: vectors.dimension(),
            vector_count: vectors.len(),
            seeds,
            vectors,
        }
    }

    pub fn validate(&self) -> Result<(), RefinementError> {
        if self.seeds.len() != self.k {
            return Err(RefinementError::SeedCountMismatch {
                expected: self.k,
                found: self.seeds.len(),
            });
        }
        if self.vectors.len() != self.vector_count {
            return Err(RefinementError::VectorCountMismatch {
                declared: self.vector_count,
                actual: self.vectors.len(),
            });
        }
        if let Some(index) = self.seeds.iter().copied().find(|&i| i >= self.vector_count) {
            return Err(RefinementError::SeedOutOfRange {
                index,
                vector_count: self.vector_count,
            });
        }
        if let Some((index, row)) = self
            .vectors
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != self.dimension)
        {
            return Err(RefinementError::DimensionMismatch {
                index,
                expected: self.dimension,
                found: row.len(),
            });
        }
        Ok(())
    }

    /// Copies of the seeded rows, in seed order.
    pub fn initial_centroids(&self) -> Vec<Vec<f64>> {
        self.seeds
            .iter()
            .map(|&i| self.vectors.row(i).to_vec())
            .collect()
    }
}

/// Output of a refiner. `centroids[i]` evolved from `seeds[i]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Refinement {
    pub centroids: Vec<Vec<f64>>,
    pub iterations: usize,
    pub inertia: f64,
}

pub trait Refiner {
    fn refine(&self, request: &RefineRequest<'_>) -> Result<Refinement, RefinementError>;
}

/// Lloyd iteration: assign every vector to its nearest centroid, move each
/// centroid to the mean of its members, repeat until nothing moves more
/// than `tolerance` or `max_iter` rounds have run.
#[derive(Clone, Copy, Debug)]
pub struct LloydRefiner {
    pub tolerance: f64,
}

impl Default for LloydRefiner {
    fn default() -> Self {
        LloydRefiner {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl Refiner for LloydRefiner {
    fn refine(&self, request: &RefineRequest<'_>) -> Result<Refinement, RefinementError> {
        request.validate()?;
        let vectors = request.vectors;
        let mut centroids = request.initial_centroids();
        let mut iterations = 0;

        while iterations < request.max_iter {
            iterations += 1;
            let assignments = assign(vectors, &centroids);

            let mut sums = vec![vec![0.0; request.dimension]; request.k];
            let mut counts = vec![0usize; request.k];
            for (row, &cluster) in vectors.iter().zip(assignments.iter()) {
                counts[cluster] += 1;
                for (sum, value) in sums[cluster].iter_mut().zip(row) {
                    *sum += value;
                }
            }

            let mut max_shift: f64 = 0.0;
            for (cluster, (sum, count)) in sums.into_iter().zip(counts).enumerate() {
                if count == 0 {
                    warn!(
                        "cluster {} is empty at iteration {}, keeping its centroid",
                        cluster, iterations
                    );
                    continue;
                }
                let mean: Vec<f64> = sum.into_iter().map(|s| s / count as f64).collect();
                if mean.iter().any(|v| !v.is_finite()) {
                    return Err(RefinementError::Diverged {
                        centroid: cluster,
                        iteration: iterations,
                    });
                }
                max_shift = max_shift.max(squared_distance(&mean, &centroids[cluster]).sqrt());
                centroids[cluster] = mean;
            }

            debug!("iteration {}: max centroid shift {:e}", iterations, max_shift);
            if max_shift <= self.tolerance {
                break;
            }
        }

        let inertia = inertia(vectors, &centroids);
        Ok(Refinement {
            centroids,
            iterations,
            inertia,
        })
    }
}

/// Returns the seeded rows untouched. Lets seeding be checked without a
/// real refinement in the way.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityRefiner;

impl Refiner for IdentityRefiner {
    fn refine(&self, request: &RefineRequest<'_>) -> Result<Refinement, RefinementError> {
        request.validate()?;
        let centroids = request.initial_centroids();
        let inertia = inertia(request.vectors, &centroids);
        Ok(Refinement {
            centroids,
            iterations: 0,
            inertia,
        })
    }
}

/// Index of the nearest centroid; ties go to the lowest index.
pub fn nearest_centroid(row: &[f64], centroids: &[Vec<f64>]) -> usize {
    centroids
        .iter()
        .enumerate()
        .min_by_key(|(_, center)| OrderedFloat(squared_distance(row, center)))
        .map_or(0, |(index, _)| index)
}

fn assign(vectors: &VectorMatrix, centroids: &[Vec<f64>]) -> Vec<usize> {
    vectors
        .rows()
        .par_iter()
        .map(|row| nearest_centroid(row, centroids))
        .collect()
}

/// Sum of squared distances from each vector to its nearest centroid.
pub fn inertia(vectors: &VectorMatrix, centroids: &[Vec<f64>]) -> f64 {
    vectors
        .iter()
        .map(|row| {
            centroids
                .iter()
                .map(|center| squared_distance(row, center))
                .fold(f64::INFINITY, f64::min)
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_blobs() -> VectorMatrix {
        VectorMatrix::from_rows(vec![
            vec![0.0, 0.0],
            vec![0.0, 2.0],
            vec![10.0, 10.0],
            vec![2.0, 0.0],
            vec![12.0, 10.0],
            vec![10.0, 12.0],
        ])
        .unwrap()
    }

    #[test]
    fn converges_to_blob_means() {
        let data = two_blobs();
        let seeds = [0, 2];
        let result = LloydRefiner::default()
            .refine(&RefineRequest::new(300, &seeds, &data))
            .unwrap();
        let third = 2.0 / 3.0;
        assert_eq!(result.centroids.len(), 2);
        assert!((result.centroids[0][0] - third).abs() < 1e-12);
        assert!((result.centroids[0][1] - third).abs() < 1e-12);
        assert!((result.centroids[1][0] - (10.0 + third)).abs() < 1e-12);
        assert!((result.centroids[1][1] - (10.0 + third)).abs() < 1e-12);
        assert!(result.iterations >= 2);
        assert!(result.inertia > 0.0);
    }

    #[test]
    fn centroid_order_follows_seed_order() {
        let data = two_blobs();
        let seeds = [4, 1];
        let result = LloydRefiner::default()
            .refine(&RefineRequest::new(300, &seeds, &data))
            .unwrap();
        assert!(result.centroids[0][0] > 5.0);
        assert!(result.centroids[1][0] < 5.0);
    }

    #[test]
    fn stops_at_max_iter() {
        let data = two_blobs();
        let seeds = [0, 1];
        let result = LloydRefiner::default()
            .refine(&RefineRequest::new(1, &seeds, &data))
            .unwrap();
        assert_eq!(result.iterations, 1);
    }

    #[test]
    fn empty_cluster_keeps_previous_centroid() {
        let data = VectorMatrix::from_rows(vec![vec![1.0], vec![1.0], vec![5.0]]).unwrap();
        // Both seeds sit on the value 1.0; ties send every member to cluster 0.
        let seeds = [0, 1];
        let result = LloydRefiner::default()
            .refine(&RefineRequest::new(1, &seeds, &data))
            .unwrap();
        assert_eq!(result.centroids[1], vec![1.0]);
        assert!((result.centroids[0][0] - 7.0 / 3.0).abs() < 1e-12);

        // A second round pulls the pair apart again.
        let result = LloydRefiner::default()
            .refine(&RefineRequest::new(10, &seeds, &data))
            .unwrap();
        assert_eq!(result.centroids, vec![vec![5.0], vec![1.0]]);
        assert_eq!(result.inertia, 0.0);
    }

    #[test]
    fn identity_returns_seed_rows() {
        let data = two_blobs();
        let seeds = [5, 3];
        let result = IdentityRefiner
            .refine(&RefineRequest::new(300, &seeds, &data))
            .unwrap();
        assert_eq!(result.centroids, vec![vec![10.0, 12.0], vec![2.0, 0.0]]);
        assert_eq!(result.iterations, 0);
    }

    #[test]
    fn rejects_malformed_requests() {
        let data = two_blobs();
        let seeds = [0, 9];
        assert_eq!(
            IdentityRefiner.refine(&RefineRequest::new(5, &seeds, &data)),
            Err(RefinementError::SeedOutOfRange {
                index: 9,
                vector_count: 6
            })
        );

        let seeds = [0, 1];
        let mut request = RefineRequest::new(5, &seeds, &data);
        request.k = 3;
        assert_eq!(
            request.validate(),
            Err(RefinementError::SeedCountMismatch {
                expected: 3,
                found: 2
            })
        );

        let mut request = RefineRequest::new(5, &seeds, &data);
        request.dimension = 3;
        assert!(matches!(
            request.validate(),
            Err(RefinementError::DimensionMismatch { index: 0, .. })
        ));
    }

    #[test]
    fn nearest_prefers_lowest_index_on_ties() {
        let centroids = vec![vec![1.0], vec![-1.0]];
        assert_eq!(nearest_centroid(&[0.0], &centroids), 0);
        assert_eq!(nearest_centroid(&[-0.5], &centroids), 1);
    }
}
