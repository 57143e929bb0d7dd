use log::info;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::assembler::load_dataset;
use crate::config::Config;
use crate::error::{KMeansError, Result};
use crate::format::render;
use crate::refine::{RefineRequest, Refiner};
use crate::seeding::{seeded_rng, select_seeds};
use crate::vector::VectorMatrix;

/// Result of one clustering run. `centroids[i]` grew from `seeds[i]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClusteringReport {
    pub seeds: Vec<usize>,
    pub centroids: Vec<Vec<f64>>,
    pub iterations: usize,
    pub inertia: f64,
}

impl ClusteringReport {
    /// Standard output form: seed line, then one rounded line per centroid.
    pub fn render(&self) -> String {
        render(&self.seeds, &self.centroids)
    }
}

/// Seeds and refines an already assembled matrix.
pub fn cluster<F, R>(
    matrix: &VectorMatrix,
    k: usize,
    max_iter: usize,
    refiner: &F,
    rng: &mut R,
) -> Result<ClusteringReport>
where
    F: Refiner + ?Sized,
    R: Rng + ?Sized,
{
    if k < 1 || k >= matrix.len() {
        return Err(KMeansError::InvalidK { k, n: matrix.len() });
    }
    let seeds = select_seeds(matrix, k, rng)?;
    let request = RefineRequest::new(max_iter, &seeds, matrix);
    let refinement = refiner.refine(&request)?;
    info!(
        "refined {} centroids in {} iterations, inertia {:.4}",
        k, refinement.iterations, refinement.inertia
    );
    Ok(ClusteringReport {
        seeds,
        centroids: refinement.centroids,
        iterations: refinement.iterations,
        inertia: refinement.inertia,
    })
}

/// Loads both tables, validates K against the joined row count, then
/// seeds and refines. Nothing is printed; any failure aborts the whole run.
pub fn run<F, R>(config: &Config, refiner: &F, rng: &mut R) -> Result<ClusteringReport>
where
    F: Refiner + ?Sized,
    R: Rng + ?Sized,
{
    let matrix = load_dataset(&config.left, &config.right)?;
    cluster(&matrix, config.k, config.max_iter, refiner, rng)
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ElbowPoint {
    pub k: usize,
    pub inertia: f64,
}

/// Inertia for every K from 1 up to `max_k` (capped at N - 1), each run on
/// a freshly seeded generator so points are independent of one another.
pub fn elbow<F>(
    matrix: &VectorMatrix,
    max_k: usize,
    max_iter: usize,
    refiner: &F,
    seed: u64,
) -> Result<Vec<ElbowPoint>>
where
    F: Refiner + ?Sized,
{
    let upper = max_k.min(matrix.len().saturating_sub(1));
    (1..=upper)
        .map(|k| {
            let report = cluster(matrix, k, max_iter, refiner, &mut seeded_rng(seed))?;
            Ok::<_, KMeansError>(ElbowPoint {
                k,
                inertia: report.inertia,
            })
        })
        .collect()
}
