use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};
use kmeans_pp::seeding::probabilities;
use kmeans_pp::vector::squared_distance;
use kmeans_pp::{select_seeds, seeded_rng, VectorMatrix};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

const SEED: u64 = 42;

fn generate_matrix(n: usize, dim: usize) -> VectorMatrix {
    let mut rng = seeded_rng(SEED);
    let rows = (0..n)
        .map(|_| (0..dim).map(|_| rng.gen_range(-1.0..1.0)).collect())
        .collect();
    VectorMatrix::from_rows(rows).unwrap()
}

/// Recomputes every distance against every chosen centroid each round.
/// Draws from the generator exactly like `select_seeds`.
fn naive_seeds(matrix: &VectorMatrix, k: usize, rng: &mut impl Rng) -> Vec<usize> {
    let n = matrix.len();
    let mut seeds = vec![rng.gen_range(0..n)];
    while seeds.len() < k {
        let min_dist: Vec<f64> = matrix
            .iter()
            .map(|row| {
                seeds
                    .iter()
                    .map(|&s| squared_distance(row, matrix.row(s)))
                    .fold(f64::INFINITY, f64::min)
            })
            .collect();
        let next = match probabilities(&min_dist).and_then(|p| WeightedIndex::new(&p).ok()) {
            Some(dist) => dist.sample(rng),
            None => {
                let unused: Vec<usize> = (0..n).filter(|i| !seeds.contains(i)).collect();
                unused[rng.gen_range(0..unused.len())]
            }
        };
        seeds.push(next);
    }
    seeds
}

fn main() {
    let n_vectors = 20_000;
    let dim = 32;
    let ks = [4, 16, 64, 128];
    let runs = 3;

    println!("=== k-means++ Seeding Benchmark ===");
    println!("Parameters:");
    println!("  Vectors: {}", n_vectors);
    println!("  Dimensions: {}", dim);
    println!("  K values: {:?}", ks);
    println!("  Runs per K: {}", runs);

    println!("\nGenerating {} random vectors...", n_vectors);
    let matrix = generate_matrix(n_vectors, dim);

    let pb = ProgressBar::new((ks.len() * runs) as u64);
    pb.set_style(ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
        .unwrap()
        .progress_chars("=>-"));

    let mut results = Vec::with_capacity(ks.len());
    for &k in &ks {
        let mut running = Duration::ZERO;
        let mut naive = Duration::ZERO;
        let mut agree = true;
        for run in 0..runs {
            let start = Instant::now();
            let fast = select_seeds(&matrix, k, &mut seeded_rng(run as u64)).unwrap();
            running += start.elapsed();

            let start = Instant::now();
            let slow = naive_seeds(&matrix, k, &mut seeded_rng(run as u64));
            naive += start.elapsed();

            agree &= fast == slow;
            pb.inc(1);
        }
        results.push((k, running / runs as u32, naive / runs as u32, agree));
    }
    pb.finish();

    println!("\nSeeding time (mean of {} runs):", runs);
    println!(
        "  {:>5}  {:>14}  {:>14}  {:>8}  {}",
        "K", "running min", "naive", "speedup", "same seeds"
    );
    for (k, running, naive, agree) in results {
        println!(
            "  {:>5}  {:>14?}  {:>14?}  {:>7.1}x  {}",
            k,
            running,
            naive,
            naive.as_secs_f64() / running.as_secs_f64(),
            agree
        );
    }
}
