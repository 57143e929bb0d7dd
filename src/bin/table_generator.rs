// src/bin/table_generator.rs
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use kmeans_pp::seeded_rng;
use rand::seq::SliceRandom;
use rand::Rng;

/// Writes a pair of keyed tables whose join holds clustered blobs.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    #[arg(default_value = "test_tables")]
    output: PathBuf,

    #[arg(long, default_value_t = 5)]
    clusters: usize,

    #[arg(long, default_value_t = 100)]
    rows_per_cluster: usize,

    /// Feature columns in each of the two tables
    #[arg(long, default_value_t = 2)]
    dims: usize,

    /// Keys present in only one table, per table
    #[arg(long, default_value_t = 3)]
    orphans: usize,

    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn random_point(dim: usize, rng: &mut impl Rng) -> Vec<f64> {
    (0..dim).map(|_| rng.gen_range(-10.0..10.0)).collect()
}

fn write_table(path: &Path, rows: &[(usize, Vec<f64>)]) -> std::io::Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    for (key, features) in rows {
        write!(file, "{}", key)?;
        for component in features {
            write!(file, ",{:.4}", component)?;
        }
        writeln!(file)?;
    }
    file.flush()
}

fn create_tables(args: &Args) -> std::io::Result<()> {
    fs::create_dir_all(&args.output)?;
    let mut rng = seeded_rng(args.seed);
    let total = args.clusters * args.rows_per_cluster;

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}",
            )
            .unwrap()
            .progress_chars("=>-"),
    );

    let mut left = Vec::with_capacity(total + args.orphans);
    let mut right = Vec::with_capacity(total + args.orphans);
    let mut key = 0;
    for cluster in 0..args.clusters {
        // Each blob gets its own center; rows scatter around it.
        let center = random_point(2 * args.dims, &mut rng);
        for _ in 0..args.rows_per_cluster {
            let point: Vec<f64> = center
                .iter()
                .map(|c| c + rng.gen_range(-0.5..0.5))
                .collect();
            left.push((key, point[..args.dims].to_vec()));
            right.push((key, point[args.dims..].to_vec()));
            key += 1;
            pb.inc(1);
        }
        pb.set_message(format!("Cluster {}/{}", cluster + 1, args.clusters));
    }

    for _ in 0..args.orphans {
        left.push((key, random_point(args.dims, &mut rng)));
        right.push((key + 1, random_point(args.dims, &mut rng)));
        key += 2;
    }

    left.shuffle(&mut rng);
    right.shuffle(&mut rng);
    write_table(&args.output.join("table_1.txt"), &left)?;
    write_table(&args.output.join("table_2.txt"), &right)?;

    pb.finish_with_message("Table generation complete");
    Ok(())
}

fn main() -> std::io::Result<()> {
    let args = Args::parse();

    println!("Table Generation Tool");
    println!("--------------------");
    println!("Output directory: {}", args.output.display());
    println!("Clusters: {}", args.clusters);
    println!("Rows per cluster: {}", args.rows_per_cluster);
    println!("Features per table: {}", args.dims);
    println!("Joined vectors: {}", args.clusters * args.rows_per_cluster);
    println!();

    create_tables(&args)?;

    println!(
        "\nTables written; run: kmeans-pp K {0}/table_1.txt {0}/table_2.txt",
        args.output.display()
    );
    Ok(())
}
