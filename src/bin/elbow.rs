use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use kmeans_pp::{
    elbow, load_dataset, ElbowPoint, KMeansError, LloydRefiner, DEFAULT_MAX_ITER, DEFAULT_SEED,
};
use serde::Serialize;

/// Inertia (SSE) for a sweep of K over two joined tables.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    file1: PathBuf,
    file2: PathBuf,

    /// Largest K to try (capped at the number of vectors minus one)
    #[arg(long, default_value_t = 10)]
    max_k: usize,

    #[arg(long, default_value_t = DEFAULT_MAX_ITER)]
    max_iter: usize,

    /// Also write the sweep as JSON
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct ElbowReport {
    vector_count: usize,
    dimension: usize,
    seed: u64,
    points: Vec<ElbowPoint>,
}

fn sweep(args: &Args) -> Result<ElbowReport, KMeansError> {
    let matrix = load_dataset(&args.file1, &args.file2)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap(),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(format!(
        "Clustering {} vectors for K = 1..={}",
        matrix.len(),
        args.max_k
    ));
    let points = elbow(
        &matrix,
        args.max_k,
        args.max_iter,
        &LloydRefiner::default(),
        DEFAULT_SEED,
    )?;
    spinner.finish_with_message("Sweep complete");

    Ok(ElbowReport {
        vector_count: matrix.len(),
        dimension: matrix.dimension(),
        seed: DEFAULT_SEED,
        points,
    })
}

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();
    let args = Args::parse();

    println!("Elbow Sweep");
    println!("--------------------");
    println!("Tables:   {} + {}", args.file1.display(), args.file2.display());
    println!("Max K:    {}", args.max_k);
    println!("Max iter: {}", args.max_iter);

    let report = match sweep(&args) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error during sweep: {}", e);
            process::exit(e.exit_code());
        }
    };

    println!("\n{:>4}  {:>16}", "K", "SSE");
    for point in &report.points {
        println!("{:>4}  {:>16.4}", point.k, point.inertia);
    }

    if let Some(path) = &args.output {
        let written = File::create(path)
            .map(BufWriter::new)
            .map_err(serde_json::Error::io)
            .and_then(|writer| serde_json::to_writer_pretty(writer, &report));
        if let Err(e) = written {
            eprintln!("Error writing {}: {}", path.display(), e);
            process::exit(1);
        }
        println!("\nReport written to {}", path.display());
    }
}
