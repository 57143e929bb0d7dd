use std::process;

use clap::Parser;
use kmeans_pp::{run, seeded_rng, Config, LloydRefiner, DEFAULT_SEED};
use log::debug;

/// k-means++ seeding and Lloyd refinement over two joined tables.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// K [max_iter] file1 file2
    #[arg(required = true, num_args = 1.., value_name = "ARGS")]
    positional: Vec<String>,

    /// Log seeding and refinement steps to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    let mut log_builder = env_logger::builder();
    if args.verbose {
        log_builder.filter_level(log::LevelFilter::Debug);
    } else {
        log_builder.filter_level(log::LevelFilter::Warn);
    }
    log_builder.parse_default_env().init();
    debug!("arguments: {args:#?}");

    let outcome = Config::from_positional(args.positional.as_slice()).and_then(|config| {
        run(&config, &LloydRefiner::default(), &mut seeded_rng(DEFAULT_SEED))
    });

    match outcome {
        Ok(report) => print!("{}", report.render()),
        Err(e) => {
            eprintln!("{e}");
            process::exit(e.exit_code());
        }
    }
}
