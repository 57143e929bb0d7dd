pub mod assembler;
pub mod config;
pub mod error;
pub mod format;
pub mod pipeline;
pub mod refine;
pub mod seeding;
pub mod table;
pub mod vector;

pub use assembler::{assemble, load_dataset};
pub use config::{Config, DEFAULT_MAX_ITER};
pub use error::{KMeansError, RefinementError};
pub use format::render;
pub use pipeline::{cluster, elbow, run, ClusteringReport, ElbowPoint};
pub use refine::{IdentityRefiner, LloydRefiner, RefineRequest, Refinement, Refiner};
pub use seeding::{select_seeds, seeded_rng, DEFAULT_SEED};
pub use table::read_table;
pub use vector::{squared_distance, FeatureRecord, VectorMatrix};
