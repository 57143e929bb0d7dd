use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures raised by the refinement step. Kept apart from [`KMeansError`]
/// so a collaborator can be swapped without touching the pipeline taxonomy.
#[derive(Debug, Error, PartialEq)]
pub enum RefinementError {
    #[error("expected {expected} seed indices, got {found}")]
    SeedCountMismatch { expected: usize, found: usize },
    #[error("vector count {declared} does not match the {actual} vectors supplied")]
    VectorCountMismatch { declared: usize, actual: usize },
    #[error("seed index {index} is out of range for {vector_count} vectors")]
    SeedOutOfRange { index: usize, vector_count: usize },
    #[error("vector {index} has dimension {found}, expected {expected}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },
    #[error("centroid {centroid} diverged at iteration {iteration}")]
    Diverged { centroid: usize, iteration: usize },
}

#[derive(Debug, Error)]
pub enum KMeansError {
    #[error("{}: {}", .path.display(), .source)]
    Data {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{}:{line}: {reason}", .path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        reason: String,
    },
    #[error("usage: kmeans-pp K [max_iter] file1 file2 (got {found} arguments)")]
    Usage { found: usize },
    #[error("K input has to be a number and should exceed 0: k = {raw}")]
    InvalidKArgument { raw: String },
    #[error("K must be smaller than the number of vectors: K = {k}, number of vectors = {n}")]
    InvalidK { k: usize, n: usize },
    #[error("max_iter input has to be a number and should exceed 0: max_iter = {raw}")]
    InvalidMaxIter { raw: String },
    #[error("refinement failed: {0}")]
    Refinement(#[from] RefinementError),
}

impl KMeansError {
    /// True for the unreadable / malformed input class.
    pub fn is_data_error(&self) -> bool {
        matches!(self, KMeansError::Data { .. } | KMeansError::Parse { .. })
    }

    /// Process status for this failure. I/O failures surface the OS errno
    /// (2 for a missing file) so scripts can tell them apart.
    pub fn exit_code(&self) -> i32 {
        match self {
            KMeansError::Data { source, .. } => source.raw_os_error().unwrap_or(1),
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, KMeansError>;
