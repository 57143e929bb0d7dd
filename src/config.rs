use std::path::PathBuf;

use crate::error::{KMeansError, Result};

pub const DEFAULT_MAX_ITER: usize = 300;

/// A validated run: cluster count, iteration bound and the two tables.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub k: usize,
    pub max_iter: usize,
    pub left: PathBuf,
    pub right: PathBuf,
}

impl Config {
    /// Interprets `K [max_iter] file1 file2`.
    ///
    /// Only the shape of K is checked here; K < N needs the joined data and
    /// is enforced by the pipeline.
    pub fn from_positional<S: AsRef<str>>(args: &[S]) -> Result<Self> {
        let (k_raw, max_iter_raw, left, right) = match args {
            [k, left, right] => (k.as_ref(), None, left, right),
            [k, max_iter, left, right] => (k.as_ref(), Some(max_iter.as_ref()), left, right),
            _ => return Err(KMeansError::Usage { found: args.len() }),
        };

        let k = parse_positive(k_raw).ok_or_else(|| KMeansError::InvalidKArgument {
            raw: k_raw.to_string(),
        })?;
        let max_iter = match max_iter_raw {
            Some(raw) => parse_positive(raw).ok_or_else(|| KMeansError::InvalidMaxIter {
                raw: raw.to_string(),
            })?,
            None => DEFAULT_MAX_ITER,
        };

        Ok(Config {
            k,
            max_iter,
            left: PathBuf::from(left.as_ref()),
            right: PathBuf::from(right.as_ref()),
        })
    }
}

/// Digits only, so `+3`, `3.0` and `-1` are refused.
fn parse_positive(raw: &str) -> Option<usize> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse::<usize>().ok().filter(|&v| v > 0)
}
