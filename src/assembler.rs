use std::collections::BTreeMap;
use std::path::Path;

use log::info;

use crate::error::Result;
use crate::table::read_table;
use crate::vector::{FeatureRecord, JoinKey, VectorMatrix};

/// Inner-joins two keyed tables into one matrix ordered by ascending key.
///
/// Each output row is the left features followed by the right features.
/// Duplicate keys produce one row per (left, right) pair, left rows in file
/// order first. Inputs are never modified.
pub fn assemble(left: &[FeatureRecord], right: &[FeatureRecord]) -> VectorMatrix {
    let mut right_by_key: BTreeMap<JoinKey, Vec<&FeatureRecord>> = BTreeMap::new();
    for record in right {
        right_by_key.entry(record.key).or_default().push(record);
    }

    let mut left_by_key: BTreeMap<JoinKey, Vec<&FeatureRecord>> = BTreeMap::new();
    for record in left {
        left_by_key.entry(record.key).or_default().push(record);
    }

    let mut rows = Vec::new();
    for (key, left_rows) in &left_by_key {
        let Some(right_rows) = right_by_key.get(key) else {
            continue;
        };
        for l in left_rows {
            for r in right_rows {
                let mut row = Vec::with_capacity(l.features.len() + r.features.len());
                row.extend_from_slice(&l.features);
                row.extend_from_slice(&r.features);
                rows.push(row);
            }
        }
    }

    // The readers enforce one width per table, so every joined row agrees.
    VectorMatrix::from_rows(rows).unwrap_or_default()
}

/// Reads both tables and joins them.
pub fn load_dataset(left: &Path, right: &Path) -> Result<VectorMatrix> {
    let left_records = read_table(left)?;
    let right_records = read_table(right)?;
    let matrix = assemble(&left_records, &right_records);
    info!(
        "joined {} x {} rows into {} vectors of dimension {}",
        left_records.len(),
        right_records.len(),
        matrix.len(),
        matrix.dimension()
    );
    Ok(matrix)
}
