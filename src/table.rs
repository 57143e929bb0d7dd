use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::debug;

use crate::error::{KMeansError, Result};
use crate::vector::FeatureRecord;

const DELIMITER: char = ',';

/// Reads a headerless comma-delimited table whose first column is the join
/// key. Blank lines are skipped; every other row must carry the same number
/// of numeric feature columns.
pub fn read_table(path: &Path) -> Result<Vec<FeatureRecord>> {
    let data_err = |source| KMeansError::Data {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(data_err)?;
    let reader = BufReader::new(file);

    let mut records = Vec::new();
    let mut width: Option<usize> = None;
    for (line_no, line) in reader.lines().enumerate() {
        let line = line.map_err(data_err)?;
        if line.trim().is_empty() {
            continue;
        }
        let parse_err = |reason: String| KMeansError::Parse {
            path: path.to_path_buf(),
            line: line_no + 1,
            reason,
        };

        let record = parse_row(&line).map_err(parse_err)?;
        match width {
            None => width = Some(record.features.len()),
            Some(expected) if expected != record.features.len() => {
                return Err(parse_err(format!(
                    "expected {} feature columns, found {}",
                    expected,
                    record.features.len()
                )));
            }
            Some(_) => {}
        }
        records.push(record);
    }

    debug!(
        "read {} rows with {} features from {}",
        records.len(),
        width.unwrap_or(0),
        path.display()
    );
    Ok(records)
}

fn parse_row(line: &str) -> std::result::Result<FeatureRecord, String> {
    let mut fields = line.split(DELIMITER).map(str::trim);
    let key = fields
        .next()
        .ok_or_else(|| "missing key column".to_string())
        .and_then(parse_number)?;
    let features = fields.map(parse_number).collect::<std::result::Result<Vec<_>, _>>()?;
    if features.is_empty() {
        return Err("row has no feature columns".to_string());
    }
    Ok(FeatureRecord::new(key, features))
}

fn parse_number(field: &str) -> std::result::Result<f64, String> {
    match field.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        Ok(_) => Err(format!("non-finite value {:?}", field)),
        Err(_) => Err(format!("not a number: {:?}", field)),
    }
}
