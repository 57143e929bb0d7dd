use ordered_float::OrderedFloat;

/// Join key of a table row. Integer and float keys share one totally
/// ordered representation so `1` and `1.0` join.
pub type JoinKey = OrderedFloat<f64>;

/// One parsed table row: the key column followed by its feature columns.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureRecord {
    pub key: JoinKey,
    pub features: Vec<f64>,
}

impl FeatureRecord {
    pub fn new(key: f64, features: Vec<f64>) -> Self {
        FeatureRecord {
            key: OrderedFloat(key),
            features,
        }
    }
}

/// Sum of squared per-dimension differences; no square root is taken.
#[inline]
pub fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum::<f64>()
}

/// Ordered, index-addressable rows of equal dimension.
///
/// Built once by the assembler and only read afterwards. The matrix may be
/// empty (disjoint join); callers reject that through K validation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VectorMatrix {
    rows: Vec<Vec<f64>>,
    dimension: usize,
}

impl VectorMatrix {
    /// Returns `None` when a row is empty or rows disagree on dimension.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Option<Self> {
        let dimension = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.is_empty() || row.len() != dimension) {
            return None;
        }
        Some(VectorMatrix { rows, dimension })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn row(&self, index: usize) -> &[f64] {
        &self.rows[index]
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.rows.iter().map(Vec::as_slice)
    }
}
