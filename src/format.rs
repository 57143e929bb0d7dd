/// Decimal places kept in printed centroid coordinates.
pub const DECIMALS: usize = 4;
const SCALE: f64 = 1e4;

/// Rounds half-to-even at `DECIMALS` places and folds `-0.0` into `0.0`.
pub fn round_coordinate(value: f64) -> f64 {
    (value * SCALE).round_ties_even() / SCALE + 0.0
}

pub fn format_seeds(seeds: &[usize]) -> String {
    seeds
        .iter()
        .map(usize::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

pub fn format_centroid(centroid: &[f64]) -> String {
    centroid
        .iter()
        .map(|&v| format!("{:.prec$}", round_coordinate(v), prec = DECIMALS))
        .collect::<Vec<_>>()
        .join(",")
}

/// The seed line followed by one line per centroid, in seed order.
pub fn render(seeds: &[usize], centroids: &[Vec<f64>]) -> String {
    let mut out = format_seeds(seeds);
    out.push('\n');
    for centroid in centroids {
        out.push_str(&format_centroid(centroid));
        out.push('\n');
    }
    out
}
