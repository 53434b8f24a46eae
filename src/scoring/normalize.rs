/// Min–max normalizes `values` into `[0, 1]`.
///
/// When every value is equal (including a single value) each entry becomes
/// `1.0`. With `invert`, results are `1 - normalized` so lower raw values score
/// higher; a degenerate column stays at `1.0`.
pub fn min_max(values: &[f64], invert: bool) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if max == min {
        return vec![1.0; values.len()];
    }

    let range = max - min;
    values
        .iter()
        .map(|v| {
            let n = (v - min) / range;
            if invert { 1.0 - n } else { n }
        })
        .collect()
}
