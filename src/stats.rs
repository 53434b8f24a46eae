//! Descriptive statistics shared by the visitation and climate summaries.

use serde::Serialize;

/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Computes the population standard deviation given a pre-computed mean.
/// Returns 0.0 for empty input.
pub fn stddev(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Sample standard deviation (n - 1 denominator). `None` for fewer than two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;

    Some(stddev(values, mean(values)) * (n / (n - 1.0)).sqrt())
}

/// Quantile `q` (0.0–1.0) of already sorted values, interpolating linearly
/// between the closest ranks.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }

    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;

    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Count, centre and spread of a column, skipping missing values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q1: Option<f64>,
    pub median: Option<f64>,
    pub q3: Option<f64>,
    pub max: Option<f64>,
}

impl Summary {
    pub fn describe<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let mut present: Vec<f64> = values
            .into_iter()
            .flatten()
            .filter(|v| !v.is_nan())
            .collect();
        present.sort_by(f64::total_cmp);

        if present.is_empty() {
            return Summary {
                count: 0,
                mean: None,
                std: None,
                min: None,
                q1: None,
                median: None,
                q3: None,
                max: None,
            };
        }

        Summary {
            count: present.len(),
            mean: Some(mean(&present)),
            std: sample_std(&present),
            min: present.first().copied(),
            q1: quantile(&present, 0.25),
            median: quantile(&present, 0.5),
            q3: quantile(&present, 0.75),
            max: present.last().copied(),
        }
    }
}

/// Pearson correlation over the positions where both series have a value.
///
/// Non-finite values count as missing. `None` when fewer than two complete
/// pairs exist, either side is constant, or the result is not finite.
pub fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> Option<f64> {
    let (xs, ys): (Vec<f64>, Vec<f64>) = xs
        .iter()
        .zip(ys)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .unzip();

    if xs.len() < 2 {
        return None;
    }

    let mx = mean(&xs);
    let my = mean(&ys);
    let mut cov = 0.0;
    let mut vx = 0.0;
    let mut vy = 0.0;

    for (x, y) in xs.iter().zip(&ys) {
        cov += (x - mx) * (y - my);
        vx += (x - mx).powi(2);
        vy += (y - my).powi(2);
    }

    if vx == 0.0 || vy == 0.0 {
        return None;
    }

    let r = cov / (vx.sqrt() * vy.sqrt());
    r.is_finite().then_some(r)
}

/// Standard scores using the sample standard deviation.
///
/// `None` when the deviation is undefined or zero.
pub fn z_scores(values: &[f64]) -> Option<Vec<f64>> {
    let sd = sample_std(values).filter(|sd| *sd > 0.0)?;
    let m = mean(values);

    Some(values.iter().map(|v| (v - m) / sd).collect())
}
