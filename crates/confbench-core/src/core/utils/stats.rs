use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum StatsError {
    #[error("Samples differ in length ({left} vs {right})")]
    LengthMismatch { left: usize, right: usize },

    #[error("At least {required} points are required, got {actual}")]
    TooFewPoints { required: usize, actual: usize },

    #[error("Input is constant; the correlation is undefined")]
    ConstantInput,
}

/// Mean and population standard deviation (`ddof = 0`) of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Summary {
    pub mean: f64,
    pub std: f64,
}

fn check_pair(x: &[f64], y: &[f64], required: usize) -> Result<(), StatsError> {
    if x.len() != y.len() {
        return Err(StatsError::LengthMismatch {
            left: x.len(),
            right: y.len(),
        });
    }
    if x.len() < required {
        return Err(StatsError::TooFewPoints {
            required,
            actual: x.len(),
        });
    }
    Ok(())
}

/// 1-based fractional ranks; tied values share the average of the ranks they span.
pub fn rank(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // positions start..end hold ranks start+1..=end
        let shared = (start + 1 + end) as f64 / 2.0;
        for &i in &order[start..end] {
            ranks[i] = shared;
        }
        start = end;
    }
    ranks
}

pub fn pearson(x: &[f64], y: &[f64]) -> Result<f64, StatsError> {
    check_pair(x, y, 2)?;
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut num = 0.0;
    let mut den_x = 0.0;
    let mut den_y = 0.0;
    for (a, b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        num += dx * dy;
        den_x += dx * dx;
        den_y += dy * dy;
    }

    if den_x == 0.0 || den_y == 0.0 {
        return Err(StatsError::ConstantInput);
    }
    Ok((num / (den_x.sqrt() * den_y.sqrt())).clamp(-1.0, 1.0))
}

/// Spearman rank correlation.
///
/// A NaN anywhere in the input yields `Ok(NaN)`, which callers treat as a skip. A constant
/// sample on either side is [`StatsError::ConstantInput`]. Without ties the closed form
/// `1 - 6 sum(d^2) / (n (n^2 - 1))` is used, so identical orderings give exactly 1.0.
pub fn spearman(x: &[f64], y: &[f64]) -> Result<f64, StatsError> {
    check_pair(x, y, 2)?;
    if x.iter().chain(y).any(|v| v.is_nan()) {
        return Ok(f64::NAN);
    }
    let (rx, ry) = (rank(x), rank(y));
    if has_ties(&rx) || has_ties(&ry) {
        return pearson(&rx, &ry);
    }

    let n = rx.len() as f64;
    let sum_d2: f64 = rx.iter().zip(&ry).map(|(a, b)| (a - b).powi(2)).sum();
    Ok((1.0 - 6.0 * sum_d2 / (n * (n * n - 1.0))).clamp(-1.0, 1.0))
}

fn has_ties(ranks: &[f64]) -> bool {
    let mut sorted = ranks.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted.windows(2).any(|w| w[0] == w[1])
}

/// Root-mean-square deviation between two aligned samples.
pub fn rmsd(x: &[f64], y: &[f64]) -> Result<f64, StatsError> {
    check_pair(x, y, 1)?;
    let sum_sq: f64 = x.iter().zip(y).map(|(a, b)| (a - b).powi(2)).sum();
    Ok((sum_sq / x.len() as f64).sqrt())
}

/// Mean and population standard deviation; `None` for an empty sample.
pub fn summarize(values: &[f64]) -> Option<Summary> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Some(Summary {
        mean,
        std: variance.sqrt(),
    })
}
