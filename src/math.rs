use crate::error::{MatchError, Result};

pub fn arithmetic_mean(x: &[f64]) -> f64 {
    x.iter().sum::<f64>() / x.len() as f64
}

/// Standard deviation with `ddof` delta degrees of freedom
///
/// `ddof = 0` gives the population deviation, `ddof = 1` the sample deviation.
/// Returns NaN when `x.len() <= ddof`.
pub fn standard_deviation(x: &[f64], ddof: usize) -> f64 {
    if x.len() <= ddof {
        return f64::NAN;
    }
    let mean = arithmetic_mean(x);
    let sum_sq = x.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
    (sum_sq / (x.len() - ddof) as f64).sqrt()
}

/// Pearson correlation coefficient between two equal-length slices
///
/// Fails when either slice is constant, holds a non-finite value,
/// or has fewer than two points, since the coefficient is undefined there.
pub fn pearson(x: &[f64], y: &[f64]) -> Result<f64> {
    if x.len() != y.len() {
        return Err(MatchError::LengthMismatch {
            reference_len: x.len(),
            sample_len: y.len(),
        });
    }
    if x.len() < 2 {
        return Err(MatchError::Computation(format!(
            "correlation needs at least two genes, got {}",
            x.len()
        )));
    }
    if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return Err(MatchError::Computation(
            "correlation input contains undefined (NaN or infinite) values".to_string(),
        ));
    }

    if is_constant(x) || is_constant(y) {
        return Err(MatchError::Computation(
            "correlation is undefined for a zero-variance profile".to_string(),
        ));
    }

    let mean_x = arithmetic_mean(x);
    let mean_y = arithmetic_mean(y);
    let mut num = 0.0;
    let mut den_x = 0.0;
    let mut den_y = 0.0;
    for (xi, yi) in x.iter().zip(y.iter()) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        num += dx * dy;
        den_x += dx * dx;
        den_y += dy * dy;
    }

    // the mean of a constant column need not round back to its value,
    // so this only catches what the exact check above let through
    if den_x == 0.0 || den_y == 0.0 {
        return Err(MatchError::Computation(
            "correlation is undefined for a zero-variance profile".to_string(),
        ));
    }

    // guard against rounding pushing |r| past one
    Ok((num / (den_x * den_y).sqrt()).clamp(-1.0, 1.0))
}

fn is_constant(x: &[f64]) -> bool {
    x.iter().all(|v| *v == x[0])
}

pub fn round_to(x: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (x * factor).round() / factor
}
