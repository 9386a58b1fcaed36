//! Pearson correlation with two-tailed significance.
//!
//! The degenerate cases are total: a pair with fewer than three
//! observations or a column with (near) zero variance yields the
//! undefined sentinel and a p-value of 1.0, never an error.

use aerovia_traits::stats::MIN_STD_THRESHOLD;
use ndarray::ArrayView1;
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Two-tailed p-value below which a correlation is flagged significant.
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Pearson correlation between one air-quality metric and one transport
/// metric over the filtered range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationResult {
    /// Air-quality metric column.
    pub metric_a: String,
    /// Transport metric column.
    pub metric_b: String,
    /// Correlation coefficient in [-1, 1]; `None` when undefined
    /// (zero variance or too few observations).
    pub coefficient: Option<f64>,
    /// Two-tailed p-value in [0, 1]; 1.0 when the coefficient is
    /// undefined.
    pub p_value: f64,
    /// Whether `p_value` clears the significance level.
    pub significant: bool,
    /// Number of observations the pair was computed over.
    pub n_obs: usize,
}

/// Compute Pearson's r and its two-tailed p-value.
///
/// The p-value comes from the t-distribution with `n - 2` degrees of
/// freedom, `t = r * sqrt((n - 2) / (1 - r^2))`. Perfect correlation
/// reports a p-value of 0.
#[must_use]
pub fn pearson(x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> (Option<f64>, f64) {
    let n = x.len().min(y.len());
    if n < 3 {
        return (None, 1.0);
    }
    let nf = n as f64;

    let mean_x = x.iter().take(n).sum::<f64>() / nf;
    let mean_y = y.iter().take(n).sum::<f64>() / nf;

    let mut cov = 0.0;
    let mut ss_x = 0.0;
    let mut ss_y = 0.0;
    for i in 0..n {
        let dx = x[i] - mean_x;
        let dy = y[i] - mean_y;
        cov += dx * dy;
        ss_x += dx * dx;
        ss_y += dy * dy;
    }
    let std_x = (ss_x / (nf - 1.0)).sqrt();
    let std_y = (ss_y / (nf - 1.0)).sqrt();

    if std_x < MIN_STD_THRESHOLD || std_y < MIN_STD_THRESHOLD {
        return (None, 1.0);
    }

    let r = (cov / ((nf - 1.0) * std_x * std_y)).clamp(-1.0, 1.0);
    (Some(r), two_tailed_p(r, n))
}

/// Two-tailed p-value for Pearson's r at `n` observations.
fn two_tailed_p(r: f64, n: usize) -> f64 {
    let df = (n - 2) as f64;
    let denom = 1.0 - r * r;
    if denom < f64::EPSILON {
        return 0.0;
    }
    let t = r.abs() * (df / denom).sqrt();
    StudentsT::new(0.0, 1.0, df).map_or(1.0, |dist| (2.0 * (1.0 - dist.cdf(t))).clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::Array1;

    #[test]
    fn test_self_correlation_is_one() {
        let x = Array1::from_vec(vec![3.0, 1.0, 4.0, 1.5, 9.0, 2.6]);
        let (r, p) = pearson(x.view(), x.view());
        assert_relative_eq!(r.unwrap(), 1.0);
        assert_relative_eq!(p, 0.0);
    }

    #[test]
    fn test_perfect_negative_correlation() {
        let x = Array1::from_vec(vec![1.0, 2.0, 3.0, 4.0]);
        let y = Array1::from_vec(vec![8.0, 6.0, 4.0, 2.0]);
        let (r, p) = pearson(x.view(), y.view());
        assert_relative_eq!(r.unwrap(), -1.0);
        assert_relative_eq!(p, 0.0);
    }

    #[test]
    fn test_constant_column_yields_sentinel() {
        let x = Array1::from_vec(vec![5.0; 10]);
        let y = Array1::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]);
        let (r, p) = pearson(x.view(), y.view());
        assert_eq!(r, None);
        assert_relative_eq!(p, 1.0);
    }

    #[test]
    fn test_tiny_amplitude_is_still_defined() {
        // Sub-threshold variance but above-threshold std deviation; the
        // sentinel applies to the std deviation floor, not its square.
        let x = Array1::from_vec(vec![0.0, 1e-7, 2e-7, 3e-7, 4e-7]);
        let y = Array1::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        let (r, p) = pearson(x.view(), y.view());
        assert_relative_eq!(r.unwrap(), 1.0);
        assert_relative_eq!(p, 0.0);
    }

    #[test]
    fn test_too_few_observations_yields_sentinel() {
        let x = Array1::from_vec(vec![1.0, 2.0]);
        let (r, p) = pearson(x.view(), x.view());
        assert_eq!(r, None);
        assert_relative_eq!(p, 1.0);
    }

    #[test]
    fn test_known_coefficient() {
        let x = Array1::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        let y = Array1::from_vec(vec![2.0, 1.0, 4.0, 3.0, 5.0]);
        let (r, p) = pearson(x.view(), y.view());
        assert_relative_eq!(r.unwrap(), 0.8);
        // Weak evidence at n = 5; clearly not significant.
        assert!(p > SIGNIFICANCE_LEVEL && p < 0.25);
    }

    #[test]
    fn test_p_value_symmetric_in_sign() {
        let x = Array1::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let y = Array1::from_vec(vec![2.0, 1.0, 4.0, 3.0, 6.0, 5.0]);
        let neg: Array1<f64> = y.iter().map(|v| -v).collect();
        let (r_pos, p_pos) = pearson(x.view(), y.view());
        let (r_neg, p_neg) = pearson(x.view(), neg.view());
        assert_relative_eq!(r_pos.unwrap(), -r_neg.unwrap());
        assert_relative_eq!(p_pos, p_neg);
    }

    #[test]
    fn test_stronger_correlation_means_smaller_p() {
        let x = Array1::from_vec((0..20).map(f64::from).collect::<Vec<_>>());
        let noisy: Array1<f64> = x.iter().enumerate().map(|(i, v)| v + if i % 2 == 0 { 4.0 } else { -4.0 }).collect();
        let clean: Array1<f64> = x.iter().enumerate().map(|(i, v)| v + if i % 2 == 0 { 0.5 } else { -0.5 }).collect();
        let (_, p_noisy) = pearson(x.view(), noisy.view());
        let (_, p_clean) = pearson(x.view(), clean.view());
        assert!(p_clean < p_noisy);
    }
}
