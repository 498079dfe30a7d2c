//! Polynomial Fit Module
//! Ordinary least-squares polynomial regression used to draw smooth curves
//! through raw zero-coupon yields.

use crate::data::check_pair;
use crate::error::{ChartError, ChartResult};
use nalgebra::{DMatrix, DVector};
use statrs::statistics::Statistics;

/// Singular values below this share of the largest one count as zero.
const RANK_TOLERANCE: f64 = 1e-10;

/// `n` evenly spaced values from `start` to `end`, both ends included.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + i as f64 * step })
                .collect()
        }
    }
}

/// `(min, max)` of a series. NaN if the series is empty or holds a NaN.
pub fn series_bounds(values: &[f64]) -> (f64, f64) {
    (Statistics::min(values), Statistics::max(values))
}

/// Fitted polynomial with coefficients in ascending powers.
#[derive(Debug, Clone, PartialEq)]
pub struct PolynomialFit {
    coefficients: Vec<f64>,
    r_squared: f64,
}

impl PolynomialFit {
    /// Least-squares fit of `y` on `x` with the given degree.
    pub fn fit(x: &[f64], y: &[f64], degree: usize) -> ChartResult<Self> {
        check_pair("x", x, "y", y)?;
        let terms = degree + 1;
        if x.len() < terms {
            return Err(ChartError::InsufficientPoints {
                degree,
                required: terms,
                actual: x.len(),
            });
        }

        if distinct_count(x) < terms {
            return Err(ChartError::SingularFit);
        }

        let coefficients = least_squares(x, y, terms)?;
        let mut fit = Self {
            coefficients,
            r_squared: f64::NAN,
        };
        fit.r_squared = fit.compute_r_squared(x, y);
        Ok(fit)
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    /// Coefficient of determination on the data used for the fit.
    pub fn r_squared(&self) -> f64 {
        self.r_squared
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        self.coefficients.iter().rev().fold(0.0, |acc, c| acc * x + c)
    }

    pub fn evaluate_many(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.evaluate(x)).collect()
    }

    fn compute_r_squared(&self, x: &[f64], y: &[f64]) -> f64 {
        let mean = Statistics::mean(y);
        let ss_tot: f64 = y.iter().map(|v| (v - mean).powi(2)).sum();
        let ss_res: f64 = x
            .iter()
            .zip(y)
            .map(|(&xi, &yi)| (yi - self.evaluate(xi)).powi(2))
            .sum();
        if ss_tot == 0.0 {
            if ss_res == 0.0 {
                1.0
            } else {
                0.0
            }
        } else {
            1.0 - ss_res / ss_tot
        }
    }
}

fn distinct_count(values: &[f64]) -> usize {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted.dedup();
    sorted.len()
}

/// Solve the Vandermonde least-squares system with an SVD. Maturities are
/// scaled to [-1, 1] first so the powers stay comparable.
fn least_squares(x: &[f64], y: &[f64], terms: usize) -> ChartResult<Vec<f64>> {
    let scale = x.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    let scale = if scale > 0.0 { scale } else { 1.0 };

    let vandermonde = DMatrix::from_fn(x.len(), terms, |i, j| (x[i] / scale).powi(j as i32));
    let rhs = DVector::from_column_slice(y);

    let svd = vandermonde.svd(true, true);
    let tolerance = svd.singular_values.max() * RANK_TOLERANCE;
    if svd.rank(tolerance) < terms {
        return Err(ChartError::SingularFit);
    }
    let scaled = svd
        .solve(&rhs, tolerance)
        .map_err(|_| ChartError::SingularFit)?;

    Ok(scaled
        .iter()
        .enumerate()
        .map(|(j, c)| c / scale.powi(j as i32))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linspace_includes_both_ends() {
        let xs = linspace(0.0, 26.0, 50);
        assert_eq!(xs.len(), 50);
        assert_eq!(xs[0], 0.0);
        assert_eq!(xs[49], 26.0);
        assert_relative_eq!(xs[1] - xs[0], 26.0 / 49.0, epsilon = 1e-12);
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(2.0, 5.0, 1), vec![2.0]);
    }

    #[test]
    fn test_cubic_fit_recovers_exact_polynomial() {
        // y = 1 - 2x + 0.5x^2 + 0.1x^3
        let x: Vec<f64> = (0..8).map(|i| i as f64).collect();
        let y: Vec<f64> = x
            .iter()
            .map(|&v| 1.0 - 2.0 * v + 0.5 * v * v + 0.1 * v * v * v)
            .collect();

        let fit = PolynomialFit::fit(&x, &y, 3).unwrap();
        let c = fit.coefficients();
        assert_eq!(fit.degree(), 3);
        assert_relative_eq!(c[0], 1.0, epsilon = 1e-6);
        assert_relative_eq!(c[1], -2.0, epsilon = 1e-6);
        assert_relative_eq!(c[2], 0.5, epsilon = 1e-6);
        assert_relative_eq!(c[3], 0.1, epsilon = 1e-6);
        assert_relative_eq!(fit.r_squared(), 1.0, epsilon = 1e-10);
        assert_relative_eq!(fit.evaluate(10.0), 1.0 - 20.0 + 50.0 + 100.0, epsilon = 1e-4);
    }

    #[test]
    fn test_linear_fit_of_noisy_data() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [2.1, 3.9, 6.2, 7.8];
        let fit = PolynomialFit::fit(&x, &y, 1).unwrap();
        // Closed-form OLS: slope 1.94, intercept 0.15
        assert_relative_eq!(fit.coefficients()[1], 1.94, epsilon = 1e-10);
        assert_relative_eq!(fit.coefficients()[0], 0.15, epsilon = 1e-10);
        assert!(fit.r_squared() > 0.99 && fit.r_squared() < 1.0);
    }

    #[test]
    fn test_fit_needs_enough_points() {
        let err = PolynomialFit::fit(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0], 3).unwrap_err();
        assert!(matches!(
            err,
            ChartError::InsufficientPoints {
                required: 4,
                actual: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_fit_with_repeated_x_is_singular() {
        let err = PolynomialFit::fit(&[2.0; 5], &[1.0, 2.0, 3.0, 4.0, 5.0], 3).unwrap_err();
        assert!(matches!(err, ChartError::SingularFit));
    }

    #[test]
    fn test_cubic_on_three_distinct_maturities_is_singular() {
        // Six points but only 1Y, 5Y and 25Y: no unique cubic.
        let x = [1.0, 1.0, 5.0, 5.0, 25.0, 25.0];
        let y = [3.0, 3.1, 3.4, 3.5, 3.8, 3.9];
        let err = PolynomialFit::fit(&x, &y, 3).unwrap_err();
        assert!(matches!(err, ChartError::SingularFit));

        // A quadratic through the same three maturities is determined.
        let fit = PolynomialFit::fit(&x, &y, 2).unwrap();
        assert_relative_eq!(fit.evaluate(5.0), 3.45, epsilon = 1e-9);
    }

    #[test]
    fn test_cubic_over_curve_maturities() {
        // Coefficients of a realistic yield cubic survive the 0..25 year span.
        let x = [0.5, 1.0, 2.0, 3.0, 5.0, 7.0, 10.0, 15.0, 20.0, 25.0];
        let y: Vec<f64> = x
            .iter()
            .map(|&t| 3.0 + 0.2 * t - 0.012 * t * t + 0.0002 * t * t * t)
            .collect();
        let fit = PolynomialFit::fit(&x, &y, 3).unwrap();
        let c = fit.coefficients();
        assert_relative_eq!(c[0], 3.0, epsilon = 1e-9);
        assert_relative_eq!(c[1], 0.2, epsilon = 1e-9);
        assert_relative_eq!(c[2], -0.012, epsilon = 1e-9);
        assert_relative_eq!(c[3], 0.0002, epsilon = 1e-10);
    }

    #[test]
    fn test_series_bounds() {
        assert_eq!(series_bounds(&[3.0, -1.0, 7.5]), (-1.0, 7.5));
        assert!(series_bounds(&[]).0.is_nan());
    }
}
