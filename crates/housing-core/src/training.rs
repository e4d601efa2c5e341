//! Ordinary least squares fitting.
//!
//! Fits `y = c · x + b` by solving the normal equations over the augmented
//! design matrix `[X | 1]`. At 9 unknowns the system is tiny, so a direct
//! Gaussian elimination with partial pivoting is all that is needed.

use ndarray::{Array1, Array2};
use tracing::info;

use crate::dataset::TrainingData;
use crate::error::{Error, Result};
use crate::model::LinearModel;
use crate::record::NUM_FEATURES;

/// A fitted model together with its training-set fit metrics.
#[derive(Debug, Clone)]
pub struct FitReport {
    pub model: LinearModel,
    pub rmse: f64,
    pub r_squared: f64,
    pub training_rows: usize,
}

/// Fits a linear regression to the cleaned training data.
pub fn fit_linear_regression(data: &TrainingData) -> Result<FitReport> {
    let (model, predictions) = fit(&data.features, &data.targets)?;

    let n = data.targets.len() as f64;
    let residual_ss: f64 = data
        .targets
        .iter()
        .zip(&predictions)
        .map(|(y, p)| (y - p).powi(2))
        .sum();
    let mean = data.targets.sum() / n;
    let total_ss: f64 = data.targets.iter().map(|y| (y - mean).powi(2)).sum();

    let rmse = (residual_ss / n).sqrt();
    let r_squared = if total_ss > 0.0 {
        1.0 - residual_ss / total_ss
    } else {
        0.0
    };

    info!(
        "Fitted linear regression on {} rows (rmse {:.2}, r² {:.4})",
        data.num_rows(),
        rmse,
        r_squared
    );

    Ok(FitReport {
        model,
        rmse,
        r_squared,
        training_rows: data.num_rows(),
    })
}

fn fit(features: &Array2<f64>, targets: &Array1<f64>) -> Result<(LinearModel, Array1<f64>)> {
    let num_rows = features.nrows();
    if num_rows < NUM_FEATURES + 1 {
        return Err(Error::Training(format!(
            "Need at least {} rows to fit {} coefficients and an intercept, got {}",
            NUM_FEATURES + 1,
            NUM_FEATURES,
            num_rows
        )));
    }

    // Augment with a ones column so the intercept is solved with the
    // coefficients.
    let mut augmented = Array2::ones((num_rows, NUM_FEATURES + 1));
    augmented
        .slice_mut(ndarray::s![.., ..NUM_FEATURES])
        .assign(features);

    let gram = augmented.t().dot(&augmented);
    let moment = augmented.t().dot(targets);
    let solution = solve(gram, moment)?;

    let mut coefficients = [0.0; NUM_FEATURES];
    for (slot, value) in coefficients.iter_mut().zip(solution.iter()) {
        *slot = *value;
    }
    let model = LinearModel::new(coefficients, solution[NUM_FEATURES]);

    let predictions = augmented.dot(&solution);
    Ok((model, predictions))
}

/// Solves `a · x = b` in place by Gaussian elimination with partial
/// pivoting. Fails when the system is singular (collinear feature columns).
fn solve(mut a: Array2<f64>, mut b: Array1<f64>) -> Result<Array1<f64>> {
    let n = b.len();

    for pivot in 0..n {
        let mut best_row = pivot;
        let mut best_value = a[[pivot, pivot]].abs();
        for row in pivot + 1..n {
            let value = a[[row, pivot]].abs();
            if value > best_value {
                best_row = row;
                best_value = value;
            }
        }

        if best_value < 1e-12 {
            return Err(Error::Training(
                "Normal equations are singular; feature columns are collinear".to_string(),
            ));
        }

        if best_row != pivot {
            for col in 0..n {
                a.swap([pivot, col], [best_row, col]);
            }
            b.swap(pivot, best_row);
        }

        for row in pivot + 1..n {
            let factor = a[[row, pivot]] / a[[pivot, pivot]];
            if factor == 0.0 {
                continue;
            }
            for col in pivot..n {
                a[[row, col]] -= factor * a[[pivot, col]];
            }
            b[row] -= factor * b[pivot];
        }
    }

    let mut x = Array1::zeros(n);
    for row in (0..n).rev() {
        let mut value = b[row];
        for col in row + 1..n {
            value -= a[[row, col]] * x[col];
        }
        x[row] = value / a[[row, row]];
    }

    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array;

    /// Deterministic pseudo-random values so the design matrix is well
    /// conditioned without pulling in an RNG dependency.
    fn lcg(seed: &mut u64) -> f64 {
        *seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (*seed >> 33) as f64 / (1u64 << 31) as f64 - 0.5
    }

    fn synthetic_data(
        coefficients: [f64; NUM_FEATURES],
        intercept: f64,
        rows: usize,
    ) -> TrainingData {
        let mut seed = 42u64;
        let features =
            Array::from_shape_fn((rows, NUM_FEATURES), |_| 100.0 * lcg(&mut seed));
        let targets = Array::from_shape_fn(rows, |i| {
            let row = features.row(i);
            coefficients
                .iter()
                .zip(row)
                .map(|(c, x)| c * x)
                .sum::<f64>()
                + intercept
        });

        TrainingData {
            features,
            targets,
            rows_dropped: 0,
        }
    }

    #[test]
    fn test_recovers_known_coefficients() {
        let coefficients = [1.5, -2.0, 0.25, 3.0, -0.5, 1.0, -1.25, 50.0];
        let intercept = 12_345.0;
        let data = synthetic_data(coefficients, intercept, 200);

        let report = fit_linear_regression(&data).unwrap();
        for (fitted, expected) in report.model.coefficients().iter().zip(coefficients) {
            assert!(
                (fitted - expected).abs() < 1e-6,
                "coefficient {fitted} != {expected}"
            );
        }
        assert!((report.model.intercept() - intercept).abs() < 1e-6);
        assert!(report.rmse < 1e-6);
        assert!(report.r_squared > 0.999999);
    }

    #[test]
    fn test_too_few_rows_is_an_error() {
        let data = synthetic_data([1.0; NUM_FEATURES], 0.0, NUM_FEATURES);
        let err = fit_linear_regression(&data).unwrap_err();
        assert!(matches!(err, Error::Training(_)));
    }

    #[test]
    fn test_collinear_columns_are_rejected() {
        // Every row identical makes the normal equations rank deficient
        let features = Array2::from_shape_fn((50, NUM_FEATURES), |(_, j)| j as f64 + 1.0);
        let targets = Array1::from_elem(50, 100.0);
        let data = TrainingData {
            features,
            targets,
            rows_dropped: 0,
        };

        let err = fit_linear_regression(&data).unwrap_err();
        assert!(matches!(err, Error::Training(_)));
    }
}
