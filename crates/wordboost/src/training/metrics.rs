//! Loss metrics for the accept/reject gate.

use ndarray::ArrayView1;

/// A loss over predictions and targets.
pub trait MetricFn: Send + Sync {
    fn compute(&self, predictions: ArrayView1<f64>, targets: ArrayView1<f64>) -> f64;

    /// Whether larger values are better.
    fn higher_is_better(&self) -> bool;

    fn name(&self) -> &'static str;

    /// Whether `candidate` strictly beats `best`.
    #[inline]
    fn is_improvement(&self, candidate: f64, best: f64) -> bool {
        if self.higher_is_better() {
            candidate > best
        } else {
            candidate < best
        }
    }
}

// =============================================================================
// RMSE (Root Mean Squared Error)
// =============================================================================

/// Root Mean Squared Error: sqrt(mean((pred - label)²))
///
/// Lower is better.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rmse;

impl MetricFn for Rmse {
    fn compute(&self, predictions: ArrayView1<f64>, targets: ArrayView1<f64>) -> f64 {
        let n_rows = predictions.len();
        if n_rows == 0 {
            return 0.0;
        }
        let sum_sq = predictions
            .iter()
            .zip(targets.iter())
            .fold(0.0f64, |acc, (&p, &l)| {
                let diff = p - l;
                acc + diff * diff
            });
        (sum_sq / n_rows as f64).sqrt()
    }

    fn higher_is_better(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "rmse"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn rmse_perfect() {
        let v = array![1.0, 2.0, 3.0];
        assert_abs_diff_eq!(Rmse.compute(v.view(), v.view()), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn rmse_is_not_mean_centred() {
        // A constant offset of 1 has zero error variance but RMSE 1.
        let preds = array![2.0, 3.0, 4.0];
        let labels = array![1.0, 2.0, 3.0];
        assert_abs_diff_eq!(Rmse.compute(preds.view(), labels.view()), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn rmse_empty_is_zero() {
        let empty = ndarray::Array1::<f64>::zeros(0);
        assert_eq!(Rmse.compute(empty.view(), empty.view()), 0.0);
    }

    #[test]
    fn improvement_is_strict() {
        assert!(Rmse.is_improvement(0.5, 0.6));
        assert!(!Rmse.is_improvement(0.6, 0.6));
    }
}
