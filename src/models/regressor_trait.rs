use anyhow::Result;

use crate::math::{Array1, Array2};

/// Contract shared by every regression model in the crate.
///
/// Implementations are fit on a feature matrix plus target vector and
/// produce one prediction per input row. Fitting twice replaces the
/// previous state. All failures surface as `Err`, never as panics, so a
/// comparison run can isolate a misbehaving candidate.
pub trait Regressor {
    /// Fit the model on training rows.
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()>;

    /// Predict one value per row of `x`. Fails if called before `fit`.
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>>;

    /// Human readable name for log lines.
    fn name(&self) -> &str {
        "regressor"
    }
}
