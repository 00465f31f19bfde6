//! Regression metrics and the scoring convention used by cross-validation.
//!
//! Scores follow the "larger is better" convention: error metrics are
//! negated so that model comparison and grid search can always maximize.
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::math::Array1;

/// Mean squared error between true and predicted targets.
pub fn mean_squared_error(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
    assert_eq!(
        y_true.len(),
        y_pred.len(),
        "mean_squared_error requires equal lengths"
    );
    y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| {
            let d = t - p;
            d * d
        })
        .sum::<f64>()
        / y_true.len() as f64
}

/// Mean absolute error between true and predicted targets.
pub fn mean_absolute_error(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
    assert_eq!(
        y_true.len(),
        y_pred.len(),
        "mean_absolute_error requires equal lengths"
    );
    y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| (t - p).abs())
        .sum::<f64>()
        / y_true.len() as f64
}

/// Coefficient of determination. Returns 0.0 for a constant target.
pub fn r2_score(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
    assert_eq!(y_true.len(), y_pred.len(), "r2_score requires equal lengths");
    let mean = y_true.mean().unwrap_or(0.0);
    let ss_tot: f64 = y_true
        .iter()
        .map(|t| {
            let d = t - mean;
            d * d
        })
        .sum();
    if ss_tot == 0.0 {
        return 0.0;
    }
    let ss_res: f64 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| {
            let d = t - p;
            d * d
        })
        .sum();
    1.0 - ss_res / ss_tot
}

/// Scoring function selector for cross-validation and grid search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scoring {
    NegMeanSquaredError,
    NegMeanAbsoluteError,
    R2,
}

impl Scoring {
    /// Evaluate the score for one fold; larger is always better.
    pub fn score(&self, y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
        match self {
            Scoring::NegMeanSquaredError => -mean_squared_error(y_true, y_pred),
            Scoring::NegMeanAbsoluteError => -mean_absolute_error(y_true, y_pred),
            Scoring::R2 => r2_score(y_true, y_pred),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Scoring::NegMeanSquaredError => "neg_mean_squared_error",
            Scoring::NegMeanAbsoluteError => "neg_mean_absolute_error",
            Scoring::R2 => "r2",
        }
    }
}

impl Default for Scoring {
    fn default() -> Self {
        Scoring::NegMeanSquaredError
    }
}

impl FromStr for Scoring {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "neg_mean_squared_error" | "neg_mse" => Ok(Scoring::NegMeanSquaredError),
            "neg_mean_absolute_error" | "neg_mae" => Ok(Scoring::NegMeanAbsoluteError),
            "r2" => Ok(Scoring::R2),
            _ => Err(format!("Unknown scoring function: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mse_of_perfect_prediction_is_zero() {
        let y = Array1::from_vec(vec![1.0, 2.0, 3.0]);
        assert_eq!(mean_squared_error(&y, &y), 0.0);
    }

    #[test]
    fn neg_mse_scoring_is_maximized_by_better_fit() {
        let y = Array1::from_vec(vec![1.0, 2.0, 3.0]);
        let close = Array1::from_vec(vec![1.1, 2.1, 3.1]);
        let far = Array1::from_vec(vec![2.0, 3.0, 4.0]);
        let s = Scoring::NegMeanSquaredError;
        assert!(s.score(&y, &close) > s.score(&y, &far));
    }

    #[test]
    fn r2_of_mean_prediction_is_zero() {
        let y = Array1::from_vec(vec![1.0, 2.0, 3.0]);
        let mean_pred = Array1::from_elem(3, 2.0);
        assert!((r2_score(&y, &mean_pred)).abs() < 1e-12);
    }
}
