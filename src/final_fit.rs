//! One-shot fit and validation scoring of the selected model.
use anyhow::Result;
use log::info;

use crate::config::RegressorKind;
use crate::data::Split;
use crate::math::Array1;
use crate::metrics::mean_squared_error;
use crate::models::build_regressor;
use crate::preprocessing::StandardScaler;

/// Validation-set outcome of the final fit.
#[derive(Debug, Clone)]
pub struct FinalReport {
    pub mse: f64,
    pub predictions: Array1<f64>,
}

/// Fit one fully-configured regressor on the standardized training set
/// and score it on the validation set.
///
/// The scaler is fit on training rows only and reapplied, not refit, to
/// the validation rows. Nothing is persisted; this is a one-shot
/// evaluation.
pub struct FinalEstimator {
    pub kind: RegressorKind,
}

impl FinalEstimator {
    pub fn new(kind: RegressorKind) -> Self {
        FinalEstimator { kind }
    }

    /// The reference configuration: an 80-tree extra-trees ensemble.
    pub fn reference() -> Self {
        FinalEstimator::new(RegressorKind::extra_trees(80))
    }

    pub fn run(&self, split: &Split) -> Result<FinalReport> {
        let scaler = StandardScaler::fit(&split.x_train);
        let x_train = scaler.transform(&split.x_train);
        let x_validation = scaler.transform(&split.x_validation);

        let mut model = build_regressor(&self.kind);
        model.fit(&x_train, &split.y_train)?;
        let predictions = model.predict(&x_validation)?;
        let mse = mean_squared_error(&split.y_validation, &predictions);

        info!("{} validation MSE: {:.6}", model.name(), mse);
        Ok(FinalReport { mse, predictions })
    }
}
