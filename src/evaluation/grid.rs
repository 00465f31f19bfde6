//! Grid search over a fixed list of hyper-parameter candidates.
//!
//! Training features are standardized once, with a scaler fit on the
//! given training rows, before any fold is evaluated. Each grid point
//! costs exactly one cross-validation pass; the best point is the
//! maximum mean score and ties keep the earliest point.
use anyhow::{anyhow, Result};
use log::info;

use crate::config::{CvConfig, RegressorKind};
use crate::evaluation::kfold::{cross_val_score, EvaluationResult, KFold};
use crate::math::{Array1, Array2};
use crate::metrics::Scoring;
use crate::preprocessing::StandardScaler;

/// One hyper-parameter combination under search.
#[derive(Debug, Clone)]
pub struct GridPoint {
    /// Rendered form for trace lines, e.g. `n_neighbors=5`.
    pub params: String,
    pub kind: RegressorKind,
}

/// A named algorithm plus its ordered candidate list.
#[derive(Debug, Clone)]
pub struct GridSearch {
    pub label: String,
    pub points: Vec<GridPoint>,
}

/// Scores for every grid point plus the winning index.
#[derive(Debug)]
pub struct GridSearchResult {
    pub entries: Vec<(String, EvaluationResult)>,
    pub best_index: usize,
}

impl GridSearchResult {
    pub fn best_params(&self) -> &str {
        &self.entries[self.best_index].0
    }

    pub fn best_score(&self) -> f64 {
        self.entries[self.best_index].1.mean()
    }
}

impl GridSearch {
    /// Nearest-neighbor count grid: {1, 3, 5, ..., 21}.
    pub fn knn() -> Self {
        GridSearch {
            label: "KNN".to_string(),
            points: (1..=21)
                .step_by(2)
                .map(|k| GridPoint {
                    params: format!("n_neighbors={}", k),
                    kind: RegressorKind::knn(k),
                })
                .collect(),
        }
    }

    /// Gradient-boosting ensemble size grid: {10, 50, 100, ..., 900}.
    pub fn gradient_boosting() -> Self {
        let sizes = [10, 50, 100, 200, 300, 400, 500, 600, 700, 800, 900];
        GridSearch {
            label: "GBR".to_string(),
            points: sizes
                .iter()
                .map(|&n| GridPoint {
                    params: format!("n_estimators={}", n),
                    kind: RegressorKind::gradient_boosting(n),
                })
                .collect(),
        }
    }

    /// Extra-trees ensemble size grid: {5, 10, 20, ..., 80}.
    pub fn extra_trees() -> Self {
        let sizes = [5, 10, 20, 30, 40, 50, 60, 70, 80];
        GridSearch {
            label: "ETR".to_string(),
            points: sizes
                .iter()
                .map(|&n| GridPoint {
                    params: format!("n_estimators={}", n),
                    kind: RegressorKind::extra_trees(n),
                })
                .collect(),
        }
    }

    /// Run the search on training data, logging the best pair first and
    /// then one trace line per grid point in declaration order.
    pub fn run(
        &self,
        x_train: &Array2<f64>,
        y_train: &Array1<f64>,
        cv: &CvConfig,
        scoring: Scoring,
    ) -> Result<GridSearchResult> {
        if self.points.is_empty() {
            return Err(anyhow!("grid for {} is empty", self.label));
        }

        let scaler = StandardScaler::fit(x_train);
        let rescaled = scaler.transform(x_train);
        let kfold = KFold::new(cv.folds, cv.seed);

        let mut entries = Vec::with_capacity(self.points.len());
        for point in &self.points {
            let result = cross_val_score(&point.kind, false, &rescaled, y_train, &kfold, scoring)?;
            entries.push((point.params.clone(), result));
        }

        let mut best_index = 0usize;
        for idx in 1..entries.len() {
            if entries[idx].1.mean() > entries[best_index].1.mean() {
                best_index = idx;
            }
        }

        info!(
            "Best for {}: {:.6} using {}",
            self.label,
            entries[best_index].1.mean(),
            entries[best_index].0
        );
        for (params, result) in &entries {
            info!("{:.6} ({:.6}) with {}", result.mean(), result.std_dev(), params);
        }

        Ok(GridSearchResult {
            entries,
            best_index,
        })
    }
}
