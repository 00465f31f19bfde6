//! Fixed rosters of candidate regressors and the comparison protocol.
//!
//! Rosters are explicit ordered lists so diagnostic output order is
//! stable across runs. A candidate that fails to fit is recorded and
//! skipped; it never aborts the rest of the comparison.
use anyhow::Result;
use log::{info, warn};

use crate::config::{CvConfig, RegressorKind};
use crate::evaluation::kfold::{cross_val_score, EvaluationResult, KFold};
use crate::math::{Array1, Array2};
use crate::metrics::Scoring;

/// A labelled, fully-configured algorithm, optionally behind a
/// per-fold feature-scaling step.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub label: String,
    pub kind: RegressorKind,
    pub scaled: bool,
}

impl Candidate {
    pub fn plain(label: &str, kind: RegressorKind) -> Self {
        Candidate {
            label: label.to_string(),
            kind,
            scaled: false,
        }
    }

    pub fn scaled(label: &str, kind: RegressorKind) -> Self {
        Candidate {
            label: label.to_string(),
            kind,
            scaled: true,
        }
    }
}

/// One roster entry's outcome: either the per-fold scores or the error
/// that candidate produced.
#[derive(Debug)]
pub struct ComparisonEntry {
    pub label: String,
    pub outcome: Result<EvaluationResult>,
}

/// The six plain baseline algorithms.
pub fn baseline_roster() -> Vec<Candidate> {
    vec![
        Candidate::plain("LR", RegressorKind::Linear),
        Candidate::plain("LASSO", RegressorKind::lasso()),
        Candidate::plain("EN", RegressorKind::elastic_net()),
        Candidate::plain("KNN", RegressorKind::knn(5)),
        Candidate::plain("CART", RegressorKind::decision_tree()),
        Candidate::plain("SVM", RegressorKind::linear_svr()),
    ]
}

/// The same six algorithms behind a standardization step.
pub fn scaled_roster() -> Vec<Candidate> {
    vec![
        Candidate::scaled("ScaledLR", RegressorKind::Linear),
        Candidate::scaled("ScaledLASSO", RegressorKind::lasso()),
        Candidate::scaled("ScaledEN", RegressorKind::elastic_net()),
        Candidate::scaled("ScaledKNN", RegressorKind::knn(5)),
        Candidate::scaled("ScaledCART", RegressorKind::decision_tree()),
        Candidate::scaled("ScaledSVM", RegressorKind::linear_svr()),
    ]
}

/// The ensemble roster, all standardized.
pub fn ensemble_roster() -> Vec<Candidate> {
    vec![
        Candidate::scaled(
            "ScaledAB",
            RegressorKind::ada_boost(RegressorKind::decision_tree(), 50),
        ),
        Candidate::scaled(
            "ScaledAB-KNN",
            RegressorKind::ada_boost(RegressorKind::knn(3), 50),
        ),
        Candidate::scaled(
            "ScaledAB-LR",
            RegressorKind::ada_boost(RegressorKind::Linear, 50),
        ),
        Candidate::scaled("ScaledRFR", RegressorKind::random_forest(100)),
        Candidate::scaled("ScaledETR", RegressorKind::extra_trees(100)),
        Candidate::scaled("ScaledGBR", RegressorKind::gradient_boosting(100)),
    ]
}

/// Cross-validate every candidate in roster order and log
/// `"<label>: <mean> (<std>)"` per candidate.
pub fn compare_models(
    candidates: &[Candidate],
    x_train: &Array2<f64>,
    y_train: &Array1<f64>,
    cv: &CvConfig,
    scoring: Scoring,
) -> Vec<ComparisonEntry> {
    let kfold = KFold::new(cv.folds, cv.seed);
    let mut entries = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        let outcome = cross_val_score(
            &candidate.kind,
            candidate.scaled,
            x_train,
            y_train,
            &kfold,
            scoring,
        );
        match &outcome {
            Ok(result) => {
                info!(
                    "{}: {:.6} ({:.6})",
                    candidate.label,
                    result.mean(),
                    result.std_dev()
                );
            }
            Err(err) => {
                warn!("{}: skipped ({:#})", candidate.label, err);
            }
        }
        entries.push(ComparisonEntry {
            label: candidate.label.clone(),
            outcome,
        });
    }

    entries
}
