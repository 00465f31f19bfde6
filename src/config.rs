use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::metrics::Scoring;

/// Cross-validation settings shared by model comparison and grid search.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CvConfig {
    /// Number of folds (k).
    pub folds: usize,
    /// Seed controlling fold assignment.
    pub seed: u64,
}

impl Default for CvConfig {
    fn default() -> Self {
        CvConfig { folds: 10, seed: 7 }
    }
}

/// Top-level configuration for one evaluation run.
///
/// The dataset path is an explicit parameter here; nothing in the crate
/// loads data as a side effect of being imported.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub data_path: PathBuf,
    /// Fraction of rows held out for validation.
    pub validation_ratio: f64,
    /// Seed for the train/validation split.
    pub split_seed: u64,
    pub cv: CvConfig,
    pub scoring: Scoring,
    /// Where to write the HTML diagnostics report, if requested.
    pub report_path: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            data_path: PathBuf::from("data/housing.csv"),
            validation_ratio: 0.2,
            split_seed: 7,
            cv: CvConfig::default(),
            scoring: Scoring::default(),
            report_path: None,
        }
    }
}

/// Supported regressors and their hyper-parameters.
///
/// A value of this enum is a complete, fully-configured algorithm
/// description; the model factory turns it into a boxed `Regressor`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RegressorKind {
    Linear,
    Lasso {
        alpha: f64,
        max_iter: usize,
        tol: f64,
    },
    ElasticNet {
        alpha: f64,
        l1_ratio: f64,
        max_iter: usize,
        tol: f64,
    },
    Knn {
        n_neighbors: usize,
    },
    DecisionTree {
        max_depth: Option<u32>,
        min_samples_split: usize,
    },
    LinearSvr {
        c: f64,
        epsilon: f64,
        epochs: usize,
        seed: u64,
    },
    RandomForest {
        n_estimators: usize,
        max_depth: Option<u32>,
        seed: u64,
    },
    ExtraTrees {
        n_estimators: usize,
        max_depth: Option<u32>,
        seed: u64,
    },
    AdaBoost {
        base: Box<RegressorKind>,
        n_estimators: usize,
        seed: u64,
    },
    GradientBoosting {
        n_estimators: usize,
        max_depth: u32,
        learning_rate: f64,
    },
}

impl RegressorKind {
    pub fn lasso() -> Self {
        RegressorKind::Lasso {
            alpha: 1.0,
            max_iter: 1000,
            tol: 1e-4,
        }
    }

    pub fn elastic_net() -> Self {
        RegressorKind::ElasticNet {
            alpha: 1.0,
            l1_ratio: 0.5,
            max_iter: 1000,
            tol: 1e-4,
        }
    }

    pub fn knn(n_neighbors: usize) -> Self {
        RegressorKind::Knn { n_neighbors }
    }

    pub fn decision_tree() -> Self {
        RegressorKind::DecisionTree {
            max_depth: None,
            min_samples_split: 2,
        }
    }

    pub fn linear_svr() -> Self {
        RegressorKind::LinearSvr {
            c: 1.0,
            epsilon: 0.1,
            epochs: 200,
            seed: 0,
        }
    }

    pub fn random_forest(n_estimators: usize) -> Self {
        RegressorKind::RandomForest {
            n_estimators,
            max_depth: None,
            seed: 0,
        }
    }

    pub fn extra_trees(n_estimators: usize) -> Self {
        RegressorKind::ExtraTrees {
            n_estimators,
            max_depth: None,
            seed: 0,
        }
    }

    pub fn ada_boost(base: RegressorKind, n_estimators: usize) -> Self {
        RegressorKind::AdaBoost {
            base: Box::new(base),
            n_estimators,
            seed: 0,
        }
    }

    pub fn gradient_boosting(n_estimators: usize) -> Self {
        RegressorKind::GradientBoosting {
            n_estimators,
            max_depth: 3,
            learning_rate: 0.1,
        }
    }
}

impl FromStr for RegressorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lr" | "linear" => Ok(RegressorKind::Linear),
            "lasso" => Ok(RegressorKind::lasso()),
            "en" | "elastic_net" => Ok(RegressorKind::elastic_net()),
            "knn" => Ok(RegressorKind::knn(5)),
            "cart" | "decision_tree" => Ok(RegressorKind::decision_tree()),
            "svr" => Ok(RegressorKind::linear_svr()),
            "ab" | "ada_boost" => {
                Ok(RegressorKind::ada_boost(RegressorKind::decision_tree(), 50))
            }
            "rfr" | "random_forest" => Ok(RegressorKind::random_forest(100)),
            "etr" | "extra_trees" => Ok(RegressorKind::extra_trees(100)),
            "gbr" | "gradient_boosting" => Ok(RegressorKind::gradient_boosting(100)),
            _ => Err(format!("Unknown regressor: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regressor_kind_parses_roster_abbreviations() {
        for name in ["lr", "lasso", "en", "knn", "cart", "svr", "ab", "rfr", "etr", "gbr"] {
            assert!(name.parse::<RegressorKind>().is_ok(), "failed for {}", name);
        }
        assert!("bogus".parse::<RegressorKind>().is_err());
    }

    #[test]
    fn run_config_defaults_match_the_reference_protocol() {
        let cfg = RunConfig::default();
        assert_eq!(cfg.cv.folds, 10);
        assert_eq!(cfg.cv.seed, 7);
        assert!((cfg.validation_ratio - 0.2).abs() < 1e-12);
    }
}
