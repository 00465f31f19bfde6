//! Seeded k-fold splitting and single-candidate cross-validation.
use anyhow::{anyhow, Result};
use rand::seq::SliceRandom;
use rand::{rngs::StdRng, SeedableRng};

use crate::config::RegressorKind;
use crate::math::{Array1, Array2};
use crate::metrics::Scoring;
use crate::models::build_regressor;
use crate::preprocessing::StandardScaler;

/// Shuffled k-fold splitter. The same (k, seed, n) triple always yields
/// the same folds.
#[derive(Debug, Clone, Copy)]
pub struct KFold {
    pub n_splits: usize,
    pub seed: u64,
}

impl KFold {
    pub fn new(n_splits: usize, seed: u64) -> Self {
        KFold { n_splits, seed }
    }

    /// Produce `(train, test)` index pairs covering `n_samples` rows.
    ///
    /// The test folds are disjoint, their union is the full row set, and
    /// fold sizes differ by at most one.
    pub fn splits(&self, n_samples: usize) -> Result<Vec<(Vec<usize>, Vec<usize>)>> {
        if self.n_splits < 2 {
            return Err(anyhow!("k-fold requires at least 2 folds"));
        }
        if n_samples < self.n_splits {
            return Err(anyhow!(
                "cannot split {} rows into {} folds",
                n_samples,
                self.n_splits
            ));
        }

        let mut indices: Vec<usize> = (0..n_samples).collect();
        let mut rng = StdRng::seed_from_u64(self.seed);
        indices.shuffle(&mut rng);

        let base = n_samples / self.n_splits;
        let extra = n_samples % self.n_splits;

        let mut splits = Vec::with_capacity(self.n_splits);
        let mut start = 0usize;
        for fold in 0..self.n_splits {
            let size = base + usize::from(fold < extra);
            let test: Vec<usize> = indices[start..start + size].to_vec();
            let train: Vec<usize> = indices[..start]
                .iter()
                .chain(indices[start + size..].iter())
                .copied()
                .collect();
            splits.push((train, test));
            start += size;
        }
        Ok(splits)
    }
}

/// Per-fold scores for one candidate under one scoring function.
#[derive(Debug, Clone)]
pub struct EvaluationResult {
    pub scores: Array1<f64>,
}

impl EvaluationResult {
    pub fn mean(&self) -> f64 {
        self.scores.mean().unwrap_or(f64::NAN)
    }

    pub fn std_dev(&self) -> f64 {
        self.scores.std_dev().unwrap_or(f64::NAN)
    }
}

/// Cross-validate one configured regressor.
///
/// When `scaled` is set, a fresh `StandardScaler` is fit on each fold's
/// training rows and reapplied to its test rows, so scaling statistics
/// never see held-out data.
pub fn cross_val_score(
    kind: &RegressorKind,
    scaled: bool,
    x: &Array2<f64>,
    y: &Array1<f64>,
    kfold: &KFold,
    scoring: Scoring,
) -> Result<EvaluationResult> {
    if x.nrows() != y.len() {
        return Err(anyhow!(
            "x has {} rows but y has {} values",
            x.nrows(),
            y.len()
        ));
    }

    let mut scores = Vec::with_capacity(kfold.n_splits);
    for (train_idx, test_idx) in kfold.splits(x.nrows())? {
        let mut x_train = x.select_rows(&train_idx);
        let y_train = y.select(&train_idx);
        let mut x_test = x.select_rows(&test_idx);
        let y_test = y.select(&test_idx);

        if scaled {
            let scaler = StandardScaler::fit(&x_train);
            x_train = scaler.transform(&x_train);
            x_test = scaler.transform(&x_test);
        }

        let mut model = build_regressor(kind);
        model.fit(&x_train, &y_train)?;
        let preds = model.predict(&x_test)?;
        scores.push(scoring.score(&y_test, &preds));
    }

    Ok(EvaluationResult {
        scores: Array1::from_vec(scores),
    })
}
