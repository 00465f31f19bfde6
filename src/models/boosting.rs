//! AdaBoost.R2 over an arbitrary base regressor.
//!
//! Each round trains the base learner on a weighted bootstrap resample,
//! reweights rows by their relative absolute error, and stops early when
//! the weighted loss reaches 0.5. Prediction is the weighted median of
//! the rounds' predictions.
use anyhow::{anyhow, Result};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::config::RegressorKind;
use crate::math::{Array1, Array2};
use crate::models::factory::build_regressor;
use crate::models::regressor_trait::Regressor;

pub struct AdaBoostRegressor {
    base: RegressorKind,
    n_estimators: usize,
    seed: u64,
    estimators: Vec<Box<dyn Regressor>>,
    log_betas: Vec<f64>,
}

impl AdaBoostRegressor {
    pub fn new(base: RegressorKind, n_estimators: usize, seed: u64) -> Self {
        AdaBoostRegressor {
            base,
            n_estimators,
            seed,
            estimators: Vec::new(),
            log_betas: Vec::new(),
        }
    }
}

impl Regressor for AdaBoostRegressor {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        if self.n_estimators == 0 {
            return Err(anyhow!("n_estimators must be at least 1"));
        }
        if x.nrows() != y.len() {
            return Err(anyhow!(
                "x has {} rows but y has {} values",
                x.nrows(),
                y.len()
            ));
        }
        let n = x.nrows();
        if n == 0 {
            return Err(anyhow!("cannot fit on an empty matrix"));
        }

        self.estimators.clear();
        self.log_betas.clear();

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut weights = vec![1.0 / n as f64; n];

        for _round in 0..self.n_estimators {
            let sample = weighted_sample(&weights, n, &mut rng);
            let mut estimator = build_regressor(&self.base);
            estimator.fit(&x.select_rows(&sample), &y.select(&sample))?;

            let preds = estimator.predict(x)?;
            let errors: Vec<f64> = preds
                .iter()
                .zip(y.iter())
                .map(|(p, t)| (p - t).abs())
                .collect();
            let max_error = errors.iter().cloned().fold(0.0f64, f64::max);
            if max_error <= f64::EPSILON {
                // perfect fit: keep the round with full confidence and stop
                self.estimators.push(estimator);
                self.log_betas.push((1.0f64 / 1e-10).ln());
                break;
            }

            let losses: Vec<f64> = errors.iter().map(|e| e / max_error).collect();
            let avg_loss: f64 = losses
                .iter()
                .zip(weights.iter())
                .map(|(l, w)| l * w)
                .sum();
            if avg_loss >= 0.5 {
                // a weak learner worse than chance ends the sequence
                break;
            }

            let beta = (avg_loss / (1.0 - avg_loss)).max(1e-10);
            for (w, l) in weights.iter_mut().zip(losses.iter()) {
                *w *= beta.powf(1.0 - l);
            }
            let total: f64 = weights.iter().sum();
            for w in weights.iter_mut() {
                *w /= total;
            }

            self.estimators.push(estimator);
            self.log_betas.push((1.0 / beta).ln());
        }

        if self.estimators.is_empty() {
            return Err(anyhow!("boosting produced no usable rounds"));
        }
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if self.estimators.is_empty() {
            return Err(anyhow!("AdaBoostRegressor used before fit"));
        }
        let per_round: Vec<Array1<f64>> = self
            .estimators
            .iter()
            .map(|e| e.predict(x))
            .collect::<Result<_>>()?;

        let preds = (0..x.nrows())
            .map(|row| {
                let values: Vec<f64> = per_round.iter().map(|p| p[row]).collect();
                weighted_median(&values, &self.log_betas)
            })
            .collect();
        Ok(preds)
    }

    fn name(&self) -> &str {
        "ada_boost"
    }
}

/// Draw `count` indices with replacement, proportionally to `weights`.
fn weighted_sample(weights: &[f64], count: usize, rng: &mut StdRng) -> Vec<usize> {
    let mut cumulative = Vec::with_capacity(weights.len());
    let mut acc = 0.0;
    for &w in weights {
        acc += w;
        cumulative.push(acc);
    }
    let total = acc;
    (0..count)
        .map(|_| {
            let draw = rng.gen_range(0.0..total);
            match cumulative.binary_search_by(|c| c.partial_cmp(&draw).unwrap()) {
                Ok(idx) => idx,
                Err(idx) => idx.min(weights.len() - 1),
            }
        })
        .collect()
}

/// Median of `values` under per-value weights.
fn weighted_median(values: &[f64], weights: &[f64]) -> f64 {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| {
        values[a]
            .partial_cmp(&values[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let half = weights.iter().sum::<f64>() / 2.0;
    let mut acc = 0.0;
    for &idx in &order {
        acc += weights[idx];
        if acc >= half {
            return values[idx];
        }
    }
    values[*order.last().expect("non-empty values")]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boosted_trees_fit_a_step_function() {
        let xs: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let ys: Vec<f64> = xs.iter().map(|&x| if x < 10.0 { 1.0 } else { 5.0 }).collect();
        let x = Array2::from_shape_vec((20, 1), xs).unwrap();
        let y = Array1::from_vec(ys);

        let mut model = AdaBoostRegressor::new(RegressorKind::decision_tree(), 10, 7);
        model.fit(&x, &y).unwrap();
        let preds = model
            .predict(&Array2::from_shape_vec((2, 1), vec![2.0, 15.0]).unwrap())
            .unwrap();
        assert!((preds[0] - 1.0).abs() < 1.0, "got {}", preds[0]);
        assert!((preds[1] - 5.0).abs() < 1.0, "got {}", preds[1]);
    }

    #[test]
    fn weighted_median_of_uniform_weights_is_the_median() {
        let values = vec![3.0, 1.0, 2.0];
        let weights = vec![1.0, 1.0, 1.0];
        assert_eq!(weighted_median(&values, &weights), 2.0);
    }
}
