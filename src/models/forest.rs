//! Averaged tree ensembles: random forest (bootstrap + best splits) and
//! extra-trees (full sample + random splits).
//!
//! Trees are trained in parallel with per-tree seeds derived from the
//! ensemble seed, so results do not depend on scheduling.
use anyhow::{anyhow, Result};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rayon::prelude::*;

use crate::math::{Array1, Array2};
use crate::models::regressor_trait::Regressor;
use crate::models::tree::{DecisionTreeRegressor, Splitter, TreeSettings};

struct ForestInner {
    n_estimators: usize,
    max_depth: Option<u32>,
    seed: u64,
    bootstrap: bool,
    splitter: Splitter,
    trees: Vec<DecisionTreeRegressor>,
}

impl ForestInner {
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
        if x.nrows() == 0 {
            return Err(anyhow!("cannot fit on an empty matrix"));
        }

        let n = x.nrows();
        let trees: Result<Vec<DecisionTreeRegressor>> = (0..self.n_estimators)
            .into_par_iter()
            .map(|t| {
                let tree_seed = self.seed.wrapping_add(t as u64);
                let settings = TreeSettings {
                    max_depth: self.max_depth,
                    splitter: self.splitter,
                    seed: tree_seed,
                    ..TreeSettings::default()
                };
                let mut tree = DecisionTreeRegressor::with_settings(settings);
                if self.bootstrap {
                    let mut rng = StdRng::seed_from_u64(tree_seed);
                    let sample: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                    tree.fit(&x.select_rows(&sample), &y.select(&sample))?;
                } else {
                    tree.fit(x, y)?;
                }
                Ok(tree)
            })
            .collect();

        self.trees = trees?;
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if self.trees.is_empty() {
            return Err(anyhow!("forest used before fit"));
        }
        let mut acc = vec![0.0f64; x.nrows()];
        for tree in &self.trees {
            let preds = tree.predict(x)?;
            for (a, p) in acc.iter_mut().zip(preds.iter()) {
                *a += p;
            }
        }
        let k = self.trees.len() as f64;
        Ok(acc.into_iter().map(|v| v / k).collect())
    }
}

/// Bagged ensemble of best-split regression trees.
pub struct RandomForestRegressor {
    inner: ForestInner,
}

impl RandomForestRegressor {
    pub fn new(n_estimators: usize, max_depth: Option<u32>, seed: u64) -> Self {
        RandomForestRegressor {
            inner: ForestInner {
                n_estimators,
                max_depth,
                seed,
                bootstrap: true,
                splitter: Splitter::Best,
                trees: Vec::new(),
            },
        }
    }
}

impl Regressor for RandomForestRegressor {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        self.inner.fit(x, y)
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        self.inner.predict(x)
    }

    fn name(&self) -> &str {
        "random_forest"
    }
}

/// Extremely randomized trees: every tree sees the full training set and
/// splits on random thresholds.
pub struct ExtraTreesRegressor {
    inner: ForestInner,
}

impl ExtraTreesRegressor {
    pub fn new(n_estimators: usize, max_depth: Option<u32>, seed: u64) -> Self {
        ExtraTreesRegressor {
            inner: ForestInner {
                n_estimators,
                max_depth,
                seed,
                bootstrap: false,
                splitter: Splitter::Random,
                trees: Vec::new(),
            },
        }
    }
}

impl Regressor for ExtraTreesRegressor {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        self.inner.fit(x, y)
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        self.inner.predict(x)
    }

    fn name(&self) -> &str {
        "extra_trees"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step_data() -> (Array2<f64>, Array1<f64>) {
        let xs: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let ys: Vec<f64> = xs.iter().map(|&x| if x < 10.0 { 1.0 } else { 5.0 }).collect();
        (
            Array2::from_shape_vec((20, 1), xs).unwrap(),
            Array1::from_vec(ys),
        )
    }

    #[test]
    fn forest_fits_a_step_function() {
        let (x, y) = step_data();
        let mut forest = RandomForestRegressor::new(20, None, 7);
        forest.fit(&x, &y).unwrap();
        let preds = forest
            .predict(&Array2::from_shape_vec((2, 1), vec![2.0, 15.0]).unwrap())
            .unwrap();
        assert!((preds[0] - 1.0).abs() < 0.5, "got {}", preds[0]);
        assert!((preds[1] - 5.0).abs() < 0.5, "got {}", preds[1]);
    }

    #[test]
    fn extra_trees_are_deterministic_per_seed() {
        let (x, y) = step_data();
        let mut a = ExtraTreesRegressor::new(10, None, 3);
        let mut b = ExtraTreesRegressor::new(10, None, 3);
        a.fit(&x, &y).unwrap();
        b.fit(&x, &y).unwrap();
        assert_eq!(a.predict(&x).unwrap(), b.predict(&x).unwrap());
    }
}
