//! Gradient boosting regression backed by the `gbdt` crate, configured
//! for squared-error loss.
use anyhow::{anyhow, Result};
use gbdt::config::Config;
use gbdt::decision_tree::{Data, DataVec};
use gbdt::gradient_boost::GBDT;

use crate::math::{Array1, Array2};
use crate::models::regressor_trait::Regressor;

pub struct GradientBoostingRegressor {
    n_estimators: usize,
    max_depth: u32,
    learning_rate: f64,
    model: Option<GBDT>,
}

impl GradientBoostingRegressor {
    pub fn new(n_estimators: usize, max_depth: u32, learning_rate: f64) -> Self {
        GradientBoostingRegressor {
            n_estimators,
            max_depth,
            learning_rate,
            model: None,
        }
    }
}

impl Regressor for GradientBoostingRegressor {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
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
        if self.n_estimators == 0 {
            return Err(anyhow!("n_estimators must be at least 1"));
        }

        let mut config = Config::new();
        config.set_feature_size(x.ncols());
        config.set_max_depth(self.max_depth);
        config.set_iterations(self.n_estimators);
        config.set_shrinkage(self.learning_rate as f32);
        config.set_loss("SquaredError");
        config.set_debug(false);
        config.set_training_optimization_level(2);

        let mut model = GBDT::new(&config);

        let mut train = DataVec::new();
        for row in 0..x.nrows() {
            let features: Vec<f32> = x.row_slice(row).iter().map(|&v| v as f32).collect();
            train.push(Data::new_training_data(features, 1.0, y[row] as f32, None));
        }
        model.fit(&mut train);

        self.model = Some(model);
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let model = self
            .model
            .as_ref()
            .ok_or_else(|| anyhow!("GradientBoostingRegressor used before fit"))?;

        let mut test = DataVec::new();
        for row in 0..x.nrows() {
            let features: Vec<f32> = x.row_slice(row).iter().map(|&v| v as f32).collect();
            test.push(Data::new_test_data(features, None));
        }
        let preds = model.predict(&test);
        Ok(preds.into_iter().map(|p| p as f64).collect())
    }

    fn name(&self) -> &str {
        "gradient_boosting"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boosting_approximates_a_step_function() {
        let xs: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let ys: Vec<f64> = xs.iter().map(|&x| if x < 10.0 { 1.0 } else { 5.0 }).collect();
        let x = Array2::from_shape_vec((20, 1), xs).unwrap();
        let y = Array1::from_vec(ys);

        let mut model = GradientBoostingRegressor::new(50, 3, 0.1);
        model.fit(&x, &y).unwrap();
        let preds = model.predict(&x).unwrap();
        assert_eq!(preds.len(), 20);
        assert!((preds[0] - 1.0).abs() < 1.0, "low end {}", preds[0]);
        assert!((preds[19] - 5.0).abs() < 1.0, "high end {}", preds[19]);
    }

    #[test]
    fn predict_before_fit_is_an_error() {
        let model = GradientBoostingRegressor::new(10, 3, 0.1);
        let x = Array2::from_shape_vec((1, 1), vec![0.0]).unwrap();
        assert!(model.predict(&x).is_err());
    }
}
