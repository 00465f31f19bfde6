//! Linear epsilon-insensitive support vector regression, trained by
//! stochastic subgradient descent. Intended for standardized features;
//! the roster wraps it in a scaling pipeline.
use anyhow::{anyhow, Result};
use rand::seq::SliceRandom;
use rand::{rngs::StdRng, SeedableRng};

use crate::math::{Array1, Array2};
use crate::models::regressor_trait::Regressor;

pub struct LinearSvr {
    c: f64,
    epsilon: f64,
    epochs: usize,
    seed: u64,
    weights: Option<Vec<f64>>,
    intercept: f64,
}

impl LinearSvr {
    const ETA0: f64 = 0.1;

    pub fn new(c: f64, epsilon: f64, epochs: usize, seed: u64) -> Self {
        LinearSvr {
            c,
            epsilon,
            epochs,
            seed,
            weights: None,
            intercept: 0.0,
        }
    }
}

impl Regressor for LinearSvr {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        let (n, p) = x.shape();
        if n != y.len() {
            return Err(anyhow!("x has {} rows but y has {} values", n, y.len()));
        }
        if n == 0 {
            return Err(anyhow!("cannot fit on an empty matrix"));
        }
        if self.c <= 0.0 {
            return Err(anyhow!("C must be positive, got {}", self.c));
        }

        let lambda = 1.0 / self.c;
        let mut weights = vec![0.0f64; p];
        // starting the intercept at the target mean removes most of the
        // initial error mass
        let mut intercept = y.mean().expect("n > 0");

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut order: Vec<usize> = (0..n).collect();
        let mut t = 0u64;

        for _epoch in 0..self.epochs {
            order.shuffle(&mut rng);
            for &i in &order {
                t += 1;
                let eta = Self::ETA0 / (1.0 + Self::ETA0 * lambda * t as f64);
                let row = x.row_slice(i);
                let pred = intercept
                    + row
                        .iter()
                        .zip(weights.iter())
                        .map(|(a, b)| a * b)
                        .sum::<f64>();
                let err = y[i] - pred;

                for (w, &xv) in weights.iter_mut().zip(row.iter()) {
                    let mut grad = lambda * *w;
                    if err.abs() > self.epsilon {
                        grad -= err.signum() * xv;
                    }
                    *w -= eta * grad;
                }
                if err.abs() > self.epsilon {
                    intercept += eta * err.signum();
                }
            }
        }

        self.weights = Some(weights);
        self.intercept = intercept;
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let weights = self
            .weights
            .as_ref()
            .ok_or_else(|| anyhow!("LinearSvr used before fit"))?;
        if x.ncols() != weights.len() {
            return Err(anyhow!(
                "model was fit on {} features, got {}",
                weights.len(),
                x.ncols()
            ));
        }
        let preds = (0..x.nrows())
            .map(|i| {
                self.intercept
                    + x.row_slice(i)
                        .iter()
                        .zip(weights.iter())
                        .map(|(a, b)| a * b)
                        .sum::<f64>()
            })
            .collect();
        Ok(preds)
    }

    fn name(&self) -> &str {
        "linear_svr"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::mean_squared_error;
    use crate::preprocessing::StandardScaler;

    #[test]
    fn fits_a_line_on_standardized_features() {
        let xs: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let ys: Vec<f64> = xs.iter().map(|x| 2.0 * x + 1.0).collect();
        let x = Array2::from_shape_vec((20, 1), xs).unwrap();
        let y = Array1::from_vec(ys);
        let (_, x_scaled) = StandardScaler::fit_transform(&x);

        let mut model = LinearSvr::new(100.0, 0.01, 500, 7);
        model.fit(&x_scaled, &y).unwrap();
        let preds = model.predict(&x_scaled).unwrap();
        assert!(
            mean_squared_error(&y, &preds) < 1.0,
            "mse = {}",
            mean_squared_error(&y, &preds)
        );
    }

    #[test]
    fn training_is_deterministic_per_seed() {
        let xs: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let ys: Vec<f64> = xs.iter().map(|x| x + 0.5).collect();
        let x = Array2::from_shape_vec((10, 1), xs).unwrap();
        let y = Array1::from_vec(ys);

        let mut a = LinearSvr::new(10.0, 0.1, 50, 3);
        let mut b = LinearSvr::new(10.0, 0.1, 50, 3);
        a.fit(&x, &y).unwrap();
        b.fit(&x, &y).unwrap();
        assert_eq!(a.predict(&x).unwrap(), b.predict(&x).unwrap());
    }
}
