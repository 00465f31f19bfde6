//! Linear models: ordinary least squares and coordinate-descent
//! elastic net (of which lasso is the `l1_ratio = 1` special case).
use anyhow::{anyhow, Result};

use crate::math::{Array1, Array2};
use crate::models::regressor_trait::Regressor;

/// Ordinary least squares, solved through the normal equations.
pub struct LinearRegressor {
    weights: Option<Vec<f64>>,
    intercept: f64,
}

impl LinearRegressor {
    pub fn new() -> Self {
        LinearRegressor {
            weights: None,
            intercept: 0.0,
        }
    }
}

impl Default for LinearRegressor {
    fn default() -> Self {
        Self::new()
    }
}

impl Regressor for LinearRegressor {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        let (n, p) = x.shape();
        if n != y.len() {
            return Err(anyhow!("x has {} rows but y has {} values", n, y.len()));
        }
        if n == 0 {
            return Err(anyhow!("cannot fit on an empty matrix"));
        }

        // Normal equations over [1 | X]: solve (A^T A) w = A^T y.
        let dim = p + 1;
        let mut ata = vec![0.0f64; dim * dim];
        let mut aty = vec![0.0f64; dim];
        for i in 0..n {
            let row = x.row_slice(i);
            let yi = y[i];
            // augmented row: 1.0 followed by the features
            for a in 0..dim {
                let va = if a == 0 { 1.0 } else { row[a - 1] };
                aty[a] += va * yi;
                for b in a..dim {
                    let vb = if b == 0 { 1.0 } else { row[b - 1] };
                    ata[a * dim + b] += va * vb;
                }
            }
        }
        for a in 0..dim {
            for b in 0..a {
                ata[a * dim + b] = ata[b * dim + a];
            }
        }

        let solution = solve_linear_system(&mut ata, &mut aty, dim)
            .ok_or_else(|| anyhow!("normal equations are singular; features may be collinear"))?;

        self.intercept = solution[0];
        self.weights = Some(solution[1..].to_vec());
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let weights = self
            .weights
            .as_ref()
            .ok_or_else(|| anyhow!("LinearRegressor used before fit"))?;
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
        "linear_regression"
    }
}

/// Gaussian elimination with partial pivoting. Consumes `a` (row-major,
/// `dim` x `dim`) and `b`; returns None when the system is singular.
fn solve_linear_system(a: &mut [f64], b: &mut [f64], dim: usize) -> Option<Vec<f64>> {
    for col in 0..dim {
        let mut pivot = col;
        for row in (col + 1)..dim {
            if a[row * dim + col].abs() > a[pivot * dim + col].abs() {
                pivot = row;
            }
        }
        if a[pivot * dim + col].abs() < 1e-12 {
            return None;
        }
        if pivot != col {
            for k in 0..dim {
                a.swap(col * dim + k, pivot * dim + k);
            }
            b.swap(col, pivot);
        }
        let diag = a[col * dim + col];
        for row in (col + 1)..dim {
            let factor = a[row * dim + col] / diag;
            if factor == 0.0 {
                continue;
            }
            for k in col..dim {
                a[row * dim + k] -= factor * a[col * dim + k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut solution = vec![0.0f64; dim];
    for col in (0..dim).rev() {
        let mut acc = b[col];
        for k in (col + 1)..dim {
            acc -= a[col * dim + k] * solution[k];
        }
        solution[col] = acc / a[col * dim + col];
    }
    Some(solution)
}

/// Elastic net fit by cyclic coordinate descent on centered data.
pub struct ElasticNetRegressor {
    alpha: f64,
    l1_ratio: f64,
    max_iter: usize,
    tol: f64,
    weights: Option<Vec<f64>>,
    intercept: f64,
    name: &'static str,
}

impl ElasticNetRegressor {
    pub fn new(alpha: f64, l1_ratio: f64, max_iter: usize, tol: f64) -> Self {
        ElasticNetRegressor {
            alpha,
            l1_ratio,
            max_iter,
            tol,
            weights: None,
            intercept: 0.0,
            name: "elastic_net",
        }
    }

    pub fn lasso(alpha: f64, max_iter: usize, tol: f64) -> Self {
        let mut model = Self::new(alpha, 1.0, max_iter, tol);
        model.name = "lasso";
        model
    }
}

impl Regressor for ElasticNetRegressor {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        let (n, p) = x.shape();
        if n != y.len() {
            return Err(anyhow!("x has {} rows but y has {} values", n, y.len()));
        }
        if n == 0 {
            return Err(anyhow!("cannot fit on an empty matrix"));
        }

        let n_f = n as f64;
        let x_mean: Vec<f64> = (0..p)
            .map(|j| (0..n).map(|i| x[(i, j)]).sum::<f64>() / n_f)
            .collect();
        let y_mean = y.mean().expect("n > 0");

        // centered columns, column-major for the coordinate sweeps
        let mut cols: Vec<Vec<f64>> = Vec::with_capacity(p);
        for j in 0..p {
            cols.push((0..n).map(|i| x[(i, j)] - x_mean[j]).collect());
        }
        let col_sq_norm: Vec<f64> = cols
            .iter()
            .map(|c| c.iter().map(|v| v * v).sum::<f64>() / n_f)
            .collect();

        let l1 = self.alpha * self.l1_ratio;
        let l2 = self.alpha * (1.0 - self.l1_ratio);

        let mut weights = vec![0.0f64; p];
        let mut residual: Vec<f64> = (0..n).map(|i| y[i] - y_mean).collect();

        for _ in 0..self.max_iter {
            let mut max_delta = 0.0f64;
            for j in 0..p {
                if col_sq_norm[j] == 0.0 {
                    continue;
                }
                let old = weights[j];
                // partial residual correlation with column j
                let mut rho = 0.0;
                for i in 0..n {
                    rho += cols[j][i] * (residual[i] + cols[j][i] * old);
                }
                rho /= n_f;
                let new = soft_threshold(rho, l1) / (col_sq_norm[j] + l2);
                if new != old {
                    let delta = new - old;
                    for i in 0..n {
                        residual[i] -= delta * cols[j][i];
                    }
                    max_delta = max_delta.max(delta.abs());
                    weights[j] = new;
                }
            }
            if max_delta < self.tol {
                break;
            }
        }

        self.intercept = y_mean
            - x_mean
                .iter()
                .zip(weights.iter())
                .map(|(m, w)| m * w)
                .sum::<f64>();
        self.weights = Some(weights);
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let weights = self
            .weights
            .as_ref()
            .ok_or_else(|| anyhow!("{} used before fit", self.name))?;
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
        self.name
    }
}

fn soft_threshold(value: f64, threshold: f64) -> f64 {
    if value > threshold {
        value - threshold
    } else if value < -threshold {
        value + threshold
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_data() -> (Array2<f64>, Array1<f64>) {
        // y = 2x + 1
        let xs: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let ys: Vec<f64> = xs.iter().map(|x| 2.0 * x + 1.0).collect();
        (
            Array2::from_shape_vec((10, 1), xs).unwrap(),
            Array1::from_vec(ys),
        )
    }

    #[test]
    fn ols_recovers_a_line() {
        let (x, y) = line_data();
        let mut model = LinearRegressor::new();
        model.fit(&x, &y).unwrap();
        let preds = model.predict(&x).unwrap();
        for (p, t) in preds.iter().zip(y.iter()) {
            assert!((p - t).abs() < 1e-8, "pred {} vs true {}", p, t);
        }
    }

    #[test]
    fn predict_before_fit_is_an_error() {
        let (x, _) = line_data();
        let model = LinearRegressor::new();
        assert!(model.predict(&x).is_err());
    }

    #[test]
    fn lasso_with_zero_penalty_matches_ols_closely() {
        let (x, y) = line_data();
        let mut lasso = ElasticNetRegressor::lasso(0.0, 2000, 1e-8);
        lasso.fit(&x, &y).unwrap();
        let preds = lasso.predict(&x).unwrap();
        for (p, t) in preds.iter().zip(y.iter()) {
            assert!((p - t).abs() < 1e-4, "pred {} vs true {}", p, t);
        }
    }

    #[test]
    fn large_l1_penalty_shrinks_weights_to_zero() {
        let (x, y) = line_data();
        let mut lasso = ElasticNetRegressor::lasso(1e6, 1000, 1e-8);
        lasso.fit(&x, &y).unwrap();
        let preds = lasso.predict(&x).unwrap();
        let y_mean = y.mean().unwrap();
        for p in preds.iter() {
            assert!((p - y_mean).abs() < 1e-6);
        }
    }
}
