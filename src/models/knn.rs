//! K-nearest-neighbors regression (brute force, Euclidean distance).
use anyhow::{anyhow, Result};

use crate::math::{Array1, Array2};
use crate::models::regressor_trait::Regressor;

pub struct KnnRegressor {
    n_neighbors: usize,
    train_x: Option<Array2<f64>>,
    train_y: Option<Array1<f64>>,
}

impl KnnRegressor {
    pub fn new(n_neighbors: usize) -> Self {
        KnnRegressor {
            n_neighbors,
            train_x: None,
            train_y: None,
        }
    }
}

impl Regressor for KnnRegressor {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        if self.n_neighbors == 0 {
            return Err(anyhow!("n_neighbors must be at least 1"));
        }
        if x.nrows() != y.len() {
            return Err(anyhow!(
                "x has {} rows but y has {} values",
                x.nrows(),
                y.len()
            ));
        }
        if x.nrows() < self.n_neighbors {
            return Err(anyhow!(
                "n_neighbors = {} exceeds the {} training rows",
                self.n_neighbors,
                x.nrows()
            ));
        }
        self.train_x = Some(x.clone());
        self.train_y = Some(y.clone());
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let (train_x, train_y) = match (&self.train_x, &self.train_y) {
            (Some(tx), Some(ty)) => (tx, ty),
            _ => return Err(anyhow!("KnnRegressor used before fit")),
        };
        if x.ncols() != train_x.ncols() {
            return Err(anyhow!(
                "model was fit on {} features, got {}",
                train_x.ncols(),
                x.ncols()
            ));
        }

        let mut preds = Vec::with_capacity(x.nrows());
        for i in 0..x.nrows() {
            let query = x.row_slice(i);
            let mut distances: Vec<(f64, usize)> = (0..train_x.nrows())
                .map(|j| (squared_distance(query, train_x.row_slice(j)), j))
                .collect();
            // ties resolved by training-row order for determinism
            distances.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            let sum: f64 = distances
                .iter()
                .take(self.n_neighbors)
                .map(|&(_, j)| train_y[j])
                .sum();
            preds.push(sum / self.n_neighbors as f64);
        }
        Ok(Array1::from_vec(preds))
    }

    fn name(&self) -> &str {
        "knn"
    }
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_neighbor_reproduces_training_targets() {
        let x = Array2::from_shape_vec((4, 1), vec![0.0, 1.0, 2.0, 3.0]).unwrap();
        let y = Array1::from_vec(vec![10.0, 11.0, 12.0, 13.0]);
        let mut model = KnnRegressor::new(1);
        model.fit(&x, &y).unwrap();
        let preds = model.predict(&x).unwrap();
        assert_eq!(preds, y);
    }

    #[test]
    fn k_larger_than_training_set_fails() {
        let x = Array2::from_shape_vec((2, 1), vec![0.0, 1.0]).unwrap();
        let y = Array1::from_vec(vec![1.0, 2.0]);
        let mut model = KnnRegressor::new(5);
        assert!(model.fit(&x, &y).is_err());
    }
}
