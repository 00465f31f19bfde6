//! CART regression tree with variance-reduction splits.
//!
//! The same tree powers the forest ensembles: `Splitter::Best` scans all
//! cut points, `Splitter::Random` draws one uniform threshold per feature
//! (the extra-trees construction).
use anyhow::{anyhow, Result};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::math::{Array1, Array2};
use crate::models::regressor_trait::Regressor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Splitter {
    Best,
    Random,
}

#[derive(Debug, Clone)]
pub struct TreeSettings {
    pub max_depth: Option<u32>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub splitter: Splitter,
    /// Only consulted by `Splitter::Random`.
    pub seed: u64,
}

impl Default for TreeSettings {
    fn default() -> Self {
        TreeSettings {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            splitter: Splitter::Best,
            seed: 0,
        }
    }
}

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        value: f64,
    },
    Internal {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

pub struct DecisionTreeRegressor {
    settings: TreeSettings,
    root: Option<Node>,
}

impl DecisionTreeRegressor {
    pub fn new(max_depth: Option<u32>, min_samples_split: usize) -> Self {
        DecisionTreeRegressor {
            settings: TreeSettings {
                max_depth,
                min_samples_split: min_samples_split.max(2),
                ..TreeSettings::default()
            },
            root: None,
        }
    }

    pub fn with_settings(settings: TreeSettings) -> Self {
        DecisionTreeRegressor {
            settings,
            root: None,
        }
    }
}

impl Regressor for DecisionTreeRegressor {
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
        let indices: Vec<usize> = (0..x.nrows()).collect();
        let mut rng = StdRng::seed_from_u64(self.settings.seed);
        self.root = Some(build_node(x, y, &indices, 0, &self.settings, &mut rng));
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let root = self
            .root
            .as_ref()
            .ok_or_else(|| anyhow!("DecisionTreeRegressor used before fit"))?;
        let preds = (0..x.nrows())
            .map(|i| predict_row(root, x.row_slice(i)))
            .collect();
        Ok(preds)
    }

    fn name(&self) -> &str {
        "decision_tree"
    }
}

fn build_node(
    x: &Array2<f64>,
    y: &Array1<f64>,
    indices: &[usize],
    depth: u32,
    settings: &TreeSettings,
    rng: &mut StdRng,
) -> Node {
    let mean = indices.iter().map(|&i| y[i]).sum::<f64>() / indices.len() as f64;

    let depth_exhausted = settings.max_depth.map_or(false, |d| depth >= d);
    if depth_exhausted || indices.len() < settings.min_samples_split {
        return Node::Leaf { value: mean };
    }
    let sse = indices
        .iter()
        .map(|&i| {
            let d = y[i] - mean;
            d * d
        })
        .sum::<f64>();
    if sse <= f64::EPSILON {
        return Node::Leaf { value: mean };
    }

    let split = match settings.splitter {
        Splitter::Best => best_split(x, y, indices, settings.min_samples_leaf),
        Splitter::Random => random_split(x, y, indices, settings.min_samples_leaf, rng),
    };

    let Some((feature, threshold)) = split else {
        return Node::Leaf { value: mean };
    };

    let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
        .iter()
        .copied()
        .partition(|&i| x[(i, feature)] <= threshold);

    if left_idx.is_empty() || right_idx.is_empty() {
        return Node::Leaf { value: mean };
    }

    Node::Internal {
        feature,
        threshold,
        left: Box::new(build_node(x, y, &left_idx, depth + 1, settings, rng)),
        right: Box::new(build_node(x, y, &right_idx, depth + 1, settings, rng)),
    }
}

/// Exhaustive scan over all features and cut points, minimizing the
/// summed squared error of the two children.
fn best_split(
    x: &Array2<f64>,
    y: &Array1<f64>,
    indices: &[usize],
    min_samples_leaf: usize,
) -> Option<(usize, f64)> {
    let n = indices.len();
    let mut best: Option<(usize, f64, f64)> = None;

    for feature in 0..x.ncols() {
        let mut order: Vec<usize> = indices.to_vec();
        order.sort_by(|&a, &b| {
            x[(a, feature)]
                .partial_cmp(&x[(b, feature)])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut left_sum = 0.0;
        let mut left_sq = 0.0;
        let total_sum: f64 = order.iter().map(|&i| y[i]).sum();
        let total_sq: f64 = order.iter().map(|&i| y[i] * y[i]).sum();

        for pos in 0..n - 1 {
            let yi = y[order[pos]];
            left_sum += yi;
            left_sq += yi * yi;

            let a = x[(order[pos], feature)];
            let b = x[(order[pos + 1], feature)];
            if a == b {
                continue;
            }
            let n_left = pos + 1;
            let n_right = n - n_left;
            if n_left < min_samples_leaf || n_right < min_samples_leaf {
                continue;
            }

            let right_sum = total_sum - left_sum;
            let right_sq = total_sq - left_sq;
            let cost = (left_sq - left_sum * left_sum / n_left as f64)
                + (right_sq - right_sum * right_sum / n_right as f64);

            if best.map_or(true, |(_, _, c)| cost < c) {
                best = Some((feature, (a + b) / 2.0, cost));
            }
        }
    }

    best.map(|(feature, threshold, _)| (feature, threshold))
}

/// One uniform random threshold per feature; best of those by SSE.
fn random_split(
    x: &Array2<f64>,
    y: &Array1<f64>,
    indices: &[usize],
    min_samples_leaf: usize,
    rng: &mut StdRng,
) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64, f64)> = None;

    for feature in 0..x.ncols() {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for &i in indices {
            let v = x[(i, feature)];
            lo = lo.min(v);
            hi = hi.max(v);
        }
        if lo >= hi {
            continue;
        }
        let threshold = rng.gen_range(lo..hi);

        let mut left_sum = 0.0;
        let mut left_sq = 0.0;
        let mut n_left = 0usize;
        let mut total_sum = 0.0;
        let mut total_sq = 0.0;
        for &i in indices {
            let yi = y[i];
            total_sum += yi;
            total_sq += yi * yi;
            if x[(i, feature)] <= threshold {
                left_sum += yi;
                left_sq += yi * yi;
                n_left += 1;
            }
        }
        let n_right = indices.len() - n_left;
        if n_left < min_samples_leaf || n_right < min_samples_leaf {
            continue;
        }

        let right_sum = total_sum - left_sum;
        let right_sq = total_sq - left_sq;
        let cost = (left_sq - left_sum * left_sum / n_left as f64)
            + (right_sq - right_sum * right_sum / n_right as f64);

        if best.map_or(true, |(_, _, c)| cost < c) {
            best = Some((feature, threshold, cost));
        }
    }

    best.map(|(feature, threshold, _)| (feature, threshold))
}

fn predict_row(node: &Node, row: &[f64]) -> f64 {
    match node {
        Node::Leaf { value } => *value,
        Node::Internal {
            feature,
            threshold,
            left,
            right,
        } => {
            if row[*feature] <= *threshold {
                predict_row(left, row)
            } else {
                predict_row(right, row)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tree_memorizes_a_step_function() {
        let x = Array2::from_shape_vec((6, 1), vec![0.0, 1.0, 2.0, 10.0, 11.0, 12.0]).unwrap();
        let y = Array1::from_vec(vec![1.0, 1.0, 1.0, 5.0, 5.0, 5.0]);
        let mut tree = DecisionTreeRegressor::new(None, 2);
        tree.fit(&x, &y).unwrap();
        let preds = tree
            .predict(&Array2::from_shape_vec((2, 1), vec![1.5, 11.5]).unwrap())
            .unwrap();
        assert!((preds[0] - 1.0).abs() < 1e-12);
        assert!((preds[1] - 5.0).abs() < 1e-12);
    }

    #[test]
    fn depth_zero_tree_predicts_the_mean() {
        let x = Array2::from_shape_vec((4, 1), vec![0.0, 1.0, 2.0, 3.0]).unwrap();
        let y = Array1::from_vec(vec![1.0, 2.0, 3.0, 4.0]);
        let mut tree = DecisionTreeRegressor::new(Some(0), 2);
        tree.fit(&x, &y).unwrap();
        let preds = tree.predict(&x).unwrap();
        for p in preds.iter() {
            assert!((p - 2.5).abs() < 1e-12);
        }
    }

    #[test]
    fn random_splitter_is_deterministic_per_seed() {
        let x = Array2::from_shape_vec(
            (8, 2),
            vec![
                0.0, 1.0, 1.0, 0.5, 2.0, 0.1, 3.0, 0.9, 4.0, 0.2, 5.0, 0.8, 6.0, 0.3, 7.0, 0.7,
            ],
        )
        .unwrap();
        let y = Array1::from_vec(vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        let settings = TreeSettings {
            splitter: Splitter::Random,
            seed: 42,
            ..TreeSettings::default()
        };
        let mut a = DecisionTreeRegressor::with_settings(settings.clone());
        let mut b = DecisionTreeRegressor::with_settings(settings);
        a.fit(&x, &y).unwrap();
        b.fit(&x, &y).unwrap();
        assert_eq!(a.predict(&x).unwrap(), b.predict(&x).unwrap());
    }
}
