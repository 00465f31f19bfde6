//! Feature standardization.
//!
//! The scaler is always fit on training rows only and then reapplied,
//! never refit, to held-out rows. Keeping fit and transform separate is
//! what guarantees validation data can never leak into the scaling
//! statistics.
use crate::math::Array2;

/// Per-column mean/std standard scaler.
#[derive(Clone, Debug, PartialEq)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub std: Vec<f64>,
}

impl StandardScaler {
    /// Minimum stddev to avoid division by zero when transforming.
    const MIN_STD: f64 = 1e-9;

    /// Fit scaling statistics from a matrix where rows are samples and
    /// columns are features.
    pub fn fit(x: &Array2<f64>) -> StandardScaler {
        let (nrows, ncols) = x.shape();
        assert!(nrows > 0 && ncols > 0, "scaler requires a non-empty matrix");

        let mut mean = vec![0.0f64; ncols];
        for r in 0..nrows {
            for c in 0..ncols {
                mean[c] += x[(r, c)];
            }
        }
        let nrows_f = nrows as f64;
        for v in mean.iter_mut() {
            *v /= nrows_f;
        }

        let mut std = vec![0.0f64; ncols];
        for r in 0..nrows {
            for c in 0..ncols {
                let d = x[(r, c)] - mean[c];
                std[c] += d * d;
            }
        }
        for v in std.iter_mut() {
            *v = (*v / nrows_f).sqrt().max(Self::MIN_STD);
        }

        StandardScaler { mean, std }
    }

    /// Transform all rows with the fitted statistics.
    pub fn transform(&self, x: &Array2<f64>) -> Array2<f64> {
        let (nrows, ncols) = x.shape();
        assert_eq!(
            ncols,
            self.mean.len(),
            "scaler was fit on a different number of columns"
        );
        let mut out = Vec::with_capacity(nrows * ncols);
        for r in 0..nrows {
            for c in 0..ncols {
                out.push((x[(r, c)] - self.mean[c]) / self.std[c]);
            }
        }
        Array2::from_shape_vec((nrows, ncols), out).expect("transform: shape mismatch")
    }

    /// Fit on `x` and return the transformed matrix in one call.
    pub fn fit_transform(x: &Array2<f64>) -> (StandardScaler, Array2<f64>) {
        let scaler = Self::fit(x);
        let transformed = scaler.transform(x);
        (scaler, transformed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_centers_columns() {
        let x = Array2::from_shape_vec((4, 1), vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let (_, t) = StandardScaler::fit_transform(&x);
        let mean: f64 = (0..4).map(|r| t[(r, 0)]).sum::<f64>() / 4.0;
        assert!(mean.abs() < 1e-12);
    }

    #[test]
    fn constant_column_does_not_divide_by_zero() {
        let x = Array2::from_shape_vec((3, 1), vec![5.0, 5.0, 5.0]).unwrap();
        let (_, t) = StandardScaler::fit_transform(&x);
        for r in 0..3 {
            assert!(t[(r, 0)].is_finite());
        }
    }
}
