//! Text diagnostics for a loaded dataset.
//!
//! Every function here is pure: it formats a `String` (or returns a
//! matrix) and leaves printing to the caller, so the summaries are easy
//! to assert on in tests.
use std::fmt::Write;

use statrs::statistics::{Data, Max, Min, OrderStatistics, Statistics};

use crate::data::Dataset;
use crate::math::Array2;

/// `(rows, columns)` of the table, target included.
pub fn shape(dataset: &Dataset) -> (usize, usize) {
    (dataset.n_rows(), dataset.n_features() + 1)
}

/// One line per column with its type. All columns are numeric here, so
/// this mirrors a dtype listing rather than inferring anything.
pub fn dtypes(dataset: &Dataset) -> String {
    let mut out = String::new();
    for name in dataset.column_names() {
        let _ = writeln!(out, "{:<10} f64", name);
    }
    out
}

/// The first `n` rows, formatted as an aligned table with a header.
pub fn head(dataset: &Dataset, n: usize) -> String {
    let mut out = String::new();
    let names = dataset.column_names();
    let _ = writeln!(
        out,
        "{}",
        names
            .iter()
            .map(|n| format!("{:>9}", n))
            .collect::<Vec<_>>()
            .join(" ")
    );
    let limit = n.min(dataset.n_rows());
    for row in 0..limit {
        let mut fields: Vec<String> = dataset
            .x
            .row_slice(row)
            .iter()
            .map(|v| format!("{:>9.3}", v))
            .collect();
        fields.push(format!("{:>9.3}", dataset.y[row]));
        let _ = writeln!(out, "{}", fields.join(" "));
    }
    out
}

/// Summary statistics per column: count, mean, std, min, quartiles, max.
pub fn describe(dataset: &Dataset) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<10} {:>7} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9}",
        "column", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
    );
    for name in dataset.column_names() {
        let values = dataset
            .column(name)
            .expect("column_names() only yields existing columns")
            .to_vec();
        let mean = values.as_slice().mean();
        let std = values.as_slice().std_dev();
        let mut data = Data::new(values.clone());
        let _ = writeln!(
            out,
            "{:<10} {:>7} {:>9.3} {:>9.3} {:>9.3} {:>9.3} {:>9.3} {:>9.3} {:>9.3}",
            name,
            values.len(),
            mean,
            std,
            data.min(),
            data.lower_quartile(),
            data.median(),
            data.upper_quartile(),
            data.max()
        );
    }
    out
}

/// Pairwise Pearson correlation over all columns, target included.
/// Returns a symmetric matrix in column declaration order.
pub fn correlation_matrix(dataset: &Dataset) -> Array2<f64> {
    let names = dataset.column_names();
    let columns: Vec<Vec<f64>> = names
        .iter()
        .map(|name| {
            dataset
                .column(name)
                .expect("column_names() only yields existing columns")
                .to_vec()
        })
        .collect();
    let n = columns.len();
    let mut corr = Array2::from_shape_vec((n, n), vec![0.0; n * n]).expect("square shape");
    for i in 0..n {
        for j in i..n {
            let r = pearson(&columns[i], &columns[j]);
            corr[(i, j)] = r;
            corr[(j, i)] = r;
        }
    }
    corr
}

/// Render a correlation matrix with row/column labels.
pub fn format_correlation(dataset: &Dataset, corr: &Array2<f64>) -> String {
    let names = dataset.column_names();
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<10} {}",
        "",
        names
            .iter()
            .map(|n| format!("{:>7}", n))
            .collect::<Vec<_>>()
            .join(" ")
    );
    for (i, name) in names.iter().enumerate() {
        let row: Vec<String> = (0..names.len())
            .map(|j| format!("{:>7.2}", corr[(i, j)]))
            .collect();
        let _ = writeln!(out, "{:<10} {}", name, row.join(" "));
    }
    out
}

fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let cov = a.covariance(b);
    let denom = a.std_dev() * b.std_dev();
    if denom == 0.0 {
        0.0
    } else {
        cov / denom
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Array1, Array2 as Matrix};

    fn toy() -> Dataset {
        Dataset {
            feature_names: vec!["a".into(), "b".into()],
            target_name: "t".into(),
            x: Matrix::from_shape_vec((3, 2), vec![1.0, 2.0, 2.0, 4.0, 3.0, 6.0]).unwrap(),
            y: Array1::from_vec(vec![10.0, 20.0, 30.0]),
        }
    }

    #[test]
    fn shape_counts_target_column() {
        assert_eq!(shape(&toy()), (3, 3));
    }

    #[test]
    fn perfectly_linear_columns_have_unit_correlation() {
        let corr = correlation_matrix(&toy());
        assert!((corr[(0, 1)] - 1.0).abs() < 1e-9);
        assert!((corr[(0, 2)] - 1.0).abs() < 1e-9);
        for i in 0..3 {
            assert!((corr[(i, i)] - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn head_clamps_to_row_count() {
        let text = head(&toy(), 100);
        // header + 3 data rows
        assert_eq!(text.lines().count(), 4);
    }
}
