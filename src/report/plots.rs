//! Plotly figure builders for dataset diagnostics.
//!
//! Each function returns a `Plot`; the report module decides where the
//! figures end up. Nothing here opens a window or blocks.
use anyhow::{anyhow, Result};
use itertools_num::linspace;
use plotly::common::Mode;
use plotly::layout::{Axis, Layout};
use plotly::{BoxPlot, HeatMap, Histogram, Plot, Scatter};

use crate::data::Dataset;
use crate::describe::correlation_matrix;
use crate::evaluation::ComparisonEntry;

/// Histogram of one named column.
pub fn plot_histogram(dataset: &Dataset, column: &str) -> Result<Plot> {
    let values = dataset
        .column(column)
        .ok_or_else(|| anyhow!("unknown column '{}'", column))?;

    let trace = Histogram::new(values.to_vec()).name(column);
    let layout = Layout::new()
        .title(column)
        .x_axis(Axis::new().title(column))
        .y_axis(Axis::new().title("Count"));

    let mut plot = Plot::new();
    plot.add_trace(trace);
    plot.set_layout(layout);
    Ok(plot)
}

/// Gaussian kernel density estimate of one named column, evaluated on a
/// uniform grid spanning the observed range.
pub fn plot_density(dataset: &Dataset, column: &str) -> Result<Plot> {
    let values = dataset
        .column(column)
        .ok_or_else(|| anyhow!("unknown column '{}'", column))?
        .to_vec();
    let n = values.len();
    if n < 2 {
        return Err(anyhow!("density plot needs at least 2 values"));
    }

    let mean = values.iter().sum::<f64>() / n as f64;
    let std = (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64).sqrt();
    // Silverman's rule; fall back to a fixed width for constant columns
    let bandwidth = if std > 0.0 {
        1.06 * std * (n as f64).powf(-0.2)
    } else {
        1.0
    };

    let lo = values.iter().cloned().fold(f64::INFINITY, f64::min) - 3.0 * bandwidth;
    let hi = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max) + 3.0 * bandwidth;
    let grid: Vec<f64> = linspace(lo, hi, 200).collect();
    let norm = 1.0 / ((2.0 * std::f64::consts::PI).sqrt() * bandwidth * n as f64);
    let density: Vec<f64> = grid
        .iter()
        .map(|&g| {
            values
                .iter()
                .map(|&v| (-0.5 * ((g - v) / bandwidth).powi(2)).exp())
                .sum::<f64>()
                * norm
        })
        .collect();

    let trace = Scatter::new(grid, density).mode(Mode::Lines).name(column);
    let layout = Layout::new()
        .title(column)
        .x_axis(Axis::new().title(column))
        .y_axis(Axis::new().title("Density"));

    let mut plot = Plot::new();
    plot.add_trace(trace);
    plot.set_layout(layout);
    Ok(plot)
}

/// Box plot with one trace per column, target included.
pub fn plot_boxes(dataset: &Dataset) -> Plot {
    let mut plot = Plot::new();
    for name in dataset.column_names() {
        let values = dataset
            .column(name)
            .expect("column_names() only yields existing columns");
        plot.add_trace(BoxPlot::new(values.to_vec()).name(name));
    }
    plot.set_layout(Layout::new().title("Column distributions"));
    plot
}

/// Scatter plots of every feature against the target, one figure per
/// feature, in declaration order.
pub fn plot_feature_target_scatters(dataset: &Dataset) -> Vec<Plot> {
    let target = dataset.y.to_vec();
    let mut plots = Vec::with_capacity(dataset.feature_names.len());
    for (idx, name) in dataset.feature_names.iter().enumerate() {
        let values = dataset.x.column(idx).to_vec();
        let trace = Scatter::new(values, target.clone())
            .mode(Mode::Markers)
            .name(name.as_str());
        let layout = Layout::new()
            .title(name.as_str())
            .x_axis(Axis::new().title(name.as_str()))
            .y_axis(Axis::new().title(dataset.target_name.as_str()));
        let mut plot = Plot::new();
        plot.add_trace(trace);
        plot.set_layout(layout);
        plots.push(plot);
    }
    plots
}

/// Box plot of per-candidate cross-validation score distributions, one
/// trace per candidate in roster order. Failed candidates carry no
/// scores and are left out.
pub fn plot_comparison_boxes(title: &str, entries: &[ComparisonEntry]) -> Plot {
    let mut plot = Plot::new();
    for entry in entries {
        if let Ok(result) = &entry.outcome {
            plot.add_trace(BoxPlot::new(result.scores.to_vec()).name(entry.label.as_str()));
        }
    }
    plot.set_layout(
        Layout::new()
            .title(title)
            .y_axis(Axis::new().title("Score")),
    );
    plot
}

/// Pairwise scatter panels over all columns (the scatter-matrix view),
/// one figure per unordered column pair.
pub fn plot_scatter_matrix(dataset: &Dataset) -> Vec<Plot> {
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

    let mut plots = Vec::new();
    for i in 0..names.len() {
        for j in (i + 1)..names.len() {
            let title = format!("{} vs {}", names[i], names[j]);
            let trace = Scatter::new(columns[i].clone(), columns[j].clone())
                .mode(Mode::Markers)
                .name(title.as_str());
            let layout = Layout::new()
                .title(title.as_str())
                .x_axis(Axis::new().title(names[i]))
                .y_axis(Axis::new().title(names[j]));
            let mut plot = Plot::new();
            plot.add_trace(trace);
            plot.set_layout(layout);
            plots.push(plot);
        }
    }
    plots
}

/// Pearson correlation heat map over all columns.
pub fn plot_correlation_heatmap(dataset: &Dataset) -> Plot {
    let corr = correlation_matrix(dataset);
    let names: Vec<String> = dataset
        .column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    let z: Vec<Vec<f64>> = (0..corr.nrows())
        .map(|i| corr.row_slice(i).to_vec())
        .collect();

    let trace = HeatMap::new(names.clone(), names, z).zmin(-1.0).zmax(1.0);
    let mut plot = Plot::new();
    plot.add_trace(trace);
    plot.set_layout(Layout::new().title("Pearson correlation"));
    plot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::EvaluationResult;
    use crate::math::Array1;

    #[test]
    fn comparison_boxes_trace_scored_candidates_only() {
        let entries = vec![
            ComparisonEntry {
                label: "LR".to_string(),
                outcome: Ok(EvaluationResult {
                    scores: Array1::from_vec(vec![-21.0, -23.5, -19.8]),
                }),
            },
            ComparisonEntry {
                label: "KNN-huge".to_string(),
                outcome: Err(anyhow!("n_neighbors exceeds the training rows")),
            },
            ComparisonEntry {
                label: "CART".to_string(),
                outcome: Ok(EvaluationResult {
                    scores: Array1::from_vec(vec![-30.1, -28.7, -33.2]),
                }),
            },
        ];

        let html = plot_comparison_boxes("Baseline algorithms", &entries)
            .to_inline_html(Some("cmp"));
        assert!(html.contains("LR"));
        assert!(html.contains("CART"));
        assert!(!html.contains("KNN-huge"));
    }
}
