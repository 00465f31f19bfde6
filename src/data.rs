//! Dataset loading and train/validation splitting.
//!
//! A `Dataset` is an ordered set of named numeric columns plus a target
//! column, loaded either from the whitespace-delimited housing format or
//! from a delimited file via the `csv` crate. Loading is the only place
//! the table is built; afterwards it is immutable.
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use rand::seq::SliceRandom;
use rand::{rngs::StdRng, SeedableRng};

use crate::math::{Array1, Array2};

/// Column names of the housing schema: 13 features followed by the target.
pub const HOUSING_COLUMNS: [&str; 14] = [
    "CRIM", "ZN", "INDUS", "CHAS", "NOX", "RM", "AGE", "DIS", "RAD", "TAX", "PTRATIO", "B",
    "LSTAT", "MEDV",
];

/// An in-memory table of named numeric feature columns and one target.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub feature_names: Vec<String>,
    pub target_name: String,
    pub x: Array2<f64>,
    pub y: Array1<f64>,
}

/// Options for reading a delimited file into a `Dataset`.
#[derive(Debug, Clone)]
pub struct DelimitedOptions {
    pub delimiter: u8,
    pub has_headers: bool,
    /// Column names to use when the file carries no header row.
    pub column_names: Vec<String>,
}

impl Default for DelimitedOptions {
    fn default() -> Self {
        DelimitedOptions {
            delimiter: b',',
            has_headers: false,
            column_names: HOUSING_COLUMNS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Dataset {
    /// Assemble a dataset from parsed rows. The last column is the target.
    fn from_rows(column_names: &[String], rows: Vec<Vec<f64>>) -> Result<Dataset> {
        let ncols = column_names.len();
        if ncols < 2 {
            return Err(anyhow!("a dataset needs at least one feature and a target"));
        }
        if rows.is_empty() {
            return Err(anyhow!("no data rows found"));
        }
        let mut features = Vec::with_capacity(rows.len());
        let mut targets = Vec::with_capacity(rows.len());
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != ncols {
                return Err(anyhow!(
                    "row {} has {} values, expected {}",
                    i + 1,
                    row.len(),
                    ncols
                ));
            }
            let mut row = row;
            let target = row.pop().expect("ncols >= 2");
            targets.push(target);
            features.push(row);
        }
        let x = Array2::from_rows(&features)?;
        Ok(Dataset {
            feature_names: column_names[..ncols - 1].to_vec(),
            target_name: column_names[ncols - 1].clone(),
            x,
            y: Array1::from_vec(targets),
        })
    }

    pub fn n_rows(&self) -> usize {
        self.x.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.x.ncols()
    }

    /// All column names, features first, target last.
    pub fn column_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.feature_names.iter().map(|s| s.as_str()).collect();
        names.push(self.target_name.as_str());
        names
    }

    /// A named column, including the target.
    pub fn column(&self, name: &str) -> Option<Array1<f64>> {
        if name == self.target_name {
            return Some(self.y.clone());
        }
        self.feature_names
            .iter()
            .position(|n| n == name)
            .map(|idx| self.x.column(idx))
    }

    /// Partition the rows into disjoint train and validation sets.
    ///
    /// The shuffle is driven entirely by `seed`, so the same
    /// (ratio, seed) pair always produces the same split.
    pub fn train_validation_split(&self, validation_ratio: f64, seed: u64) -> Result<Split> {
        if !(0.0..1.0).contains(&validation_ratio) {
            return Err(anyhow!(
                "validation ratio must be in [0, 1), got {}",
                validation_ratio
            ));
        }
        let n = self.n_rows();
        let mut indices: Vec<usize> = (0..n).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        indices.shuffle(&mut rng);

        let n_validation = (n as f64 * validation_ratio).round() as usize;
        if n_validation == 0 {
            return Err(anyhow!(
                "validation ratio {} leaves no validation rows out of {}",
                validation_ratio,
                n
            ));
        }
        if n_validation == n {
            return Err(anyhow!(
                "validation ratio {} leaves no training rows out of {}",
                validation_ratio,
                n
            ));
        }
        let (validation_idx, train_idx) = indices.split_at(n_validation);

        Ok(Split {
            x_train: self.x.select_rows(train_idx),
            y_train: self.y.select(train_idx),
            x_validation: self.x.select_rows(validation_idx),
            y_validation: self.y.select(validation_idx),
        })
    }
}

/// A train/validation partition of one dataset.
#[derive(Debug, Clone)]
pub struct Split {
    pub x_train: Array2<f64>,
    pub y_train: Array1<f64>,
    pub x_validation: Array2<f64>,
    pub y_validation: Array1<f64>,
}

impl Split {
    pub fn n_train(&self) -> usize {
        self.x_train.nrows()
    }

    pub fn n_validation(&self) -> usize {
        self.x_validation.nrows()
    }
}

/// Read the whitespace-delimited, headerless housing file.
pub fn read_housing<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open dataset: {}", path.as_ref().display()))?;
    let reader = BufReader::new(file);
    let column_names: Vec<String> = HOUSING_COLUMNS.iter().map(|s| s.to_string()).collect();

    let mut rows = Vec::new();
    for (line_idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", line_idx + 1))?;
        if line.trim().is_empty() {
            continue;
        }
        let row = line
            .split_whitespace()
            .map(|field| {
                field
                    .parse::<f64>()
                    .with_context(|| format!("Invalid number '{}' at line {}", field, line_idx + 1))
            })
            .collect::<Result<Vec<f64>>>()?;
        rows.push(row);
    }

    Dataset::from_rows(&column_names, rows)
}

/// Read a delimited file via the `csv` crate.
pub fn read_delimited<P: AsRef<Path>>(path: P, options: &DelimitedOptions) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(options.has_headers)
        .from_path(&path)
        .with_context(|| format!("Failed to open dataset: {}", path.as_ref().display()))?;

    let column_names: Vec<String> = if options.has_headers {
        reader
            .headers()
            .context("Failed to read header row")?
            .iter()
            .map(|h| h.trim().to_string())
            .collect()
    } else {
        options.column_names.clone()
    };

    let mut rows = Vec::new();
    for (row_idx, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Failed to read row {}", row_idx + 1))?;
        let row = record
            .iter()
            .map(|field| {
                field
                    .trim()
                    .parse::<f64>()
                    .with_context(|| format!("Invalid number '{}' at row {}", field, row_idx + 1))
            })
            .collect::<Result<Vec<f64>>>()?;
        rows.push(row);
    }

    Dataset::from_rows(&column_names, rows)
}
