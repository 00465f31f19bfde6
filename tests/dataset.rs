use std::fs;
use std::path::PathBuf;

use hedonic::data::{read_delimited, read_housing, DelimitedOptions, HOUSING_COLUMNS};

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("hedonic-{}-{}", std::process::id(), name))
}

fn housing_line(seed: f64) -> String {
    (0..14)
        .map(|i| format!("{:.4}", seed + i as f64 * 0.5))
        .collect::<Vec<_>>()
        .join(" ")
}

#[test]
fn read_housing_parses_whitespace_rows() {
    let path = temp_path("housing-ok.txt");
    let body = format!(
        "{}\n{}\n\n{}\n",
        housing_line(0.1),
        housing_line(1.2),
        housing_line(2.3)
    );
    fs::write(&path, body).unwrap();

    let dataset = read_housing(&path).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(dataset.n_rows(), 3);
    assert_eq!(dataset.n_features(), 13);
    assert_eq!(dataset.target_name, "MEDV");
    assert_eq!(dataset.column_names(), HOUSING_COLUMNS.to_vec());
    // last value of the first row is the target
    assert!((dataset.y[0] - (0.1 + 13.0 * 0.5)).abs() < 1e-9);
}

#[test]
fn read_housing_rejects_non_numeric_fields() {
    let path = temp_path("housing-bad-field.txt");
    let mut body = housing_line(0.1);
    body.push_str("\n1.0 2.0 oops 4.0 5.0 6.0 7.0 8.0 9.0 10.0 11.0 12.0 13.0 14.0\n");
    fs::write(&path, body).unwrap();

    let err = read_housing(&path).unwrap_err();
    fs::remove_file(&path).unwrap();

    assert!(format!("{:#}", err).contains("oops"));
}

#[test]
fn read_housing_rejects_short_rows() {
    let path = temp_path("housing-short-row.txt");
    let body = format!("{}\n1.0 2.0 3.0\n", housing_line(0.1));
    fs::write(&path, body).unwrap();

    let err = read_housing(&path).unwrap_err();
    fs::remove_file(&path).unwrap();

    assert!(format!("{:#}", err).contains("row 2"));
}

#[test]
fn read_delimited_uses_header_row() {
    let path = temp_path("delimited.csv");
    fs::write(&path, "a,b,price\n1.0,2.0,10.0\n3.0,4.0,20.0\n").unwrap();

    let options = DelimitedOptions {
        delimiter: b',',
        has_headers: true,
        column_names: Vec::new(),
    };
    let dataset = read_delimited(&path, &options).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(dataset.feature_names, vec!["a".to_string(), "b".to_string()]);
    assert_eq!(dataset.target_name, "price");
    assert_eq!(dataset.n_rows(), 2);
    assert!((dataset.y[1] - 20.0).abs() < 1e-12);
}

#[test]
fn split_partitions_rows_without_overlap() {
    let path = temp_path("housing-split.txt");
    let body: String = (0..20).map(|i| housing_line(i as f64) + "\n").collect();
    fs::write(&path, body).unwrap();
    let dataset = read_housing(&path).unwrap();
    fs::remove_file(&path).unwrap();

    let split = dataset.train_validation_split(0.2, 7).unwrap();
    assert_eq!(split.n_validation(), 4);
    assert_eq!(split.n_train() + split.n_validation(), dataset.n_rows());

    // every target value lands in exactly one side
    let mut seen: Vec<f64> = split
        .y_train
        .iter()
        .chain(split.y_validation.iter())
        .copied()
        .collect();
    seen.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let mut expected = dataset.y.to_vec();
    expected.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(seen, expected);
}

#[test]
fn split_is_deterministic_for_a_fixed_seed() {
    let path = temp_path("housing-seed.txt");
    let body: String = (0..15).map(|i| housing_line(i as f64) + "\n").collect();
    fs::write(&path, body).unwrap();
    let dataset = read_housing(&path).unwrap();
    fs::remove_file(&path).unwrap();

    let a = dataset.train_validation_split(0.2, 7).unwrap();
    let b = dataset.train_validation_split(0.2, 7).unwrap();
    assert_eq!(a.y_train.to_vec(), b.y_train.to_vec());
    assert_eq!(a.y_validation.to_vec(), b.y_validation.to_vec());

    let c = dataset.train_validation_split(0.2, 8).unwrap();
    assert!(a.y_validation.to_vec() != c.y_validation.to_vec() || a.y_train.to_vec() != c.y_train.to_vec());
}

#[test]
fn split_rejects_out_of_range_ratio() {
    let path = temp_path("housing-ratio.txt");
    let body: String = (0..5).map(|i| housing_line(i as f64) + "\n").collect();
    fs::write(&path, body).unwrap();
    let dataset = read_housing(&path).unwrap();
    fs::remove_file(&path).unwrap();

    assert!(dataset.train_validation_split(1.0, 7).is_err());
    assert!(dataset.train_validation_split(-0.1, 7).is_err());
}

#[test]
fn split_rejects_ratios_that_empty_a_side() {
    let path = temp_path("housing-degenerate.txt");
    let body: String = (0..10).map(|i| housing_line(i as f64) + "\n").collect();
    fs::write(&path, body).unwrap();
    let dataset = read_housing(&path).unwrap();
    fs::remove_file(&path).unwrap();

    // no validation rows at all
    assert!(dataset.train_validation_split(0.0, 7).is_err());
    // rounds down to an empty validation set
    assert!(dataset.train_validation_split(0.04, 7).is_err());
    // rounds up to an empty training set
    assert!(dataset.train_validation_split(0.96, 7).is_err());
}
