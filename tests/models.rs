use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use hedonic::config::RegressorKind;
use hedonic::data::Split;
use hedonic::final_fit::FinalEstimator;
use hedonic::math::{Array1, Array2};
use hedonic::metrics::mean_squared_error;
use hedonic::models::build_regressor;

// y = 2*x0 + x1 - 3 plus a little noise, split 80/20
fn toy_split(n: usize, seed: u64) -> Split {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut rows = Vec::with_capacity(n);
    let mut ys = Vec::with_capacity(n);
    for _ in 0..n {
        let a: f64 = rng.gen_range(0.0..10.0);
        let b: f64 = rng.gen_range(0.0..10.0);
        rows.push(vec![a, b]);
        ys.push(2.0 * a + b - 3.0 + rng.gen_range(-0.05..0.05));
    }
    let n_validation = n / 5;
    let (validation_rows, train_rows) = rows.split_at(n_validation);
    let (validation_y, train_y) = ys.split_at(n_validation);
    Split {
        x_train: Array2::from_rows(train_rows).unwrap(),
        y_train: Array1::from_vec(train_y.to_vec()),
        x_validation: Array2::from_rows(validation_rows).unwrap(),
        y_validation: Array1::from_vec(validation_y.to_vec()),
    }
}

#[test]
fn every_roster_kind_fits_and_predicts() {
    let split = toy_split(40, 3);
    let kinds = vec![
        RegressorKind::Linear,
        RegressorKind::lasso(),
        RegressorKind::elastic_net(),
        RegressorKind::knn(3),
        RegressorKind::decision_tree(),
        RegressorKind::linear_svr(),
        RegressorKind::random_forest(10),
        RegressorKind::extra_trees(10),
        RegressorKind::ada_boost(RegressorKind::decision_tree(), 10),
        RegressorKind::gradient_boosting(10),
    ];

    for kind in kinds {
        let mut model = build_regressor(&kind);
        model.fit(&split.x_train, &split.y_train).unwrap();
        let preds = model.predict(&split.x_validation).unwrap();
        assert_eq!(preds.len(), split.n_validation());
        assert!(preds.iter().all(|p| p.is_finite()), "{} predicted non-finite", model.name());
    }
}

#[test]
fn final_linear_fit_recovers_the_generating_line() {
    let split = toy_split(50, 5);
    let report = FinalEstimator::new(RegressorKind::Linear).run(&split).unwrap();
    assert_eq!(report.predictions.len(), split.n_validation());
    assert!(report.mse < 0.01, "mse was {}", report.mse);
}

#[test]
fn reference_estimator_beats_the_mean_baseline() {
    let split = toy_split(100, 7);
    let report = FinalEstimator::reference().run(&split).unwrap();

    let train_mean = split.y_train.mean().unwrap();
    let baseline = Array1::from_elem(split.n_validation(), train_mean);
    let baseline_mse = mean_squared_error(&split.y_validation, &baseline);

    assert!(report.mse.is_finite());
    assert!(report.mse < baseline_mse);
}

#[test]
fn seeded_ensembles_are_deterministic() {
    let split = toy_split(40, 11);

    let mut a = build_regressor(&RegressorKind::extra_trees(20));
    a.fit(&split.x_train, &split.y_train).unwrap();
    let preds_a = a.predict(&split.x_validation).unwrap();

    let mut b = build_regressor(&RegressorKind::extra_trees(20));
    b.fit(&split.x_train, &split.y_train).unwrap();
    let preds_b = b.predict(&split.x_validation).unwrap();

    assert_eq!(preds_a.to_vec(), preds_b.to_vec());
}

#[test]
fn predict_before_fit_is_an_error() {
    let split = toy_split(20, 13);
    let model = build_regressor(&RegressorKind::knn(3));
    assert!(model.predict(&split.x_validation).is_err());
}
