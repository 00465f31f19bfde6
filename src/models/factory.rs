use crate::config::RegressorKind;
use crate::models::regressor_trait::Regressor;

/// Build a boxed regressor from a fully-configured `RegressorKind`.
pub fn build_regressor(kind: &RegressorKind) -> Box<dyn Regressor> {
    match kind {
        RegressorKind::Linear => Box::new(crate::models::linear::LinearRegressor::new()),
        RegressorKind::Lasso {
            alpha,
            max_iter,
            tol,
        } => Box::new(crate::models::linear::ElasticNetRegressor::lasso(
            *alpha, *max_iter, *tol,
        )),
        RegressorKind::ElasticNet {
            alpha,
            l1_ratio,
            max_iter,
            tol,
        } => Box::new(crate::models::linear::ElasticNetRegressor::new(
            *alpha, *l1_ratio, *max_iter, *tol,
        )),
        RegressorKind::Knn { n_neighbors } => {
            Box::new(crate::models::knn::KnnRegressor::new(*n_neighbors))
        }
        RegressorKind::DecisionTree {
            max_depth,
            min_samples_split,
        } => Box::new(crate::models::tree::DecisionTreeRegressor::new(
            *max_depth,
            *min_samples_split,
        )),
        RegressorKind::LinearSvr {
            c,
            epsilon,
            epochs,
            seed,
        } => Box::new(crate::models::svr::LinearSvr::new(
            *c, *epsilon, *epochs, *seed,
        )),
        RegressorKind::RandomForest {
            n_estimators,
            max_depth,
            seed,
        } => Box::new(crate::models::forest::RandomForestRegressor::new(
            *n_estimators,
            *max_depth,
            *seed,
        )),
        RegressorKind::ExtraTrees {
            n_estimators,
            max_depth,
            seed,
        } => Box::new(crate::models::forest::ExtraTreesRegressor::new(
            *n_estimators,
            *max_depth,
            *seed,
        )),
        RegressorKind::AdaBoost {
            base,
            n_estimators,
            seed,
        } => Box::new(crate::models::boosting::AdaBoostRegressor::new(
            (**base).clone(),
            *n_estimators,
            *seed,
        )),
        RegressorKind::GradientBoosting {
            n_estimators,
            max_depth,
            learning_rate,
        } => Box::new(crate::models::gbdt::GradientBoostingRegressor::new(
            *n_estimators,
            *max_depth,
            *learning_rate,
        )),
    }
}
