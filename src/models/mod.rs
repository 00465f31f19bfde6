pub mod boosting;
pub mod forest;
pub mod gbdt;
pub mod knn;
pub mod linear;
pub mod svr;
pub mod tree;

pub mod factory;
pub mod regressor_trait;

pub use factory::build_regressor;
pub use regressor_trait::Regressor;
