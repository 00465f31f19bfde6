//! Model evaluation: k-fold cross-validation, roster comparison, and
//! hyper-parameter grid search.
pub mod compare;
pub mod grid;
pub mod kfold;

pub use compare::{baseline_roster, compare_models, ensemble_roster, scaled_roster, Candidate, ComparisonEntry};
pub use grid::{GridSearch, GridSearchResult};
pub use kfold::{cross_val_score, EvaluationResult, KFold};
