//! hedonic: model selection and evaluation for house-price regression.
//!
//! This crate loads the housing table, produces text and plot
//! diagnostics, cross-validates fixed rosters of baseline and ensemble
//! regressors, grid-searches hyper-parameters for the short-listed
//! algorithms, and scores one final configured model on a held-out
//! validation set. A small user-account store with staged commits lives
//! alongside the modeling pipeline.
//!
//! The design favors small, testable modules: every stage is an
//! explicit, re-runnable call taking its inputs as arguments, and every
//! failure propagates as a `Result`.
pub mod config;
pub mod data;
pub mod describe;
pub mod evaluation;
pub mod final_fit;
pub mod math;
pub mod metrics;
pub mod models;
pub mod preprocessing;
pub mod report;
pub mod users;
