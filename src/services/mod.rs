pub mod registry;
pub mod estimator;
