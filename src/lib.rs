pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::app::build_estimator;
pub use crate::config::{DataStrategy, TomlConfig};
pub use crate::core::estimator::{AgrEstimator, EstimatorSettings};
pub use crate::domain::model::{AgrReport, Coordinate, Region};
pub use crate::utils::error::{AgrError, Result};
