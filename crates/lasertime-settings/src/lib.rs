//! # LaserTime Settings
//!
//! Loads and saves the machine profile, calibration tables and job defaults
//! that parameterise the estimator.

pub mod config;
pub mod error;

pub use config::{Config, EstimateDefaults, APP_DIR, CONFIG_FILE};
pub use error::{SettingsError, SettingsResult};
