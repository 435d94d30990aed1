//! Error types for the estimator crate.
//!
//! The estimation pipeline itself never fails: invalid numbers are neutralised
//! to zero cost. Errors only arise when calibration data is constructed or when
//! a caller asks for up-front validation of job options.

use thiserror::Error;

/// Errors raised while building a [`crate::ParameterTable`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterTableError {
    /// The table has no entries.
    #[error("Parameter table is empty")]
    Empty,

    /// A thickness key is NaN or infinite.
    #[error("Non-finite thickness key at index {index}: {key}")]
    NonFiniteKey { index: usize, key: f64 },

    /// A mapped value is NaN or infinite.
    #[error("Non-finite value for thickness {key}: {value}")]
    NonFiniteValue { key: f64, value: f64 },

    /// Keys are not strictly increasing.
    #[error("Thickness keys must be strictly increasing: {key} follows {previous}")]
    NotIncreasing { previous: f64, key: f64 },
}

/// Errors that can occur when validating an estimation request.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EstimateError {
    /// A job option is out of its valid domain.
    #[error("Invalid option '{name}': {reason}")]
    InvalidOption { name: String, reason: String },
}

/// Result type alias for estimator operations.
pub type EstimateResult<T> = Result<T, EstimateError>;
