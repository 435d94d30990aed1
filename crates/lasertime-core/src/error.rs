//! Error types for the core crate.

use thiserror::Error;

/// Errors produced by core parsing and validation helpers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// A unit string could not be recognised.
    #[error("Unknown unit: {0}")]
    UnknownUnit(String),
}

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_display() {
        let err = CoreError::UnknownUnit("furlong/fortnight".to_string());
        assert_eq!(err.to_string(), "Unknown unit: furlong/fortnight");
    }
}
