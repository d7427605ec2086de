//! Error types for the core crate.

use thiserror::Error;

/// Errors raised when timing or comparison parameters are out of range.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    /// A numeric parameter is outside its valid range.
    #[error("Parameter '{name}' out of range: {value} ({expected})")]
    OutOfRange {
        /// The parameter name.
        name: &'static str,
        /// The offending value.
        value: f64,
        /// Human readable description of the valid range.
        expected: &'static str,
    },

    /// The comparator profile cap is zero.
    #[error("Comparison profile cap must allow at least one profile")]
    ZeroProfileCap,
}

/// Result type alias for parameter validation.
pub type ParameterResult<T> = Result<T, ParameterError>;
