//! Validation Error Types

use thiserror::Error;

/// Input rejected before it reaches the evaluator.
///
/// Values outside the *ideal* range are not errors; these cover values that
/// cannot be a physical measurement at all.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Value outside the measurable domain
    #[error("{field} value {value} is outside the measurable range [{min}, {max}]")]
    OutOfDomain {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// NaN or infinite value
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
}
