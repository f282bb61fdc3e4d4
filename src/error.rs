//! Calculation and grading errors

use serde::Serialize;
use thiserror::Error;

/// Errors returned by the calculators and the answer evaluator.
///
/// All variants are recoverable: the caller reports them and asks for new
/// input. None of them indicate a broken process.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Please provide exactly 3 of 4 values (got {provided})")]
    AmbiguousInput { provided: usize },

    #[error("{field} cannot be zero")]
    DivisionByZero { field: String },

    #[error("Expected {expected} answer field(s) but {submitted} were submitted")]
    ArityMismatch { expected: usize, submitted: usize },
}

/// Result type for calculator and grading operations
pub type CalcResult<T> = Result<T, CalcError>;

impl CalcError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Short machine-readable error kind
    pub fn kind(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "invalid_input",
            CalcError::AmbiguousInput { .. } => "ambiguous_input",
            CalcError::DivisionByZero { .. } => "division_by_zero",
            CalcError::ArityMismatch { .. } => "arity_mismatch",
        }
    }

    /// JSON-friendly view of the error for tool responses
    pub fn to_report(&self) -> ErrorReport {
        ErrorReport {
            error: self.to_string(),
            kind: self.kind(),
        }
    }
}

/// Serialized form of a [`CalcError`]
#[derive(Debug, Clone, Serialize)]
pub struct ErrorReport {
    pub error: String,
    pub kind: &'static str,
}

/// Reject non-finite values for the named field
pub(crate) fn require_finite(field: &str, value: f64) -> CalcResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::invalid(field, "must be a finite number"))
    }
}

/// Reject a computed value that overflowed
pub(crate) fn require_finite_result(field: &str, value: f64) -> CalcResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::invalid(field, "result is too large to represent"))
    }
}

/// Reject non-finite or non-positive values for the named field
pub(crate) fn require_positive(field: &str, value: f64) -> CalcResult<f64> {
    let value = require_finite(field, value)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(CalcError::invalid(field, "must be greater than zero"))
    }
}

/// Reject non-finite or negative values for the named field
pub(crate) fn require_non_negative(field: &str, value: f64) -> CalcResult<f64> {
    let value = require_finite(field, value)?;
    if value >= 0.0 {
        Ok(value)
    } else {
        Err(CalcError::invalid(field, "must not be negative"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            CalcError::AmbiguousInput { provided: 2 }.to_string(),
            "Please provide exactly 3 of 4 values (got 2)"
        );
        assert_eq!(
            CalcError::DivisionByZero { field: "Stock Concentration (C1)".into() }.to_string(),
            "Stock Concentration (C1) cannot be zero"
        );
    }

    #[test]
    fn test_report_kind() {
        let report = CalcError::ArityMismatch { expected: 2, submitted: 1 }.to_report();
        assert_eq!(report.kind, "arity_mismatch");
        assert!(report.error.contains("2 answer field(s)"));
    }

    #[test]
    fn test_validators() {
        assert!(require_finite("x", f64::NAN).is_err());
        assert!(require_finite("x", f64::INFINITY).is_err());
        assert_eq!(require_positive("x", 2.0), Ok(2.0));
        assert!(require_positive("x", 0.0).is_err());
        assert_eq!(require_non_negative("x", 0.0), Ok(0.0));
        assert!(require_non_negative("x", -1.0).is_err());
        assert_eq!(require_finite_result("x", 1e300), Ok(1e300));
        assert_eq!(
            require_finite_result("x", 1e300 * 1e10),
            Err(CalcError::invalid("x", "result is too large to represent"))
        );
    }
}
