//! Maps engine errors to one-line remediation hints.
//!
//! The dashboard shows the error message and, when present, the suggestion
//! inline next to the offending input control. Suggestions are advisory text
//! only; nothing here retries or mutates state.

use crate::error::EngineError;
use serde::Serialize;
use tea_core::Real;

/// Fallback hint for messages the mapper does not recognize.
pub const GENERIC_SUGGESTION: &str = "Check your inputs and try again.";

/// Remediation hint for a known error condition.
pub fn suggestion_for(error: &EngineError) -> &'static str {
    match error {
        EngineError::InvalidExpression { .. } => {
            "Use only numbers, + - * / ^, parentheses, log(), exp(), pow() and defined variables."
        }
        EngineError::DivisionByZero => "Use a non-zero divisor or remove the division step.",
        EngineError::NonPositiveLogarithm => {
            "Logarithms need a positive input; adjust earlier steps so the value stays above zero."
        }
        EngineError::PowerNonFinite => {
            "Reduce the exponent or the running value; the power step overflowed."
        }
        EngineError::ExponentialOverflow => {
            "Reduce the exponent; the exponential step overflowed."
        }
        EngineError::NonFiniteResult => {
            "A step produced an unrepresentable number; check operands for extreme values."
        }
        EngineError::UnsupportedOperation { .. } => {
            "Back-calculation supports multiply, divide, add, subtract, power, log and exponential."
        }
        EngineError::ZeroBase => "Use a non-zero base value, or an additive operation instead.",
        EngineError::ZeroTarget => "Use a non-zero target value, or an additive operation instead.",
    }
}

/// Remediation hint keyed by a raw message string.
///
/// Kept for callers that only hold the rendered message (the form layer
/// stores messages, not error values). Unknown messages get the generic hint.
pub fn suggestion_for_message(message: &str) -> &'static str {
    if message.starts_with("invalid expression") {
        suggestion_for(&EngineError::InvalidExpression { what: String::new() })
    } else {
        match message {
            "division by zero" => suggestion_for(&EngineError::DivisionByZero),
            "logarithm of non-positive number" => {
                suggestion_for(&EngineError::NonPositiveLogarithm)
            }
            "power operation resulted in non-finite number" => {
                suggestion_for(&EngineError::PowerNonFinite)
            }
            "exponential operation overflow" => suggestion_for(&EngineError::ExponentialOverflow),
            "operation resulted in non-finite number" => {
                suggestion_for(&EngineError::NonFiniteResult)
            }
            "Base value cannot be zero" => suggestion_for(&EngineError::ZeroBase),
            "Target value cannot be zero" => suggestion_for(&EngineError::ZeroTarget),
            _ => GENERIC_SUGGESTION,
        }
    }
}

/// User-facing failure description returned across the dashboard boundary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    /// Stable taxonomy label (e.g. `DivisionByZero`, `NonFiniteResult`).
    pub kind: &'static str,
    /// User-visible message, rendered verbatim.
    pub message: String,
    /// One-line remediation hint.
    pub suggestion: &'static str,
}

impl From<&EngineError> for Diagnostic {
    fn from(error: &EngineError) -> Self {
        Self {
            kind: error.kind_label(),
            message: error.to_string(),
            suggestion: suggestion_for(error),
        }
    }
}

/// Result of applying an operation sequence, with rollback on failure.
///
/// On success `value` is the folded result; on failure it reverts to the
/// caller's original base value so no partially-transformed number is ever
/// surfaced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaledValue {
    pub value: Real,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<Diagnostic>,
}

impl ScaledValue {
    pub fn is_error(&self) -> bool {
        self.diagnostic.is_some()
    }
}

/// Result of back-calculating a scaling factor.
///
/// On failure `factor` defaults to `1.0` (the multiplicative identity the
/// form falls back to).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorValue {
    pub factor: Real,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<Diagnostic>,
}

impl FactorValue {
    pub fn is_error(&self) -> bool {
        self.diagnostic.is_some()
    }
}
