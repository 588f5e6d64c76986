//! Error types for scaling engine operations.

use crate::ops::OperationKind;
use thiserror::Error;

/// Result type for scaling engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors raised by expression evaluation, sequence application and factor
/// back-calculation.
///
/// All variants are non-fatal: the caller recovers by re-invoking with
/// corrected input. Display strings are user-visible and stable; the UI shows
/// them verbatim next to the input control.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    /// Expression failed to lex, parse, resolve or produce a finite number.
    #[error("invalid expression: {what}")]
    InvalidExpression { what: String },

    /// Divisor operand (or divisor inside an expression) is zero.
    #[error("division by zero")]
    DivisionByZero,

    /// Logarithm requested on a value <= 0.
    #[error("logarithm of non-positive number")]
    NonPositiveLogarithm,

    /// Power step left the accumulator NaN or infinite.
    #[error("power operation resulted in non-finite number")]
    PowerNonFinite,

    /// Exponential step left the accumulator NaN or infinite.
    #[error("exponential operation overflow")]
    ExponentialOverflow,

    /// A step produced NaN or infinity outside the power/exponential paths.
    #[error("operation resulted in non-finite number")]
    NonFiniteResult,

    /// Operation kind has no inverse rule for factor back-calculation.
    #[error("unsupported operation: {kind}")]
    UnsupportedOperation { kind: OperationKind },

    /// Base value is zero where the inversion divides by it.
    #[error("Base value cannot be zero")]
    ZeroBase,

    /// Target value is zero where the inversion divides by it.
    #[error("Target value cannot be zero")]
    ZeroTarget,
}

impl EngineError {
    /// Stable taxonomy label for the dashboard layer.
    pub fn kind_label(&self) -> &'static str {
        match self {
            EngineError::InvalidExpression { .. } => "InvalidExpression",
            EngineError::DivisionByZero => "DivisionByZero",
            EngineError::NonPositiveLogarithm => "NonPositiveLogarithmInput",
            EngineError::PowerNonFinite
            | EngineError::ExponentialOverflow
            | EngineError::NonFiniteResult => "NonFiniteResult",
            EngineError::UnsupportedOperation { .. } => "UnsupportedOperation",
            EngineError::ZeroBase | EngineError::ZeroTarget => "ZeroBaseOrTarget",
        }
    }
}
