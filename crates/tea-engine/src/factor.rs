//! Scaling factor back-calculation.
//!
//! Given a base value, a target value and an operation kind, computes the
//! operand that carries base to target under the forward rules in
//! [`crate::ops`]. Each rule is the algebraic inverse of its forward
//! counterpart; preconditions guard the divisions and logarithms the
//! inversions introduce.

use crate::error::{EngineError, EngineResult};
use crate::ops::OperationKind;
use crate::suggest::{Diagnostic, FactorValue};
use tea_core::Real;

/// Computes the operand that transforms `base_value` into `target_value`
/// when applied with `kind`.
///
/// Inversion rules:
///
/// | kind | factor |
/// |---|---|
/// | multiply | target / base |
/// | add | target - base |
/// | divide | base / target |
/// | subtract | base - target |
/// | power | ln(target) / ln(base) |
/// | log | ln(target) / ln(base) |
/// | exponential | ln(target) / ln(e) / ln(base) |
///
/// `expression`, `pass` and the parenthesis markers have no inverse and fail
/// with `UnsupportedOperation`.
pub fn scaling_factor(
    base_value: Real,
    target_value: Real,
    kind: OperationKind,
) -> EngineResult<Real> {
    let factor = match kind {
        OperationKind::Multiply => {
            if base_value == 0.0 {
                return Err(EngineError::ZeroBase);
            }
            target_value / base_value
        }
        OperationKind::Add => target_value - base_value,
        OperationKind::Divide => {
            if target_value == 0.0 {
                return Err(EngineError::ZeroTarget);
            }
            base_value / target_value
        }
        OperationKind::Subtract => base_value - target_value,
        OperationKind::Power => {
            if base_value <= 0.0 {
                return Err(EngineError::NonPositiveLogarithm);
            }
            target_value.ln() / base_value.ln()
        }
        OperationKind::Log => {
            if base_value <= 0.0 || target_value <= 0.0 {
                return Err(EngineError::NonPositiveLogarithm);
            }
            target_value.ln() / base_value.ln()
        }
        OperationKind::Exponential => {
            if base_value <= 0.0 {
                return Err(EngineError::NonPositiveLogarithm);
            }
            target_value.ln() / std::f64::consts::E.ln() / base_value.ln()
        }
        OperationKind::Expression
        | OperationKind::Pass
        | OperationKind::OpenParen
        | OperationKind::CloseParen => {
            return Err(EngineError::UnsupportedOperation { kind });
        }
    };

    // Degenerate inversions (base of 1, negative target under a log) fall
    // out as NaN or infinity rather than a precondition hit.
    if factor.is_finite() {
        Ok(factor)
    } else {
        Err(EngineError::NonFiniteResult)
    }
}

/// Boundary shape for the dashboard: on failure the factor defaults to `1.0`
/// and the diagnostic carries message and suggestion.
pub fn scaling_factor_with_default(
    base_value: Real,
    target_value: Real,
    kind: OperationKind,
) -> FactorValue {
    match scaling_factor(base_value, target_value, kind) {
        Ok(factor) => FactorValue {
            factor,
            diagnostic: None,
        },
        Err(error) => FactorValue {
            factor: 1.0,
            diagnostic: Some(Diagnostic::from(&error)),
        },
    }
}
