//! Typed scaling operations and the sequential applier.
//!
//! An operation sequence is folded over a starting value strictly left to
//! right; order in the sequence is the evaluation order and no
//! operator-precedence reordering happens across steps. The fold stops at the
//! first failing step; the boundary type then reverts to the caller's
//! original base value so no partially-transformed number escapes.

use crate::error::{EngineError, EngineResult};
use crate::expr::evaluate_expression;
use crate::suggest::{Diagnostic, ScaledValue};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tea_core::Real;

/// A single typed transformation step in a scaling sequence.
///
/// Closed sum type over operation kinds, each variant carrying its operand.
/// The serde representation is internally tagged so scenario files read as
/// `{ kind: multiply, factor: 2.0 }`.
///
/// `Pass`, `OpenParen` and `CloseParen` carry no operand and are no-ops at
/// evaluation time. The parentheses exist so a form UI can render a readable
/// sequence; grouping never reorders evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Operation {
    Multiply { factor: Real },
    Divide { divisor: Real },
    Add { amount: Real },
    Subtract { amount: Real },
    /// Accumulator raised to `exponent`.
    Power { exponent: Real },
    /// `ln(accumulator) * multiplier`.
    Log { multiplier: Real },
    /// `exp(ln(accumulator) * exponent)`, i.e. accumulator^exponent via logs.
    Exponential { exponent: Real },
    /// Free-form expression; the running value is available as `current`.
    Expression { expr: String },
    Pass,
    OpenParen,
    CloseParen,
}

impl Operation {
    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::Multiply { .. } => OperationKind::Multiply,
            Operation::Divide { .. } => OperationKind::Divide,
            Operation::Add { .. } => OperationKind::Add,
            Operation::Subtract { .. } => OperationKind::Subtract,
            Operation::Power { .. } => OperationKind::Power,
            Operation::Log { .. } => OperationKind::Log,
            Operation::Exponential { .. } => OperationKind::Exponential,
            Operation::Expression { .. } => OperationKind::Expression,
            Operation::Pass => OperationKind::Pass,
            Operation::OpenParen => OperationKind::OpenParen,
            Operation::CloseParen => OperationKind::CloseParen,
        }
    }

    /// True for steps that leave the accumulator untouched.
    pub fn is_noop(&self) -> bool {
        matches!(
            self,
            Operation::Pass | Operation::OpenParen | Operation::CloseParen
        )
    }
}

/// Operation kind without its operand, for dispatch and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationKind {
    Multiply,
    Divide,
    Add,
    Subtract,
    Power,
    Log,
    Exponential,
    Expression,
    Pass,
    OpenParen,
    CloseParen,
}

impl OperationKind {
    /// Short symbol the form UI renders for this kind.
    pub fn symbol(self) -> &'static str {
        match self {
            OperationKind::Multiply => "*",
            OperationKind::Divide => "/",
            OperationKind::Add => "+",
            OperationKind::Subtract => "-",
            OperationKind::Power => "^",
            OperationKind::Log => "log",
            OperationKind::Exponential => "exp",
            OperationKind::Expression => "f(x)",
            OperationKind::Pass => "=",
            OperationKind::OpenParen => "(",
            OperationKind::CloseParen => ")",
        }
    }

    fn tag(self) -> &'static str {
        match self {
            OperationKind::Multiply => "multiply",
            OperationKind::Divide => "divide",
            OperationKind::Add => "add",
            OperationKind::Subtract => "subtract",
            OperationKind::Power => "power",
            OperationKind::Log => "log",
            OperationKind::Exponential => "exponential",
            OperationKind::Expression => "expression",
            OperationKind::Pass => "pass",
            OperationKind::OpenParen => "openParen",
            OperationKind::CloseParen => "closeParen",
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

impl std::str::FromStr for OperationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "multiply" => Ok(OperationKind::Multiply),
            "divide" => Ok(OperationKind::Divide),
            "add" => Ok(OperationKind::Add),
            "subtract" => Ok(OperationKind::Subtract),
            "power" => Ok(OperationKind::Power),
            "log" => Ok(OperationKind::Log),
            "exponential" => Ok(OperationKind::Exponential),
            "expression" => Ok(OperationKind::Expression),
            "pass" => Ok(OperationKind::Pass),
            "openParen" => Ok(OperationKind::OpenParen),
            "closeParen" => Ok(OperationKind::CloseParen),
            _ => Err(format!("unknown operation kind: {s}")),
        }
    }
}

/// Folds an operation sequence over `base_value`, left to right.
///
/// Stops at the first failing step. `context` supplies the named variables
/// visible to `expression` steps; the running accumulator is injected under
/// the name `current` before each expression is evaluated.
pub fn apply_operations(
    base_value: Real,
    operations: &[Operation],
    context: &HashMap<String, Real>,
) -> EngineResult<Real> {
    let mut acc = base_value;

    for op in operations {
        match op {
            Operation::Multiply { factor } => acc *= factor,
            Operation::Divide { divisor } => {
                if *divisor == 0.0 {
                    return Err(EngineError::DivisionByZero);
                }
                acc /= divisor;
            }
            Operation::Add { amount } => acc += amount,
            Operation::Subtract { amount } => acc -= amount,
            Operation::Power { exponent } => {
                acc = acc.powf(*exponent);
                if !acc.is_finite() {
                    return Err(EngineError::PowerNonFinite);
                }
            }
            Operation::Log { multiplier } => {
                if acc <= 0.0 {
                    return Err(EngineError::NonPositiveLogarithm);
                }
                acc = acc.ln() * multiplier;
            }
            Operation::Exponential { exponent } => {
                // ln of a non-positive accumulator is NaN and lands in the
                // overflow arm below, same as the overflow case.
                acc = (acc.ln() * exponent).exp();
                if !acc.is_finite() {
                    return Err(EngineError::ExponentialOverflow);
                }
            }
            Operation::Expression { expr } => {
                let mut variables = context.clone();
                variables.insert("current".to_string(), acc);
                acc = evaluate_expression(expr, &variables)?;
            }
            Operation::Pass | Operation::OpenParen | Operation::CloseParen => continue,
        }

        if !acc.is_finite() {
            return Err(EngineError::NonFiniteResult);
        }
    }

    Ok(acc)
}

/// Applies a sequence and converts the outcome to the dashboard boundary
/// shape: on any failure the returned value reverts to `base_value` and the
/// diagnostic carries message and suggestion. Partial progress is discarded.
pub fn apply_with_rollback(
    base_value: Real,
    operations: &[Operation],
    context: &HashMap<String, Real>,
) -> ScaledValue {
    match apply_operations(base_value, operations, context) {
        Ok(value) => ScaledValue {
            value,
            diagnostic: None,
        },
        Err(error) => ScaledValue {
            value: base_value,
            diagnostic: Some(Diagnostic::from(&error)),
        },
    }
}
