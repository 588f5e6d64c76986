//! tea-engine: scaling/expression engine for techno-economic scenario forms.
//!
//! Transforms a base numeric value through an ordered sequence of typed
//! operations (multiply, divide, add, subtract, power, log, exponential,
//! free-form expression, pass-through, parenthesis markers), with per-step
//! error detection and factor back-calculation (given base and target, infer
//! the operand).
//!
//! # Architecture
//!
//! - [`expr`]: recursive-descent parser and evaluator for the restricted
//!   arithmetic grammar used by `expression` steps
//! - [`ops`]: the [`Operation`](ops::Operation) sum type and the strict
//!   left-fold applier with rollback-on-failure
//! - [`factor`]: per-kind inversion rules for target-value back-calculation
//! - [`suggest`]: error-to-remediation-hint mapping and boundary types
//!
//! # Design Principles
//!
//! - **Pure and synchronous**: every entry point is a pure function of its
//!   arguments; no I/O, no shared state, safe to call from concurrent form
//!   fields without coordination
//! - **No dynamic code evaluation**: expressions are parsed and walked, never
//!   handed to an interpreter
//! - **Rollback on failure**: a failed sequence returns the original base
//!   value, never a partially-transformed number

pub mod error;
pub mod expr;
pub mod factor;
pub mod ops;
pub mod suggest;

pub use error::{EngineError, EngineResult};
pub use expr::evaluate_expression;
pub use factor::{scaling_factor, scaling_factor_with_default};
pub use ops::{Operation, OperationKind, apply_operations, apply_with_rollback};
pub use suggest::{
    Diagnostic, FactorValue, GENERIC_SUGGESTION, ScaledValue, suggestion_for,
    suggestion_for_message,
};
