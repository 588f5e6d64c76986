//! Batch application of a scenario's parameter sequences.

use crate::schema::Scenario;
use serde::Serialize;
use tea_core::Real;
use tea_engine::{ScaledValue, apply_with_rollback};

/// Outcome of scaling one parameter of a scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterResult {
    pub id: String,
    pub name: String,
    pub base_value: Real,
    #[serde(flatten)]
    pub scaled: ScaledValue,
}

/// Applies every parameter's operation sequence.
///
/// Failures are per-parameter: one parameter's diagnostic never blocks the
/// rest of the batch, and its value reverts to its own base.
pub fn apply_scenario(scenario: &Scenario) -> Vec<ParameterResult> {
    scenario
        .parameters
        .iter()
        .map(|param| {
            let context = param.context(&scenario.variables);
            let operations = param.operations();
            let scaled = apply_with_rollback(param.base_value, &operations, &context);
            if let Some(diag) = &scaled.diagnostic {
                tracing::warn!(
                    parameter = %param.id,
                    message = %diag.message,
                    "parameter scaling failed; value reverted to base"
                );
            }
            ParameterResult {
                id: param.id.clone(),
                name: param.name.clone(),
                base_value: param.base_value,
                scaled,
            }
        })
        .collect()
}
