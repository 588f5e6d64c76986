//! Scenario validation logic.
//!
//! Catches the problems that are cheap to detect before any value is scaled:
//! version drift, duplicate parameter ids, non-finite base values, operation
//! operands that can never succeed, and expressions that do not parse.

use crate::schema::{LATEST_VERSION, ParameterDef, Scenario};
use std::collections::HashSet;
use tea_engine::Operation;
use tea_engine::expr::Parser;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },

    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid expression in {parameter}: {reason}")]
    InvalidExpression { parameter: String, reason: String },
}

pub fn validate_scenario(scenario: &Scenario) -> Result<(), ValidationError> {
    if scenario.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: scenario.version,
        });
    }

    let mut parameter_ids = HashSet::new();
    for param in &scenario.parameters {
        if !parameter_ids.insert(&param.id) {
            return Err(ValidationError::DuplicateId {
                id: param.id.clone(),
                context: "parameters".to_string(),
            });
        }
        validate_parameter(param)?;
    }

    Ok(())
}

fn validate_parameter(param: &ParameterDef) -> Result<(), ValidationError> {
    if param.id.is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "parameters.id".to_string(),
            value: String::new(),
            reason: "id must not be empty".to_string(),
        });
    }

    if !param.base_value.is_finite() {
        return Err(ValidationError::InvalidValue {
            field: format!("parameters.{}.base_value", param.id),
            value: param.base_value.to_string(),
            reason: "base value must be finite".to_string(),
        });
    }

    for def in &param.operations {
        match &def.0 {
            Operation::Divide { divisor } if *divisor == 0.0 => {
                return Err(ValidationError::InvalidValue {
                    field: format!("parameters.{}.operations", param.id),
                    value: "0".to_string(),
                    reason: "divide operand must be non-zero".to_string(),
                });
            }
            Operation::Expression { expr } => {
                // Parse only; identifiers are resolved at apply time against
                // the merged variable context.
                Parser::new(expr)
                    .and_then(|mut p| p.parse())
                    .map_err(|e| ValidationError::InvalidExpression {
                        parameter: param.id.clone(),
                        reason: e.to_string(),
                    })?;
            }
            _ => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::OperationDef;
    use std::collections::HashMap;

    fn parameter(id: &str, ops: Vec<Operation>) -> ParameterDef {
        ParameterDef {
            id: id.to_string(),
            name: id.to_string(),
            base_value: 100.0,
            unit: None,
            variables: HashMap::new(),
            operations: ops.into_iter().map(OperationDef::from).collect(),
        }
    }

    fn scenario(parameters: Vec<ParameterDef>) -> Scenario {
        Scenario {
            version: 1,
            name: "test".to_string(),
            variables: HashMap::new(),
            parameters,
        }
    }

    #[test]
    fn valid_scenario_passes() {
        let s = scenario(vec![
            parameter("a", vec![Operation::Multiply { factor: 2.0 }]),
            parameter(
                "b",
                vec![Operation::Expression {
                    expr: "current + 1".to_string(),
                }],
            ),
        ]);
        assert!(validate_scenario(&s).is_ok());
    }

    #[test]
    fn newer_version_is_rejected() {
        let mut s = scenario(vec![]);
        s.version = LATEST_VERSION + 1;
        assert!(matches!(
            validate_scenario(&s),
            Err(ValidationError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn duplicate_parameter_id_is_rejected() {
        let s = scenario(vec![parameter("a", vec![]), parameter("a", vec![])]);
        assert!(matches!(
            validate_scenario(&s),
            Err(ValidationError::DuplicateId { .. })
        ));
    }

    #[test]
    fn non_finite_base_value_is_rejected() {
        let mut p = parameter("a", vec![]);
        p.base_value = f64::NAN;
        assert!(matches!(
            validate_scenario(&scenario(vec![p])),
            Err(ValidationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn zero_divisor_is_flagged_early() {
        let s = scenario(vec![parameter("a", vec![Operation::Divide { divisor: 0.0 }])]);
        assert!(matches!(
            validate_scenario(&s),
            Err(ValidationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn unparseable_expression_is_flagged() {
        let s = scenario(vec![parameter(
            "a",
            vec![Operation::Expression {
                expr: "current +".to_string(),
            }],
        )]);
        assert!(matches!(
            validate_scenario(&s),
            Err(ValidationError::InvalidExpression { .. })
        ));
    }
}
