//! Scenario file schema definitions.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use tea_core::Real;
use tea_engine::{Operation, OperationKind};

/// Latest scenario document version this build understands.
pub const LATEST_VERSION: u32 = 1;

/// A versioned batch of scenario parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    pub version: u32,
    pub name: String,
    /// Variables visible to every parameter's expression steps.
    #[serde(default)]
    pub variables: HashMap<String, Real>,
    #[serde(default)]
    pub parameters: Vec<ParameterDef>,
}

/// One form parameter: a base value plus the operation sequence to apply.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParameterDef {
    pub id: String,
    pub name: String,
    pub base_value: Real,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Parameter-local variables; shadow scenario-level ones on name clash.
    #[serde(default)]
    pub variables: HashMap<String, Real>,
    #[serde(default)]
    pub operations: Vec<OperationDef>,
}

impl ParameterDef {
    /// Merged expression context for this parameter (scenario variables
    /// overlaid with parameter-local ones).
    pub fn context(&self, scenario_vars: &HashMap<String, Real>) -> HashMap<String, Real> {
        let mut ctx = scenario_vars.clone();
        ctx.extend(self.variables.iter().map(|(k, v)| (k.clone(), *v)));
        ctx
    }

    /// The operation sequence as engine operations.
    pub fn operations(&self) -> Vec<Operation> {
        self.operations.iter().map(|def| def.0.clone()).collect()
    }
}

/// An operation as written in a scenario file.
///
/// Wraps [`Operation`] to keep the historical permissive default: an entry
/// whose `kind` tag is not a known operation deserializes to `Pass` (with a
/// warning) instead of rejecting the whole file. Known kinds with malformed
/// operands still error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct OperationDef(pub Operation);

impl From<Operation> for OperationDef {
    fn from(op: Operation) -> Self {
        OperationDef(op)
    }
}

impl<'de> Deserialize<'de> for OperationDef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        let kind = value
            .get("kind")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| D::Error::custom("operation entry is missing a 'kind' tag"))?;

        if kind.parse::<OperationKind>().is_ok() {
            Operation::deserialize(&value)
                .map(OperationDef)
                .map_err(D::Error::custom)
        } else {
            tracing::warn!(kind, "unknown operation kind in scenario; treating as pass");
            Ok(OperationDef(Operation::Pass))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_parses_from_yaml() {
        let yaml = r#"
version: 1
name: electrolyzer-capex
variables:
  learning_rate: 0.85
parameters:
  - id: stack_cost
    name: Stack cost
    base_value: 1200.0
    unit: USD/kW
    operations:
      - kind: multiply
        factor: 0.9
      - kind: expression
        expr: current * learning_rate
"#;
        let scenario: Scenario = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(scenario.version, 1);
        assert_eq!(scenario.parameters.len(), 1);

        let param = &scenario.parameters[0];
        assert_eq!(param.base_value, 1200.0);
        assert_eq!(
            param.operations[0].0,
            Operation::Multiply { factor: 0.9 }
        );

        let ctx = param.context(&scenario.variables);
        assert_eq!(ctx.get("learning_rate"), Some(&0.85));
    }

    #[test]
    fn parameter_variables_shadow_scenario_variables() {
        let mut scenario_vars = HashMap::new();
        scenario_vars.insert("rate".to_string(), 1.0);

        let param = ParameterDef {
            id: "p".to_string(),
            name: "p".to_string(),
            base_value: 1.0,
            unit: None,
            variables: HashMap::from([("rate".to_string(), 2.0)]),
            operations: vec![],
        };
        assert_eq!(param.context(&scenario_vars).get("rate"), Some(&2.0));
    }

    #[test]
    fn operation_unknown_kind_is_noop() {
        // Historical quirk, kept on purpose: an unknown kind is accepted and
        // applied as a pass-through rather than rejecting the scenario.
        let def: OperationDef = serde_json::from_str(r#"{"kind": "frobnicate", "factor": 2.0}"#)
            .unwrap();
        assert_eq!(def.0, Operation::Pass);
    }

    #[test]
    fn operation_missing_kind_is_rejected() {
        let result: Result<OperationDef, _> = serde_json::from_str(r#"{"factor": 2.0}"#);
        assert!(result.is_err());
    }

    #[test]
    fn known_kind_with_bad_operand_is_rejected() {
        let result: Result<OperationDef, _> = serde_json::from_str(r#"{"kind": "multiply"}"#);
        assert!(result.is_err());
    }
}
