use std::collections::HashMap;
use tea_engine::Operation;
use tea_project::*;

fn sample_scenario() -> Scenario {
    Scenario {
        version: 1,
        name: "hydrogen-plant".to_string(),
        variables: HashMap::from([("capacity_factor".to_string(), 0.95)]),
        parameters: vec![ParameterDef {
            id: "electrolyzer_capex".to_string(),
            name: "Electrolyzer CAPEX".to_string(),
            base_value: 1500.0,
            unit: Some("USD/kW".to_string()),
            variables: HashMap::new(),
            operations: vec![
                OperationDef::from(Operation::Multiply { factor: 0.8 }),
                OperationDef::from(Operation::Expression {
                    expr: "current * capacity_factor".to_string(),
                }),
            ],
        }],
    }
}

#[test]
fn save_load_validate_apply() {
    let temp_dir = std::env::temp_dir().join("tea_project_test");
    let _ = std::fs::remove_dir_all(&temp_dir);
    std::fs::create_dir_all(&temp_dir).unwrap();

    let path = temp_dir.join("scenario.yaml");
    let scenario = sample_scenario();
    save_scenario(&path, &scenario).unwrap();

    let loaded = load_scenario(&path).unwrap();
    assert_eq!(loaded, scenario);

    validate_scenario(&loaded).unwrap();

    let results = apply_scenario(&loaded);
    assert_eq!(results.len(), 1);
    assert!(!results[0].scaled.is_error());
    assert!((results[0].scaled.value - 1500.0 * 0.8 * 0.95).abs() < 1e-9);
}

#[test]
fn json_scenario_loads_too() {
    let temp_dir = std::env::temp_dir().join("tea_project_test_json");
    let _ = std::fs::remove_dir_all(&temp_dir);
    std::fs::create_dir_all(&temp_dir).unwrap();

    let path = temp_dir.join("scenario.json");
    let json = serde_json::to_string(&sample_scenario()).unwrap();
    std::fs::write(&path, json).unwrap();

    let loaded = load_scenario(&path).unwrap();
    assert_eq!(loaded.name, "hydrogen-plant");
}

#[test]
fn unknown_extension_is_rejected() {
    let temp_dir = std::env::temp_dir().join("tea_project_test_ext");
    let _ = std::fs::remove_dir_all(&temp_dir);
    std::fs::create_dir_all(&temp_dir).unwrap();

    let path = temp_dir.join("scenario.toml");
    std::fs::write(&path, "version = 1").unwrap();

    assert!(matches!(
        load_scenario(&path),
        Err(ProjectError::UnsupportedExtension { .. })
    ));
}

#[test]
fn unknown_operation_kind_survives_load_as_pass() {
    let temp_dir = std::env::temp_dir().join("tea_project_test_unknown");
    let _ = std::fs::remove_dir_all(&temp_dir);
    std::fs::create_dir_all(&temp_dir).unwrap();

    let yaml = r#"
version: 1
name: quirk
parameters:
  - id: p
    name: P
    base_value: 10.0
    operations:
      - kind: modulo
        operand: 3.0
      - kind: multiply
        factor: 2.0
"#;
    let path = temp_dir.join("scenario.yaml");
    std::fs::write(&path, yaml).unwrap();

    let loaded = load_scenario(&path).unwrap();
    let results = apply_scenario(&loaded);
    // The unknown 'modulo' step is a pass-through; only the multiply applies.
    assert_eq!(results[0].scaled.value, 20.0);
}
