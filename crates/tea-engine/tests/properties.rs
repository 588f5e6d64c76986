//! Algebraic properties of the applier and the factor calculator.

use proptest::prelude::*;
use std::collections::HashMap;
use tea_core::{Tolerances, nearly_equal};
use tea_engine::{Operation, OperationKind, apply_operations, scaling_factor};

fn no_vars() -> HashMap<String, f64> {
    HashMap::new()
}

fn tol() -> Tolerances {
    Tolerances {
        abs: 1e-9,
        rel: 1e-9,
    }
}

proptest! {
    #[test]
    fn multiply_applies_the_factor(x in -1e6_f64..1e6, f in 0.01_f64..1e4) {
        let result = apply_operations(x, &[Operation::Multiply { factor: f }], &no_vars()).unwrap();
        prop_assert!(nearly_equal(result, x * f, tol()));
    }

    #[test]
    fn multiply_then_divide_round_trips(x in -1e6_f64..1e6, f in 0.01_f64..1e4) {
        let ops = [
            Operation::Multiply { factor: f },
            Operation::Divide { divisor: f },
        ];
        let result = apply_operations(x, &ops, &no_vars()).unwrap();
        prop_assert!(nearly_equal(result, x, tol()));
    }

    #[test]
    fn add_then_subtract_round_trips(x in -1e6_f64..1e6, a in -1e6_f64..1e6) {
        let ops = [
            Operation::Add { amount: a },
            Operation::Subtract { amount: a },
        ];
        let result = apply_operations(x, &ops, &no_vars()).unwrap();
        prop_assert!(nearly_equal(result, x, tol()));
    }

    #[test]
    fn multiply_factor_carries_base_to_target(
        base in -1e6_f64..1e6,
        target in -1e6_f64..1e6,
    ) {
        prop_assume!(base.abs() > 1e-6);
        let factor = scaling_factor(base, target, OperationKind::Multiply).unwrap();
        let result =
            apply_operations(base, &[Operation::Multiply { factor }], &no_vars()).unwrap();
        prop_assert!(nearly_equal(result, target, tol()));
    }

    #[test]
    fn add_factor_carries_base_to_target(
        base in -1e6_f64..1e6,
        target in -1e6_f64..1e6,
    ) {
        let factor = scaling_factor(base, target, OperationKind::Add).unwrap();
        let result = apply_operations(base, &[Operation::Add { amount: factor }], &no_vars()).unwrap();
        prop_assert!(nearly_equal(result, target, tol()));
    }

    #[test]
    fn power_factor_carries_base_to_target(
        base in 1.1_f64..100.0,
        target in 0.1_f64..1e6,
    ) {
        let factor = scaling_factor(base, target, OperationKind::Power).unwrap();
        let result =
            apply_operations(base, &[Operation::Power { exponent: factor }], &no_vars()).unwrap();
        prop_assert!(nearly_equal(result, target, tol()));
    }

    #[test]
    fn exponential_factor_carries_base_to_target(
        base in 1.1_f64..100.0,
        target in 0.1_f64..1e6,
    ) {
        let factor = scaling_factor(base, target, OperationKind::Exponential).unwrap();
        let result = apply_operations(
            base,
            &[Operation::Exponential { exponent: factor }],
            &no_vars(),
        )
        .unwrap();
        prop_assert!(nearly_equal(result, target, tol()));
    }

    #[test]
    fn expression_step_agrees_with_typed_multiply(x in -1e3_f64..1e3, f in 0.1_f64..100.0) {
        let typed =
            apply_operations(x, &[Operation::Multiply { factor: f }], &no_vars()).unwrap();
        let mut vars = HashMap::new();
        vars.insert("f".to_string(), f);
        let via_expr = apply_operations(
            x,
            &[Operation::Expression {
                expr: "current * f".to_string(),
            }],
            &vars,
        )
        .unwrap();
        prop_assert!(nearly_equal(typed, via_expr, tol()));
    }

    #[test]
    fn noops_never_change_the_result(x in -1e6_f64..1e6, f in 0.01_f64..1e4) {
        let plain = apply_operations(x, &[Operation::Multiply { factor: f }], &no_vars()).unwrap();
        let padded = apply_operations(
            x,
            &[
                Operation::OpenParen,
                Operation::Pass,
                Operation::Multiply { factor: f },
                Operation::CloseParen,
            ],
            &no_vars(),
        )
        .unwrap();
        prop_assert_eq!(plain, padded);
    }
}
