use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tea_core::{CoreError, ensure_finite};
use tea_engine::{
    Diagnostic, EngineError, OperationKind, evaluate_expression, scaling_factor_with_default,
};
use tea_project::{ProjectError, apply_scenario, load_scenario, validate_scenario};

#[derive(Parser)]
#[command(name = "tea-cli")]
#[command(about = "teascale CLI - scenario scaling and expression tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate scenario file syntax and structure
    Validate {
        /// Path to the scenario YAML/JSON file
        scenario_path: PathBuf,
    },
    /// Apply every parameter's operation sequence in a scenario
    Apply {
        /// Path to the scenario YAML/JSON file
        scenario_path: PathBuf,
        /// Output CSV file path (optional, defaults to stdout table)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Evaluate a single expression
    Eval {
        /// Expression string, e.g. "2 + x * 3"
        expression: String,
        /// Variable bindings, e.g. --var x=4.0 (repeatable)
        #[arg(long = "var", value_name = "NAME=VALUE")]
        vars: Vec<String>,
    },
    /// Back-calculate the operand that carries a base value to a target
    Factor {
        /// Base value
        base: f64,
        /// Target value
        target: f64,
        /// Operation kind (multiply, divide, add, subtract, power, log, exponential)
        operation: OperationKind,
    },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Project(#[from] ProjectError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Invalid variable binding '{binding}', expected NAME=VALUE")]
    BadBinding { binding: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn main() -> Result<(), CliError> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { scenario_path } => cmd_validate(&scenario_path),
        Commands::Apply {
            scenario_path,
            output,
        } => cmd_apply(&scenario_path, output.as_deref()),
        Commands::Eval { expression, vars } => cmd_eval(&expression, &vars),
        Commands::Factor {
            base,
            target,
            operation,
        } => cmd_factor(base, target, operation),
    }
}

fn cmd_validate(scenario_path: &Path) -> Result<(), CliError> {
    println!("Validating scenario: {}", scenario_path.display());
    let scenario = load_scenario(scenario_path)?;
    validate_scenario(&scenario).map_err(ProjectError::from)?;
    println!(
        "✓ Scenario is valid ({} parameter(s))",
        scenario.parameters.len()
    );
    Ok(())
}

fn cmd_apply(scenario_path: &Path, output: Option<&Path>) -> Result<(), CliError> {
    let scenario = load_scenario(scenario_path)?;
    validate_scenario(&scenario).map_err(ProjectError::from)?;

    let results = apply_scenario(&scenario);

    if let Some(path) = output {
        // Build CSV
        let mut csv = String::from("id,name,base_value,value,error\n");
        for r in &results {
            let error = r
                .scaled
                .diagnostic
                .as_ref()
                .map(|d| d.message.as_str())
                .unwrap_or("");
            csv.push_str(&format!(
                "{},{},{},{},{}\n",
                r.id, r.name, r.base_value, r.scaled.value, error
            ));
        }
        std::fs::write(path, csv)?;
        println!("✓ Exported {} parameter(s) to {}", results.len(), path.display());
    } else {
        println!("Scenario '{}':", scenario.name);
        for r in &results {
            match &r.scaled.diagnostic {
                None => println!("  {}: {} -> {}", r.id, r.base_value, r.scaled.value),
                Some(diag) => {
                    println!("  {}: {} (unchanged) - {}", r.id, r.base_value, diag.message);
                    println!("    hint: {}", diag.suggestion);
                }
            }
        }
    }

    let failures = results.iter().filter(|r| r.scaled.is_error()).count();
    if failures > 0 {
        println!("{failures} parameter(s) failed and kept their base value");
    }
    Ok(())
}

fn cmd_eval(expression: &str, bindings: &[String]) -> Result<(), CliError> {
    let variables = parse_bindings(bindings)?;

    match evaluate_expression(expression, &variables) {
        Ok(value) => {
            println!("{value}");
            Ok(())
        }
        Err(error) => {
            // The message itself comes out of main's error display
            eprintln!("hint: {}", Diagnostic::from(&error).suggestion);
            Err(error.into())
        }
    }
}

fn cmd_factor(base: f64, target: f64, operation: OperationKind) -> Result<(), CliError> {
    // clap parses "inf" and "nan" as valid f64s; reject them up front
    ensure_finite(base, "base")?;
    ensure_finite(target, "target")?;

    let out = scaling_factor_with_default(base, target, operation);
    match out.diagnostic {
        None => {
            println!("{}", out.factor);
            Ok(())
        }
        Some(diag) => {
            eprintln!("{}", diag.message);
            eprintln!("hint: {}", diag.suggestion);
            // Factor defaults to 1 on failure; surface it for form parity
            println!("{}", out.factor);
            Ok(())
        }
    }
}

fn parse_bindings(bindings: &[String]) -> Result<HashMap<String, f64>, CliError> {
    let mut variables = HashMap::new();
    for binding in bindings {
        let (name, value) = binding.split_once('=').ok_or_else(|| CliError::BadBinding {
            binding: binding.clone(),
        })?;
        let value: f64 = value.trim().parse().map_err(|_| CliError::BadBinding {
            binding: binding.clone(),
        })?;
        variables.insert(name.trim().to_string(), value);
    }
    Ok(variables)
}
