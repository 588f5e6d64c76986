//! tea-project: scenario file schema, validation and batch application.
//!
//! A scenario is a versioned batch of parameter definitions, each carrying a
//! base value and the operation sequence the engine applies to it. Files are
//! YAML or JSON on disk; the form UI and the CLI share this crate.

pub mod error;
pub mod loader;
pub mod run;
pub mod schema;
pub mod validate;

pub use error::{ProjectError, ProjectResult};
pub use loader::{load_scenario, save_scenario};
pub use run::{ParameterResult, apply_scenario};
pub use schema::{LATEST_VERSION, OperationDef, ParameterDef, Scenario};
pub use validate::{ValidationError, validate_scenario};
