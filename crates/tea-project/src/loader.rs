//! Scenario file loading.

use crate::error::{ProjectError, ProjectResult};
use crate::schema::Scenario;
use std::fs;
use std::path::Path;

/// Loads a scenario from a YAML (`.yaml`/`.yml`) or JSON (`.json`) file.
pub fn load_scenario(path: &Path) -> ProjectResult<Scenario> {
    let contents = fs::read_to_string(path)?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("yaml") | Some("yml") => Ok(serde_yaml::from_str(&contents)?),
        Some("json") => Ok(serde_json::from_str(&contents)?),
        _ => Err(ProjectError::UnsupportedExtension {
            path: path.display().to_string(),
        }),
    }
}

/// Saves a scenario as YAML.
pub fn save_scenario(path: &Path, scenario: &Scenario) -> ProjectResult<()> {
    let yaml = serde_yaml::to_string(scenario)?;
    fs::write(path, yaml)?;
    Ok(())
}
