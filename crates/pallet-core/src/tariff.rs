use crate::types::{OptimizerError, Result, Tariff};
use std::path::Path;

impl Tariff {
    /// Loads a tariff file; `.yaml` and `.yml` are read as YAML, anything else as JSON.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|err| OptimizerError::Config(format!("{}: {}", path.display(), err)))?;

        let is_yaml = matches!(
            path.extension().and_then(|s| s.to_str()),
            Some("yaml") | Some("yml")
        );
        if is_yaml {
            Self::from_yaml(&content)
        } else {
            Self::from_json(&content)
        }
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|err| OptimizerError::Config(err.to_string()))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|err| OptimizerError::Config(err.to_string()))
    }
}
