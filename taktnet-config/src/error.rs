//! Error types for scenario loading and validation

use std::path::PathBuf;
use thiserror::Error;
use validator::ValidationErrors;

/// Unified scenario configuration error type.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Scenario file not found.
    #[error("Scenario file not found: {0}")]
    FileNotFound(PathBuf),

    /// Scenario validation error.
    #[error("Invalid scenario:\n{}", format_validation_errors(.0))]
    Validation(#[source] ValidationErrors),

    /// Figment parsing error.
    #[error("Scenario parsing error: {0}")]
    Parsing(#[from] figment::Error),

    /// YAML serialization error.
    #[error("Scenario serialization error: {0}")]
    Serialize(#[from] serde_yaml::Error),

    /// I/O error.
    #[error("Scenario I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut lines = Vec::new();
    for (field, errors) in errors.field_errors() {
        for error in errors {
            let message = error
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| error.code.to_string());
            lines.push(format!("  {}: {}", field, message));
        }
    }
    lines.join("\n")
}

impl From<ValidationErrors> for ConfigError {
    fn from(errors: ValidationErrors) -> Self {
        ConfigError::Validation(errors)
    }
}
