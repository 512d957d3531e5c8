//! Configuration validation.

use super::types::{AppConfig, BatchConfig, MatchingConfig};
use crate::model::Standard;
use std::collections::HashSet;

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.matching.validate());
        errors.extend(self.batch.validate());
        errors
    }
}

impl Validatable for MatchingConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.max_files == 0 {
            errors.push(ConfigError {
                field: "matching.max_files".to_string(),
                message: "File cap must be at least 1".to_string(),
            });
        }
        errors
    }
}

impl Validatable for BatchConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        for standard in Standard::all() {
            let field = format!("batch.{}_tools", standard.tag());
            let tools = self.tools_for(*standard);

            if tools.len() < 2 {
                errors.push(ConfigError {
                    field: field.clone(),
                    message: format!("At least two tools are needed, got {}", tools.len()),
                });
            }

            let mut seen = HashSet::new();
            for tool in tools {
                if tool.trim().is_empty() || tool.contains('#') {
                    errors.push(ConfigError {
                        field: field.clone(),
                        message: format!("Invalid tool name '{tool}' (empty or contains '#')"),
                    });
                }
                if !seen.insert(tool.as_str()) {
                    errors.push(ConfigError {
                        field: field.clone(),
                        message: format!("Duplicate tool '{tool}'"),
                    });
                }
            }
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AppConfig::default().is_valid());
    }

    #[test]
    fn test_zero_file_cap_rejected() {
        let config = AppConfig::builder().max_files(0).build();
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "matching.max_files");
    }

    #[test]
    fn test_tool_list_errors() {
        let config = AppConfig::builder()
            .tools(
                Standard::CycloneDx,
                vec!["syft".into(), "syft".into(), "a#b".into()],
            )
            .tools(Standard::Spdx, vec!["syft".into()])
            .build();
        let errors = config.validate();
        assert!(errors.iter().any(|e| e.message.contains("Duplicate tool 'syft'")));
        assert!(errors.iter().any(|e| e.message.contains("'a#b'")));
        assert!(errors.iter().any(|e| e.field == "batch.spdx_tools"));
    }
}
