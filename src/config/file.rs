//! Configuration file loading and discovery.
//!
//! Supports loading configuration from YAML files with automatic discovery.

use super::types::{AppConfig, ConfigOverrides};
use std::path::{Path, PathBuf};
use thiserror::Error;

// ============================================================================
// Configuration File Discovery
// ============================================================================

/// Standard config file names to search for.
const CONFIG_FILE_NAMES: &[&str] = &[
    ".sbom-consistency.yaml",
    ".sbom-consistency.yml",
    "sbom-consistency.yaml",
    "sbom-consistency.yml",
];

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Current directory
/// 3. User config directory (~/.config/sbom-consistency/)
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return Some(path.to_path_buf());
    }

    if let Ok(cwd) = std::env::current_dir()
        && let Some(path) = find_config_in_dir(&cwd)
    {
        return Some(path);
    }

    dirs::config_dir().and_then(|dir| find_config_in_dir(&dir.join("sbom-consistency")))
}

/// Find a config file in a specific directory.
fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

// ============================================================================
// Configuration File Loading
// ============================================================================

/// Error type for config file operations.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// File not found
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// IO error reading file
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// YAML parsing error
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Load an `AppConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = serde_yaml::from_str(&content)?;
    Ok(config)
}

/// Load the discovered config file, or defaults when none exists.
///
/// An explicitly requested file that cannot be loaded is an error; a
/// discovered one falls back to defaults with a warning.
pub fn load_or_default(
    explicit_path: Option<&Path>,
) -> Result<(AppConfig, Option<PathBuf>), ConfigFileError> {
    let Some(path) = discover_config_file(explicit_path) else {
        return Ok((AppConfig::default(), None));
    };
    match load_config_file(&path) {
        Ok(config) => Ok((config, Some(path))),
        Err(e) if explicit_path.is_some() => Err(e),
        Err(e) => {
            tracing::warn!("Failed to load config from {}: {}", path.display(), e);
            Ok((AppConfig::default(), None))
        }
    }
}

// ============================================================================
// Configuration Merging
// ============================================================================

impl AppConfig {
    /// Apply CLI overrides; set flags win over file values.
    pub fn merge(&mut self, overrides: &ConfigOverrides) {
        if let Some(max_files) = overrides.max_files {
            self.matching.max_files = max_files;
        }
        if let Some(policy) = overrides.aggregation {
            self.matching.aggregation = policy;
        }
        if let Some(mode) = overrides.version_ranges {
            self.matching.version_ranges = mode;
        }
        if overrides.sequential {
            self.batch.parallel = false;
        }
    }
}

// ============================================================================
// Example Config Generation
// ============================================================================

/// Generate a commented example config with all options.
#[must_use]
pub fn generate_example_config() -> String {
    r"# SBOM Consistency Configuration
# Place this file at .sbom-consistency.yaml in the working directory
# or at ~/.config/sbom-consistency/sbom-consistency.yaml.
#
# CLI arguments always override file settings.

matching:
  # Skip file matching when either document lists more files than this
  max_files: 2000
  # How fields absent on both sides enter the means: absolute, exclude
  aggregation: absolute
  # Version strings with range operators: legacy, semver
  version_ranges: legacy

batch:
  # Tools compared pairwise, per standard
  spdx_tools: [syft, gh-sbom, sbom-tool, ort]
  cdx_tools: [syft, gh-sbom, scancode, cdxgen]
  # Evaluate comparisons in parallel
  parallel: true
"
    .to_string()
}

// ============================================================================
// Tests
// ============================================================================
