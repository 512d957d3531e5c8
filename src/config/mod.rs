//! Configuration module for sbom-consistency.
//!
//! - Type-safe configuration structures with defaults
//! - Validation through the [`Validatable`] trait
//! - YAML config file loading and discovery
//! - CLI override merging
//!
//! # Configuration File
//!
//! Place a `.sbom-consistency.yaml` file in the working directory or
//! `~/.config/sbom-consistency/`:
//!
//! ```yaml
//! matching:
//!   max_files: 5000
//!   aggregation: exclude
//! batch:
//!   parallel: false
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

pub use defaults::{DEFAULT_CDX_TOOLS, DEFAULT_SPDX_TOOLS};
pub use file::{
    ConfigFileError, discover_config_file, generate_example_config, load_config_file,
    load_or_default,
};
pub use types::{AppConfig, AppConfigBuilder, BatchConfig, ConfigOverrides, MatchingConfig};
pub use validation::{ConfigError, Validatable};

/// Generate a JSON Schema for the `AppConfig` configuration format.
///
/// This schema documents all configuration options that can be set in
/// `.sbom-consistency.yaml` config files.
#[must_use]
pub fn generate_json_schema() -> String {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema).expect("schema serialization should not fail")
}
