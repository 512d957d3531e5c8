//! Configuration types for sbom-consistency runs.

use crate::aggregate::AggregationPolicy;
use crate::matching::{MatchingOptions, VersionRangeMode};
use crate::model::Standard;
use crate::pipeline::EvaluationOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Unified application configuration, loaded from a config file and
/// overridden by CLI flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Matching engine settings
    pub matching: MatchingConfig,
    /// Batch driver settings
    pub batch: BatchConfig,
}

impl AppConfig {
    /// Create a new `AppConfig` with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an `AppConfig` builder.
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }
}

// ============================================================================
// Builder for AppConfig
// ============================================================================

/// Builder for constructing `AppConfig` with fluent API.
#[derive(Debug, Default)]
#[must_use]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Set the file cap.
    pub const fn max_files(mut self, max_files: usize) -> Self {
        self.config.matching.max_files = max_files;
        self
    }

    /// Set the aggregation policy.
    pub const fn aggregation(mut self, policy: AggregationPolicy) -> Self {
        self.config.matching.aggregation = policy;
        self
    }

    /// Set version range handling.
    pub const fn version_ranges(mut self, mode: VersionRangeMode) -> Self {
        self.config.matching.version_ranges = mode;
        self
    }

    /// Set the tools compared for a standard.
    pub fn tools(mut self, standard: Standard, tools: Vec<String>) -> Self {
        match standard {
            Standard::Spdx => self.config.batch.spdx_tools = tools,
            Standard::CycloneDx => self.config.batch.cdx_tools = tools,
        }
        self
    }

    /// Enable or disable parallel unit evaluation.
    pub const fn parallel(mut self, parallel: bool) -> Self {
        self.config.batch.parallel = parallel;
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> AppConfig {
        self.config
    }
}

// ============================================================================
// Section Configurations
// ============================================================================

/// Matching engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct MatchingConfig {
    /// Skip file matching when either side has more file records than this
    pub max_files: usize,
    /// How both-empty scores enter the column means
    pub aggregation: AggregationPolicy,
    /// How version strings with range operators are compared
    pub version_ranges: VersionRangeMode,
}

impl MatchingConfig {
    /// Engine options for unit evaluation.
    #[must_use]
    pub const fn evaluation_options(&self) -> EvaluationOptions {
        EvaluationOptions {
            matching: MatchingOptions {
                max_files: self.max_files,
                version_ranges: self.version_ranges,
            },
            aggregation: self.aggregation,
        }
    }
}

/// Batch driver configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BatchConfig {
    /// Tools compared pairwise for SPDX documents
    pub spdx_tools: Vec<String>,
    /// Tools compared pairwise for `CycloneDX` documents
    pub cdx_tools: Vec<String>,
    /// Evaluate units on the rayon thread pool
    pub parallel: bool,
}

impl BatchConfig {
    /// Tools configured for a standard.
    #[must_use]
    pub fn tools_for(&self, standard: Standard) -> &[String] {
        match standard {
            Standard::Spdx => &self.spdx_tools,
            Standard::CycloneDx => &self.cdx_tools,
        }
    }
}

/// CLI overrides layered over file configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub max_files: Option<usize>,
    pub aggregation: Option<AggregationPolicy>,
    pub version_ranges: Option<VersionRangeMode>,
    pub sequential: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = AppConfig::builder()
            .max_files(10)
            .aggregation(AggregationPolicy::Exclude)
            .tools(Standard::Spdx, vec!["a".into(), "b".into()])
            .parallel(false)
            .build();
        assert_eq!(config.matching.max_files, 10);
        assert_eq!(config.batch.tools_for(Standard::Spdx), ["a", "b"]);
        assert!(!config.batch.parallel);

        let options = config.matching.evaluation_options();
        assert_eq!(options.matching.max_files, 10);
        assert_eq!(options.aggregation, AggregationPolicy::Exclude);
    }
}
