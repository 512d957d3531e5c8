//! Default configuration values.

use super::types::{BatchConfig, MatchingConfig};
use crate::aggregate::AggregationPolicy;
use crate::matching::{DEFAULT_MAX_FILES, VersionRangeMode};

/// Default SPDX generators.
pub const DEFAULT_SPDX_TOOLS: &[&str] = &["syft", "gh-sbom", "sbom-tool", "ort"];

/// Default `CycloneDX` generators.
pub const DEFAULT_CDX_TOOLS: &[&str] = &["syft", "gh-sbom", "scancode", "cdxgen"];

fn tool_list(tools: &[&str]) -> Vec<String> {
    tools.iter().map(ToString::to_string).collect()
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            max_files: DEFAULT_MAX_FILES,
            aggregation: AggregationPolicy::Absolute,
            version_ranges: VersionRangeMode::Legacy,
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            spdx_tools: tool_list(DEFAULT_SPDX_TOOLS),
            cdx_tools: tool_list(DEFAULT_CDX_TOOLS),
            parallel: true,
        }
    }
}
