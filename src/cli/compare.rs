//! Compare command handler.
//!
//! Implements the `compare` subcommand: one repository between two tools,
//! printed instead of written to the output tables.

use crate::aggregate::UnitContext;
use crate::config::AppConfig;
use crate::model::DocumentId;
use crate::pipeline::{evaluate_unit, exit_codes};
use crate::reports::SummaryReporter;
use anyhow::{Context, Result, bail};
use clap::ValueEnum;
use std::path::Path;

/// Output format of the compare command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum CompareFormat {
    /// Structured JSON
    Json,
    /// Human-readable summary
    #[default]
    Summary,
}

/// Run the compare command
pub fn run_compare(
    left: &Path,
    right: &Path,
    format: CompareFormat,
    config: &AppConfig,
    no_color: bool,
) -> Result<i32> {
    let left_id = DocumentId::from_path(left)
        .with_context(|| format!("cannot identify {}", left.display()))?;
    let right_id = DocumentId::from_path(right)
        .with_context(|| format!("cannot identify {}", right.display()))?;

    if left_id.standard != right_id.standard {
        bail!(
            "cannot compare a {} document with a {} document",
            left_id.standard,
            right_id.standard
        );
    }
    if left_id.repository != right_id.repository {
        tracing::warn!(
            "Comparing different repositories: {} vs {}",
            left_id.repository,
            right_id.repository
        );
    }

    let context = UnitContext::new(
        left_id.standard,
        left_id.tool,
        right_id.tool,
        left_id.repository,
    );
    let outcome = evaluate_unit(&context, left, right, &config.matching.evaluation_options())
        .context("comparison failed")?;

    match format {
        CompareFormat::Json => {
            let json = serde_json::to_string_pretty(&outcome)
                .context("failed to serialize comparison")?;
            println!("{json}");
        }
        CompareFormat::Summary => {
            let reporter = if no_color {
                SummaryReporter::new().no_color()
            } else {
                SummaryReporter::new()
            };
            println!("{}", reporter.render(&outcome));
        }
    }
    Ok(exit_codes::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_standards_rejected() {
        let err = run_compare(
            Path::new("spdx#syft#acme.json"),
            Path::new("cdx#syft#acme.json"),
            CompareFormat::Json,
            &AppConfig::default(),
            true,
        )
        .unwrap_err();
        assert!(err.to_string().contains("cannot compare"));
    }

    #[test]
    fn test_unnamed_file_rejected() {
        let result = run_compare(
            Path::new("left.json"),
            Path::new("right.json"),
            CompareFormat::Summary,
            &AppConfig::default(),
            true,
        );
        assert!(result.is_err());
    }
}
