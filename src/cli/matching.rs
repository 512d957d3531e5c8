//! Match command handler.
//!
//! Implements the `match` subcommand: the batch comparison of every
//! repository and tool pair for the selected standards.

use crate::config::{AppConfig, Validatable};
use crate::model::Standard;
use crate::pipeline::{BatchRequest, exit_codes, read_repository_list, run_batch};
use anyhow::{Context, Result, bail};
use std::path::PathBuf;

/// Locations used by a batch run.
#[derive(Debug, Clone)]
pub struct MatchPaths {
    /// Directory of canonical documents
    pub extracted_dir: PathBuf,
    /// Repository list, one name per line
    pub repositories: PathBuf,
    /// Directory receiving the output tables
    pub output_dir: PathBuf,
}

/// Run the match command
pub fn run_match(
    paths: &MatchPaths,
    standards: &[Standard],
    config: &AppConfig,
    quiet: bool,
) -> Result<i32> {
    let errors = config.validate();
    if !errors.is_empty() {
        let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
        bail!("invalid configuration:\n  {}", messages.join("\n  "));
    }

    let repositories = read_repository_list(&paths.repositories)
        .with_context(|| format!("cannot load {}", paths.repositories.display()))?;

    for standard in standards {
        let request = BatchRequest {
            standard: *standard,
            extracted_dir: paths.extracted_dir.clone(),
            output_dir: paths.output_dir.clone(),
            repositories: repositories.clone(),
            tools: config.batch.tools_for(*standard).to_vec(),
            parallel: config.batch.parallel,
            options: config.matching.evaluation_options(),
        };
        let report = run_batch(&request)
            .with_context(|| format!("{standard} batch failed"))?;

        if !quiet {
            eprintln!(
                "{standard}: {} unit(s) evaluated, {} skipped, {} audit row(s)",
                report.evaluated, report.skipped, report.audits
            );
        }
    }

    Ok(exit_codes::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let paths = MatchPaths {
            extracted_dir: dir.path().to_path_buf(),
            repositories: dir.path().join("repos.txt"),
            output_dir: dir.path().join("out"),
        };
        let config = AppConfig::builder().max_files(0).build();
        let err = run_match(&paths, &[Standard::Spdx], &config, true).unwrap_err();
        assert!(err.to_string().contains("invalid configuration"));
    }

    #[test]
    fn test_empty_repository_list() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("repos.txt"), "\n").unwrap();
        let paths = MatchPaths {
            extracted_dir: dir.path().to_path_buf(),
            repositories: dir.path().join("repos.txt"),
            output_dir: dir.path().join("out"),
        };
        let code = run_match(&paths, Standard::all(), &AppConfig::default(), true).unwrap();
        assert_eq!(code, exit_codes::SUCCESS);
        assert!(dir.path().join("out").join("cdx-special-consistency.csv").exists());
        assert!(dir.path().join("out").join("spdx-syft-ort-package-consistency.csv").exists());
    }
}
