//! Extract command handler.
//!
//! Implements the `extract` subcommand: raw SBOMs to canonical documents.

use crate::extract::extract_listed;
use crate::pipeline::exit_codes;
use anyhow::{Context, Result};
use std::path::Path;

/// Run the extract command
pub fn run_extract(list_file: &Path, input_dir: &Path, output_dir: &Path, quiet: bool) -> Result<i32> {
    let report = extract_listed(list_file, input_dir, output_dir)
        .with_context(|| format!("extraction from {} failed", list_file.display()))?;

    if !quiet {
        eprintln!(
            "Extracted {} document(s) into {} ({} skipped)",
            report.extracted,
            output_dir.display(),
            report.skipped
        );
    }
    Ok(exit_codes::SUCCESS)
}
