//! Batch driver: every repository against every tool pair of a standard.
//!
//! Units are evaluated independently (in parallel with rayon unless
//! disabled) and their outcomes are written from a single thread in input
//! order, so the output tables do not depend on scheduling.

use super::unit::{EvaluationOptions, UnitError, UnitOutcome, evaluate_unit};
use crate::aggregate::UnitContext;
use crate::error::{ConsistencyError, Result};
use crate::model::{DocumentId, Standard};
use crate::reports::csv::{
    CsvSink, audit_header, audit_table_name, package_header, package_table_name,
    render_audit_row, render_summary_row,
};
use indexmap::IndexMap;
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Inputs of a batch run for one standard.
#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub standard: Standard,
    /// Directory of canonical documents.
    pub extracted_dir: PathBuf,
    /// Directory receiving the output tables.
    pub output_dir: PathBuf,
    pub repositories: Vec<String>,
    pub tools: Vec<String>,
    pub parallel: bool,
    pub options: EvaluationOptions,
}

/// Outcome counts of a batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub evaluated: usize,
    pub skipped: usize,
    pub audits: usize,
}

/// Unordered tool pairs `(tools[i], tools[j])` with `i < j`.
#[must_use]
pub fn tool_pairs(tools: &[String]) -> Vec<(String, String)> {
    tools
        .iter()
        .enumerate()
        .flat_map(|(i, a)| tools[i + 1..].iter().map(move |b| (a.clone(), b.clone())))
        .collect()
}

/// Read a repository list: one name per line, trimmed, blank lines skipped.
pub fn read_repository_list(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .map_err(|e| ConsistencyError::io(path, "failed to read repository list", e))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

struct UnitJob {
    context: UnitContext,
    left: PathBuf,
    right: PathBuf,
}

impl BatchRequest {
    fn jobs(&self) -> Vec<UnitJob> {
        let pairs = tool_pairs(&self.tools);
        self.repositories
            .iter()
            .flat_map(|repository| {
                pairs.iter().map(move |(tool1, tool2)| {
                    let path = |tool: &str| {
                        self.extracted_dir
                            .join(DocumentId::new(self.standard, tool, repository).file_name())
                    };
                    UnitJob {
                        context: UnitContext::new(self.standard, tool1, tool2, repository),
                        left: path(tool1),
                        right: path(tool2),
                    }
                })
            })
            .collect()
    }
}

fn run_job(job: &UnitJob, options: &EvaluationOptions) -> std::result::Result<UnitOutcome, UnitError> {
    evaluate_unit(&job.context, &job.left, &job.right, options)
}

/// Run every unit of the request and write the output tables.
///
/// Tables are recreated with headers first. Units that cannot be evaluated
/// are logged and counted; only table I/O aborts the run.
pub fn run_batch(request: &BatchRequest) -> Result<BatchReport> {
    fs::create_dir_all(&request.output_dir).map_err(|e| {
        ConsistencyError::io(&request.output_dir, "failed to create output directory", e)
    })?;

    let standard = request.standard;
    let audit_sink = CsvSink::create(
        request.output_dir.join(audit_table_name(standard)),
        &audit_header(standard),
    )?;
    let mut pair_sinks: IndexMap<(String, String), CsvSink> = IndexMap::new();
    for (tool1, tool2) in tool_pairs(&request.tools) {
        let sink = CsvSink::create(
            request
                .output_dir
                .join(package_table_name(standard, &tool1, &tool2)),
            &package_header(standard),
        )?;
        pair_sinks.insert((tool1, tool2), sink);
    }

    let jobs = request.jobs();
    tracing::info!(
        "Evaluating {} units for {} ({} repositories, {} tool pairs)",
        jobs.len(),
        standard,
        request.repositories.len(),
        pair_sinks.len()
    );
    let outcomes: Vec<_> = if request.parallel {
        jobs.par_iter()
            .map(|job| run_job(job, &request.options))
            .collect()
    } else {
        jobs.iter().map(|job| run_job(job, &request.options)).collect()
    };

    let mut report = BatchReport::default();
    for (job, outcome) in jobs.iter().zip(outcomes) {
        match outcome {
            Ok(outcome) => {
                let key = (job.context.tool1.clone(), job.context.tool2.clone());
                if let Some(sink) = pair_sinks.get(&key) {
                    sink.append(&render_summary_row(&outcome.row))?;
                }
                for audit in &outcome.audits {
                    audit_sink.append(&render_audit_row(audit))?;
                }
                report.evaluated += 1;
                report.audits += outcome.audits.len();
            }
            Err(e) => {
                tracing::warn!(
                    "Skipping {} {} vs {}: {}",
                    job.context.repository,
                    job.context.tool1,
                    job.context.tool2,
                    e
                );
                report.skipped += 1;
            }
        }
    }

    tracing::info!(
        "{}: {} units evaluated, {} skipped, {} audit rows",
        standard,
        report.evaluated,
        report.skipped,
        report.audits
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tools(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_tool_pairs() {
        let pairs = tool_pairs(&tools(&["a", "b", "c"]));
        assert_eq!(
            pairs,
            vec![
                ("a".to_string(), "b".to_string()),
                ("a".to_string(), "c".to_string()),
                ("b".to_string(), "c".to_string()),
            ]
        );
        assert!(tool_pairs(&tools(&["a"])).is_empty());
    }

    #[test]
    fn test_read_repository_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("repos.txt");
        fs::write(&path, "  acme \n\nwidget\n").unwrap();
        assert_eq!(read_repository_list(&path).unwrap(), tools(&["acme", "widget"]));
    }

    #[test]
    fn test_missing_documents_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let request = BatchRequest {
            standard: Standard::CycloneDx,
            extracted_dir: dir.path().to_path_buf(),
            output_dir: dir.path().join("out"),
            repositories: tools(&["acme"]),
            tools: tools(&["syft", "cdxgen"]),
            parallel: false,
            options: EvaluationOptions::default(),
        };
        let report = run_batch(&request).unwrap();
        assert_eq!(report, BatchReport { evaluated: 0, skipped: 1, audits: 0 });

        let table = dir.path().join("out").join("cdx-syft-cdxgen-package-consistency.csv");
        let content = fs::read_to_string(table).unwrap();
        assert_eq!(content.lines().count(), 1);
    }
}
