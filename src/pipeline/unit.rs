//! Evaluation of one comparison unit.
//!
//! A unit is one repository compared between two tools of one standard. It
//! loads both canonical documents, runs the category matchers, and reduces
//! the scores into a single summary row plus audit records. Units share no
//! state, so any number of them can run at once.

use crate::aggregate::{AggregationPolicy, Aggregator, AuditRecord, UnitContext};
use crate::matching::records::{CDX_METADATA_WIDTH, SPDX_REPO_WIDTH};
use crate::matching::{
    CDX_COMPONENT_FIELDS, MatchingOptions, SPDX_PACKAGE_FIELDS, match_cdx_components,
    match_cdx_metadata, match_spdx_files, match_spdx_packages,
};
use crate::model::{CanonicalDocument, CdxDocument, SpdxDocument, Standard};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why a unit was skipped.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum UnitError {
    #[error("Both sides of the comparison are the same file: {0}")]
    SamePath(PathBuf),

    #[error("Cannot read {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed canonical document {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Documents of different standards: {left} vs {right}")]
    StandardMismatch { left: Standard, right: Standard },
}

/// Engine settings applied to every unit of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvaluationOptions {
    pub matching: MatchingOptions,
    pub aggregation: AggregationPolicy,
}

/// One output cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Count(usize),
    Score(f64),
}

/// One row of a tool-pair table, without the repository column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub repository: String,
    pub cells: Vec<Cell>,
}

impl SummaryRow {
    fn new(repository: &str) -> Self {
        Self {
            repository: repository.to_string(),
            cells: Vec::new(),
        }
    }

    fn counts(&mut self, counts: impl IntoIterator<Item = usize>) {
        self.cells.extend(counts.into_iter().map(Cell::Count));
    }

    fn scores<'a>(&mut self, scores: impl IntoIterator<Item = &'a f64>) {
        self.cells.extend(scores.into_iter().copied().map(Cell::Score));
    }
}

/// Result of a unit: the summary row and its audit records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitOutcome {
    pub context: UnitContext,
    pub row: SummaryRow,
    pub audits: Vec<AuditRecord>,
}

/// Load a canonical document of the given standard.
pub fn load_document(standard: Standard, path: &Path) -> Result<CanonicalDocument, UnitError> {
    let content = fs::read_to_string(path).map_err(|source| UnitError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    CanonicalDocument::from_json(standard, &content).map_err(|source| UnitError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

/// Load and evaluate the two documents of a unit.
pub fn evaluate_unit(
    context: &UnitContext,
    left: &Path,
    right: &Path,
    options: &EvaluationOptions,
) -> Result<UnitOutcome, UnitError> {
    if left == right {
        return Err(UnitError::SamePath(left.to_path_buf()));
    }
    let left = load_document(context.standard, left)?;
    let right = load_document(context.standard, right)?;
    evaluate_documents(context, &left, &right, options)
}

/// Evaluate two already-loaded documents.
pub fn evaluate_documents(
    context: &UnitContext,
    left: &CanonicalDocument,
    right: &CanonicalDocument,
    options: &EvaluationOptions,
) -> Result<UnitOutcome, UnitError> {
    let aggregator = Aggregator::new(options.aggregation);
    let outcome = match (left, right) {
        (CanonicalDocument::CycloneDx(a), CanonicalDocument::CycloneDx(b)) => {
            evaluate_cdx(context, a, b, &options.matching, &aggregator)
        }
        (CanonicalDocument::Spdx(a), CanonicalDocument::Spdx(b)) => {
            evaluate_spdx(context, a, b, &options.matching, &aggregator)
        }
        _ => {
            return Err(UnitError::StandardMismatch {
                left: left.standard(),
                right: right.standard(),
            });
        }
    };
    tracing::info!(
        "[UnitDone]: {} {} vs {} ({} audit rows)",
        context.repository,
        context.tool1,
        context.tool2,
        outcome.audits.len()
    );
    Ok(outcome)
}

fn evaluate_cdx(
    context: &UnitContext,
    left: &CdxDocument,
    right: &CdxDocument,
    options: &MatchingOptions,
    aggregator: &Aggregator,
) -> UnitOutcome {
    let metadata = match_cdx_metadata(&left.metadata, &right.metadata, options);
    debug_assert_eq!(metadata.len(), CDX_METADATA_WIDTH);
    let components = match_cdx_components(&left.components, &right.components, options);
    let reduced = aggregator.reduce(context, &components.vectors, CDX_COMPONENT_FIELDS.len());

    let mut row = SummaryRow::new(&context.repository);
    row.scores(&metadata);
    row.counts(components.stats.as_array());
    row.scores(&reduced.means);

    UnitOutcome {
        context: context.clone(),
        row,
        audits: reduced.audits,
    }
}

fn evaluate_spdx(
    context: &UnitContext,
    left: &SpdxDocument,
    right: &SpdxDocument,
    options: &MatchingOptions,
    aggregator: &Aggregator,
) -> UnitOutcome {
    let files = match_spdx_files(&left.files, &right.files, options);
    let packages = match_spdx_packages(
        (&left.documents, &left.packages),
        (&right.documents, &right.packages),
        &context.repository,
        options,
    );
    debug_assert_eq!(packages.repository.len(), SPDX_REPO_WIDTH);

    let package_scores =
        aggregator.reduce(context, &packages.packages.vectors, SPDX_PACKAGE_FIELDS.len());
    // File scores are never negative; only package rows are audited.
    let file_scores = aggregator.reduce(context, &files.vectors, 1);

    let mut row = SummaryRow::new(&context.repository);
    row.counts(files.stats.as_array());
    row.counts(packages.packages.stats.as_array());
    row.scores(&packages.repository);
    row.scores(&package_scores.means);
    row.scores(&file_scores.means);

    UnitOutcome {
        context: context.clone(),
        row,
        audits: package_scores.audits,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Record, RecordSet, Section};

    fn cdx(components: RecordSet) -> CanonicalDocument {
        CanonicalDocument::CycloneDx(CdxDocument {
            metadata: Section::Present(
                Record::new().with("name_com", "acme").with("version_com", "1.0"),
            ),
            components: Section::Present(components),
        })
    }

    fn context(standard: Standard) -> UnitContext {
        UnitContext::new(standard, "syft", "cdxgen", "acme")
    }

    #[test]
    fn test_cdx_row_layout() {
        let components = RecordSet::new().with(
            "a",
            Record::new()
                .with("name", "lodash")
                .with("author", "NONE")
                .with("version", "4.17.21"),
        );
        let outcome = evaluate_documents(
            &context(Standard::CycloneDx),
            &cdx(components.clone()),
            &cdx(components),
            &EvaluationOptions::default(),
        )
        .unwrap();

        assert_eq!(outcome.row.cells.len(), 2 + 3 + CDX_COMPONENT_FIELDS.len());
        assert_eq!(outcome.row.cells[0], Cell::Score(1.0));
        assert_eq!(outcome.row.cells[2], Cell::Count(1));
        assert_eq!(outcome.row.cells[4], Cell::Count(1));
        // author: both NONE, absolute policy
        assert_eq!(outcome.row.cells[5], Cell::Score(1.0));
        assert_eq!(outcome.audits.len(), 1);
        assert_eq!(outcome.audits[0].item_name, "lodash");
    }

    #[test]
    fn test_spdx_row_layout() {
        let document = CanonicalDocument::Spdx(SpdxDocument::default());
        let outcome = evaluate_documents(
            &context(Standard::Spdx),
            &document,
            &document,
            &EvaluationOptions::default(),
        )
        .unwrap();
        let expected = 3 + 3 + SPDX_REPO_WIDTH + SPDX_PACKAGE_FIELDS.len() + 1;
        assert_eq!(outcome.row.cells.len(), expected);
        assert!(outcome.row.cells[..6].iter().all(|c| *c == Cell::Count(0)));
        assert!(outcome.row.cells[6..].iter().all(|c| *c == Cell::Score(0.0)));
    }

    #[test]
    fn test_mixed_standards_rejected() {
        let result = evaluate_documents(
            &context(Standard::Spdx),
            &CanonicalDocument::Spdx(SpdxDocument::default()),
            &cdx(RecordSet::new()),
            &EvaluationOptions::default(),
        );
        assert!(matches!(result, Err(UnitError::StandardMismatch { .. })));
    }

    #[test]
    fn test_same_path_skipped() {
        let path = Path::new("cdx#syft#acme.json");
        let result = evaluate_unit(
            &context(Standard::CycloneDx),
            path,
            path,
            &EvaluationOptions::default(),
        );
        assert!(matches!(result, Err(UnitError::SamePath(_))));
    }

    #[test]
    fn test_missing_file_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let result = evaluate_unit(
            &context(Standard::CycloneDx),
            &dir.path().join("a.json"),
            &dir.path().join("b.json"),
            &EvaluationOptions::default(),
        );
        assert!(matches!(result, Err(UnitError::Unreadable { .. })));
    }
}
