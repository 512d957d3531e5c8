//! CSV output tables.
//!
//! One table per tool pair with a row per repository, and one audit table
//! per standard. Tables are created with their header at the start of a
//! run and appended to afterwards.

use crate::aggregate::AuditRecord;
use crate::error::{ConsistencyError, Result};
use crate::matching::{CDX_COMPONENT_FIELDS, FieldComparison, SPDX_PACKAGE_FIELDS};
use crate::model::Standard;
use crate::pipeline::{Cell, SummaryRow};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

const CDX_LEADING_COLUMNS: &[&str] = &[
    "repo_name",
    "repo_name_meta",
    "repo_version",
    "comp_num1",
    "comp_num2",
    "matched_comps",
];

const SPDX_LEADING_COLUMNS: &[&str] = &[
    "repo_name",
    "files_num1",
    "files_num2",
    "matched_files",
    "pkgs_num1",
    "pkgs_num2",
    "matched_pkgs",
    "doc_name",
];

const AUDIT_LEADING_COLUMNS: &[&str] = &["standard", "tool1", "tool2", "repo_name", "pkg_name"];

const fn item_fields(standard: Standard) -> &'static [FieldComparison] {
    match standard {
        Standard::Spdx => SPDX_PACKAGE_FIELDS,
        Standard::CycloneDx => CDX_COMPONENT_FIELDS,
    }
}

/// Header of a tool-pair table.
#[must_use]
pub fn package_header(standard: Standard) -> Vec<String> {
    let item_columns = item_fields(standard).iter().map(|f| f.column.to_string());
    match standard {
        Standard::CycloneDx => CDX_LEADING_COLUMNS
            .iter()
            .map(ToString::to_string)
            .chain(item_columns)
            .collect(),
        Standard::Spdx => SPDX_LEADING_COLUMNS
            .iter()
            .map(ToString::to_string)
            .chain(SPDX_PACKAGE_FIELDS.iter().map(|f| format!("{}_r", f.column)))
            .chain(item_columns)
            .chain(std::iter::once("checksum_score".to_string()))
            .collect(),
    }
}

/// Header of the audit table.
#[must_use]
pub fn audit_header(standard: Standard) -> Vec<String> {
    AUDIT_LEADING_COLUMNS
        .iter()
        .map(ToString::to_string)
        .chain(item_fields(standard).iter().map(|f| f.column.to_string()))
        .collect()
}

/// File name of a tool-pair table.
#[must_use]
pub fn package_table_name(standard: Standard, tool1: &str, tool2: &str) -> String {
    format!("{}-{tool1}-{tool2}-package-consistency.csv", standard.tag())
}

/// File name of the audit table.
#[must_use]
pub fn audit_table_name(standard: Standard) -> String {
    format!("{}-special-consistency.csv", standard.tag())
}

/// Render a score. Whole numbers keep one decimal place.
#[must_use]
pub fn format_score(score: f64) -> String {
    if score.is_finite() && score.fract() == 0.0 {
        format!("{score:.1}")
    } else {
        format!("{score}")
    }
}

fn format_cell(cell: &Cell) -> String {
    match cell {
        Cell::Count(n) => n.to_string(),
        Cell::Score(s) => format_score(*s),
    }
}

/// Quote a field when it contains a separator, quote, or line break.
#[must_use]
pub fn escape_csv(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn render_line<S: AsRef<str>>(fields: impl IntoIterator<Item = S>) -> String {
    let mut line = fields
        .into_iter()
        .map(|f| escape_csv(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",");
    line.push('\n');
    line
}

/// Render a summary row.
#[must_use]
pub fn render_summary_row(row: &SummaryRow) -> String {
    render_line(std::iter::once(row.repository.clone()).chain(row.cells.iter().map(format_cell)))
}

/// Render an audit row.
#[must_use]
pub fn render_audit_row(record: &AuditRecord) -> String {
    let leading = [
        record.standard.tag().to_string(),
        record.tool1.clone(),
        record.tool2.clone(),
        record.repository.clone(),
        record.item_name.clone(),
    ];
    render_line(
        leading
            .into_iter()
            .chain(record.scores.iter().map(|s| format_score(*s))),
    )
}

/// An append-only CSV table on disk.
#[derive(Debug, Clone)]
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    /// Create (or truncate) the table and write its header.
    pub fn create(path: impl Into<PathBuf>, header: &[String]) -> Result<Self> {
        let path = path.into();
        let mut file = File::create(&path).map_err(|e| {
            ConsistencyError::report(format!("creating {}", path.display()), e)
        })?;
        file.write_all(render_line(header).as_bytes())
            .map_err(|e| ConsistencyError::report(format!("writing {}", path.display()), e))?;
        Ok(Self { path })
    }

    /// Append one rendered line.
    pub fn append(&self, line: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| ConsistencyError::report(format!("opening {}", self.path.display()), e))?;
        file.write_all(line.as_bytes())
            .map_err(|e| ConsistencyError::report(format!("appending to {}", self.path.display()), e))
    }

    /// Location of the table.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cdx_package_header() {
        insta::assert_snapshot!(
            package_header(Standard::CycloneDx).join(","),
            @"repo_name,repo_name_meta,repo_version,comp_num1,comp_num2,matched_comps,author_score,type_score,purl_score,cpe_score,version_score"
        );
    }

    #[test]
    fn test_spdx_package_header() {
        insta::assert_snapshot!(
            package_header(Standard::Spdx).join(","),
            @"repo_name,files_num1,files_num2,matched_files,pkgs_num1,pkgs_num2,matched_pkgs,doc_name,originator_score_r,supplier_score_r,copyright_score_r,version_score_r,PVC_score_r,dL_score_r,originator_score,supplier_score,copyright_score,version_score,PVC_score,dL_score,checksum_score"
        );
    }

    #[test]
    fn test_audit_headers() {
        insta::assert_snapshot!(
            audit_header(Standard::Spdx).join(","),
            @"standard,tool1,tool2,repo_name,pkg_name,originator_score,supplier_score,copyright_score,version_score,PVC_score,dL_score"
        );
        insta::assert_snapshot!(
            audit_header(Standard::CycloneDx).join(","),
            @"standard,tool1,tool2,repo_name,pkg_name,author_score,type_score,purl_score,cpe_score,version_score"
        );
    }

    #[test]
    fn test_table_names() {
        assert_eq!(
            package_table_name(Standard::Spdx, "syft", "ort"),
            "spdx-syft-ort-package-consistency.csv"
        );
        assert_eq!(audit_table_name(Standard::CycloneDx), "cdx-special-consistency.csv");
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(1.0), "1.0");
        assert_eq!(format_score(0.0), "0.0");
        assert_eq!(format_score(-1.0), "-1.0");
        assert_eq!(format_score(0.75), "0.75");
    }

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("plain"), "plain");
        assert_eq!(escape_csv("a,b"), "\"a,b\"");
        assert_eq!(escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_summary_row_rendering() {
        let row = SummaryRow {
            repository: "acme".to_string(),
            cells: vec![Cell::Count(3), Cell::Score(0.5), Cell::Score(1.0)],
        };
        assert_eq!(render_summary_row(&row), "acme,3,0.5,1.0\n");
    }

    #[test]
    fn test_sink_create_and_append() {
        let dir = tempfile::tempdir().unwrap();
        let header = vec!["a".to_string(), "b".to_string()];
        let sink = CsvSink::create(dir.path().join("t.csv"), &header).unwrap();
        sink.append("1,2\n").unwrap();
        sink.append("3,4\n").unwrap();
        let content = std::fs::read_to_string(sink.path()).unwrap();
        assert_eq!(content, "a,b\n1,2\n3,4\n");

        // Recreating truncates.
        let sink = CsvSink::create(dir.path().join("t.csv"), &header).unwrap();
        assert_eq!(std::fs::read_to_string(sink.path()).unwrap(), "a,b\n");
    }
}
