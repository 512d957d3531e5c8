//! Extraction of raw SBOM JSON into canonical documents.
//!
//! Raw documents are read as untyped JSON: tools disagree on which fields
//! they emit and on their shapes, and the canonical form must keep every
//! value as the tool wrote it. Fields a tool did not emit become `NE`.

mod cyclonedx;
mod spdx;

pub use cyclonedx::{CDX_COMPONENT_FIELDS, CDX_HEADER_FIELDS, extract_cyclonedx};
pub use spdx::{SPDX_DOCUMENT_FIELDS, SPDX_FILE_FIELDS, SPDX_PACKAGE_FIELDS, extract_spdx};

use crate::error::{ConsistencyError, ExtractErrorKind, ParseErrorKind, Result};
use crate::model::{CanonicalDocument, DocumentId, FieldValue, Record, RecordSet, Section, Standard};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Outcome of a listed extraction run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExtractReport {
    pub extracted: usize,
    pub skipped: usize,
}

/// Extract a canonical document from a parsed raw document.
pub fn extract_document(standard: Standard, root: &Value, source: &str) -> Result<CanonicalDocument> {
    let Value::Object(object) = root else {
        return Err(ConsistencyError::extraction(
            source,
            ExtractErrorKind::NotAnObject,
        ));
    };
    Ok(match standard {
        Standard::Spdx => CanonicalDocument::Spdx(extract_spdx(object, source)),
        Standard::CycloneDx => CanonicalDocument::CycloneDx(extract_cyclonedx(object, source)),
    })
}

/// Extract one raw file into `output_dir`, returning the written path.
///
/// The file name must follow `<standard>#<tool>#<repository>.json`.
pub fn extract_file(path: &Path, output_dir: &Path) -> Result<PathBuf> {
    let id = DocumentId::from_path(path)?;
    let content = fs::read_to_string(path)
        .map_err(|e| ConsistencyError::io(path, "failed to read raw SBOM", e))?;
    let root: Value = serde_json::from_str(&content).map_err(|e| {
        ConsistencyError::parse(
            path.display().to_string(),
            ParseErrorKind::InvalidJson(e.to_string()),
        )
    })?;

    let document = extract_document(id.standard, &root, &id.to_string())?;
    let rendered = document.to_json_pretty().map_err(|e| {
        ConsistencyError::extraction(id.to_string(), ExtractErrorKind::Serialize(e.to_string()))
    })?;

    let target = output_dir.join(id.file_name());
    fs::write(&target, rendered)
        .map_err(|e| ConsistencyError::io(&target, "failed to write canonical document", e))?;
    tracing::info!("[{}ExtractionSucceed]: {}", id.standard.tag().to_uppercase(), target.display());
    Ok(target)
}

/// Extract every file named in `list_file` (one name per line, relative to
/// `input_dir`).
///
/// Missing, malformed, or misnamed files are logged and skipped. Only
/// failures to read the list or create the output directory are errors.
pub fn extract_listed(list_file: &Path, input_dir: &Path, output_dir: &Path) -> Result<ExtractReport> {
    let list = fs::read_to_string(list_file)
        .map_err(|e| ConsistencyError::io(list_file, "failed to read file list", e))?;
    fs::create_dir_all(output_dir)
        .map_err(|e| ConsistencyError::io(output_dir, "failed to create output directory", e))?;

    let mut report = ExtractReport::default();
    for name in list.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let path = input_dir.join(name);
        if !path.exists() {
            tracing::error!("[FileNotFound]: {}", path.display());
            report.skipped += 1;
            continue;
        }
        match extract_file(&path, output_dir) {
            Ok(_) => report.extracted += 1,
            Err(e) => {
                tracing::error!("Skipping {}: {}", path.display(), e);
                report.skipped += 1;
            }
        }
    }
    Ok(report)
}

/// Copy the listed fields of a JSON object into a record, `NE` for absent ones.
pub(crate) fn pick_fields(object: &Map<String, Value>, fields: &[&str]) -> Record {
    fields.iter().fold(Record::new(), |record, field| {
        let value = object
            .get(*field)
            .cloned()
            .map_or(FieldValue::NotExtracted, FieldValue::from);
        record.with(*field, value)
    })
}

/// Build a keyed record set from a JSON array of item objects.
///
/// A missing or non-array value makes the whole category `NE`. Items that
/// are not objects or yield no key are logged and dropped.
pub(crate) fn collect_items(
    items: Option<&Value>,
    fields: &[&str],
    key_of: impl Fn(&Map<String, Value>) -> Option<String>,
    source: &str,
    category: &str,
) -> Section<RecordSet> {
    let Some(Value::Array(items)) = items else {
        tracing::warn!("[No{}]: {}", category, source);
        return Section::NotExtracted;
    };

    let mut set = RecordSet::new();
    for item in items {
        let Some(object) = item.as_object() else {
            tracing::warn!("[InvalidItem][{}]: {}", category, source);
            continue;
        };
        let Some(key) = key_of(object) else {
            tracing::error!("[NoIdentifier][{}]: {}", category, source);
            continue;
        };
        set.insert(key, pick_fields(object, fields));
    }
    Section::Present(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pick_fields_fills_not_extracted() {
        let object = json!({"name": "x", "extra": 1});
        let record = pick_fields(object.as_object().unwrap(), &["name", "version"]);
        assert_eq!(record.len(), 2);
        assert_eq!(record.get("name"), &FieldValue::text("x"));
        assert_eq!(record.get("version"), &FieldValue::NotExtracted);
    }

    #[test]
    fn test_non_object_root_is_rejected() {
        assert!(extract_document(Standard::Spdx, &json!([1, 2]), "x").is_err());
    }

    #[test]
    fn test_extract_listed_skips_bad_entries() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        fs::write(
            input.path().join("cdx#syft#acme.json"),
            r#"{"bomFormat": "CycloneDX", "components": [{"name": "a", "bom-ref": "r1"}]}"#,
        )
        .unwrap();
        fs::write(input.path().join("cdx#cdxgen#acme.json"), "{ not json").unwrap();
        fs::write(input.path().join("weird-name.json"), "{}").unwrap();
        let list = input.path().join("list.txt");
        fs::write(
            &list,
            "cdx#syft#acme.json\n\ncdx#cdxgen#acme.json\nweird-name.json\nspdx#syft#gone.json\n",
        )
        .unwrap();

        let report = extract_listed(&list, input.path(), output.path()).unwrap();
        assert_eq!(report, ExtractReport { extracted: 1, skipped: 3 });

        let written = fs::read_to_string(output.path().join("cdx#syft#acme.json")).unwrap();
        let document = CanonicalDocument::from_json(Standard::CycloneDx, &written).unwrap();
        let CanonicalDocument::CycloneDx(document) = document else {
            panic!("expected CycloneDX document");
        };
        assert_eq!(document.components.as_present().map(RecordSet::len), Some(1));
    }

    #[test]
    fn test_extract_listed_missing_list_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(extract_listed(&dir.path().join("nope.txt"), dir.path(), dir.path()).is_err());
    }
}
