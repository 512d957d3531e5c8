//! SPDX JSON extraction.

use super::{collect_items, pick_fields};
use crate::model::{FieldValue, Section, SpdxDocument};
use serde_json::{Map, Value};

/// Document creation fields.
pub const SPDX_DOCUMENT_FIELDS: &[&str] = &[
    "SPDXID",
    "name",
    "spdxVersion",
    "dataLicense",
    "documentNamespace",
    "creationInfo",
];

/// Package fields.
pub const SPDX_PACKAGE_FIELDS: &[&str] = &[
    "name",
    "SPDXID",
    "downloadLocation",
    "packageVerificationCode",
    "versionInfo",
    "originator",
    "supplier",
    "copyrightText",
];

/// File fields.
pub const SPDX_FILE_FIELDS: &[&str] = &["fileName", "SPDXID", "checksums"];

/// Extract the canonical SPDX document. Packages and files are keyed by
/// `SPDXID`.
#[must_use]
pub fn extract_spdx(root: &Map<String, Value>, source: &str) -> SpdxDocument {
    let mut documents = pick_fields(root, SPDX_DOCUMENT_FIELDS);
    let creation_info = root.get("creationInfo").and_then(Value::as_object);
    for lifted in ["creators", "created"] {
        let value = creation_info
            .and_then(|info| info.get(lifted))
            .cloned()
            .map_or(FieldValue::NotExtracted, FieldValue::from);
        documents.insert(lifted, value);
    }

    SpdxDocument {
        documents: Section::Present(documents),
        packages: collect_items(
            root.get("packages"),
            SPDX_PACKAGE_FIELDS,
            spdx_id,
            source,
            "Packages",
        ),
        files: collect_items(
            root.get("files"),
            SPDX_FILE_FIELDS,
            spdx_id,
            source,
            "Files",
        ),
    }
}

fn spdx_id(item: &Map<String, Value>) -> Option<String> {
    item.get("SPDXID").and_then(Value::as_str).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RecordSet;
    use serde_json::json;

    fn extract(value: Value) -> SpdxDocument {
        extract_spdx(value.as_object().unwrap(), "spdx#syft#acme")
    }

    #[test]
    fn test_extract_full_document() {
        let doc = extract(json!({
            "SPDXID": "SPDXRef-DOCUMENT",
            "name": "acme",
            "spdxVersion": "SPDX-2.3",
            "creationInfo": {"creators": ["Tool: syft"], "created": "2024-01-01T00:00:00Z"},
            "packages": [
                {"SPDXID": "SPDXRef-1", "name": "lodash", "versionInfo": "4.17.21",
                 "packageVerificationCode": {"packageVerificationCodeValue": "abc"}},
                {"name": "no-id"}
            ],
            "files": [
                {"SPDXID": "SPDXRef-F1", "fileName": "./index.js",
                 "checksums": [{"algorithm": "SHA1", "checksumValue": "da39"}]}
            ]
        }));

        let documents = doc.documents.as_present().unwrap();
        assert_eq!(documents.get("name"), &FieldValue::text("acme"));
        assert_eq!(documents.get("dataLicense"), &FieldValue::NotExtracted);
        assert_eq!(documents.get("created"), &FieldValue::text("2024-01-01T00:00:00Z"));
        assert!(documents.get("creators").as_structured().is_some());

        let packages = doc.packages.as_present().unwrap();
        assert_eq!(packages.len(), 1);
        let lodash = packages.get("SPDXRef-1").unwrap();
        assert_eq!(lodash.len(), SPDX_PACKAGE_FIELDS.len());
        assert_eq!(lodash.get("supplier"), &FieldValue::NotExtracted);

        assert_eq!(doc.files.as_present().map(RecordSet::len), Some(1));
    }

    #[test]
    fn test_missing_arrays_are_not_extracted() {
        let doc = extract(json!({"name": "acme"}));
        assert!(doc.packages.is_not_extracted());
        assert!(doc.files.is_not_extracted());
        let documents = doc.documents.as_present().unwrap();
        assert_eq!(documents.get("creators"), &FieldValue::NotExtracted);
    }

    #[test]
    fn test_duplicate_ids_keep_first_position() {
        let doc = extract(json!({
            "packages": [
                {"SPDXID": "A", "name": "first"},
                {"SPDXID": "B", "name": "other"},
                {"SPDXID": "A", "name": "second"}
            ]
        }));
        let packages = doc.packages.as_present().unwrap();
        let (key, record) = packages.get_index(0).unwrap();
        assert_eq!(key, "A");
        assert_eq!(record.get("name"), &FieldValue::text("second"));
    }
}
