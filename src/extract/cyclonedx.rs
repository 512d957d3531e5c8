//! `CycloneDX` JSON extraction.

use super::{collect_items, pick_fields};
use crate::model::{CdxDocument, FieldValue, Section};
use crate::utils::content_key;
use serde_json::{Map, Value};

/// Root-level header fields.
pub const CDX_HEADER_FIELDS: &[&str] = &["bomFormat", "specVersion", "version", "serialNumber"];

/// Fields lifted from the `metadata` object.
const CDX_METADATA_FIELDS: &[&str] = &["timestamp", "tools"];

/// Component fields.
pub const CDX_COMPONENT_FIELDS: &[&str] = &[
    "name", "author", "type", "bom-ref", "purl", "version", "copyright", "cpe",
];

/// Extract the canonical `CycloneDX` document.
///
/// Metadata is always present; fields of the main component are stored as
/// `name_com`, `version_com` and `bom-ref`. Components are keyed by
/// `bom-ref`, then `purl`, then a hash of the component name.
#[must_use]
pub fn extract_cyclonedx(root: &Map<String, Value>, source: &str) -> CdxDocument {
    let empty = Map::new();
    let metadata = root
        .get("metadata")
        .and_then(Value::as_object)
        .unwrap_or(&empty);
    let main_component = metadata
        .get("component")
        .and_then(Value::as_object)
        .unwrap_or(&empty);

    let mut record = pick_fields(root, CDX_HEADER_FIELDS);
    for (field, value) in pick_fields(metadata, CDX_METADATA_FIELDS).iter() {
        record.insert(field, value.clone());
    }
    for (field, target) in [("name", "name_com"), ("version", "version_com"), ("bom-ref", "bom-ref")] {
        let value = main_component
            .get(field)
            .cloned()
            .map_or(FieldValue::NotExtracted, FieldValue::from);
        record.insert(target, value);
    }

    CdxDocument {
        metadata: Section::Present(record),
        components: collect_items(
            root.get("components"),
            CDX_COMPONENT_FIELDS,
            component_key,
            source,
            "Components",
        ),
    }
}

fn component_key(item: &Map<String, Value>) -> Option<String> {
    let text = |field: &str| item.get(field).and_then(Value::as_str).map(str::to_string);
    text("bom-ref")
        .or_else(|| text("purl"))
        .or_else(|| text("name").map(|name| content_key(&name)))
}
