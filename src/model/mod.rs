//! Canonical representation of extracted SBOM documents.
//!
//! Extraction reduces every raw SPDX or `CycloneDX` document to a small,
//! standard-specific set of sections. Each section is either `NE` as a whole
//! or a [`Record`] / [`RecordSet`] whose fields are [`FieldValue`]s. The
//! matching engine only ever reads these structures.

mod document;
mod record;
mod value;

pub use document::{CanonicalDocument, CdxDocument, DocumentId, SpdxDocument, Standard};
pub use record::{Record, RecordSet, Section};
pub use value::{Absence, FieldValue, NOT_EXTRACTED, NULL_MARKERS};
