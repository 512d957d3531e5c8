//! **Cross-tool consistency auditing for Software Bills of Materials.**
//!
//! Different SBOM generators describe the same repository differently.
//! `sbom-consistency` measures how differently: it pairs the packages,
//! components and files two tools report for one repository and scores each
//! field of every pair with a comparator suited to its data shape.
//!
//! ## Modules
//!
//! - **[`model`]**: canonical documents, records, and the field value
//!   classification (`NE`, null markers, present values).
//! - **[`extract`]**: raw SPDX / `CycloneDX` JSON to canonical documents.
//! - **[`matching`]**: name normalization, comparators, the name matcher and
//!   the per-category record-set matchers.
//! - **[`aggregate`]**: column means and the audit channel.
//! - **[`pipeline`]**: single-unit evaluation and the batch driver.
//! - **[`reports`]**: CSV tables and terminal summaries.
//! - **[`config`]**: YAML configuration with validation and JSON schema.
//!
//! ## Comparing two documents
//!
//! ```no_run
//! use std::path::Path;
//! use sbom_consistency::{EvaluationOptions, UnitContext, Standard, evaluate_unit};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let context = UnitContext::new(Standard::CycloneDx, "syft", "cdxgen", "acme");
//!     let outcome = evaluate_unit(
//!         &context,
//!         Path::new("extracted/cdx#syft#acme.json"),
//!         Path::new("extracted/cdx#cdxgen#acme.json"),
//!         &EvaluationOptions::default(),
//!     )?;
//!     println!("{:?}", outcome.row);
//!     Ok(())
//! }
//! ```

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod matching;
pub mod model;
pub mod pipeline;
pub mod reports;
pub mod utils;

pub use aggregate::{AggregationPolicy, Aggregator, AuditRecord, UnitContext};
pub use error::{ConsistencyError, Result};
pub use matching::{MatchingOptions, VersionRangeMode};
pub use model::{CanonicalDocument, DocumentId, FieldValue, Record, RecordSet, Section, Standard};
pub use pipeline::{
    BatchReport, BatchRequest, EvaluationOptions, UnitError, UnitOutcome, evaluate_unit, run_batch,
};
