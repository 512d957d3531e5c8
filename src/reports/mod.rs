//! Output of comparison results.
//!
//! - [`csv`]: per tool-pair tables and the audit table written by batch runs
//! - [`SummaryReporter`]: terminal summary of a single unit

pub mod csv;
mod summary;

pub use csv::{CsvSink, audit_header, audit_table_name, package_header, package_table_name};
pub use summary::SummaryReporter;
