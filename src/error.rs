//! Unified error types for sbom-consistency.
//!
//! This module provides the error hierarchy for the library, with
//! enough context to report a skipped document or unit and keep going.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for sbom-consistency operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ConsistencyError {
    /// Errors while parsing canonical or raw documents
    #[error("Failed to parse document: {context}")]
    Parse {
        context: String,
        #[source]
        source: ParseErrorKind,
    },

    /// Errors while extracting a raw SBOM
    #[error("Extraction failed: {context}")]
    Extraction {
        context: String,
        #[source]
        source: ExtractErrorKind,
    },

    /// Errors while writing output tables
    #[error("Report output failed: {context}")]
    Report {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Specific parse error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ParseErrorKind {
    #[error("Unknown SBOM standard: {0} (expected spdx or cdx)")]
    UnknownStandard(String),

    #[error("File name must follow <standard>#<tool>#<repository>: {0}")]
    InvalidFileName(String),

    #[error("Invalid JSON structure: {0}")]
    InvalidJson(String),
}

/// Specific extraction error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ExtractErrorKind {
    #[error("Document root is not a JSON object")]
    NotAnObject,

    #[error("Serialization of canonical document failed: {0}")]
    Serialize(String),
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for sbom-consistency operations
pub type Result<T> = std::result::Result<T, ConsistencyError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl ConsistencyError {
    /// Create a parse error with context
    pub fn parse(context: impl Into<String>, source: ParseErrorKind) -> Self {
        Self::Parse {
            context: context.into(),
            source,
        }
    }

    /// Create an extraction error with context
    pub fn extraction(context: impl Into<String>, source: ExtractErrorKind) -> Self {
        Self::Extraction {
            context: context.into(),
            source,
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: Some(path.into()),
            message: message.into(),
            source,
        }
    }

    /// Create a report output error
    pub fn report(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Report {
            context: context.into(),
            source,
        }
    }
}
