//! Canonical per-tool documents and their file naming convention.

use super::record::{Record, RecordSet, Section};
use crate::error::{ConsistencyError, ParseErrorKind};
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// SBOM standard of a document.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Standard {
    /// SPDX (`spdx`)
    Spdx,
    /// `CycloneDX` (`cdx`)
    #[value(name = "cdx", alias = "cyclonedx")]
    #[serde(rename = "cdx", alias = "cyclonedx")]
    CycloneDx,
}

impl Standard {
    /// Short tag used in file names and output rows.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Spdx => "spdx",
            Self::CycloneDx => "cdx",
        }
    }

    /// All supported standards, in batch order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::CycloneDx, Self::Spdx]
    }
}

impl fmt::Display for Standard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Standard {
    type Err = ConsistencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "spdx" => Ok(Self::Spdx),
            "cdx" | "cyclonedx" => Ok(Self::CycloneDx),
            _ => Err(ConsistencyError::parse(
                format!("standard '{s}'"),
                ParseErrorKind::UnknownStandard(s.to_string()),
            )),
        }
    }
}

/// Identity of a document, parsed from `<standard>#<tool>#<repository>.json`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DocumentId {
    pub standard: Standard,
    pub tool: String,
    pub repository: String,
}

impl DocumentId {
    /// Create an identifier.
    pub fn new(standard: Standard, tool: impl Into<String>, repository: impl Into<String>) -> Self {
        Self {
            standard,
            tool: tool.into(),
            repository: repository.into(),
        }
    }

    /// Parse the identifier from a file path.
    pub fn from_path(path: &Path) -> Result<Self, ConsistencyError> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = file_name
            .rfind('.')
            .map_or(file_name.as_str(), |dot| &file_name[..dot]);
        Self::from_stem(stem)
    }

    /// Parse the identifier from a file stem (name without extension).
    pub fn from_stem(stem: &str) -> Result<Self, ConsistencyError> {
        let parts: Vec<&str> = stem.split('#').collect();
        let [standard, tool, repository] = parts.as_slice() else {
            return Err(ConsistencyError::parse(
                format!("file name '{stem}'"),
                ParseErrorKind::InvalidFileName(stem.to_string()),
            ));
        };
        Ok(Self::new(standard.parse()?, *tool, *repository))
    }

    /// File name of the canonical document for this identifier.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}#{}#{}.json", self.standard.tag(), self.tool, self.repository)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}#{}", self.standard.tag(), self.tool, self.repository)
    }
}

/// Canonical SPDX document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpdxDocument {
    pub documents: Section<Record>,
    pub packages: Section<RecordSet>,
    pub files: Section<RecordSet>,
}

/// Canonical `CycloneDX` document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CdxDocument {
    pub metadata: Section<Record>,
    pub components: Section<RecordSet>,
}

/// A canonical document of either standard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanonicalDocument {
    Spdx(SpdxDocument),
    CycloneDx(CdxDocument),
}

impl CanonicalDocument {
    /// The document's standard.
    #[must_use]
    pub const fn standard(&self) -> Standard {
        match self {
            Self::Spdx(_) => Standard::Spdx,
            Self::CycloneDx(_) => Standard::CycloneDx,
        }
    }

    /// Parse a canonical document of the given standard from JSON text.
    pub fn from_json(standard: Standard, content: &str) -> Result<Self, serde_json::Error> {
        Ok(match standard {
            Standard::Spdx => Self::Spdx(serde_json::from_str(content)?),
            Standard::CycloneDx => Self::CycloneDx(serde_json::from_str(content)?),
        })
    }

    /// Render as pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        match self {
            Self::Spdx(doc) => serde_json::to_string_pretty(doc),
            Self::CycloneDx(doc) => serde_json::to_string_pretty(doc),
        }
    }
}
