//! Field values and the absence classifier.
//!
//! Canonical documents carry three distinct kinds of "missing": the
//! extraction sentinel `NE`, the standards' own null markers (`NONE`,
//! `NOASSERTION`, JSON `null`), and the empty string. Comparators decide
//! their sentinel tier from [`Absence`] before looking at the content.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;

/// Sentinel written by extraction when a field was not present in the source.
pub const NOT_EXTRACTED: &str = "NE";

/// Null markers defined by the SBOM standards.
pub const NULL_MARKERS: &[&str] = &["NONE", "NOASSERTION"];

/// A single field value of a canonical record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldValue {
    /// The field was not extracted (`NE`).
    #[default]
    NotExtracted,
    /// JSON `null` in the source document.
    Null,
    /// A plain string, including the `NONE`/`NOASSERTION` markers and `""`.
    Text(String),
    /// Any non-string JSON value (lists, objects, numbers, booleans).
    Structured(Value),
}

/// Absence classification of a [`FieldValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Absence {
    /// A usable value.
    Present,
    /// A null marker, JSON null, or the empty string.
    Empty,
    /// The `NE` sentinel.
    NotExtracted,
}

impl FieldValue {
    /// Build a text value.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Classify the value for the comparator sentinel tiers.
    #[must_use]
    pub fn absence(&self) -> Absence {
        match self {
            Self::NotExtracted => Absence::NotExtracted,
            Self::Null => Absence::Empty,
            Self::Text(s) if s.is_empty() || NULL_MARKERS.contains(&s.as_str()) => Absence::Empty,
            Self::Text(_) | Self::Structured(_) => Absence::Present,
        }
    }

    /// Whether the value is empty in the null-marker sense.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.absence() == Absence::Empty
    }

    /// Whether the value is the `NE` sentinel.
    #[must_use]
    pub fn is_not_extracted(&self) -> bool {
        matches!(self, Self::NotExtracted)
    }

    /// Whether the value carries content.
    #[must_use]
    pub fn is_present(&self) -> bool {
        self.absence() == Absence::Present
    }

    /// The string content, if this is a text value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Textual form used by string comparators.
    ///
    /// Structured values compare by their compact JSON rendering.
    #[must_use]
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Self::Text(s) => Cow::Borrowed(s.as_str()),
            Self::Structured(v) => Cow::Owned(v.to_string()),
            Self::Null => Cow::Borrowed(""),
            Self::NotExtracted => Cow::Borrowed(NOT_EXTRACTED),
        }
    }

    /// The underlying structured value, if any.
    #[must_use]
    pub fn as_structured(&self) -> Option<&Value> {
        match self {
            Self::Structured(v) => Some(v),
            _ => None,
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::String(s) if s == NOT_EXTRACTED => Self::NotExtracted,
            Value::String(s) => Self::Text(s),
            other => Self::Structured(other),
        }
    }
}

impl From<&FieldValue> for Value {
    fn from(value: &FieldValue) -> Self {
        match value {
            FieldValue::NotExtracted => Self::String(NOT_EXTRACTED.to_string()),
            FieldValue::Null => Self::Null,
            FieldValue::Text(s) => Self::String(s.clone()),
            FieldValue::Structured(v) => v.clone(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Value::String(value.to_string()).into()
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Value::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_text())
    }
}
