//! Canonical records and record sets.

use super::value::{FieldValue, NOT_EXTRACTED};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

static MISSING: FieldValue = FieldValue::NotExtracted;

/// One package, component, file, or document header.
///
/// Lookups of fields the record does not carry yield `NE`, so every record of
/// a category exposes the same field set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: IndexMap<String, FieldValue>,
}

impl Record {
    /// Create an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field setter.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(field, value);
        self
    }

    /// Set a field value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Field value, `NE` when absent.
    #[must_use]
    pub fn get(&self, field: &str) -> &FieldValue {
        self.fields.get(field).unwrap_or(&MISSING)
    }

    /// The record's name as used for matching, if it carries a usable one.
    #[must_use]
    pub fn name(&self, field: &str) -> Option<&str> {
        let value = self.get(field);
        if value.is_present() { value.as_str() } else { None }
    }

    /// Iterate fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Items of one category from one tool, keyed by a stable identifier.
///
/// Iteration order is source order and drives the matcher's tie-breaks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordSet {
    records: IndexMap<String, Record>,
}

impl RecordSet {
    /// Create an empty record set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record. A duplicate key replaces the value but keeps the
    /// original position.
    pub fn insert(&mut self, key: impl Into<String>, record: Record) {
        self.records.insert(key.into(), record);
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, record: Record) -> Self {
        self.insert(key, record);
        self
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record at a source-order index.
    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<(&str, &Record)> {
        self.records.get_index(index).map(|(k, r)| (k.as_str(), r))
    }

    /// Record by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Record> {
        self.records.get(key)
    }

    /// Iterate `(key, record)` in source order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Record)> {
        self.records.iter().map(|(k, r)| (k.as_str(), r))
    }

    /// Iterate records in source order.
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }
}

/// A top-level document section that may be `NE` as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Section<T> {
    /// The section was absent from the source document.
    NotExtracted,
    /// The extracted content.
    Present(T),
}

impl<T> Section<T> {
    /// Content, if present.
    pub const fn as_present(&self) -> Option<&T> {
        match self {
            Self::Present(v) => Some(v),
            Self::NotExtracted => None,
        }
    }

    /// Whether the section is `NE`.
    pub const fn is_not_extracted(&self) -> bool {
        matches!(self, Self::NotExtracted)
    }
}

impl<T> Default for Section<T> {
    fn default() -> Self {
        Self::NotExtracted
    }
}

impl<T> From<Option<T>> for Section<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::NotExtracted, Self::Present)
    }
}

impl<T: Serialize> Serialize for Section<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::NotExtracted => serializer.serialize_str(NOT_EXTRACTED),
            Self::Present(v) => v.serialize(serializer),
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Section<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        match value {
            Value::String(ref s) if s == NOT_EXTRACTED => Ok(Self::NotExtracted),
            Value::Null => Ok(Self::NotExtracted),
            other => serde_json::from_value(other)
                .map(Self::Present)
                .map_err(serde::de::Error::custom),
        }
    }
}
