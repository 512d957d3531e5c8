//! Field comparators.
//!
//! Every comparator follows the same three-tier convention before its own
//! logic runs:
//!
//! 1. both inputs empty (null marker, JSON null, `""`) → [`SCORE_BOTH_EMPTY`]
//! 2. exactly one input empty, or either input `NE` → `0.0`
//! 3. both present → a score in `[0, 1]`, `1.0` meaning exact agreement
//!
//! Comparators are total: no input shape makes them fail.

use super::config::VersionRangeMode;
use super::normalize::percent_decode;
use super::string_similarity::{jaro, longest_common_substring_ratio};
use crate::model::{Absence, FieldValue};
use semver::{Version, VersionReq};
use serde_json::Value;

/// Score for "no assertion on either side".
pub const SCORE_BOTH_EMPTY: f64 = -1.0;

/// Characters that mark a version string as a range expression.
pub const VERSION_RANGE_CHARS: &[char] = &['<', '>', '=', '+', ',', '~', '!', '-'];

/// Positional weights for the leading version components.
const VERSION_WEIGHTS_3: &[f64] = &[0.7, 0.2, 0.1];
const VERSION_WEIGHTS_2: &[f64] = &[0.8, 0.2];
const VERSION_WEIGHTS_1: &[f64] = &[1.0];

/// Resolve tiers 1 and 2. `None` means both values are present.
#[must_use]
pub fn sentinel_tier(a: &FieldValue, b: &FieldValue) -> Option<f64> {
    match (a.absence(), b.absence()) {
        (Absence::Empty, Absence::Empty) => Some(SCORE_BOTH_EMPTY),
        (Absence::Present, Absence::Present) => None,
        _ => Some(0.0),
    }
}

/// Exact match: `1.0` when equal, `0.0` otherwise.
#[must_use]
pub fn equal_cmp(a: &FieldValue, b: &FieldValue) -> f64 {
    if let Some(score) = sentinel_tier(a, b) {
        return score;
    }
    if a == b { 1.0 } else { 0.0 }
}

/// Free-text similarity for author, originator, supplier and copyright
/// fields: identical text scores `1.0`, anything else the Jaro similarity
/// of the percent-decoded strings.
#[must_use]
pub fn text_consistency(a: &FieldValue, b: &FieldValue) -> f64 {
    if let Some(score) = sentinel_tier(a, b) {
        return score;
    }
    let (text_a, text_b) = (a.as_text(), b.as_text());
    if text_a == text_b {
        return 1.0;
    }
    jaro(&percent_decode(&text_a), &percent_decode(&text_b))
}

/// Jaro similarity of names without decoding, for document-level names.
#[must_use]
pub fn name_similarity(a: &FieldValue, b: &FieldValue) -> f64 {
    if let Some(score) = sentinel_tier(a, b) {
        return score;
    }
    jaro(&a.as_text(), &b.as_text())
}

/// Substring overlap for structured identifiers (purl, cpe, download
/// location): longest common substring of the decoded strings over the
/// longer string's length.
#[must_use]
pub fn longest_common_substring_consistency_score(a: &FieldValue, b: &FieldValue) -> f64 {
    if let Some(score) = sentinel_tier(a, b) {
        return score;
    }
    let (text_a, text_b) = (a.as_text(), b.as_text());
    if text_a == text_b {
        return 1.0;
    }
    longest_common_substring_ratio(&percent_decode(&text_a), &percent_decode(&text_b))
}

/// Hierarchical version comparison with legacy range handling.
#[must_use]
pub fn version_consistency(a: &FieldValue, b: &FieldValue) -> f64 {
    version_consistency_with(a, b, VersionRangeMode::Legacy)
}

/// Hierarchical version comparison.
///
/// Up to three leading dot-separated components are compared with
/// positional weights. A component is only compared when the previous one
/// earned its full weight, so the score rewards agreement on a prefix.
#[must_use]
pub fn version_consistency_with(a: &FieldValue, b: &FieldValue, mode: VersionRangeMode) -> f64 {
    if let Some(score) = sentinel_tier(a, b) {
        return score;
    }
    let (raw_a, raw_b) = (a.as_text(), b.as_text());
    if raw_a == raw_b {
        return 1.0;
    }

    let version_a = normalize_version(&raw_a);
    let version_b = normalize_version(&raw_b);
    if version_a == version_b {
        return 1.0;
    }

    if version_a.contains(VERSION_RANGE_CHARS) || version_b.contains(VERSION_RANGE_CHARS) {
        tracing::debug!("[SpecialChar]: {}||{}", version_a, version_b);
        if mode == VersionRangeMode::Semver
            && let Some(score) = semver_range_score(&version_a, &version_b)
        {
            return score;
        }
    }

    let parts_a: Vec<&str> = version_a.split('.').collect();
    let parts_b: Vec<&str> = version_b.split('.').collect();
    let weights = match parts_a.len().min(parts_b.len()) {
        1 => VERSION_WEIGHTS_1,
        2 => VERSION_WEIGHTS_2,
        _ => VERSION_WEIGHTS_3,
    };

    let mut total = 0.0;
    for (i, &weight) in weights.iter().enumerate() {
        let score = version_component_score(parts_a[i], parts_b[i], weight);
        total += score;
        if score != weight {
            break;
        }
    }
    total
}

/// Trim, drop interior spaces, and strip one leading `v`/`V`.
fn normalize_version(version: &str) -> String {
    let compact: String = version.trim().chars().filter(|c| *c != ' ').collect();
    compact
        .strip_prefix(['v', 'V'])
        .map_or_else(|| compact.clone(), str::to_string)
}

fn version_component_score(a: &str, b: &str, weight: f64) -> f64 {
    if a == b {
        return weight;
    }
    if let (Some(num_a), Some(num_b)) = (parse_numeric(a), parse_numeric(b)) {
        let max = num_a.max(num_b);
        if max == 0 {
            return weight;
        }
        let distance = num_a.abs_diff(num_b) as f64 / max as f64;
        return weight * (1.0 - distance);
    }
    weight * jaro(a, b)
}

fn parse_numeric(component: &str) -> Option<u128> {
    if component.is_empty() || !component.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    component.parse().ok()
}

/// Score a concrete version against a requirement, in either direction.
fn semver_range_score(a: &str, b: &str) -> Option<f64> {
    const OPERATORS: &[char] = &['<', '>', '=', '~', '^', '*', ','];

    [(a, b), (b, a)].into_iter().find_map(|(range, concrete)| {
        if !range.contains(OPERATORS) || concrete.contains(OPERATORS) {
            return None;
        }
        let requirement = VersionReq::parse(range).ok()?;
        let version = Version::parse(concrete).ok()?;
        Some(if requirement.matches(&version) { 1.0 } else { 0.0 })
    })
}

/// Reduce an SPDX `packageVerificationCode` to the code string.
///
/// Accepts a plain string, a single-element list, or the standard object
/// form. Unusable shapes are reported and treated as empty.
#[must_use]
pub fn verification_code(value: &FieldValue) -> FieldValue {
    let Some(structured) = value.as_structured() else {
        return value.clone();
    };
    match structured {
        Value::Array(items) if items.len() == 1 => {
            tracing::debug!("[ListPVC]: {}", structured);
            FieldValue::from(items[0].clone())
        }
        Value::Object(map) if map.contains_key("packageVerificationCodeValue") => {
            FieldValue::from(map["packageVerificationCodeValue"].clone())
        }
        _ => {
            tracing::error!("Invalid packageVerificationCode: {}", structured);
            FieldValue::Null
        }
    }
}

/// Exact match on verification codes after shape reduction.
#[must_use]
pub fn verification_code_consistency(a: &FieldValue, b: &FieldValue) -> f64 {
    equal_cmp(&verification_code(a), &verification_code(b))
}

/// One checksum entry of an SPDX file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checksum {
    pub algorithm: String,
    pub value: FieldValue,
}

impl Checksum {
    /// Create a checksum entry.
    pub fn new(algorithm: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self {
            algorithm: algorithm.into(),
            value: value.into(),
        }
    }
}

/// Read the `checksums` list of a file record. Anything that is not a list
/// of objects yields no entries.
#[must_use]
pub fn checksums_from(value: &FieldValue) -> Vec<Checksum> {
    let Some(Value::Array(items)) = value.as_structured() else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(Value::as_object)
        .map(|entry| Checksum {
            algorithm: entry
                .get("algorithm")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            value: entry
                .get("checksumValue")
                .cloned()
                .map_or(FieldValue::NotExtracted, FieldValue::from),
        })
        .collect()
}

/// Checksum-set consistency of two files.
///
/// A both-empty checksum value counts as agreement here rather than as a
/// sentinel.
#[must_use]
pub fn checksum_set_consistency(a: &[Checksum], b: &[Checksum]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if let ([single_a], [single_b]) = (a, b) {
        return agreement(&single_a.value, &single_b.value);
    }

    let matched: f64 = a
        .iter()
        .flat_map(|ca| b.iter().map(move |cb| (ca, cb)))
        .filter(|(ca, cb)| ca.algorithm == cb.algorithm)
        .map(|(ca, cb)| agreement(&ca.value, &cb.value))
        .sum();
    matched / a.len().max(b.len()) as f64
}

fn agreement(a: &FieldValue, b: &FieldValue) -> f64 {
    let score = equal_cmp(a, b);
    if score < 0.0 { 1.0 } else { score }
}

/// The comparator applied to one field of a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    /// [`equal_cmp`]
    Exact,
    /// [`text_consistency`]
    Text,
    /// [`longest_common_substring_consistency_score`]
    Substring,
    /// [`version_consistency_with`]
    Version,
    /// [`verification_code_consistency`]
    VerificationCode,
}

impl Comparator {
    /// Score two field values.
    #[must_use]
    pub fn score(self, a: &FieldValue, b: &FieldValue, ranges: VersionRangeMode) -> f64 {
        match self {
            Self::Exact => equal_cmp(a, b),
            Self::Text => text_consistency(a, b),
            Self::Substring => longest_common_substring_consistency_score(a, b),
            Self::Version => version_consistency_with(a, b, ranges),
            Self::VerificationCode => verification_code_consistency(a, b),
        }
    }
}
