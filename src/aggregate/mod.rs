//! Score aggregation.
//!
//! Reduces the per-pair score vectors of one comparison unit into column
//! means and routes vectors carrying a both-empty sentinel to the audit
//! channel.

use crate::matching::PairScores;
use crate::model::Standard;
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Ordered per-field scores of one matched pair.
pub type ScoreVector = Vec<f64>;

/// How a both-empty (`-1`) score enters the column mean.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum AggregationPolicy {
    /// Absolute value: agreement on absence counts as `1`.
    #[default]
    Absolute,
    /// Dropped from the column's denominator.
    Exclude,
}

/// Scope of one comparison: standard, tool pair, repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct UnitContext {
    pub standard: Standard,
    pub tool1: String,
    pub tool2: String,
    pub repository: String,
}

impl UnitContext {
    /// Create a context.
    pub fn new(
        standard: Standard,
        tool1: impl Into<String>,
        tool2: impl Into<String>,
        repository: impl Into<String>,
    ) -> Self {
        Self {
            standard,
            tool1: tool1.into(),
            tool2: tool2.into(),
            repository: repository.into(),
        }
    }
}

/// A score vector with at least one sentinel, kept with its raw scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditRecord {
    pub standard: Standard,
    pub tool1: String,
    pub tool2: String,
    pub repository: String,
    pub item_name: String,
    pub scores: ScoreVector,
}

/// Column means of a category plus its audit records.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Aggregation {
    pub means: ScoreVector,
    pub audits: Vec<AuditRecord>,
}

/// Reduces score vectors under an [`AggregationPolicy`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Aggregator {
    policy: AggregationPolicy,
}

impl Aggregator {
    /// Create an aggregator.
    #[must_use]
    pub const fn new(policy: AggregationPolicy) -> Self {
        Self { policy }
    }

    /// The configured policy.
    #[must_use]
    pub const fn policy(&self) -> AggregationPolicy {
        self.policy
    }

    /// Reduce the vectors of one category.
    ///
    /// `width` is the number of columns; with no vectors the result is one
    /// all-zero placeholder row averaged on its own.
    #[must_use]
    pub fn reduce(&self, context: &UnitContext, vectors: &[PairScores], width: usize) -> Aggregation {
        let audits = vectors
            .iter()
            .filter(|v| v.scores.iter().any(|s| *s < 0.0))
            .map(|v| AuditRecord {
                standard: context.standard,
                tool1: context.tool1.clone(),
                tool2: context.tool2.clone(),
                repository: context.repository.clone(),
                item_name: v.item_name.clone(),
                scores: v.scores.clone(),
            })
            .collect();

        let placeholder = [vec![0.0; width]];
        let rows: Vec<&[f64]> = if vectors.is_empty() {
            placeholder.iter().map(Vec::as_slice).collect()
        } else {
            vectors.iter().map(|v| v.scores.as_slice()).collect()
        };

        Aggregation {
            means: self.column_means(&rows, width),
            audits,
        }
    }

    /// Column means of score rows. Rows shorter than `width` contribute
    /// nothing to the missing columns.
    #[must_use]
    pub fn column_means(&self, rows: &[&[f64]], width: usize) -> ScoreVector {
        (0..width)
            .map(|column| {
                let (sum, count) = rows
                    .iter()
                    .filter_map(|row| row.get(column).copied())
                    .filter_map(|score| self.contribution(score))
                    .fold((0.0, 0usize), |(sum, count), s| (sum + s, count + 1));
                if count == 0 { 0.0 } else { sum / count as f64 }
            })
            .collect()
    }

    fn contribution(&self, score: f64) -> Option<f64> {
        match self.policy {
            AggregationPolicy::Absolute => Some(score.abs()),
            AggregationPolicy::Exclude if score < 0.0 => None,
            AggregationPolicy::Exclude => Some(score),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> UnitContext {
        UnitContext::new(Standard::CycloneDx, "syft", "cdxgen", "acme")
    }

    fn pair(name: &str, scores: &[f64]) -> PairScores {
        PairScores {
            item_name: name.to_string(),
            scores: scores.to_vec(),
        }
    }

    #[test]
    fn test_absolute_policy_counts_both_empty_as_agreement() {
        let vectors = [pair("a", &[1.0, -1.0]), pair("b", &[0.5, 0.0])];
        let result = Aggregator::default().reduce(&context(), &vectors, 2);
        assert_eq!(result.means, vec![0.75, 0.5]);
    }

    #[test]
    fn test_exclude_policy_drops_sentinels() {
        let vectors = [pair("a", &[1.0, -1.0]), pair("b", &[0.5, 0.0])];
        let result = Aggregator::new(AggregationPolicy::Exclude).reduce(&context(), &vectors, 2);
        assert_eq!(result.means, vec![0.75, 0.0]);

        let all_empty = [pair("a", &[-1.0]), pair("b", &[-1.0])];
        let result = Aggregator::new(AggregationPolicy::Exclude).reduce(&context(), &all_empty, 1);
        assert_eq!(result.means, vec![0.0]);
    }

    #[test]
    fn test_sentinel_vectors_are_audited_raw() {
        let vectors = [pair("lodash", &[1.0, -1.0]), pair("react", &[1.0, 1.0])];
        let result = Aggregator::default().reduce(&context(), &vectors, 2);
        assert_eq!(result.audits.len(), 1);
        let audit = &result.audits[0];
        assert_eq!(audit.item_name, "lodash");
        assert_eq!(audit.scores, vec![1.0, -1.0]);
        assert_eq!(audit.tool1, "syft");
        assert_eq!(audit.repository, "acme");
    }

    #[test]
    fn test_no_vectors_yield_placeholder() {
        let result = Aggregator::default().reduce(&context(), &[], 5);
        assert_eq!(result.means, vec![0.0; 5]);
        assert!(result.audits.is_empty());
    }

    #[test]
    fn test_reduce_is_pure() {
        let vectors = [pair("a", &[0.3, -1.0, 1.0]), pair("b", &[0.9, 0.2, 0.0])];
        let aggregator = Aggregator::default();
        let first = aggregator.reduce(&context(), &vectors, 3);
        let second = aggregator.reduce(&context(), &vectors, 3);
        assert_eq!(first, second);
    }
}
