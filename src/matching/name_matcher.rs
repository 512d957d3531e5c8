//! Greedy name-based correspondence between two record sets.
//!
//! One pass over the left set in source order. Each left record takes the
//! first right record (in source order) with the same normalized name, and
//! that name is then excluded for the rest of the pass. Duplicate names on
//! either side collapse to the first pairing, so every record takes part in
//! at most one pair.

use super::normalize::NameKind;
use crate::model::RecordSet;
use indexmap::IndexSet;
use std::collections::HashMap;

/// Indices of a matched record in the left and right sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatchPair {
    pub left: usize,
    pub right: usize,
}

/// Result of one name matching pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchOutcome {
    /// Pairs in left source order.
    pub pairs: Vec<MatchPair>,
    /// Normalized names consumed by the pass, in pairing order.
    pub excluded: IndexSet<String>,
}

impl MatchOutcome {
    /// Number of matched pairs.
    #[must_use]
    pub fn matched(&self) -> usize {
        self.pairs.len()
    }
}

/// Pairs records of two sets by normalized name.
#[derive(Debug, Clone, Copy)]
pub struct NameMatcher {
    field: &'static str,
    kind: NameKind,
}

impl NameMatcher {
    /// Matcher over the given name field.
    #[must_use]
    pub const fn new(field: &'static str, kind: NameKind) -> Self {
        Self { field, kind }
    }

    /// Run the pass.
    #[must_use]
    pub fn match_sets(&self, left: &RecordSet, right: &RecordSet) -> MatchOutcome {
        // First right index per normalized name.
        let mut first_right: HashMap<String, usize> = HashMap::with_capacity(right.len());
        for (index, record) in right.records().enumerate() {
            if let Some(name) = record.name(self.field) {
                first_right
                    .entry(self.kind.normalize(name))
                    .or_insert(index);
            }
        }

        let mut outcome = MatchOutcome::default();
        for (index, record) in left.records().enumerate() {
            let Some(name) = record.name(self.field) else {
                continue;
            };
            let normalized = self.kind.normalize(name);
            if outcome.excluded.contains(&normalized) {
                continue;
            }
            if let Some(&right_index) = first_right.get(&normalized) {
                outcome.pairs.push(MatchPair {
                    left: index,
                    right: right_index,
                });
                outcome.excluded.insert(normalized);
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Record;

    fn set(names: &[&str]) -> RecordSet {
        names
            .iter()
            .enumerate()
            .fold(RecordSet::new(), |set, (i, name)| {
                set.with(format!("key-{i}"), Record::new().with("name", *name))
            })
    }

    fn packages() -> NameMatcher {
        NameMatcher::new("name", NameKind::Package)
    }

    #[test]
    fn test_pairs_by_normalized_name() {
        let outcome = packages().match_sets(
            &set(&["pkg:npm/lodash", "react"]),
            &set(&["React", "npm:lodash"]),
        );
        assert_eq!(
            outcome.pairs,
            vec![
                MatchPair { left: 0, right: 1 },
                MatchPair { left: 1, right: 0 }
            ]
        );
        assert!(outcome.excluded.contains("lodash"));
        assert!(outcome.excluded.contains("react"));
    }

    #[test]
    fn test_duplicates_collapse_to_first_pairing() {
        let outcome = packages().match_sets(&set(&["a", "A", "b"]), &set(&["a", "a", "b"]));
        assert_eq!(
            outcome.pairs,
            vec![
                MatchPair { left: 0, right: 0 },
                MatchPair { left: 2, right: 2 }
            ]
        );
        assert_eq!(outcome.matched(), 2);
    }

    #[test]
    fn test_absent_names_never_match() {
        let left = set(&["NOASSERTION", "", "NE"]);
        let right = set(&["NOASSERTION", "", "NE"]);
        assert_eq!(packages().match_sets(&left, &right).matched(), 0);

        let nameless = RecordSet::new().with("x", Record::new());
        assert_eq!(packages().match_sets(&nameless, &nameless).matched(), 0);
    }

    #[test]
    fn test_file_paths_strip_prefix() {
        let files = NameMatcher::new("name", NameKind::FilePath);
        let outcome = files.match_sets(&set(&["./src/lib.rs"]), &set(&["/src/lib.rs"]));
        assert_eq!(outcome.matched(), 1);
    }

    #[test]
    fn test_deterministic() {
        let left = set(&["x", "y", "z", "y"]);
        let right = set(&["z", "y", "x"]);
        let first = packages().match_sets(&left, &right);
        let second = packages().match_sets(&left, &right);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_sets() {
        let outcome = packages().match_sets(&RecordSet::new(), &set(&["a"]));
        assert!(outcome.pairs.is_empty());
        assert!(outcome.excluded.is_empty());
    }
}
