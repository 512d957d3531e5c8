//! Record-set matchers.
//!
//! Each matcher runs the name matcher over one category of two canonical
//! documents and scores every pair with the category's comparator table.

use super::comparators::{Comparator, checksum_set_consistency, checksums_from, name_similarity};
use super::config::MatchingOptions;
use super::name_matcher::{MatchPair, NameMatcher};
use super::normalize::{NameKind, normalize_name};
use crate::model::{FieldValue, Record, RecordSet, Section};
use serde::Serialize;

/// One scored field of a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldComparison {
    /// Field name in the canonical record.
    pub field: &'static str,
    /// Output column name.
    pub column: &'static str,
    pub comparator: Comparator,
}

impl FieldComparison {
    const fn new(field: &'static str, column: &'static str, comparator: Comparator) -> Self {
        Self {
            field,
            column,
            comparator,
        }
    }
}

/// `CycloneDX` component fields, in output column order.
pub const CDX_COMPONENT_FIELDS: &[FieldComparison] = &[
    FieldComparison::new("author", "author_score", Comparator::Text),
    FieldComparison::new("type", "type_score", Comparator::Exact),
    FieldComparison::new("purl", "purl_score", Comparator::Substring),
    FieldComparison::new("cpe", "cpe_score", Comparator::Substring),
    FieldComparison::new("version", "version_score", Comparator::Version),
];

/// SPDX package fields, in output column order.
pub const SPDX_PACKAGE_FIELDS: &[FieldComparison] = &[
    FieldComparison::new("originator", "originator_score", Comparator::Text),
    FieldComparison::new("supplier", "supplier_score", Comparator::Text),
    FieldComparison::new("copyrightText", "copyright_score", Comparator::Text),
    FieldComparison::new("versionInfo", "version_score", Comparator::Version),
    FieldComparison::new(
        "packageVerificationCode",
        "PVC_score",
        Comparator::VerificationCode,
    ),
    FieldComparison::new("downloadLocation", "dL_score", Comparator::Substring),
];

/// Name field of packages and components.
pub const NAME_FIELD: &str = "name";
/// Name field of SPDX files.
pub const FILE_NAME_FIELD: &str = "fileName";
/// Width of the SPDX repository-level vector.
pub const SPDX_REPO_WIDTH: usize = 7;
/// Width of the `CycloneDX` metadata vector.
pub const CDX_METADATA_WIDTH: usize = 2;

/// Coverage statistics of one category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryStats {
    pub size1: usize,
    pub size2: usize,
    pub matched: usize,
}

impl CategoryStats {
    /// Statistics as output cells, in `size1, size2, matched` order.
    #[must_use]
    pub const fn as_array(&self) -> [usize; 3] {
        [self.size1, self.size2, self.matched]
    }
}

/// Score vector of one matched pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairScores {
    /// Name of the left-hand record, used to key audit rows.
    pub item_name: String,
    pub scores: Vec<f64>,
}

/// Per-category result: statistics and one vector per matched pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoryMatch {
    pub stats: CategoryStats,
    pub vectors: Vec<PairScores>,
}

/// SPDX package matching result, including the repository-level vector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpdxPackageMatch {
    pub packages: CategoryMatch,
    pub repository: Vec<f64>,
}

/// Score two records over a comparator table.
#[must_use]
pub fn score_fields(
    fields: &[FieldComparison],
    left: &Record,
    right: &Record,
    options: &MatchingOptions,
) -> Vec<f64> {
    fields
        .iter()
        .map(|f| {
            f.comparator
                .score(left.get(f.field), right.get(f.field), options.version_ranges)
        })
        .collect()
}

/// Records of a matched pair. Indices always come from the same sets the
/// matcher ran over.
fn pair_records<'a>(
    left: &'a RecordSet,
    right: &'a RecordSet,
    pair: MatchPair,
) -> Option<(&'a Record, &'a Record)> {
    let (_, a) = left.get_index(pair.left)?;
    let (_, b) = right.get_index(pair.right)?;
    Some((a, b))
}

fn item_name(record: &Record, field: &str) -> String {
    record.get(field).as_text().into_owned()
}

/// Match `CycloneDX` components and score the component fields.
#[must_use]
pub fn match_cdx_components(
    left: &Section<RecordSet>,
    right: &Section<RecordSet>,
    options: &MatchingOptions,
) -> CategoryMatch {
    let (Some(left), Some(right)) = (left.as_present(), right.as_present()) else {
        return CategoryMatch::default();
    };

    let outcome = NameMatcher::new(NAME_FIELD, NameKind::Package).match_sets(left, right);
    let vectors = outcome
        .pairs
        .iter()
        .filter_map(|&pair| pair_records(left, right, pair))
        .map(|(a, b)| PairScores {
            item_name: item_name(a, NAME_FIELD),
            scores: score_fields(CDX_COMPONENT_FIELDS, a, b, options),
        })
        .collect();

    CategoryMatch {
        stats: CategoryStats {
            size1: left.len(),
            size2: right.len(),
            matched: outcome.matched(),
        },
        vectors,
    }
}

/// Compare `CycloneDX` metadata: name similarity of the main component and
/// its version consistency.
#[must_use]
pub fn match_cdx_metadata(
    left: &Section<Record>,
    right: &Section<Record>,
    options: &MatchingOptions,
) -> Vec<f64> {
    let (Some(left), Some(right)) = (left.as_present(), right.as_present()) else {
        return vec![0.0; CDX_METADATA_WIDTH];
    };
    vec![
        name_similarity(left.get("name_com"), right.get("name_com")),
        Comparator::Version.score(
            left.get("version_com"),
            right.get("version_com"),
            options.version_ranges,
        ),
    ]
}

/// Match SPDX packages.
///
/// The pair whose two names both normalize to the repository name is the
/// repository's own package: its scores, prefixed by the document-name
/// similarity, form the repository-level vector and are kept out of the
/// package vectors. It still counts as matched.
#[must_use]
pub fn match_spdx_packages(
    left: (&Section<Record>, &Section<RecordSet>),
    right: (&Section<Record>, &Section<RecordSet>),
    repository: &str,
    options: &MatchingOptions,
) -> SpdxPackageMatch {
    let mut result = SpdxPackageMatch {
        packages: CategoryMatch::default(),
        repository: vec![0.0; SPDX_REPO_WIDTH],
    };
    let (Some(left_packages), Some(right_packages)) = (left.1.as_present(), right.1.as_present())
    else {
        return result;
    };

    let outcome =
        NameMatcher::new(NAME_FIELD, NameKind::Package).match_sets(left_packages, right_packages);
    let repository_name = normalize_name(repository);
    let mut self_found = false;

    for (a, b) in outcome
        .pairs
        .iter()
        .filter_map(|&pair| pair_records(left_packages, right_packages, pair))
    {
        let scores = score_fields(SPDX_PACKAGE_FIELDS, a, b, options);
        if !self_found && is_self_package(a, b, &repository_name) {
            self_found = true;
            let doc_name = name_similarity(document_name(left.0), document_name(right.0));
            result.repository = std::iter::once(doc_name).chain(scores).collect();
            continue;
        }
        result.packages.vectors.push(PairScores {
            item_name: item_name(a, NAME_FIELD),
            scores,
        });
    }

    result.packages.stats = CategoryStats {
        size1: left_packages.len(),
        size2: right_packages.len(),
        matched: outcome.matched(),
    };
    result
}

fn is_self_package(a: &Record, b: &Record, repository_name: &str) -> bool {
    let normalized = |r: &Record| r.name(NAME_FIELD).map(normalize_name);
    normalized(a).as_deref() == Some(repository_name)
        && normalized(b).as_deref() == Some(repository_name)
}

fn document_name(documents: &Section<Record>) -> &FieldValue {
    static MISSING: FieldValue = FieldValue::NotExtracted;
    documents
        .as_present()
        .map_or(&MISSING, |record| record.get(NAME_FIELD))
}

/// Match SPDX files by path and score their checksum sets.
///
/// Skipped when either side holds more files than the configured cap; the
/// real sizes are still reported.
#[must_use]
pub fn match_spdx_files(
    left: &Section<RecordSet>,
    right: &Section<RecordSet>,
    options: &MatchingOptions,
) -> CategoryMatch {
    let (Some(left), Some(right)) = (left.as_present(), right.as_present()) else {
        return CategoryMatch::default();
    };

    if left.len() > options.max_files || right.len() > options.max_files {
        tracing::warn!(
            "Too many files ({} / {}), skipping file matching (cap {})",
            left.len(),
            right.len(),
            options.max_files
        );
        return CategoryMatch {
            stats: CategoryStats {
                size1: left.len(),
                size2: right.len(),
                matched: 0,
            },
            vectors: Vec::new(),
        };
    }

    let outcome = NameMatcher::new(FILE_NAME_FIELD, NameKind::FilePath).match_sets(left, right);
    let vectors = outcome
        .pairs
        .iter()
        .filter_map(|&pair| pair_records(left, right, pair))
        .map(|(a, b)| {
            let score = checksum_set_consistency(
                &checksums_from(a.get("checksums")),
                &checksums_from(b.get("checksums")),
            );
            let name = item_name(a, FILE_NAME_FIELD);
            if score < 1.0 {
                tracing::debug!("[DiffChecksum]: {} ({})", name, score);
            } else {
                tracing::debug!("[SameChecksum]: {}", name);
            }
            PairScores {
                item_name: name,
                scores: vec![score],
            }
        })
        .collect();

    CategoryMatch {
        stats: CategoryStats {
            size1: left.len(),
            size2: right.len(),
            matched: outcome.matched(),
        },
        vectors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn component(name: &str, version: &str) -> Record {
        Record::new()
            .with("name", name)
            .with("author", "NE")
            .with("type", "library")
            .with("purl", "NE")
            .with("cpe", "NE")
            .with("version", version)
    }

    fn file(path: &str, sha1: &str) -> Record {
        Record::new()
            .with("fileName", path)
            .with("checksums", FieldValue::from(json!([{"algorithm": "SHA1", "checksumValue": sha1}])))
    }

    fn files(count: usize) -> RecordSet {
        (0..count).fold(RecordSet::new(), |set, i| {
            set.with(format!("SPDXRef-File-{i}"), file(&format!("./f{i}.txt"), "abc"))
        })
    }

    #[test]
    fn test_cdx_components_lodash() {
        let left = Section::Present(RecordSet::new().with("a", component("pkg:npm/lodash", "4.17.21")));
        let right = Section::Present(RecordSet::new().with("b", component("npm:lodash", "4.17.21")));
        let result = match_cdx_components(&left, &right, &MatchingOptions::default());

        assert_eq!(result.stats, CategoryStats { size1: 1, size2: 1, matched: 1 });
        assert_eq!(result.vectors.len(), 1);
        let scores = &result.vectors[0].scores;
        assert_eq!(scores.len(), CDX_COMPONENT_FIELDS.len());
        assert_eq!(scores[4], 1.0);
        assert_eq!(scores[1], 1.0);
        assert_eq!(scores[0], 0.0);
    }

    #[test]
    fn test_cdx_components_not_extracted() {
        let right = Section::Present(RecordSet::new().with("b", component("x", "1")));
        let result = match_cdx_components(&Section::NotExtracted, &right, &MatchingOptions::default());
        assert_eq!(result.stats, CategoryStats::default());
        assert!(result.vectors.is_empty());
    }

    #[test]
    fn test_cdx_metadata() {
        let meta = Section::Present(
            Record::new().with("name_com", "acme").with("version_com", "1.0.0"),
        );
        assert_eq!(match_cdx_metadata(&meta, &meta, &MatchingOptions::default()), vec![1.0, 1.0]);
        assert_eq!(
            match_cdx_metadata(&meta, &Section::NotExtracted, &MatchingOptions::default()),
            vec![0.0, 0.0]
        );
    }

    #[test]
    fn test_spdx_self_package_feeds_repository_vector() {
        let docs = Section::Present(Record::new().with("name", "acme"));
        let packages = Section::Present(
            RecordSet::new()
                .with(
                    "SPDXRef-root",
                    Record::new().with("name", "Acme").with("versionInfo", "2.0"),
                )
                .with(
                    "SPDXRef-dep",
                    Record::new().with("name", "left-pad").with("versionInfo", "1.3.0"),
                ),
        );
        let result = match_spdx_packages(
            (&docs, &packages),
            (&docs, &packages),
            "acme",
            &MatchingOptions::default(),
        );

        assert_eq!(result.packages.stats.matched, 2);
        assert_eq!(result.packages.vectors.len(), 1);
        assert_eq!(result.packages.vectors[0].item_name, "left-pad");
        assert_eq!(result.repository.len(), SPDX_REPO_WIDTH);
        assert_eq!(result.repository[0], 1.0);
        assert_eq!(result.repository[4], 1.0);
        // Fields the records never carried are NE on both sides.
        assert_eq!(result.repository[1], 0.0);
    }

    #[test]
    fn test_spdx_without_self_package_keeps_default_vector() {
        let docs = Section::Present(Record::new().with("name", "acme"));
        let packages = Section::Present(
            RecordSet::new().with("p", Record::new().with("name", "other")),
        );
        let result = match_spdx_packages(
            (&docs, &packages),
            (&docs, &packages),
            "acme",
            &MatchingOptions::default(),
        );
        assert_eq!(result.repository, vec![0.0; SPDX_REPO_WIDTH]);
        assert_eq!(result.packages.vectors.len(), 1);
    }

    #[test]
    fn test_spdx_packages_not_extracted() {
        let docs = Section::Present(Record::new());
        let packages = Section::Present(RecordSet::new().with("p", Record::new().with("name", "x")));
        let result = match_spdx_packages(
            (&docs, &Section::NotExtracted),
            (&docs, &packages),
            "x",
            &MatchingOptions::default(),
        );
        assert_eq!(result.packages.stats, CategoryStats::default());
        assert_eq!(result.repository, vec![0.0; SPDX_REPO_WIDTH]);
    }

    #[test]
    fn test_spdx_files_matched_by_path() {
        let left = Section::Present(RecordSet::new().with("a", file("./src/lib.rs", "abc")));
        let right = Section::Present(
            RecordSet::new()
                .with("b", file("/src/lib.rs", "abc"))
                .with("c", file("README.md", "def")),
        );
        let result = match_spdx_files(&left, &right, &MatchingOptions::default());
        assert_eq!(result.stats, CategoryStats { size1: 1, size2: 2, matched: 1 });
        assert_eq!(result.vectors[0].scores, vec![1.0]);
    }

    #[test]
    fn test_spdx_file_cap() {
        let result = match_spdx_files(
            &Section::Present(files(2500)),
            &Section::Present(files(10)),
            &MatchingOptions::default(),
        );
        assert_eq!(result.stats, CategoryStats { size1: 2500, size2: 10, matched: 0 });
        assert!(result.vectors.is_empty());
    }

    #[test]
    fn test_spdx_file_cap_configurable() {
        let options = MatchingOptions::default().with_max_files(5);
        let result = match_spdx_files(
            &Section::Present(files(6)),
            &Section::Present(files(6)),
            &options,
        );
        assert_eq!(result.stats.matched, 0);

        let options = options.with_max_files(6);
        let result = match_spdx_files(
            &Section::Present(files(6)),
            &Section::Present(files(6)),
            &options,
        );
        assert_eq!(result.stats.matched, 6);
    }
}
