//! Cross-tool matching engine.
//!
//! The engine pairs items reported by two tools for the same repository and
//! scores each field of a pair with a comparator suited to its data shape.
//!
//! # Architecture
//!
//! - [`normalize`]: name normalization and percent decoding
//! - [`comparators`]: field comparators with the three-tier sentinel convention
//! - [`name_matcher`]: greedy first-in-source-order correspondence
//! - [`records`]: per-category matchers producing score vectors and statistics
//!
//! # Example
//!
//! ```
//! use sbom_consistency::matching::comparators::version_consistency;
//! use sbom_consistency::model::FieldValue;
//!
//! let score = version_consistency(&FieldValue::from("1.2.3"), &FieldValue::from("v1.2.3"));
//! assert_eq!(score, 1.0);
//! ```

pub mod comparators;
mod config;
pub mod name_matcher;
pub mod normalize;
pub mod records;
pub mod string_similarity;

pub use comparators::{Checksum, Comparator, SCORE_BOTH_EMPTY};
pub use config::{DEFAULT_MAX_FILES, MatchingOptions, VersionRangeMode};
pub use name_matcher::{MatchOutcome, MatchPair, NameMatcher};
pub use normalize::{NameKind, names_match, normalize_name, paths_match};
pub use records::{
    CDX_COMPONENT_FIELDS, CategoryMatch, CategoryStats, FieldComparison, PairScores,
    SPDX_PACKAGE_FIELDS, SpdxPackageMatch, match_cdx_components, match_cdx_metadata,
    match_spdx_files, match_spdx_packages,
};
