//! Name normalization for cross-tool item correspondence.
//!
//! Tools disagree on how they spell the same package: some prefix the
//! ecosystem (`npm:lodash`), some emit a package URL (`pkg:npm/lodash`),
//! some percent-encode scopes (`%40angular/core`). Names are compared after
//! reducing all of those spellings to one form.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

/// Ecosystem prefixes and literal spaces removed from names.
static ECOSYSTEM_TOKENS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        "npm:|pip:|go:|actions:|composer:|rust:|ruby:|nuget:|rubygems:|docker:|maven:| ",
    )
    .expect("static ecosystem token pattern is valid")
});

/// Leading package-URL type prefix (`pkg:npm/`).
static PURL_TYPE_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^pkg:[a-z0-9.+\-]+/").expect("static purl prefix pattern is valid")
});

/// Decode `%XX` escapes.
///
/// Decoded bytes are interpreted as UTF-8 with invalid sequences replaced by
/// U+FFFD. A `%` not followed by two hex digits is kept as-is.
#[must_use]
pub fn percent_decode(input: &str) -> Cow<'_, str> {
    if !input.contains('%') {
        return Cow::Borrowed(input);
    }

    let bytes = input.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%'
            && i + 2 < bytes.len()
            && let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2]))
        {
            decoded.push((hi << 4) | lo);
            i += 3;
            continue;
        }
        decoded.push(bytes[i]);
        i += 1;
    }

    Cow::Owned(String::from_utf8_lossy(&decoded).into_owned())
}

const fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Reduce a package or component name to its comparable form.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    let decoded = percent_decode(name);
    let without_purl = PURL_TYPE_PREFIX.replace(&decoded, "");
    ECOSYSTEM_TOKENS.replace_all(&without_purl, "").to_lowercase()
}

/// Strip a single leading `./` or `/` from a file path.
#[must_use]
pub fn strip_path_prefix(path: &str) -> &str {
    path.strip_prefix("./")
        .or_else(|| path.strip_prefix('/'))
        .unwrap_or(path)
}

/// Reduce a file path to its comparable form.
#[must_use]
pub fn normalize_path(path: &str) -> String {
    normalize_name(strip_path_prefix(path))
}

/// Whether two names refer to the same item after normalization.
#[must_use]
pub fn names_match(name1: &str, name2: &str) -> bool {
    normalize_name(name1) == normalize_name(name2)
}

/// Whether two file paths refer to the same file after normalization.
#[must_use]
pub fn paths_match(path1: &str, path2: &str) -> bool {
    normalize_path(path1) == normalize_path(path2)
}

/// How names of a category are normalized before matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    /// Package and component names
    Package,
    /// File paths
    FilePath,
}

impl NameKind {
    /// Normalize a name of this kind.
    #[must_use]
    pub fn normalize(self, name: &str) -> String {
        match self {
            Self::Package => normalize_name(name),
            Self::FilePath => normalize_path(name),
        }
    }
}
