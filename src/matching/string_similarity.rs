//! String similarity primitives used by the field comparators.
//!
//! Both metrics work on Unicode scalar values, not bytes, so multi-byte
//! characters count once.

/// Jaro similarity in `[0, 1]`, 1 for identical strings.
#[must_use]
pub fn jaro(a: &str, b: &str) -> f64 {
    strsim::jaro(a, b)
}

/// Length (in characters) of the longest contiguous substring shared by
/// `a` and `b`.
///
/// Classic dynamic programming over character positions, keeping only the
/// previous row of the table.
#[must_use]
pub fn longest_common_substring_len(a: &str, b: &str) -> usize {
    let chars_a: Vec<char> = a.chars().collect();
    let chars_b: Vec<char> = b.chars().collect();
    if chars_a.is_empty() || chars_b.is_empty() {
        return 0;
    }

    let mut previous = vec![0usize; chars_b.len() + 1];
    let mut current = vec![0usize; chars_b.len() + 1];
    let mut longest = 0;

    for ca in &chars_a {
        for (j, cb) in chars_b.iter().enumerate() {
            current[j + 1] = if ca == cb { previous[j] + 1 } else { 0 };
            longest = longest.max(current[j + 1]);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    longest
}

/// Longest common substring length over the longer string's length.
#[must_use]
pub fn longest_common_substring_ratio(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 0.0;
    }
    longest_common_substring_len(a, b) as f64 / max_len as f64
}
