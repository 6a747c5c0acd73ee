//! Isomorph detection in ciphertext.
//!
//! Two strings are isomorphic when one can be turned into the other by a
//! consistent renaming of characters. The repetition structure of a string is
//! captured by its *pattern*: characters that occur once become `.`, repeated
//! characters get labels `a`, `b`, `c`, ... in order of first occurrence.
//!
//! ```text
//! ahwoanao  ->  a..ba.ab
//! uvonuyun  ->  a..ba.ab
//! ```
//!
//! [`find_isomorphs`] reports every pair of non-overlapping, equal-length
//! ciphertext windows sharing a pattern. A pattern qualifies only if it
//! starts and ends with a repeat label; windows whose first or last
//! character is a singleton carry no constraint at that boundary and are
//! dropped.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Marker for a character that occurs exactly once in its window.
pub const SINGLETON: char = '.';

/// Shortest window length searched.
pub const MIN_WINDOW: usize = 3;

/// Two non-overlapping ciphertext windows sharing a pattern.
///
/// Offsets count characters from the start of the ciphertext, and
/// `start_b >= start_a + pattern.len()`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Isomorph {
    pub pattern: String,
    pub start_a: usize,
    pub start_b: usize,
}

impl Isomorph {
    /// Window length.
    pub fn len(&self) -> usize {
        self.pattern.chars().count()
    }

    /// Returns true for an empty pattern. `find_isomorphs` never yields one.
    pub fn is_empty(&self) -> bool {
        self.pattern.is_empty()
    }

    /// One past the last offset of the first window.
    pub fn end_a(&self) -> usize {
        self.start_a + self.len()
    }

    /// One past the last offset of the second window.
    pub fn end_b(&self) -> usize {
        self.start_b + self.len()
    }
}

fn pattern_of(chars: &[char]) -> String {
    let mut freq: HashMap<char, usize> = HashMap::new();
    for &c in chars {
        *freq.entry(c).or_insert(0) += 1;
    }

    let mut labels: HashMap<char, char> = HashMap::new();
    let mut next_label = 0u32;
    chars
        .iter()
        .map(|c| {
            if freq[c] == 1 {
                return SINGLETON;
            }
            *labels.entry(*c).or_insert_with(|| {
                let label = char::from_u32(u32::from('a') + next_label).unwrap_or('?');
                next_label += 1;
                label
            })
        })
        .collect()
}

/// Computes the repetition pattern of `s`.
///
/// # Examples
///
/// ```
/// use decklab::isomorph_pattern;
///
/// assert_eq!(isomorph_pattern("ahwoanao"), "a..ba.ab");
/// assert_eq!(isomorph_pattern("cbbc"), "abba");
/// assert_eq!(isomorph_pattern("abcde"), ".....");
/// ```
pub fn isomorph_pattern(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    pattern_of(&chars)
}

/// Returns true if no character of `pattern` is a repeat label.
pub fn is_trivial_pattern(pattern: &str) -> bool {
    pattern.chars().all(|c| c == SINGLETON)
}

/// Returns true if `pattern` starts or ends with a singleton.
pub fn has_boundary_singleton(pattern: &str) -> bool {
    pattern.starts_with(SINGLETON) || pattern.ends_with(SINGLETON)
}

/// Finds all isomorphic window pairs in `ciphertext`.
///
/// For every window length `n` in `3..=len / 2`, windows are grouped by
/// pattern; trivial patterns and patterns with a boundary singleton are
/// skipped. Each pair `(start_a, start_b)` in a group with
/// `start_b >= start_a + n` is reported once. Results are ordered by window
/// length, then by first appearance of the pattern, then by offsets.
///
/// This is the expensive operation of the crate: work grows with the number
/// of window lengths times window positions, plus a pairwise pass over each
/// pattern group, which is cubic in the ciphertext length in the worst case.
///
/// # Examples
///
/// ```
/// use decklab::{find_isomorphs, Isomorph};
///
/// let found = find_isomorphs("ahwoanaouvonuyun");
/// assert!(found.contains(&Isomorph {
///     pattern: "a..ba.ab".to_string(),
///     start_a: 0,
///     start_b: 8,
/// }));
/// assert!(find_isomorphs("ab").is_empty());
/// ```
pub fn find_isomorphs(ciphertext: &str) -> Vec<Isomorph> {
    let chars: Vec<char> = ciphertext.chars().collect();
    let len = chars.len();
    let max_len = len / 2;
    let mut result = Vec::new();
    if max_len < MIN_WINDOW {
        return result;
    }

    for n in MIN_WINDOW..=max_len {
        // Insertion-ordered grouping keeps the output stable.
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut groups: Vec<(String, Vec<usize>)> = Vec::new();

        for (start, window) in chars.windows(n).enumerate() {
            let pattern = pattern_of(window);
            if is_trivial_pattern(&pattern) || has_boundary_singleton(&pattern) {
                continue;
            }
            match index.get(&pattern) {
                Some(&g) => groups[g].1.push(start),
                None => {
                    index.insert(pattern.clone(), groups.len());
                    groups.push((pattern, vec![start]));
                }
            }
        }

        for (pattern, starts) in &groups {
            for (i, &start_a) in starts.iter().enumerate() {
                for &start_b in &starts[i + 1..] {
                    if start_b >= start_a + n {
                        result.push(Isomorph {
                            pattern: pattern.clone(),
                            start_a,
                            start_b,
                        });
                    }
                }
            }
        }
    }

    debug!(length = len, found = result.len(), "isomorph search finished");
    result
}

/// Fraction of `pattern` made of repeat labels, in `[0, 1]`.
///
/// An empty pattern scores 0.
pub fn isomorph_interestingness(pattern: &str) -> f64 {
    let total = pattern.chars().count();
    if total == 0 {
        return 0.0;
    }
    let repeats = pattern.chars().filter(|&c| c != SINGLETON).count();
    repeats as f64 / total as f64
}

/// Returns a sorted copy of `isomorphs`, most interesting first.
///
/// Ordering: interestingness descending, then (if `pattern_counts` is given)
/// occurrence count descending, then pattern length descending, then
/// `start_a` ascending. Patterns missing from `pattern_counts` count as 0.
/// The input is left untouched.
pub fn sort_by_interestingness(
    isomorphs: &[Isomorph],
    pattern_counts: Option<&HashMap<String, usize>>,
) -> Vec<Isomorph> {
    let count_of = |iso: &Isomorph| -> usize {
        pattern_counts
            .and_then(|counts| counts.get(&iso.pattern).copied())
            .unwrap_or(0)
    };

    let mut sorted = isomorphs.to_vec();
    sorted.sort_by(|a, b| {
        let by_score =
            isomorph_interestingness(&b.pattern).total_cmp(&isomorph_interestingness(&a.pattern));
        let by_count = if pattern_counts.is_some() {
            count_of(b).cmp(&count_of(a))
        } else {
            Ordering::Equal
        };
        by_score
            .then(by_count)
            .then_with(|| b.len().cmp(&a.len()))
            .then_with(|| a.start_a.cmp(&b.start_a))
    });
    sorted
}

/// Counts isomorph entries per distinct pattern.
pub fn count_pattern_occurrences(isomorphs: &[Isomorph]) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for iso in isomorphs {
        *counts.entry(iso.pattern.clone()).or_insert(0) += 1;
    }
    counts
}
