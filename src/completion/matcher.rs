//! Fuzzy matching for path suggestions.
//!
//! Matches the paths extracted by the [`PathIndex`](super::PathIndex)
//! against the partial expression the user is typing, one bracket level at a
//! time. A query that ends in an open `['` fragment matches any next-level
//! key containing the fragment as a case-insensitive substring.

use super::index::{PathIndex, ROOT_TOKEN};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Default cap on the number of suggestions returned for a non-empty query.
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Fuzzy matcher over a document's path list.
pub struct FuzzyMatcher {
    paths: Vec<String>,
}

impl FuzzyMatcher {
    pub fn new(paths: Vec<String>) -> Self {
        Self { paths }
    }

    /// Finds paths that fuzzy-match the query, one depth level deeper than
    /// the query itself.
    ///
    /// An empty query (or the bare root token) returns all depth-1 paths
    /// without truncation; any other query returns at most `max_results`
    /// matches.
    pub fn find_matches(&self, query: &str, max_results: usize) -> Vec<String> {
        if query.is_empty() || query == ROOT_TOKEN {
            return self.filter_to_next_level(ROOT_TOKEN);
        }

        let mut matches = self.filter_to_next_level(query);
        matches.truncate(max_results);
        matches
    }

    /// Returns the available keys directly under `base_path`.
    ///
    /// Mapping keys are unquoted; sequence indices appear as decimal
    /// strings. Numeric keys sort numerically and before any non-numeric
    /// key; non-numeric keys sort lexicographically.
    pub fn keys_at_path(&self, base_path: &str) -> Vec<String> {
        let mut keys: HashSet<String> = HashSet::new();

        for path in &self.paths {
            let Some(remaining) = path.strip_prefix(base_path) else {
                continue;
            };
            if !remaining.starts_with('[') || remaining.len() < 2 {
                continue;
            }

            let content = match remaining[1..].split(']').next() {
                Some(c) => c,
                None => continue,
            };

            if let Some(quoted) = content.strip_prefix('\'') {
                keys.insert(quoted.trim_end_matches('\'').to_string());
            } else if let Some(quoted) = content.strip_prefix('"') {
                keys.insert(quoted.trim_end_matches('"').to_string());
            } else if is_decimal(content) {
                keys.insert(content.to_string());
            }
        }

        let mut sorted: Vec<String> = keys.into_iter().collect();
        sorted.sort_by(|a, b| compare_keys(a, b));
        sorted
    }

    /// Returns the keys under `base_path` whose lowercase form starts with
    /// `prefix`.
    pub fn find_keys_at_path(&self, base_path: &str, prefix: &str) -> Vec<String> {
        let all_keys = self.keys_at_path(base_path);
        if prefix.is_empty() {
            return all_keys;
        }

        let prefix_lower = prefix.to_lowercase();
        all_keys
            .into_iter()
            .filter(|k| k.to_lowercase().starts_with(&prefix_lower))
            .collect()
    }

    /// Returns the longest common leading substring of the given keys.
    ///
    /// Empty input yields the empty string; a single key is returned
    /// unchanged.
    pub fn common_prefix(keys: &[String]) -> String {
        if keys.is_empty() {
            return String::new();
        }
        if keys.len() == 1 {
            return keys[0].clone();
        }

        let first: Vec<char> = keys[0].chars().collect();
        let others: Vec<Vec<char>> = keys[1..].iter().map(|k| k.chars().collect()).collect();

        for (i, ch) in first.iter().enumerate() {
            for key in &others {
                if i >= key.len() || key[i] != *ch {
                    return first[..i].iter().collect();
                }
            }
        }
        keys[0].clone()
    }

    fn filter_to_next_level(&self, query: &str) -> Vec<String> {
        let target_depth = path_depth(query) + 1;

        self.paths
            .iter()
            .filter(|path| matches_prefix(path, query) && path_depth(path) == target_depth)
            .cloned()
            .collect()
    }
}

impl From<&PathIndex> for FuzzyMatcher {
    fn from(index: &PathIndex) -> Self {
        Self::new(index.paths().to_vec())
    }
}

impl From<PathIndex> for FuzzyMatcher {
    fn from(index: PathIndex) -> Self {
        Self::new(index.into_paths())
    }
}

/// Counts the number of complete bracket accessor groups in a path.
pub fn path_depth(path: &str) -> usize {
    let bytes = path.as_bytes();
    let mut depth = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'[' {
            match bytes[i + 1..].iter().position(|&b| b == b']') {
                // non-empty content only
                Some(gap) if gap > 0 => {
                    depth += 1;
                    i += gap + 2;
                }
                _ => break,
            }
        } else {
            i += 1;
        }
    }

    depth
}

/// Splits a query that ends in an open, unterminated `['` fragment into its
/// closed prefix and the partial key typed so far.
///
/// Returns `None` when the query does not end mid-key.
pub fn split_open_key(query: &str) -> Option<(&str, &str)> {
    let pos = query.rfind("['")?;
    let partial = &query[pos + 2..];
    if partial.contains('\'') {
        return None;
    }
    Some((&query[..pos], partial))
}

/// Checks whether `path` matches the (possibly partial) `query` prefix.
fn matches_prefix(path: &str, query: &str) -> bool {
    if query.is_empty() || query == ROOT_TOKEN {
        return path.starts_with(ROOT_TOKEN);
    }

    if path.starts_with(query) {
        return true;
    }

    if let Some((base_prefix, partial_key)) = split_open_key(query) {
        let path_lower = path.to_lowercase();
        if path_lower.starts_with(&base_prefix.to_lowercase()) {
            if let Some(rest) = path.get(base_prefix.len()..) {
                if let Some(actual_key) = next_key_segment(rest) {
                    return actual_key
                        .to_lowercase()
                        .contains(&partial_key.to_lowercase());
                }
            }
        }
    }

    false
}

/// Extracts the content of the first complete `['key']` segment in `rest`.
fn next_key_segment(rest: &str) -> Option<&str> {
    let mut offset = 0;
    while let Some(start) = rest[offset..].find("['") {
        let key_start = offset + start + 2;
        if let Some(quote) = rest[key_start..].find('\'') {
            let key_end = key_start + quote;
            if key_end > key_start && rest[key_end..].starts_with("']") {
                return Some(&rest[key_start..key_end]);
            }
        }
        offset = key_start;
    }
    None
}

fn is_decimal(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn compare_keys(a: &str, b: &str) -> Ordering {
    match (is_decimal(a), is_decimal(b)) {
        (true, true) => {
            let an: u64 = a.parse().unwrap_or(u64::MAX);
            let bn: u64 = b.parse().unwrap_or(u64::MAX);
            an.cmp(&bn)
        }
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.cmp(b),
    }
}
