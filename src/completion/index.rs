//! Path extraction from document structure.

use crate::document::node::Value;

/// The root token every canonical path starts with. It is also the name the
/// query evaluator binds the document to.
pub const ROOT_TOKEN: &str = "_";

/// A precomputed, ordered list of every addressable path in a document.
///
/// Built once per loaded document by a full pre-order traversal and held for
/// the session. Every mapping member and sequence element contributes exactly
/// one entry; nested containers contribute entries for themselves and their
/// children. The root path itself is not recorded.
///
/// # Example
///
/// ```
/// use jsonprobe::completion::PathIndex;
/// use jsonprobe::document::parser::from_json;
///
/// let doc = from_json(r#"{"items": [1, 2]}"#).unwrap();
/// let index = PathIndex::build(&doc);
/// assert_eq!(
///     index.paths(),
///     &["_['items']", "_['items'][0]", "_['items'][1]"]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct PathIndex {
    paths: Vec<String>,
}

impl PathIndex {
    /// Walks the document and records every reachable path.
    pub fn build(document: &Value) -> Self {
        let mut paths = Vec::new();
        extract_paths(document, ROOT_TOKEN, &mut paths);
        Self { paths }
    }

    /// Returns all extracted paths in traversal order.
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Consumes the index and returns the path list.
    pub fn into_paths(self) -> Vec<String> {
        self.paths
    }
}

fn extract_paths(value: &Value, current_path: &str, paths: &mut Vec<String>) {
    match value {
        Value::Object(fields) => {
            for (key, child) in fields {
                let new_path = format!("{}['{}']", current_path, key);
                paths.push(new_path.clone());
                extract_paths(child, &new_path, paths);
            }
        }
        Value::Array(items) => {
            for (i, child) in items.iter().enumerate() {
                let new_path = format!("{}[{}]", current_path, i);
                paths.push(new_path.clone());
                extract_paths(child, &new_path, paths);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parser::from_json;

    #[test]
    fn test_build_flat_object() {
        let doc = from_json(r#"{"a": 1, "b": 2}"#).unwrap();
        let index = PathIndex::build(&doc);
        assert_eq!(index.paths(), &["_['a']", "_['b']"]);
    }

    #[test]
    fn test_build_nested() {
        let doc = from_json(r#"{"user": {"name": "Alice", "tags": ["x", "y"]}}"#).unwrap();
        let index = PathIndex::build(&doc);
        assert_eq!(
            index.paths(),
            &[
                "_['user']",
                "_['user']['name']",
                "_['user']['tags']",
                "_['user']['tags'][0]",
                "_['user']['tags'][1]",
            ]
        );
    }

    #[test]
    fn test_entry_count_equals_member_count() {
        // 2 top-level members + 2 array elements + 2 keys per element
        let doc =
            from_json(r#"{"items": [{"a": 1, "b": 2}, {"a": 3, "b": 4}], "n": 5}"#).unwrap();
        let index = PathIndex::build(&doc);
        assert_eq!(index.len(), 2 + 2 + 4);
    }

    #[test]
    fn test_root_not_recorded() {
        let doc = from_json(r#"{}"#).unwrap();
        let index = PathIndex::build(&doc);
        assert!(index.is_empty());
    }

    #[test]
    fn test_duplicate_keys_in_different_subtrees() {
        let doc = from_json(r#"{"a": {"name": 1}, "b": {"name": 2}}"#).unwrap();
        let index = PathIndex::build(&doc);
        assert!(index.paths().contains(&"_['a']['name']".to_string()));
        assert!(index.paths().contains(&"_['b']['name']".to_string()));
    }

    #[test]
    fn test_scalar_members_terminate_recursion() {
        let doc = from_json(r#"{"s": "text", "n": 1, "b": true, "z": null}"#).unwrap();
        let index = PathIndex::build(&doc);
        assert_eq!(index.len(), 4);
    }
}
