//! Error types for query parsing and evaluation.
//!
//! Every failure the evaluator can produce is classified into one of these
//! variants; callers never see a raw parser or interpreter fault. The
//! `Display` impls carry the user-facing message, shown verbatim by the
//! front end.

use std::fmt;

/// Errors that can occur during query parsing or evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryError {
    /// Blank input.
    EmptyQuery,
    /// Malformed expression, with the character offset of the fault.
    Syntax { message: String, position: usize },
    /// Reference to a name outside the allow-list and the root binding.
    UnknownName { name: String },
    /// Bracket access on a value that is not a mapping or sequence.
    NotIndexable { type_name: &'static str },
    /// Iteration over a value that is not a mapping or sequence.
    NotIterable { type_name: &'static str },
    /// Any other type conflict.
    TypeMismatch { message: String },
    /// Mapping key absent.
    MissingKey { key: String },
    /// Attribute-style access used instead of bracket access.
    AttributeMisuse { name: String },
    /// Value-level rejection (bad conversion, empty aggregate, ...).
    InvalidValue { message: String },
    /// Sequence index beyond bounds.
    IndexOutOfRange { index: i64, len: usize },
    /// Anything else.
    Unclassified { message: String },
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::EmptyQuery => write!(
                f,
                "Please enter a query. Try: _, _['key'], or _['items'][0]"
            ),
            QueryError::Syntax { message, position } => write!(
                f,
                "Invalid query syntax: {} at position {}. \
                 Check for missing quotes, brackets, or operators.",
                message, position
            ),
            QueryError::UnknownName { name } => write!(
                f,
                "'{}' is not available. Use '_' to access the document. \
                 Available functions: {}, ...",
                name,
                super::builtins::BUILTIN_NAMES[..5].join(", ")
            ),
            QueryError::NotIndexable { type_name } => write!(
                f,
                "Cannot use brackets on a {} value. \
                 Make sure you're accessing a mapping or a sequence, not a string or number.",
                type_name
            ),
            QueryError::NotIterable { type_name } => write!(
                f,
                "A {} value cannot be iterated over. \
                 Use it directly or check that it's a sequence or mapping first.",
                type_name
            ),
            QueryError::TypeMismatch { message } => write!(f, "Type mismatch: {}", message),
            QueryError::MissingKey { key } => write!(
                f,
                "Key '{}' not found. \
                 Check the document structure or use path completion to find available keys.",
                key
            ),
            QueryError::AttributeMisuse { name } => write!(
                f,
                "Invalid attribute access '.{}'. \
                 Use bracket-style key access instead: _['{}']",
                name, name
            ),
            QueryError::InvalidValue { message } => write!(f, "Invalid value: {}", message),
            QueryError::IndexOutOfRange { index, len } => write!(
                f,
                "Index {} is out of range. \
                 The sequence has {} element(s), shorter than the requested index.",
                index, len
            ),
            QueryError::Unclassified { message } => {
                write!(f, "Query evaluation failed: {}", message)
            }
        }
    }
}

impl std::error::Error for QueryError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_suggests_examples() {
        let msg = QueryError::EmptyQuery.to_string();
        assert!(msg.contains("_['key']"));
    }

    #[test]
    fn test_syntax_error_includes_position() {
        let err = QueryError::Syntax {
            message: "unexpected character '#'".to_string(),
            position: 7,
        };
        let msg = err.to_string();
        assert!(msg.contains("unexpected character '#'"));
        assert!(msg.contains("position 7"));
    }

    #[test]
    fn test_unknown_name_lists_functions_and_root() {
        let err = QueryError::UnknownName {
            name: "foo".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'foo'"));
        assert!(msg.contains("Use '_'"));
        assert!(msg.contains("abs"));
    }

    #[test]
    fn test_missing_key_names_key() {
        let err = QueryError::MissingKey {
            key: "missing".to_string(),
        };
        assert!(err.to_string().contains("'missing'"));
    }

    #[test]
    fn test_index_out_of_range_references_length() {
        let err = QueryError::IndexOutOfRange { index: 5, len: 2 };
        let msg = err.to_string();
        assert!(msg.contains('5'));
        assert!(msg.contains("2 element(s)"));
    }

    #[test]
    fn test_attribute_misuse_points_at_brackets() {
        let err = QueryError::AttributeMisuse {
            name: "name".to_string(),
        };
        assert!(err.to_string().contains("_['name']"));
    }
}
