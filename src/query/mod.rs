//! Sandboxed expression queries over a loaded document.
//!
//! A query is a single expression evaluated against the document, which is
//! bound to the name `_`. The grammar is closed: bracket access, slices,
//! literals, arithmetic, comparisons, boolean logic, comprehensions,
//! map/filter lambdas, and a fixed allow-list of functions. There is no
//! assignment, no attribute access, and no way to reach outside the
//! document.

pub mod ast;
pub mod builtins;
pub mod error;
pub mod evaluator;
pub mod parser;

pub use error::QueryError;
pub use evaluator::Evaluator;
pub use parser::Parser;

use crate::document::Value;

/// Parses and evaluates `query` against `document`.
///
/// This is the front door used by both the interactive session and the
/// one-shot command line mode. Blank input is rejected before parsing so
/// the user gets a hint instead of a syntax error.
pub fn evaluate(query: &str, document: &Value) -> Result<Value, QueryError> {
    if query.trim().is_empty() {
        return Err(QueryError::EmptyQuery);
    }
    let expr = Parser::parse(query)?;
    Evaluator::new(document).eval(&expr)
}
