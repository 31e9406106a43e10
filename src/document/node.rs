//! Document value representation.
//!
//! This module provides the core data structures for representing parsed
//! documents in jsonprobe. A document is a tree of `Value` nodes: mappings
//! preserve insertion order via `IndexMap`, sequences preserve element order,
//! and scalars carry their parsed type. The tree is immutable for the
//! lifetime of a query session; both the path index and the query evaluator
//! read from it without modifying it.
//!
//! # Example
//!
//! ```
//! use jsonprobe::document::node::{Number, Value};
//! use indexmap::IndexMap;
//!
//! let mut obj = IndexMap::new();
//! obj.insert("name".to_string(), Value::String("Alice".to_string()));
//! obj.insert("age".to_string(), Value::Number(Number::Integer(30)));
//! let doc = Value::Object(obj);
//!
//! assert!(doc.is_object());
//! assert_eq!(doc.type_name(), "object");
//! ```

use indexmap::IndexMap;

/// A parsed number (integer or float).
///
/// Integers and floats are kept distinct so that sequence indices and
/// integer arithmetic stay exact, but the two variants compare and order
/// numerically: `Integer(2)` equals `Float(2.0)`.
#[derive(Debug, Clone)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Integer(i) => *i as f64,
            Number::Float(f) => *f,
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Number::Integer(_))
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Number::Float(_))
    }
}

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{}", i),
            Number::Float(fl) => write!(f, "{}", fl),
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Number::Integer(a), Number::Integer(b)) => a == b,
            _ => self.as_f64() == other.as_f64(),
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        match (self, other) {
            (Number::Integer(a), Number::Integer(b)) => a.partial_cmp(b),
            _ => self.as_f64().partial_cmp(&other.as_f64()),
        }
    }
}

/// A document value.
///
/// This enum represents the core document types: mappings, sequences,
/// strings, numbers, booleans, and null. Mapping keys are unique and keep
/// insertion order; sequences keep their original order.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A null value
    Null,
    /// A boolean
    Boolean(bool),
    /// A number (integer or float)
    Number(Number),
    /// A string
    String(String),
    /// An ordered sequence of values
    Array(Vec<Value>),
    /// An insertion-ordered mapping of string keys to values
    Object(IndexMap<String, Value>),
}

impl Value {
    /// Returns true if this value is a mapping.
    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Returns true if this value is a sequence.
    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Returns true if this value is a container (mapping or sequence).
    pub fn is_container(&self) -> bool {
        matches!(self, Value::Object(_) | Value::Array(_))
    }

    /// Returns the name of this value's type, as shown in error messages
    /// and returned by the `type()` query builtin.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// Returns the truthiness of this value.
    ///
    /// Null, false, zero, the empty string, and empty containers are falsy;
    /// everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Boolean(b) => *b,
            Value::Number(n) => n.as_f64() != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::Array(items) => !items.is_empty(),
            Value::Object(fields) => !fields.is_empty(),
        }
    }
}
