//! Textual rendering of document values.
//!
//! Two forms: a pretty multi-line rendering with two-space indentation for
//! the result pane, and a compact single-line rendering for inline use
//! (error messages, `str()` conversion). Both emit JSON-compatible text.

use crate::document::node::{Number, Value};
use std::fmt::Write;

/// Renders a value as indented multi-line text.
pub fn format_value(value: &Value) -> String {
    let mut out = String::new();
    write_pretty(&mut out, value, 0);
    out
}

/// Renders a value on a single line.
pub fn format_compact(value: &Value) -> String {
    let mut out = String::new();
    write_compact(&mut out, value);
    out
}

fn write_pretty(out: &mut String, value: &Value, indent: usize) {
    match value {
        Value::Array(items) => {
            if items.is_empty() {
                out.push_str("[]");
                return;
            }
            out.push_str("[\n");
            for (i, item) in items.iter().enumerate() {
                push_indent(out, indent + 1);
                write_pretty(out, item, indent + 1);
                if i + 1 < items.len() {
                    out.push(',');
                }
                out.push('\n');
            }
            push_indent(out, indent);
            out.push(']');
        }
        Value::Object(fields) => {
            if fields.is_empty() {
                out.push_str("{}");
                return;
            }
            out.push_str("{\n");
            for (i, (key, item)) in fields.iter().enumerate() {
                push_indent(out, indent + 1);
                write_string(out, key);
                out.push_str(": ");
                write_pretty(out, item, indent + 1);
                if i + 1 < fields.len() {
                    out.push(',');
                }
                out.push('\n');
            }
            push_indent(out, indent);
            out.push('}');
        }
        scalar => write_scalar(out, scalar),
    }
}

fn write_compact(out: &mut String, value: &Value) {
    match value {
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_compact(out, item);
            }
            out.push(']');
        }
        Value::Object(fields) => {
            out.push('{');
            for (i, (key, item)) in fields.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_string(out, key);
                out.push_str(": ");
                write_compact(out, item);
            }
            out.push('}');
        }
        scalar => write_scalar(out, scalar),
    }
}

fn write_scalar(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Boolean(true) => out.push_str("true"),
        Value::Boolean(false) => out.push_str("false"),
        Value::Number(Number::Integer(i)) => {
            let _ = write!(out, "{}", i);
        }
        Value::Number(Number::Float(f)) => {
            if f.fract() == 0.0 && f.is_finite() && f.abs() < 1e15 {
                let _ = write!(out, "{:.1}", f);
            } else {
                let _ = write!(out, "{}", f);
            }
        }
        Value::String(s) => write_string(out, s),
        Value::Array(_) | Value::Object(_) => unreachable!("containers handled by callers"),
    }
}

fn write_string(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

fn push_indent(out: &mut String, indent: usize) {
    for _ in 0..indent {
        out.push_str("  ");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parser::from_json;

    #[test]
    fn test_scalars() {
        assert_eq!(format_value(&from_json("null").unwrap()), "null");
        assert_eq!(format_value(&from_json("true").unwrap()), "true");
        assert_eq!(format_value(&from_json("42").unwrap()), "42");
        assert_eq!(format_value(&from_json("2.5").unwrap()), "2.5");
        assert_eq!(format_value(&from_json("2.0").unwrap()), "2.0");
        assert_eq!(
            format_value(&from_json(r#""hi there""#).unwrap()),
            "\"hi there\""
        );
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            format_compact(&Value::String("a\"b\\c\nd".to_string())),
            r#""a\"b\\c\nd""#
        );
    }

    #[test]
    fn test_pretty_object() {
        let value = from_json(r#"{"a": 1, "b": [2, 3]}"#).unwrap();
        let expected = "{\n  \"a\": 1,\n  \"b\": [\n    2,\n    3\n  ]\n}";
        assert_eq!(format_value(&value), expected);
    }

    #[test]
    fn test_empty_containers_stay_inline() {
        assert_eq!(format_value(&from_json("[]").unwrap()), "[]");
        assert_eq!(
            format_value(&from_json(r#"{"a": {}}"#).unwrap()),
            "{\n  \"a\": {}\n}"
        );
    }

    #[test]
    fn test_compact() {
        let value = from_json(r#"{"a": 1, "b": [2, "x"]}"#).unwrap();
        assert_eq!(format_compact(&value), r#"{"a": 1, "b": [2, "x"]}"#);
    }
}
