//! Document parsing into the jsonprobe value tree.
//!
//! Parses JSON, JSONL (newline-delimited JSON), and YAML text into `Value`
//! trees via the corresponding serde value types.

use crate::document::node::{Number, Value};
use anyhow::{bail, Context, Result};
use indexmap::IndexMap;

/// Parses a JSON string into a `Value`.
pub fn from_json(content: &str) -> Result<Value> {
    let parsed: serde_json::Value = serde_json::from_str(content).context("Invalid JSON")?;
    Ok(convert_json(&parsed))
}

/// Parses JSONL content (newline-delimited JSON) into a `Value::Array`.
///
/// Each line must be a valid JSON value. Blank lines are skipped.
pub fn from_jsonl(content: &str) -> Result<Value> {
    let mut lines = Vec::new();

    for (line_num, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let parsed: serde_json::Value = serde_json::from_str(line)
            .with_context(|| format!("Invalid JSON on line {}", line_num + 1))?;
        lines.push(convert_json(&parsed));
    }

    if lines.is_empty() {
        bail!("No valid JSON found in JSONL content");
    }

    Ok(Value::Array(lines))
}

/// Parses a YAML string into a `Value`.
pub fn from_yaml(content: &str) -> Result<Value> {
    let parsed: serde_yaml::Value = serde_yaml::from_str(content).context("Invalid YAML")?;
    convert_yaml(&parsed)
}

/// Converts a `serde_json::Value` into a jsonprobe `Value`.
pub fn convert_json(value: &serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Number(Number::Integer(i))
            } else {
                Value::Number(Number::Float(n.as_f64().unwrap_or(f64::NAN)))
            }
        }
        serde_json::Value::String(s) => Value::String(s.clone()),
        serde_json::Value::Array(items) => {
            Value::Array(items.iter().map(convert_json).collect())
        }
        serde_json::Value::Object(fields) => {
            let mut object = IndexMap::new();
            for (key, child) in fields {
                object.insert(key.clone(), convert_json(child));
            }
            Value::Object(object)
        }
    }
}

/// Converts a `serde_yaml::Value` into a jsonprobe `Value`.
///
/// Scalar mapping keys (strings, numbers, booleans) are coerced to their
/// string form; sequence or mapping keys are rejected.
pub fn convert_yaml(value: &serde_yaml::Value) -> Result<Value> {
    match value {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Boolean(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Number(Number::Integer(i)))
            } else {
                Ok(Value::Number(Number::Float(n.as_f64().unwrap_or(f64::NAN))))
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
        serde_yaml::Value::Sequence(items) => {
            let converted: Result<Vec<Value>> = items.iter().map(convert_yaml).collect();
            Ok(Value::Array(converted?))
        }
        serde_yaml::Value::Mapping(fields) => {
            let mut object = IndexMap::new();
            for (key, child) in fields {
                let key = yaml_key_to_string(key)?;
                object.insert(key, convert_yaml(child)?);
            }
            Ok(Value::Object(object))
        }
        serde_yaml::Value::Tagged(tagged) => convert_yaml(&tagged.value),
    }
}

fn yaml_key_to_string(key: &serde_yaml::Value) -> Result<String> {
    match key {
        serde_yaml::Value::String(s) => Ok(s.clone()),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        serde_yaml::Value::Null => Ok("null".to_string()),
        _ => bail!("Unsupported YAML mapping key (must be a scalar)"),
    }
}
