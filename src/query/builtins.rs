//! The fixed allow-list of query functions.
//!
//! This is the entire surface a query can call: a process-wide, immutable
//! table of side-effect-free functions over document values. Nothing here
//! mutates its arguments; every function allocates fresh values. `map` and
//! `filter` appear in the name table but are dispatched by the evaluator
//! itself because they take a lambda argument.

use crate::document::node::{Number, Value};
use crate::query::error::QueryError;
use indexmap::IndexMap;
use std::cmp::Ordering;

/// A builtin function over already-evaluated arguments.
pub type BuiltinFn = fn(&[Value]) -> Result<Value, QueryError>;

/// Every callable name, sorted. Shown (in part) by `UnknownName` messages.
pub const BUILTIN_NAMES: &[&str] = &[
    "abs",
    "all",
    "any",
    "bool",
    "dict",
    "enumerate",
    "filter",
    "float",
    "int",
    "isinstance",
    "len",
    "list",
    "map",
    "max",
    "min",
    "range",
    "round",
    "set",
    "sort",
    "str",
    "sum",
    "tuple",
    "type",
    "zip",
];

/// Returns true if `name` is in the allow-list.
pub fn contains(name: &str) -> bool {
    BUILTIN_NAMES.contains(&name)
}

/// Looks up a builtin by name.
///
/// `map` and `filter` return `None` here: they take a lambda and are
/// evaluated by the interpreter directly.
pub fn lookup(name: &str) -> Option<BuiltinFn> {
    match name {
        "abs" => Some(builtin_abs),
        "all" => Some(builtin_all),
        "any" => Some(builtin_any),
        "bool" => Some(builtin_bool),
        "dict" => Some(builtin_dict),
        "enumerate" => Some(builtin_enumerate),
        "float" => Some(builtin_float),
        "int" => Some(builtin_int),
        "isinstance" => Some(builtin_isinstance),
        "len" => Some(builtin_len),
        "list" => Some(builtin_list),
        "max" => Some(builtin_max),
        "min" => Some(builtin_min),
        "range" => Some(builtin_range),
        "round" => Some(builtin_round),
        "set" => Some(builtin_set),
        "sort" => Some(builtin_sort),
        "str" => Some(builtin_str),
        "sum" => Some(builtin_sum),
        "tuple" => Some(builtin_tuple),
        "type" => Some(builtin_type),
        "zip" => Some(builtin_zip),
        _ => None,
    }
}

/// Materializes an iterable value into its items.
///
/// Sequences yield their elements, mappings yield their keys; anything else
/// is not iterable.
pub(crate) fn iter_items(value: &Value) -> Result<Vec<Value>, QueryError> {
    match value {
        Value::Array(items) => Ok(items.clone()),
        Value::Object(fields) => Ok(fields.keys().map(|k| Value::String(k.clone())).collect()),
        other => Err(QueryError::NotIterable {
            type_name: other.type_name(),
        }),
    }
}

fn expect_arity(name: &str, args: &[Value], min: usize, max: usize) -> Result<(), QueryError> {
    if args.len() < min || args.len() > max {
        let expected = if min == max {
            format!("{}", min)
        } else {
            format!("{} to {}", min, max)
        };
        return Err(QueryError::InvalidValue {
            message: format!(
                "{}() takes {} argument(s), got {}",
                name,
                expected,
                args.len()
            ),
        });
    }
    Ok(())
}

fn expect_number(name: &str, value: &Value) -> Result<Number, QueryError> {
    match value {
        Value::Number(n) => Ok(n.clone()),
        other => Err(QueryError::TypeMismatch {
            message: format!("{}() expects a number, got {}", name, other.type_name()),
        }),
    }
}

fn expect_integer(name: &str, value: &Value) -> Result<i64, QueryError> {
    match value {
        Value::Number(Number::Integer(i)) => Ok(*i),
        other => Err(QueryError::TypeMismatch {
            message: format!("{}() expects an integer, got {}", name, other.type_name()),
        }),
    }
}

/// Numeric-or-string ordering used by sort/min/max. Mixed or unorderable
/// types are a type mismatch.
fn compare_values(a: &Value, b: &Value) -> Result<Ordering, QueryError> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            x.partial_cmp(y).ok_or_else(|| QueryError::TypeMismatch {
                message: "cannot order NaN".to_string(),
            })
        }
        (Value::String(x), Value::String(y)) => Ok(x.cmp(y)),
        _ => Err(QueryError::TypeMismatch {
            message: format!(
                "cannot compare {} and {}",
                a.type_name(),
                b.type_name()
            ),
        }),
    }
}

fn builtin_len(args: &[Value]) -> Result<Value, QueryError> {
    expect_arity("len", args, 1, 1)?;
    let len = match &args[0] {
        Value::String(s) => s.chars().count(),
        Value::Array(items) => items.len(),
        Value::Object(fields) => fields.len(),
        other => {
            return Err(QueryError::TypeMismatch {
                message: format!("value of type {} has no length", other.type_name()),
            })
        }
    };
    Ok(Value::Number(Number::Integer(len as i64)))
}

fn builtin_sum(args: &[Value]) -> Result<Value, QueryError> {
    expect_arity("sum", args, 1, 1)?;
    let items = iter_items(&args[0])?;

    let mut int_total: i64 = 0;
    let mut float_total: f64 = 0.0;
    let mut all_integers = true;

    for item in &items {
        match expect_number("sum", item)? {
            Number::Integer(i) => {
                int_total = int_total.wrapping_add(i);
                float_total += i as f64;
            }
            Number::Float(f) => {
                all_integers = false;
                float_total += f;
            }
        }
    }

    if all_integers {
        Ok(Value::Number(Number::Integer(int_total)))
    } else {
        Ok(Value::Number(Number::Float(float_total)))
    }
}

fn extreme(name: &str, args: &[Value], want_max: bool) -> Result<Value, QueryError> {
    expect_arity(name, args, 1, 1)?;
    let items = iter_items(&args[0])?;
    if items.is_empty() {
        return Err(QueryError::InvalidValue {
            message: format!("{}() arg is an empty sequence", name),
        });
    }

    let mut best = items[0].clone();
    for item in &items[1..] {
        let ordering = compare_values(item, &best)?;
        let better = if want_max {
            ordering == Ordering::Greater
        } else {
            ordering == Ordering::Less
        };
        if better {
            best = item.clone();
        }
    }
    Ok(best)
}

fn builtin_min(args: &[Value]) -> Result<Value, QueryError> {
    extreme("min", args, false)
}

fn builtin_max(args: &[Value]) -> Result<Value, QueryError> {
    extreme("max", args, true)
}

fn builtin_sort(args: &[Value]) -> Result<Value, QueryError> {
    expect_arity("sort", args, 1, 1)?;
    let mut items = iter_items(&args[0])?;

    // validate orderability first so sort_by stays total
    for pair in items.windows(2) {
        compare_values(&pair[0], &pair[1])?;
    }

    items.sort_by(|a, b| compare_values(a, b).unwrap_or(Ordering::Equal));
    Ok(Value::Array(items))
}

fn builtin_list(args: &[Value]) -> Result<Value, QueryError> {
    expect_arity("list", args, 0, 1)?;
    if args.is_empty() {
        return Ok(Value::Array(Vec::new()));
    }
    Ok(Value::Array(iter_items(&args[0])?))
}

fn builtin_tuple(args: &[Value]) -> Result<Value, QueryError> {
    expect_arity("tuple", args, 0, 1)?;
    if args.is_empty() {
        return Ok(Value::Array(Vec::new()));
    }
    Ok(Value::Array(iter_items(&args[0])?))
}

fn builtin_set(args: &[Value]) -> Result<Value, QueryError> {
    expect_arity("set", args, 0, 1)?;
    if args.is_empty() {
        return Ok(Value::Array(Vec::new()));
    }

    let mut unique: Vec<Value> = Vec::new();
    for item in iter_items(&args[0])? {
        if !unique.contains(&item) {
            unique.push(item);
        }
    }
    Ok(Value::Array(unique))
}

fn builtin_dict(args: &[Value]) -> Result<Value, QueryError> {
    expect_arity("dict", args, 0, 1)?;
    if args.is_empty() {
        return Ok(Value::Object(IndexMap::new()));
    }

    match &args[0] {
        Value::Object(fields) => Ok(Value::Object(fields.clone())),
        Value::Array(pairs) => {
            let mut object = IndexMap::new();
            for pair in pairs {
                let Value::Array(kv) = pair else {
                    return Err(QueryError::TypeMismatch {
                        message: "dict() expects a sequence of [key, value] pairs".to_string(),
                    });
                };
                if kv.len() != 2 {
                    return Err(QueryError::InvalidValue {
                        message: format!(
                            "dict() pair has {} element(s), expected 2",
                            kv.len()
                        ),
                    });
                }
                let Value::String(key) = &kv[0] else {
                    return Err(QueryError::TypeMismatch {
                        message: "dict() keys must be strings".to_string(),
                    });
                };
                object.insert(key.clone(), kv[1].clone());
            }
            Ok(Value::Object(object))
        }
        other => Err(QueryError::TypeMismatch {
            message: format!(
                "dict() expects a mapping or a sequence of pairs, got {}",
                other.type_name()
            ),
        }),
    }
}

fn builtin_str(args: &[Value]) -> Result<Value, QueryError> {
    expect_arity("str", args, 1, 1)?;
    let text = match &args[0] {
        Value::String(s) => s.clone(),
        other => crate::render::format_compact(other),
    };
    Ok(Value::String(text))
}

fn builtin_int(args: &[Value]) -> Result<Value, QueryError> {
    expect_arity("int", args, 1, 1)?;
    match &args[0] {
        Value::Number(Number::Integer(i)) => Ok(Value::Number(Number::Integer(*i))),
        Value::Number(Number::Float(f)) => Ok(Value::Number(Number::Integer(*f as i64))),
        Value::Boolean(b) => Ok(Value::Number(Number::Integer(*b as i64))),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map(|i| Value::Number(Number::Integer(i)))
            .map_err(|_| QueryError::InvalidValue {
                message: format!("invalid literal for int(): '{}'", s),
            }),
        other => Err(QueryError::TypeMismatch {
            message: format!("int() cannot convert {}", other.type_name()),
        }),
    }
}

fn builtin_float(args: &[Value]) -> Result<Value, QueryError> {
    expect_arity("float", args, 1, 1)?;
    match &args[0] {
        Value::Number(n) => Ok(Value::Number(Number::Float(n.as_f64()))),
        Value::Boolean(b) => Ok(Value::Number(Number::Float(*b as i64 as f64))),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map(|f| Value::Number(Number::Float(f)))
            .map_err(|_| QueryError::InvalidValue {
                message: format!("invalid literal for float(): '{}'", s),
            }),
        other => Err(QueryError::TypeMismatch {
            message: format!("float() cannot convert {}", other.type_name()),
        }),
    }
}

fn builtin_bool(args: &[Value]) -> Result<Value, QueryError> {
    expect_arity("bool", args, 1, 1)?;
    Ok(Value::Boolean(args[0].is_truthy()))
}

fn builtin_type(args: &[Value]) -> Result<Value, QueryError> {
    expect_arity("type", args, 1, 1)?;
    Ok(Value::String(args[0].type_name().to_string()))
}

fn builtin_isinstance(args: &[Value]) -> Result<Value, QueryError> {
    expect_arity("isinstance", args, 2, 2)?;
    let actual = args[0].type_name();

    let matches = match &args[1] {
        Value::String(name) => name == actual,
        Value::Array(names) => names.iter().any(|n| match n {
            Value::String(name) => name == actual,
            _ => false,
        }),
        other => {
            return Err(QueryError::TypeMismatch {
                message: format!(
                    "isinstance() expects a type name or list of type names, got {}",
                    other.type_name()
                ),
            })
        }
    };
    Ok(Value::Boolean(matches))
}

fn builtin_range(args: &[Value]) -> Result<Value, QueryError> {
    expect_arity("range", args, 1, 3)?;

    let (start, stop, step) = match args.len() {
        1 => (0, expect_integer("range", &args[0])?, 1),
        2 => (
            expect_integer("range", &args[0])?,
            expect_integer("range", &args[1])?,
            1,
        ),
        _ => (
            expect_integer("range", &args[0])?,
            expect_integer("range", &args[1])?,
            expect_integer("range", &args[2])?,
        ),
    };

    if step == 0 {
        return Err(QueryError::InvalidValue {
            message: "range() step must not be zero".to_string(),
        });
    }

    let mut items = Vec::new();
    let mut current = start;
    if step > 0 {
        while current < stop {
            items.push(Value::Number(Number::Integer(current)));
            current += step;
        }
    } else {
        while current > stop {
            items.push(Value::Number(Number::Integer(current)));
            current += step;
        }
    }
    Ok(Value::Array(items))
}

fn builtin_zip(args: &[Value]) -> Result<Value, QueryError> {
    let mut sequences = Vec::with_capacity(args.len());
    for arg in args {
        sequences.push(iter_items(arg)?);
    }

    let shortest = sequences.iter().map(Vec::len).min().unwrap_or(0);
    let mut result = Vec::with_capacity(shortest);
    for i in 0..shortest {
        result.push(Value::Array(
            sequences.iter().map(|seq| seq[i].clone()).collect(),
        ));
    }
    Ok(Value::Array(result))
}

fn builtin_enumerate(args: &[Value]) -> Result<Value, QueryError> {
    expect_arity("enumerate", args, 1, 1)?;
    let items = iter_items(&args[0])?;
    Ok(Value::Array(
        items
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                Value::Array(vec![Value::Number(Number::Integer(i as i64)), item])
            })
            .collect(),
    ))
}

fn builtin_any(args: &[Value]) -> Result<Value, QueryError> {
    expect_arity("any", args, 1, 1)?;
    let items = iter_items(&args[0])?;
    Ok(Value::Boolean(items.iter().any(Value::is_truthy)))
}

fn builtin_all(args: &[Value]) -> Result<Value, QueryError> {
    expect_arity("all", args, 1, 1)?;
    let items = iter_items(&args[0])?;
    Ok(Value::Boolean(items.iter().all(Value::is_truthy)))
}

fn builtin_abs(args: &[Value]) -> Result<Value, QueryError> {
    expect_arity("abs", args, 1, 1)?;
    match expect_number("abs", &args[0])? {
        // wraps at the integer boundary, same as the arithmetic operators
        Number::Integer(i) => Ok(Value::Number(Number::Integer(i.wrapping_abs()))),
        Number::Float(f) => Ok(Value::Number(Number::Float(f.abs()))),
    }
}

fn builtin_round(args: &[Value]) -> Result<Value, QueryError> {
    expect_arity("round", args, 1, 2)?;
    let number = expect_number("round", &args[0])?;

    if args.len() == 1 {
        return Ok(Value::Number(Number::Integer(number.as_f64().round() as i64)));
    }

    let digits = expect_integer("round", &args[1])?;
    let factor = 10f64.powi(digits as i32);
    Ok(Value::Number(Number::Float(
        (number.as_f64() * factor).round() / factor,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parser::from_json;

    fn int(i: i64) -> Value {
        Value::Number(Number::Integer(i))
    }

    fn json(s: &str) -> Value {
        from_json(s).unwrap()
    }

    #[test]
    fn test_registry_is_complete_and_sorted() {
        let mut sorted = BUILTIN_NAMES.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, BUILTIN_NAMES);
        for name in BUILTIN_NAMES {
            if *name == "map" || *name == "filter" {
                assert!(lookup(name).is_none());
            } else {
                assert!(lookup(name).is_some(), "missing builtin {}", name);
            }
        }
        assert!(lookup("eval").is_none());
        assert!(lookup("open").is_none());
    }

    #[test]
    fn test_len() {
        assert_eq!(builtin_len(&[json("[1,2,3]")]).unwrap(), int(3));
        assert_eq!(builtin_len(&[json(r#"{"a":1}"#)]).unwrap(), int(1));
        assert_eq!(
            builtin_len(&[Value::String("héllo".to_string())]).unwrap(),
            int(5)
        );
        assert!(matches!(
            builtin_len(&[int(5)]),
            Err(QueryError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_sum() {
        assert_eq!(builtin_sum(&[json("[1,2,3]")]).unwrap(), int(6));
        assert_eq!(
            builtin_sum(&[json("[1,2.5]")]).unwrap(),
            Value::Number(Number::Float(3.5))
        );
        assert!(matches!(
            builtin_sum(&[json(r#"["a"]"#)]),
            Err(QueryError::TypeMismatch { .. })
        ));
        assert!(matches!(
            builtin_sum(&[int(5)]),
            Err(QueryError::NotIterable { .. })
        ));
    }

    #[test]
    fn test_min_max() {
        assert_eq!(builtin_min(&[json("[3,1,2]")]).unwrap(), int(1));
        assert_eq!(builtin_max(&[json("[3,1,2]")]).unwrap(), int(3));
        assert_eq!(
            builtin_max(&[json(r#"["a","c","b"]"#)]).unwrap(),
            Value::String("c".to_string())
        );
        assert!(matches!(
            builtin_min(&[json("[]")]),
            Err(QueryError::InvalidValue { .. })
        ));
        assert!(matches!(
            builtin_min(&[json(r#"[1, "a"]"#)]),
            Err(QueryError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_sort() {
        assert_eq!(builtin_sort(&[json("[3,1,2]")]).unwrap(), json("[1,2,3]"));
        assert_eq!(
            builtin_sort(&[json(r#"["b","a"]"#)]).unwrap(),
            json(r#"["a","b"]"#)
        );
        // sorting a mapping sorts its keys
        assert_eq!(
            builtin_sort(&[json(r#"{"b":1,"a":2}"#)]).unwrap(),
            json(r#"["a","b"]"#)
        );
    }

    #[test]
    fn test_list_and_tuple() {
        assert_eq!(builtin_list(&[]).unwrap(), json("[]"));
        assert_eq!(
            builtin_list(&[json(r#"{"a":1,"b":2}"#)]).unwrap(),
            json(r#"["a","b"]"#)
        );
        assert_eq!(builtin_tuple(&[json("[1,2]")]).unwrap(), json("[1,2]"));
    }

    #[test]
    fn test_set_dedups_preserving_order() {
        assert_eq!(
            builtin_set(&[json("[3,1,3,2,1]")]).unwrap(),
            json("[3,1,2]")
        );
    }

    #[test]
    fn test_dict() {
        assert_eq!(builtin_dict(&[]).unwrap(), json("{}"));
        assert_eq!(
            builtin_dict(&[json(r#"[["a",1],["b",2]]"#)]).unwrap(),
            json(r#"{"a":1,"b":2}"#)
        );
        assert!(matches!(
            builtin_dict(&[json("[[1,2]]")]),
            Err(QueryError::TypeMismatch { .. })
        ));
        assert!(matches!(
            builtin_dict(&[json("[[1]]")]),
            Err(QueryError::TypeMismatch { .. }) | Err(QueryError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_coercions() {
        assert_eq!(builtin_int(&[json("4.9")]).unwrap(), int(4));
        assert_eq!(
            builtin_int(&[Value::String(" 42 ".to_string())]).unwrap(),
            int(42)
        );
        assert!(matches!(
            builtin_int(&[Value::String("nope".to_string())]),
            Err(QueryError::InvalidValue { .. })
        ));
        assert_eq!(
            builtin_float(&[int(2)]).unwrap(),
            Value::Number(Number::Float(2.0))
        );
        assert_eq!(builtin_bool(&[json("[]")]).unwrap(), Value::Boolean(false));
        assert_eq!(
            builtin_str(&[int(42)]).unwrap(),
            Value::String("42".to_string())
        );
        assert_eq!(
            builtin_str(&[Value::String("as-is".to_string())]).unwrap(),
            Value::String("as-is".to_string())
        );
    }

    #[test]
    fn test_type_and_isinstance() {
        assert_eq!(
            builtin_type(&[json("[]")]).unwrap(),
            Value::String("array".to_string())
        );
        assert_eq!(
            builtin_isinstance(&[int(1), Value::String("number".to_string())]).unwrap(),
            Value::Boolean(true)
        );
        assert_eq!(
            builtin_isinstance(&[int(1), json(r#"["string","number"]"#)]).unwrap(),
            Value::Boolean(true)
        );
        assert_eq!(
            builtin_isinstance(&[int(1), Value::String("string".to_string())]).unwrap(),
            Value::Boolean(false)
        );
    }

    #[test]
    fn test_range() {
        assert_eq!(builtin_range(&[int(3)]).unwrap(), json("[0,1,2]"));
        assert_eq!(builtin_range(&[int(1), int(4)]).unwrap(), json("[1,2,3]"));
        assert_eq!(
            builtin_range(&[int(5), int(0), int(-2)]).unwrap(),
            json("[5,3,1]")
        );
        assert!(matches!(
            builtin_range(&[int(0), int(5), int(0)]),
            Err(QueryError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_zip_enumerate() {
        assert_eq!(
            builtin_zip(&[json("[1,2,3]"), json(r#"["a","b"]"#)]).unwrap(),
            json(r#"[[1,"a"],[2,"b"]]"#)
        );
        assert_eq!(
            builtin_enumerate(&[json(r#"["x","y"]"#)]).unwrap(),
            json(r#"[[0,"x"],[1,"y"]]"#)
        );
    }

    #[test]
    fn test_any_all() {
        assert_eq!(builtin_any(&[json("[0,0,1]")]).unwrap(), Value::Boolean(true));
        assert_eq!(builtin_any(&[json("[]")]).unwrap(), Value::Boolean(false));
        assert_eq!(builtin_all(&[json("[1,2]")]).unwrap(), Value::Boolean(true));
        assert_eq!(
            builtin_all(&[json("[1,0]")]).unwrap(),
            Value::Boolean(false)
        );
    }

    #[test]
    fn test_abs_round() {
        assert_eq!(builtin_abs(&[int(-5)]).unwrap(), int(5));
        // the one integer with no positive counterpart wraps to itself
        assert_eq!(builtin_abs(&[int(i64::MIN)]).unwrap(), int(i64::MIN));
        assert_eq!(builtin_round(&[json("2.6")]).unwrap(), int(3));
        assert_eq!(
            builtin_round(&[json("2.678"), int(2)]).unwrap(),
            Value::Number(Number::Float(2.68))
        );
    }
}
