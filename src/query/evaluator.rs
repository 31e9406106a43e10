//! Tree-walking interpreter for parsed query expressions.
//!
//! Evaluation is pure: the document is read-only and every result is a
//! freshly built value. There is no access to the filesystem, the
//! environment, or any name outside the root binding, lambda/comprehension
//! variables, and the builtin allow-list.

use crate::document::node::{Number, Value};
use crate::query::ast::{BinOp, Expr, UnaryOp};
use crate::query::builtins::{self, iter_items};
use crate::query::error::QueryError;

/// Nesting ceiling for expression evaluation. Hit by pathological input
/// only; real queries stay in the single digits.
const MAX_DEPTH: usize = 1000;

pub struct Evaluator<'a> {
    document: &'a Value,
    scope: Vec<(String, Value)>,
    depth: usize,
}

impl<'a> Evaluator<'a> {
    pub fn new(document: &'a Value) -> Self {
        Evaluator {
            document,
            scope: Vec::new(),
            depth: 0,
        }
    }

    pub fn eval(&mut self, expr: &Expr) -> Result<Value, QueryError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            self.depth -= 1;
            return Err(QueryError::Unclassified {
                message: "maximum expression depth exceeded".to_string(),
            });
        }
        let result = self.eval_inner(expr);
        self.depth -= 1;
        result
    }

    fn eval_inner(&mut self, expr: &Expr) -> Result<Value, QueryError> {
        match expr {
            Expr::Null => Ok(Value::Null),
            Expr::Boolean(b) => Ok(Value::Boolean(*b)),
            Expr::Integer(i) => Ok(Value::Number(Number::Integer(*i))),
            Expr::Float(f) => Ok(Value::Number(Number::Float(*f))),
            Expr::Str(s) => Ok(Value::String(s.clone())),
            Expr::Ident(name) => self.resolve_name(name),
            Expr::List(elements) => {
                let mut items = Vec::with_capacity(elements.len());
                for element in elements {
                    items.push(self.eval(element)?);
                }
                Ok(Value::Array(items))
            }
            Expr::Unary(op, operand) => self.eval_unary(*op, operand),
            Expr::Binary(op, left, right) => self.eval_binary(*op, left, right),
            Expr::Ternary {
                cond,
                then_branch,
                else_branch,
            } => {
                if self.eval(cond)?.is_truthy() {
                    self.eval(then_branch)
                } else {
                    self.eval(else_branch)
                }
            }
            Expr::Index(target, index) => {
                let target = self.eval(target)?;
                let index = self.eval(index)?;
                index_value(&target, &index)
            }
            Expr::Slice(target, start, stop) => {
                let target = self.eval(target)?;
                let start = self.eval_slice_bound(start)?;
                let stop = self.eval_slice_bound(stop)?;
                slice_value(&target, start, stop)
            }
            Expr::Attribute(_, name) => Err(QueryError::AttributeMisuse {
                name: name.clone(),
            }),
            Expr::Call(name, args) => self.eval_call(name, args),
            Expr::Lambda { .. } => Err(QueryError::InvalidValue {
                message: "a lambda is only valid as an argument to map() or filter()"
                    .to_string(),
            }),
            Expr::Comprehension {
                element,
                var,
                iterable,
                condition,
            } => self.eval_comprehension(element, var, iterable, condition.as_deref()),
        }
    }

    fn resolve_name(&mut self, name: &str) -> Result<Value, QueryError> {
        if let Some((_, value)) = self.scope.iter().rev().find(|(n, _)| n == name) {
            return Ok(value.clone());
        }
        if name == "_" {
            return Ok(self.document.clone());
        }
        if builtins::contains(name) {
            return Err(QueryError::InvalidValue {
                message: format!("'{}' is a function and must be called: {}(...)", name, name),
            });
        }
        Err(QueryError::UnknownName {
            name: name.to_string(),
        })
    }

    fn eval_unary(&mut self, op: UnaryOp, operand: &Expr) -> Result<Value, QueryError> {
        let value = self.eval(operand)?;
        match op {
            UnaryOp::Not => Ok(Value::Boolean(!value.is_truthy())),
            UnaryOp::Neg => match value {
                Value::Number(Number::Integer(i)) => {
                    Ok(Value::Number(Number::Integer(i.wrapping_neg())))
                }
                Value::Number(Number::Float(f)) => Ok(Value::Number(Number::Float(-f))),
                other => Err(QueryError::TypeMismatch {
                    message: format!("cannot negate a {} value", other.type_name()),
                }),
            },
        }
    }

    fn eval_binary(
        &mut self,
        op: BinOp,
        left: &Expr,
        right: &Expr,
    ) -> Result<Value, QueryError> {
        // short-circuit forms return an operand, not a coerced boolean
        match op {
            BinOp::Or => {
                let lhs = self.eval(left)?;
                if lhs.is_truthy() {
                    return Ok(lhs);
                }
                return self.eval(right);
            }
            BinOp::And => {
                let lhs = self.eval(left)?;
                if !lhs.is_truthy() {
                    return Ok(lhs);
                }
                return self.eval(right);
            }
            _ => {}
        }

        let lhs = self.eval(left)?;
        let rhs = self.eval(right)?;

        match op {
            BinOp::Eq => Ok(Value::Boolean(lhs == rhs)),
            BinOp::Ne => Ok(Value::Boolean(lhs != rhs)),
            BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => compare(op, &lhs, &rhs),
            BinOp::In => contains(&lhs, &rhs),
            BinOp::Add => add(&lhs, &rhs),
            BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Mod => arithmetic(op, &lhs, &rhs),
            BinOp::Or | BinOp::And => unreachable!("handled above"),
        }
    }

    fn eval_call(&mut self, name: &str, args: &[Expr]) -> Result<Value, QueryError> {
        // map/filter take a lambda, which is not a value; dispatch them here
        if name == "map" || name == "filter" {
            return self.eval_map_filter(name, args);
        }

        if let Some(function) = builtins::lookup(name) {
            let mut values = Vec::with_capacity(args.len());
            for arg in args {
                values.push(self.eval(arg)?);
            }
            return function(&values);
        }

        if name == "_" || self.scope.iter().any(|(n, _)| n == name) {
            return Err(QueryError::TypeMismatch {
                message: format!("'{}' is not callable", name),
            });
        }
        Err(QueryError::UnknownName {
            name: name.to_string(),
        })
    }

    fn eval_map_filter(&mut self, name: &str, args: &[Expr]) -> Result<Value, QueryError> {
        if args.len() != 2 {
            return Err(QueryError::InvalidValue {
                message: format!("{}() takes 2 arguments, got {}", name, args.len()),
            });
        }
        let Expr::Lambda { param, body } = &args[0] else {
            return Err(QueryError::InvalidValue {
                message: format!(
                    "{}() expects a lambda as its first argument, e.g. {}(x => x, _['items'])",
                    name, name
                ),
            });
        };

        let iterable = self.eval(&args[1])?;
        let items = iter_items(&iterable)?;

        let mut result = Vec::new();
        for item in items {
            self.scope.push((param.clone(), item.clone()));
            let mapped = self.eval(body);
            self.scope.pop();
            let mapped = mapped?;

            if name == "map" {
                result.push(mapped);
            } else if mapped.is_truthy() {
                result.push(item);
            }
        }
        Ok(Value::Array(result))
    }

    fn eval_comprehension(
        &mut self,
        element: &Expr,
        var: &str,
        iterable: &Expr,
        condition: Option<&Expr>,
    ) -> Result<Value, QueryError> {
        let iterable = self.eval(iterable)?;
        let items = iter_items(&iterable)?;

        let mut result = Vec::new();
        for item in items {
            self.scope.push((var.to_string(), item));
            let outcome = self.eval_comprehension_step(element, condition);
            self.scope.pop();
            if let Some(value) = outcome? {
                result.push(value);
            }
        }
        Ok(Value::Array(result))
    }

    fn eval_comprehension_step(
        &mut self,
        element: &Expr,
        condition: Option<&Expr>,
    ) -> Result<Option<Value>, QueryError> {
        if let Some(condition) = condition {
            if !self.eval(condition)?.is_truthy() {
                return Ok(None);
            }
        }
        Ok(Some(self.eval(element)?))
    }

    fn eval_slice_bound(
        &mut self,
        bound: &Option<Box<Expr>>,
    ) -> Result<Option<i64>, QueryError> {
        let Some(expr) = bound else {
            return Ok(None);
        };
        match self.eval(expr)? {
            Value::Number(Number::Integer(i)) => Ok(Some(i)),
            other => Err(QueryError::TypeMismatch {
                message: format!(
                    "slice bounds must be integers, got {}",
                    other.type_name()
                ),
            }),
        }
    }
}

fn index_value(target: &Value, index: &Value) -> Result<Value, QueryError> {
    match target {
        Value::Object(fields) => {
            let Value::String(key) = index else {
                return Err(QueryError::MissingKey {
                    key: crate::render::format_compact(index),
                });
            };
            fields
                .get(key)
                .cloned()
                .ok_or_else(|| QueryError::MissingKey { key: key.clone() })
        }
        Value::Array(items) => {
            let position = match index {
                Value::Number(Number::Integer(i)) => *i,
                Value::Number(Number::Float(_)) => {
                    return Err(QueryError::TypeMismatch {
                        message: "sequence indices must be integers, not floats".to_string(),
                    })
                }
                other => {
                    return Err(QueryError::TypeMismatch {
                        message: format!(
                            "sequence indices must be integers, got {}",
                            other.type_name()
                        ),
                    })
                }
            };
            let len = items.len();
            let normalized = if position < 0 {
                position + len as i64
            } else {
                position
            };
            if normalized < 0 || normalized as usize >= len {
                return Err(QueryError::IndexOutOfRange {
                    index: position,
                    len,
                });
            }
            Ok(items[normalized as usize].clone())
        }
        other => Err(QueryError::NotIndexable {
            type_name: other.type_name(),
        }),
    }
}

/// Clamps a possibly-negative slice bound to [0, len].
fn clamp_bound(bound: Option<i64>, default: usize, len: usize) -> usize {
    let Some(bound) = bound else {
        return default;
    };
    let adjusted = if bound < 0 { bound + len as i64 } else { bound };
    adjusted.clamp(0, len as i64) as usize
}

fn slice_value(
    target: &Value,
    start: Option<i64>,
    stop: Option<i64>,
) -> Result<Value, QueryError> {
    match target {
        Value::Array(items) => {
            let len = items.len();
            let from = clamp_bound(start, 0, len);
            let to = clamp_bound(stop, len, len);
            if from >= to {
                return Ok(Value::Array(Vec::new()));
            }
            Ok(Value::Array(items[from..to].to_vec()))
        }
        Value::String(s) => {
            let chars: Vec<char> = s.chars().collect();
            let len = chars.len();
            let from = clamp_bound(start, 0, len);
            let to = clamp_bound(stop, len, len);
            if from >= to {
                return Ok(Value::String(String::new()));
            }
            Ok(Value::String(chars[from..to].iter().collect()))
        }
        other => Err(QueryError::NotIndexable {
            type_name: other.type_name(),
        }),
    }
}

fn compare(op: BinOp, lhs: &Value, rhs: &Value) -> Result<Value, QueryError> {
    let ordering = match (lhs, rhs) {
        (Value::Number(a), Value::Number(b)) => {
            a.partial_cmp(b).ok_or_else(|| QueryError::TypeMismatch {
                message: "cannot order NaN".to_string(),
            })?
        }
        (Value::String(a), Value::String(b)) => a.cmp(b),
        _ => {
            return Err(QueryError::TypeMismatch {
                message: format!(
                    "cannot compare {} and {}",
                    lhs.type_name(),
                    rhs.type_name()
                ),
            })
        }
    };
    let holds = match op {
        BinOp::Lt => ordering.is_lt(),
        BinOp::Le => ordering.is_le(),
        BinOp::Gt => ordering.is_gt(),
        BinOp::Ge => ordering.is_ge(),
        _ => unreachable!("compare only handles ordering operators"),
    };
    Ok(Value::Boolean(holds))
}

fn contains(needle: &Value, haystack: &Value) -> Result<Value, QueryError> {
    match haystack {
        Value::Array(items) => Ok(Value::Boolean(items.contains(needle))),
        Value::Object(fields) => match needle {
            Value::String(key) => Ok(Value::Boolean(fields.contains_key(key))),
            _ => Ok(Value::Boolean(false)),
        },
        Value::String(s) => match needle {
            Value::String(sub) => Ok(Value::Boolean(s.contains(sub.as_str()))),
            other => Err(QueryError::TypeMismatch {
                message: format!(
                    "'in <string>' requires a string operand, got {}",
                    other.type_name()
                ),
            }),
        },
        other => Err(QueryError::NotIterable {
            type_name: other.type_name(),
        }),
    }
}

fn add(lhs: &Value, rhs: &Value) -> Result<Value, QueryError> {
    match (lhs, rhs) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(numeric_add(a, b))),
        (Value::String(a), Value::String(b)) => {
            let mut joined = a.clone();
            joined.push_str(b);
            Ok(Value::String(joined))
        }
        (Value::Array(a), Value::Array(b)) => {
            let mut joined = a.clone();
            joined.extend(b.iter().cloned());
            Ok(Value::Array(joined))
        }
        _ => Err(QueryError::TypeMismatch {
            message: format!("cannot add {} and {}", lhs.type_name(), rhs.type_name()),
        }),
    }
}

fn numeric_add(a: &Number, b: &Number) -> Number {
    match (a, b) {
        (Number::Integer(x), Number::Integer(y)) => Number::Integer(x.wrapping_add(*y)),
        _ => Number::Float(a.as_f64() + b.as_f64()),
    }
}

fn arithmetic(op: BinOp, lhs: &Value, rhs: &Value) -> Result<Value, QueryError> {
    let (Value::Number(a), Value::Number(b)) = (lhs, rhs) else {
        let verb = match op {
            BinOp::Sub => "subtract",
            BinOp::Mul => "multiply",
            BinOp::Div => "divide",
            _ => "take the remainder of",
        };
        return Err(QueryError::TypeMismatch {
            message: format!(
                "cannot {} {} and {}",
                verb,
                lhs.type_name(),
                rhs.type_name()
            ),
        });
    };

    let result = match op {
        BinOp::Sub => match (a, b) {
            (Number::Integer(x), Number::Integer(y)) => Number::Integer(x.wrapping_sub(*y)),
            _ => Number::Float(a.as_f64() - b.as_f64()),
        },
        BinOp::Mul => match (a, b) {
            (Number::Integer(x), Number::Integer(y)) => Number::Integer(x.wrapping_mul(*y)),
            _ => Number::Float(a.as_f64() * b.as_f64()),
        },
        BinOp::Div => {
            if b.as_f64() == 0.0 {
                return Err(QueryError::Unclassified {
                    message: "division by zero".to_string(),
                });
            }
            // division always yields a float, matching the query language's
            // arithmetic model
            Number::Float(a.as_f64() / b.as_f64())
        }
        BinOp::Mod => match (a, b) {
            (_, Number::Integer(0)) => {
                return Err(QueryError::Unclassified {
                    message: "division by zero".to_string(),
                })
            }
            (Number::Integer(x), Number::Integer(y)) => Number::Integer(x.rem_euclid(*y)),
            _ => {
                if b.as_f64() == 0.0 {
                    return Err(QueryError::Unclassified {
                        message: "division by zero".to_string(),
                    });
                }
                Number::Float(a.as_f64().rem_euclid(b.as_f64()))
            }
        },
        _ => unreachable!("arithmetic only handles - * / %"),
    };
    Ok(Value::Number(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parser::from_json;
    use crate::query::parser::Parser;

    fn doc() -> Value {
        from_json(
            r#"{
                "items": [
                    {"name": "Alice", "age": 30},
                    {"name": "Bob", "age": 25}
                ],
                "count": 2,
                "title": "people"
            }"#,
        )
        .unwrap()
    }

    fn run(query: &str) -> Result<Value, QueryError> {
        let expr = Parser::parse(query)?;
        Evaluator::new(&doc()).eval(&expr)
    }

    fn int(i: i64) -> Value {
        Value::Number(Number::Integer(i))
    }

    #[test]
    fn test_root_identity() {
        assert_eq!(run("_").unwrap(), doc());
    }

    #[test]
    fn test_key_and_index_chain() {
        assert_eq!(
            run("_['items'][0]['name']").unwrap(),
            Value::String("Alice".to_string())
        );
    }

    #[test]
    fn test_negative_index() {
        assert_eq!(
            run("_['items'][-1]['name']").unwrap(),
            Value::String("Bob".to_string())
        );
    }

    #[test]
    fn test_index_out_of_range_carries_bounds() {
        assert_eq!(
            run("_['items'][5]"),
            Err(QueryError::IndexOutOfRange { index: 5, len: 2 })
        );
        assert_eq!(
            run("_['items'][-3]"),
            Err(QueryError::IndexOutOfRange { index: -3, len: 2 })
        );
    }

    #[test]
    fn test_missing_key() {
        assert_eq!(
            run("_['missing']"),
            Err(QueryError::MissingKey {
                key: "missing".to_string()
            })
        );
    }

    #[test]
    fn test_non_string_key_on_mapping() {
        assert_eq!(
            run("_[0]"),
            Err(QueryError::MissingKey {
                key: "0".to_string()
            })
        );
    }

    #[test]
    fn test_indexing_a_scalar() {
        assert_eq!(
            run("_['count'][0]"),
            Err(QueryError::NotIndexable {
                type_name: "number"
            })
        );
    }

    #[test]
    fn test_float_index_rejected() {
        assert!(matches!(
            run("_['items'][1.5]"),
            Err(QueryError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_attribute_access_rejected() {
        assert_eq!(
            run("_.items"),
            Err(QueryError::AttributeMisuse {
                name: "items".to_string()
            })
        );
    }

    #[test]
    fn test_unknown_name() {
        assert_eq!(
            run("bogus"),
            Err(QueryError::UnknownName {
                name: "bogus".to_string()
            })
        );
    }

    #[test]
    fn test_bare_builtin_name() {
        assert!(matches!(run("len"), Err(QueryError::InvalidValue { .. })));
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(run("1 + 2 * 3").unwrap(), int(7));
        assert_eq!(run("7 % 3").unwrap(), int(1));
        assert_eq!(
            run("7 / 2").unwrap(),
            Value::Number(Number::Float(3.5))
        );
        assert!(matches!(run("1 / 0"), Err(QueryError::Unclassified { .. })));
        assert!(matches!(run("1 % 0"), Err(QueryError::Unclassified { .. })));
        assert!(matches!(
            run("1 + 'x'"),
            Err(QueryError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_integer_negation_wraps_at_the_boundary() {
        // 0 - i64::MAX - 1 wraps to i64::MIN, which has no positive
        // counterpart; negation and abs wrap like the other operators
        assert_eq!(run("0 - 9223372036854775807 - 1").unwrap(), int(i64::MIN));
        assert_eq!(
            run("-(0 - 9223372036854775807 - 1)").unwrap(),
            int(i64::MIN)
        );
        assert_eq!(
            run("abs(0 - 9223372036854775807 - 1)").unwrap(),
            int(i64::MIN)
        );
    }

    #[test]
    fn test_string_and_array_concat() {
        assert_eq!(
            run("'a' + 'b'").unwrap(),
            Value::String("ab".to_string())
        );
        assert_eq!(run("[1] + [2]").unwrap(), from_json("[1,2]").unwrap());
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(run("1 < 2").unwrap(), Value::Boolean(true));
        assert_eq!(run("2 <= 1").unwrap(), Value::Boolean(false));
        assert_eq!(run("'a' < 'b'").unwrap(), Value::Boolean(true));
        assert_eq!(run("1 == 1.0").unwrap(), Value::Boolean(true));
        assert_eq!(run("1 != 2").unwrap(), Value::Boolean(true));
        assert!(matches!(
            run("1 < 'a'"),
            Err(QueryError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_logic_returns_operands() {
        assert_eq!(run("0 or 5").unwrap(), int(5));
        assert_eq!(run("3 and 5").unwrap(), int(5));
        assert_eq!(run("0 and 5").unwrap(), int(0));
        assert_eq!(run("not 0").unwrap(), Value::Boolean(true));
    }

    #[test]
    fn test_short_circuit_skips_errors() {
        assert_eq!(run("1 or _['missing']").unwrap(), int(1));
        assert_eq!(run("0 and _['missing']").unwrap(), int(0));
    }

    #[test]
    fn test_membership() {
        assert_eq!(run("2 in [1, 2, 3]").unwrap(), Value::Boolean(true));
        assert_eq!(run("'items' in _").unwrap(), Value::Boolean(true));
        assert_eq!(run("'eop' in _['title']").unwrap(), Value::Boolean(true));
        assert_eq!(run("0 in _").unwrap(), Value::Boolean(false));
        assert!(matches!(
            run("1 in 2"),
            Err(QueryError::NotIterable { .. })
        ));
    }

    #[test]
    fn test_ternary() {
        assert_eq!(run("_['count'] > 1 ? 'many' : 'few'").unwrap(),
            Value::String("many".to_string()));
        assert_eq!(run("0 ? 1 : 2").unwrap(), int(2));
    }

    #[test]
    fn test_slices() {
        assert_eq!(run("[1,2,3,4][1:3]").unwrap(), from_json("[2,3]").unwrap());
        assert_eq!(run("[1,2,3][:2]").unwrap(), from_json("[1,2]").unwrap());
        assert_eq!(run("[1,2,3][-2:]").unwrap(), from_json("[2,3]").unwrap());
        assert_eq!(run("[1,2,3][5:9]").unwrap(), from_json("[]").unwrap());
        assert_eq!(
            run("_['title'][0:3]").unwrap(),
            Value::String("peo".to_string())
        );
        assert!(matches!(
            run("5[0:1]"),
            Err(QueryError::NotIndexable { .. })
        ));
    }

    #[test]
    fn test_comprehension() {
        assert_eq!(
            run("[x['name'] for x in _['items']]").unwrap(),
            from_json(r#"["Alice","Bob"]"#).unwrap()
        );
        assert_eq!(
            run("[x['name'] for x in _['items'] if x['age'] > 27]").unwrap(),
            from_json(r#"["Alice"]"#).unwrap()
        );
    }

    #[test]
    fn test_comprehension_over_mapping_yields_keys() {
        assert_eq!(
            run("[k for k in _]").unwrap(),
            from_json(r#"["items","count","title"]"#).unwrap()
        );
    }

    #[test]
    fn test_map_and_filter() {
        assert_eq!(
            run("map(x => x['age'], _['items'])").unwrap(),
            from_json("[30,25]").unwrap()
        );
        assert_eq!(
            run("filter(x => x['age'] < 28, _['items'])").unwrap(),
            from_json(r#"[{"name":"Bob","age":25}]"#).unwrap()
        );
    }

    #[test]
    fn test_map_requires_lambda() {
        assert!(matches!(
            run("map(1, _['items'])"),
            Err(QueryError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_lambda_outside_map_rejected() {
        assert!(matches!(
            run("(x => x)"),
            Err(QueryError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_variable_not_callable() {
        assert!(matches!(
            run("map(x => x(1), _['items'])"),
            Err(QueryError::TypeMismatch { .. })
        ));
        assert!(matches!(run("_(1)"), Err(QueryError::TypeMismatch { .. })));
    }

    #[test]
    fn test_lambda_shadowing_is_scoped() {
        assert_eq!(
            run("map(x => map(x => x + 1, [10]), [1, 2])").unwrap(),
            from_json("[[11],[11]]").unwrap()
        );
    }

    #[test]
    fn test_builtins_through_calls() {
        assert_eq!(run("len(_['items'])").unwrap(), int(2));
        assert_eq!(
            run("sum(map(x => x['age'], _['items']))").unwrap(),
            int(55)
        );
    }

    #[test]
    fn test_deep_nesting_hits_ceiling() {
        let mut expr = Expr::Integer(1);
        for _ in 0..1200 {
            expr = Expr::List(vec![expr]);
        }
        assert!(matches!(
            Evaluator::new(&doc()).eval(&expr),
            Err(QueryError::Unclassified { .. })
        ));
    }

    #[test]
    fn test_evaluation_is_pure() {
        let document = doc();
        let expr = Parser::parse("map(x => x['age'] + 1, _['items'])").unwrap();
        let _ = Evaluator::new(&document).eval(&expr).unwrap();
        assert_eq!(document, doc());
    }
}
